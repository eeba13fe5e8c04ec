//! Error types for the NFS client.
//!
//! Failures fall into three distinct layers that must never be conflated:
//!
//! 1. Wire-format errors ([`Error::DecodeUnderflow`], [`Error::RpcEnvelope`],
//!    [`Error::Io`]): the bytes on the socket were wrong or the connection
//!    failed. No NFS status code is involved.
//!
//! 2. NFS status errors ([`Error::Nfs3`], [`Error::Nfs4`]): the server
//!    understood the request and returned a non-zero `nfsstat3` / `nfsstat4`.
//!    The integer status and the procedure/operation name are carried for
//!    diagnostics; use [`Error::is3`] / [`Error::is4`] to branch on a code.
//!
//! 3. Semantic protocol errors ([`Error::PortmapUnregistered`],
//!    [`Error::MissingFileHandle`], [`Error::Protocol`]): the reply was
//!    well-formed and successful at the NFS layer but violated a protocol
//!    contract, e.g. a CREATE reply without a file handle.

// Preserve original RFC naming conventions for consistency with the specification
#![allow(non_camel_case_types)]
#![allow(clippy::upper_case_acronyms)]

use num_derive::{FromPrimitive, ToPrimitive};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Status codes returned by NFS version 3 operations (RFC 1813 section 2.6).
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum nfsstat3 {
    /// Indicates the call completed successfully.
    NFS3_OK = 0,
    /// Not owner. Caller is neither privileged nor the owner of the target.
    NFS3ERR_PERM = 1,
    /// No such file or directory.
    NFS3ERR_NOENT = 2,
    /// A hard I/O error occurred while processing the operation.
    NFS3ERR_IO = 5,
    /// No such device or address.
    NFS3ERR_NXIO = 6,
    /// Permission denied. Contrast with NFS3ERR_PERM, which restricts itself
    /// to owner or privileged-user failures.
    NFS3ERR_ACCES = 13,
    /// The file specified already exists.
    NFS3ERR_EXIST = 17,
    /// Attempt to do a cross-device hard link.
    NFS3ERR_XDEV = 18,
    /// No such device.
    NFS3ERR_NODEV = 19,
    /// The caller specified a non-directory in a directory operation.
    NFS3ERR_NOTDIR = 20,
    /// The caller specified a directory in a non-directory operation.
    NFS3ERR_ISDIR = 21,
    /// Invalid or unsupported argument.
    NFS3ERR_INVAL = 22,
    /// The operation would have grown a file beyond the server's limit.
    NFS3ERR_FBIG = 27,
    /// No space left on device.
    NFS3ERR_NOSPC = 28,
    /// A modifying operation was attempted on a read-only file system.
    NFS3ERR_ROFS = 30,
    /// Too many hard links.
    NFS3ERR_MLINK = 31,
    /// The filename in an operation was too long.
    NFS3ERR_NAMETOOLONG = 63,
    /// An attempt was made to remove a directory that was not empty.
    NFS3ERR_NOTEMPTY = 66,
    /// Resource (quota) hard limit exceeded.
    NFS3ERR_DQUOT = 69,
    /// Invalid file handle; the object no longer exists or access was revoked.
    NFS3ERR_STALE = 70,
    /// Too many levels of remote in path.
    NFS3ERR_REMOTE = 71,
    /// The file handle failed internal consistency checks.
    NFS3ERR_BADHANDLE = 10001,
    /// Update synchronization mismatch during a guarded SETATTR.
    NFS3ERR_NOT_SYNC = 10002,
    /// READDIR or READDIRPLUS cookie is stale.
    NFS3ERR_BAD_COOKIE = 10003,
    /// Operation is not supported.
    NFS3ERR_NOTSUPP = 10004,
    /// Buffer or request is too small.
    NFS3ERR_TOOSMALL = 10005,
    /// Server-side error that maps to no other status value.
    NFS3ERR_SERVERFAULT = 10006,
    /// Object type not supported by the server.
    NFS3ERR_BADTYPE = 10007,
    /// The server cannot complete the request in a timely fashion; retry
    /// later with a new transaction.
    NFS3ERR_JUKEBOX = 10008,
}

/// Status codes returned by NFS version 4 operations (RFC 7530 section 13,
/// RFC 8881 section 15 for the session-era additions).
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum nfsstat4 {
    NFS4_OK = 0,
    NFS4ERR_PERM = 1,
    NFS4ERR_NOENT = 2,
    NFS4ERR_IO = 5,
    NFS4ERR_NXIO = 6,
    NFS4ERR_ACCESS = 13,
    NFS4ERR_EXIST = 17,
    NFS4ERR_XDEV = 18,
    NFS4ERR_NOTDIR = 20,
    NFS4ERR_ISDIR = 21,
    NFS4ERR_INVAL = 22,
    NFS4ERR_FBIG = 27,
    NFS4ERR_NOSPC = 28,
    NFS4ERR_ROFS = 30,
    NFS4ERR_MLINK = 31,
    NFS4ERR_NAMETOOLONG = 63,
    NFS4ERR_NOTEMPTY = 66,
    NFS4ERR_DQUOT = 69,
    NFS4ERR_STALE = 70,
    NFS4ERR_BADHANDLE = 10001,
    NFS4ERR_BAD_COOKIE = 10003,
    NFS4ERR_NOTSUPP = 10004,
    NFS4ERR_TOOSMALL = 10005,
    NFS4ERR_SERVERFAULT = 10006,
    NFS4ERR_BADTYPE = 10007,
    NFS4ERR_DELAY = 10008,
    NFS4ERR_SAME = 10009,
    NFS4ERR_DENIED = 10010,
    NFS4ERR_EXPIRED = 10011,
    NFS4ERR_LOCKED = 10012,
    /// The server is in its grace period after a restart; reclaim-type
    /// requests only. OPEN is retried automatically on this status.
    NFS4ERR_GRACE = 10013,
    NFS4ERR_FHEXPIRED = 10014,
    NFS4ERR_SHARE_DENIED = 10015,
    NFS4ERR_WRONGSEC = 10016,
    NFS4ERR_CLID_INUSE = 10017,
    NFS4ERR_RESOURCE = 10018,
    NFS4ERR_MOVED = 10019,
    NFS4ERR_NOFILEHANDLE = 10020,
    NFS4ERR_MINOR_VERS_MISMATCH = 10021,
    NFS4ERR_STALE_CLIENTID = 10022,
    NFS4ERR_STALE_STATEID = 10023,
    NFS4ERR_OLD_STATEID = 10024,
    NFS4ERR_BAD_STATEID = 10025,
    NFS4ERR_BAD_SEQID = 10026,
    NFS4ERR_NOT_SAME = 10027,
    NFS4ERR_LOCK_RANGE = 10028,
    NFS4ERR_SYMLINK = 10029,
    NFS4ERR_RESTOREFH = 10030,
    NFS4ERR_LEASE_MOVED = 10031,
    NFS4ERR_ATTRNOTSUPP = 10032,
    NFS4ERR_NO_GRACE = 10033,
    NFS4ERR_RECLAIM_BAD = 10034,
    NFS4ERR_RECLAIM_CONFLICT = 10035,
    NFS4ERR_BADXDR = 10036,
    NFS4ERR_LOCKS_HELD = 10037,
    NFS4ERR_OPENMODE = 10038,
    NFS4ERR_BADOWNER = 10039,
    NFS4ERR_BADCHAR = 10040,
    NFS4ERR_BADNAME = 10041,
    NFS4ERR_BAD_RANGE = 10042,
    NFS4ERR_LOCK_NOTSUPP = 10043,
    NFS4ERR_OP_ILLEGAL = 10044,
    NFS4ERR_DEADLOCK = 10045,
    NFS4ERR_FILE_OPEN = 10046,
    NFS4ERR_ADMIN_REVOKED = 10047,
    NFS4ERR_CB_PATH_DOWN = 10048,
    NFS4ERR_BADSESSION = 10052,
    NFS4ERR_BADSLOT = 10053,
    NFS4ERR_BAD_HIGH_SLOT = 10054,
    NFS4ERR_CONN_NOT_BOUND_TO_SESSION = 10055,
    NFS4ERR_DEADSESSION = 10056,
    NFS4ERR_SEQ_FALSE_RETRY = 10060,
    NFS4ERR_SEQ_MISORDERED = 10063,
}

/// The crate-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An XDR decode tried to read past the end of its buffer.
    #[error("XDR decode underflow")]
    DecodeUnderflow,

    /// The RPC reply envelope violated RFC 5531: wrong message type, a
    /// denied message, or a non-SUCCESS accept status.
    #[error("RPC envelope error: {0}")]
    RpcEnvelope(String),

    /// Socket-level failure (connect, send, receive).
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An NFSv3 procedure returned a non-zero status.
    #[error("{proc} failed, nfsstat3={status}")]
    Nfs3 { status: u32, proc: &'static str },

    /// An NFSv4 operation returned a non-zero status.
    #[error("{op} failed, nfsstat4={status}")]
    Nfs4 { status: u32, op: &'static str },

    /// Portmap has no registration for the requested program/version.
    #[error("portmap: program {prog} version {vers} is not registered")]
    PortmapUnregistered { prog: u32, vers: u32 },

    /// A reply that must carry a file handle (CREATE, MKDIR, SYMLINK, MKNOD)
    /// came back without one.
    #[error("{proc}: server returned no file handle")]
    MissingFileHandle { proc: &'static str },

    /// A well-formed reply violated a protocol contract, e.g. a v4.1 server
    /// demanding OPEN_CONFIRM.
    #[error("protocol error: {0}")]
    Protocol(&'static str),
}

impl Error {
    /// Build an NFSv3 status error from a non-zero `nfsstat3` value.
    pub(crate) fn nfs3(status: u32, proc: &'static str) -> Error {
        Error::Nfs3 { status, proc }
    }

    /// Build an NFSv4 status error from a non-zero `nfsstat4` value.
    pub(crate) fn nfs4(status: u32, op: &'static str) -> Error {
        Error::Nfs4 { status, op }
    }

    /// True if this is an NFSv3 status error with the given code.
    pub fn is3(&self, code: nfsstat3) -> bool {
        matches!(self, Error::Nfs3 { status, .. } if *status == code as u32)
    }

    /// True if this is an NFSv4 status error with the given code.
    pub fn is4(&self, code: nfsstat4) -> bool {
        matches!(self, Error::Nfs4 { status, .. } if *status == code as u32)
    }

    /// The raw NFS status code, if this error carries one.
    pub fn nfs_status(&self) -> Option<u32> {
        match self {
            Error::Nfs3 { status, .. } | Error::Nfs4 { status, .. } => Some(*status),
            _ => None,
        }
    }
}
