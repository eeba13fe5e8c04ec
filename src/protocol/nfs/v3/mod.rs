//! NFS version 3 protocol codec as specified in RFC 1813.
//!
//! One module per procedure. Each module exposes three layers:
//!
//! - `encode_<proc>_args(...) -> Vec<u8>` — pure argument encoder
//! - `decode_<proc>_reply(&[u8]) -> Result<...>` — pure reply decoder
//! - `<proc>(transport, ...)` — async glue that encodes, calls
//!   `(100003, 3, PROC)` on the transport, and decodes
//!
//! Reply decoding follows one strict rule from RFC 1813: the `post_op_attr`
//! and `wcc_data` blocks that surround a result are present in *both* the
//! success and failure arms of the result union, so every decoder consumes
//! them before branching on the status. Skipping them only on success would
//! desynchronize the cursor on error replies.
//!
//! This module holds the wire types and constants shared by the procedure
//! modules: file handles, attributes, settable attributes and the
//! size/verifier aliases from RFC 1813 section 2.5.

// Preserve original RFC naming conventions (e.g. nfs_fh3, fattr3)
// for consistency with the NFS version 3 protocol specification
#![allow(non_camel_case_types)]

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive as _;

use crate::error::Result;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

pub mod access;
pub mod commit;
pub mod create;
pub mod fsinfo;
pub mod fsstat;
pub mod getattr;
pub mod link;
pub mod lookup;
pub mod mkdir;
pub mod mknod;
pub mod null;
pub mod pathconf;
pub mod read;
pub mod readdir;
pub mod readdirplus;
pub mod readlink;
pub mod remove;
pub mod rename;
pub mod rmdir;
pub mod setattr;
pub mod symlink;
pub mod write;

// Section 2.2 Constants
/// The RPC program number for the NFS service.
pub const PROGRAM: u32 = 100003;
/// The version number for NFS version 3.
pub const VERSION: u32 = 3;

// Section 2.4 Sizes
/// Maximum size in bytes of an NFSv3 file handle.
pub const NFS3_FHSIZE: usize = 64;
/// Size in bytes of the READDIR/READDIRPLUS cookie verifier.
pub const NFS3_COOKIEVERFSIZE: usize = 8;
/// Size in bytes of the exclusive-CREATE verifier.
pub const NFS3_CREATEVERFSIZE: usize = 8;
/// Size in bytes of the WRITE/COMMIT verifier.
pub const NFS3_WRITEVERFSIZE: usize = 8;

/// Cookie verifier for directory pagination (RFC 1813 section 2.5).
pub type cookieverf3 = [u8; NFS3_COOKIEVERFSIZE];
/// Verifier making EXCLUSIVE CREATE idempotent.
pub type createverf3 = [u8; NFS3_CREATEVERFSIZE];
/// Verifier for detecting server restarts between WRITE and COMMIT.
pub type writeverf3 = [u8; NFS3_WRITEVERFSIZE];

// Section 3.3.4 ACCESS permission bits
pub const ACCESS3_READ: u32 = 0x0001;
pub const ACCESS3_LOOKUP: u32 = 0x0002;
pub const ACCESS3_MODIFY: u32 = 0x0004;
pub const ACCESS3_EXTEND: u32 = 0x0008;
pub const ACCESS3_DELETE: u32 = 0x0010;
pub const ACCESS3_EXECUTE: u32 = 0x0020;

/// The NFS version 3 file handle: an opaque identifier the server hands out
/// and the client returns verbatim (up to [`NFS3_FHSIZE`] bytes on the wire).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct nfs_fh3 {
    pub data: Vec<u8>,
}

impl nfs_fh3 {
    pub fn encode(&self, enc: &mut XdrEncoder) {
        enc.put_opaque(&self.data);
    }

    pub fn decode(dec: &mut XdrDecoder<'_>) -> Result<nfs_fh3> {
        Ok(nfs_fh3 { data: dec.get_opaque()? })
    }
}

/// File type enumeration (RFC 1813 section 2.6).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum ftype3 {
    /// Regular file
    #[default]
    NF3REG = 1,
    /// Directory
    NF3DIR = 2,
    /// Block special device
    NF3BLK = 3,
    /// Character special device
    NF3CHR = 4,
    /// Symbolic link
    NF3LNK = 5,
    /// Socket
    NF3SOCK = 6,
    /// Named pipe
    NF3FIFO = 7,
}

/// File timestamps: seconds and nanoseconds since the Unix epoch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct nfstime3 {
    pub seconds: u32,
    pub nseconds: u32,
}

impl nfstime3 {
    fn decode(dec: &mut XdrDecoder<'_>) -> Result<nfstime3> {
        Ok(nfstime3 { seconds: dec.get_u32()?, nseconds: dec.get_u32()? })
    }
}

/// Major/minor device numbers for special files.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct specdata3 {
    pub specdata1: u32,
    pub specdata2: u32,
}

/// File attributes (RFC 1813 section 2.6): 21 words on the wire, fixed
/// positions, returned by GETATTR and embedded in READDIRPLUS entries.
#[derive(Copy, Clone, Debug, Default)]
pub struct fattr3 {
    pub ftype: ftype3,
    pub mode: u32,
    pub nlink: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    pub used: u64,
    pub rdev: specdata3,
    pub fsid: u64,
    pub fileid: u64,
    pub atime: nfstime3,
    pub mtime: nfstime3,
    pub ctime: nfstime3,
}

impl fattr3 {
    pub fn decode(dec: &mut XdrDecoder<'_>) -> Result<fattr3> {
        Ok(fattr3 {
            ftype: ftype3::from_u32(dec.get_u32()?).unwrap_or_default(),
            mode: dec.get_u32()?,
            nlink: dec.get_u32()?,
            uid: dec.get_u32()?,
            gid: dec.get_u32()?,
            size: dec.get_u64()?,
            used: dec.get_u64()?,
            rdev: specdata3 { specdata1: dec.get_u32()?, specdata2: dec.get_u32()? },
            fsid: dec.get_u64()?,
            fileid: dec.get_u64()?,
            atime: nfstime3::decode(dec)?,
            mtime: nfstime3::decode(dec)?,
            ctime: nfstime3::decode(dec)?,
        })
    }
}

/// How to set a timestamp in [`sattr3`] (RFC 1813 section 2.6 `time_how`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum set_time3 {
    /// Leave the timestamp unchanged.
    #[default]
    DontChange,
    /// Set to the server's current time.
    ServerTime,
    /// Set to this client-provided time.
    ClientTime(nfstime3),
}

impl set_time3 {
    fn encode(&self, enc: &mut XdrEncoder) {
        match self {
            set_time3::DontChange => enc.put_u32(0),
            set_time3::ServerTime => enc.put_u32(1),
            set_time3::ClientTime(t) => {
                enc.put_u32(2);
                enc.put_u32(t.seconds);
                enc.put_u32(t.nseconds);
            }
        }
    }
}

/// Settable attributes for SETATTR, CREATE, MKDIR, SYMLINK and MKNOD.
/// `None` fields are omitted from the wire entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct sattr3 {
    pub mode: Option<u32>,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub size: Option<u64>,
    pub atime: set_time3,
    pub mtime: set_time3,
}

impl sattr3 {
    /// Settable attributes carrying only a mode.
    pub fn with_mode(mode: u32) -> sattr3 {
        sattr3 { mode: Some(mode), ..Default::default() }
    }

    pub fn encode(&self, enc: &mut XdrEncoder) {
        match self.mode {
            Some(mode) => {
                enc.put_bool(true);
                enc.put_u32(mode);
            }
            None => enc.put_bool(false),
        }
        match self.uid {
            Some(uid) => {
                enc.put_bool(true);
                enc.put_u32(uid);
            }
            None => enc.put_bool(false),
        }
        match self.gid {
            Some(gid) => {
                enc.put_bool(true);
                enc.put_u32(gid);
            }
            None => enc.put_bool(false),
        }
        match self.size {
            Some(size) => {
                enc.put_bool(true);
                enc.put_u64(size);
            }
            None => enc.put_bool(false),
        }
        self.atime.encode(enc);
        self.mtime.encode(enc);
    }
}

/// File creation modes for CREATE (RFC 1813 section 3.3.8).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum createmode3 {
    /// Succeeds whether or not the file exists.
    #[default]
    UNCHECKED = 0,
    /// Fails with NFS3ERR_EXIST if the file exists.
    GUARDED = 1,
    /// Idempotent create keyed on an 8-byte verifier.
    EXCLUSIVE = 2,
}

/// How data is committed to stable storage (RFC 1813 section 3.3.7).
/// The server may upgrade the requested level in its reply.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum stable_how {
    /// Data may be cached; pair with COMMIT for durability.
    #[default]
    UNSTABLE = 0,
    /// This request's data reaches stable storage before the reply.
    DATA_SYNC = 1,
    /// Data and metadata reach stable storage before the reply.
    FILE_SYNC = 2,
}

// ── Status-adjacent attribute blocks ─────────────────────────────────────────
//
// post_op_attr, pre_op_attr and wcc_data surround nearly every result. The
// client does not surface them (GETATTR is the attribute query), but they
// must be consumed on both the OK and failure arms.

/// Consume a `post_op_attr`: bool + optional fattr3.
pub fn skip_post_op_attr(dec: &mut XdrDecoder<'_>) -> Result<()> {
    if dec.get_bool()? {
        fattr3::decode(dec)?;
    }
    Ok(())
}

/// Consume a `pre_op_attr`: bool + optional wcc_attr (size + mtime + ctime).
pub fn skip_pre_op_attr(dec: &mut XdrDecoder<'_>) -> Result<()> {
    if dec.get_bool()? {
        dec.get_u64()?;
        nfstime3::decode(dec)?;
        nfstime3::decode(dec)?;
    }
    Ok(())
}

/// Consume a `wcc_data`: pre_op_attr + post_op_attr.
pub fn skip_wcc_data(dec: &mut XdrDecoder<'_>) -> Result<()> {
    skip_pre_op_attr(dec)?;
    skip_post_op_attr(dec)
}
