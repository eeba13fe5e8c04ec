//! ONC RPC (Remote Procedure Call) client implementation as specified in
//! RFC 5531 (previously RFC 1057).
//!
//! The RPC protocol enables programs to call procedures on remote systems as
//! if they were local calls. It is the foundation for all NFS operations.
//! This module implements the client half of RPC version 2:
//!
//! 1. CALL message construction with AUTH_NONE or AUTH_SYS credentials
//! 2. Message framing for TCP using the Record Marking Standard
//! 3. Reply record reassembly from one or more fragments
//! 4. Reply envelope validation (message type, reply status, accept status)
//!
//! A [`RpcTransport`] owns one TCP connection and serializes calls on it:
//! `call()` takes `&mut self`, so at most one call is outstanding per
//! transport and a simple monotonic xid counter is sufficient. Callers that
//! want parallelism open one transport per task.

mod transport;
mod wire;

pub use transport::RpcTransport;
pub use wire::{add_record_mark, build_call_message, parse_reply, read_record};

/// RPC protocol version, always 2 on the wire.
pub const RPC_VERSION: u32 = 2;

/// Message type discriminants (RFC 5531 section 9).
pub const MSG_CALL: u32 = 0;
pub const MSG_REPLY: u32 = 1;

/// Reply status: the call was accepted and processed.
pub const MSG_ACCEPTED: u32 = 0;
/// Reply status: the call was denied.
pub const MSG_DENIED: u32 = 1;

/// Accept status: the call completed and returned a valid result.
pub const ACCEPT_SUCCESS: u32 = 0;

/// Authentication flavor: no authentication.
pub const AUTH_NONE: u32 = 0;
/// Authentication flavor: UNIX-style uid/gid credentials.
pub const AUTH_SYS: u32 = 1;

/// Upper bound on a reassembled RPC record. A reply larger than this is
/// treated as a framing error rather than an allocation request.
pub const MAX_RPC_RECORD_LENGTH: usize = 8 * 1024 * 1024;

/// UNIX-style credentials for AUTH_SYS (RFC 5531 Appendix A).
///
/// Encoded as `{stamp, machinename, uid, gid, gids<>}` inside the opaque
/// credential body of a CALL message. The verifier stays AUTH_NONE.
#[derive(Clone, Debug, Default)]
pub struct AuthSys {
    /// Arbitrary client-generated stamp.
    pub stamp: u32,
    /// Name of the caller's machine.
    pub machinename: String,
    /// Effective user id of the caller.
    pub uid: u32,
    /// Effective group id of the caller.
    pub gid: u32,
    /// Supplementary group ids.
    pub gids: Vec<u32>,
}

impl AuthSys {
    /// Credentials for `uid`/`gid` with no supplementary groups.
    pub fn new(machinename: impl Into<String>, uid: u32, gid: u32) -> AuthSys {
        AuthSys { stamp: 0, machinename: machinename.into(), uid, gid, gids: Vec::new() }
    }
}
