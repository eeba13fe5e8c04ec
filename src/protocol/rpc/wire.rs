//! RPC message framing as specified in RFC 5531 section 11.
//!
//! TCP is a byte stream, so RPC messages are delimited with the Record
//! Marking Standard: each fragment is prefixed by a 4-byte mark whose
//! highest bit flags the last fragment of a record and whose lower 31 bits
//! give the fragment length. This client always sends single-fragment
//! records (last-fragment bit set) but reassembles multi-fragment replies.
//!
//! The functions here are pure over byte buffers (plus an `AsyncRead` for
//! record reassembly) and are exercised directly by the wire-format tests.

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

use crate::error::{Error, Result};
use crate::protocol::rpc::{self, AuthSys};
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

/// Builds a complete CALL message (RFC 5531 section 9), without framing.
///
/// Layout: xid, msg_type=CALL, rpcvers=2, prog, vers, proc, credential,
/// verifier, then `args` verbatim. `auth` selects the credential: `None`
/// encodes AUTH_NONE (flavor 0, empty body), `Some` encodes an AUTH_SYS
/// opaque body. The verifier is always AUTH_NONE.
pub fn build_call_message(
    xid: u32,
    prog: u32,
    vers: u32,
    proc: u32,
    args: &[u8],
    auth: Option<&AuthSys>,
) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    enc.put_u32(xid);
    enc.put_u32(rpc::MSG_CALL);
    enc.put_u32(rpc::RPC_VERSION);
    enc.put_u32(prog);
    enc.put_u32(vers);
    enc.put_u32(proc);

    match auth {
        Some(auth) => {
            let mut cred = XdrEncoder::new();
            cred.put_u32(auth.stamp);
            cred.put_string(&auth.machinename);
            cred.put_u32(auth.uid);
            cred.put_u32(auth.gid);
            cred.put_u32(auth.gids.len() as u32);
            for gid in &auth.gids {
                cred.put_u32(*gid);
            }
            enc.put_u32(rpc::AUTH_SYS);
            enc.put_opaque(cred.bytes());
        }
        None => {
            enc.put_u32(rpc::AUTH_NONE);
            enc.put_u32(0);
        }
    }

    // Verifier is always AUTH_NONE
    enc.put_u32(rpc::AUTH_NONE);
    enc.put_u32(0);

    enc.put_raw(args);
    enc.into_bytes()
}

/// Prefixes `payload` with a record mark carrying the last-fragment bit.
///
/// Outbound messages are always sent as a single fragment, so bit 31 of the
/// mark is always set.
pub fn add_record_mark(payload: &[u8]) -> Vec<u8> {
    let mark = (1u32 << 31) | payload.len() as u32;
    let mut framed = Vec::with_capacity(4 + payload.len());
    framed.extend_from_slice(&mark.to_be_bytes());
    framed.extend_from_slice(payload);
    framed
}

/// Reads one complete RPC record, reassembling fragments until a mark with
/// the last-fragment bit has been consumed.
///
/// A record that would exceed [`rpc::MAX_RPC_RECORD_LENGTH`] is rejected
/// before its payload is read.
pub async fn read_record(stream: &mut (impl AsyncRead + Unpin)) -> Result<Vec<u8>> {
    let mut record = Vec::new();

    loop {
        let mut mark_buf = [0u8; 4];
        stream.read_exact(&mut mark_buf).await?;
        let mark = u32::from_be_bytes(mark_buf);
        let is_last = mark & (1 << 31) != 0;
        let length = (mark & ((1 << 31) - 1)) as usize;
        trace!("reading fragment length:{}, last:{}", length, is_last);

        if record.len().saturating_add(length) > rpc::MAX_RPC_RECORD_LENGTH {
            return Err(Error::RpcEnvelope(format!(
                "RPC record length {} exceeds max {}",
                record.len().saturating_add(length),
                rpc::MAX_RPC_RECORD_LENGTH
            )));
        }

        let offset = record.len();
        record.resize(offset + length, 0);
        stream.read_exact(&mut record[offset..]).await?;

        if is_last {
            return Ok(record);
        }
    }
}

/// Validates the reply envelope of a reassembled record and returns the
/// procedure-specific result bytes that follow it.
///
/// Consumes, in order: xid (ignored; calls are strictly serialized per
/// transport), msg_type (must be REPLY), reply_stat (must be MSG_ACCEPTED),
/// the server verifier (flavor + opaque body, discarded), and accept_stat
/// (must be SUCCESS). Any deviation is an [`Error::RpcEnvelope`].
pub fn parse_reply(record: &[u8]) -> Result<Vec<u8>> {
    let mut dec = XdrDecoder::new(record);

    let _xid = dec.get_u32()?;

    let msg_type = dec.get_u32()?;
    if msg_type != rpc::MSG_REPLY {
        return Err(Error::RpcEnvelope(format!("expected REPLY, got msg_type={}", msg_type)));
    }

    let reply_stat = dec.get_u32()?;
    if reply_stat != rpc::MSG_ACCEPTED {
        return Err(Error::RpcEnvelope(format!("message denied (reply_stat={})", reply_stat)));
    }

    let _verf_flavor = dec.get_u32()?;
    let _verf_body = dec.get_opaque()?;

    let accept_stat = dec.get_u32()?;
    if accept_stat != rpc::ACCEPT_SUCCESS {
        return Err(Error::RpcEnvelope(format!("call not accepted (accept_stat={})", accept_stat)));
    }

    Ok(dec.get_remaining())
}
