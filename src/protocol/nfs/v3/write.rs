//! WRITE procedure (procedure 7) as defined in RFC 1813 section 3.3.7.
//!
//! The `stable` argument chooses between cached (UNSTABLE) and synchronous
//! (DATA_SYNC / FILE_SYNC) writes; the server reports the level it actually
//! achieved, which may be stronger than requested. The returned verifier
//! changes when the server restarts: a client holding UNSTABLE writes must
//! compare it against the verifier returned by COMMIT and rewrite on
//! mismatch.

use num_traits::FromPrimitive as _;

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, nfs_fh3, skip_wcc_data, stable_how, writeverf3};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_WRITE: u32 = 7;

/// Result of one WRITE RPC.
#[derive(Copy, Clone, Debug, Default)]
pub struct WriteResult {
    /// Bytes actually written; may be shorter than requested.
    pub count: u32,
    /// Commitment level the server achieved.
    pub committed: stable_how,
    /// Server instance verifier, compared across WRITE/COMMIT to detect
    /// restarts.
    pub verf: writeverf3,
}

pub fn encode_write_args(fh: &nfs_fh3, offset: u64, stable: stable_how, data: &[u8]) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    fh.encode(&mut enc);
    enc.put_u64(offset);
    enc.put_u32(data.len() as u32); // count
    enc.put_u32(stable as u32);
    enc.put_opaque(data);
    enc.into_bytes()
}

pub fn decode_write_reply(data: &[u8]) -> Result<WriteResult> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    // file_wcc is present in both arms.
    skip_wcc_data(&mut dec)?;
    if status != 0 {
        return Err(Error::nfs3(status, "WRITE"));
    }
    let count = dec.get_u32()?;
    let committed = stable_how::from_u32(dec.get_u32()?).unwrap_or_default();
    let verf = dec.get_fixed_array()?;
    Ok(WriteResult { count, committed, verf })
}

pub async fn write(
    transport: &mut RpcTransport,
    fh: &nfs_fh3,
    offset: u64,
    stable: stable_how,
    data: &[u8],
) -> Result<WriteResult> {
    let args = encode_write_args(fh, offset, stable, data);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_WRITE, &args).await?;
    decode_write_reply(&reply)
}
