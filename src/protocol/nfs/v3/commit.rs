//! COMMIT procedure (procedure 21) as defined in RFC 1813 section 3.3.21.
//!
//! Flushes UNSTABLE writes to stable storage. `offset=0, count=0` commits
//! the entire file. The returned verifier must match the verifier from the
//! WRITEs being committed; a mismatch means the server restarted and the
//! writes must be sent again.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, nfs_fh3, skip_wcc_data, writeverf3};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_COMMIT: u32 = 21;

pub fn encode_commit_args(fh: &nfs_fh3, offset: u64, count: u32) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    fh.encode(&mut enc);
    enc.put_u64(offset);
    enc.put_u32(count);
    enc.into_bytes()
}

pub fn decode_commit_reply(data: &[u8]) -> Result<writeverf3> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    // file_wcc is present in both arms.
    skip_wcc_data(&mut dec)?;
    if status != 0 {
        return Err(Error::nfs3(status, "COMMIT"));
    }
    dec.get_fixed_array()
}

pub async fn commit(
    transport: &mut RpcTransport,
    fh: &nfs_fh3,
    offset: u64,
    count: u32,
) -> Result<writeverf3> {
    let args = encode_commit_args(fh, offset, count);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_COMMIT, &args).await?;
    decode_commit_reply(&reply)
}
