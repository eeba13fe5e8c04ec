//! READ procedure (procedure 6) as defined in RFC 1813 section 3.3.6.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, nfs_fh3, skip_post_op_attr};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_READ: u32 = 6;

/// Result of one READ RPC.
#[derive(Clone, Debug, Default)]
pub struct ReadResult {
    /// Bytes actually read; may be shorter than requested.
    pub data: Vec<u8>,
    /// True if the read reached the end of file.
    pub eof: bool,
}

pub fn encode_read_args(fh: &nfs_fh3, offset: u64, count: u32) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    fh.encode(&mut enc);
    enc.put_u64(offset);
    enc.put_u32(count);
    enc.into_bytes()
}

pub fn decode_read_reply(data: &[u8]) -> Result<ReadResult> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    // file_attributes is present in both arms.
    skip_post_op_attr(&mut dec)?;
    if status != 0 {
        return Err(Error::nfs3(status, "READ"));
    }
    // READ3resok: count, eof, data. The count duplicates the opaque length.
    let _count = dec.get_u32()?;
    let eof = dec.get_bool()?;
    let data = dec.get_opaque()?;
    Ok(ReadResult { data, eof })
}

pub async fn read(
    transport: &mut RpcTransport,
    fh: &nfs_fh3,
    offset: u64,
    count: u32,
) -> Result<ReadResult> {
    let args = encode_read_args(fh, offset, count);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_READ, &args).await?;
    decode_read_reply(&reply)
}
