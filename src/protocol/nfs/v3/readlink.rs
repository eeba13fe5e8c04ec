//! READLINK procedure (procedure 5) as defined in RFC 1813 section 3.3.5.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, nfs_fh3, skip_post_op_attr};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_READLINK: u32 = 5;

pub fn encode_readlink_args(symlink_fh: &nfs_fh3) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    symlink_fh.encode(&mut enc);
    enc.into_bytes()
}

pub fn decode_readlink_reply(data: &[u8]) -> Result<String> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    // symlink_attributes is present in both arms.
    skip_post_op_attr(&mut dec)?;
    if status != 0 {
        return Err(Error::nfs3(status, "READLINK"));
    }
    dec.get_string()
}

pub async fn readlink(transport: &mut RpcTransport, symlink_fh: &nfs_fh3) -> Result<String> {
    let args = encode_readlink_args(symlink_fh);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_READLINK, &args).await?;
    decode_readlink_reply(&reply)
}
