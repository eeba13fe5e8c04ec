//! GETATTR procedure (procedure 1) as defined in RFC 1813 section 3.3.1.
//!
//! Retrieves the attributes of a file system object. This is the only
//! procedure whose OK arm carries a bare `fattr3` rather than a
//! `post_op_attr`, and its failure arm carries nothing after the status.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, fattr3, nfs_fh3};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_GETATTR: u32 = 1;

pub fn encode_getattr_args(fh: &nfs_fh3) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    fh.encode(&mut enc);
    enc.into_bytes()
}

pub fn decode_getattr_reply(data: &[u8]) -> Result<fattr3> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs3(status, "GETATTR"));
    }
    fattr3::decode(&mut dec)
}

pub async fn getattr(transport: &mut RpcTransport, fh: &nfs_fh3) -> Result<fattr3> {
    let args = encode_getattr_args(fh);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_GETATTR, &args).await?;
    decode_getattr_reply(&reply)
}
