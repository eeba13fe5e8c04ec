//! ACCESS procedure (procedure 4) as defined in RFC 1813 section 3.3.4.
//!
//! Checks access rights for the caller's credentials. The granted mask may
//! be a subset of the request, and servers are also free to report
//! permissions that were not asked about, so callers should mask the result
//! rather than compare it for equality.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, nfs_fh3, skip_post_op_attr};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_ACCESS: u32 = 4;

pub fn encode_access_args(fh: &nfs_fh3, access_mask: u32) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    fh.encode(&mut enc);
    enc.put_u32(access_mask);
    enc.into_bytes()
}

pub fn decode_access_reply(data: &[u8]) -> Result<u32> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    // obj_attributes is present in both arms.
    skip_post_op_attr(&mut dec)?;
    if status != 0 {
        return Err(Error::nfs3(status, "ACCESS"));
    }
    dec.get_u32()
}

pub async fn access(transport: &mut RpcTransport, fh: &nfs_fh3, access_mask: u32) -> Result<u32> {
    let args = encode_access_args(fh, access_mask);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_ACCESS, &args).await?;
    decode_access_reply(&reply)
}
