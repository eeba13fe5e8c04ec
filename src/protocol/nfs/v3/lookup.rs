//! LOOKUP procedure (procedure 3) as defined in RFC 1813 section 3.3.3.
//!
//! Resolves one name inside a directory to a file handle. The OK arm carries
//! the object handle plus two post-op attribute blocks (object then
//! directory); the failure arm carries the directory's attributes only.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, nfs_fh3, skip_post_op_attr};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_LOOKUP: u32 = 3;

pub fn encode_lookup_args(dir: &nfs_fh3, name: &str) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    dir.encode(&mut enc);
    enc.put_string(name);
    enc.into_bytes()
}

pub fn decode_lookup_reply(data: &[u8]) -> Result<nfs_fh3> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    if status != 0 {
        skip_post_op_attr(&mut dec)?; // dir_attributes
        return Err(Error::nfs3(status, "LOOKUP"));
    }
    let fh = nfs_fh3::decode(&mut dec)?;
    skip_post_op_attr(&mut dec)?; // obj_attributes
    skip_post_op_attr(&mut dec)?; // dir_attributes
    Ok(fh)
}

pub async fn lookup(transport: &mut RpcTransport, dir: &nfs_fh3, name: &str) -> Result<nfs_fh3> {
    let args = encode_lookup_args(dir, name);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_LOOKUP, &args).await?;
    decode_lookup_reply(&reply)
}
