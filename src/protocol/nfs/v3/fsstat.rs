//! FSSTAT procedure (procedure 18) as defined in RFC 1813 section 3.3.18.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, nfs_fh3, skip_post_op_attr};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_FSSTAT: u32 = 18;

/// Filesystem capacity and usage statistics.
#[derive(Copy, Clone, Debug, Default)]
pub struct FsstatResult {
    /// Total capacity in bytes.
    pub tbytes: u64,
    /// Free bytes.
    pub fbytes: u64,
    /// Bytes available to non-privileged users.
    pub abytes: u64,
    /// Total file slots.
    pub tfiles: u64,
    /// Free file slots.
    pub ffiles: u64,
    /// File slots available to non-privileged users.
    pub afiles: u64,
    /// Server-estimated seconds for which the values stay valid.
    pub invarsec: u32,
}

pub fn encode_fsstat_args(root: &nfs_fh3) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    root.encode(&mut enc);
    enc.into_bytes()
}

pub fn decode_fsstat_reply(data: &[u8]) -> Result<FsstatResult> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    // obj_attributes is present in both arms.
    skip_post_op_attr(&mut dec)?;
    if status != 0 {
        return Err(Error::nfs3(status, "FSSTAT"));
    }
    Ok(FsstatResult {
        tbytes: dec.get_u64()?,
        fbytes: dec.get_u64()?,
        abytes: dec.get_u64()?,
        tfiles: dec.get_u64()?,
        ffiles: dec.get_u64()?,
        afiles: dec.get_u64()?,
        invarsec: dec.get_u32()?,
    })
}

pub async fn fsstat(transport: &mut RpcTransport, root: &nfs_fh3) -> Result<FsstatResult> {
    let args = encode_fsstat_args(root);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_FSSTAT, &args).await?;
    decode_fsstat_reply(&reply)
}
