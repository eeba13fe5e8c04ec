//! FSINFO procedure (procedure 19) as defined in RFC 1813 section 3.3.19.
//!
//! Reports static server capabilities, most importantly the maximum and
//! preferred transfer sizes. Use `rtmax`/`wtmax` to size READ and WRITE
//! batches; requests beyond those limits are truncated or rejected by the
//! server.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, nfs_fh3, nfstime3, skip_post_op_attr};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_FSINFO: u32 = 19;

/// Server supports hard links.
pub const FSF_LINK: u32 = 0x0001;
/// Server supports symbolic links.
pub const FSF_SYMLINK: u32 = 0x0002;
/// Information is identical for every file object on the server.
pub const FSF_HOMOGENEOUS: u32 = 0x0008;
/// Server can set file times via SETATTR.
pub const FSF_CANSETTIME: u32 = 0x0010;

/// Server capabilities and preferred transfer sizes.
#[derive(Copy, Clone, Debug, Default)]
pub struct FsinfoResult {
    /// Maximum bytes per READ request.
    pub rtmax: u32,
    /// Preferred READ transfer size.
    pub rtpref: u32,
    /// Suggested READ size multiple.
    pub rtmult: u32,
    /// Maximum bytes per WRITE request.
    pub wtmax: u32,
    /// Preferred WRITE transfer size.
    pub wtpref: u32,
    /// Suggested WRITE size multiple.
    pub wtmult: u32,
    /// Preferred READDIR request size.
    pub dtpref: u32,
    /// Maximum file size on this filesystem.
    pub maxfilesize: u64,
    /// Server time granularity.
    pub time_delta: nfstime3,
    /// FSF_* bitmask.
    pub properties: u32,
}

pub fn encode_fsinfo_args(root: &nfs_fh3) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    root.encode(&mut enc);
    enc.into_bytes()
}

pub fn decode_fsinfo_reply(data: &[u8]) -> Result<FsinfoResult> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    // obj_attributes is present in both arms.
    skip_post_op_attr(&mut dec)?;
    if status != 0 {
        return Err(Error::nfs3(status, "FSINFO"));
    }
    Ok(FsinfoResult {
        rtmax: dec.get_u32()?,
        rtpref: dec.get_u32()?,
        rtmult: dec.get_u32()?,
        wtmax: dec.get_u32()?,
        wtpref: dec.get_u32()?,
        wtmult: dec.get_u32()?,
        dtpref: dec.get_u32()?,
        maxfilesize: dec.get_u64()?,
        time_delta: nfstime3 { seconds: dec.get_u32()?, nseconds: dec.get_u32()? },
        properties: dec.get_u32()?,
    })
}

pub async fn fsinfo(transport: &mut RpcTransport, root: &nfs_fh3) -> Result<FsinfoResult> {
    let args = encode_fsinfo_args(root);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_FSINFO, &args).await?;
    decode_fsinfo_reply(&reply)
}
