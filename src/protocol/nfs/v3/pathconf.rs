//! PATHCONF procedure (procedure 20) as defined in RFC 1813 section 3.3.20.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, nfs_fh3, skip_post_op_attr};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_PATHCONF: u32 = 20;

/// POSIX pathconf values for a filesystem object.
#[derive(Copy, Clone, Debug, Default)]
pub struct PathconfResult {
    /// Maximum hard-link count for a file.
    pub linkmax: u32,
    /// Maximum filename component length.
    pub name_max: u32,
    /// Server errors on names longer than `name_max` rather than truncating.
    pub no_trunc: bool,
    /// Only a privileged user may change file ownership.
    pub chown_restricted: bool,
    /// Server ignores case when comparing names.
    pub case_insensitive: bool,
    /// Server preserves case when storing names.
    pub case_preserving: bool,
}

pub fn encode_pathconf_args(fh: &nfs_fh3) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    fh.encode(&mut enc);
    enc.into_bytes()
}

pub fn decode_pathconf_reply(data: &[u8]) -> Result<PathconfResult> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    // obj_attributes is present in both arms.
    skip_post_op_attr(&mut dec)?;
    if status != 0 {
        return Err(Error::nfs3(status, "PATHCONF"));
    }
    Ok(PathconfResult {
        linkmax: dec.get_u32()?,
        name_max: dec.get_u32()?,
        no_trunc: dec.get_bool()?,
        chown_restricted: dec.get_bool()?,
        case_insensitive: dec.get_bool()?,
        case_preserving: dec.get_bool()?,
    })
}

pub async fn pathconf(transport: &mut RpcTransport, fh: &nfs_fh3) -> Result<PathconfResult> {
    let args = encode_pathconf_args(fh);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_PATHCONF, &args).await?;
    decode_pathconf_reply(&reply)
}
