//! SETATTR procedure (procedure 2) as defined in RFC 1813 section 3.3.2.
//!
//! Changes one or more attributes of a file system object. The optional
//! guard makes the change conditional on the object's current ctime; a
//! mismatch fails with NFS3ERR_NOT_SYNC.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, nfs_fh3, nfstime3, sattr3, skip_wcc_data};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_SETATTR: u32 = 2;

/// Guard condition for SETATTR: only apply if the object's ctime matches.
#[derive(Copy, Clone, Debug, Default)]
pub struct sattrguard3 {
    pub ctime: Option<nfstime3>,
}

pub fn encode_setattr_args(fh: &nfs_fh3, attrs: &sattr3, guard: &sattrguard3) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    fh.encode(&mut enc);
    attrs.encode(&mut enc);
    match guard.ctime {
        Some(ctime) => {
            enc.put_bool(true);
            enc.put_u32(ctime.seconds);
            enc.put_u32(ctime.nseconds);
        }
        None => enc.put_bool(false),
    }
    enc.into_bytes()
}

pub fn decode_setattr_reply(data: &[u8]) -> Result<()> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    // obj_wcc is present in both the OK and failure arms.
    skip_wcc_data(&mut dec)?;
    if status != 0 {
        return Err(Error::nfs3(status, "SETATTR"));
    }
    Ok(())
}

pub async fn setattr(
    transport: &mut RpcTransport,
    fh: &nfs_fh3,
    attrs: &sattr3,
    guard: &sattrguard3,
) -> Result<()> {
    let args = encode_setattr_args(fh, attrs, guard);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_SETATTR, &args).await?;
    decode_setattr_reply(&reply)
}
