//! ACCESS operation (RFC 7530 section 16.1).

use crate::error::{Error, Result};
use crate::protocol::nfs::v4;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

/// Result of ACCESS: which of the requested bits the server evaluated, and
/// which it grants.
#[derive(Copy, Clone, Debug, Default)]
pub struct Access4Result {
    pub supported: u32,
    pub access: u32,
}

pub fn encode_access(enc: &mut XdrEncoder, access_mask: u32) {
    enc.put_u32(v4::OP_ACCESS);
    enc.put_u32(access_mask);
}

pub fn decode_access_result(dec: &mut XdrDecoder<'_>) -> Result<Access4Result> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "ACCESS"));
    }
    Ok(Access4Result { supported: dec.get_u32()?, access: dec.get_u32()? })
}
