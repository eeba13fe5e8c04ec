//! GETATTR operation (RFC 7530 section 16.7).

use crate::error::{Error, Result};
use crate::protocol::nfs::v4::{self, attr};
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

pub fn encode_getattr(enc: &mut XdrEncoder, attr_ids: &[u32]) {
    enc.put_u32(v4::OP_GETATTR);
    attr::encode_attr_request(enc, attr_ids);
}

pub fn decode_getattr_result(dec: &mut XdrDecoder<'_>) -> Result<attr::fattr4> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "GETATTR"));
    }
    attr::decode_fattr4(dec)
}
