//! READLINK operation (RFC 7530 section 16.25).

use crate::error::{Error, Result};
use crate::protocol::nfs::v4;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

pub fn encode_readlink(enc: &mut XdrEncoder) {
    enc.put_u32(v4::OP_READLINK);
}

pub fn decode_readlink_result(dec: &mut XdrDecoder<'_>) -> Result<String> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "READLINK"));
    }
    dec.get_string()
}
