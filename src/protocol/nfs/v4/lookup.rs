//! LOOKUP operation (RFC 7530 section 16.13). Sets the current FH to the
//! named entry; pair with GETFH to retrieve the handle.

use crate::error::{Error, Result};
use crate::protocol::nfs::v4;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

pub fn encode_lookup(enc: &mut XdrEncoder, name: &str) {
    enc.put_u32(v4::OP_LOOKUP);
    enc.put_string(name);
}

pub fn decode_lookup_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "LOOKUP"));
    }
    Ok(())
}
