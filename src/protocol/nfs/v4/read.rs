//! READ operation (RFC 7530 section 16.23).

use crate::error::{Error, Result};
use crate::protocol::nfs::v4::{self, stateid4};
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

/// Result of a READ op.
#[derive(Clone, Debug, Default)]
pub struct Read4Result {
    pub data: Vec<u8>,
    pub eof: bool,
}

pub fn encode_read(enc: &mut XdrEncoder, stateid: &stateid4, offset: u64, count: u32) {
    enc.put_u32(v4::OP_READ);
    stateid.encode(enc);
    enc.put_u64(offset);
    enc.put_u32(count);
}

pub fn decode_read_result(dec: &mut XdrDecoder<'_>) -> Result<Read4Result> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "READ"));
    }
    let eof = dec.get_bool()?;
    let data = dec.get_opaque()?;
    Ok(Read4Result { data, eof })
}
