//! WRITE operation (RFC 7530 section 16.36).

use num_traits::FromPrimitive as _;

use crate::error::{Error, Result};
use crate::protocol::nfs::v4::{self, stable_how4, stateid4, WriteResult4};
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

pub fn encode_write(
    enc: &mut XdrEncoder,
    stateid: &stateid4,
    offset: u64,
    stable: stable_how4,
    data: &[u8],
) {
    enc.put_u32(v4::OP_WRITE);
    stateid.encode(enc);
    enc.put_u64(offset);
    enc.put_u32(stable as u32);
    enc.put_opaque(data);
}

pub fn decode_write_result(dec: &mut XdrDecoder<'_>) -> Result<WriteResult4> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "WRITE"));
    }
    Ok(WriteResult4 {
        count: dec.get_u32()?,
        committed: stable_how4::from_u32(dec.get_u32()?).unwrap_or_default(),
        verf: dec.get_fixed_array()?,
    })
}
