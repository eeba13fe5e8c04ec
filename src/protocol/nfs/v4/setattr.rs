//! SETATTR operation (RFC 7530 section 16.30).
//!
//! Takes a stateid: the all-zero anonymous stateid is valid when no open
//! state is involved (and required for size changes only when the file is
//! not open).

use crate::error::{Error, Result};
use crate::protocol::nfs::v4::{self, attr, stateid4};
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

pub fn encode_setattr(enc: &mut XdrEncoder, stateid: &stateid4, attrs: &attr::sattr4) {
    enc.put_u32(v4::OP_SETATTR);
    stateid.encode(enc);
    attr::encode_fattr4(enc, attrs);
}

pub fn decode_setattr_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "SETATTR"));
    }
    // attrsset bitmap, discarded
    attr::decode_bitmap4(dec)?;
    Ok(())
}
