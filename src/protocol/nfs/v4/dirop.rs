//! REMOVE and RENAME operations (RFC 7530 sections 16.25, 16.26).
//!
//! RENAME acts between the saved FH (source directory) and the current FH
//! (target directory); the caller frames it as PUTFH(src) + SAVEFH +
//! PUTFH(dst) + RENAME.

use crate::error::{Error, Result};
use crate::protocol::nfs::v4::{self, skip_change_info4};
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

pub fn encode_remove(enc: &mut XdrEncoder, name: &str) {
    enc.put_u32(v4::OP_REMOVE);
    enc.put_string(name);
}

pub fn decode_remove_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "REMOVE"));
    }
    skip_change_info4(dec)?; // cinfo
    Ok(())
}

pub fn encode_rename(enc: &mut XdrEncoder, oldname: &str, newname: &str) {
    enc.put_u32(v4::OP_RENAME);
    enc.put_string(oldname);
    enc.put_string(newname);
}

pub fn decode_rename_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "RENAME"));
    }
    skip_change_info4(dec)?; // source_cinfo
    skip_change_info4(dec)?; // target_cinfo
    Ok(())
}
