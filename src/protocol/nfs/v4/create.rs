//! CREATE operation (RFC 7530 section 16.4), for non-regular files.
//! Regular files are created via OPEN; CREATE here covers directories and
//! symlinks. The createtype4 union puts the link text *before* the name for
//! NF4LNK.

use crate::error::{Error, Result};
use crate::protocol::nfs::v4::{self, attr, ftype4, skip_change_info4};
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

pub fn encode_create_dir(enc: &mut XdrEncoder, name: &str, attrs: &attr::sattr4) {
    enc.put_u32(v4::OP_CREATE);
    enc.put_u32(ftype4::NF4DIR as u32);
    enc.put_string(name);
    attr::encode_fattr4(enc, attrs);
}

pub fn encode_create_symlink(enc: &mut XdrEncoder, name: &str, target: &str, attrs: &attr::sattr4) {
    enc.put_u32(v4::OP_CREATE);
    enc.put_u32(ftype4::NF4LNK as u32);
    enc.put_string(target); // linkdata in the createtype4 union
    enc.put_string(name);
    attr::encode_fattr4(enc, attrs);
}

pub fn decode_create_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "CREATE"));
    }
    skip_change_info4(dec)?; // cinfo
    attr::decode_bitmap4(dec)?; // attrset, discarded
    Ok(())
}
