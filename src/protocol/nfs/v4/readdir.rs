//! READDIR operation (RFC 7530 section 16.24).
//!
//! Same cookie/cookieverf pagination discipline as NFSv3 READDIR, but each
//! entry carries a fattr4 selected by the request's attribute bitmap
//! instead of a bare fileid.

use crate::error::{Error, Result};
use crate::protocol::nfs::v4::{self, attr, verifier4};
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

/// One directory entry with its requested attributes.
#[derive(Clone, Debug, Default)]
pub struct DirEntry4 {
    pub cookie: u64,
    pub name: String,
    pub attrs: attr::fattr4,
}

/// One page of READDIR results.
#[derive(Clone, Debug, Default)]
pub struct ReaddirPage4 {
    pub entries: Vec<DirEntry4>,
    pub eof: bool,
    pub cookieverf: verifier4,
}

pub fn encode_readdir(
    enc: &mut XdrEncoder,
    cookie: u64,
    cookieverf: &verifier4,
    dircount: u32,
    maxcount: u32,
    attr_ids: &[u32],
) {
    enc.put_u32(v4::OP_READDIR);
    enc.put_u64(cookie);
    enc.put_fixed_opaque(cookieverf);
    enc.put_u32(dircount);
    enc.put_u32(maxcount);
    attr::encode_attr_request(enc, attr_ids);
}

pub fn decode_readdir_result(dec: &mut XdrDecoder<'_>) -> Result<ReaddirPage4> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "READDIR"));
    }

    let mut page = ReaddirPage4 { cookieverf: dec.get_fixed_array()?, ..Default::default() };

    // dirlist4: value_follows + entry4 list + eof
    while dec.get_bool()? {
        page.entries.push(DirEntry4 {
            cookie: dec.get_u64()?,
            name: dec.get_string()?,
            attrs: attr::decode_fattr4(dec)?,
        });
    }
    page.eof = dec.get_bool()?;
    Ok(page)
}
