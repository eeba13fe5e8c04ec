//! READDIRPLUS procedure (procedure 17) as defined in RFC 1813 section
//! 3.3.17.
//!
//! Like READDIR but each entry optionally carries its attributes and file
//! handle inline, saving a LOOKUP + GETATTR pair per entry when walking a
//! tree. `dircount` bounds the directory-information portion of the reply
//! and `maxcount` the full reply; servers differ on the exact accounting, so
//! treat both as hints.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, cookieverf3, fattr3, nfs_fh3, skip_post_op_attr};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_READDIRPLUS: u32 = 17;

/// One directory entry with optional inline attributes and handle.
#[derive(Clone, Debug, Default)]
pub struct entryplus3 {
    pub fileid: u64,
    pub name: String,
    pub cookie: u64,
    pub attrs: Option<fattr3>,
    pub fh: Option<nfs_fh3>,
}

/// One page of READDIRPLUS results.
#[derive(Clone, Debug, Default)]
pub struct ReaddirplusPage {
    pub entries: Vec<entryplus3>,
    pub eof: bool,
    pub cookieverf: cookieverf3,
}

pub fn encode_readdirplus_args(
    dir: &nfs_fh3,
    cookie: u64,
    cookieverf: &cookieverf3,
    dircount: u32,
    maxcount: u32,
) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    dir.encode(&mut enc);
    enc.put_u64(cookie);
    enc.put_fixed_opaque(cookieverf);
    enc.put_u32(dircount);
    enc.put_u32(maxcount);
    enc.into_bytes()
}

pub fn decode_readdirplus_reply(data: &[u8]) -> Result<ReaddirplusPage> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    // dir_attributes is present in both arms.
    skip_post_op_attr(&mut dec)?;
    if status != 0 {
        return Err(Error::nfs3(status, "READDIRPLUS"));
    }

    let mut page = ReaddirplusPage { cookieverf: dec.get_fixed_array()?, ..Default::default() };

    while dec.get_bool()? {
        let mut entry = entryplus3 {
            fileid: dec.get_u64()?,
            name: dec.get_string()?,
            cookie: dec.get_u64()?,
            ..Default::default()
        };
        if dec.get_bool()? {
            entry.attrs = Some(fattr3::decode(&mut dec)?);
        }
        if dec.get_bool()? {
            entry.fh = Some(nfs_fh3::decode(&mut dec)?);
        }
        page.entries.push(entry);
    }
    page.eof = dec.get_bool()?;
    Ok(page)
}

/// One READDIRPLUS RPC, returning a single page.
pub async fn readdirplus_page(
    transport: &mut RpcTransport,
    dir: &nfs_fh3,
    cookie: u64,
    cookieverf: &cookieverf3,
    dircount: u32,
    maxcount: u32,
) -> Result<ReaddirplusPage> {
    let args = encode_readdirplus_args(dir, cookie, cookieverf, dircount, maxcount);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_READDIRPLUS, &args).await?;
    decode_readdirplus_reply(&reply)
}

/// Auto-paginate until eof and return all entries.
pub async fn readdirplus(
    transport: &mut RpcTransport,
    dir: &nfs_fh3,
    dircount: u32,
    maxcount: u32,
) -> Result<Vec<entryplus3>> {
    let mut all = Vec::new();
    let mut cookie = 0u64;
    let mut cookieverf = cookieverf3::default();

    loop {
        let page =
            readdirplus_page(transport, dir, cookie, &cookieverf, dircount, maxcount).await?;
        for entry in page.entries {
            cookie = entry.cookie;
            all.push(entry);
        }
        cookieverf = page.cookieverf;
        if page.eof {
            return Ok(all);
        }
    }
}
