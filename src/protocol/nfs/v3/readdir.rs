//! READDIR procedure (procedure 16) as defined in RFC 1813 section 3.3.16.
//!
//! Entries arrive as an XDR linked list: a value-follows boolean precedes
//! each entry and a final false terminates the list, followed by the eof
//! flag. Pagination: the first call passes cookie 0 and a zeroed verifier;
//! every later page passes the *last* entry's cookie and the cookieverf the
//! server returned. A server that rejects the pair answers
//! NFS3ERR_BAD_COOKIE, and the only recovery is restarting from cookie 0.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, cookieverf3, nfs_fh3, skip_post_op_attr};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_READDIR: u32 = 16;

/// One directory entry.
#[derive(Clone, Debug, Default)]
pub struct entry3 {
    /// File id (inode number) of the entry.
    pub fileid: u64,
    /// Entry name.
    pub name: String,
    /// Pagination cursor positioned just after this entry.
    pub cookie: u64,
}

/// One page of READDIR results.
#[derive(Clone, Debug, Default)]
pub struct ReaddirPage {
    pub entries: Vec<entry3>,
    pub eof: bool,
    /// Must be echoed on the next page request.
    pub cookieverf: cookieverf3,
}

pub fn encode_readdir_args(
    dir: &nfs_fh3,
    cookie: u64,
    cookieverf: &cookieverf3,
    count: u32,
) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    dir.encode(&mut enc);
    enc.put_u64(cookie);
    enc.put_fixed_opaque(cookieverf);
    enc.put_u32(count);
    enc.into_bytes()
}

pub fn decode_readdir_reply(data: &[u8]) -> Result<ReaddirPage> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    // dir_attributes is present in both arms.
    skip_post_op_attr(&mut dec)?;
    if status != 0 {
        return Err(Error::nfs3(status, "READDIR"));
    }

    let mut page = ReaddirPage { cookieverf: dec.get_fixed_array()?, ..Default::default() };

    while dec.get_bool()? {
        page.entries.push(entry3 {
            fileid: dec.get_u64()?,
            name: dec.get_string()?,
            cookie: dec.get_u64()?,
        });
    }
    page.eof = dec.get_bool()?;
    Ok(page)
}

/// One READDIR RPC, returning a single page.
pub async fn readdir_page(
    transport: &mut RpcTransport,
    dir: &nfs_fh3,
    cookie: u64,
    cookieverf: &cookieverf3,
    count: u32,
) -> Result<ReaddirPage> {
    let args = encode_readdir_args(dir, cookie, cookieverf, count);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_READDIR, &args).await?;
    decode_readdir_reply(&reply)
}

/// Auto-paginate until eof and return all entries.
pub async fn readdir(
    transport: &mut RpcTransport,
    dir: &nfs_fh3,
    count: u32,
) -> Result<Vec<entry3>> {
    let mut all = Vec::new();
    let mut cookie = 0u64;
    let mut cookieverf = cookieverf3::default();

    loop {
        let page = readdir_page(transport, dir, cookie, &cookieverf, count).await?;
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
