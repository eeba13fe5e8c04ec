//! RENAME procedure (procedure 14) as defined in RFC 1813 section 3.3.14.
//!
//! POSIX-style rename: atomically replaces an existing target. The reply
//! carries two wcc_data blocks (source directory, then target directory) in
//! both arms.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, nfs_fh3, skip_wcc_data};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_RENAME: u32 = 14;

pub fn encode_rename_args(
    from_dir: &nfs_fh3,
    from_name: &str,
    to_dir: &nfs_fh3,
    to_name: &str,
) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    from_dir.encode(&mut enc);
    enc.put_string(from_name);
    to_dir.encode(&mut enc);
    enc.put_string(to_name);
    enc.into_bytes()
}

pub fn decode_rename_reply(data: &[u8]) -> Result<()> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    skip_wcc_data(&mut dec)?; // fromdir_wcc
    skip_wcc_data(&mut dec)?; // todir_wcc
    if status != 0 {
        return Err(Error::nfs3(status, "RENAME"));
    }
    Ok(())
}

pub async fn rename(
    transport: &mut RpcTransport,
    from_dir: &nfs_fh3,
    from_name: &str,
    to_dir: &nfs_fh3,
    to_name: &str,
) -> Result<()> {
    let args = encode_rename_args(from_dir, from_name, to_dir, to_name);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_RENAME, &args).await?;
    decode_rename_reply(&reply)
}
