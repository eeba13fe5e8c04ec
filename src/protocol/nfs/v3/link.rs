//! LINK procedure (procedure 15) as defined in RFC 1813 section 3.3.15.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, nfs_fh3, skip_post_op_attr, skip_wcc_data};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_LINK: u32 = 15;

pub fn encode_link_args(file: &nfs_fh3, link_dir: &nfs_fh3, link_name: &str) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    file.encode(&mut enc);
    link_dir.encode(&mut enc);
    enc.put_string(link_name);
    enc.into_bytes()
}

pub fn decode_link_reply(data: &[u8]) -> Result<()> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    // file_attributes and linkdir_wcc are present in both arms.
    skip_post_op_attr(&mut dec)?;
    skip_wcc_data(&mut dec)?;
    if status != 0 {
        return Err(Error::nfs3(status, "LINK"));
    }
    Ok(())
}

pub async fn link(
    transport: &mut RpcTransport,
    file: &nfs_fh3,
    link_dir: &nfs_fh3,
    link_name: &str,
) -> Result<()> {
    let args = encode_link_args(file, link_dir, link_name);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_LINK, &args).await?;
    decode_link_reply(&reply)
}
