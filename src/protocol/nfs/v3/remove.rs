//! REMOVE procedure (procedure 12) as defined in RFC 1813 section 3.3.12.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, nfs_fh3, skip_wcc_data};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_REMOVE: u32 = 12;

pub fn encode_remove_args(dir: &nfs_fh3, name: &str) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    dir.encode(&mut enc);
    enc.put_string(name);
    enc.into_bytes()
}

pub fn decode_remove_reply(data: &[u8]) -> Result<()> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    // dir_wcc is present in both arms.
    skip_wcc_data(&mut dec)?;
    if status != 0 {
        return Err(Error::nfs3(status, "REMOVE"));
    }
    Ok(())
}

pub async fn remove(transport: &mut RpcTransport, dir: &nfs_fh3, name: &str) -> Result<()> {
    let args = encode_remove_args(dir, name);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_REMOVE, &args).await?;
    decode_remove_reply(&reply)
}
