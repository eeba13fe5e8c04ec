//! MKDIR procedure (procedure 9) as defined in RFC 1813 section 3.3.9.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{self, nfs_fh3, sattr3, skip_post_op_attr, skip_wcc_data};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_MKDIR: u32 = 9;

pub fn encode_mkdir_args(dir: &nfs_fh3, name: &str, attrs: &sattr3) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    dir.encode(&mut enc);
    enc.put_string(name);
    attrs.encode(&mut enc);
    enc.into_bytes()
}

pub fn decode_mkdir_reply(data: &[u8]) -> Result<nfs_fh3> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    if status != 0 {
        skip_wcc_data(&mut dec)?; // dir_wcc
        return Err(Error::nfs3(status, "MKDIR"));
    }
    if !dec.get_bool()? {
        return Err(Error::MissingFileHandle { proc: "MKDIR" });
    }
    let fh = nfs_fh3::decode(&mut dec)?;
    skip_post_op_attr(&mut dec)?; // obj_attributes
    skip_wcc_data(&mut dec)?; // dir_wcc
    Ok(fh)
}

pub async fn mkdir(
    transport: &mut RpcTransport,
    dir: &nfs_fh3,
    name: &str,
    attrs: &sattr3,
) -> Result<nfs_fh3> {
    let args = encode_mkdir_args(dir, name, attrs);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_MKDIR, &args).await?;
    decode_mkdir_reply(&reply)
}
