//! CREATE procedure (procedure 8) as defined in RFC 1813 section 3.3.8.
//!
//! Three creation modes: UNCHECKED (succeed even if the file exists),
//! GUARDED (fail with NFS3ERR_EXIST), and EXCLUSIVE, where the server stores
//! the client's 8-byte verifier on the new file so that a retransmitted
//! create with the same verifier succeeds idempotently while a different
//! verifier fails with NFS3ERR_EXIST.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{
    self, createmode3, createverf3, nfs_fh3, sattr3, skip_post_op_attr, skip_wcc_data,
};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_CREATE: u32 = 8;

pub fn encode_create_args(dir: &nfs_fh3, name: &str, mode: createmode3, attrs: &sattr3) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    dir.encode(&mut enc);
    enc.put_string(name);
    enc.put_u32(mode as u32);
    attrs.encode(&mut enc);
    enc.into_bytes()
}

pub fn encode_create_exclusive_args(dir: &nfs_fh3, name: &str, verf: &createverf3) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    dir.encode(&mut enc);
    enc.put_string(name);
    enc.put_u32(createmode3::EXCLUSIVE as u32);
    enc.put_fixed_opaque(verf);
    enc.into_bytes()
}

/// Decode a CREATE reply and return the new file's handle.
///
/// The handle in `CREATE3resok` is formally optional; a server that omits it
/// would force a LOOKUP round-trip, and this client treats that as
/// [`Error::MissingFileHandle`] instead.
pub fn decode_create_reply(data: &[u8]) -> Result<nfs_fh3> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    if status != 0 {
        skip_wcc_data(&mut dec)?; // dir_wcc
        return Err(Error::nfs3(status, "CREATE"));
    }
    if !dec.get_bool()? {
        return Err(Error::MissingFileHandle { proc: "CREATE" });
    }
    let fh = nfs_fh3::decode(&mut dec)?;
    skip_post_op_attr(&mut dec)?; // obj_attributes
    skip_wcc_data(&mut dec)?; // dir_wcc
    Ok(fh)
}

pub async fn create(
    transport: &mut RpcTransport,
    dir: &nfs_fh3,
    name: &str,
    mode: createmode3,
    attrs: &sattr3,
) -> Result<nfs_fh3> {
    let args = encode_create_args(dir, name, mode, attrs);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_CREATE, &args).await?;
    decode_create_reply(&reply)
}

pub async fn create_exclusive(
    transport: &mut RpcTransport,
    dir: &nfs_fh3,
    name: &str,
    verf: &createverf3,
) -> Result<nfs_fh3> {
    let args = encode_create_exclusive_args(dir, name, verf);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_CREATE, &args).await?;
    decode_create_reply(&reply)
}
