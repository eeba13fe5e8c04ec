//! MKNOD procedure (procedure 11) as defined in RFC 1813 section 3.3.11.
//!
//! Creates a special file. Character and block devices carry a `specdata3`
//! with major/minor numbers after the attributes; FIFOs and sockets carry
//! attributes only.

use crate::error::{Error, Result};
use crate::protocol::nfs::v3::{
    self, ftype3, nfs_fh3, sattr3, skip_post_op_attr, skip_wcc_data, specdata3,
};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

const NFSPROC3_MKNOD: u32 = 11;

/// Encode MKNOD args for NF3FIFO / NF3SOCK (no device numbers).
pub fn encode_mknod_args(dir: &nfs_fh3, name: &str, ftype: ftype3, attrs: &sattr3) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    dir.encode(&mut enc);
    enc.put_string(name);
    enc.put_u32(ftype as u32);
    attrs.encode(&mut enc);
    enc.into_bytes()
}

/// Encode MKNOD args for NF3CHR / NF3BLK (attributes + device numbers).
pub fn encode_mknod_device_args(
    dir: &nfs_fh3,
    name: &str,
    ftype: ftype3,
    attrs: &sattr3,
    spec: specdata3,
) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    dir.encode(&mut enc);
    enc.put_string(name);
    enc.put_u32(ftype as u32);
    attrs.encode(&mut enc);
    enc.put_u32(spec.specdata1);
    enc.put_u32(spec.specdata2);
    enc.into_bytes()
}

pub fn decode_mknod_reply(data: &[u8]) -> Result<nfs_fh3> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    if status != 0 {
        skip_wcc_data(&mut dec)?; // dir_wcc
        return Err(Error::nfs3(status, "MKNOD"));
    }
    if !dec.get_bool()? {
        return Err(Error::MissingFileHandle { proc: "MKNOD" });
    }
    let fh = nfs_fh3::decode(&mut dec)?;
    skip_post_op_attr(&mut dec)?; // obj_attributes
    skip_wcc_data(&mut dec)?; // dir_wcc
    Ok(fh)
}

/// Create a named pipe.
pub async fn mknod_fifo(
    transport: &mut RpcTransport,
    dir: &nfs_fh3,
    name: &str,
    attrs: &sattr3,
) -> Result<nfs_fh3> {
    let args = encode_mknod_args(dir, name, ftype3::NF3FIFO, attrs);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_MKNOD, &args).await?;
    decode_mknod_reply(&reply)
}

/// Create a socket file.
pub async fn mknod_socket(
    transport: &mut RpcTransport,
    dir: &nfs_fh3,
    name: &str,
    attrs: &sattr3,
) -> Result<nfs_fh3> {
    let args = encode_mknod_args(dir, name, ftype3::NF3SOCK, attrs);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_MKNOD, &args).await?;
    decode_mknod_reply(&reply)
}

/// Create a character special device.
pub async fn mknod_chr(
    transport: &mut RpcTransport,
    dir: &nfs_fh3,
    name: &str,
    attrs: &sattr3,
    spec: specdata3,
) -> Result<nfs_fh3> {
    let args = encode_mknod_device_args(dir, name, ftype3::NF3CHR, attrs, spec);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_MKNOD, &args).await?;
    decode_mknod_reply(&reply)
}

/// Create a block special device.
pub async fn mknod_blk(
    transport: &mut RpcTransport,
    dir: &nfs_fh3,
    name: &str,
    attrs: &sattr3,
    spec: specdata3,
) -> Result<nfs_fh3> {
    let args = encode_mknod_device_args(dir, name, ftype3::NF3BLK, attrs, spec);
    let reply = transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_MKNOD, &args).await?;
    decode_mknod_reply(&reply)
}
