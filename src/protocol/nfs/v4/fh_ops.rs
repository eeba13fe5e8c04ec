//! Current-filehandle operations: PUTFH, PUTROOTFH, GETFH, SAVEFH,
//! RESTOREFH, LOOKUPP. These frame every filesystem verb in a COMPOUND:
//! set the current FH, do the op, optionally GETFH the result.

use crate::error::{Error, Result};
use crate::protocol::nfs::v4::{self, nfs_fh4};
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

pub fn encode_putrootfh(enc: &mut XdrEncoder) {
    enc.put_u32(v4::OP_PUTROOTFH);
}

pub fn encode_putfh(enc: &mut XdrEncoder, fh: &nfs_fh4) {
    enc.put_u32(v4::OP_PUTFH);
    fh.encode(enc);
}

/// PUTROOTFH for the root sentinel, PUTFH otherwise. The result decoders
/// are interchangeable because resop echoes are ignored.
pub fn encode_current_fh(enc: &mut XdrEncoder, fh: &nfs_fh4) {
    if fh.is_root() {
        encode_putrootfh(enc);
    } else {
        encode_putfh(enc, fh);
    }
}

pub fn encode_getfh(enc: &mut XdrEncoder) {
    enc.put_u32(v4::OP_GETFH);
}

pub fn encode_savefh(enc: &mut XdrEncoder) {
    enc.put_u32(v4::OP_SAVEFH);
}

pub fn encode_restorefh(enc: &mut XdrEncoder) {
    enc.put_u32(v4::OP_RESTOREFH);
}

pub fn encode_lookupp(enc: &mut XdrEncoder) {
    enc.put_u32(v4::OP_LOOKUPP);
}

fn check_op_status(dec: &mut XdrDecoder<'_>, op: &'static str) -> Result<()> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, op));
    }
    Ok(())
}

pub fn decode_putrootfh_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    check_op_status(dec, "PUTROOTFH")
}

pub fn decode_putfh_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    check_op_status(dec, "PUTFH")
}

/// Works for both PUTFH and PUTROOTFH results.
pub fn decode_current_fh_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    check_op_status(dec, "PUTFH")
}

pub fn decode_getfh_result(dec: &mut XdrDecoder<'_>) -> Result<nfs_fh4> {
    check_op_status(dec, "GETFH")?;
    nfs_fh4::decode(dec)
}

pub fn decode_savefh_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    check_op_status(dec, "SAVEFH")
}

pub fn decode_restorefh_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    check_op_status(dec, "RESTOREFH")
}

pub fn decode_lookupp_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    check_op_status(dec, "LOOKUPP")
}
