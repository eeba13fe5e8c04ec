//! The COMPOUND engine (RFC 7530 section 14.2).
//!
//! Request body: `{tag:string, minorversion:u32, numops:u32}` followed by
//! the concatenated op encodings. Reply body: `{status:u32, tag:string,
//! numops:u32}` followed by the per-op results in order. When the outer
//! status is non-zero the resarray still holds the results of the ops that
//! executed, but this client surfaces the outer status and stops.

use crate::error::{Error, Result};
use crate::protocol::nfs::v4;
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

/// Encode the COMPOUND4args header for `tag`, `minorversion`, `numops`.
pub fn encode_compound_header(tag: &str, minorversion: u32, numops: u32) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    enc.put_string(tag);
    enc.put_u32(minorversion);
    enc.put_u32(numops);
    enc.into_bytes()
}

/// Send one COMPOUND: header + `ops_bytes`, and return the raw reply body
/// starting at the outer status.
pub async fn call_compound(
    transport: &mut RpcTransport,
    tag: &str,
    minorversion: u32,
    ops_bytes: &[u8],
    numops: u32,
) -> Result<Vec<u8>> {
    let mut args = encode_compound_header(tag, minorversion, numops);
    args.extend_from_slice(ops_bytes);
    transport.call(v4::PROGRAM, v4::VERSION, v4::PROC_COMPOUND, &args).await
}

/// Consume the COMPOUND4res header (status, echoed tag, numops), leaving the
/// decoder positioned at the first per-op result. A non-zero outer status
/// raises [`Error::Nfs4`] for the compound as a whole.
pub fn check_compound_status(dec: &mut XdrDecoder<'_>) -> Result<()> {
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "COMPOUND"));
    }
    dec.get_string()?; // echoed tag
    dec.get_u32()?; // numops in reply
    Ok(())
}
