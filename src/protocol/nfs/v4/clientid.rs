//! SETCLIENTID and SETCLIENTID_CONFIRM (RFC 7530 sections 16.33, 16.34).
//!
//! The NFSv4.0 client-registration handshake: SETCLIENTID presents an
//! 8-byte boot verifier and an owner string, the server answers with a
//! clientid and a confirmation verifier, and SETCLIENTID_CONFIRM echoes
//! both to activate the registration. The callback address is a null
//! placeholder; this client never accepts delegation recalls.

use crate::error::{Error, Result};
use crate::protocol::nfs::v4::{self, verifier4};
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

/// Result of SETCLIENTID.
#[derive(Copy, Clone, Debug, Default)]
pub struct SetclientidResult {
    pub clientid: u64,
    pub confirm_verifier: verifier4,
}

pub fn encode_setclientid(
    enc: &mut XdrEncoder,
    verifier: &verifier4,
    client_id: &str,
    cb_program: u32,
) {
    enc.put_u32(v4::OP_SETCLIENTID);

    // nfs_client_id4: verifier + opaque id
    enc.put_fixed_opaque(verifier);
    enc.put_opaque(client_id.as_bytes());

    // cb_client4: cb_program + netaddr4 {r_netid, r_addr}; null address,
    // no callback service behind it
    enc.put_u32(cb_program);
    enc.put_string("tcp");
    enc.put_string("0.0.0.0.0.0");

    // callback_ident
    enc.put_u32(0);
}

pub fn decode_setclientid_result(dec: &mut XdrDecoder<'_>) -> Result<SetclientidResult> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "SETCLIENTID"));
    }
    Ok(SetclientidResult { clientid: dec.get_u64()?, confirm_verifier: dec.get_fixed_array()? })
}

pub fn encode_setclientid_confirm(
    enc: &mut XdrEncoder,
    clientid: u64,
    confirm_verifier: &verifier4,
) {
    enc.put_u32(v4::OP_SETCLIENTID_CONFIRM);
    enc.put_u64(clientid);
    enc.put_fixed_opaque(confirm_verifier);
}

pub fn decode_setclientid_confirm_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "SETCLIENTID_CONFIRM"));
    }
    Ok(())
}
