//! NFSv4.1 session operations (RFC 8881 sections 18.35-18.37, 18.46,
//! 18.51): EXCHANGE_ID, CREATE_SESSION, SEQUENCE, RECLAIM_COMPLETE and
//! DESTROY_SESSION.
//!
//! EXCHANGE_ID and CREATE_SESSION run in COMPOUNDs with minorversion=1 but
//! *without* a SEQUENCE prefix (they establish the session SEQUENCE needs).
//! Every COMPOUND after that starts with SEQUENCE; on a single-slot session
//! slotid and highest_slotid stay 0 and the slot's sequenceid increments by
//! one per COMPOUND, starting at 1 with the RECLAIM_COMPLETE request.

use crate::error::{Error, Result};
use crate::protocol::nfs::v4::{self, sessionid4, verifier4};
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

/// EXCHGID4_FLAG_USE_NON_PNFS: plain file access, no pNFS.
const EXCHGID4_FLAG_USE_NON_PNFS: u32 = 0x00010000;
/// SP4_NONE state-protection discriminant.
const SP4_NONE: u32 = 0;

/// Result of EXCHANGE_ID.
#[derive(Copy, Clone, Debug, Default)]
pub struct ExchangeIdResult {
    pub clientid: u64,
    /// Echoed as csa_sequence in CREATE_SESSION.
    pub sequenceid: u32,
}

pub fn encode_exchange_id(enc: &mut XdrEncoder, verifier: &verifier4, client_id: &str) {
    enc.put_u32(v4::OP_EXCHANGE_ID);

    // eia_clientowner: co_verifier + co_ownerid
    enc.put_fixed_opaque(verifier);
    enc.put_opaque(client_id.as_bytes());

    enc.put_u32(EXCHGID4_FLAG_USE_NON_PNFS);
    enc.put_u32(SP4_NONE);
    enc.put_u32(0); // eia_client_impl_id: empty array
}

pub fn decode_exchange_id_result(dec: &mut XdrDecoder<'_>) -> Result<ExchangeIdResult> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "EXCHANGE_ID"));
    }

    let result = ExchangeIdResult { clientid: dec.get_u64()?, sequenceid: dec.get_u32()? };

    dec.get_u32()?; // eir_flags
    dec.get_u32()?; // eir_state_protect: SP4_NONE, no body

    // eir_server_owner: so_minor_id + so_major_id
    dec.get_u64()?;
    dec.get_opaque()?;

    dec.get_opaque()?; // eir_server_scope

    // eir_server_impl_id: optional array of nfs_impl_id4
    let impl_count = dec.get_u32()?;
    for _ in 0..impl_count {
        dec.get_opaque()?; // nii_domain
        dec.get_opaque()?; // nii_name
        dec.get_u64()?; // nii_date.seconds
        dec.get_u32()?; // nii_date.nseconds
    }

    Ok(result)
}

// channel_attrs4: headerpad, maxrequest, maxresponse, maxresponse_cached,
// maxops, maxrequests, rdma_ird (empty array)
fn encode_channel_attrs(enc: &mut XdrEncoder, maxrqst: u32, maxresp: u32, maxresp_cached: u32) {
    enc.put_u32(0);
    enc.put_u32(maxrqst);
    enc.put_u32(maxresp);
    enc.put_u32(maxresp_cached);
    enc.put_u32(16); // ca_maxoperations
    enc.put_u32(1); // ca_maxrequests: single slot
    enc.put_u32(0); // ca_rdma_ird: empty
}

pub fn encode_create_session(enc: &mut XdrEncoder, clientid: u64, sequenceid: u32) {
    enc.put_u32(v4::OP_CREATE_SESSION);

    enc.put_u64(clientid);
    enc.put_u32(sequenceid);
    enc.put_u32(0); // csa_flags: no callbacks, no RDMA

    encode_channel_attrs(enc, 65536, 65536, 1024); // fore channel
    encode_channel_attrs(enc, 4096, 4096, 256); // back channel, minimal

    enc.put_u32(0); // csa_cb_program

    // csa_sec_parms: one AUTH_NONE entry
    enc.put_u32(1);
    enc.put_u32(0);
}

pub fn decode_create_session_result(dec: &mut XdrDecoder<'_>) -> Result<sessionid4> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "CREATE_SESSION"));
    }

    let sessionid: sessionid4 = dec.get_fixed_array()?;

    dec.get_u32()?; // csr_sequence
    dec.get_u32()?; // csr_flags

    // csr_fore_chan_attrs + csr_back_chan_attrs: 7 words each
    for _ in 0..14 {
        dec.get_u32()?;
    }

    Ok(sessionid)
}

pub fn encode_sequence(
    enc: &mut XdrEncoder,
    sessionid: &sessionid4,
    sequenceid: u32,
    slotid: u32,
    highest_slotid: u32,
    cachethis: bool,
) {
    enc.put_u32(v4::OP_SEQUENCE);
    enc.put_fixed_opaque(sessionid);
    enc.put_u32(sequenceid);
    enc.put_u32(slotid);
    enc.put_u32(highest_slotid);
    enc.put_bool(cachethis);
}

/// Consumes the full SEQUENCE4resok; the slot bookkeeping it reports is
/// uninteresting to a single-slot client.
pub fn decode_sequence_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "SEQUENCE"));
    }
    dec.get_fixed_opaque(v4::NFS4_SESSIONID_SIZE)?; // sr_sessionid
    dec.get_u32()?; // sr_sequenceid
    dec.get_u32()?; // sr_slotid
    dec.get_u32()?; // sr_highest_slotid
    dec.get_u32()?; // sr_target_highest_slotid
    dec.get_u32()?; // sr_status_flags
    Ok(())
}

pub fn encode_reclaim_complete(enc: &mut XdrEncoder, one_fs: bool) {
    enc.put_u32(v4::OP_RECLAIM_COMPLETE);
    enc.put_bool(one_fs);
}

pub fn decode_reclaim_complete_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "RECLAIM_COMPLETE"));
    }
    Ok(())
}

pub fn encode_destroy_session(enc: &mut XdrEncoder, sessionid: &sessionid4) {
    enc.put_u32(v4::OP_DESTROY_SESSION);
    enc.put_fixed_opaque(sessionid);
}

pub fn decode_destroy_session_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "DESTROY_SESSION"));
    }
    Ok(())
}
