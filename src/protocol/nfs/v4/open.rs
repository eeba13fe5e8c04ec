//! OPEN, OPEN_CONFIRM, CLOSE and RENEW (RFC 7530 sections 16.16, 16.18,
//! 16.2, 16.24).
//!
//! OPEN is the most intricate v4 operation. The args are: seqid,
//! share_access, share_deny, `open_owner4 {clientid, owner}`, `openflag4`
//! (NOCREATE, or CREATE + createmode + attributes), and `open_claim4`
//! (CLAIM_NULL + filename here; this client opens by name only).
//!
//! The result carries a stateid, change info, result flags, the attrset
//! bitmap and an `open_delegation4`. Delegations are a tagged union
//! (NONE / READ / WRITE); since this client runs no callback channel it
//! cannot honor recalls, so delegation bodies are decoded for cursor
//! correctness and dropped.
//!
//! If the v4.0 server sets [`v4::OPEN4_RESULT_CONFIRM`] in rflags, the
//! client must send OPEN_CONFIRM with a fresh seqid and replace its stateid
//! with the confirmed one. A v4.1 server must never set that flag.

use crate::error::{Error, Result};
use crate::protocol::nfs::v4::{self, attr, skip_change_info4, stateid4};
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

/// Result of the OPEN op itself (the file handle comes from a following
/// GETFH).
#[derive(Clone, Debug, Default)]
pub struct Open4Result {
    pub stateid: stateid4,
    pub rflags: u32,
}

impl Open4Result {
    /// True if the server demands OPEN_CONFIRM.
    pub fn needs_confirm(&self) -> bool {
        self.rflags & v4::OPEN4_RESULT_CONFIRM != 0
    }
}

// open_owner4 prefix shared by both encoders: seqid, access, deny, owner.
fn encode_open_prefix(
    enc: &mut XdrEncoder,
    seqid: u32,
    share_access: u32,
    clientid: u64,
    owner: &str,
) {
    enc.put_u32(v4::OP_OPEN);
    enc.put_u32(seqid);
    enc.put_u32(share_access);
    enc.put_u32(v4::OPEN4_SHARE_DENY_NONE);
    enc.put_u64(clientid);
    enc.put_opaque(owner.as_bytes());
}

/// OPEN an existing file by name (openflag4 = NOCREATE, claim = CLAIM_NULL).
pub fn encode_open_nocreate(
    enc: &mut XdrEncoder,
    seqid: u32,
    share_access: u32,
    clientid: u64,
    owner: &str,
    name: &str,
) {
    encode_open_prefix(enc, seqid, share_access, clientid, owner);
    enc.put_u32(v4::OPEN4_NOCREATE);
    enc.put_u32(v4::CLAIM_NULL);
    enc.put_string(name);
}

/// OPEN with creation (openflag4 = CREATE, createmode = UNCHECKED).
pub fn encode_open_create(
    enc: &mut XdrEncoder,
    seqid: u32,
    share_access: u32,
    clientid: u64,
    owner: &str,
    name: &str,
    attrs: &attr::sattr4,
) {
    encode_open_prefix(enc, seqid, share_access, clientid, owner);
    enc.put_u32(v4::OPEN4_CREATE);
    enc.put_u32(v4::UNCHECKED4);
    attr::encode_fattr4(enc, attrs);
    enc.put_u32(v4::CLAIM_NULL);
    enc.put_string(name);
}

pub fn decode_open_result(dec: &mut XdrDecoder<'_>) -> Result<Open4Result> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "OPEN"));
    }

    let stateid = stateid4::decode(dec)?;
    skip_change_info4(dec)?; // cinfo
    let rflags = dec.get_u32()?;

    // attrset bitmap: meaningful for EXCLUSIVE creates, empty otherwise,
    // but present either way.
    attr::decode_bitmap4(dec)?;

    // open_delegation4, discriminated by type
    match dec.get_u32()? {
        0 => {} // OPEN_DELEGATE_NONE
        1 => {
            // OPEN_DELEGATE_READ: stateid + recall + nfsace4
            stateid4::decode(dec)?;
            dec.get_bool()?;
            skip_nfsace4(dec)?;
        }
        2 => {
            // OPEN_DELEGATE_WRITE: stateid + recall + space_limit + nfsace4
            stateid4::decode(dec)?;
            dec.get_bool()?;
            dec.get_u32()?; // limitby
            dec.get_u32()?; // num_blocks / filesize half
            dec.get_u32()?; // bytes_per_block / filesize half
            skip_nfsace4(dec)?;
        }
        _ => return Err(Error::Protocol("OPEN reply carried an unknown delegation type")),
    }

    Ok(Open4Result { stateid, rflags })
}

// nfsace4: type + flag + access_mask + who
fn skip_nfsace4(dec: &mut XdrDecoder<'_>) -> Result<()> {
    dec.get_u32()?;
    dec.get_u32()?;
    dec.get_u32()?;
    dec.get_string()?;
    Ok(())
}

pub fn encode_open_confirm(enc: &mut XdrEncoder, stateid: &stateid4, seqid: u32) {
    enc.put_u32(v4::OP_OPEN_CONFIRM);
    stateid.encode(enc);
    enc.put_u32(seqid);
}

/// Returns the confirmed stateid that replaces the one from OPEN.
pub fn decode_open_confirm_result(dec: &mut XdrDecoder<'_>) -> Result<stateid4> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "OPEN_CONFIRM"));
    }
    stateid4::decode(dec)
}

pub fn encode_close(enc: &mut XdrEncoder, seqid: u32, stateid: &stateid4) {
    enc.put_u32(v4::OP_CLOSE);
    enc.put_u32(seqid);
    stateid.encode(enc);
}

pub fn decode_close_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "CLOSE"));
    }
    // CLOSE4resok: the now-invalid stateid, discarded
    stateid4::decode(dec)?;
    Ok(())
}

pub fn encode_renew(enc: &mut XdrEncoder, clientid: u64) {
    enc.put_u32(v4::OP_RENEW);
    enc.put_u64(clientid);
}

pub fn decode_renew_result(dec: &mut XdrDecoder<'_>) -> Result<()> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "RENEW"));
    }
    Ok(())
}
