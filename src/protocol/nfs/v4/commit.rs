//! COMMIT operation (RFC 7530 section 16.3). `offset=0, count=0` commits
//! the whole file.

use crate::error::{Error, Result};
use crate::protocol::nfs::v4::{self, verifier4};
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

pub fn encode_commit(enc: &mut XdrEncoder, offset: u64, count: u32) {
    enc.put_u32(v4::OP_COMMIT);
    enc.put_u64(offset);
    enc.put_u32(count);
}

pub fn decode_commit_result(dec: &mut XdrDecoder<'_>) -> Result<verifier4> {
    let _resop = dec.get_u32()?;
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs4(status, "COMMIT"));
    }
    dec.get_fixed_array()
}
