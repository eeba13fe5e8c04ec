//! PORTMAP (RPCBIND v2) client as specified in RFC 1833.
//!
//! Only PMAPPROC_GETPORT is needed: given a program/version pair it returns
//! the TCP port the service is registered on. Port 0 means "not registered"
//! and is reported as [`Error::PortmapUnregistered`].

use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

/// RPC program number of the portmapper.
pub const PROGRAM: u32 = 100000;
/// Portmap protocol version.
pub const VERSION: u32 = 2;
/// Well-known TCP port of the portmapper.
pub const PORT: u16 = 111;

/// PMAPPROC_GETPORT procedure number.
const PMAPPROC_GETPORT: u32 = 3;
/// IPPROTO_TCP, as carried in the mapping's `prot` field.
const IPPROTO_TCP: u32 = 6;

/// Encode GETPORT arguments: the mapping `{prog, vers, prot, port}`.
/// The port field is ignored in a GETPORT request.
pub fn encode_getport_args(prog: u32, vers: u32) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    enc.put_u32(prog);
    enc.put_u32(vers);
    enc.put_u32(IPPROTO_TCP);
    enc.put_u32(0);
    enc.into_bytes()
}

/// Decode a GETPORT reply. Port 0 fails with [`Error::PortmapUnregistered`].
pub fn decode_getport_reply(data: &[u8], prog: u32, vers: u32) -> Result<u16> {
    let mut dec = XdrDecoder::new(data);
    let port = dec.get_u32()?;
    if port == 0 {
        return Err(Error::PortmapUnregistered { prog, vers });
    }
    Ok(port as u16)
}

/// Queries the portmapper on `host` for the TCP port of `prog`/`vers`,
/// over a short-lived connection.
pub async fn getport(host: &str, prog: u32, vers: u32) -> Result<u16> {
    let mut transport = RpcTransport::connect(host, PORT).await?;
    let args = encode_getport_args(prog, vers);
    let reply = transport.call(PROGRAM, VERSION, PMAPPROC_GETPORT, &args).await?;
    let port = decode_getport_reply(&reply, prog, vers)?;
    debug!("portmap: {}/{} registered on port {}", prog, vers, port);
    Ok(port)
}
