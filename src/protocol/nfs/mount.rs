//! MOUNT protocol version 3 client (RFC 1813 Appendix I).
//!
//! MOUNT is a separate RPC program from NFS, reachable on its own port
//! (discovered via portmap). MNT converts an export path into the root file
//! handle that seeds all subsequent NFSv3 calls. UMNT is advisory; servers
//! track the mount list only for reporting. EXPORT lists the server's
//! exports with their allowed client groups.

use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::nfs::portmap;
use crate::protocol::nfs::v3::nfs_fh3;
use crate::protocol::rpc::RpcTransport;
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

/// RPC program number of the MOUNT service.
pub const PROGRAM: u32 = 100005;
/// MOUNT protocol version used with NFSv3.
pub const VERSION: u32 = 3;

const MOUNTPROC3_MNT: u32 = 1;
const MOUNTPROC3_UMNT: u32 = 3;
const MOUNTPROC3_EXPORT: u32 = 5;

/// One entry of the server's export list.
#[derive(Clone, Debug, Default)]
pub struct ExportEntry {
    /// Exported directory path.
    pub path: String,
    /// Client groups allowed to mount it; empty means "everyone".
    pub groups: Vec<String>,
}

/// Decode a MNT reply: `{mountstat3, fhandle3, auth_flavors<>}`.
///
/// The auth flavors list is consumed and discarded; this client negotiates
/// its flavor on the RPC layer instead.
pub fn decode_mnt_reply(data: &[u8]) -> Result<nfs_fh3> {
    let mut dec = XdrDecoder::new(data);
    let status = dec.get_u32()?;
    if status != 0 {
        return Err(Error::nfs3(status, "MNT"));
    }
    let fh = nfs_fh3 { data: dec.get_opaque()? };
    let flavor_count = dec.get_u32()?;
    for _ in 0..flavor_count {
        dec.get_u32()?;
    }
    Ok(fh)
}

/// Decode an EXPORT reply: an XDR linked list of
/// `{ex_dir, groups-linked-list}` nodes.
pub fn decode_export_reply(data: &[u8]) -> Result<Vec<ExportEntry>> {
    let mut dec = XdrDecoder::new(data);
    let mut entries = Vec::new();
    while dec.get_bool()? {
        let mut entry = ExportEntry { path: dec.get_string()?, groups: Vec::new() };
        while dec.get_bool()? {
            entry.groups.push(dec.get_string()?);
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// Obtain the root file handle for `export_path` via MOUNTPROC3_MNT.
///
/// Opens a short-lived connection to mountd; the NFS data connection is
/// separate and persistent.
pub async fn mnt(host: &str, export_path: &str) -> Result<nfs_fh3> {
    let port = portmap::getport(host, PROGRAM, VERSION).await?;
    let mut transport = RpcTransport::connect(host, port).await?;

    let mut args = XdrEncoder::new();
    args.put_string(export_path);
    let reply = transport.call(PROGRAM, VERSION, MOUNTPROC3_MNT, args.bytes()).await?;

    let fh = decode_mnt_reply(&reply)?;
    debug!("mounted {} ({} byte fh)", export_path, fh.data.len());
    Ok(fh)
}

/// Advisory unmount notification. The reply body is empty.
pub async fn umnt(host: &str, export_path: &str) -> Result<()> {
    let port = portmap::getport(host, PROGRAM, VERSION).await?;
    let mut transport = RpcTransport::connect(host, port).await?;

    let mut args = XdrEncoder::new();
    args.put_string(export_path);
    transport.call(PROGRAM, VERSION, MOUNTPROC3_UMNT, args.bytes()).await?;
    Ok(())
}

/// List the server's exports via MOUNTPROC3_EXPORT.
pub async fn export_list(host: &str) -> Result<Vec<ExportEntry>> {
    let port = portmap::getport(host, PROGRAM, VERSION).await?;
    let mut transport = RpcTransport::connect(host, port).await?;

    let reply = transport.call(PROGRAM, VERSION, MOUNTPROC3_EXPORT, &[]).await?;
    decode_export_reply(&reply)
}
