//! High-level NFSv3 client.
//!
//! On construction, resolves the NFS port via portmap and establishes a
//! persistent TCP connection to the NFS daemon. `mount()` opens a separate
//! short-lived connection to mountd each call, since mountd lives on its own
//! port.
//!
//! NFSv3 is stateless: every RPC stands alone, and the only client-side
//! state is the socket and the credential configuration.

use crate::error::Result;
use crate::protocol::nfs::v3::readdirplus::{entryplus3, ReaddirplusPage};
use crate::protocol::nfs::v3::{
    self, cookieverf3, createmode3, createverf3, fattr3, nfs_fh3, sattr3, specdata3, stable_how,
    writeverf3,
};
use crate::protocol::nfs::{mount, portmap};
use crate::protocol::rpc::{AuthSys, RpcTransport};

pub use crate::protocol::nfs::mount::ExportEntry;
pub use crate::protocol::nfs::v3::read::ReadResult;
pub use crate::protocol::nfs::v3::readdir::{entry3, ReaddirPage};
pub use crate::protocol::nfs::v3::setattr::sattrguard3;
pub use crate::protocol::nfs::v3::write::WriteResult;
pub use crate::protocol::nfs::v3::{fsinfo::FsinfoResult, fsstat::FsstatResult};
pub use crate::protocol::nfs::v3::pathconf::PathconfResult;

/// Default reply size for one READDIR page.
const READDIR_COUNT: u32 = 4096;
/// Default dircount/maxcount pair for READDIRPLUS.
const READDIRPLUS_DIRCOUNT: u32 = 4096;
const READDIRPLUS_MAXCOUNT: u32 = 32768;

/// An NFSv3 client bound to one server.
///
/// Holds one TCP connection; calls on it are serialized. For parallel I/O,
/// connect one client per task.
#[derive(Debug)]
pub struct Nfs3Client {
    host: String,
    transport: RpcTransport,
}

impl Nfs3Client {
    /// Resolve the NFS port on `host` via portmap and connect.
    pub async fn connect(host: &str) -> Result<Nfs3Client> {
        let port = portmap::getport(host, v3::PROGRAM, v3::VERSION).await?;
        let transport = RpcTransport::connect(host, port).await?;
        Ok(Nfs3Client { host: host.to_string(), transport })
    }

    /// Switch to AUTH_SYS credentials for all subsequent NFS calls.
    /// Takes effect on the next call.
    pub fn set_auth_sys(&mut self, auth: AuthSys) {
        self.transport.set_auth_sys(auth);
    }

    /// Revert to AUTH_NONE (the default).
    pub fn clear_auth(&mut self) {
        self.transport.clear_auth();
    }

    // ── MOUNT protocol ───────────────────────────────────────────────────

    /// Obtain the root file handle for an export via the MOUNT protocol.
    pub async fn mount(&self, export_path: &str) -> Result<nfs_fh3> {
        mount::mnt(&self.host, export_path).await
    }

    /// Advisory unmount notification.
    pub async fn umount(&self, export_path: &str) -> Result<()> {
        mount::umnt(&self.host, export_path).await
    }

    /// List the server's exports.
    pub async fn exports(&self) -> Result<Vec<ExportEntry>> {
        mount::export_list(&self.host).await
    }

    // ── File operations ──────────────────────────────────────────────────

    /// NFSPROC3_NULL (proc 0): round-trip ping.
    pub async fn null(&mut self) -> Result<()> {
        v3::null::null(&mut self.transport).await
    }

    /// NFSPROC3_GETATTR (proc 1): return file attributes.
    pub async fn getattr(&mut self, fh: &nfs_fh3) -> Result<fattr3> {
        v3::getattr::getattr(&mut self.transport, fh).await
    }

    /// NFSPROC3_SETATTR (proc 2): set attributes, optionally guarded on the
    /// object's current ctime.
    pub async fn setattr(
        &mut self,
        fh: &nfs_fh3,
        attrs: &sattr3,
        guard: &sattrguard3,
    ) -> Result<()> {
        v3::setattr::setattr(&mut self.transport, fh, attrs, guard).await
    }

    /// NFSPROC3_LOOKUP (proc 3): resolve a name inside a directory.
    pub async fn lookup(&mut self, dir: &nfs_fh3, name: &str) -> Result<nfs_fh3> {
        v3::lookup::lookup(&mut self.transport, dir, name).await
    }

    /// NFSPROC3_ACCESS (proc 4): returns the granted subset of `access_mask`
    /// (possibly with extra bits the server volunteered).
    pub async fn access(&mut self, fh: &nfs_fh3, access_mask: u32) -> Result<u32> {
        v3::access::access(&mut self.transport, fh, access_mask).await
    }

    /// NFSPROC3_READLINK (proc 5): read a symbolic link's target.
    pub async fn readlink(&mut self, symlink_fh: &nfs_fh3) -> Result<String> {
        v3::readlink::readlink(&mut self.transport, symlink_fh).await
    }

    /// NFSPROC3_READ (proc 6): read up to `count` bytes at `offset`.
    pub async fn read(&mut self, fh: &nfs_fh3, offset: u64, count: u32) -> Result<ReadResult> {
        v3::read::read(&mut self.transport, fh, offset, count).await
    }

    /// NFSPROC3_WRITE (proc 7): write `data` at `offset` with the requested
    /// stability.
    pub async fn write(
        &mut self,
        fh: &nfs_fh3,
        offset: u64,
        stable: stable_how,
        data: &[u8],
    ) -> Result<WriteResult> {
        v3::write::write(&mut self.transport, fh, offset, stable, data).await
    }

    /// NFSPROC3_CREATE (proc 8): create a file, UNCHECKED or GUARDED.
    pub async fn create(
        &mut self,
        dir: &nfs_fh3,
        name: &str,
        mode: createmode3,
        attrs: &sattr3,
    ) -> Result<nfs_fh3> {
        v3::create::create(&mut self.transport, dir, name, mode, attrs).await
    }

    /// NFSPROC3_CREATE with EXCLUSIVE mode: idempotent on `verf`.
    pub async fn create_exclusive(
        &mut self,
        dir: &nfs_fh3,
        name: &str,
        verf: &createverf3,
    ) -> Result<nfs_fh3> {
        v3::create::create_exclusive(&mut self.transport, dir, name, verf).await
    }

    // ── Directory operations ─────────────────────────────────────────────

    /// NFSPROC3_MKDIR (proc 9): create a directory.
    pub async fn mkdir(&mut self, dir: &nfs_fh3, name: &str, attrs: &sattr3) -> Result<nfs_fh3> {
        v3::mkdir::mkdir(&mut self.transport, dir, name, attrs).await
    }

    /// NFSPROC3_SYMLINK (proc 10): create a symbolic link to `target`.
    pub async fn symlink(
        &mut self,
        dir: &nfs_fh3,
        name: &str,
        target: &str,
        attrs: &sattr3,
    ) -> Result<nfs_fh3> {
        v3::symlink::symlink(&mut self.transport, dir, name, target, attrs).await
    }

    /// NFSPROC3_MKNOD (proc 11): create a named pipe.
    pub async fn mknod_fifo(
        &mut self,
        dir: &nfs_fh3,
        name: &str,
        attrs: &sattr3,
    ) -> Result<nfs_fh3> {
        v3::mknod::mknod_fifo(&mut self.transport, dir, name, attrs).await
    }

    /// NFSPROC3_MKNOD (proc 11): create a socket file.
    pub async fn mknod_socket(
        &mut self,
        dir: &nfs_fh3,
        name: &str,
        attrs: &sattr3,
    ) -> Result<nfs_fh3> {
        v3::mknod::mknod_socket(&mut self.transport, dir, name, attrs).await
    }

    /// NFSPROC3_MKNOD (proc 11): create a character device.
    pub async fn mknod_chr(
        &mut self,
        dir: &nfs_fh3,
        name: &str,
        attrs: &sattr3,
        spec: specdata3,
    ) -> Result<nfs_fh3> {
        v3::mknod::mknod_chr(&mut self.transport, dir, name, attrs, spec).await
    }

    /// NFSPROC3_MKNOD (proc 11): create a block device.
    pub async fn mknod_blk(
        &mut self,
        dir: &nfs_fh3,
        name: &str,
        attrs: &sattr3,
        spec: specdata3,
    ) -> Result<nfs_fh3> {
        v3::mknod::mknod_blk(&mut self.transport, dir, name, attrs, spec).await
    }

    /// NFSPROC3_REMOVE (proc 12): delete a file.
    pub async fn remove(&mut self, dir: &nfs_fh3, name: &str) -> Result<()> {
        v3::remove::remove(&mut self.transport, dir, name).await
    }

    /// NFSPROC3_RMDIR (proc 13): remove an empty directory.
    pub async fn rmdir(&mut self, dir: &nfs_fh3, name: &str) -> Result<()> {
        v3::rmdir::rmdir(&mut self.transport, dir, name).await
    }

    /// NFSPROC3_RENAME (proc 14): atomic POSIX-style rename.
    pub async fn rename(
        &mut self,
        from_dir: &nfs_fh3,
        from_name: &str,
        to_dir: &nfs_fh3,
        to_name: &str,
    ) -> Result<()> {
        v3::rename::rename(&mut self.transport, from_dir, from_name, to_dir, to_name).await
    }

    /// NFSPROC3_LINK (proc 15): create a hard link to `file`.
    pub async fn link(&mut self, file: &nfs_fh3, link_dir: &nfs_fh3, link_name: &str) -> Result<()> {
        v3::link::link(&mut self.transport, file, link_dir, link_name).await
    }

    /// NFSPROC3_READDIR (proc 16): one page of entries. Pass cookie 0 and a
    /// zeroed verifier for the first page; echo the last entry's cookie and
    /// the page's cookieverf afterwards.
    pub async fn readdir_page(
        &mut self,
        dir: &nfs_fh3,
        cookie: u64,
        cookieverf: &cookieverf3,
        count: u32,
    ) -> Result<ReaddirPage> {
        v3::readdir::readdir_page(&mut self.transport, dir, cookie, cookieverf, count).await
    }

    /// NFSPROC3_READDIR, auto-paginated to EOF.
    pub async fn readdir(&mut self, dir: &nfs_fh3) -> Result<Vec<entry3>> {
        v3::readdir::readdir(&mut self.transport, dir, READDIR_COUNT).await
    }

    /// NFSPROC3_READDIRPLUS (proc 17): one page with inline attributes and
    /// handles.
    pub async fn readdirplus_page(
        &mut self,
        dir: &nfs_fh3,
        cookie: u64,
        cookieverf: &cookieverf3,
        dircount: u32,
        maxcount: u32,
    ) -> Result<ReaddirplusPage> {
        v3::readdirplus::readdirplus_page(
            &mut self.transport,
            dir,
            cookie,
            cookieverf,
            dircount,
            maxcount,
        )
        .await
    }

    /// NFSPROC3_READDIRPLUS, auto-paginated to EOF.
    pub async fn readdirplus(&mut self, dir: &nfs_fh3) -> Result<Vec<entryplus3>> {
        v3::readdirplus::readdirplus(
            &mut self.transport,
            dir,
            READDIRPLUS_DIRCOUNT,
            READDIRPLUS_MAXCOUNT,
        )
        .await
    }

    // ── Filesystem information ───────────────────────────────────────────

    /// NFSPROC3_FSSTAT (proc 18): capacity and usage.
    pub async fn fsstat(&mut self, root: &nfs_fh3) -> Result<FsstatResult> {
        v3::fsstat::fsstat(&mut self.transport, root).await
    }

    /// NFSPROC3_FSINFO (proc 19): server capabilities and preferred I/O
    /// sizes; use `rtmax`/`wtmax` to size read/write batches.
    pub async fn fsinfo(&mut self, root: &nfs_fh3) -> Result<FsinfoResult> {
        v3::fsinfo::fsinfo(&mut self.transport, root).await
    }

    /// NFSPROC3_PATHCONF (proc 20): POSIX pathconf values.
    pub async fn pathconf(&mut self, fh: &nfs_fh3) -> Result<PathconfResult> {
        v3::pathconf::pathconf(&mut self.transport, fh).await
    }

    /// NFSPROC3_COMMIT (proc 21): flush unstable writes; `offset=0, count=0`
    /// commits the entire file. Compare the verifier against prior WRITE
    /// verifiers to detect a server restart.
    pub async fn commit(&mut self, fh: &nfs_fh3, offset: u64, count: u32) -> Result<writeverf3> {
        v3::commit::commit(&mut self.transport, fh, offset, count).await
    }
}
