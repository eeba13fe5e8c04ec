//! High-level NFSv4.1 client.
//!
//! Replaces the v4.0 SETCLIENTID handshake with EXCHANGE_ID +
//! CREATE_SESSION + RECLAIM_COMPLETE, and prepends a SEQUENCE op to every
//! COMPOUND issued inside the session. The public verb surface matches
//! [`crate::Nfs4Client`].
//!
//! Session discipline is single-slot: slotid and highest_slotid are always
//! 0, and the slot's sequenceid is a strictly monotonic per-connection
//! counter starting at 1 with the first in-session COMPOUND. The client
//! never reuses a (slot, seqid) pair, which keeps the server's reply cache
//! sound; it also never retries, so no cached replies are ever requested.
//!
//! Differences from v4.0 beyond the handshake:
//! - OPEN_CONFIRM does not exist; a server setting the CONFIRM rflag is a
//!   protocol error surfaced to the caller.
//! - RENEW does not exist; the SEQUENCE op on every COMPOUND renews the
//!   lease implicitly.
//! - Teardown is explicit: [`Nfs41Client::shutdown`] sends DESTROY_SESSION
//!   best-effort. Dropping the client just closes the socket and leaves the
//!   session to the server's lease timer.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{nfsstat4, Error, Result};
use crate::protocol::nfs::portmap;
use crate::protocol::nfs::v4::{
    self, attr, boot_verifier, compound, dirop, fh_ops, open, session, sessionid4, stateid4,
};
use crate::protocol::rpc::{AuthSys, RpcTransport};
use crate::protocol::xdr::{XdrDecoder, XdrEncoder};

pub use crate::protocol::nfs::v4::attr::{fattr4, sattr4};
pub use crate::protocol::nfs::v4::read::Read4Result;
pub use crate::protocol::nfs::v4::readdir::{DirEntry4, ReaddirPage4};
pub use crate::protocol::nfs::v4::{nfs_fh4, stable_how4, verifier4, OpenFile, WriteResult4};

/// Owner string presented in EXCHANGE_ID and open_owner4.
const CLIENT_ID_STRING: &str = "nfs-mako/v41";

/// Seconds to wait before retrying an OPEN refused with NFS4ERR_GRACE.
const GRACE_RETRY_SECS: u64 = 5;

/// Attributes requested by [`Nfs41Client::getattr`].
const GETATTR_IDS: &[u32] = &[
    attr::id::TYPE,
    attr::id::CHANGE,
    attr::id::SIZE,
    attr::id::FILEID,
    attr::id::MODE,
    attr::id::NUMLINKS,
    attr::id::OWNER,
    attr::id::OWNER_GROUP,
    attr::id::TIME_ACCESS,
    attr::id::TIME_METADATA,
    attr::id::TIME_MODIFY,
];

/// Per-entry attributes requested by [`Nfs41Client::readdir`].
const READDIR_IDS: &[u32] = &[
    attr::id::TYPE,
    attr::id::SIZE,
    attr::id::FILEID,
    attr::id::MODE,
    attr::id::TIME_MODIFY,
];

const READDIR_DIRCOUNT: u32 = 4096;
const READDIR_MAXCOUNT: u32 = 32768;

/// An NFSv4.1 client bound to one server, holding one session.
#[derive(Debug)]
pub struct Nfs41Client {
    transport: RpcTransport,
    root_fh: nfs_fh4,
    clientid: u64,
    sessionid: sessionid4,
    /// Next SEQUENCE sequenceid on slot 0; increments on every in-session
    /// COMPOUND and is never reused.
    slot_seqid: u32,
    open_seqid: u32,
}

impl Nfs41Client {
    /// Connect to `host` with AUTH_NONE and establish an NFSv4.1 session.
    pub async fn connect(host: &str) -> Result<Nfs41Client> {
        Nfs41Client::connect_inner(host, None).await
    }

    /// Same, but switches to AUTH_SYS before session setup.
    pub async fn connect_with_auth(host: &str, auth: AuthSys) -> Result<Nfs41Client> {
        Nfs41Client::connect_inner(host, Some(auth)).await
    }

    async fn connect_inner(host: &str, auth: Option<AuthSys>) -> Result<Nfs41Client> {
        let port = portmap::getport(host, v4::PROGRAM, v4::VERSION).await?;
        let mut transport = RpcTransport::connect(host, port).await?;
        if let Some(auth) = auth {
            transport.set_auth_sys(auth);
        }

        let mut client = Nfs41Client {
            transport,
            root_fh: nfs_fh4::root(),
            clientid: 0,
            sessionid: sessionid4::default(),
            slot_seqid: 1,
            open_seqid: 0,
        };
        client.bootstrap().await?;
        Ok(client)
    }

    /// Switch to AUTH_SYS credentials; takes effect on the next call.
    pub fn set_auth_sys(&mut self, auth: AuthSys) {
        self.transport.set_auth_sys(auth);
    }

    /// Revert to AUTH_NONE.
    pub fn clear_auth(&mut self) {
        self.transport.clear_auth();
    }

    /// The root sentinel handle.
    pub fn root_fh(&self) -> nfs_fh4 {
        self.root_fh.clone()
    }

    /// The clientid from EXCHANGE_ID.
    pub fn client_id(&self) -> u64 {
        self.clientid
    }

    /// The 16-byte session id from CREATE_SESSION.
    pub fn session_id(&self) -> &sessionid4 {
        &self.sessionid
    }

    // ── Session bootstrap ────────────────────────────────────────────────

    // EXCHANGE_ID and CREATE_SESSION travel in minorversion=1 COMPOUNDs
    // without a SEQUENCE prefix (there is no session yet). The first
    // in-session COMPOUND carries seqid 1 and RECLAIM_COMPLETE; a root
    // probe follows.
    async fn bootstrap(&mut self) -> Result<()> {
        let verifier = boot_verifier();

        let mut ops = XdrEncoder::new();
        session::encode_exchange_id(&mut ops, &verifier, CLIENT_ID_STRING);
        let reply =
            compound::call_compound(&mut self.transport, "init", 1, ops.bytes(), 1).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        let exid = session::decode_exchange_id_result(&mut dec)?;

        let mut ops = XdrEncoder::new();
        session::encode_create_session(&mut ops, exid.clientid, exid.sequenceid);
        let reply =
            compound::call_compound(&mut self.transport, "init", 1, ops.bytes(), 1).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        let sessionid = session::decode_create_session_result(&mut dec)?;

        self.clientid = exid.clientid;
        self.sessionid = sessionid;
        self.slot_seqid = 1;
        debug!("session established, clientid {:#x}", self.clientid);

        let mut ops = XdrEncoder::new();
        session::encode_reclaim_complete(&mut ops, false);
        let reply = self.compound41("init", ops.bytes(), 1).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        session::decode_reclaim_complete_result(&mut dec)?;

        // Root probe; the returned handle is discarded and the empty
        // sentinel kept, for the same PUTROOTFH reasons as v4.0.
        let mut ops = XdrEncoder::new();
        fh_ops::encode_putrootfh(&mut ops);
        fh_ops::encode_getfh(&mut ops);
        let reply = self.compound41("", ops.bytes(), 2).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_putrootfh_result(&mut dec)?;
        fh_ops::decode_getfh_result(&mut dec)?;

        Ok(())
    }

    /// Send one in-session COMPOUND: SEQUENCE(slot 0, next seqid) followed
    /// by `ops_bytes`. Callers decode the SEQUENCE result before their own.
    async fn compound41(&mut self, tag: &str, ops_bytes: &[u8], numops: u32) -> Result<Vec<u8>> {
        let seqid = self.slot_seqid;
        self.slot_seqid += 1;

        let mut all_ops = XdrEncoder::new();
        session::encode_sequence(&mut all_ops, &self.sessionid, seqid, 0, 0, false);
        all_ops.put_raw(ops_bytes);

        compound::call_compound(&mut self.transport, tag, 1, all_ops.bytes(), numops + 1).await
    }

    // ── Teardown ─────────────────────────────────────────────────────────

    /// Destroy the session, best-effort. Failures are logged and swallowed;
    /// the socket closes when the client is dropped either way.
    pub async fn shutdown(&mut self) {
        let mut ops = XdrEncoder::new();
        session::encode_destroy_session(&mut ops, &self.sessionid);
        // DESTROY_SESSION goes outside the session (no SEQUENCE).
        let result =
            compound::call_compound(&mut self.transport, "destroy", 1, ops.bytes(), 1).await;
        match result {
            Ok(reply) => {
                let mut dec = XdrDecoder::new(&reply);
                if let Err(e) = compound::check_compound_status(&mut dec)
                    .and_then(|()| session::decode_destroy_session_result(&mut dec))
                {
                    warn!("DESTROY_SESSION failed: {}", e);
                }
            }
            Err(e) => warn!("DESTROY_SESSION failed: {}", e),
        }
    }

    // ── File handle operations ───────────────────────────────────────────

    /// Resolve a name inside a directory (SEQUENCE + PUTFH + LOOKUP + GETFH).
    pub async fn lookup(&mut self, dir: &nfs_fh4, name: &str) -> Result<nfs_fh4> {
        let mut ops = XdrEncoder::new();
        fh_ops::encode_current_fh(&mut ops, dir);
        v4::lookup::encode_lookup(&mut ops, name);
        fh_ops::encode_getfh(&mut ops);
        let reply = self.compound41("", ops.bytes(), 3).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        v4::lookup::decode_lookup_result(&mut dec)?;
        fh_ops::decode_getfh_result(&mut dec)
    }

    /// Get file attributes (SEQUENCE + PUTFH + GETATTR).
    pub async fn getattr(&mut self, fh: &nfs_fh4) -> Result<fattr4> {
        let mut ops = XdrEncoder::new();
        fh_ops::encode_current_fh(&mut ops, fh);
        v4::getattr::encode_getattr(&mut ops, GETATTR_IDS);
        let reply = self.compound41("", ops.bytes(), 2).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        v4::getattr::decode_getattr_result(&mut dec)
    }

    /// Check access permissions; returns the granted mask.
    pub async fn access(&mut self, fh: &nfs_fh4, mask: u32) -> Result<u32> {
        let mut ops = XdrEncoder::new();
        fh_ops::encode_current_fh(&mut ops, fh);
        v4::access::encode_access(&mut ops, mask);
        let reply = self.compound41("", ops.bytes(), 2).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        Ok(v4::access::decode_access_result(&mut dec)?.access)
    }

    // ── Open / close ─────────────────────────────────────────────────────

    /// Open an existing file for reading.
    pub async fn open_read(&mut self, dir: &nfs_fh4, name: &str) -> Result<OpenFile> {
        self.do_open(dir, name, v4::OPEN4_SHARE_ACCESS_READ, false).await
    }

    /// Open or create a file for writing.
    pub async fn open_write(&mut self, dir: &nfs_fh4, name: &str, create: bool) -> Result<OpenFile> {
        self.do_open(dir, name, v4::OPEN4_SHARE_ACCESS_WRITE, create).await
    }

    async fn do_open(
        &mut self,
        dir: &nfs_fh4,
        name: &str,
        share_access: u32,
        create: bool,
    ) -> Result<OpenFile> {
        // The server ignores open seqids in v4.1 (SEQUENCE orders
        // everything), but the field is still on the wire.
        self.open_seqid += 1;
        let seqid = self.open_seqid;

        let reply = loop {
            let mut ops = XdrEncoder::new();
            fh_ops::encode_current_fh(&mut ops, dir);
            if create {
                open::encode_open_create(
                    &mut ops,
                    seqid,
                    share_access,
                    self.clientid,
                    CLIENT_ID_STRING,
                    name,
                    &sattr4::default(),
                );
            } else {
                open::encode_open_nocreate(
                    &mut ops,
                    seqid,
                    share_access,
                    self.clientid,
                    CLIENT_ID_STRING,
                    name,
                );
            }
            fh_ops::encode_getfh(&mut ops);

            let reply = self.compound41("", ops.bytes(), 3).await?;
            let mut dec = XdrDecoder::new(&reply);
            match compound::check_compound_status(&mut dec) {
                Ok(()) => break reply,
                Err(e) if e.is4(nfsstat4::NFS4ERR_GRACE) => {
                    warn!("server in grace period, retrying OPEN in {}s", GRACE_RETRY_SECS);
                    tokio::time::sleep(Duration::from_secs(GRACE_RETRY_SECS)).await;
                }
                Err(e) => return Err(e),
            }
        };

        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        let open_result = open::decode_open_result(&mut dec)?;
        let fh = fh_ops::decode_getfh_result(&mut dec)?;

        // RFC 8881 section 18.16: OPEN4_RESULT_CONFIRM must not be set by a
        // v4.1 server.
        if open_result.needs_confirm() {
            return Err(Error::Protocol("v4.1 server demanded OPEN_CONFIRM"));
        }

        Ok(OpenFile { fh, stateid: open_result.stateid, seqid })
    }

    /// Close an open file.
    pub async fn close(&mut self, file: &OpenFile) -> Result<()> {
        let mut ops = XdrEncoder::new();
        fh_ops::encode_current_fh(&mut ops, &file.fh);
        open::encode_close(&mut ops, file.seqid, &file.stateid);
        let reply = self.compound41("", ops.bytes(), 2).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        open::decode_close_result(&mut dec)
    }

    // ── Data operations ──────────────────────────────────────────────────

    /// Read up to `count` bytes from `file` at `offset`.
    pub async fn read(&mut self, file: &OpenFile, offset: u64, count: u32) -> Result<Read4Result> {
        let mut ops = XdrEncoder::new();
        fh_ops::encode_current_fh(&mut ops, &file.fh);
        v4::read::encode_read(&mut ops, &file.stateid, offset, count);
        let reply = self.compound41("", ops.bytes(), 2).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        v4::read::decode_read_result(&mut dec)
    }

    /// Write `data` to `file` at `offset`.
    pub async fn write(
        &mut self,
        file: &OpenFile,
        offset: u64,
        stable: stable_how4,
        data: &[u8],
    ) -> Result<WriteResult4> {
        let mut ops = XdrEncoder::new();
        fh_ops::encode_current_fh(&mut ops, &file.fh);
        v4::write::encode_write(&mut ops, &file.stateid, offset, stable, data);
        let reply = self.compound41("", ops.bytes(), 2).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        v4::write::decode_write_result(&mut dec)
    }

    /// Flush unstable writes; `offset=0, count=0` commits the whole file.
    pub async fn commit(&mut self, file: &OpenFile, offset: u64, count: u32) -> Result<verifier4> {
        let mut ops = XdrEncoder::new();
        fh_ops::encode_current_fh(&mut ops, &file.fh);
        v4::commit::encode_commit(&mut ops, offset, count);
        let reply = self.compound41("", ops.bytes(), 2).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        v4::commit::decode_commit_result(&mut dec)
    }

    // ── Namespace operations ─────────────────────────────────────────────

    /// Create a directory.
    pub async fn mkdir(&mut self, dir: &nfs_fh4, name: &str, attrs: &sattr4) -> Result<nfs_fh4> {
        let mut ops = XdrEncoder::new();
        fh_ops::encode_current_fh(&mut ops, dir);
        v4::create::encode_create_dir(&mut ops, name, attrs);
        fh_ops::encode_getfh(&mut ops);
        let reply = self.compound41("", ops.bytes(), 3).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        v4::create::decode_create_result(&mut dec)?;
        fh_ops::decode_getfh_result(&mut dec)
    }

    /// Delete a file or empty directory.
    pub async fn remove(&mut self, dir: &nfs_fh4, name: &str) -> Result<()> {
        let mut ops = XdrEncoder::new();
        fh_ops::encode_current_fh(&mut ops, dir);
        dirop::encode_remove(&mut ops, name);
        let reply = self.compound41("", ops.bytes(), 2).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        dirop::decode_remove_result(&mut dec)
    }

    /// Rename or move (SEQUENCE + PUTFH(src) + SAVEFH + PUTFH(dst) + RENAME).
    pub async fn rename(
        &mut self,
        src_dir: &nfs_fh4,
        src_name: &str,
        dst_dir: &nfs_fh4,
        dst_name: &str,
    ) -> Result<()> {
        let mut ops = XdrEncoder::new();
        fh_ops::encode_current_fh(&mut ops, src_dir);
        fh_ops::encode_savefh(&mut ops);
        fh_ops::encode_current_fh(&mut ops, dst_dir);
        dirop::encode_rename(&mut ops, src_name, dst_name);
        let reply = self.compound41("", ops.bytes(), 4).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        fh_ops::decode_savefh_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        dirop::decode_rename_result(&mut dec)
    }

    /// Create a symbolic link.
    pub async fn symlink(
        &mut self,
        dir: &nfs_fh4,
        name: &str,
        target: &str,
        attrs: &sattr4,
    ) -> Result<nfs_fh4> {
        let mut ops = XdrEncoder::new();
        fh_ops::encode_current_fh(&mut ops, dir);
        v4::create::encode_create_symlink(&mut ops, name, target, attrs);
        fh_ops::encode_getfh(&mut ops);
        let reply = self.compound41("", ops.bytes(), 3).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        v4::create::decode_create_result(&mut dec)?;
        fh_ops::decode_getfh_result(&mut dec)
    }

    /// Read a symbolic link target.
    pub async fn readlink(&mut self, fh: &nfs_fh4) -> Result<String> {
        let mut ops = XdrEncoder::new();
        fh_ops::encode_current_fh(&mut ops, fh);
        v4::readlink::encode_readlink(&mut ops);
        let reply = self.compound41("", ops.bytes(), 2).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        v4::readlink::decode_readlink_result(&mut dec)
    }

    /// Set attributes with the anonymous stateid.
    pub async fn setattr(&mut self, fh: &nfs_fh4, attrs: &sattr4) -> Result<()> {
        let anon = stateid4::default();
        let mut ops = XdrEncoder::new();
        fh_ops::encode_current_fh(&mut ops, fh);
        v4::setattr::encode_setattr(&mut ops, &anon, attrs);
        let reply = self.compound41("", ops.bytes(), 2).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        v4::setattr::decode_setattr_result(&mut dec)
    }

    // ── Directory listing ────────────────────────────────────────────────

    /// One READDIR page with caller-carried cookie/cookieverf.
    pub async fn readdir_page(
        &mut self,
        dir: &nfs_fh4,
        cookie: u64,
        cookieverf: &verifier4,
    ) -> Result<ReaddirPage4> {
        let mut ops = XdrEncoder::new();
        fh_ops::encode_current_fh(&mut ops, dir);
        v4::readdir::encode_readdir(
            &mut ops,
            cookie,
            cookieverf,
            READDIR_DIRCOUNT,
            READDIR_MAXCOUNT,
            READDIR_IDS,
        );
        let reply = self.compound41("", ops.bytes(), 2).await?;
        let mut dec = XdrDecoder::new(&reply);
        compound::check_compound_status(&mut dec)?;
        session::decode_sequence_result(&mut dec)?;
        fh_ops::decode_current_fh_result(&mut dec)?;
        v4::readdir::decode_readdir_result(&mut dec)
    }

    /// List all entries in `dir`, auto-paginated to EOF.
    pub async fn readdir(&mut self, dir: &nfs_fh4) -> Result<Vec<DirEntry4>> {
        let mut all = Vec::new();
        let mut cookie = 0u64;
        let mut cookieverf = verifier4::default();

        loop {
            let page = self.readdir_page(dir, cookie, &cookieverf).await?;
            cookieverf = page.cookieverf;
            for entry in page.entries {
                cookie = entry.cookie;
                all.push(entry);
            }
            if page.eof {
                return Ok(all);
            }
        }
    }
}
