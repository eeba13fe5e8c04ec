//! NFS Mako - a Network File System (NFS) client implementation in Rust
//!
//! This library provides client implementations of three generations of the
//! NFS protocol, allowing any Rust application to talk to an NFS server over
//! TCP without mounting anything through the kernel:
//!
//! - NFS version 3 as defined in RFC 1813, together with the MOUNT and
//!   PORTMAP companion protocols
//! - NFS version 4.0 as defined in RFC 7530 (SETCLIENTID handshake,
//!   COMPOUND procedures, open/close state)
//! - NFS version 4.1 as defined in RFC 8881 (EXCHANGE_ID / CREATE_SESSION
//!   handshake, SEQUENCE-prefixed COMPOUNDs, single-slot sessions)
//!
//! ## Main Components
//!
//! - `client3`, `client4`, `client41`: The three top-level clients. Each owns
//!   a persistent TCP connection and maps filesystem verbs (lookup, read,
//!   write, readdir, ...) onto the wire protocol of its generation.
//!
//! - `protocol`: Internal module implementing XDR (RFC 4506) encoding and
//!   decoding, ONC RPC (RFC 5531) record-marked framing over TCP, and the
//!   per-procedure / per-operation codecs for NFS, MOUNT and PORTMAP.
//!
//! - `error`: The crate error type. NFS-level failures carry the server's
//!   `nfsstat3` / `nfsstat4` status code so callers can branch on specific
//!   conditions.
//!
//! ## Standards Compliance
//!
//! This implementation follows these RFCs:
//! - RFC 1813: NFS Version 3 Protocol Specification
//! - RFC 7530: NFS Version 4 Protocol Specification
//! - RFC 8881: NFS Version 4 Minor Version 1 Protocol Specification
//! - RFC 5531: RPC: Remote Procedure Call Protocol Specification Version 2
//! - RFC 4506: XDR: External Data Representation Standard
//! - RFC 1833: Binding Protocols for ONC RPC Version 2
//!
//! ## Usage
//!
//! Connect an [`Nfs3Client`] (or [`Nfs4Client`] / [`Nfs41Client`]) to a host;
//! discovery of the NFS port via portmap and the protocol handshake happen in
//! the constructor. Every client owns its socket: for concurrency, create one
//! client per task.

pub mod client3;
pub mod client4;
pub mod client41;
pub mod error;
pub mod protocol;

pub use client3::Nfs3Client;
pub use client4::Nfs4Client;
pub use client41::Nfs41Client;
pub use error::{nfsstat3, nfsstat4, Error, Result};
pub use protocol::xdr;
