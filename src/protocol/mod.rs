//! Protocol module implementing the NFS client protocol suite.
//!
//! This module contains three main components:
//!
//! - `xdr`: External Data Representation (XDR) for serialization and
//!   deserialization of wire data according to RFC 4506.
//!
//! - `rpc`: ONC RPC (RFC 5531) client transport: CALL message construction,
//!   credential encoding, record-marked framing over TCP and reply envelope
//!   validation.
//!
//! - `nfs`: The per-procedure codecs for the NFS version 3 protocol
//!   (RFC 1813), the per-operation codecs for NFS version 4.0/4.1 COMPOUNDs
//!   (RFC 7530 / RFC 8881), and the MOUNT and PORTMAP companion protocols.
//!
//! Data flows caller → protocol client → XDR-encoded arguments → RPC
//! transport → server, and back through the same layers in reverse. All
//! encoders are pure functions over an [`xdr::XdrEncoder`]; all decoders are
//! pure functions over an [`xdr::XdrDecoder`], which makes every wire format
//! in this crate unit-testable without a socket.

pub mod nfs;
pub mod rpc;
pub mod xdr;
