//! NFS protocol codecs.
//!
//! - `v3`: The NFS version 3 protocol as specified in RFC 1813: one module
//!   per procedure (GETATTR through COMMIT), each exposing a pure argument
//!   encoder, a pure reply decoder and an async glue function over the RPC
//!   transport.
//!
//! - `v4`: The NFS version 4.0 / 4.1 operation codec (RFC 7530 / RFC 8881):
//!   per-operation encoders that append to a shared buffer, per-operation
//!   result decoders, bitmap4 / fattr4 utilities and the COMPOUND engine.
//!
//! - `mount`: The MOUNT protocol, which yields the initial root file handle
//!   for an NFSv3 export.
//!
//! - `portmap`: The PORTMAP protocol (RPCBIND), used to discover the TCP
//!   port of the NFS and MOUNT services.

pub mod mount;
pub mod portmap;
pub mod v3;
pub mod v4;
