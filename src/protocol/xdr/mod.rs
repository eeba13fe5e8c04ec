//! XDR is a standard for the description and encoding of data.
//! It is useful for transferring data between different computer
//! architectures, and is the presentation layer beneath ONC RPC and NFS.
//!
//! <https://datatracker.ietf.org/doc/html/rfc4506>
//!
//! Everything in XDR is big-endian and padded to 4-byte alignment:
//! variable-length opaques and strings carry a 4-byte length prefix followed
//! by the payload and 0..3 zero pad bytes; fixed-length opaques carry the
//! payload and pad bytes only.
//!
//! [`XdrEncoder`] appends to an owned byte buffer and cannot fail.
//! [`XdrDecoder`] is a bounded cursor over a borrowed byte slice; any read
//! that would pass the end of the buffer fails with
//! [`Error::DecodeUnderflow`] rather than panicking or reading garbage.

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{Error, Result};

/// XDR alignment unit. Every encoded item occupies a multiple of this.
pub const ALIGNMENT: usize = 4;

/// Number of zero bytes needed to pad `len` up to 4-byte alignment.
#[inline]
pub fn pad_len(len: usize) -> usize {
    (ALIGNMENT - len % ALIGNMENT) % ALIGNMENT
}

/// Serializes values into a big-endian byte buffer.
///
/// The buffer only grows; encoding cannot fail. Call [`XdrEncoder::into_bytes`]
/// to take ownership of the encoded bytes, or [`XdrEncoder::bytes`] to borrow
/// them.
#[derive(Default, Debug)]
pub struct XdrEncoder {
    buf: Vec<u8>,
}

impl XdrEncoder {
    pub fn new() -> XdrEncoder {
        XdrEncoder::default()
    }

    /// 32-bit unsigned integer, big-endian.
    pub fn put_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// 64-bit unsigned integer (XDR `unsigned hyper`): high word first.
    pub fn put_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// XDR bool: encoded as an integer 0 or 1.
    pub fn put_bool(&mut self, v: bool) {
        self.put_u32(v as u32);
    }

    /// Variable-length opaque: 4-byte length prefix + data + alignment padding.
    pub fn put_opaque(&mut self, data: &[u8]) {
        self.put_u32(data.len() as u32);
        self.buf.extend_from_slice(data);
        self.put_padding(data.len());
    }

    /// String: same wire encoding as a variable-length opaque.
    pub fn put_string(&mut self, s: &str) {
        self.put_opaque(s.as_bytes());
    }

    /// Fixed-length opaque: data + alignment padding, no length prefix.
    pub fn put_fixed_opaque(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
        self.put_padding(data.len());
    }

    /// Raw bytes, verbatim. The caller is responsible for alignment; used to
    /// splice one encoder's output into another.
    pub fn put_raw(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    fn put_padding(&mut self, len: usize) {
        const ZERO: [u8; ALIGNMENT] = [0; ALIGNMENT];
        self.buf.extend_from_slice(&ZERO[..pad_len(len)]);
    }

    /// Borrow the bytes encoded so far.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes encoded so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Take ownership of the encoded bytes, leaving the encoder empty.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Deserializes values from a big-endian byte buffer.
///
/// The decoder borrows its input and advances a cursor; it never reads past
/// the end of the buffer.
#[derive(Debug)]
pub struct XdrDecoder<'a> {
    buf: &'a [u8],
}

impl<'a> XdrDecoder<'a> {
    pub fn new(buf: &'a [u8]) -> XdrDecoder<'a> {
        XdrDecoder { buf }
    }

    /// 32-bit unsigned integer, big-endian.
    pub fn get_u32(&mut self) -> Result<u32> {
        self.buf.read_u32::<BigEndian>().map_err(|_| Error::DecodeUnderflow)
    }

    /// 64-bit unsigned integer (XDR `unsigned hyper`).
    pub fn get_u64(&mut self) -> Result<u64> {
        self.buf.read_u64::<BigEndian>().map_err(|_| Error::DecodeUnderflow)
    }

    /// XDR bool: any non-zero integer is treated as true.
    pub fn get_bool(&mut self) -> Result<bool> {
        Ok(self.get_u32()? != 0)
    }

    /// Variable-length opaque: reads 4-byte length, data, and padding.
    pub fn get_opaque(&mut self) -> Result<Vec<u8>> {
        let len = self.get_u32()? as usize;
        let data = self.get_bytes(len)?.to_vec();
        self.skip(pad_len(len))?;
        Ok(data)
    }

    /// String: same wire encoding as a variable-length opaque. Non-UTF-8
    /// bytes are replaced rather than rejected; NFS names are byte strings
    /// and the lossy conversion only affects the Rust-facing value.
    pub fn get_string(&mut self) -> Result<String> {
        let bytes = self.get_opaque()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Fixed-length opaque: reads exactly `n` bytes + padding, no length prefix.
    pub fn get_fixed_opaque(&mut self, n: usize) -> Result<Vec<u8>> {
        let data = self.get_bytes(n)?.to_vec();
        self.skip(pad_len(n))?;
        Ok(data)
    }

    /// Fixed-length opaque into an array, for verifiers and session ids.
    pub fn get_fixed_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.get_bytes(N)?);
        self.skip(pad_len(N))?;
        Ok(out)
    }

    /// Returns all remaining bytes and advances the cursor to the end.
    pub fn get_remaining(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf).to_vec()
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    fn get_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.buf.len() < n {
            return Err(Error::DecodeUnderflow);
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn skip(&mut self, n: usize) -> Result<()> {
        self.get_bytes(n).map(|_| ())
    }
}
