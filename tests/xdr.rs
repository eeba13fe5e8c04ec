use nfs_mako::error::Error;
use nfs_mako::xdr::{XdrDecoder, XdrEncoder};

#[test]
fn u32_roundtrip() {
    for v in [0u32, 1, 2, 0x7fffffff, u32::MAX] {
        let mut enc = XdrEncoder::new();
        enc.put_u32(v);
        assert_eq!(enc.len(), 4);
        let bytes = enc.into_bytes();
        let mut dec = XdrDecoder::new(&bytes);
        assert_eq!(dec.get_u32().expect("decode u32"), v);
        assert_eq!(dec.remaining(), 0);
    }
}

#[test]
fn u64_roundtrip() {
    for v in [0u64, 1, 1 << 32, u64::MAX] {
        let mut enc = XdrEncoder::new();
        enc.put_u64(v);
        assert_eq!(enc.len(), 8);
        let bytes = enc.into_bytes();
        let mut dec = XdrDecoder::new(&bytes);
        assert_eq!(dec.get_u64().expect("decode u64"), v);
    }
}

#[test]
fn big_endian_layout() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0x01020304);
    assert_eq!(enc.bytes(), &[0x01, 0x02, 0x03, 0x04]);

    let mut enc = XdrEncoder::new();
    enc.put_u64(0x0102030405060708);
    assert_eq!(enc.bytes(), &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
}

#[test]
fn bool_encoding() {
    let mut enc = XdrEncoder::new();
    enc.put_bool(true);
    enc.put_bool(false);
    assert_eq!(enc.bytes(), &[0, 0, 0, 1, 0, 0, 0, 0]);

    let bytes = enc.into_bytes();
    let mut dec = XdrDecoder::new(&bytes);
    assert!(dec.get_bool().expect("true"));
    assert!(!dec.get_bool().expect("false"));
}

#[test]
fn opaque_padding() {
    // 3 data bytes -> 4 length + 3 data + 1 pad = 8 wire bytes
    let mut enc = XdrEncoder::new();
    enc.put_opaque(&[0xaa, 0xbb, 0xcc]);
    assert_eq!(enc.len(), 8);
    assert_eq!(enc.bytes(), &[0, 0, 0, 3, 0xaa, 0xbb, 0xcc, 0x00]);

    let bytes = enc.into_bytes();
    let mut dec = XdrDecoder::new(&bytes);
    assert_eq!(dec.get_opaque().expect("opaque"), vec![0xaa, 0xbb, 0xcc]);
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn opaque_roundtrip_all_pad_widths() {
    for len in 0..9usize {
        let data: Vec<u8> = (0..len as u8).collect();
        let mut enc = XdrEncoder::new();
        enc.put_opaque(&data);
        // total is 4-byte length plus data rounded up to alignment
        assert_eq!(enc.len(), 4 + len + (4 - len % 4) % 4);
        assert_eq!(enc.len() % 4, 0);

        let bytes = enc.into_bytes();
        let mut dec = XdrDecoder::new(&bytes);
        assert_eq!(dec.get_opaque().expect("opaque"), data);
        assert_eq!(dec.remaining(), 0);
    }
}

#[test]
fn string_roundtrip() {
    for s in ["", "a", "abc1234+-", "four"] {
        let mut enc = XdrEncoder::new();
        enc.put_string(s);
        let bytes = enc.into_bytes();
        let mut dec = XdrDecoder::new(&bytes);
        assert_eq!(dec.get_string().expect("string"), s);
        assert_eq!(dec.remaining(), 0);
    }
}

#[test]
fn fixed_opaque_roundtrip() {
    let verf = [1u8, 2, 3, 4, 5, 6, 7, 8];
    let mut enc = XdrEncoder::new();
    enc.put_fixed_opaque(&verf);
    // no length prefix
    assert_eq!(enc.len(), 8);

    let bytes = enc.into_bytes();
    let mut dec = XdrDecoder::new(&bytes);
    let got: [u8; 8] = dec.get_fixed_array().expect("fixed");
    assert_eq!(got, verf);
}

#[test]
fn fixed_opaque_pads_odd_lengths() {
    let mut enc = XdrEncoder::new();
    enc.put_fixed_opaque(&[0xff; 5]);
    assert_eq!(enc.len(), 8);
    assert_eq!(&enc.bytes()[5..], &[0, 0, 0]);

    let bytes = enc.into_bytes();
    let mut dec = XdrDecoder::new(&bytes);
    assert_eq!(dec.get_fixed_opaque(5).expect("fixed"), vec![0xff; 5]);
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn underflow_on_short_buffer() {
    let buf = [0u8; 4];
    let mut dec = XdrDecoder::new(&buf);
    assert!(matches!(dec.get_u64(), Err(Error::DecodeUnderflow)));

    let mut dec = XdrDecoder::new(&buf[..2]);
    assert!(matches!(dec.get_u32(), Err(Error::DecodeUnderflow)));

    // opaque whose declared length exceeds the remaining bytes
    let mut enc = XdrEncoder::new();
    enc.put_u32(100);
    let bytes = enc.into_bytes();
    let mut dec = XdrDecoder::new(&bytes);
    assert!(matches!(dec.get_opaque(), Err(Error::DecodeUnderflow)));
}

#[test]
fn underflow_on_missing_pad() {
    // length says 3, data present, pad byte missing
    let buf = [0, 0, 0, 3, 0xaa, 0xbb, 0xcc];
    let mut dec = XdrDecoder::new(&buf);
    assert!(matches!(dec.get_opaque(), Err(Error::DecodeUnderflow)));
}

#[test]
fn get_remaining_takes_rest() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(7);
    enc.put_raw(&[9, 9, 9, 9]);
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    assert_eq!(dec.get_u32().expect("u32"), 7);
    assert_eq!(dec.remaining(), 4);
    assert_eq!(dec.get_remaining(), vec![9, 9, 9, 9]);
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn mixed_sequence_roundtrip() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(42);
    enc.put_string("file.txt");
    enc.put_u64(1 << 40);
    enc.put_opaque(&[0xde, 0xad]);
    enc.put_bool(true);

    let bytes = enc.into_bytes();
    let mut dec = XdrDecoder::new(&bytes);
    assert_eq!(dec.get_u32().expect("u32"), 42);
    assert_eq!(dec.get_string().expect("string"), "file.txt");
    assert_eq!(dec.get_u64().expect("u64"), 1 << 40);
    assert_eq!(dec.get_opaque().expect("opaque"), vec![0xde, 0xad]);
    assert!(dec.get_bool().expect("bool"));
    assert_eq!(dec.remaining(), 0);
}
