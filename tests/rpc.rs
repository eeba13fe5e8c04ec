use tokio::io::AsyncWriteExt;

use nfs_mako::error::Error;
use nfs_mako::protocol::rpc::{
    add_record_mark, build_call_message, parse_reply, read_record, AuthSys, MAX_RPC_RECORD_LENGTH,
};
use nfs_mako::xdr::XdrEncoder;

// Minimal valid accepted reply: xid, REPLY, MSG_ACCEPTED, AUTH_NONE
// verifier, SUCCESS, then `body`.
fn make_reply(xid: u32, body: &[u8]) -> Vec<u8> {
    let mut enc = XdrEncoder::new();
    enc.put_u32(xid);
    enc.put_u32(1); // REPLY
    enc.put_u32(0); // MSG_ACCEPTED
    enc.put_u32(0); // verifier flavor AUTH_NONE
    enc.put_u32(0); // verifier body length
    enc.put_u32(0); // accept_stat SUCCESS
    enc.put_raw(body);
    enc.into_bytes()
}

#[test]
fn call_message_without_credentials_is_40_bytes() {
    let msg = build_call_message(1, 100003, 3, 0, &[], None);
    assert_eq!(msg.len(), 40);

    // xid, CALL, rpcvers=2, prog, vers, proc
    assert_eq!(&msg[0..4], &[0, 0, 0, 1]);
    assert_eq!(&msg[4..8], &[0, 0, 0, 0]);
    assert_eq!(&msg[8..12], &[0, 0, 0, 2]);
    assert_eq!(&msg[12..16], &[0, 1, 0x86, 0xa3]); // 100003
    assert_eq!(&msg[16..20], &[0, 0, 0, 3]);
    assert_eq!(&msg[20..24], &[0, 0, 0, 0]);
    // AUTH_NONE credential and verifier, both empty
    assert_eq!(&msg[24..40], &[0u8; 16]);
}

#[test]
fn call_message_appends_args_verbatim() {
    let args = [0xca, 0xfe, 0xba, 0xbe];
    let msg = build_call_message(7, 100003, 3, 1, &args, None);
    assert_eq!(msg.len(), 44);
    assert_eq!(&msg[40..], &args);
}

#[test]
fn call_message_with_auth_sys() {
    let auth = AuthSys {
        stamp: 0,
        machinename: "host".to_string(),
        uid: 1000,
        gid: 100,
        gids: vec![100, 4],
    };
    let msg = build_call_message(1, 100003, 3, 0, &[], Some(&auth));

    // credential flavor AUTH_SYS at offset 24
    assert_eq!(&msg[24..28], &[0, 0, 0, 1]);
    // opaque body: stamp(4) + name(4+4) + uid(4) + gid(4) + gids(4+8) = 32
    assert_eq!(&msg[28..32], &[0, 0, 0, 32]);
    // verifier stays AUTH_NONE at the tail
    let tail = msg.len() - 8;
    assert_eq!(&msg[tail..], &[0u8; 8]);
}

#[test]
fn record_mark_sets_last_fragment_bit() {
    for payload in [&[][..], &[1u8][..], &[0u8; 300][..]] {
        let framed = add_record_mark(payload);
        assert_eq!(framed.len(), 4 + payload.len());
        assert_eq!(framed[0] & 0x80, 0x80);

        let mark = u32::from_be_bytes([framed[0], framed[1], framed[2], framed[3]]);
        assert_eq!((mark & 0x7fffffff) as usize, payload.len());
        assert_eq!(&framed[4..], payload);
    }
}

#[test]
fn parse_reply_returns_result_body() {
    let body = [0xaa, 0xbb, 0xcc, 0xdd];
    let record = make_reply(99, &body);
    let result = parse_reply(&record).expect("valid reply");
    assert_eq!(result, body);
}

#[test]
fn parse_reply_rejects_call_message_type() {
    let mut record = make_reply(1, &[]);
    // flip msg_type back to CALL
    record[7] = 0;
    assert!(matches!(parse_reply(&record), Err(Error::RpcEnvelope(_))));
}

#[test]
fn parse_reply_rejects_denied() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(1);
    enc.put_u32(1); // REPLY
    enc.put_u32(1); // MSG_DENIED
    let record = enc.into_bytes();
    assert!(matches!(parse_reply(&record), Err(Error::RpcEnvelope(_))));
}

#[test]
fn parse_reply_rejects_non_success_accept_stat() {
    // PROG_UNAVAIL(1), PROG_MISMATCH(2), PROC_UNAVAIL(3), GARBAGE_ARGS(4)
    for stat in 1u32..=4 {
        let mut enc = XdrEncoder::new();
        enc.put_u32(1);
        enc.put_u32(1); // REPLY
        enc.put_u32(0); // MSG_ACCEPTED
        enc.put_u32(0); // verifier flavor
        enc.put_u32(0); // verifier body length
        enc.put_u32(stat);
        let record = enc.into_bytes();
        assert!(
            matches!(parse_reply(&record), Err(Error::RpcEnvelope(_))),
            "accept_stat {} must be rejected",
            stat
        );
    }
}

#[test]
fn parse_reply_consumes_server_verifier() {
    // a non-empty AUTH_SHORT-style verifier body must be skipped cleanly
    let mut enc = XdrEncoder::new();
    enc.put_u32(5);
    enc.put_u32(1); // REPLY
    enc.put_u32(0); // MSG_ACCEPTED
    enc.put_u32(2); // verifier flavor
    enc.put_opaque(&[1, 2, 3, 4, 5]); // verifier body
    enc.put_u32(0); // SUCCESS
    enc.put_raw(&[0x11, 0x22]);
    let record = enc.into_bytes();
    assert_eq!(parse_reply(&record).expect("valid reply"), vec![0x11, 0x22]);
}

#[tokio::test]
async fn read_record_single_fragment() {
    let (mut tx, mut rx) = tokio::io::duplex(4096);

    let payload = b"single fragment payload".to_vec();
    let framed = add_record_mark(&payload);
    tx.write_all(&framed).await.expect("write framed");

    let record = read_record(&mut rx).await.expect("read record");
    assert_eq!(record, payload);
}

#[tokio::test]
async fn read_record_reassembles_two_fragments() {
    let (mut tx, mut rx) = tokio::io::duplex(4096);

    let first = b"first half ".to_vec();
    let second = b"second half".to_vec();

    // first fragment: last-fragment bit clear
    let mark1 = first.len() as u32;
    tx.write_all(&mark1.to_be_bytes()).await.expect("mark1");
    tx.write_all(&first).await.expect("frag1");
    // second fragment: last-fragment bit set
    let mark2 = (1u32 << 31) | second.len() as u32;
    tx.write_all(&mark2.to_be_bytes()).await.expect("mark2");
    tx.write_all(&second).await.expect("frag2");

    let record = read_record(&mut rx).await.expect("read record");
    let mut expected = first.clone();
    expected.extend_from_slice(&second);
    assert_eq!(record, expected);
}

#[tokio::test]
async fn read_record_rejects_oversized_fragment() {
    let (mut tx, mut rx) = tokio::io::duplex(4096);

    let oversized = (MAX_RPC_RECORD_LENGTH + 1) as u32;
    let mark = (1u32 << 31) | oversized;
    tx.write_all(&mark.to_be_bytes()).await.expect("mark");

    let err = read_record(&mut rx).await.expect_err("expected oversize error");
    assert!(err.to_string().contains("exceeds max"), "unexpected error: {err:?}");
}

#[tokio::test]
async fn read_record_errors_on_truncated_stream() {
    let (mut tx, mut rx) = tokio::io::duplex(4096);

    let mark = (1u32 << 31) | 100;
    tx.write_all(&mark.to_be_bytes()).await.expect("mark");
    tx.write_all(&[0u8; 10]).await.expect("short body");
    drop(tx);

    assert!(matches!(read_record(&mut rx).await, Err(Error::Io(_))));
}
