//! Wire-format tests for the NFSv4 operation codec: bitmap4 layout, fattr4
//! encode/decode, COMPOUND framing and the per-op result decoders.

use nfs_mako::error::{nfsstat4, Error};
use nfs_mako::protocol::nfs::v4::attr::{
    self, bitmap4_set, bitmap4_test, decode_fattr4, encode_bitmap4, make_bitmap4, sattr4,
};
use nfs_mako::protocol::nfs::v4::{
    self, clientid, compound, dirop, fh_ops, open, readdir, session, stateid4,
};
use nfs_mako::xdr::{XdrDecoder, XdrEncoder};

fn put_stateid(enc: &mut XdrEncoder, seqid: u32, fill: u8) {
    enc.put_u32(seqid);
    enc.put_fixed_opaque(&[fill; 12]);
}

fn put_change_info(enc: &mut XdrEncoder) {
    enc.put_bool(true);
    enc.put_u64(1);
    enc.put_u64(2);
}

// ── bitmap4 ──────────────────────────────────────────────────────────────────

#[test]
fn bitmap_words_for_known_attributes() {
    // attribute N occupies word N/32, bit 1 << (N % 32)
    assert_eq!(make_bitmap4(&[1]), vec![0x0000_0002]);
    assert_eq!(make_bitmap4(&[4]), vec![0x0000_0010]);
    assert_eq!(make_bitmap4(&[20]), vec![0x0010_0000]);
    assert_eq!(make_bitmap4(&[33]), vec![0, 0x0000_0002]);
    assert_eq!(make_bitmap4(&[1, 4, 20]), vec![0x0010_0012]);
}

#[test]
fn bitmap_set_then_test() {
    for id in [0u32, 1, 4, 20, 31, 32, 33, 63, 64, 100] {
        let mut bm = Vec::new();
        bitmap4_set(&mut bm, id);
        assert!(bitmap4_test(&bm, id), "bit {} must read back", id);
    }
}

#[test]
fn bitmap_test_of_unset_bits() {
    let bm = make_bitmap4(&[1, 4]);
    assert!(!bitmap4_test(&bm, 2));
    assert!(!bitmap4_test(&bm, 20));
    // beyond the stored words: absent means unset, not an error
    assert!(!bitmap4_test(&bm, 33));
    assert!(!bitmap4_test(&bm, 200));
}

#[test]
fn bitmap_encode_decode_identity() {
    for ids in [&[][..], &[1][..], &[1, 4, 20][..], &[33][..], &[1, 33, 64][..]] {
        let bm = make_bitmap4(ids);
        let mut enc = XdrEncoder::new();
        encode_bitmap4(&mut enc, &bm);
        let bytes = enc.into_bytes();
        let mut dec = XdrDecoder::new(&bytes);
        assert_eq!(attr::decode_bitmap4(&mut dec).expect("decode"), bm);
    }
}

#[test]
fn bitmap_wire_bytes() {
    let mut enc = XdrEncoder::new();
    encode_bitmap4(&mut enc, &make_bitmap4(&[1]));
    assert_eq!(enc.bytes(), &[0, 0, 0, 1, 0, 0, 0, 2]);
}

// ── fattr4 ───────────────────────────────────────────────────────────────────

#[test]
fn sattr4_encode_then_decode() {
    // encode_fattr4 and decode_fattr4 share the fattr4 wire shape for the
    // attributes that appear on both sides
    let attrs = sattr4 { size: Some(8192), mode: Some(0o600), ..Default::default() };
    let mut enc = XdrEncoder::new();
    attr::encode_fattr4(&mut enc, &attrs);

    let bytes = enc.into_bytes();
    let mut dec = XdrDecoder::new(&bytes);
    let decoded = decode_fattr4(&mut dec).expect("decode");
    assert_eq!(decoded.size, Some(8192));
    assert_eq!(decoded.mode, Some(0o600));
    assert!(decoded.ftype.is_none());
    assert!(decoded.owner.is_none());
}

#[test]
fn sattr4_empty_encodes_empty_bitmap() {
    let mut enc = XdrEncoder::new();
    attr::encode_fattr4(&mut enc, &sattr4::default());
    // bitmap count 0 + opaque length 0
    assert_eq!(enc.bytes(), &[0, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn fattr4_decode_server_reply() {
    // server returns TYPE + SIZE + FILEID + MODE + TIME_MODIFY
    let mut al = XdrEncoder::new();
    al.put_u32(2); // NF4DIR
    al.put_u64(4096); // size
    al.put_u64(1234); // fileid
    al.put_u32(0o755); // mode
    al.put_u64(1_700_000_000); // time_modify.seconds
    al.put_u32(500); // time_modify.nseconds

    let mut enc = XdrEncoder::new();
    encode_bitmap4(
        &mut enc,
        &make_bitmap4(&[attr::id::TYPE, attr::id::SIZE, attr::id::FILEID, attr::id::MODE,
            attr::id::TIME_MODIFY]),
    );
    enc.put_opaque(al.bytes());

    let bytes = enc.into_bytes();
    let mut dec = XdrDecoder::new(&bytes);
    let attrs = decode_fattr4(&mut dec).expect("decode");
    assert_eq!(attrs.ftype, Some(v4::ftype4::NF4DIR));
    assert_eq!(attrs.size, Some(4096));
    assert_eq!(attrs.fileid, Some(1234));
    assert_eq!(attrs.mode, Some(0o755));
    assert_eq!(attrs.time_modify.expect("mtime").seconds, 1_700_000_000);
    assert_eq!(dec.remaining(), 0);
}

// ── COMPOUND framing ─────────────────────────────────────────────────────────

#[test]
fn compound_header_wire_layout() {
    let header = compound::encode_compound_header("test", 0, 0);
    assert_eq!(
        header,
        vec![
            0x00, 0x00, 0x00, 0x04, // tag length
            b't', b'e', b's', b't', // tag bytes
            0x00, 0x00, 0x00, 0x00, // minorversion = 0
            0x00, 0x00, 0x00, 0x00, // numops = 0
        ]
    );
}

#[test]
fn compound_header_minorversion_one() {
    let header = compound::encode_compound_header("", 1, 3);
    assert_eq!(header, vec![0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 3]);
}

#[test]
fn compound_status_ok_positions_at_first_result() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0); // outer status
    enc.put_string("tag");
    enc.put_u32(2); // numops
    enc.put_u32(0xaabb); // first per-op result
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    compound::check_compound_status(&mut dec).expect("ok");
    assert_eq!(dec.get_u32().expect("first result"), 0xaabb);
}

#[test]
fn compound_status_error_surfaces_status() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(10013); // NFS4ERR_GRACE
    enc.put_string("");
    enc.put_u32(1);
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let err = compound::check_compound_status(&mut dec).expect_err("grace");
    assert!(err.is4(nfsstat4::NFS4ERR_GRACE));
}

// ── fh ops ───────────────────────────────────────────────────────────────────

#[test]
fn current_fh_uses_putrootfh_for_root_sentinel() {
    let mut enc = XdrEncoder::new();
    fh_ops::encode_current_fh(&mut enc, &v4::nfs_fh4::root());
    assert_eq!(enc.bytes(), &[0, 0, 0, 24]); // OP_PUTROOTFH, no args

    let mut enc = XdrEncoder::new();
    let fh = v4::nfs_fh4 { data: vec![0xee; 4] };
    fh_ops::encode_current_fh(&mut enc, &fh);
    assert_eq!(enc.bytes(), &[0, 0, 0, 22, 0, 0, 0, 4, 0xee, 0xee, 0xee, 0xee]);
}

#[test]
fn getfh_result_roundtrip() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_GETFH);
    enc.put_u32(0);
    enc.put_opaque(&[0x11; 20]);
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let fh = fh_ops::decode_getfh_result(&mut dec).expect("decode");
    assert_eq!(fh.data, vec![0x11; 20]);
}

#[test]
fn savefh_restorefh_lookupp_results() {
    let mut enc = XdrEncoder::new();
    for op in [v4::OP_SAVEFH, v4::OP_RESTOREFH, v4::OP_LOOKUPP] {
        enc.put_u32(op);
        enc.put_u32(0);
    }
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    fh_ops::decode_savefh_result(&mut dec).expect("savefh");
    fh_ops::decode_restorefh_result(&mut dec).expect("restorefh");
    fh_ops::decode_lookupp_result(&mut dec).expect("lookupp");
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn putfh_result_error() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_PUTFH);
    enc.put_u32(10001); // NFS4ERR_BADHANDLE
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let err = fh_ops::decode_putfh_result(&mut dec).expect_err("badhandle");
    assert!(err.is4(nfsstat4::NFS4ERR_BADHANDLE));
}

// ── OPEN family ──────────────────────────────────────────────────────────────

#[test]
fn open_result_no_delegation() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_OPEN);
    enc.put_u32(0);
    put_stateid(&mut enc, 1, 0x5a);
    put_change_info(&mut enc);
    enc.put_u32(v4::OPEN4_RESULT_LOCKTYPE_POSIX); // rflags, no CONFIRM
    enc.put_u32(0); // empty attrset bitmap
    enc.put_u32(0); // OPEN_DELEGATE_NONE
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let result = open::decode_open_result(&mut dec).expect("decode");
    assert_eq!(result.stateid.seqid, 1);
    assert_eq!(result.stateid.other, [0x5a; 12]);
    assert!(!result.needs_confirm());
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn open_result_discards_read_delegation() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_OPEN);
    enc.put_u32(0);
    put_stateid(&mut enc, 1, 0x01);
    put_change_info(&mut enc);
    enc.put_u32(0); // rflags
    enc.put_u32(0); // empty attrset
    enc.put_u32(1); // OPEN_DELEGATE_READ
    put_stateid(&mut enc, 9, 0x02); // delegation stateid
    enc.put_bool(false); // recall
    enc.put_u32(0); // ace type
    enc.put_u32(0); // ace flag
    enc.put_u32(0); // ace mask
    enc.put_string("EVERYONE@"); // ace who
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let result = open::decode_open_result(&mut dec).expect("decode");
    assert_eq!(result.stateid.other, [0x01; 12]);
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn open_result_discards_write_delegation() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_OPEN);
    enc.put_u32(0);
    put_stateid(&mut enc, 1, 0x03);
    put_change_info(&mut enc);
    enc.put_u32(0);
    enc.put_u32(0);
    enc.put_u32(2); // OPEN_DELEGATE_WRITE
    put_stateid(&mut enc, 2, 0x04);
    enc.put_bool(false); // recall
    enc.put_u32(1); // limitby NFS_LIMIT_SIZE
    enc.put_u32(0); // filesize words
    enc.put_u32(4096);
    enc.put_u32(0); // ace
    enc.put_u32(0);
    enc.put_u32(0);
    enc.put_string("OWNER@");
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    open::decode_open_result(&mut dec).expect("decode");
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn open_result_confirm_flag() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_OPEN);
    enc.put_u32(0);
    put_stateid(&mut enc, 1, 0x06);
    put_change_info(&mut enc);
    enc.put_u32(v4::OPEN4_RESULT_CONFIRM);
    enc.put_u32(0);
    enc.put_u32(0);
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let result = open::decode_open_result(&mut dec).expect("decode");
    assert!(result.needs_confirm());
}

#[test]
fn open_share_deny_is_none_on_the_wire() {
    let mut enc = XdrEncoder::new();
    open::encode_open_nocreate(&mut enc, 3, v4::OPEN4_SHARE_ACCESS_READ, 0x1122, "owner", "f");
    let bytes = enc.into_bytes();
    let mut dec = XdrDecoder::new(&bytes);
    assert_eq!(dec.get_u32().expect("opcode"), v4::OP_OPEN);
    assert_eq!(dec.get_u32().expect("seqid"), 3);
    assert_eq!(dec.get_u32().expect("access"), v4::OPEN4_SHARE_ACCESS_READ);
    assert_eq!(dec.get_u32().expect("deny"), v4::OPEN4_SHARE_DENY_NONE);
    assert_eq!(dec.get_u64().expect("clientid"), 0x1122);
}

#[test]
fn open_confirm_returns_replacement_stateid() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_OPEN_CONFIRM);
    enc.put_u32(0);
    put_stateid(&mut enc, 2, 0x07);
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let stateid = open::decode_open_confirm_result(&mut dec).expect("decode");
    assert_eq!(stateid.seqid, 2);
    assert_eq!(stateid.other, [0x07; 12]);
}

#[test]
fn close_result_consumes_dead_stateid() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_CLOSE);
    enc.put_u32(0);
    put_stateid(&mut enc, 0, 0);
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    open::decode_close_result(&mut dec).expect("decode");
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn close_bad_stateid() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_CLOSE);
    enc.put_u32(10025); // NFS4ERR_BAD_STATEID
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let err = open::decode_close_result(&mut dec).expect_err("bad stateid");
    assert!(err.is4(nfsstat4::NFS4ERR_BAD_STATEID));
}

// ── data and namespace op results ────────────────────────────────────────────

#[test]
fn read_result() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_READ);
    enc.put_u32(0);
    enc.put_bool(true); // eof
    enc.put_opaque(b"payload");
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let result = v4::read::decode_read_result(&mut dec).expect("decode");
    assert_eq!(result.data, b"payload");
    assert!(result.eof);
}

#[test]
fn write_result() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_WRITE);
    enc.put_u32(0);
    enc.put_u32(26);
    enc.put_u32(2); // FILE_SYNC4
    enc.put_fixed_opaque(&[0x99; 8]);
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let result = v4::write::decode_write_result(&mut dec).expect("decode");
    assert_eq!(result.count, 26);
    assert_eq!(result.committed, v4::stable_how4::FILE_SYNC4);
    assert_eq!(result.verf, [0x99; 8]);
}

#[test]
fn commit_result() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_COMMIT);
    enc.put_u32(0);
    enc.put_fixed_opaque(&[0x44; 8]);
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    assert_eq!(v4::commit::decode_commit_result(&mut dec).expect("decode"), [0x44; 8]);
}

#[test]
fn remove_and_rename_results() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_REMOVE);
    enc.put_u32(0);
    put_change_info(&mut enc);
    let bytes = enc.into_bytes();
    let mut dec = XdrDecoder::new(&bytes);
    dirop::decode_remove_result(&mut dec).expect("remove");
    assert_eq!(dec.remaining(), 0);

    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_RENAME);
    enc.put_u32(0);
    put_change_info(&mut enc); // source
    put_change_info(&mut enc); // target
    let bytes = enc.into_bytes();
    let mut dec = XdrDecoder::new(&bytes);
    dirop::decode_rename_result(&mut dec).expect("rename");
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn readdir_result_entries() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_READDIR);
    enc.put_u32(0);
    enc.put_fixed_opaque(&[0x10; 8]); // cookieverf

    // one entry with a fileid-only fattr4
    enc.put_bool(true);
    enc.put_u64(77); // cookie
    enc.put_string("report.txt");
    let mut al = XdrEncoder::new();
    al.put_u64(900); // fileid value
    encode_bitmap4(&mut enc, &make_bitmap4(&[attr::id::FILEID]));
    enc.put_opaque(al.bytes());

    enc.put_bool(false);
    enc.put_bool(true); // eof
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let page = readdir::decode_readdir_result(&mut dec).expect("decode");
    assert_eq!(page.cookieverf, [0x10; 8]);
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].cookie, 77);
    assert_eq!(page.entries[0].name, "report.txt");
    assert_eq!(page.entries[0].attrs.fileid, Some(900));
    assert!(page.eof);
}

// ── clientid / session handshakes ────────────────────────────────────────────

#[test]
fn setclientid_result() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_SETCLIENTID);
    enc.put_u32(0);
    enc.put_u64(0xdead_beef_0001);
    enc.put_fixed_opaque(&[0x21; 8]);
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let result = clientid::decode_setclientid_result(&mut dec).expect("decode");
    assert_eq!(result.clientid, 0xdead_beef_0001);
    assert_eq!(result.confirm_verifier, [0x21; 8]);
}

#[test]
fn setclientid_in_use() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_SETCLIENTID);
    enc.put_u32(10017); // NFS4ERR_CLID_INUSE
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let err = clientid::decode_setclientid_result(&mut dec).expect_err("in use");
    assert!(err.is4(nfsstat4::NFS4ERR_CLID_INUSE));
}

#[test]
fn exchange_id_result() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_EXCHANGE_ID);
    enc.put_u32(0);
    enc.put_u64(0xc11e_4401); // clientid
    enc.put_u32(1); // sequenceid
    enc.put_u32(0x00020000); // flags
    enc.put_u32(0); // SP4_NONE
    enc.put_u64(7); // server_owner.minor_id
    enc.put_opaque(b"srv-major"); // server_owner.major_id
    enc.put_opaque(b"scope"); // server_scope
    enc.put_u32(1); // one impl id
    enc.put_opaque(b"example.org");
    enc.put_opaque(b"nfsd");
    enc.put_u64(1_600_000_000);
    enc.put_u32(0);
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let result = session::decode_exchange_id_result(&mut dec).expect("decode");
    assert_eq!(result.clientid, 0xc11e_4401);
    assert_eq!(result.sequenceid, 1);
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn create_session_result() {
    let sessionid: Vec<u8> = (1..=16).collect();
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_CREATE_SESSION);
    enc.put_u32(0);
    enc.put_fixed_opaque(&sessionid);
    enc.put_u32(1); // csr_sequence
    enc.put_u32(0); // csr_flags
    for _ in 0..14 {
        enc.put_u32(0); // fore + back channel attrs
    }
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let sid = session::decode_create_session_result(&mut dec).expect("decode");
    assert_eq!(sid.to_vec(), sessionid);
    assert!(sid.iter().any(|&b| b != 0));
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn sequence_op_wire_layout() {
    let sessionid = [0xabu8; 16];
    let mut enc = XdrEncoder::new();
    session::encode_sequence(&mut enc, &sessionid, 5, 0, 0, false);
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    assert_eq!(dec.get_u32().expect("opcode"), v4::OP_SEQUENCE);
    assert_eq!(dec.get_fixed_opaque(16).expect("sessionid"), sessionid.to_vec());
    assert_eq!(dec.get_u32().expect("sequenceid"), 5);
    assert_eq!(dec.get_u32().expect("slotid"), 0);
    assert_eq!(dec.get_u32().expect("highest_slotid"), 0);
    assert_eq!(dec.get_u32().expect("cachethis"), 0);
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn sequence_result_consumed_fully() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_SEQUENCE);
    enc.put_u32(0);
    enc.put_fixed_opaque(&[0xab; 16]);
    enc.put_u32(5); // sr_sequenceid
    enc.put_u32(0); // sr_slotid
    enc.put_u32(0); // sr_highest_slotid
    enc.put_u32(0); // sr_target_highest_slotid
    enc.put_u32(0); // sr_status_flags
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    session::decode_sequence_result(&mut dec).expect("decode");
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn sequence_misordered() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_SEQUENCE);
    enc.put_u32(10063); // NFS4ERR_SEQ_MISORDERED
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let err = session::decode_sequence_result(&mut dec).expect_err("misordered");
    assert!(err.is4(nfsstat4::NFS4ERR_SEQ_MISORDERED));
}

#[test]
fn reclaim_complete_and_destroy_session() {
    let mut enc = XdrEncoder::new();
    session::encode_reclaim_complete(&mut enc, false);
    assert_eq!(enc.bytes(), &[0, 0, 0, 58, 0, 0, 0, 0]);

    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_RECLAIM_COMPLETE);
    enc.put_u32(0);
    let bytes = enc.into_bytes();
    let mut dec = XdrDecoder::new(&bytes);
    session::decode_reclaim_complete_result(&mut dec).expect("decode");

    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_DESTROY_SESSION);
    enc.put_u32(10052); // NFS4ERR_BADSESSION
    let bytes = enc.into_bytes();
    let mut dec = XdrDecoder::new(&bytes);
    let err = session::decode_destroy_session_result(&mut dec).expect_err("bad session");
    assert!(err.is4(nfsstat4::NFS4ERR_BADSESSION));
}

// ── misc op results ──────────────────────────────────────────────────────────

#[test]
fn access_result() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_ACCESS);
    enc.put_u32(0);
    enc.put_u32(v4::ACCESS4_READ | v4::ACCESS4_LOOKUP); // supported
    enc.put_u32(v4::ACCESS4_READ); // access
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let result = v4::access::decode_access_result(&mut dec).expect("decode");
    assert_eq!(result.supported, v4::ACCESS4_READ | v4::ACCESS4_LOOKUP);
    assert_eq!(result.access, v4::ACCESS4_READ);
}

#[test]
fn getattr_error_op() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_GETATTR);
    enc.put_u32(70); // NFS4ERR_STALE
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let err = v4::getattr::decode_getattr_result(&mut dec).expect_err("stale");
    assert!(err.is4(nfsstat4::NFS4ERR_STALE));
}

#[test]
fn setattr_result_consumes_attrsset() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_SETATTR);
    enc.put_u32(0);
    encode_bitmap4(&mut enc, &make_bitmap4(&[attr::id::MODE]));
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    v4::setattr::decode_setattr_result(&mut dec).expect("decode");
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn create_result_consumes_cinfo_and_attrset() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_CREATE);
    enc.put_u32(0);
    put_change_info(&mut enc);
    encode_bitmap4(&mut enc, &make_bitmap4(&[attr::id::MODE]));
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    v4::create::decode_create_result(&mut dec).expect("decode");
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn readlink_result() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_READLINK);
    enc.put_u32(0);
    enc.put_string("/srv/data");
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    assert_eq!(v4::readlink::decode_readlink_result(&mut dec).expect("decode"), "/srv/data");
}

#[test]
fn renew_result() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_RENEW);
    enc.put_u32(10011); // NFS4ERR_EXPIRED
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let err = open::decode_renew_result(&mut dec).expect_err("expired");
    assert!(err.is4(nfsstat4::NFS4ERR_EXPIRED));
}

// ── error taxonomy ───────────────────────────────────────────────────────────

#[test]
fn nfs4_error_carries_op_name() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(v4::OP_LOOKUP);
    enc.put_u32(2); // NFS4ERR_NOENT
    let bytes = enc.into_bytes();

    let mut dec = XdrDecoder::new(&bytes);
    let err = v4::lookup::decode_lookup_result(&mut dec).expect_err("noent");
    match &err {
        Error::Nfs4 { status, op } => {
            assert_eq!(*status, 2);
            assert_eq!(*op, "LOOKUP");
        }
        other => panic!("expected Nfs4 error, got {other:?}"),
    }
    assert!(err.is4(nfsstat4::NFS4ERR_NOENT));
    assert!(!err.is4(nfsstat4::NFS4ERR_STALE));
}

#[test]
fn stateid_roundtrip() {
    let sid = stateid4 { seqid: 9, other: [0x3c; 12] };
    let mut enc = XdrEncoder::new();
    sid.encode(&mut enc);
    assert_eq!(enc.len(), 16);

    let bytes = enc.into_bytes();
    let mut dec = XdrDecoder::new(&bytes);
    assert_eq!(stateid4::decode(&mut dec).expect("decode"), sid);
}
