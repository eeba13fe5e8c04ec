//! Decoder tests for the NFSv3 procedure layer, driven by synthetic reply
//! bytes. The failure-arm tests all carry the status-adjacent attribute
//! blocks RFC 1813 mandates, which is exactly what the decoders must consume
//! before branching.

use nfs_mako::error::{nfsstat3, Error};
use nfs_mako::protocol::nfs::v3::{self, ftype3, stable_how};
use nfs_mako::protocol::nfs::{mount, portmap};
use nfs_mako::xdr::XdrEncoder;

// post_op_attr with attributes omitted.
fn put_attr_absent(enc: &mut XdrEncoder) {
    enc.put_bool(false);
}

// post_op_attr with a present fattr3 (21 words), fileid as given.
fn put_attr_present(enc: &mut XdrEncoder, fileid: u64) {
    enc.put_bool(true);
    enc.put_u32(1); // type NF3REG
    enc.put_u32(0o644); // mode
    enc.put_u32(1); // nlink
    enc.put_u32(1000); // uid
    enc.put_u32(1000); // gid
    enc.put_u64(4096); // size
    enc.put_u64(4096); // used
    enc.put_u32(0); // rdev major
    enc.put_u32(0); // rdev minor
    enc.put_u64(0x1234); // fsid
    enc.put_u64(fileid);
    enc.put_u32(10); // atime
    enc.put_u32(0);
    enc.put_u32(20); // mtime
    enc.put_u32(0);
    enc.put_u32(30); // ctime
    enc.put_u32(0);
}

// wcc_data with both halves omitted.
fn put_wcc_empty(enc: &mut XdrEncoder) {
    enc.put_bool(false); // pre_op_attr
    enc.put_bool(false); // post_op_attr
}

// wcc_data with both halves present.
fn put_wcc_full(enc: &mut XdrEncoder) {
    enc.put_bool(true); // pre_op_attr
    enc.put_u64(100); // size
    enc.put_u32(1); // mtime
    enc.put_u32(0);
    enc.put_u32(2); // ctime
    enc.put_u32(0);
    put_attr_present(enc, 42);
}

fn put_fh(enc: &mut XdrEncoder, data: &[u8]) {
    enc.put_opaque(data);
}

// ── GETATTR ──────────────────────────────────────────────────────────────────

#[test]
fn getattr_ok() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    enc.put_u32(2); // type NF3DIR
    enc.put_u32(0o755);
    enc.put_u32(3);
    enc.put_u32(0);
    enc.put_u32(0);
    enc.put_u64(4096);
    enc.put_u64(8192);
    enc.put_u32(0);
    enc.put_u32(0);
    enc.put_u64(7);
    enc.put_u64(1234567);
    enc.put_u32(10);
    enc.put_u32(1);
    enc.put_u32(20);
    enc.put_u32(2);
    enc.put_u32(30);
    enc.put_u32(3);

    let attrs = v3::getattr::decode_getattr_reply(enc.bytes()).expect("decode");
    assert_eq!(attrs.ftype, ftype3::NF3DIR);
    assert_eq!(attrs.mode, 0o755);
    assert_eq!(attrs.fileid, 1234567);
    assert_eq!(attrs.mtime.seconds, 20);
}

#[test]
fn getattr_error_status() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(70); // NFS3ERR_STALE
    let err = v3::getattr::decode_getattr_reply(enc.bytes()).expect_err("stale");
    assert!(err.is3(nfsstat3::NFS3ERR_STALE));
}

// ── SETATTR ──────────────────────────────────────────────────────────────────

#[test]
fn setattr_ok_consumes_wcc() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_wcc_full(&mut enc);
    v3::setattr::decode_setattr_reply(enc.bytes()).expect("decode");
}

#[test]
fn setattr_guard_mismatch() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(10002); // NFS3ERR_NOT_SYNC
    put_wcc_empty(&mut enc);
    let err = v3::setattr::decode_setattr_reply(enc.bytes()).expect_err("not sync");
    assert!(err.is3(nfsstat3::NFS3ERR_NOT_SYNC));
}

// ── LOOKUP ───────────────────────────────────────────────────────────────────

#[test]
fn lookup_ok() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_fh(&mut enc, &[0xab; 32]);
    put_attr_present(&mut enc, 55);
    put_attr_absent(&mut enc);

    let fh = v3::lookup::decode_lookup_reply(enc.bytes()).expect("decode");
    assert_eq!(fh.data, vec![0xab; 32]);
}

#[test]
fn lookup_noent_carries_dir_attrs() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(2); // NFS3ERR_NOENT
    put_attr_present(&mut enc, 99); // dir_attributes on the failure arm
    let err = v3::lookup::decode_lookup_reply(enc.bytes()).expect_err("noent");
    assert!(err.is3(nfsstat3::NFS3ERR_NOENT));
}

// ── ACCESS ───────────────────────────────────────────────────────────────────

#[test]
fn access_ok_may_exceed_requested_mask() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_attr_present(&mut enc, 1);
    enc.put_u32(v3::ACCESS3_READ | v3::ACCESS3_LOOKUP | v3::ACCESS3_EXECUTE);

    let granted = v3::access::decode_access_reply(enc.bytes()).expect("decode");
    assert_eq!(granted & v3::ACCESS3_READ, v3::ACCESS3_READ);
    assert_eq!(granted & v3::ACCESS3_EXECUTE, v3::ACCESS3_EXECUTE);
}

#[test]
fn access_error_consumes_attrs() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(13); // NFS3ERR_ACCES
    put_attr_present(&mut enc, 1);
    let err = v3::access::decode_access_reply(enc.bytes()).expect_err("acces");
    assert!(err.is3(nfsstat3::NFS3ERR_ACCES));
}

// ── READLINK ─────────────────────────────────────────────────────────────────

#[test]
fn readlink_ok() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_attr_present(&mut enc, 5);
    enc.put_string("../target/file");
    let path = v3::readlink::decode_readlink_reply(enc.bytes()).expect("decode");
    assert_eq!(path, "../target/file");
}

// ── READ ─────────────────────────────────────────────────────────────────────

#[test]
fn read_ok() {
    let payload = b"hello nfs".to_vec();
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_attr_present(&mut enc, 8);
    enc.put_u32(payload.len() as u32);
    enc.put_bool(true); // eof
    enc.put_opaque(&payload);

    let result = v3::read::decode_read_reply(enc.bytes()).expect("decode");
    assert_eq!(result.data, payload);
    assert!(result.eof);
}

#[test]
fn read_failure_arm_has_only_attrs() {
    // a failure reply carrying nothing but the mandatory post_op_attr must
    // decode into an error without underflow
    let mut enc = XdrEncoder::new();
    enc.put_u32(5); // NFS3ERR_IO
    put_attr_absent(&mut enc);
    let err = v3::read::decode_read_reply(enc.bytes()).expect_err("io");
    assert!(err.is3(nfsstat3::NFS3ERR_IO));
}

// ── WRITE ────────────────────────────────────────────────────────────────────

#[test]
fn write_ok() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_wcc_full(&mut enc);
    enc.put_u32(512); // count
    enc.put_u32(2); // FILE_SYNC
    enc.put_fixed_opaque(&[7u8; 8]); // verf

    let result = v3::write::decode_write_reply(enc.bytes()).expect("decode");
    assert_eq!(result.count, 512);
    assert_eq!(result.committed, stable_how::FILE_SYNC);
    assert_eq!(result.verf, [7u8; 8]);
}

#[test]
fn write_nospc() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(28); // NFS3ERR_NOSPC
    put_wcc_empty(&mut enc);
    let err = v3::write::decode_write_reply(enc.bytes()).expect_err("nospc");
    assert!(err.is3(nfsstat3::NFS3ERR_NOSPC));
}

// ── CREATE / MKDIR / SYMLINK / MKNOD ─────────────────────────────────────────

#[test]
fn create_ok() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    enc.put_bool(true); // fh present
    put_fh(&mut enc, &[1, 2, 3, 4]);
    put_attr_present(&mut enc, 77);
    put_wcc_empty(&mut enc);

    let fh = v3::create::decode_create_reply(enc.bytes()).expect("decode");
    assert_eq!(fh.data, vec![1, 2, 3, 4]);
}

#[test]
fn create_without_file_handle_is_semantic_error() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    enc.put_bool(false); // fh_present = false despite success
    put_attr_absent(&mut enc);
    put_wcc_empty(&mut enc);

    let err = v3::create::decode_create_reply(enc.bytes()).expect_err("no fh");
    assert!(matches!(err, Error::MissingFileHandle { proc: "CREATE" }));
}

#[test]
fn create_exist() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(17); // NFS3ERR_EXIST
    put_wcc_empty(&mut enc);
    let err = v3::create::decode_create_reply(enc.bytes()).expect_err("exist");
    assert!(err.is3(nfsstat3::NFS3ERR_EXIST));
}

#[test]
fn exclusive_create_args_carry_verifier_not_attrs() {
    let dir = v3::nfs_fh3 { data: vec![9; 16] };
    let verf = [0xa5u8; 8];
    let args = v3::create::encode_create_exclusive_args(&dir, "x", &verf);
    // fh(4+16) + name(4+1+3) + mode(4) + verf(8)
    assert_eq!(args.len(), 40);
    assert_eq!(&args[28..32], &[0, 0, 0, 2]); // EXCLUSIVE
    assert_eq!(&args[32..40], &verf);
}

#[test]
fn mkdir_ok() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    enc.put_bool(true);
    put_fh(&mut enc, &[5; 8]);
    put_attr_absent(&mut enc);
    put_wcc_empty(&mut enc);

    let fh = v3::mkdir::decode_mkdir_reply(enc.bytes()).expect("decode");
    assert_eq!(fh.data, vec![5; 8]);
}

#[test]
fn symlink_ok() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    enc.put_bool(true);
    put_fh(&mut enc, &[6; 8]);
    put_attr_present(&mut enc, 3);
    put_wcc_full(&mut enc);

    let fh = v3::symlink::decode_symlink_reply(enc.bytes()).expect("decode");
    assert_eq!(fh.data, vec![6; 8]);
}

#[test]
fn mknod_ok() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    enc.put_bool(true);
    put_fh(&mut enc, &[7; 8]);
    put_attr_absent(&mut enc);
    put_wcc_empty(&mut enc);

    let fh = v3::mknod::decode_mknod_reply(enc.bytes()).expect("decode");
    assert_eq!(fh.data, vec![7; 8]);
}

#[test]
fn mknod_device_args_append_specdata() {
    let dir = v3::nfs_fh3 { data: vec![1; 4] };
    let attrs = v3::sattr3::default();
    let plain = v3::mknod::encode_mknod_args(&dir, "dev", ftype3::NF3CHR, &attrs);
    let spec = v3::specdata3 { specdata1: 8, specdata2: 1 };
    let device = v3::mknod::encode_mknod_device_args(&dir, "dev", ftype3::NF3CHR, &attrs, spec);
    assert_eq!(device.len(), plain.len() + 8);
    assert_eq!(&device[device.len() - 8..], &[0, 0, 0, 8, 0, 0, 0, 1]);
}

// ── REMOVE / RMDIR / RENAME / LINK ───────────────────────────────────────────

#[test]
fn remove_ok() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_wcc_full(&mut enc);
    v3::remove::decode_remove_reply(enc.bytes()).expect("decode");
}

#[test]
fn rmdir_notempty() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(66); // NFS3ERR_NOTEMPTY
    put_wcc_empty(&mut enc);
    let err = v3::rmdir::decode_rmdir_reply(enc.bytes()).expect_err("notempty");
    assert!(err.is3(nfsstat3::NFS3ERR_NOTEMPTY));
}

#[test]
fn rename_ok_consumes_both_wcc_blocks() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_wcc_full(&mut enc); // fromdir_wcc
    put_wcc_full(&mut enc); // todir_wcc
    v3::rename::decode_rename_reply(enc.bytes()).expect("decode");
}

#[test]
fn rename_failure_consumes_both_wcc_blocks() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(13);
    put_wcc_empty(&mut enc);
    put_wcc_empty(&mut enc);
    let err = v3::rename::decode_rename_reply(enc.bytes()).expect_err("acces");
    assert!(err.is3(nfsstat3::NFS3ERR_ACCES));
}

#[test]
fn link_ok() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_attr_present(&mut enc, 11); // file_attributes
    put_wcc_empty(&mut enc); // linkdir_wcc
    v3::link::decode_link_reply(enc.bytes()).expect("decode");
}

// ── READDIR / READDIRPLUS ────────────────────────────────────────────────────

#[test]
fn readdir_page_with_entries() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_attr_present(&mut enc, 2);
    enc.put_fixed_opaque(&[0xc0; 8]); // cookieverf

    for (fileid, name, cookie) in [(10u64, ".", 1u64), (11, "..", 2), (12, "data.bin", 3)] {
        enc.put_bool(true);
        enc.put_u64(fileid);
        enc.put_string(name);
        enc.put_u64(cookie);
    }
    enc.put_bool(false); // end of list
    enc.put_bool(true); // eof

    let page = v3::readdir::decode_readdir_reply(enc.bytes()).expect("decode");
    assert_eq!(page.cookieverf, [0xc0; 8]);
    assert_eq!(page.entries.len(), 3);
    assert_eq!(page.entries[2].name, "data.bin");
    assert_eq!(page.entries[2].cookie, 3);
    assert!(page.eof);
}

#[test]
fn readdir_empty_directory() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_attr_absent(&mut enc);
    enc.put_fixed_opaque(&[0; 8]);
    enc.put_bool(false);
    enc.put_bool(true);

    let page = v3::readdir::decode_readdir_reply(enc.bytes()).expect("decode");
    assert!(page.entries.is_empty());
    assert!(page.eof);
}

#[test]
fn readdir_bad_cookie() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(10003); // NFS3ERR_BAD_COOKIE
    put_attr_absent(&mut enc);
    let err = v3::readdir::decode_readdir_reply(enc.bytes()).expect_err("bad cookie");
    assert!(err.is3(nfsstat3::NFS3ERR_BAD_COOKIE));
}

#[test]
fn readdirplus_entries_with_optional_attrs_and_fh() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_attr_absent(&mut enc);
    enc.put_fixed_opaque(&[0xd0; 8]);

    // entry with both attrs and fh
    enc.put_bool(true);
    enc.put_u64(20);
    enc.put_string("full");
    enc.put_u64(1);
    put_attr_present(&mut enc, 20);
    enc.put_bool(true);
    put_fh(&mut enc, &[2; 12]);

    // entry with neither
    enc.put_bool(true);
    enc.put_u64(21);
    enc.put_string("bare");
    enc.put_u64(2);
    enc.put_bool(false);
    enc.put_bool(false);

    enc.put_bool(false);
    enc.put_bool(true);

    let page = v3::readdirplus::decode_readdirplus_reply(enc.bytes()).expect("decode");
    assert_eq!(page.entries.len(), 2);
    assert_eq!(page.entries[0].attrs.expect("attrs").fileid, 20);
    assert_eq!(page.entries[0].fh.as_ref().expect("fh").data, vec![2; 12]);
    assert!(page.entries[1].attrs.is_none());
    assert!(page.entries[1].fh.is_none());
}

// ── FSSTAT / FSINFO / PATHCONF / COMMIT ──────────────────────────────────────

#[test]
fn fsstat_ok() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_attr_absent(&mut enc);
    enc.put_u64(1 << 40);
    enc.put_u64(1 << 39);
    enc.put_u64(1 << 38);
    enc.put_u64(1000000);
    enc.put_u64(500000);
    enc.put_u64(400000);
    enc.put_u32(30);

    let fsstat = v3::fsstat::decode_fsstat_reply(enc.bytes()).expect("decode");
    assert_eq!(fsstat.tbytes, 1 << 40);
    assert_eq!(fsstat.afiles, 400000);
    assert_eq!(fsstat.invarsec, 30);
}

#[test]
fn fsinfo_ok() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_attr_absent(&mut enc);
    enc.put_u32(1048576); // rtmax
    enc.put_u32(65536);
    enc.put_u32(4096);
    enc.put_u32(1048576); // wtmax
    enc.put_u32(65536);
    enc.put_u32(4096);
    enc.put_u32(8192); // dtpref
    enc.put_u64(u64::MAX);
    enc.put_u32(0); // time_delta
    enc.put_u32(1);
    enc.put_u32(v3::fsinfo::FSF_LINK | v3::fsinfo::FSF_SYMLINK | v3::fsinfo::FSF_HOMOGENEOUS);

    let fsinfo = v3::fsinfo::decode_fsinfo_reply(enc.bytes()).expect("decode");
    assert_eq!(fsinfo.rtmax, 1048576);
    assert_eq!(fsinfo.wtpref, 65536);
    assert_ne!(fsinfo.properties & v3::fsinfo::FSF_SYMLINK, 0);
}

#[test]
fn pathconf_ok() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_attr_absent(&mut enc);
    enc.put_u32(32000); // linkmax
    enc.put_u32(255); // name_max
    enc.put_bool(true);
    enc.put_bool(true);
    enc.put_bool(false);
    enc.put_bool(true);

    let pc = v3::pathconf::decode_pathconf_reply(enc.bytes()).expect("decode");
    assert_eq!(pc.name_max, 255);
    assert!(pc.no_trunc);
    assert!(!pc.case_insensitive);
    assert!(pc.case_preserving);
}

#[test]
fn commit_ok_returns_verifier() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    put_wcc_full(&mut enc);
    enc.put_fixed_opaque(&[0xee; 8]);

    let verf = v3::commit::decode_commit_reply(enc.bytes()).expect("decode");
    assert_eq!(verf, [0xee; 8]);
}

// ── MOUNT / PORTMAP ──────────────────────────────────────────────────────────

#[test]
fn mnt_reply_with_auth_flavors() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    enc.put_opaque(&[0x42; 28]); // fhandle3
    enc.put_u32(2); // two auth flavors, consumed and discarded
    enc.put_u32(0);
    enc.put_u32(1);

    let fh = mount::decode_mnt_reply(enc.bytes()).expect("decode");
    assert_eq!(fh.data, vec![0x42; 28]);
}

#[test]
fn mnt_reply_access_denied() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(13);
    let err = mount::decode_mnt_reply(enc.bytes()).expect_err("denied");
    assert!(err.is3(nfsstat3::NFS3ERR_ACCES));
}

#[test]
fn export_list_linked_lists() {
    let mut enc = XdrEncoder::new();
    // first export with two groups
    enc.put_bool(true);
    enc.put_string("/export/a");
    enc.put_bool(true);
    enc.put_string("*.lab");
    enc.put_bool(true);
    enc.put_string("10.0.0.0/8");
    enc.put_bool(false);
    // second export, open to everyone
    enc.put_bool(true);
    enc.put_string("/export/b");
    enc.put_bool(false);
    // end of exports
    enc.put_bool(false);

    let exports = mount::decode_export_reply(enc.bytes()).expect("decode");
    assert_eq!(exports.len(), 2);
    assert_eq!(exports[0].path, "/export/a");
    assert_eq!(exports[0].groups, vec!["*.lab", "10.0.0.0/8"]);
    assert!(exports[1].groups.is_empty());
}

#[test]
fn getport_zero_means_unregistered() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(0);
    let err = portmap::decode_getport_reply(enc.bytes(), 100005, 3).expect_err("unregistered");
    assert!(matches!(err, Error::PortmapUnregistered { prog: 100005, vers: 3 }));
}

#[test]
fn getport_returns_port() {
    let mut enc = XdrEncoder::new();
    enc.put_u32(2049);
    let port = portmap::decode_getport_reply(enc.bytes(), 100003, 3).expect("decode");
    assert_eq!(port, 2049);
}
