use std::iter;
use std::path::Path;

use mytar::{EntryType, Header, BLOCK_SIZE};

#[test]
fn default_gnu() {
    let h = Header::new_gnu();
    assert!(h.is_gnu());
    assert!(!h.is_zero());
    assert!(h.is_regular_file());
    assert_eq!(h.name_bytes(), b"");
    assert_eq!(t!(h.parse_size()), 0);
    assert_eq!(h.as_bytes().len(), BLOCK_SIZE);
}

#[test]
fn zero_block() {
    let h = Header::from_bytes(&[0; BLOCK_SIZE]);
    assert!(h.is_zero());
    assert!(!h.is_gnu());
}

#[test]
fn other_magics() {
    let ustar = tar::Header::new_ustar();
    assert!(!Header::from_bytes(ustar.as_bytes()).is_gnu());
    let old = tar::Header::new_old();
    assert!(!Header::from_bytes(old.as_bytes()).is_gnu());
}

#[test]
fn reads_upstream_gnu_header() {
    let mut theirs = tar::Header::new_gnu();
    t!(theirs.set_path("dir/file.txt"));
    theirs.set_size(0o1234567);
    theirs.set_entry_type(tar::EntryType::Regular);
    theirs.set_cksum();

    let ours = Header::from_bytes(theirs.as_bytes());
    assert!(ours.is_gnu());
    assert_eq!(ours.name_bytes(), b"dir/file.txt");
    assert_eq!(t!(ours.path()), Path::new("dir/file.txt"));
    assert_eq!(t!(ours.parse_size()), 0o1234567);
    assert_eq!(ours.entry_type(), EntryType::file());
    assert_eq!(&ours.as_bytes()[..], &theirs.as_bytes()[..]);
}

#[test]
fn name_is_truncated_at_nul() {
    let mut h = Header::new_gnu();
    h.name[..7].copy_from_slice(b"abc\0def");
    assert_eq!(h.name_bytes(), b"abc");

    let full = iter::repeat(b'n').take(100).collect::<Vec<_>>();
    h.name.copy_from_slice(&full);
    assert_eq!(h.name_bytes(), &full[..]);
}

#[test]
fn set_path() {
    let mut h = Header::new_gnu();
    t!(h.set_path("a-much-longer-name"));
    t!(h.set_path("short"));
    assert_eq!(h.name_bytes(), b"short");

    let long = iter::repeat("abcd").take(26).collect::<String>();
    assert!(h.set_path(&long).is_err());
    assert!(h.set_path("a\0b").is_err());
    assert_eq!(h.name_bytes(), b"short");
}

#[test]
fn entry_types() {
    let mut h = Header::new_gnu();
    h.set_entry_type(EntryType::file());
    assert_eq!(h.typeflag, [b'0']);
    assert!(h.is_regular_file());

    h.set_entry_type(EntryType::dir());
    assert!(!h.is_regular_file());
    assert_eq!(h.entry_type().as_byte(), b'5');

    h.set_entry_type(EntryType::symlink());
    assert!(!h.is_regular_file());

    h.set_entry_type(EntryType::new(0));
    assert!(h.is_regular_file());
}

#[test]
fn size_round_trips_through_field() {
    let mut h = Header::new_gnu();
    for &size in &[0u64, 1, 511, 512, 513, 0o77777777777] {
        h.set_size(size);
        assert_eq!(t!(h.parse_size()), size);
    }
}
