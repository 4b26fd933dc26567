#![no_main]

use libfuzzer_sys::fuzz_target;

use mytar::{Archive, MemberFilter, Mode, BLOCK_SIZE};

fuzz_target!(|data: &[u8]| {
    let mut archive = match Archive::open(data) {
        Ok(archive) => archive,
        Err(_) => return,
    };

    // Listing only: extraction would write wherever the names point.
    let mode = Mode { extract: false, verbose: true };
    let mut filter = MemberFilter::new([&b"a"[..], &b""[..]]);
    let mut names = Vec::new();
    if let Ok(report) = archive.scan(mode, &mut filter, &mut names) {
        assert_eq!(archive.position() % BLOCK_SIZE as u64, 0);
        assert!(archive.position() <= data.len() as u64);
        assert!(report.selected <= report.members);
        assert_eq!(report.extracted, 0);
    }
});
