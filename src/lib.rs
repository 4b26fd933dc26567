//! A library for listing and extracting GNU-flavoured TAR archives
//!
//! This library walks a TAR archive [1] one 512-byte block at a time over
//! any reader, listing the names of its members or writing their contents to
//! disk. Only regular files are supported; the archive is never required to
//! be resident in memory, and the underlying reader never needs to seek.
//!
//! Every way an archive can go wrong (a foreign format, a truncated header
//! or payload, an unsupported member type) is reported as a distinct
//! [`ScanError`] variant.
//!
//! # Examples
//!
//! ```no_run
//! use std::fs::File;
//! use std::io;
//! use mytar::{Archive, MemberFilter, Mode};
//!
//! let mut ar = Archive::open(File::open("foo.tar").unwrap()).unwrap();
//! let mut filter = MemberFilter::new(["a.txt", "b.txt"]);
//! let mode = Mode { extract: true, verbose: true };
//! ar.scan(mode, &mut filter, &mut io::stdout()).unwrap();
//! for name in filter.missing() {
//!     eprintln!("{}: Not found in archive", String::from_utf8_lossy(name));
//! }
//! ```
//!
//! [1]: http://en.wikipedia.org/wiki/Tar_%28computing%29

#![deny(missing_docs)]

use std::io::{self, Read};

pub use crate::archive::{Archive, ArchiveEnd, Mode, ScanReport};
pub use crate::entry_type::EntryType;
pub use crate::error::{ExtractError, ScanError};
pub use crate::extract::extract;
pub use crate::filter::MemberFilter;
pub use crate::header::Header;

mod archive;
mod entry_type;
mod error;
mod extract;
mod filter;
mod header;

/// Size of one archive block. Headers occupy exactly one block and payloads
/// are padded with zeros up to a multiple of it.
pub const BLOCK_SIZE: usize = 512;

/// Number of bytes a payload of `size` bytes occupies in the archive,
/// padding included.
pub fn padded_size(size: u64) -> u64 {
    let block = BLOCK_SIZE as u64;
    size.div_ceil(block) * block
}

// Fills as much of `buf` as the reader can provide, stopping early only at
// end of stream. Returns how many bytes were read.
fn read_all<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut read = 0;
    while read < buf.len() {
        match r.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(read)
}
