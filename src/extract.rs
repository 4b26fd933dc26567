use std::cmp;
use std::fs;
use std::io::prelude::*;
use std::path::Path;

use log::warn;

use crate::{read_all, ExtractError, BLOCK_SIZE};

/// Copies the next `size` bytes of `src` into a file at `dst`.
///
/// Any existing file at `dst` is overwritten; no parent directories are
/// created. The payload is moved one block at a time through `buf`, and the
/// last chunk is cut to what remains of the payload, so nothing past the
/// payload is read from `src`. On success `src` is left just after the last
/// payload byte; skipping the padding up to the next block boundary is up to
/// the caller.
///
/// Returns the number of bytes written, which always equals `size`.
///
/// # Errors
///
/// If `src` runs out before `size` bytes were read, the bytes that were
/// available are still written and `ExtractError::Truncated` is returned.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use mytar::BLOCK_SIZE;
///
/// let mut buf = [0; BLOCK_SIZE];
/// let data = b"hello world";
/// mytar::extract(&mut &data[..], Path::new("hello.txt"), 5, &mut buf).unwrap();
/// ```
pub fn extract<R: Read + ?Sized>(
    src: &mut R,
    dst: &Path,
    size: u64,
    buf: &mut [u8; BLOCK_SIZE],
) -> Result<u64, ExtractError> {
    let mut file = fs::File::create(dst).map_err(|e| ExtractError::Create {
        path: dst.to_path_buf(),
        source: e,
    })?;

    let mut copied = 0;
    while copied < size {
        let chunk = cmp::min(size - copied, BLOCK_SIZE as u64) as usize;
        let n = read_all(src, &mut buf[..chunk]).map_err(ExtractError::Read)?;
        file.write_all(&buf[..n]).map_err(ExtractError::Write)?;
        copied += n as u64;
        if n < chunk {
            return Err(ExtractError::Truncated {
                expected: size,
                copied,
            });
        }
    }

    // The bytes are all handed over at this point; a failure to flush them
    // out is worth a warning but does not undo the copy.
    if let Err(e) = file.sync_all() {
        warn!("failed to close `{}`: {}", dst.display(), e);
    }
    Ok(copied)
}
