use std::io::prelude::*;
use std::io::{self, BufReader, Chain, Cursor};
use std::path::{Component, Path, PathBuf};

use log::{debug, trace};

use crate::{
    extract, padded_size, read_all, ExtractError, Header, MemberFilter, ScanError, BLOCK_SIZE,
};

/// A top-level representation of an archive file.
///
/// An archive is opened once, which checks that the stream looks like a GNU
/// tar archive, and is then walked from its first header by [`Archive::scan`].
pub struct Archive<R: Read> {
    inner: ArchiveInner<R>,
    unpack_dir: PathBuf,
}

// The first block is consumed by `Archive::open` to look at its magic and
// is replayed in front of the rest of the stream, so the stream never needs
// to seek back to its start.
struct ArchiveInner<R> {
    pos: u64,
    obj: BufReader<Chain<Cursor<Vec<u8>>, R>>,
}

/// What a scan should do with the members it selects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mode {
    /// Write selected members to disk instead of only walking past them.
    pub extract: bool,
    /// Print the name of every selected member.
    pub verbose: bool,
}

/// How the end of an archive was recognized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArchiveEnd {
    /// The stream ended on a block boundary without any zero block.
    #[default]
    Eof,
    /// The stream ended right after a single zero block. Carries the number
    /// of blocks read up to and including that zero block.
    LoneZeroBlock(u64),
    /// A zero block was followed by another full block.
    Terminator,
}

/// Summary of a successful scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Number of member headers visited.
    pub members: u64,
    /// Number of members that passed the filter.
    pub selected: u64,
    /// Number of members written to disk.
    pub extracted: u64,
    /// How the scan found the end of the archive.
    pub end: ArchiveEnd,
}

impl<R: Read> Archive<R> {
    /// Opens an archive over the underlying reader.
    ///
    /// The first block of the stream is read and its magic field checked;
    /// only the GNU tag `"ustar "` is accepted. Nothing is listed or
    /// extracted yet.
    ///
    /// # Errors
    ///
    /// An empty stream or a first header with any other magic is
    /// `ScanError::NotATarArchive`. A stream that ends inside the first
    /// block is `ScanError::UnexpectedEof`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use mytar::Archive;
    ///
    /// let ar = Archive::open(File::open("foo.tar").unwrap()).unwrap();
    /// ```
    pub fn open(mut obj: R) -> Result<Archive<R>, ScanError> {
        let mut block = [0; BLOCK_SIZE];
        match read_all(&mut obj, &mut block)? {
            0 => return Err(ScanError::NotATarArchive),
            n if n < BLOCK_SIZE => return Err(ScanError::UnexpectedEof),
            _ => {}
        }
        if !Header::from_bytes(&block).is_gnu() {
            return Err(ScanError::NotATarArchive);
        }
        Ok(Archive {
            inner: ArchiveInner {
                pos: 0,
                obj: BufReader::new(Cursor::new(block.to_vec()).chain(obj)),
            },
            unpack_dir: PathBuf::from("."),
        })
    }

    /// Sets the directory extracted members are written into.
    ///
    /// Defaults to the current working directory. Member names are joined
    /// onto it with any leading `/` and `.` components dropped; a name
    /// holding `..` is refused. No directories are created.
    pub fn set_unpack_dir<P: AsRef<Path>>(&mut self, dir: P) {
        self.unpack_dir = dir.as_ref().to_path_buf();
    }

    /// Returns the number of bytes consumed from the stream so far.
    ///
    /// Between members this is always a multiple of `BLOCK_SIZE`.
    pub fn position(&self) -> u64 {
        self.inner.pos
    }

    /// Unwrap this archive, returning the underlying reader.
    ///
    /// Any bytes already buffered from the reader are lost.
    pub fn into_inner(self) -> R {
        self.inner.obj.into_inner().into_inner().1
    }

    /// Walks every member of the archive, from its first header up to its
    /// end.
    ///
    /// Each member passing `filter` is selected: its name is written to
    /// `out` on a line of its own when `mode.verbose` is set, and its
    /// contents are written to a file of the same name under the unpack
    /// directory when `mode.extract` is set. Everything else is skipped
    /// without being read into memory.
    ///
    /// Names in `filter` are consumed as they match, so whatever
    /// [`MemberFilter::missing`] yields afterwards was not in the archive.
    ///
    /// The end of the archive is recognized permissively: the stream may end
    /// on a block boundary, after a single zero block, or at the usual pair
    /// of zero blocks. Only a block cut short is an error.
    ///
    /// # Errors
    ///
    /// The scan stops at the first error. A truncated header or payload is
    /// `ScanError::UnexpectedEof`, a member that is not a regular file is
    /// `ScanError::UnsupportedHeaderType`, and failing to write a selected
    /// member is `ScanError::Extract`. Members listed or extracted before
    /// the error stay so.
    pub fn scan(
        &mut self,
        mode: Mode,
        filter: &mut MemberFilter,
        out: &mut dyn Write,
    ) -> Result<ScanReport, ScanError> {
        let mut report = ScanReport::default();
        let mut buf = Box::new([0; BLOCK_SIZE]);

        loop {
            if self.inner.at_eof()? {
                report.end = ArchiveEnd::Eof;
                return Ok(report);
            }

            let mut header = Header::new_gnu();
            self.read_block(header.as_mut_bytes())?;

            if header.is_zero() {
                report.end = self.finish_at_zero_block()?;
                return Ok(report);
            }

            report.members += 1;
            if !header.is_regular_file() {
                return Err(ScanError::UnsupportedHeaderType(
                    header.entry_type().as_byte(),
                ));
            }
            let size = header.parse_size()?;
            let name = header.name_bytes();
            debug!(
                "member `{}` ({} bytes) at offset {}",
                String::from_utf8_lossy(name),
                size,
                self.inner.pos - BLOCK_SIZE as u64
            );

            if !filter.select(name) {
                self.skip(padded_size(size))?;
                continue;
            }
            report.selected += 1;

            if mode.verbose {
                out.write_all(name)?;
                out.write_all(b"\n")?;
                out.flush()?;
            }

            if !mode.extract {
                self.skip(padded_size(size))?;
                continue;
            }

            let failed = |source| ScanError::Extract {
                name: String::from_utf8_lossy(name).into_owned(),
                source,
            };
            let dst = self.member_dst(header.path()?).map_err(failed)?;
            self.align()?;
            extract(&mut self.inner, &dst, size, &mut buf).map_err(failed)?;
            self.align()?;
            report.extracted += 1;
        }
    }

    // Leading `/`, drive prefixes and `.` parts are dropped so that every
    // member lands under the unpack directory.
    fn member_dst(&self, path: &Path) -> Result<PathBuf, ExtractError> {
        let invalid = || ExtractError::InvalidPath {
            path: path.to_path_buf(),
        };
        let mut dst = self.unpack_dir.clone();
        let mut parts = 0;
        for part in path.components() {
            match part {
                Component::Prefix(..) | Component::RootDir | Component::CurDir => continue,
                Component::ParentDir => return Err(invalid()),
                Component::Normal(part) => {
                    dst.push(part);
                    parts += 1;
                }
            }
        }
        if parts == 0 {
            return Err(invalid());
        }
        Ok(dst)
    }

    // Called right after reading an all-zero block.
    fn finish_at_zero_block(&mut self) -> Result<ArchiveEnd, ScanError> {
        let blocks = self.inner.pos / BLOCK_SIZE as u64;
        if self.inner.at_eof()? {
            debug!("a lone zero block at {}", blocks);
            return Ok(ArchiveEnd::LoneZeroBlock(blocks));
        }
        let mut block = [0; BLOCK_SIZE];
        self.read_block(&mut block)?;
        Ok(ArchiveEnd::Terminator)
    }

    fn read_block(&mut self, block: &mut [u8; BLOCK_SIZE]) -> Result<(), ScanError> {
        if read_all(&mut self.inner, block)? != BLOCK_SIZE {
            return Err(ScanError::UnexpectedEof);
        }
        Ok(())
    }

    // Moves forward to the next block boundary, if not already on one.
    fn align(&mut self) -> Result<(), ScanError> {
        let rem = self.inner.pos % BLOCK_SIZE as u64;
        if rem == 0 {
            return Ok(());
        }
        self.skip(BLOCK_SIZE as u64 - rem)
    }

    fn skip(&mut self, amt: u64) -> Result<(), ScanError> {
        trace!("skipping {} bytes at offset {}", amt, self.inner.pos);
        let skipped = io::copy(&mut (&mut self.inner).take(amt), &mut io::sink())?;
        if skipped != amt {
            return Err(ScanError::UnexpectedEof);
        }
        Ok(())
    }
}

impl<R: Read> ArchiveInner<R> {
    // End of stream is reached when the buffer cannot be refilled. Nothing is
    // consumed.
    fn at_eof(&mut self) -> io::Result<bool> {
        Ok(self.obj.fill_buf()?.is_empty())
    }
}

impl<R: Read> Read for ArchiveInner<R> {
    fn read(&mut self, into: &mut [u8]) -> io::Result<usize> {
        self.obj.read(into).inspect(|i| self.pos += *i as u64)
    }
}
