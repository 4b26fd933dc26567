use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The ways a scan over an archive can fail.
///
/// Each variant is terminal: the scan stops at the point the condition is
/// detected and nothing after it is read.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The stream is empty or its first header lacks the `"ustar "` magic.
    #[error("This does not look like a tar archive")]
    NotATarArchive,

    /// The stream ended where a full block (header or payload) was expected.
    #[error("Unexpected EOF in archive")]
    UnexpectedEof,

    /// A header describes something other than a regular file. Carries the
    /// raw type flag byte.
    #[error("Unsupported header type: {0}")]
    UnsupportedHeaderType(u8),

    /// A numeric header field holds something other than an octal numeral.
    #[error("Malformed {field} field in archive header: {value:?}")]
    MalformedHeader {
        /// Name of the offending field.
        field: &'static str,
        /// Raw field contents, lossily decoded.
        value: String,
    },

    /// A selected member could not be written out.
    #[error("{name}: {source}")]
    Extract {
        /// Name of the member as recorded in the archive.
        name: String,
        /// What went wrong while extracting it.
        #[source]
        source: ExtractError,
    },

    /// An I/O error from the archive stream or the listing output.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ScanError {
    /// Process exit status this failure maps to.
    pub fn exit_code(&self) -> u8 {
        match *self {
            ScanError::UnsupportedHeaderType(_) => 5,
            _ => 2,
        }
    }

    /// Returns whether the archive ran out before a header or a payload was
    /// complete, whether the member was being skipped or extracted.
    pub fn is_unexpected_eof(&self) -> bool {
        matches!(
            self,
            ScanError::UnexpectedEof
                | ScanError::Extract {
                    source: ExtractError::Truncated { .. },
                    ..
                }
        )
    }
}

/// Errors raised while copying one payload out of the archive.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The output file could not be created.
    #[error("Cannot open `{path}`: {source}", path = .path.display())]
    Create {
        /// Where the file was to be created.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The member name leaves the unpack directory through `..`, or names
    /// nothing once its root and `.` components are dropped.
    #[error("Refusing to extract to `{path}`", path = .path.display())]
    InvalidPath {
        /// Name of the member as recorded in the archive.
        path: PathBuf,
    },

    /// The archive ended before the whole payload was read.
    #[error("Unexpected EOF in archive after {copied} of {expected} bytes")]
    Truncated {
        /// Size recorded in the header.
        expected: u64,
        /// Bytes copied before the stream ran out.
        copied: u64,
    },

    /// Reading the payload from the archive failed.
    #[error("Read error in archive: {0}")]
    Read(#[source] io::Error),

    /// Writing to the output file failed.
    #[error("Write error: {0}")]
    Write(#[source] io::Error),
}
