// See https://en.wikipedia.org/wiki/Tar_%28computing%29#UStar_format
/// Indicate for the type of file described by a header.
///
/// Each `Header` has an `entry_type` method returning an instance of this type
/// which can be used to inspect what the header is describing. Only regular
/// files can be listed or extracted; every other type stops a scan with
/// `ScanError::UnsupportedHeaderType`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EntryType {
    byte: u8,
}

impl EntryType {
    /// Creates a new entry type from a raw byte.
    ///
    /// Note that the other named constructors of entry type may be more
    /// appropriate to create a file type from.
    pub fn new(byte: u8) -> EntryType {
        EntryType { byte }
    }

    /// Creates a new entry type representing a regular file.
    pub fn file() -> EntryType {
        EntryType::new(b'0')
    }

    /// Creates a new entry type representing a symlink.
    pub fn symlink() -> EntryType {
        EntryType::new(b'2')
    }

    /// Creates a new entry type representing a directory.
    pub fn dir() -> EntryType {
        EntryType::new(b'5')
    }

    /// Returns whether this type represents a regular file.
    ///
    /// Old archives leave the type flag as a NUL byte for regular files, so
    /// that is accepted as well.
    pub fn is_file(&self) -> bool {
        self.byte == 0 || self.byte == b'0'
    }

    /// Returns the raw underlying byte that this entry type represents.
    pub fn as_byte(&self) -> u8 {
        self.byte
    }
}
