#[cfg(unix)]
use std::os::unix::prelude::*;

use std::fmt;
use std::io;
use std::iter::repeat;
use std::mem;
use std::path::Path;

use crate::{EntryType, ScanError, BLOCK_SIZE};

/// Magic of the GNU flavour of the format, the only one accepted when an
/// archive is opened.
const GNU_MAGIC: &[u8; 6] = b"ustar ";

/// Representation of the header of an entry in an archive
#[repr(C)]
#[allow(missing_docs)]
#[derive(Clone)]
pub struct Header {
    pub name: [u8; 100],
    pub mode: [u8; 8],
    pub owner_id: [u8; 8],
    pub group_id: [u8; 8],
    pub size: [u8; 12],
    pub mtime: [u8; 12],
    pub cksum: [u8; 8],
    pub typeflag: [u8; 1],
    pub linkname: [u8; 100],

    pub magic: [u8; 6],
    pub version: [u8; 2],
    pub owner_name: [u8; 32],
    pub group_name: [u8; 32],
    pub dev_major: [u8; 8],
    pub dev_minor: [u8; 8],
    pub prefix: [u8; 155],
    _rest: [u8; 12],
}

impl Header {
    /// Creates a new blank GNU header ready to be filled in
    pub fn new_gnu() -> Header {
        let mut header: Header = unsafe { mem::zeroed() };
        header.magic = *GNU_MAGIC;
        header.version = *b" \0";
        header
    }

    /// Interprets a raw block as a header.
    ///
    /// Every bit pattern is a valid header; the fields are only decoded when
    /// asked for.
    pub fn from_bytes(bytes: &[u8; BLOCK_SIZE]) -> Header {
        unsafe { mem::transmute::<[u8; BLOCK_SIZE], Header>(*bytes) }
    }

    /// Returns a view into this header as a byte array.
    pub fn as_bytes(&self) -> &[u8; BLOCK_SIZE] {
        debug_assert_eq!(BLOCK_SIZE, mem::size_of_val(self));
        unsafe { &*(self as *const _ as *const [u8; BLOCK_SIZE]) }
    }

    /// Returns a mutable view into this header as a byte array.
    pub fn as_mut_bytes(&mut self) -> &mut [u8; BLOCK_SIZE] {
        debug_assert_eq!(BLOCK_SIZE, mem::size_of_val(self));
        unsafe { &mut *(self as *mut _ as *mut [u8; BLOCK_SIZE]) }
    }

    /// Returns whether every byte of this block is zero, which marks the end
    /// of an archive.
    pub fn is_zero(&self) -> bool {
        self.as_bytes().iter().all(|b| *b == 0)
    }

    /// Returns whether the magic field carries the GNU tag `"ustar "`.
    pub fn is_gnu(&self) -> bool {
        self.magic == *GNU_MAGIC
    }

    /// Returns the member name stored in this header as a byte array, up to
    /// the first NUL byte.
    pub fn name_bytes(&self) -> &[u8] {
        truncate(&self.name)
    }

    /// Returns the member name as a path.
    ///
    /// This method may fail if the name is not valid unicode and this is
    /// called on a non-unix platform.
    pub fn path(&self) -> io::Result<&Path> {
        bytes2path(self.name_bytes())
    }

    /// Sets the member name for this header.
    ///
    /// May fail if the path does not fit in the name field, contains a nul
    /// byte, or is not unicode on a non-unix platform.
    pub fn set_path<P: AsRef<Path>>(&mut self, p: P) -> io::Result<()> {
        let bytes = path2bytes(p.as_ref())?;
        copy_into(&mut self.name, bytes)
    }

    /// Returns the payload size this header describes.
    ///
    /// The field is an octal numeral padded with spaces or NUL bytes. Any
    /// other byte makes the header malformed. A field holding nothing but
    /// padding decodes to zero.
    pub fn parse_size(&self) -> Result<u64, ScanError> {
        octal_from("size", &self.size)
    }

    /// Encodes the `size` argument into the size field of this header.
    pub fn set_size(&mut self, size: u64) {
        octal_into(&mut self.size, size)
    }

    /// Returns the type of file described by this header.
    pub fn entry_type(&self) -> EntryType {
        EntryType::new(self.typeflag[0])
    }

    /// Sets the type of file that will be described by this header.
    pub fn set_entry_type(&mut self, ty: EntryType) {
        self.typeflag = [ty.as_byte()];
    }

    /// Returns whether this header describes a regular file, the only type
    /// this crate can list or extract.
    pub fn is_regular_file(&self) -> bool {
        self.entry_type().is_file()
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Header")
            .field("name", &String::from_utf8_lossy(self.name_bytes()))
            .field("size", &String::from_utf8_lossy(truncate(&self.size)))
            .field("entry_type", &self.entry_type())
            .field("magic", &String::from_utf8_lossy(&self.magic))
            .finish()
    }
}

fn octal_from(field: &'static str, slice: &[u8]) -> Result<u64, ScanError> {
    let malformed = || ScanError::MalformedHeader {
        field,
        value: String::from_utf8_lossy(truncate(slice)).into_owned(),
    };
    let mut n: u64 = 0;
    for &b in truncate(slice).trim_ascii() {
        if !(b'0'..=b'7').contains(&b) {
            return Err(malformed());
        }
        n = n
            .checked_mul(8)
            .and_then(|n| n.checked_add(u64::from(b - b'0')))
            .ok_or_else(malformed)?;
    }
    Ok(n)
}

fn octal_into<T: fmt::Octal>(dst: &mut [u8], val: T) {
    let o = format!("{:o}", val);
    let value = o.bytes().rev().chain(repeat(b'0'));
    for (slot, value) in dst.iter_mut().rev().skip(1).zip(value) {
        *slot = value;
    }
}

fn truncate(slice: &[u8]) -> &[u8] {
    match slice.iter().position(|i| *i == 0) {
        Some(i) => &slice[..i],
        None => slice,
    }
}

/// Copies `bytes` into the `slot` provided, returning an error if the `bytes`
/// array is too long or if it contains any nul bytes.
fn copy_into(slot: &mut [u8], bytes: &[u8]) -> io::Result<()> {
    if bytes.len() > slot.len() {
        Err(io::Error::new(io::ErrorKind::InvalidInput, "provided value is too long"))
    } else if bytes.contains(&0) {
        Err(io::Error::new(io::ErrorKind::InvalidInput, "provided value contains a nul byte"))
    } else {
        slot.fill(0);
        slot[..bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}

#[cfg(unix)]
fn bytes2path(bytes: &[u8]) -> io::Result<&Path> {
    use std::ffi::OsStr;
    Ok(Path::new(OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
fn bytes2path(bytes: &[u8]) -> io::Result<&Path> {
    std::str::from_utf8(bytes)
        .map(Path::new)
        .map_err(|_| not_unicode())
}

#[cfg(unix)]
fn path2bytes(p: &Path) -> io::Result<&[u8]> {
    Ok(p.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path2bytes(p: &Path) -> io::Result<&[u8]> {
    p.to_str().map(|s| s.as_bytes()).ok_or_else(not_unicode)
}

#[cfg(not(unix))]
fn not_unicode() -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        "only unicode paths are supported on this platform",
    )
}
