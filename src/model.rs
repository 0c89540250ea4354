//! In-memory directory and entry records.
//!
//! These are the records a layout parser hands to the listing layer. Each one
//! wraps a [`NestedBuffer`] over its region of the image plus the descriptive
//! fields the parser decoded. Parsing itself happens elsewhere.

use crate::buffer::{NestedBuffer, Result};
use std::fmt;
use std::rc::Rc;

/// Length of the magic tag at the start of a directory header.
pub const DIRECTORY_MAGIC_LEN: usize = 4;

/// Decodes `bytes` as UTF-8, escaping invalid bytes as `\xNN`.
pub fn readable_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
        for byte in chunk.invalid() {
            out.push_str(&format!("\\x{:02x}", byte));
        }
    }
    out
}

/// A firmware entry: one region referenced by a directory.
#[derive(Debug, Clone)]
pub struct Entry {
    view: NestedBuffer,
    entry_type: u32,
    type_name: Option<String>,
    magic: Vec<u8>,
    version: Option<String>,
    signed_by: Option<String>,
}

impl Entry {
    pub fn new(view: NestedBuffer, entry_type: u32) -> Self {
        Self {
            view,
            entry_type,
            type_name: None,
            magic: Vec::new(),
            version: None,
            signed_by: None,
        }
    }

    pub fn with_type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = Some(name.into());
        self
    }

    pub fn with_magic(mut self, magic: impl Into<Vec<u8>>) -> Self {
        self.magic = magic.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_signed_by(mut self, signer: impl Into<String>) -> Self {
        self.signed_by = Some(signer.into());
        self
    }

    pub fn view(&self) -> &NestedBuffer {
        &self.view
    }

    pub fn entry_type(&self) -> u32 {
        self.entry_type
    }

    pub fn address(&self) -> usize {
        self.view.address()
    }

    pub fn size(&self) -> usize {
        self.view.len()
    }

    pub fn magic(&self) -> &[u8] {
        &self.magic
    }

    /// Known type name, or the hex type code when the type is unknown.
    pub fn readable_type(&self) -> String {
        match &self.type_name {
            Some(name) => name.clone(),
            None => format!("{:#x}", self.entry_type),
        }
    }

    pub fn readable_magic(&self) -> String {
        readable_bytes(&self.magic)
    }

    pub fn readable_version(&self) -> String {
        self.version.clone().unwrap_or_default()
    }

    pub fn readable_signed_by(&self) -> String {
        self.signed_by.clone().unwrap_or_default()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Entry(type={:#x}, address={:#x}, size={:#x})",
            self.entry_type,
            self.address(),
            self.size()
        )
    }
}

/// A firmware directory: a header region plus the entries it lists.
///
/// Entries are shared through `Rc` so that one entry may be referenced by
/// several directories; identity is what the listing layer de-duplicates on.
#[derive(Debug, Clone)]
pub struct Directory {
    view: NestedBuffer,
    kind: String,
    magic: Vec<u8>,
    secondary_directory_address: Option<usize>,
    entries: Vec<Rc<Entry>>,
}

impl Directory {
    /// Creates a directory over `view`, reading its magic tag from the first
    /// bytes of the header.
    pub fn new(view: NestedBuffer, kind: impl Into<String>) -> Result<Self> {
        let magic_len = DIRECTORY_MAGIC_LEN.min(view.len());
        let magic = view.get_bytes(0, Some(magic_len))?;
        Ok(Self {
            view,
            kind: kind.into(),
            magic,
            secondary_directory_address: None,
            entries: Vec::new(),
        })
    }

    pub fn with_secondary_directory(mut self, address: usize) -> Self {
        self.secondary_directory_address = Some(address);
        self
    }

    pub fn push_entry(&mut self, entry: Rc<Entry>) {
        self.entries.push(entry);
    }

    pub fn view(&self) -> &NestedBuffer {
        &self.view
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn magic(&self) -> &[u8] {
        &self.magic
    }

    pub fn address(&self) -> usize {
        self.view.address()
    }

    pub fn size(&self) -> usize {
        self.view.len()
    }

    pub fn secondary_directory_address(&self) -> Option<usize> {
        self.secondary_directory_address
    }

    pub fn entries(&self) -> &[Rc<Entry>] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RootBuffer;

    #[test]
    fn readable_bytes_escapes_invalid_utf8() {
        assert_eq!(readable_bytes(b"$PSP"), "$PSP");
        assert_eq!(readable_bytes(b"$P\xffL"), "$P\\xffL");
        assert_eq!(readable_bytes(b"\x00\x80"), "\u{0}\\x80");
    }

    #[test]
    fn directory_reads_magic_from_header() {
        let mut bytes = vec![0u8; 0x40];
        bytes[0x10..0x14].copy_from_slice(b"$PSP");
        let root = RootBuffer::new(bytes);
        let view = NestedBuffer::new(&root, 0x20, 0x10).unwrap();
        let dir = Directory::new(view, "PSP").unwrap();
        assert_eq!(dir.magic(), b"$PSP");
        assert_eq!(dir.address(), 0x10);
        assert_eq!(dir.secondary_directory_address(), None);
    }

    #[test]
    fn entry_readable_fields() {
        let root = RootBuffer::new(vec![0u8; 0x100]);
        let view = NestedBuffer::new(&root, 0x40, 0x80).unwrap();
        let entry = Entry::new(view, 0x1).with_magic(b"$PS1".to_vec());
        assert_eq!(entry.readable_type(), "0x1");
        assert_eq!(entry.readable_magic(), "$PS1");
        assert_eq!(entry.readable_version(), "");

        let named = entry.clone().with_type_name("PSP_FW_BOOT_LOADER").with_version("0.8.0.5f");
        assert_eq!(named.readable_type(), "PSP_FW_BOOT_LOADER");
        assert_eq!(named.readable_version(), "0.8.0.5f");
        assert_eq!(named.to_string(), "Entry(type=0x1, address=0x80, size=0x40)");
    }
}
