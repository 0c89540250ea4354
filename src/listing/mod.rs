//! Tabular listing of directories and entries.
//!
//! The listing layer is generic over the capabilities it reads: anything
//! that exposes an address, a size and a few descriptive strings can be
//! listed. Building a table is a pure projection of the model; [`Lister`]
//! only writes the result to its output stream.

pub mod table;

pub use table::{Align, Table};

use crate::config::ListingConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{PspError, Result};
use crate::model::{readable_bytes, Directory, Entry};
use std::collections::HashSet;
use std::io::Write;
use std::rc::Rc;
use tracing::debug;

pub const DIRECTORY_COLUMNS: [&str; 5] = ["Directory", "Addr", "Type", "Magic", "Secondary Directory"];

pub const ENTRY_COLUMNS: [&str; 9] = [
    " ",
    "Entry",
    "Address",
    "Size",
    "Type",
    "Type Name",
    "Magic",
    "Version",
    "Signed by",
];

/// Something that occupies a region of the image.
pub trait Located {
    /// Absolute address in the image.
    fn address(&self) -> usize;
    fn size(&self) -> usize;
}

pub trait EntryRecord: Located {
    fn entry_type(&self) -> u32;
    fn readable_type(&self) -> String;
    fn readable_magic(&self) -> String;
    fn readable_version(&self) -> String;
    fn readable_signed_by(&self) -> String;
}

pub trait DirectoryRecord: Located {
    type Entry: EntryRecord;

    fn kind(&self) -> String;
    fn magic(&self) -> &[u8];
    fn secondary_directory_address(&self) -> Option<usize>;
    fn entries(&self) -> &[Rc<Self::Entry>];
}

/// The root container: an ordered collection of directories.
pub trait FirmwareContainer {
    type Directory: DirectoryRecord;

    fn directories(&self) -> &[Self::Directory];

    /// Every entry referenced by any directory, once, sorted by address.
    fn unique_entries(&self) -> Vec<Rc<<Self::Directory as DirectoryRecord>::Entry>> {
        unique_entries(self.directories())
    }
}

pub type EntryOf<C> = <<C as FirmwareContainer>::Directory as DirectoryRecord>::Entry;

/// Collects the entries of `directories`, de-duplicated by identity and
/// sorted ascending by address.
pub fn unique_entries<D: DirectoryRecord>(directories: &[D]) -> Vec<Rc<D::Entry>> {
    let mut seen = HashSet::new();
    let mut entries: Vec<Rc<D::Entry>> = directories
        .iter()
        .flat_map(|dir| dir.entries().iter())
        .filter(|entry| seen.insert(Rc::as_ptr(*entry)))
        .cloned()
        .collect();
    entries.sort_by_key(|entry| entry.address());
    entries
}

impl Located for Entry {
    fn address(&self) -> usize {
        Entry::address(self)
    }

    fn size(&self) -> usize {
        Entry::size(self)
    }
}

impl EntryRecord for Entry {
    fn entry_type(&self) -> u32 {
        Entry::entry_type(self)
    }

    fn readable_type(&self) -> String {
        Entry::readable_type(self)
    }

    fn readable_magic(&self) -> String {
        Entry::readable_magic(self)
    }

    fn readable_version(&self) -> String {
        Entry::readable_version(self)
    }

    fn readable_signed_by(&self) -> String {
        Entry::readable_signed_by(self)
    }
}

impl Located for Directory {
    fn address(&self) -> usize {
        Directory::address(self)
    }

    fn size(&self) -> usize {
        Directory::size(self)
    }
}

impl DirectoryRecord for Directory {
    type Entry = Entry;

    fn kind(&self) -> String {
        Directory::kind(self).to_string()
    }

    fn magic(&self) -> &[u8] {
        Directory::magic(self)
    }

    fn secondary_directory_address(&self) -> Option<usize> {
        Directory::secondary_directory_address(self)
    }

    fn entries(&self) -> &[Rc<Entry>] {
        Directory::entries(self)
    }
}

/// Builds the one-row summary table for the directory at `index`.
pub fn directory_table<D: DirectoryRecord>(index: usize, directory: &D, config: &ListingConfig) -> Table {
    let mut table = Table::new(DIRECTORY_COLUMNS);
    // Address 0 is how an absent secondary directory is encoded on flash.
    let secondary = match directory.secondary_directory_address() {
        Some(address) if address != 0 => format!("{:#x}", address),
        _ => config.missing_marker.clone(),
    };
    table.add_row([
        index.to_string(),
        format!("{:#x}", directory.address()),
        directory.kind(),
        readable_bytes(directory.magic()),
        secondary,
    ]);
    table
}

/// Builds the right-aligned entry table, numbering rows in the given order.
pub fn entries_table<E: EntryRecord>(entries: &[Rc<E>]) -> Table {
    let mut table = Table::new(ENTRY_COLUMNS).with_align(Align::Right);
    for (index, entry) in entries.iter().enumerate() {
        table.add_row([
            String::new(),
            index.to_string(),
            format!("{:#x}", entry.address()),
            format!("{:#x}", entry.size()),
            format!("{:#x}", entry.entry_type()),
            entry.readable_type(),
            entry.readable_magic(),
            entry.readable_version(),
            entry.readable_signed_by(),
        ]);
    }
    table
}

/// Writes directory and entry tables to a primary output stream.
///
/// Diagnostics never go to `out`; they are sent to the injected sink.
pub struct Lister<'a, W: Write> {
    out: W,
    diagnostics: &'a dyn Diagnostics,
    config: ListingConfig,
}

impl<'a, W: Write> Lister<'a, W> {
    pub fn new(out: W, diagnostics: &'a dyn Diagnostics, config: ListingConfig) -> Self {
        Self {
            out,
            diagnostics,
            config,
        }
    }

    /// Gives back the output stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Lists every directory followed by its entries.
    pub fn ls<C: FirmwareContainer>(&mut self, container: &C) -> Result<()> {
        let directories = container.directories();
        if directories.is_empty() {
            self.diagnostics.warning("No directories found");
        }
        for (index, directory) in directories.iter().enumerate() {
            write!(self.out, "{}", directory_table(index, directory, &self.config))?;
            self.ls_dir(container, index)?;
            writeln!(self.out, "\n")?;
        }
        Ok(())
    }

    /// Lists the entries of the directory at `index`.
    ///
    /// # Errors
    ///
    /// Returns `PspError::DirectoryNotFound` if there is no such directory.
    pub fn ls_dir<C: FirmwareContainer>(&mut self, container: &C, index: usize) -> Result<()> {
        let directories = container.directories();
        let directory = directories.get(index).ok_or(PspError::DirectoryNotFound {
            index,
            count: directories.len(),
        })?;
        debug!(index, entries = directory.entries().len(), "Listing directory");
        self.ls_entries(container, Some(directory.entries()))
    }

    /// Lists `entries` as given, or every distinct entry of `container`
    /// sorted by address when `entries` is `None`.
    pub fn ls_entries<C: FirmwareContainer>(
        &mut self,
        container: &C,
        entries: Option<&[Rc<EntryOf<C>>]>,
    ) -> Result<()> {
        let table = match entries {
            Some(entries) => entries_table(entries),
            None => entries_table(&container.unique_entries()),
        };
        if table.rows().is_empty() {
            self.diagnostics.info("No entries to list");
        }
        write!(self.out, "{}", table)?;
        Ok(())
    }
}
