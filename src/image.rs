//! The loaded firmware image.
//!
//! A [`FirmwareImage`] owns the root buffer for the lifetime of an
//! inspection session together with the directories a layout parser has
//! found in it. It is the container the listing layer walks.

use crate::buffer::{NestedBuffer, RootBuffer};
use crate::config::IoConfig;
use crate::error::Result;
use crate::io;
use crate::listing::FirmwareContainer;
use crate::model::Directory;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug)]
pub struct FirmwareImage {
    buffer: RootBuffer,
    filename: Option<PathBuf>,
    directories: Vec<Directory>,
}

impl FirmwareImage {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            buffer: RootBuffer::new(bytes),
            filename: None,
            directories: Vec::new(),
        }
    }

    /// Loads the complete image at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P, config: &IoConfig) -> Result<Self> {
        let path = path.as_ref();
        let bytes = io::load_image(path, config)?;
        info!(path = %path.display(), size = bytes.len(), "Loaded firmware image");
        let mut image = Self::from_bytes(bytes);
        image.filename = Some(path.to_path_buf());
        Ok(image)
    }

    /// Writes the current contents of the root buffer to `path`, including
    /// any modifications made through views.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        io::store_image(path, &self.buffer.contents())?;
        Ok(())
    }

    pub fn buffer(&self) -> &RootBuffer {
        &self.buffer
    }

    /// A view spanning the whole image.
    pub fn view(&self) -> NestedBuffer {
        NestedBuffer::over(&self.buffer)
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn add_directory(&mut self, directory: Directory) {
        self.directories.push(directory);
    }

    pub fn directories(&self) -> &[Directory] {
        &self.directories
    }
}

impl FirmwareContainer for FirmwareImage {
    type Directory = Directory;

    fn directories(&self) -> &[Directory] {
        &self.directories
    }
}

impl fmt::Display for FirmwareImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(name) => write!(f, "FirmwareImage(filename={})", name.display()),
            None => write!(f, "FirmwareImage(len={:#x})", self.len()),
        }
    }
}
