//! # pspview
//!
//! Windowed, zero-copy access to firmware images and tabular listing of the
//! directories and entries found in them.
//!
//! An image is loaded once into a [`RootBuffer`]. Directory tables and entry
//! headers are addressed through [`NestedBuffer`] views, which translate
//! local offsets down to the root and never copy bytes, so edits made through
//! any view land directly in the image that is later written out.

pub mod buffer;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod io;
pub mod listing;
pub mod logging;
pub mod model;
pub mod padding;

pub use buffer::{BufferError, Chunks, NestedBuffer, Parent, RootBuffer, Slice};
pub use config::PspConfig;
pub use error::{PspError, Result};
pub use image::FirmwareImage;
pub use listing::Lister;
pub use model::{Directory, Entry};
pub use padding::rstrip_padding;
