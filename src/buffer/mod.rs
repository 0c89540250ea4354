//! Windowed views over a single mutable firmware image.
//!
//! A [`RootBuffer`] owns the bytes of a loaded image. A [`NestedBuffer`] is a
//! non-owning `offset + length` window into either the root or another view.
//! Views never copy: every read and write is translated along the parent
//! chain and applied to the root storage, so overlapping views observe each
//! other's writes immediately.
//!
//! The model is single-threaded. Root storage is shared through
//! `Rc<RefCell<_>>`, which keeps views `!Send` and leaves serialization of
//! overlapping mutation to the caller.

pub mod chunks;
pub mod error;
pub mod slice;

pub use chunks::Chunks;
pub use error::{BufferError, Result};
pub use slice::{offset_slice, Slice};

use bytes::Bytes;
use std::cell::RefCell;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;
use tracing::trace;

/// Top-level mutable storage backing a loaded image.
///
/// Cloning a `RootBuffer` clones the handle, not the bytes.
#[derive(Clone, Default)]
pub struct RootBuffer {
    data: Rc<RefCell<Vec<u8>>>,
}

impl RootBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            data: Rc::new(RefCell::new(bytes)),
        }
    }

    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The root always sits at address zero.
    pub fn address(&self) -> usize {
        0
    }

    /// A copy of the full current contents, e.g. for writing the image out.
    pub fn contents(&self) -> Vec<u8> {
        self.data.borrow().clone()
    }

    /// Returns true if both handles share the same storage.
    pub fn ptr_eq(&self, other: &RootBuffer) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    fn check(&self, range: &Range<usize>) -> Result<()> {
        let len = self.len();
        if range.start > range.end || range.end > len {
            return Err(BufferError::OutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<u8> {
        let data = self.data.borrow();
        data.get(index).copied().ok_or(BufferError::OutOfBounds {
            start: index,
            end: index.saturating_add(1),
            len: data.len(),
        })
    }

    pub fn set(&self, index: usize, value: u8) -> Result<()> {
        let mut data = self.data.borrow_mut();
        let len = data.len();
        match data.get_mut(index) {
            Some(byte) => {
                *byte = value;
                Ok(())
            }
            None => Err(BufferError::OutOfBounds {
                start: index,
                end: index.saturating_add(1),
                len,
            }),
        }
    }

    /// Copies out `range` of the root storage.
    pub fn read_range(&self, range: Range<usize>) -> Result<Vec<u8>> {
        self.check(&range)?;
        Ok(self.data.borrow()[range].to_vec())
    }

    /// Overwrites `range` in place. The root never grows or shrinks.
    pub fn write_range(&self, range: Range<usize>, value: &[u8]) -> Result<()> {
        self.check(&range)?;
        if range.len() != value.len() {
            return Err(BufferError::LengthMismatch {
                expected: range.len(),
                found: value.len(),
            });
        }
        trace!(start = range.start, len = value.len(), "Writing to root buffer");
        self.data.borrow_mut()[range].copy_from_slice(value);
        Ok(())
    }
}

impl From<Vec<u8>> for RootBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Debug for RootBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootBuffer").field("len", &self.len()).finish()
    }
}

/// What a view is a window into.
#[derive(Debug, Clone)]
pub enum Parent {
    Root(RootBuffer),
    View(Rc<NestedBuffer>),
}

impl Parent {
    pub fn address(&self) -> usize {
        match self {
            Parent::Root(root) => root.address(),
            Parent::View(view) => view.address(),
        }
    }

    /// Declared length of the parent.
    pub fn len(&self) -> usize {
        match self {
            Parent::Root(root) => root.len(),
            Parent::View(view) => view.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Follows the parent chain to the storage at the bottom.
    pub fn root(&self) -> &RootBuffer {
        match self {
            Parent::Root(root) => root,
            Parent::View(view) => view.parent.root(),
        }
    }

    /// Maps a parent-relative range to an absolute range in the root.
    fn resolve(&self, range: Range<usize>) -> Range<usize> {
        match self {
            Parent::Root(_) => range,
            Parent::View(view) => view.parent.resolve(shift(range, view.offset)),
        }
    }
}

impl From<RootBuffer> for Parent {
    fn from(root: RootBuffer) -> Self {
        Parent::Root(root)
    }
}

impl From<&RootBuffer> for Parent {
    fn from(root: &RootBuffer) -> Self {
        Parent::Root(root.clone())
    }
}

impl From<NestedBuffer> for Parent {
    fn from(view: NestedBuffer) -> Self {
        Parent::View(Rc::new(view))
    }
}

impl From<&NestedBuffer> for Parent {
    fn from(view: &NestedBuffer) -> Self {
        Parent::View(Rc::new(view.clone()))
    }
}

// Saturates so an out-of-range chain fails the root bounds check instead of
// wrapping.
fn shift(range: Range<usize>, by: usize) -> Range<usize> {
    range.start.saturating_add(by)..range.end.saturating_add(by)
}

/// A non-owning `offset + length` window into a root buffer or another view.
///
/// All indices taken by a view are local: index `0` is the first byte of the
/// window, wherever it sits in the image.
#[derive(Debug, Clone)]
pub struct NestedBuffer {
    parent: Parent,
    size: usize,
    offset: usize,
}

impl NestedBuffer {
    /// Creates a view of `size` bytes starting `offset` bytes into `parent`.
    ///
    /// The parent's extent is not checked here; accesses that fall outside
    /// the root fail when they are made.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::InvariantViolated` if `offset + size` overflows.
    pub fn new(parent: impl Into<Parent>, size: usize, offset: usize) -> Result<Self> {
        if offset.checked_add(size).is_none() {
            return Err(BufferError::InvariantViolated { offset, size });
        }
        let parent = parent.into();
        trace!(size, offset, parent_len = parent.len(), "Created nested buffer");
        Ok(Self {
            parent,
            size,
            offset,
        })
    }

    /// A view spanning the whole root buffer.
    pub fn over(root: &RootBuffer) -> Self {
        Self {
            parent: Parent::Root(root.clone()),
            size: root.len(),
            offset: 0,
        }
    }

    /// Creates a child view of this one.
    pub fn view(&self, size: usize, offset: usize) -> Result<NestedBuffer> {
        NestedBuffer::new(self, size, offset)
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Offset of this view within its parent.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn parent(&self) -> &Parent {
        &self.parent
    }

    pub fn root(&self) -> &RootBuffer {
        self.parent.root()
    }

    /// Absolute position of this view in the image: the sum of offsets along
    /// the parent chain.
    pub fn address(&self) -> usize {
        self.offset.saturating_add(self.parent.address())
    }

    fn local_index(&self, index: usize) -> Result<Range<usize>> {
        if index >= self.size {
            return Err(BufferError::OutOfBounds {
                start: index,
                end: index.saturating_add(1),
                len: self.size,
            });
        }
        Ok(self.parent.resolve(shift(index..index + 1, self.offset)))
    }

    /// Reads the byte at local `index`.
    pub fn get(&self, index: usize) -> Result<u8> {
        let abs = self.local_index(index)?;
        self.root().get(abs.start)
    }

    /// Writes the byte at local `index`.
    pub fn set(&self, index: usize, value: u8) -> Result<()> {
        let abs = self.local_index(index)?;
        self.root().set(abs.start, value)
    }

    fn resolve_slice(&self, slice: Slice) -> Result<Range<usize>> {
        let range = offset_slice(slice, self.offset, self.size)?;
        Ok(self.parent.resolve(range))
    }

    /// Reads a local range.
    pub fn read(&self, slice: Slice) -> Result<Vec<u8>> {
        let abs = self.resolve_slice(slice)?;
        self.root().read_range(abs)
    }

    /// Overwrites a local range. `value` must match the range length.
    pub fn write(&self, slice: Slice, value: &[u8]) -> Result<()> {
        let abs = self.resolve_slice(slice)?;
        self.root().write_range(abs, value)
    }

    fn bytes_slice(address: usize, size: usize) -> Slice {
        let start = isize::try_from(address).unwrap_or(isize::MAX);
        let stop = isize::try_from(address.saturating_add(size)).unwrap_or(isize::MAX);
        Slice::between(start, stop)
    }

    /// Reads `size` bytes at local `address`, or the whole view when `size`
    /// is `None`.
    pub fn get_bytes(&self, address: usize, size: Option<usize>) -> Result<Vec<u8>> {
        let size = size.unwrap_or(self.size);
        self.read(Self::bytes_slice(address, size))
    }

    /// Writes `size` bytes at local `address`.
    pub fn set_bytes(&self, address: usize, size: usize, value: &[u8]) -> Result<()> {
        self.write(Self::bytes_slice(address, size), value)
    }

    /// Splits the view, starting at local `offset`, into `size`-byte chunks.
    ///
    /// Each call takes a fresh snapshot and starts again from `offset`.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::InvalidChunkSize` for a zero `size`, and any
    /// range error raised while reading `offset..`.
    pub fn get_chunks(&self, size: usize, offset: usize) -> Result<Chunks> {
        if size == 0 {
            return Err(BufferError::InvalidChunkSize);
        }
        let start = isize::try_from(offset).unwrap_or(isize::MAX);
        let snapshot = self.read(Slice::starting_at(start))?;
        Ok(Chunks::new(Bytes::from(snapshot), size))
    }
}
