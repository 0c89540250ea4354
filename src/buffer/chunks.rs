//! Fixed-size chunking of a view's contents.

use bytes::Bytes;
use std::iter::FusedIterator;

/// Forward-only iterator over `size`-byte chunks of a snapshot.
///
/// Every chunk is `size` bytes long except possibly the last one. Chunks are
/// zero-copy slices of the snapshot taken when the iterator was created.
#[derive(Debug, Clone)]
pub struct Chunks {
    data: Bytes,
    size: usize,
    pos: usize,
}

impl Chunks {
    pub(crate) fn new(data: Bytes, size: usize) -> Self {
        debug_assert!(size > 0);
        Self { data, size, pos: 0 }
    }

    fn remaining(&self) -> usize {
        let left = self.data.len() - self.pos;
        left.div_ceil(self.size)
    }
}

impl Iterator for Chunks {
    type Item = Bytes;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        let end = self.pos.saturating_add(self.size).min(self.data.len());
        let chunk = self.data.slice(self.pos..end);
        self.pos = end;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Chunks {}

impl FusedIterator for Chunks {}
