//! Range translation for windowed views.
//!
//! A [`Slice`] is a half-open `[start, stop)` request expressed in the local
//! coordinates of a view. Negative bounds count back from the end of the
//! view, never from the end of its parent.

use crate::buffer::error::{BufferError, Result};
use std::fmt;
use std::ops::Range;

/// A half-open range request with optional, possibly negative bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Slice {
    /// Inclusive start. `None` means the start of the view.
    pub start: Option<isize>,
    /// Exclusive stop. `None` means the end of the view.
    pub stop: Option<isize>,
}

impl Slice {
    pub fn new(start: Option<isize>, stop: Option<isize>) -> Self {
        Self { start, stop }
    }

    /// The whole view.
    pub fn full() -> Self {
        Self::default()
    }

    /// `[start, end of view)`.
    pub fn starting_at(start: isize) -> Self {
        Self::new(Some(start), None)
    }

    /// `[start of view, stop)`.
    pub fn ending_at(stop: isize) -> Self {
        Self::new(None, Some(stop))
    }

    /// `[start, stop)`.
    pub fn between(start: isize, stop: isize) -> Self {
        Self::new(Some(start), Some(stop))
    }
}

// Saturates so bounds above `isize::MAX` are rejected as out of range rather
// than wrapping into negative, end-relative bounds.
fn saturating_bound(bound: usize) -> isize {
    isize::try_from(bound).unwrap_or(isize::MAX)
}

impl From<Range<usize>> for Slice {
    fn from(range: Range<usize>) -> Self {
        Self::between(saturating_bound(range.start), saturating_bound(range.end))
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start {
            Some(start) => write!(f, "[{}:", start)?,
            None => write!(f, "[:")?,
        }
        match self.stop {
            Some(stop) => write!(f, "{}]", stop),
            None => write!(f, "]"),
        }
    }
}

fn translate_bound(bound: isize, offset: usize, len: usize) -> Result<usize> {
    if bound.unsigned_abs() > len {
        return Err(BufferError::SliceOutOfBounds { bound, len });
    }
    let local = if bound < 0 {
        len - bound.unsigned_abs()
    } else {
        bound as usize
    };
    Ok(offset.saturating_add(local))
}

/// Translates a local slice of a view at `offset` with length `len` into a
/// parent-relative range.
///
/// Omitted bounds map to the edges of the window. A negative bound `-k`
/// maps to `offset + (len - k)`. A stop that lands before the start yields
/// an empty range anchored at the start.
///
/// # Errors
///
/// Returns `BufferError::SliceOutOfBounds` when `|start|` or `|stop|`
/// exceeds `len`.
pub fn offset_slice(slice: Slice, offset: usize, len: usize) -> Result<Range<usize>> {
    let start = match slice.start {
        Some(start) => translate_bound(start, offset, len)?,
        None => offset,
    };
    let stop = match slice.stop {
        Some(stop) => translate_bound(stop, offset, len)?,
        None => offset.saturating_add(len),
    };
    Ok(start..stop.max(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_bounds_cover_window() {
        assert_eq!(offset_slice(Slice::full(), 0x10, 0x20).unwrap(), 0x10..0x30);
    }

    #[test]
    fn positive_bounds_are_shifted_by_offset() {
        assert_eq!(offset_slice(Slice::between(2, 6), 0x100, 0x10).unwrap(), 0x102..0x106);
        assert_eq!(offset_slice(Slice::starting_at(4), 8, 8).unwrap(), 12..16);
        assert_eq!(offset_slice(Slice::ending_at(3), 8, 8).unwrap(), 8..11);
    }

    #[test]
    fn negative_bounds_wrap_within_local_window() {
        // Parent length is irrelevant: -4 counts from the end of the view.
        assert_eq!(offset_slice(Slice::starting_at(-4), 0x40, 0x10).unwrap(), 0x4c..0x50);
        assert_eq!(offset_slice(Slice::between(-8, -2), 0, 0x10).unwrap(), 8..14);
        assert_eq!(offset_slice(Slice::starting_at(-16), 0, 16).unwrap(), 0..16);
    }

    #[test]
    fn negative_range_matches_positive_equivalent() {
        let len = 24;
        for k in 1..=len {
            let neg = offset_slice(Slice::starting_at(-(k as isize)), 5, len).unwrap();
            let pos = offset_slice(Slice::between((len - k) as isize, len as isize), 5, len).unwrap();
            assert_eq!(neg, pos, "k = {}", k);
        }
    }

    #[test]
    fn bounds_beyond_length_are_rejected() {
        assert_eq!(
            offset_slice(Slice::starting_at(17), 0, 16),
            Err(BufferError::SliceOutOfBounds { bound: 17, len: 16 })
        );
        assert_eq!(
            offset_slice(Slice::ending_at(-17), 0, 16),
            Err(BufferError::SliceOutOfBounds { bound: -17, len: 16 })
        );
    }

    #[test]
    fn huge_unsigned_range_does_not_wrap() {
        let slice = Slice::from(usize::MAX - 3..usize::MAX);
        assert_eq!(slice, Slice::between(isize::MAX, isize::MAX));
        assert_eq!(
            offset_slice(slice, 0, 16),
            Err(BufferError::SliceOutOfBounds {
                bound: isize::MAX,
                len: 16
            })
        );
        assert_eq!(offset_slice(Slice::from(2..6), 8, 16).unwrap(), 10..14);
    }

    #[test]
    fn inverted_range_is_empty() {
        let range = offset_slice(Slice::between(6, 2), 0, 8).unwrap();
        assert!(range.is_empty());
        assert_eq!(range.start, 6);
    }

    #[test]
    fn display_uses_slice_notation() {
        assert_eq!(Slice::between(-4, 8).to_string(), "[-4:8]");
        assert_eq!(Slice::full().to_string(), "[:]");
    }
}
