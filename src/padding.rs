//! Trailing flash padding removal.
//!
//! Erased flash reads back as `0xFF`. Firmware blobs are commonly padded to
//! their allotted size with whole `0xFFFFFFFF` dwords.

/// A single erased dword.
pub const PADDING_DWORD: [u8; 4] = [0xff; 4];

/// Strips trailing `0xFFFFFFFF` dwords from `bytes`.
///
/// Works strictly in 4-byte blocks measured from the end: a trailing run of
/// `0xFF` that is not a whole number of dwords leaves the remainder in place.
pub fn rstrip_padding(bytes: &[u8]) -> &[u8] {
    let mut end = bytes.len();
    while end >= PADDING_DWORD.len() && bytes[end - PADDING_DWORD.len()..end] == PADDING_DWORD {
        end -= PADDING_DWORD.len();
    }
    &bytes[..end]
}
