//! Common test utilities and helpers.
//!
//! Builds small synthetic images with directories and entries laid out the
//! way a layout parser would hand them over.

#![allow(dead_code)]

use pspview::{Directory, Entry, FirmwareImage, NestedBuffer};
use std::rc::Rc;

/// Size of the synthetic images.
pub const IMAGE_SIZE: usize = 0x2000;

/// Address of the primary directory header.
pub const PRIMARY_DIR: usize = 0x100;
/// Address of the secondary directory header.
pub const SECONDARY_DIR: usize = 0x200;

/// An image filled with a position-dependent byte pattern.
pub fn patterned_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn entry(image: &FirmwareImage, offset: usize, size: usize, entry_type: u32) -> Rc<Entry> {
    let view = NestedBuffer::new(image.buffer(), size, offset).unwrap();
    Rc::new(Entry::new(view, entry_type))
}

/// Two directories sharing one entry, each with one entry of its own.
pub fn two_directory_image() -> FirmwareImage {
    let mut bytes = patterned_bytes(IMAGE_SIZE);
    bytes[PRIMARY_DIR..PRIMARY_DIR + 4].copy_from_slice(b"$PSP");
    bytes[SECONDARY_DIR..SECONDARY_DIR + 4].copy_from_slice(b"$PL2");
    let mut image = FirmwareImage::from_bytes(bytes);

    let shared = Rc::new(
        Entry::new(NestedBuffer::new(image.buffer(), 0x240, 0x1000).unwrap(), 0x0)
            .with_type_name("AMD_PUBLIC_KEY")
            .with_magic(b"\x01\x00\x00\x00".to_vec()),
    );
    let boot_loader = Rc::new(
        Entry::new(NestedBuffer::new(image.buffer(), 0x400, 0x1400).unwrap(), 0x1)
            .with_type_name("PSP_FW_BOOT_LOADER")
            .with_magic(b"$PS1".to_vec())
            .with_version("0.8.0.5F")
            .with_signed_by("AMD_PUBLIC_KEY"),
    );
    let smu = entry(&image, 0x80, 0x800, 0x8);

    let mut primary = Directory::new(NestedBuffer::new(image.buffer(), 0x40, PRIMARY_DIR).unwrap(), "PSP")
        .unwrap()
        .with_secondary_directory(SECONDARY_DIR);
    primary.push_entry(shared.clone());
    primary.push_entry(boot_loader);

    let mut secondary =
        Directory::new(NestedBuffer::new(image.buffer(), 0x40, SECONDARY_DIR).unwrap(), "PSP").unwrap();
    secondary.push_entry(smu);
    secondary.push_entry(shared);

    image.add_directory(primary);
    image.add_directory(secondary);
    image
}
