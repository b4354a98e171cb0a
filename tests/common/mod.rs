//! Shared test utilities for integration tests.
//!
//! Builds ZIP containers in memory (stored or deflated entries, optional
//! trailing comment) and encodes real PNG page bytes, so tests exercise the
//! same byte formats the viewer sees in production.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test
//! file compiles as a separate crate and may only use a subset of these
//! helpers.

#![allow(dead_code)]

use image::{ImageFormat, Rgba, RgbaImage};
use std::io::{Cursor, Write};

fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = flate2::Crc::new();
    crc.update(data);
    crc.sum()
}

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder =
        flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Build a ZIP archive in memory.
///
/// Each entry is `(name, data, deflated)`; a non-empty `comment` is
/// appended after the end-of-central-directory record.
pub fn build_archive(entries: &[(&str, &[u8], bool)], comment: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut central = Vec::new();
    let mut count: u16 = 0;

    for (name, data, deflated) in entries {
        let crc = crc32(data);
        let (method, stored) = if *deflated {
            (8u16, deflate(data))
        } else {
            (0u16, data.to_vec())
        };

        let lfh_offset = out.len() as u32;
        out.extend_from_slice(b"PK\x03\x04");
        push_u16(&mut out, 20); // version needed
        push_u16(&mut out, 0); // flags
        push_u16(&mut out, method);
        push_u16(&mut out, 0); // mod time
        push_u16(&mut out, 0); // mod date
        push_u32(&mut out, crc);
        push_u32(&mut out, stored.len() as u32);
        push_u32(&mut out, data.len() as u32);
        push_u16(&mut out, name.len() as u16);
        push_u16(&mut out, 0); // extra field length
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&stored);

        central.extend_from_slice(b"PK\x01\x02");
        push_u16(&mut central, 20); // version made by
        push_u16(&mut central, 20); // version needed
        push_u16(&mut central, 0); // flags
        push_u16(&mut central, method);
        push_u16(&mut central, 0); // mod time
        push_u16(&mut central, 0); // mod date
        push_u32(&mut central, crc);
        push_u32(&mut central, stored.len() as u32);
        push_u32(&mut central, data.len() as u32);
        push_u16(&mut central, name.len() as u16);
        push_u16(&mut central, 0); // extra field length
        push_u16(&mut central, 0); // comment length
        push_u16(&mut central, 0); // disk number start
        push_u16(&mut central, 0); // internal attributes
        push_u32(&mut central, 0); // external attributes
        push_u32(&mut central, lfh_offset);
        central.extend_from_slice(name.as_bytes());

        count += 1;
    }

    let cd_offset = out.len() as u32;
    let cd_size = central.len() as u32;
    out.extend_from_slice(&central);

    out.extend_from_slice(b"PK\x05\x06");
    push_u16(&mut out, 0); // disk number
    push_u16(&mut out, 0); // disk with central directory
    push_u16(&mut out, count);
    push_u16(&mut out, count);
    push_u32(&mut out, cd_size);
    push_u32(&mut out, cd_offset);
    push_u16(&mut out, comment.len() as u16);
    out.extend_from_slice(comment);

    out
}

/// Build an archive of STORED entries with no comment.
pub fn stored_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let entries: Vec<(&str, &[u8], bool)> =
        entries.iter().map(|(n, d)| (*n, *d, false)).collect();
    build_archive(&entries, b"")
}

/// Encode a solid-color PNG page of the given size.
pub fn png_page(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(rgba));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

/// Bytes that look nothing like an image.
pub fn corrupt_page() -> Vec<u8> {
    b"this is not an image at all".to_vec()
}
