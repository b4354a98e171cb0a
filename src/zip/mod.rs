//! ZIP archive parsing and on-demand decompression.
//!
//! This module reads page-image archives (ZIP/CBZ containers) held fully in
//! memory and decompresses individual entries on demand.
//!
//! ## Architecture
//!
//! - `structures`: data structures for ZIP format elements (EOCD, file
//!   headers, entry records)
//! - [`parser`]: low-level parsing of ZIP structures from raw bytes
//! - `reader`: the open handle used for listing and random-access entry
//!   decompression
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each entry
//! 2. Central Directory with metadata for all entries
//! 3. End of Central Directory (EOCD) record at the end
//!
//! The EOCD is read first (from the end of the bytes), then the Central
//! Directory, which allows listing every entry without inflating anything.
//! Each page is then inflated individually as the user navigates to it.
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions
//! - STORED (no compression) and DEFLATE methods
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods

pub mod parser;
mod reader;
mod structures;

pub use reader::ZipReader;
pub use structures::{CompressionMethod, ZipEntry};
