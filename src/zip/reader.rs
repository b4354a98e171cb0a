use flate2::read::DeflateDecoder;
use std::io::Read;
use std::sync::Arc;

use crate::error::{Error, Result};

use super::parser;
use super::structures::{CompressionMethod, ZipEntry};

/// Open decompression handle over an archive's raw bytes.
///
/// Opening parses the central directory once; after that, any entry can be
/// decompressed by name without touching the data of any other entry. The
/// raw bytes are shared (`Arc`) with whoever retains the archive, so a
/// reader can be dropped and recreated without copying the archive.
pub struct ZipReader {
    content: Arc<[u8]>,
    entries: Vec<ZipEntry>,
}

impl ZipReader {
    /// Parse the container and return an open handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptArchive`] if the bytes cannot be parsed as a
    /// ZIP container. No handle is produced in that case.
    pub fn open(content: Arc<[u8]>) -> Result<Self> {
        let entries = parser::list_entries(&content)?;
        log::debug!("opened archive handle with {} entries", entries.len());
        Ok(Self { content, entries })
    }

    /// All container member names, in container order.
    ///
    /// No filtering happens here; callers decide which entries they care
    /// about.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Parsed entry metadata, in container order.
    pub fn entries(&self) -> &[ZipEntry] {
        &self.entries
    }

    /// Number of container members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decompress a single entry by name.
    ///
    /// Random access: only the named entry's bytes are read and inflated,
    /// so memory stays bounded by one entry regardless of archive size.
    ///
    /// # Errors
    ///
    /// * [`Error::EntryNotFound`] if no entry has this name
    /// * [`Error::UnsupportedCompression`] for methods other than
    ///   STORED/DEFLATE
    /// * [`Error::CorruptArchive`] if the entry data is truncated or does
    ///   not inflate to its declared size
    pub fn decompress(&self, name: &str) -> Result<Vec<u8>> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| Error::EntryNotFound {
                name: name.to_string(),
            })?;

        let start = parser::data_offset(&self.content, entry)?;
        let compressed_len = usize::try_from(entry.compressed_size)
            .map_err(|_| Error::corrupt("entry size out of range"))?;
        let end = start
            .checked_add(compressed_len)
            .filter(|end| *end <= self.content.len())
            .ok_or_else(|| Error::corrupt("entry data out of range"))?;
        let stored = &self.content[start..end];

        match entry.compression_method {
            CompressionMethod::Stored => Ok(stored.to_vec()),
            CompressionMethod::Deflate => {
                let expected = usize::try_from(entry.uncompressed_size)
                    .map_err(|_| Error::corrupt("entry size out of range"))?;
                let mut inflated = Vec::with_capacity(expected);
                DeflateDecoder::new(stored)
                    .read_to_end(&mut inflated)
                    .map_err(|e| Error::corrupt(format!("inflate failed: {e}")))?;
                if inflated.len() != expected {
                    return Err(Error::corrupt(format!(
                        "entry {:?} inflated to {} bytes, expected {}",
                        entry.name,
                        inflated.len(),
                        expected
                    )));
                }
                Ok(inflated)
            }
            CompressionMethod::Unknown(method) => {
                Err(Error::UnsupportedCompression { method })
            }
        }
    }
}
