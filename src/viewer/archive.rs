//! One book: a named archive plus its derived open state.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::io::ByteSource;
use crate::zip::ZipReader;

use super::pages::PageCursor;

/// Derived state that exists only while the archive is open.
struct OpenState {
    reader: ZipReader,
    pages: PageCursor,
}

/// A page-image archive: display name plus the immutable raw bytes.
///
/// The decompression handle and page list are derived state, materialized
/// by [`open`](Archive::open) and released by [`close`](Archive::close).
/// Closing is destructive to the derived state only — the raw bytes stay,
/// so a closed archive can always be reopened from scratch.
pub struct Archive {
    name: String,
    content: Arc<[u8]>,
    open: Option<OpenState>,
}

impl Archive {
    /// Capture raw bytes under a display name. Both ingestion paths (local
    /// file, remote fetch) converge here.
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            open: None,
        }
    }

    /// Fetch bytes from a source and capture them under its display name.
    pub async fn from_source(source: &dyn ByteSource) -> Result<Self> {
        let content = source.fetch().await?;
        Ok(Self::new(source.display_name(), content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the raw archive bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Materialize the decompression handle and the page list; the page
    /// cursor starts before the first page.
    ///
    /// Reopening after a close re-derives everything from the raw bytes.
    ///
    /// # Errors
    ///
    /// [`Error::CorruptArchive`] when the bytes are not a valid container;
    /// the archive stays closed in that case.
    pub fn open(&mut self) -> Result<()> {
        let reader = ZipReader::open(self.content.clone())?;
        let pages = PageCursor::from_entries(reader.entry_names().map(str::to_string));
        log::info!(
            "opened {:?}: {} pages of {} entries",
            self.name,
            pages.len(),
            reader.len()
        );
        self.open = Some(OpenState { reader, pages });
        Ok(())
    }

    /// Release the decompression handle and the page list.
    pub fn close(&mut self) {
        if self.open.take().is_some() {
            log::info!("closed {:?}", self.name);
        }
    }

    /// The page cursor, while open.
    pub fn pages(&self) -> Option<&PageCursor> {
        self.open.as_ref().map(|state| &state.pages)
    }

    pub fn pages_mut(&mut self) -> Option<&mut PageCursor> {
        self.open.as_mut().map(|state| &mut state.pages)
    }

    /// Decompress one page's bytes by name.
    ///
    /// # Errors
    ///
    /// [`Error::ArchiveClosed`] when no handle is open;
    /// [`Error::EntryNotFound`] when the name is not in the container.
    pub fn decompress(&self, name: &str) -> Result<Vec<u8>> {
        let state = self.open.as_ref().ok_or(Error::ArchiveClosed)?;
        state.reader.decompress(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decompress_on_closed_archive_fails() {
        let archive = Archive::new("book", vec![1, 2, 3]);
        assert!(matches!(
            archive.decompress("01.jpg"),
            Err(Error::ArchiveClosed)
        ));
    }

    #[test]
    fn open_rejects_garbage_bytes() {
        let mut archive = Archive::new("book", b"definitely not a zip".to_vec());
        assert!(matches!(
            archive.open(),
            Err(Error::CorruptArchive { .. })
        ));
        assert!(!archive.is_open());
    }
}
