use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the archive and viewer layers.
///
/// Page decode failures are deliberately absent here: a page that cannot be
/// decoded is recovered inside the renderer (an error placeholder is drawn
/// instead) and reported as a [`RenderOutcome::Failed`](crate::viewer::RenderOutcome)
/// value, never as an `Error`.
#[derive(Debug, Error)]
pub enum Error {
    /// The byte stream could not be parsed as a ZIP container.
    #[error("not a valid ZIP archive: {reason}")]
    CorruptArchive { reason: String },

    /// A requested entry name is absent from the open container.
    ///
    /// The page list is derived from the container's own entry names, so
    /// hitting this during navigation means the two went out of sync.
    #[error("no entry named {name:?} in archive")]
    EntryNotFound { name: String },

    /// An operation was attempted on an archive whose handle was released.
    #[error("archive is closed")]
    ArchiveClosed,

    /// No archive is registered under the requested display name.
    #[error("no archive registered as {name:?}")]
    UnknownArchive { name: String },

    /// A navigation method was called before a surface was attached.
    #[error("no render surface attached")]
    NotAttached,

    /// The entry uses a compression method other than STORED or DEFLATE.
    #[error("unsupported compression method {method}")]
    UnsupportedCompression { method: u16 },

    /// Fetching archive bytes from a remote source failed.
    #[error("failed to fetch archive bytes: {reason}")]
    Fetch { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Error::CorruptArchive {
            reason: reason.into(),
        }
    }
}
