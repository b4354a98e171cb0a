mod http;
mod local;

pub use http::HttpSource;
pub use local::LocalFileSource;

use crate::error::Result;
use async_trait::async_trait;

/// A place archive bytes come from.
///
/// Local file selection and remote storage fetch both end in the same
/// place: a display name plus the full raw bytes of one archive. The
/// viewer consumes only that converged form and knows nothing about
/// paths, URLs or the storage API behind them.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Fetch the complete archive bytes.
    async fn fetch(&self) -> Result<Vec<u8>>;

    /// The display name the archive will be registered under.
    fn display_name(&self) -> &str;
}
