//! # zipview
//!
//! A viewer core for page-image archives (ZIP/CBZ containers whose entries
//! are individual page images).
//!
//! The pipeline: raw archive bytes are parsed once to list entries, the
//! qualifying image entries become an ordered page list, and navigation
//! decompresses exactly one page at a time, decodes it, and draws it scaled
//! and centered onto a density-aware surface. A corrupt page draws an error
//! placeholder instead of ending the session.
//!
//! ## Features
//!
//! - Archives from the local filesystem or HTTP/HTTPS URLs
//! - Random-access decompression: one page in memory at a time
//! - ZIP64, STORED and DEFLATE entries
//! - Clamped page navigation with reading progress
//! - Device-pixel-ratio-correct surface sizing and fit-and-center drawing
//!
//! ## Example
//!
//! ```no_run
//! use zipview::{Archive, LocalFileSource, Surface, ViewerSession};
//!
//! #[tokio::main]
//! async fn main() -> zipview::Result<()> {
//!     let source = LocalFileSource::new("book.cbz");
//!     let archive = Archive::from_source(&source).await?;
//!
//!     let mut session = ViewerSession::new();
//!     session.attach(Surface::with_viewport(800.0, 1200.0, 2.0));
//!
//!     // Opening shows the first page immediately
//!     session.open_archive(archive).await?;
//!     session.next().await?;
//!     println!("progress: {:.0}%", session.progress() * 100.0);
//!
//!     session.close_active();
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod viewer;
pub mod zip;

pub use cli::Cli;
pub use error::{Error, Result};
pub use io::{ByteSource, HttpSource, LocalFileSource};
pub use viewer::{
    Archive, InputEvent, NavIntent, NavKey, PageCursor, PageRenderer, RenderOutcome,
    SessionState, Surface, ViewerSession,
};
pub use zip::{CompressionMethod, ZipEntry, ZipReader};
