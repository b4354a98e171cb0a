//! The viewer: archive registry, navigation and rendering.
//!
//! ## Architecture
//!
//! - `archive`: a named archive and its derived open state
//! - [`pages`]: page ordering and the navigation cursor
//! - [`surface`]: the density-aware output surface
//! - `render`: page decode plus fit-and-center drawing
//! - [`input`]: translation of host events into navigation intents
//!
//! [`ViewerSession`] composes these into the user-facing contract: open an
//! archive, page forward and backward, close, report reading progress.
//!
//! ## Navigation and the surface
//!
//! Everything here runs on one cooperative task. The cursor moves before a
//! page's decode-and-draw tail runs, so the cursor always reflects the most
//! recent navigation intent; when draws overlap under rapid input, the last
//! one to complete owns the surface. Stale draws are not cancelled.

mod archive;
mod font;
pub mod input;
pub mod pages;
mod render;
pub mod surface;

pub use archive::Archive;
pub use input::{InputEvent, NavIntent, NavKey};
pub use pages::PageCursor;
pub use render::{PageRenderer, RenderOutcome};
pub use surface::Surface;

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Whether a session currently has an active archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Open,
}

/// One viewing session.
///
/// Holds every archive introduced so far (by display name) and at most one
/// active archive whose pages are being shown. The hosting application
/// constructs one session, attaches a [`Surface`], and forwards its input
/// events.
#[derive(Default)]
pub struct ViewerSession {
    archives: HashMap<String, Archive>,
    active: Option<String>,
    renderer: Option<PageRenderer>,
}

impl ViewerSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the output surface. Must happen before any navigation;
    /// navigating an unattached session fails with [`Error::NotAttached`].
    pub fn attach(&mut self, surface: Surface) {
        self.renderer = Some(PageRenderer::new(surface));
    }

    pub fn is_attached(&self) -> bool {
        self.renderer.is_some()
    }

    pub fn state(&self) -> SessionState {
        if self.active.is_some() {
            SessionState::Open
        } else {
            SessionState::Empty
        }
    }

    /// The attached surface, if any.
    pub fn surface(&self) -> Option<&Surface> {
        self.renderer.as_ref().map(PageRenderer::surface)
    }

    /// Add (or replace) an archive in the registry. Does not open it and
    /// does not change which archive is active.
    pub fn register_archive(&mut self, archive: Archive) {
        self.archives.insert(archive.name().to_string(), archive);
    }

    /// Display names of every archive seen this session.
    pub fn registered_names(&self) -> impl Iterator<Item = &str> {
        self.archives.keys().map(String::as_str)
    }

    /// A registered archive by display name.
    pub fn archive(&self, name: &str) -> Option<&Archive> {
        self.archives.get(name)
    }

    /// The currently active archive, if the session is open.
    pub fn active_archive(&self) -> Option<&Archive> {
        self.active.as_deref().and_then(|name| self.archives.get(name))
    }

    /// Register `archive`, make it active and show its first page.
    ///
    /// Equivalent to [`register_archive`](Self::register_archive) followed
    /// by [`open_by_name`](Self::open_by_name).
    pub async fn open_archive(&mut self, archive: Archive) -> Result<Option<RenderOutcome>> {
        let name = archive.name().to_string();
        self.register_archive(archive);
        self.open_by_name(&name).await
    }

    /// Make a registered archive active and show its first page.
    ///
    /// The previously active archive's handle is released but the archive
    /// stays registered; reopening it later re-derives its page list from
    /// the raw bytes. A corrupt archive fails before anything else changes,
    /// leaving the previous archive active and untouched.
    ///
    /// Returns the first page's render outcome, or `None` when the archive
    /// has no qualifying pages (the surface is blanked in that case).
    pub async fn open_by_name(&mut self, name: &str) -> Result<Option<RenderOutcome>> {
        if self.renderer.is_none() {
            return Err(Error::NotAttached);
        }

        // Open the incoming archive first: if its bytes are corrupt the
        // session must stay exactly as it was.
        let archive = self
            .archives
            .get_mut(name)
            .ok_or_else(|| Error::UnknownArchive {
                name: name.to_string(),
            })?;
        archive.open()?;

        // Release the outgoing handle; the archive stays in the registry.
        if let Some(previous) = self.active.take() {
            if previous != name {
                if let Some(outgoing) = self.archives.get_mut(&previous) {
                    outgoing.close();
                }
            }
        }
        self.active = Some(name.to_string());

        let outcome = self.step(true).await?;
        if outcome.is_none() {
            // Nothing to show; don't leave the previous book on screen.
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.clear_retained();
                renderer.surface_mut().ensure_sized();
                renderer.surface_mut().clear();
            }
        }
        Ok(outcome)
    }

    /// Show the next page. No-op when the session is empty or the archive
    /// has no pages.
    pub async fn next(&mut self) -> Result<Option<RenderOutcome>> {
        self.step(true).await
    }

    /// Show the previous page. No-op when the session is empty or the
    /// archive has no pages.
    pub async fn previous(&mut self) -> Result<Option<RenderOutcome>> {
        self.step(false).await
    }

    async fn step(&mut self, forward: bool) -> Result<Option<RenderOutcome>> {
        if self.renderer.is_none() {
            return Err(Error::NotAttached);
        }
        let Some(active) = self.active.clone() else {
            return Ok(None);
        };
        let archive = self
            .archives
            .get_mut(&active)
            .ok_or_else(|| Error::UnknownArchive { name: active.clone() })?;
        let pages = archive.pages_mut().ok_or(Error::ArchiveClosed)?;

        // Move the cursor before decoding so it always reflects the most
        // recent navigation intent, even if this draw lands late.
        let name = if forward {
            pages.advance().map(str::to_string)
        } else {
            pages.retreat().map(str::to_string)
        };
        let Some(name) = name else {
            return Ok(None);
        };

        let bytes = archive.decompress(&name)?;
        let Some(renderer) = self.renderer.as_mut() else {
            return Err(Error::NotAttached);
        };
        Ok(Some(renderer.render(bytes).await))
    }

    /// Close the active archive: release its handle, drop the retained
    /// bitmap and blank the surface. The archive stays registered.
    pub fn close_active(&mut self) {
        if let Some(name) = self.active.take() {
            if let Some(archive) = self.archives.get_mut(&name) {
                archive.close();
            }
        }
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.clear_retained();
            renderer.surface_mut().clear();
        }
    }

    /// Fraction of the active archive shown so far, 0.0 when empty.
    pub fn progress(&self) -> f64 {
        self.active_archive()
            .and_then(Archive::pages)
            .map(PageCursor::progress)
            .unwrap_or(0.0)
    }

    /// Record a new viewport and re-fit the current page without
    /// re-decoding it.
    pub fn resize(&mut self, logical_width: f64, logical_height: f64, density: f64) -> Result<()> {
        let renderer = self.renderer.as_mut().ok_or(Error::NotAttached)?;
        renderer
            .surface_mut()
            .set_viewport(logical_width, logical_height, density);
        if !renderer.rewrite_last() {
            renderer.surface_mut().ensure_sized();
        }
        Ok(())
    }

    /// Apply a translated input event.
    ///
    /// Pointer/wheel/tap/key intents map to [`next`](Self::next) and
    /// [`previous`](Self::previous). A refit intent redraws at the current
    /// viewport; hosts that know the new dimensions call
    /// [`resize`](Self::resize) instead.
    pub async fn handle_event(&mut self, event: InputEvent) -> Result<Option<RenderOutcome>> {
        match input::intent(event) {
            Some(NavIntent::NextPage) => self.next().await,
            Some(NavIntent::PreviousPage) => self.previous().await,
            Some(NavIntent::Refit) => {
                let renderer = self.renderer.as_mut().ok_or(Error::NotAttached)?;
                renderer.rewrite_last();
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
