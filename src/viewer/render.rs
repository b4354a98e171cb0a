//! Page decode and draw.
//!
//! The renderer turns raw page bytes into a bitmap on the surface. Decode
//! failures are recovered here: the placeholder text is drawn, the retained
//! bitmap is dropped, and the failure is reported as a value — a corrupt
//! page must not end the viewing session.

use image::RgbaImage;

use super::surface::Surface;

/// Typed result of a render request.
///
/// A failed decode is an outcome, not an error: the caller can keep
/// navigating past the bad page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The page decoded and was drawn; dimensions are the decoded bitmap's.
    Rendered { width: u32, height: u32 },
    /// The page bytes did not decode; the placeholder was drawn instead.
    Failed { reason: String },
}

impl RenderOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderOutcome::Rendered { .. })
    }
}

/// Decodes pages and composites them onto the owned [`Surface`].
///
/// The most recently decoded bitmap is retained so a viewport change can
/// redraw without re-decoding.
pub struct PageRenderer {
    surface: Surface,
    retained: Option<RgbaImage>,
}

impl PageRenderer {
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            retained: None,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Whether a decoded bitmap is currently retained.
    pub fn has_retained(&self) -> bool {
        self.retained.is_some()
    }

    /// Drop the retained bitmap without touching the surface.
    pub fn clear_retained(&mut self) {
        self.retained = None;
    }

    /// Decode `bytes` and draw the result fitted and centered.
    ///
    /// Decoding runs off the event loop; the surface keeps its previous
    /// contents until the draw lands. On success the bitmap is retained
    /// for later re-fits. On failure the placeholder is drawn and the
    /// retained bitmap is dropped.
    pub async fn render(&mut self, bytes: Vec<u8>) -> RenderOutcome {
        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await;

        let image = match decoded {
            Ok(Ok(image)) => image,
            Ok(Err(err)) => return self.fail(err.to_string()),
            Err(err) => return self.fail(format!("decode task failed: {err}")),
        };

        let bitmap = image.to_rgba8();
        let (width, height) = bitmap.dimensions();
        self.surface.ensure_sized();
        self.surface.draw_fitted(&bitmap);
        self.retained = Some(bitmap);
        RenderOutcome::Rendered { width, height }
    }

    /// Redraw the retained bitmap at the surface's current viewport,
    /// without decoding. Returns false when nothing is retained.
    ///
    /// This is the resize path; rendering a new page never goes through
    /// here.
    pub fn rewrite_last(&mut self) -> bool {
        let Some(bitmap) = self.retained.as_ref() else {
            return false;
        };
        self.surface.ensure_sized();
        self.surface.draw_fitted(bitmap);
        true
    }

    fn fail(&mut self, reason: String) -> RenderOutcome {
        log::warn!("page decode failed: {reason}");
        self.surface.ensure_sized();
        self.surface.draw_error_text(&reason);
        self.retained = None;
        RenderOutcome::Failed { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 200, 40, 255]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[tokio::test]
    async fn render_decodes_and_retains() {
        let mut renderer = PageRenderer::new(Surface::with_viewport(100.0, 100.0, 1.0));
        let outcome = renderer.render(png_bytes(20, 10)).await;
        assert_eq!(
            outcome,
            RenderOutcome::Rendered {
                width: 20,
                height: 10
            }
        );
        assert!(renderer.has_retained());
        assert!(!renderer.surface().is_blank());
    }

    #[tokio::test]
    async fn decode_failure_is_recovered() {
        let mut renderer = PageRenderer::new(Surface::with_viewport(100.0, 100.0, 1.0));
        let outcome = renderer.render(b"not an image".to_vec()).await;
        assert!(!outcome.is_rendered());
        assert!(!renderer.has_retained());
        // placeholder text landed on the surface
        assert!(!renderer.surface().is_blank());
    }

    #[tokio::test]
    async fn rewrite_last_redraws_at_new_size() {
        let mut renderer = PageRenderer::new(Surface::with_viewport(100.0, 100.0, 1.0));
        renderer.render(png_bytes(50, 50)).await;

        renderer.surface_mut().set_viewport(200.0, 100.0, 1.0);
        assert!(renderer.rewrite_last());
        assert_eq!(renderer.surface().backing_size(), (200, 100));

        // same as a fresh draw of the same bitmap at the new size
        let mut fresh = PageRenderer::new(Surface::with_viewport(200.0, 100.0, 1.0));
        fresh.render(png_bytes(50, 50)).await;
        assert_eq!(
            renderer.surface().backing().as_raw(),
            fresh.surface().backing().as_raw()
        );
    }

    #[tokio::test]
    async fn rewrite_last_without_bitmap_is_noop() {
        let mut renderer = PageRenderer::new(Surface::with_viewport(100.0, 100.0, 1.0));
        assert!(!renderer.rewrite_last());
    }
}
