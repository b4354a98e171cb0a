//! Output surface management.
//!
//! A [`Surface`] owns the backing pixel buffer pages are composited onto.
//! The host reports a logical viewport (layout-space size plus device pixel
//! density); the backing store is allocated at `logical x density` so
//! high-density displays get a full-resolution bitmap, and the host scales
//! the surface back down by [`Surface::display_scale`] when presenting it.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::font;

/// Neutral background the surface is blanked to.
const BACKGROUND: Rgba<u8> = Rgba([0x16, 0x16, 0x16, 0xFF]);

/// Color of the error placeholder text.
const ERROR_TEXT: Rgba<u8> = Rgba([0xE8, 0xE8, 0xE8, 0xFF]);

const ERROR_TEXT_MARGIN: u32 = 8;
const ERROR_TEXT_SCALE: u32 = 2;

/// Compute the fit-inside placement of a bitmap on a backing store.
///
/// The bitmap is scaled uniformly by `min(bw/iw, bh/ih)` (aspect ratio
/// preserved, never spilling past the surface) and centered on both axes.
/// Returns `(x, y, width, height)` of the drawn rect, or `None` when either
/// size is degenerate. Pure function of the two sizes, so the same backing
/// and bitmap always produce the same placement.
pub fn fit_rect(
    backing: (u32, u32),
    bitmap: (u32, u32),
) -> Option<(i64, i64, u32, u32)> {
    let (bw, bh) = backing;
    let (iw, ih) = bitmap;
    if bw == 0 || bh == 0 || iw == 0 || ih == 0 {
        return None;
    }

    let scale = (bw as f64 / iw as f64).min(bh as f64 / ih as f64);
    let w = ((scale * iw as f64).round() as u32).clamp(1, bw);
    let h = ((scale * ih as f64).round() as u32).clamp(1, bh);
    let x = (bw as i64 - w as i64) / 2;
    let y = (bh as i64 - h as i64) / 2;
    Some((x, y, w, h))
}

/// The render surface: logical viewport state plus the backing store.
pub struct Surface {
    logical_width: f64,
    logical_height: f64,
    density: f64,
    backing: RgbaImage,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// A surface with no viewport yet; the backing store stays empty until
    /// the host reports a size.
    pub fn new() -> Self {
        Self {
            logical_width: 0.0,
            logical_height: 0.0,
            density: 1.0,
            backing: RgbaImage::new(0, 0),
        }
    }

    /// A surface pre-sized to the given viewport.
    pub fn with_viewport(logical_width: f64, logical_height: f64, density: f64) -> Self {
        let mut surface = Self::new();
        surface.set_viewport(logical_width, logical_height, density);
        surface.ensure_sized();
        surface
    }

    /// Record the logical viewport. Takes effect on the next
    /// [`ensure_sized`](Self::ensure_sized).
    pub fn set_viewport(&mut self, logical_width: f64, logical_height: f64, density: f64) {
        self.logical_width = logical_width.max(0.0);
        self.logical_height = logical_height.max(0.0);
        self.density = if density.is_finite() && density > 0.0 {
            density
        } else {
            1.0
        };
    }

    pub fn logical_size(&self) -> (f64, f64) {
        (self.logical_width, self.logical_height)
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// The factor the host must apply in display space so that the
    /// oversampled backing store does not enlarge the on-screen footprint.
    pub fn display_scale(&self) -> f64 {
        1.0 / self.density
    }

    /// Backing store dimensions in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        self.backing.dimensions()
    }

    /// Read access to the backing store (snapshots, tests).
    pub fn backing(&self) -> &RgbaImage {
        &self.backing
    }

    /// Reconcile the backing store against the recorded viewport.
    ///
    /// Idempotent: the store is reallocated only when
    /// `round(logical x density)` differs from its current dimensions.
    /// Reallocation blanks the contents, so callers redraw afterwards.
    /// Returns whether a reallocation happened.
    pub fn ensure_sized(&mut self) -> bool {
        let target_w = (self.logical_width * self.density).round() as u32;
        let target_h = (self.logical_height * self.density).round() as u32;
        if self.backing.dimensions() == (target_w, target_h) {
            return false;
        }
        log::debug!("reallocating backing store to {target_w}x{target_h}");
        self.backing = RgbaImage::from_pixel(target_w, target_h, BACKGROUND);
        true
    }

    /// Blank the whole backing store to the neutral background.
    pub fn clear(&mut self) {
        for pixel in self.backing.pixels_mut() {
            *pixel = BACKGROUND;
        }
    }

    /// Clear, then draw `bitmap` scaled to fit inside the surface,
    /// centered on both axes.
    pub fn draw_fitted(&mut self, bitmap: &RgbaImage) {
        let Some((x, y, w, h)) = fit_rect(self.backing.dimensions(), bitmap.dimensions()) else {
            self.clear();
            return;
        };

        self.clear();
        if (w, h) == bitmap.dimensions() {
            imageops::overlay(&mut self.backing, bitmap, x, y);
        } else {
            let scaled = imageops::resize(bitmap, w, h, FilterType::Triangle);
            imageops::overlay(&mut self.backing, &scaled, x, y);
        }
    }

    /// Clear, then render `message` near the top-left corner.
    ///
    /// This is the recovered-decode-failure placeholder; it only touches
    /// the backing store and cannot fail.
    pub fn draw_error_text(&mut self, message: &str) {
        self.clear();
        font::draw_text(
            &mut self.backing,
            ERROR_TEXT_MARGIN,
            ERROR_TEXT_MARGIN,
            ERROR_TEXT_SCALE,
            ERROR_TEXT,
            message,
        );
    }

    /// True when every backing pixel is the neutral background.
    pub fn is_blank(&self) -> bool {
        self.backing.pixels().all(|p| *p == BACKGROUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_scales_up_to_the_binding_axis() {
        assert_eq!(fit_rect((200, 100), (50, 50)), Some((50, 0, 100, 100)));
    }

    #[test]
    fn fit_scales_down_preserving_aspect() {
        // 1000x2000 page on a 200x100 surface: height binds, 50x100 at x=75
        assert_eq!(fit_rect((200, 100), (1000, 2000)), Some((75, 0, 50, 100)));
    }

    #[test]
    fn fit_exact_match_is_identity() {
        assert_eq!(fit_rect((640, 480), (640, 480)), Some((0, 0, 640, 480)));
    }

    #[test]
    fn fit_rejects_degenerate_sizes() {
        assert_eq!(fit_rect((0, 100), (10, 10)), None);
        assert_eq!(fit_rect((100, 100), (0, 10)), None);
    }

    #[test]
    fn ensure_sized_applies_density() {
        let mut surface = Surface::new();
        surface.set_viewport(100.0, 50.0, 2.0);
        assert!(surface.ensure_sized());
        assert_eq!(surface.backing_size(), (200, 100));
        assert_eq!(surface.display_scale(), 0.5);
    }

    #[test]
    fn ensure_sized_is_idempotent() {
        let mut surface = Surface::with_viewport(100.0, 50.0, 1.0);
        assert!(!surface.ensure_sized());
        assert!(!surface.ensure_sized());
    }

    #[test]
    fn reallocation_blanks_the_store() {
        let mut surface = Surface::with_viewport(100.0, 100.0, 1.0);
        let bitmap = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        surface.draw_fitted(&bitmap);
        assert!(!surface.is_blank());

        surface.set_viewport(120.0, 100.0, 1.0);
        assert!(surface.ensure_sized());
        assert!(surface.is_blank());
    }

    #[test]
    fn draw_fitted_centers_the_bitmap() {
        let mut surface = Surface::with_viewport(200.0, 100.0, 1.0);
        let red = Rgba([255, 0, 0, 255]);
        let bitmap = RgbaImage::from_pixel(50, 50, red);
        surface.draw_fitted(&bitmap);

        let backing = surface.backing();
        // inside the 100x100 rect at (50, 0)
        assert_eq!(*backing.get_pixel(100, 50), red);
        assert_eq!(*backing.get_pixel(55, 5), red);
        // outside of it: background on both sides
        assert_eq!(*backing.get_pixel(10, 50), BACKGROUND);
        assert_eq!(*backing.get_pixel(190, 50), BACKGROUND);
    }

    #[test]
    fn draw_error_text_marks_the_surface() {
        let mut surface = Surface::with_viewport(200.0, 100.0, 1.0);
        surface.draw_error_text("decode failed");
        assert!(!surface.is_blank());
    }
}
