//! Opacity adjustment for the watermark overlay.
//!
//! The watermark keeps its own alpha channel; the user-facing opacity
//! setting scales that channel multiplicatively:
//! `prepared_alpha = round(alpha * opacity)`
//!
//! This runs once per batch run; the result is shared read-only across
//! every file and frame.

use image::RgbaImage;

/// Produce an opacity-adjusted copy of the watermark.
///
/// Color channels are copied unchanged; the alpha channel is multiplied by
/// `opacity` (expected in `0.0..=1.0`), rounded to nearest and clamped to
/// the channel range. The input is not mutated.
#[must_use]
pub fn prepare_overlay(watermark: &RgbaImage, opacity: f32) -> RgbaImage {
    let mut prepared = watermark.clone();
    for px in prepared.pixels_mut() {
        let alpha = f32::from(px[3]) * opacity;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            px[3] = alpha.round().clamp(0.0, 255.0) as u8;
        }
    }
    prepared
}
