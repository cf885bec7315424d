//! Frame compositing: overlay geometry and alpha-over paste.
//!
//! The overlay is resized relative to each frame's width (aspect ratio
//! preserved), placed according to a corner position and pixel margin, and
//! blended onto a copy of the frame using its own alpha channel as the mask.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Placement of the watermark on a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    #[default]
    BottomRight,
    /// Centered on the frame.
    Center,
}

impl Position {
    /// Parse a position name, case-insensitively, ignoring spaces, hyphens
    /// and underscores.
    ///
    /// Unrecognized names fall back to [`Position::BottomRight`] rather than
    /// erroring; the original tool treated any unknown selection as
    /// bottom-right and callers rely on that.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let normalized = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "topleft" => Self::TopLeft,
            "topright" => Self::TopRight,
            "bottomleft" => Self::BottomLeft,
            "center" | "centre" => Self::Center,
            _ => Self::BottomRight,
        }
    }

    /// Compute the overlay's top-left paste offset for this position.
    ///
    /// `frame_w`/`frame_h` are the frame dimensions, `overlay_w`/`overlay_h`
    /// the resized overlay dimensions, `margin` the corner margin in pixels.
    ///
    /// Offsets are signed and deliberately not clamped: an overlay larger
    /// than the frame minus its margins yields a negative offset and is
    /// clipped at paste time, matching how the original pasted out of
    /// bounds without warning.
    #[must_use]
    pub fn offset(
        self,
        frame_w: u32,
        frame_h: u32,
        overlay_w: u32,
        overlay_h: u32,
        margin: u32,
    ) -> (i64, i64) {
        let (bw, bh) = (i64::from(frame_w), i64::from(frame_h));
        let (ww, wh) = (i64::from(overlay_w), i64::from(overlay_h));
        let m = i64::from(margin);

        match self {
            Self::TopLeft => (m, m),
            Self::TopRight => (bw - ww - m, m),
            Self::BottomLeft => (m, bh - wh - m),
            Self::BottomRight => (bw - ww - m, bh - wh - m),
            Self::Center => ((bw - ww) / 2, (bh - wh) / 2),
        }
    }
}

/// Compute the overlay's resized dimensions for a given frame width.
///
/// The target width is `floor(frame_width * scale_percent / 100)`; the
/// height follows from the overlay's own aspect ratio and is never set
/// independently.
#[must_use]
pub fn scaled_dimensions(
    frame_width: u32,
    overlay_width: u32,
    overlay_height: u32,
    scale_percent: f32,
) -> (u32, u32) {
    let target_width = f64::from(frame_width) * f64::from(scale_percent) / 100.0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let target_width = target_width.floor() as u32;

    let ratio = f64::from(target_width) / f64::from(overlay_width);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let target_height = (f64::from(overlay_height) * ratio).floor() as u32;

    (target_width, target_height)
}

/// Composite the prepared overlay onto one frame.
///
/// Resizes the overlay for this frame's width (Lanczos3, to avoid visible
/// aliasing on downscale), computes the paste offset from `position` and
/// `margin`, and alpha-blends onto a copy of `frame`. The inputs are not
/// mutated and the result is deterministic.
#[must_use]
pub fn composite(
    frame: &RgbaImage,
    overlay: &RgbaImage,
    scale_percent: f32,
    position: Position,
    margin: u32,
) -> RgbaImage {
    let (target_w, target_h) = scaled_dimensions(
        frame.width(),
        overlay.width(),
        overlay.height(),
        scale_percent,
    );
    let resized = imageops::resize(overlay, target_w, target_h, FilterType::Lanczos3);

    let (x, y) = position.offset(frame.width(), frame.height(), target_w, target_h, margin);

    let mut result = frame.clone();
    imageops::overlay(&mut result, &resized, x, y);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn scaled_dimensions_match_reference_scenario() {
        // 100x50 watermark on a 1000-wide frame at 20% -> 200x100
        assert_eq!(scaled_dimensions(1000, 100, 50, 20.0), (200, 100));
    }

    #[test]
    fn scaled_width_is_floored() {
        // 333 * 15 / 100 = 49.95 -> 49
        let (w, _) = scaled_dimensions(333, 64, 48, 15.0);
        assert_eq!(w, 49);
    }

    #[test]
    fn aspect_ratio_preserved_within_one_pixel() {
        let (w, h) = scaled_dimensions(333, 64, 48, 15.0);
        let expected_h = f64::from(w) * 48.0 / 64.0;
        assert!((f64::from(h) - expected_h).abs() <= 1.0);
    }

    #[test]
    fn offsets_match_position_table() {
        // frame 1000x800, overlay 200x100, margin 10
        let args = (1000, 800, 200, 100, 10);
        assert_eq!(
            Position::TopLeft.offset(args.0, args.1, args.2, args.3, args.4),
            (10, 10)
        );
        assert_eq!(
            Position::TopRight.offset(args.0, args.1, args.2, args.3, args.4),
            (790, 10)
        );
        assert_eq!(
            Position::BottomLeft.offset(args.0, args.1, args.2, args.3, args.4),
            (10, 690)
        );
        assert_eq!(
            Position::BottomRight.offset(args.0, args.1, args.2, args.3, args.4),
            (790, 690)
        );
        assert_eq!(
            Position::Center.offset(args.0, args.1, args.2, args.3, args.4),
            (400, 350)
        );
    }

    #[test]
    fn oversized_overlay_yields_negative_offset_unclamped() {
        // overlay wider than the frame: x goes negative and stays negative
        assert_eq!(
            Position::TopRight.offset(100, 100, 200, 50, 10),
            (-110, 10)
        );
        assert_eq!(
            Position::BottomRight.offset(100, 100, 200, 150, 10),
            (-110, -60)
        );
    }

    #[test]
    fn center_offset_truncates_toward_zero() {
        assert_eq!(Position::Center.offset(101, 101, 2, 2, 0), (49, 49));
        // overlay larger than frame: -3 / 2 truncates to -1, not -2
        assert_eq!(Position::Center.offset(100, 100, 103, 103, 0), (-1, -1));
    }

    #[test]
    fn unknown_position_name_falls_back_to_bottom_right() {
        assert_eq!(Position::from_name("top-left"), Position::TopLeft);
        assert_eq!(Position::from_name("Top Left"), Position::TopLeft);
        assert_eq!(Position::from_name("TOP_RIGHT"), Position::TopRight);
        assert_eq!(Position::from_name("bottom-left"), Position::BottomLeft);
        assert_eq!(Position::from_name("center"), Position::Center);
        assert_eq!(Position::from_name("bottom-right"), Position::BottomRight);
        assert_eq!(Position::from_name("sideways"), Position::BottomRight);
        assert_eq!(Position::from_name(""), Position::BottomRight);
    }

    #[test]
    fn opaque_overlay_replaces_frame_pixels_in_region() {
        let frame = RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255]));
        let overlay = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255]));

        // 20% of 100 -> 20x20 overlay at top-left with no margin
        let result = composite(&frame, &overlay, 20.0, Position::TopLeft, 0);

        assert_eq!(*result.get_pixel(5, 5), Rgba([0, 0, 255, 255]));
        assert_eq!(*result.get_pixel(50, 50), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn semi_transparent_overlay_blends_linearly() {
        let frame = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        let overlay = RgbaImage::from_pixel(10, 10, Rgba([200, 200, 200, 128]));

        let result = composite(&frame, &overlay, 20.0, Position::TopLeft, 0);

        // ~50% alpha over black: expect roughly 200 * 128/255 ~= 100
        let px = result.get_pixel(5, 5);
        assert!(
            (95..=105).contains(&px[0]),
            "expected blended value near 100, got {}",
            px[0]
        );
        assert_eq!(px[3], 255);
    }

    #[test]
    fn fully_transparent_overlay_leaves_frame_unchanged() {
        let frame = RgbaImage::from_pixel(50, 50, Rgba([7, 8, 9, 255]));
        let overlay = RgbaImage::from_pixel(10, 10, Rgba([200, 200, 200, 0]));

        let result = composite(&frame, &overlay, 40.0, Position::Center, 0);
        assert_eq!(result, frame);
    }

    #[test]
    fn compositing_is_deterministic() {
        let mut frame = RgbaImage::new(64, 64);
        for (i, px) in frame.pixels_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let v = (i % 251) as u8;
            *px = Rgba([v, v.wrapping_mul(3), v.wrapping_add(17), 255]);
        }
        let overlay = RgbaImage::from_pixel(16, 8, Rgba([255, 255, 255, 90]));

        let a = composite(&frame, &overlay, 25.0, Position::BottomRight, 4);
        let b = composite(&frame, &overlay, 25.0, Position::BottomRight, 4);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn inputs_are_not_mutated() {
        let frame = RgbaImage::from_pixel(40, 40, Rgba([1, 2, 3, 255]));
        let overlay = RgbaImage::from_pixel(8, 8, Rgba([9, 9, 9, 200]));
        let frame_before = frame.clone();
        let overlay_before = overlay.clone();

        let _ = composite(&frame, &overlay, 50.0, Position::TopRight, 2);
        assert_eq!(frame, frame_before);
        assert_eq!(overlay, overlay_before);
    }

    #[test]
    fn tiny_frame_degenerates_to_noop_paste() {
        // floor(4 * 1 / 100) = 0: empty overlay, frame passes through
        let frame = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let overlay = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));

        let result = composite(&frame, &overlay, 1.0, Position::BottomRight, 0);
        assert_eq!(result, frame);
    }
}
