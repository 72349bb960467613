//! Pure calculation functions for fit-and-letterbox geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the size of a source image fitted inside a canvas.
///
/// The uniform scale is `min(canvas_w / src_w, canvas_h / src_h)`, capped at
/// 1.0 so small photos are never enlarged. Each side is rounded to the nearest
/// pixel and kept within `1..=canvas`.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `canvas` - Target canvas dimensions (width, height)
///
/// # Returns
/// * `(width, height)` - Fitted dimensions, or `(0, 0)` for an empty source
pub fn calculate_fit_dimensions(source: (u32, u32), canvas: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (can_w, can_h) = canvas;

    if src_w == 0 || src_h == 0 || can_w == 0 || can_h == 0 {
        return (0, 0);
    }

    let scale = (can_w as f64 / src_w as f64)
        .min(can_h as f64 / src_h as f64)
        .min(1.0);

    let w = ((src_w as f64 * scale).round() as u32).clamp(1, can_w);
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, can_h);
    (w, h)
}

/// Top-left offset that centers `content` on `canvas`.
///
/// Uses floor division, so an odd leftover pixel goes to the right/bottom margin.
pub fn center_offset(canvas: (u32, u32), content: (u32, u32)) -> (u32, u32) {
    (
        canvas.0.saturating_sub(content.0) / 2,
        canvas.1.saturating_sub(content.1) / 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // calculate_fit_dimensions tests
    // =========================================================================

    #[test]
    fn fit_landscape_into_square() {
        // 4000x3000 → scale 0.45 → 1800x1350
        assert_eq!(
            calculate_fit_dimensions((4000, 3000), (1800, 1800)),
            (1800, 1350)
        );
    }

    #[test]
    fn fit_portrait_into_square() {
        // 3000x4000 → scale 0.45 → 1350x1800
        assert_eq!(
            calculate_fit_dimensions((3000, 4000), (1800, 1800)),
            (1350, 1800)
        );
    }

    #[test]
    fn fit_never_upscales() {
        assert_eq!(calculate_fit_dimensions((640, 480), (1800, 1800)), (640, 480));
    }

    #[test]
    fn fit_exact_size_is_identity() {
        assert_eq!(
            calculate_fit_dimensions((1800, 1800), (1800, 1800)),
            (1800, 1800)
        );
    }

    #[test]
    fn fit_rounds_to_nearest() {
        // 1000x333 into 500x500 → scale 0.5 → 500x166.5 → 500x167
        assert_eq!(calculate_fit_dimensions((1000, 333), (500, 500)), (500, 167));
    }

    #[test]
    fn fit_keeps_thin_images_visible() {
        // 1x10000 into 1800x1800 → width rounds to 0, kept at 1
        assert_eq!(calculate_fit_dimensions((1, 10000), (1800, 1800)), (1, 1800));
    }

    #[test]
    fn fit_non_square_canvas() {
        // 2000x1000 into 1600x1200 → scale min(0.8, 1.2) = 0.8 → 1600x800
        assert_eq!(
            calculate_fit_dimensions((2000, 1000), (1600, 1200)),
            (1600, 800)
        );
    }

    #[test]
    fn fit_empty_source() {
        assert_eq!(calculate_fit_dimensions((0, 100), (1800, 1800)), (0, 0));
    }

    // =========================================================================
    // center_offset tests
    // =========================================================================

    #[test]
    fn offset_centers_letterbox() {
        assert_eq!(center_offset((1800, 1800), (1800, 1350)), (0, 225));
    }

    #[test]
    fn offset_floors_odd_margins() {
        assert_eq!(center_offset((1800, 1800), (641, 480)), (579, 660));
    }

    #[test]
    fn offset_zero_when_content_fills() {
        assert_eq!(center_offset((1800, 1800), (1800, 1800)), (0, 0));
    }
}
