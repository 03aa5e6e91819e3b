//! Pure calculation functions for image dimensions and sizes.
//!
//! All functions here are pure and testable without any I/O or images.

/// Height that keeps the source aspect ratio at `target_width`.
///
/// Never returns 0, so very wide panoramas still produce a 1px-tall image.
///
/// ```
/// # use argo::imaging::calculate_target_height;
/// assert_eq!(calculate_target_height((4000, 3000), 800), 600);
/// assert_eq!(calculate_target_height((1000, 1), 10), 1);
/// ```
pub fn calculate_target_height(source: (u32, u32), target_width: u32) -> u32 {
    let (src_w, src_h) = source;
    if src_w == 0 {
        return src_h.max(1);
    }
    let h = (target_width as f64 * src_h as f64 / src_w as f64).round() as u32;
    h.max(1)
}

/// Size of the output relative to the original, in percent.
///
/// Returns `None` for an empty original, where a ratio is meaningless.
pub fn size_percentage(new_size: u64, original_size: u64) -> Option<f64> {
    if original_size == 0 {
        return None;
    }
    Some(new_size as f64 / original_size as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_height_landscape() {
        assert_eq!(calculate_target_height((2000, 1500), 800), 600);
    }

    #[test]
    fn target_height_portrait() {
        assert_eq!(calculate_target_height((1500, 2000), 600), 800);
    }

    #[test]
    fn target_height_rounds() {
        // 1000x333 → 100 wide → 33.3 tall
        assert_eq!(calculate_target_height((1000, 333), 100), 33);
        // 1000x335 → 100 wide → 33.5 tall
        assert_eq!(calculate_target_height((1000, 335), 100), 34);
    }

    #[test]
    fn target_height_upscale() {
        assert_eq!(calculate_target_height((400, 300), 800), 600);
    }

    #[test]
    fn target_height_never_zero() {
        assert_eq!(calculate_target_height((10000, 10), 100), 1);
        assert_eq!(calculate_target_height((0, 0), 100), 1);
    }

    #[test]
    fn percentage_smaller_output() {
        assert_eq!(size_percentage(250, 1000), Some(25.0));
    }

    #[test]
    fn percentage_larger_output() {
        assert_eq!(size_percentage(1500, 1000), Some(150.0));
    }

    #[test]
    fn percentage_empty_original() {
        assert_eq!(size_percentage(10, 0), None);
    }
}
