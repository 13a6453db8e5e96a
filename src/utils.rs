use std::cmp::{max, min};

use opencv::core::Rect;

use crate::detect::Detection;

pub fn clamp(n: i32, size: i32) -> i32 {
    max(0, min(n, size))
}

/// Integer ROI for a detection, clamped to the image bounds. The result
/// can be degenerate (zero width or height) when the detection lies
/// outside the image; callers skip those.
pub fn detection_roi(detection: &Detection, cols: i32, rows: i32) -> Rect {
    let x1 = clamp(detection.x1.floor() as i32, cols);
    let y1 = clamp(detection.y1.floor() as i32, rows);
    let x2 = clamp(detection.x2.ceil() as i32, cols);
    let y2 = clamp(detection.y2.ceil() as i32, rows);
    Rect::new(x1, y1, x2 - x1, y2 - y1)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clamps_to_bounds() {
        assert_eq!(clamp(-5, 100), 0);
        assert_eq!(clamp(50, 100), 50);
        assert_eq!(clamp(150, 100), 100);
    }

    #[test]
    fn roi_is_clamped_to_image() {
        let detection = Detection::new(-10.0, 20.0, 250.0, 90.0, "plate", 0.9);
        let roi = detection_roi(&detection, 200, 100);
        assert_eq!(roi, Rect::new(0, 20, 200, 70));
    }

    #[test]
    fn out_of_frame_roi_is_degenerate() {
        let detection = Detection::new(300.0, 300.0, 400.0, 400.0, "plate", 0.9);
        let roi = detection_roi(&detection, 200, 100);
        assert_eq!(roi.width, 0);
        assert_eq!(roi.height, 0);
    }
}
