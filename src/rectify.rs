use opencv::core::{self, Mat, Point, Point2f, Scalar, Size, Vector};
use opencv::imgproc;
use opencv::prelude::*;

use crate::error::LprError;

const CLAHE_CLIP_LIMIT: f64 = 3.0;
const CLAHE_TILE_GRID: i32 = 8;

fn is_empty(image: &Mat) -> bool {
    image.rows() == 0 || image.cols() == 0
}

/// Local contrast enhancement applied before any geometric analysis.
///
/// Converts BGR to Lab, runs CLAHE on the lightness channel only and
/// converts back, so chroma is untouched. Output dimensions and channel
/// count match the input.
pub fn enhance_contrast(image: &Mat) -> Result<Mat, LprError> {
    if is_empty(image) {
        return Err(LprError::InvalidImage);
    }

    let mut lab = Mat::default();
    imgproc::cvt_color(
        image,
        &mut lab,
        imgproc::COLOR_BGR2Lab,
        0,
    )?;

    let mut channels = Vector::<Mat>::new();
    core::split(&lab, &mut channels)?;

    let mut clahe = imgproc::create_clahe(
        CLAHE_CLIP_LIMIT,
        Size::new(CLAHE_TILE_GRID, CLAHE_TILE_GRID),
    )?;
    let mut equalized = Mat::default();
    clahe.apply(&channels.get(0)?, &mut equalized)?;
    channels.set(0, equalized)?;

    let mut merged = Mat::default();
    core::merge(&channels, &mut merged)?;

    let mut enhanced = Mat::default();
    imgproc::cvt_color(
        &merged,
        &mut enhanced,
        imgproc::COLOR_Lab2BGR,
        0,
    )?;
    Ok(enhanced)
}

/// Angle-correction rule applied to the raw `min_area_rect` angle.
///
/// With `flip` set, angles below -45° fold to `90 + angle`; otherwise
/// angles above -45° fold to `-90 + angle`. `rotate` adds a half turn on
/// top of whichever branch ran.
pub fn corrected_angle(angle: f32, flip: bool, rotate: bool) -> f32 {
    let mut angle = angle;
    if flip {
        if angle < -45.0 {
            angle += 90.0;
        }
    } else if angle > -45.0 {
        angle -= 90.0;
    }
    if rotate {
        angle += 180.0;
    }
    angle
}

/// Rotates a plate crop so its text baseline sits horizontal.
///
/// The dominant contour of the Otsu-binarized image gives a min-area
/// rectangle whose angle, after [`corrected_angle`], drives a rotation
/// about the image center at unit scale. Cubic interpolation with
/// replicated borders, output size equals input size.
pub fn deskew(image: &Mat, flip: bool, rotate: bool) -> Result<Mat, LprError> {
    if is_empty(image) {
        return Err(LprError::InvalidImage);
    }

    let gray = if image.channels() == 1 {
        image.clone()
    } else {
        let mut gray = Mat::default();
        imgproc::cvt_color(
            image,
            &mut gray,
            imgproc::COLOR_BGR2GRAY,
            0,
        )?;
        gray
    };

    let mut binary = Mat::default();
    imgproc::threshold(
        &gray,
        &mut binary,
        0.0,
        255.0,
        imgproc::THRESH_BINARY + imgproc::THRESH_OTSU,
    )?;

    let mut contours = Vector::<Vector<Point>>::new();
    imgproc::find_contours(
        &binary,
        &mut contours,
        imgproc::RETR_EXTERNAL,
        imgproc::CHAIN_APPROX_SIMPLE,
        Point::new(0, 0),
    )?;

    let mut largest: Option<Vector<Point>> = None;
    let mut largest_area = 0.0;
    for contour in contours {
        let area = imgproc::contour_area(&contour, false)?;
        if largest.is_none() || area > largest_area {
            largest_area = area;
            largest = Some(contour);
        }
    }
    let largest = largest.ok_or(LprError::NoContourFound)?;

    let rect = imgproc::min_area_rect(&largest)?;
    let angle = corrected_angle(rect.angle, flip, rotate);

    let center = Point2f::new((image.cols() / 2) as f32, (image.rows() / 2) as f32);
    let rotation = imgproc::get_rotation_matrix_2d(center, angle as f64, 1.0)?;

    let mut rotated = Mat::default();
    imgproc::warp_affine(
        image,
        &mut rotated,
        &rotation,
        Size::new(image.cols(), image.rows()),
        imgproc::INTER_CUBIC,
        core::BORDER_REPLICATE,
        Scalar::default(),
    )?;
    Ok(rotated)
}

/// Orders four quadrilateral corners as top-left, top-right, bottom-right,
/// bottom-left. The top-left corner minimizes x+y and the bottom-right
/// maximizes it; the top-right maximizes x-y and the bottom-left
/// minimizes it.
pub fn order_points(points: [Point2f; 4]) -> [Point2f; 4] {
    let sum = |p: &Point2f| p.x + p.y;
    let diff = |p: &Point2f| p.x - p.y;

    let mut ordered = [Point2f::default(); 4];
    ordered[0] = *points
        .iter()
        .min_by(|a, b| sum(a).total_cmp(&sum(b)))
        .unwrap();
    ordered[2] = *points
        .iter()
        .max_by(|a, b| sum(a).total_cmp(&sum(b)))
        .unwrap();
    ordered[1] = *points
        .iter()
        .max_by(|a, b| diff(a).total_cmp(&diff(b)))
        .unwrap();
    ordered[3] = *points
        .iter()
        .min_by(|a, b| diff(a).total_cmp(&diff(b)))
        .unwrap();
    ordered
}

/// Unwarps the quadrilateral spanned by `points` into an axis-aligned
/// rectangle.
///
/// Destination width is the longer of the top and bottom edges, height the
/// longer of the left and right edges, both floored. Collinear or
/// coincident corners produce a degenerate output rather than an error;
/// validate beforehand if that case must be reported.
pub fn four_point_transform(image: &Mat, points: [Point2f; 4]) -> Result<Mat, LprError> {
    if is_empty(image) {
        return Err(LprError::InvalidImage);
    }

    let [tl, tr, br, bl] = order_points(points);

    let dist = |a: Point2f, b: Point2f| ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
    let width = dist(br, bl).max(dist(tr, tl)) as i32;
    let height = dist(tr, br).max(dist(tl, bl)) as i32;

    let src = Vector::<Point2f>::from_iter([tl, tr, br, bl]);
    let dst = Vector::<Point2f>::from_iter([
        Point2f::new(0.0, 0.0),
        Point2f::new((width - 1) as f32, 0.0),
        Point2f::new((width - 1) as f32, (height - 1) as f32),
        Point2f::new(0.0, (height - 1) as f32),
    ]);

    let transform = imgproc::get_perspective_transform(&src, &dst, core::DECOMP_LU)?;
    let mut warped = Mat::default();
    imgproc::warp_perspective(
        image,
        &mut warped,
        &transform,
        Size::new(width, height),
        imgproc::INTER_LINEAR,
        core::BORDER_CONSTANT,
        Scalar::default(),
    )?;
    Ok(warped)
}

#[cfg(test)]
mod test {
    use opencv::core::{Rect, CV_8UC3};

    use super::*;

    fn plate_like_image() -> Mat {
        // Black frame with a bright plate-shaped block in the middle.
        let mut image =
            Mat::new_rows_cols_with_default(100, 200, CV_8UC3, Scalar::all(0.0)).unwrap();
        imgproc::rectangle(
            &mut image,
            Rect::new(40, 30, 120, 40),
            Scalar::new(255.0, 255.0, 255.0, 0.0),
            imgproc::FILLED,
            imgproc::LINE_8,
            0,
        )
        .unwrap();
        image
    }

    #[test]
    fn corrected_angle_flip_branch() {
        // flip: only angles below -45 fold.
        assert_eq!(corrected_angle(-60.0, true, false), 30.0);
        assert_eq!(corrected_angle(-30.0, true, false), -30.0);
        // no flip: only angles above -45 fold.
        assert_eq!(corrected_angle(-30.0, false, false), -120.0);
        assert_eq!(corrected_angle(-60.0, false, false), -60.0);
    }

    #[test]
    fn corrected_angle_rotate_adds_half_turn() {
        assert_eq!(corrected_angle(-60.0, true, true), 210.0);
        assert_eq!(corrected_angle(-30.0, false, true), 60.0);
    }

    #[test]
    fn order_points_is_canonical() {
        let shuffled = [
            Point2f::new(99.0, 49.0),
            Point2f::new(0.0, 0.0),
            Point2f::new(0.0, 49.0),
            Point2f::new(99.0, 0.0),
        ];
        let [tl, tr, br, bl] = order_points(shuffled);
        assert_eq!(tl, Point2f::new(0.0, 0.0));
        assert_eq!(tr, Point2f::new(99.0, 0.0));
        assert_eq!(br, Point2f::new(99.0, 49.0));
        assert_eq!(bl, Point2f::new(0.0, 49.0));
    }

    #[test]
    fn four_point_transform_output_size() {
        let image = plate_like_image();
        let corners = [
            Point2f::new(0.0, 0.0),
            Point2f::new(99.0, 0.0),
            Point2f::new(99.0, 49.0),
            Point2f::new(0.0, 49.0),
        ];
        let warped = four_point_transform(&image, corners).unwrap();
        assert_eq!(warped.cols(), 99);
        assert_eq!(warped.rows(), 49);
    }

    #[test]
    fn perspective_round_trip_recovers_corners() {
        let quad = order_points([
            Point2f::new(12.0, 90.0),
            Point2f::new(10.0, 10.0),
            Point2f::new(190.0, 15.0),
            Point2f::new(185.0, 95.0),
        ]);
        let dst = [
            Point2f::new(0.0, 0.0),
            Point2f::new(99.0, 0.0),
            Point2f::new(99.0, 49.0),
            Point2f::new(0.0, 49.0),
        ];
        let src_v = Vector::<Point2f>::from_iter(quad);
        let dst_v = Vector::<Point2f>::from_iter(dst);
        let transform =
            imgproc::get_perspective_transform(&src_v, &dst_v, core::DECOMP_LU).unwrap();

        let mut inverse = Mat::default();
        core::invert(&transform, &mut inverse, core::DECOMP_LU).unwrap();

        let mut recovered = Vector::<Point2f>::new();
        core::perspective_transform(&dst_v, &mut recovered, &inverse).unwrap();

        for (expected, actual) in quad.iter().zip(recovered.iter()) {
            assert!((expected.x - actual.x).abs() < 1e-2);
            assert!((expected.y - actual.y).abs() < 1e-2);
        }
    }

    #[test]
    fn deskew_rejects_empty_image() {
        let empty = Mat::default();
        assert!(matches!(
            deskew(&empty, false, false),
            Err(LprError::InvalidImage)
        ));
    }

    #[test]
    fn deskew_reports_missing_contour() {
        let black = Mat::new_rows_cols_with_default(40, 80, CV_8UC3, Scalar::all(0.0)).unwrap();
        assert!(matches!(
            deskew(&black, false, false),
            Err(LprError::NoContourFound)
        ));
    }

    #[test]
    fn deskew_preserves_dimensions() {
        let image = plate_like_image();
        let rotated = deskew(&image, true, false).unwrap();
        assert_eq!(rotated.rows(), image.rows());
        assert_eq!(rotated.cols(), image.cols());
    }

    #[test]
    fn enhance_contrast_preserves_shape() {
        let image = plate_like_image();
        let enhanced = enhance_contrast(&image).unwrap();
        assert_eq!(enhanced.rows(), image.rows());
        assert_eq!(enhanced.cols(), image.cols());
        assert_eq!(enhanced.channels(), image.channels());

        let empty = Mat::default();
        assert!(matches!(
            enhance_contrast(&empty),
            Err(LprError::InvalidImage)
        ));
    }
}

