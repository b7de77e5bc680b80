//! Draws detection overlays onto result images

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::models::Detections;
use crate::utils::ApiError;

/// The overlay color for detected flakes
const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// The jpeg quality result images are encoded with
const JPEG_QUALITY: u8 = 90;

/// Render the result image for a detection pass
///
/// The result is the original image with a two pixel box drawn around each
/// detected flake, encoded as a jpeg.
///
/// # Arguments
///
/// * `image` - The original image
/// * `detections` - What the detector reported
pub fn annotate(image: &DynamicImage, detections: &Detections) -> Result<Vec<u8>, ApiError> {
    let mut canvas: RgbImage = image.to_rgb8();
    for flake in &detections.flakes {
        let [x1, y1, x2, y2] = flake.bbox;
        let width = x2.saturating_sub(x1).max(1);
        let height = y2.saturating_sub(y1).max(1);
        draw_hollow_rect_mut(
            &mut canvas,
            Rect::at(x1 as i32, y1 as i32).of_size(width, height),
            BOX_COLOR,
        );
        // a second inset rectangle thickens the outline to two pixels
        if width > 2 && height > 2 {
            draw_hollow_rect_mut(
                &mut canvas,
                Rect::at(x1 as i32 + 1, y1 as i32 + 1).of_size(width - 2, height - 2),
                BOX_COLOR,
            );
        }
    }
    // encode the annotated canvas as a jpeg
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY).encode_image(&canvas)?;
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Flake;

    /// Build detections with one box for tests
    fn detections() -> Detections {
        Detections {
            flakes: vec![Flake {
                bbox: [10, 10, 80, 70],
                confidence: 0.9,
                area: 4200,
                material_type: "hBN".to_owned(),
            }],
            total_flakes: 1,
            image_dimensions: [160, 120],
        }
    }

    #[test]
    fn annotation_preserves_dimensions() {
        let image = DynamicImage::new_rgb8(160, 120);
        let encoded = annotate(&image, &detections()).unwrap();
        let decoded = image::load_from_memory(&encoded).unwrap();
        assert_eq!(decoded.width(), 160);
        assert_eq!(decoded.height(), 120);
    }

    #[test]
    fn zero_flakes_still_encodes() {
        let image = DynamicImage::new_rgb8(64, 64);
        let empty = Detections {
            flakes: Vec::new(),
            total_flakes: 0,
            image_dimensions: [64, 64],
        };
        let encoded = annotate(&image, &empty).unwrap();
        assert!(image::load_from_memory(&encoded).is_ok());
    }
}
