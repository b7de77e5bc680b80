//! A mock detector that fabricates flakes

use image::DynamicImage;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::models::{Detections, Flake};

/// The material labels the mock picks from
const MATERIALS: [&str; 4] = ["graphene", "hBN", "MoS2", "WS2"];

/// Fabricates random flakes when no model is wired up
#[derive(Debug, Default)]
pub struct MockDetector;

impl MockDetector {
    /// Fabricate between one and five flakes with boxes inside the frame
    ///
    /// # Arguments
    ///
    /// * `image` - The image to fabricate flakes for
    #[must_use]
    pub fn detect(&self, image: &DynamicImage) -> Detections {
        let (width, height) = (image.width(), image.height());
        let mut rng = rand::rng();
        let count = rng.random_range(1..=5);
        let mut flakes = Vec::with_capacity(count);
        for _ in 0..count {
            // anchor each box so it stays inside the frame even for tiny images
            let x1 = rng.random_range(0..width.saturating_sub(100).max(1));
            let y1 = rng.random_range(0..height.saturating_sub(100).max(1));
            let x2 = (x1 + rng.random_range(50..=100)).min(width);
            let y2 = (y1 + rng.random_range(50..=100)).min(height);
            let material = MATERIALS.choose(&mut rng).copied().unwrap_or("graphene");
            flakes.push(Flake {
                bbox: [x1, y1, x2, y2],
                confidence: rng.random_range(0.7..0.95),
                area: u64::from(x2 - x1) * u64::from(y2 - y1),
                material_type: material.to_owned(),
            });
        }
        Detections {
            total_flakes: flakes.len(),
            flakes,
            image_dimensions: [width, height],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flakes_stay_inside_the_frame() {
        let image = DynamicImage::new_rgb8(640, 480);
        let mock = MockDetector;
        for _ in 0..50 {
            let detections = mock.detect(&image);
            assert!((1..=5).contains(&detections.total_flakes));
            assert_eq!(detections.total_flakes, detections.flakes.len());
            assert_eq!(detections.image_dimensions, [640, 480]);
            for flake in &detections.flakes {
                let [x1, y1, x2, y2] = flake.bbox;
                assert!(x1 <= x2 && x2 <= 640);
                assert!(y1 <= y2 && y2 <= 480);
                assert!((0.7..0.95).contains(&flake.confidence));
                assert!(MATERIALS.contains(&flake.material_type.as_str()));
            }
        }
    }

    #[test]
    fn tiny_images_do_not_panic() {
        let image = DynamicImage::new_rgb8(32, 16);
        let detections = MockDetector.detect(&image);
        for flake in &detections.flakes {
            let [x1, y1, x2, y2] = flake.bbox;
            assert!(x2 <= 32 && y2 <= 16);
            assert!(x1 <= x2 && y1 <= y2);
        }
    }
}
