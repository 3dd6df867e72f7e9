//! Still-image decoding.
//!
//! The controller only needs the [`Decoder`] trait. [`RqrrDecoder`] is the
//! bundled implementation backed by the `rqrr` crate.

use crate::candidate::ScanCandidate;
use crate::error::Result;
use crate::geometry::{Point, Rect};
use image::DynamicImage;
use std::path::Path;
use tracing::{debug, trace};

/// Finds machine-readable codes in a still image
pub trait Decoder: Send + Sync {
    /// Every code found in `image`, with bounds in image pixels
    fn detect(&self, image: &DynamicImage) -> Vec<ScanCandidate>;

    /// Payload strings of every code found; empty when there are none
    fn decode(&self, image: &DynamicImage) -> Vec<String> {
        self.detect(image)
            .into_iter()
            .filter_map(|candidate| candidate.payload)
            .collect()
    }
}

/// QR decoder built on `rqrr`
#[derive(Debug, Clone, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for RqrrDecoder {
    fn detect(&self, image: &DynamicImage) -> Vec<ScanCandidate> {
        let start = std::time::Instant::now();
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();

        if width == 0 || height == 0 {
            return Vec::new();
        }

        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
                gray.get_pixel(x as u32, y as u32).0[0]
            });

        let grids = prepared.detect_grids();
        trace!(count = grids.len(), width, height, "QR grids located");

        let mut candidates = Vec::with_capacity(grids.len());
        for grid in grids {
            let corners: Vec<Point> = grid
                .bounds
                .iter()
                .map(|p| Point::new(p.x as f64, p.y as f64))
                .collect();

            let content = match grid.decode() {
                Ok((_, content)) => content,
                Err(e) => {
                    debug!(error = ?e, "Failed to decode QR grid");
                    continue;
                }
            };

            let bounds = Rect::bounding(&corners).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
            debug!(content = %content, x = bounds.x, y = bounds.y, "Detected QR code");
            candidates.push(ScanCandidate::new(content, bounds));
        }

        if !candidates.is_empty() {
            debug!(
                count = candidates.len(),
                total_ms = start.elapsed().as_millis() as u64,
                "QR detection found codes"
            );
        }

        candidates
    }
}

/// Load a still image from disk
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    debug!("Loading image from: {}", path.display());
    Ok(image::open(path)?)
}

/// Load a still image from encoded bytes (PNG, JPEG, ...)
pub fn load_image_from_memory(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_blank_image_has_no_codes() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(120, 120, Luma([255])));
        let decoder = RqrrDecoder::new();
        assert!(decoder.detect(&image).is_empty());
        assert!(decoder.decode(&image).is_empty());
    }

    #[test]
    fn test_zero_sized_image() {
        let image = DynamicImage::ImageLuma8(GrayImage::new(0, 0));
        assert!(RqrrDecoder::new().decode(&image).is_empty());
    }

    #[test]
    fn test_decode_defaults_to_detected_payloads() {
        struct Fixed;
        impl Decoder for Fixed {
            fn detect(&self, _image: &DynamicImage) -> Vec<ScanCandidate> {
                let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
                vec![
                    ScanCandidate::new("first", bounds),
                    ScanCandidate::without_payload(bounds),
                    ScanCandidate::new("second", bounds),
                ]
            }
        }

        let image = DynamicImage::ImageLuma8(GrayImage::new(4, 4));
        assert_eq!(Fixed.decode(&image), vec!["first", "second"]);
    }

    #[test]
    fn test_load_image_from_invalid_bytes() {
        assert!(matches!(
            load_image_from_memory(b"not an image"),
            Err(crate::error::ScannerError::Image(_))
        ));
    }
}
