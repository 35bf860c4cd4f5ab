//! Fingerprint extraction
//!
//! Converts a decoded RGB raster into a fixed-size, L1-normalized joint
//! color histogram that is independent of image dimensions.

use std::path::Path;

use crate::decoders::{self, DecodedImage};
use crate::models::{Fingerprint, MatchError};

/// Default number of histogram bins per color channel (8 cubed = 512 bins).
pub const DEFAULT_BINS_PER_CHANNEL: usize = 8;

/// Compute the joint RGB histogram fingerprint of a decoded image.
///
/// Each pixel increments exactly one bin, chosen by which bin range its
/// (R, G, B) triple falls into; the red axis varies slowest in the
/// flattened vector. The histogram is L1-normalized so the bin values sum
/// to 1, making fingerprints invariant to image resolution and aspect
/// ratio. Deterministic: the same pixel data always yields the same
/// vector.
pub fn extract_fingerprint(image: &DecodedImage, bins_per_channel: usize) -> Fingerprint {
    let bins = bins_per_channel.max(1);
    let mut counts = vec![0u32; bins * bins * bins];

    for pixel in image.data.chunks_exact(3) {
        let r_bin = pixel[0] as usize * bins / 256;
        let g_bin = pixel[1] as usize * bins / 256;
        let b_bin = pixel[2] as usize * bins / 256;
        counts[(r_bin * bins + g_bin) * bins + b_bin] += 1;
    }

    let total: u64 = counts.iter().map(|&c| c as u64).sum();
    let values: Vec<f32> = if total > 0 {
        counts.iter().map(|&c| c as f32 / total as f32).collect()
    } else {
        vec![0.0; bins * bins * bins]
    };

    Fingerprint {
        bins_per_channel: bins,
        values,
    }
}

/// Extract a fingerprint from raw image bytes (PNG, JPEG, or TIFF).
///
/// Fails with [`MatchError::Decode`] if the bytes cannot be parsed into a
/// raster; no partial fingerprint is ever returned.
pub fn fingerprint_from_bytes(
    bytes: &[u8],
    bins_per_channel: usize,
) -> Result<Fingerprint, MatchError> {
    let image = decoders::decode_image_bytes(bytes).map_err(MatchError::Decode)?;
    Ok(extract_fingerprint(&image, bins_per_channel))
}

/// Extract a fingerprint from an image file on disk.
pub fn fingerprint_from_path<P: AsRef<Path>>(
    path: P,
    bins_per_channel: usize,
) -> Result<Fingerprint, MatchError> {
    let image = decoders::decode_image(path).map_err(MatchError::Decode)?;
    Ok(extract_fingerprint(&image, bins_per_channel))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(r: u8, g: u8, b: u8, width: u32, height: u32) -> DecodedImage {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            data.push(r);
            data.push(g);
            data.push(b);
        }
        DecodedImage {
            width,
            height,
            data,
            channels: 3,
        }
    }

    #[test]
    fn test_fingerprint_length_and_normalization() {
        let image = solid_image(10, 200, 90, 4, 5);
        let fp = extract_fingerprint(&image, DEFAULT_BINS_PER_CHANNEL);

        assert_eq!(fp.values.len(), 512);
        assert_eq!(fp.bins_per_channel, 8);

        let sum: f32 = fp.values.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "bin values must sum to 1, got {}", sum);
    }

    #[test]
    fn test_fingerprint_bin_placement() {
        // Pixel (0, 128, 255) with 8 bins lands in (0, 4, 7)
        let image = solid_image(0, 128, 255, 1, 1);
        let fp = extract_fingerprint(&image, 8);

        let expected = (0 * 8 + 4) * 8 + 7;
        assert_eq!(fp.values[expected], 1.0);
        assert_eq!(fp.values.iter().filter(|&&v| v > 0.0).count(), 1);
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let image = solid_image(17, 42, 203, 7, 3);
        let a = extract_fingerprint(&image, 8);
        let b = extract_fingerprint(&image, 8);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_resolution_invariant() {
        // Same color distribution at different sizes yields the same
        // normalized fingerprint
        let small = solid_image(100, 150, 200, 2, 2);
        let large = solid_image(100, 150, 200, 16, 9);

        let fp_small = extract_fingerprint(&small, 8);
        let fp_large = extract_fingerprint(&large, 8);
        assert_eq!(fp_small, fp_large);
    }

    #[test]
    fn test_fingerprint_custom_bins() {
        let image = solid_image(255, 255, 255, 2, 2);
        let fp = extract_fingerprint(&image, 4);

        assert_eq!(fp.bins_per_channel, 4);
        assert_eq!(fp.values.len(), 64);
        assert_eq!(fp.values[63], 1.0);
    }

    #[test]
    fn test_fingerprint_empty_raster_is_all_zero() {
        let image = DecodedImage {
            width: 0,
            height: 0,
            data: Vec::new(),
            channels: 3,
        };
        let fp = extract_fingerprint(&image, 8);
        assert!(fp.values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_fingerprint_from_bytes_rejects_garbage() {
        let result = fingerprint_from_bytes(b"not an image at all", 8);
        assert!(matches!(result, Err(MatchError::Decode(_))));
    }

    #[test]
    fn test_fingerprint_from_bytes_rejects_empty_payload() {
        let result = fingerprint_from_bytes(&[], 8);
        assert!(matches!(result, Err(MatchError::Decode(_))));
    }
}
