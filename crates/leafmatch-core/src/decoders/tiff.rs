//! TIFF decoding.

use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::ColorType;

use super::DecodedImage;

/// Decode a TIFF from raw bytes
pub(super) fn decode_tiff(bytes: &[u8]) -> Result<DecodedImage, String> {
    let mut decoder =
        Decoder::new(Cursor::new(bytes)).map_err(|e| format!("Failed to create TIFF decoder: {}", e))?;

    // Get image dimensions
    let (width, height) = decoder
        .dimensions()
        .map_err(|e| format!("Failed to get TIFF dimensions: {}", e))?;

    // Get color type
    let color_type = decoder
        .colortype()
        .map_err(|e| format!("Failed to get TIFF color type: {}", e))?;

    let channels: usize = match color_type {
        ColorType::Gray(_) => 1,
        ColorType::RGB(_) => 3,
        ColorType::RGBA(_) => 4,
        other => return Err(format!("Unsupported TIFF color type: {:?}", other)),
    };

    // Read the image data and scale to 8-bit samples
    let image_data = decoder
        .read_image()
        .map_err(|e| format!("Failed to read TIFF image data: {}", e))?;

    let samples: Vec<u8> = match image_data {
        DecodingResult::U8(buf) => buf,
        DecodingResult::U16(buf) => buf.iter().map(|&v| (v >> 8) as u8).collect(),
        _ => return Err("Unsupported TIFF sample format".to_string()),
    };

    let expected_len = width as usize * height as usize * channels;
    if samples.len() != expected_len {
        return Err(format!(
            "TIFF buffer size mismatch: expected {}, got {}",
            expected_len,
            samples.len()
        ));
    }

    let data = match channels {
        // Grayscale: expand to RGB
        1 => {
            let mut rgb = Vec::with_capacity(samples.len() * 3);
            for &gray in &samples {
                rgb.push(gray);
                rgb.push(gray);
                rgb.push(gray);
            }
            rgb
        }
        // RGBA: drop alpha channel
        4 => {
            let mut rgb = Vec::with_capacity(samples.len() / 4 * 3);
            for rgba in samples.chunks_exact(4) {
                rgb.push(rgba[0]);
                rgb.push(rgba[1]);
                rgb.push(rgba[2]);
            }
            rgb
        }
        // RGB: direct
        _ => samples,
    };

    Ok(DecodedImage {
        width,
        height,
        data,
        channels: 3,
    })
}
