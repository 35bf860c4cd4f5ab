//! JPEG decoding.

use std::io::Cursor;

use jpeg_decoder::{Decoder, PixelFormat};

use super::DecodedImage;

/// Decode a JPEG from raw bytes
pub(super) fn decode_jpeg(bytes: &[u8]) -> Result<DecodedImage, String> {
    let mut decoder = Decoder::new(Cursor::new(bytes));
    let pixels = decoder
        .decode()
        .map_err(|e| format!("Failed to decode JPEG: {}", e))?;
    let info = decoder
        .info()
        .ok_or_else(|| "Failed to read JPEG info".to_string())?;

    let width = info.width as u32;
    let height = info.height as u32;

    let data = match info.pixel_format {
        PixelFormat::RGB24 => pixels,
        PixelFormat::L8 => expand_luma8(&pixels),
        PixelFormat::L16 => expand_luma16(&pixels),
        PixelFormat::CMYK32 => {
            return Err("CMYK JPEG not supported".to_string());
        }
    };

    let expected_len = width as usize * height as usize * 3;
    if data.len() != expected_len {
        return Err(format!(
            "JPEG buffer size mismatch: expected {}, got {}",
            expected_len,
            data.len()
        ));
    }

    Ok(DecodedImage {
        width,
        height,
        data,
        channels: 3,
    })
}

/// Expand 8-bit luma to RGB
fn expand_luma8(bytes: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(bytes.len() * 3);
    for &luma in bytes {
        rgb.push(luma);
        rgb.push(luma);
        rgb.push(luma);
    }
    rgb
}

/// Expand 16-bit luma (big-endian pairs) to 8-bit RGB
fn expand_luma16(bytes: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(bytes.len() / 2 * 3);
    for chunk in bytes.chunks_exact(2) {
        let luma = chunk[0];
        rgb.push(luma);
        rgb.push(luma);
        rgb.push(luma);
    }
    rgb
}
