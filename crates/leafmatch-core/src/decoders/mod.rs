//! Image decoders for various formats
//!
//! Support for PNG, JPEG, and TIFF sources, read from files or from raw
//! uploaded bytes. All decoders produce interleaved 8-bit RGB: grayscale
//! sources are expanded, alpha channels are dropped, and 16-bit samples
//! are scaled down.

mod jpeg;
mod png;
mod tiff;


use std::path::Path;

/// Decoded image data
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Interleaved RGB data, 8 bits per channel
    pub data: Vec<u8>,

    /// Number of channels (always 3 after decoding)
    pub channels: u8,
}

/// Decode an image from a file path
pub fn decode_image<P: AsRef<Path>>(path: P) -> Result<DecodedImage, String> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| "No file extension found".to_string())?;

    let bytes = std::fs::read(path).map_err(|e| format!("Failed to read image file: {}", e))?;

    match extension.as_str() {
        "png" => png::decode_png(&bytes),
        "jpg" | "jpeg" => jpeg::decode_jpeg(&bytes),
        "tif" | "tiff" => tiff::decode_tiff(&bytes),
        _ => Err(format!("Unsupported file format: {}", extension)),
    }
}

/// Decode an image from raw bytes, sniffing the container format from its
/// magic numbers.
///
/// This is the path uploads take: no filename, no extension, possibly
/// truncated or empty data. A zero-byte payload is a decode error.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<DecodedImage, String> {
    if bytes.is_empty() {
        return Err("Empty image payload".to_string());
    }

    match sniff_format(bytes) {
        Some(ImageFormat::Png) => png::decode_png(bytes),
        Some(ImageFormat::Jpeg) => jpeg::decode_jpeg(bytes),
        Some(ImageFormat::Tiff) => tiff::decode_tiff(bytes),
        None => Err("Unrecognized image format".to_string()),
    }
}

/// Container formats recognized by magic-number sniffing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFormat {
    Png,
    Jpeg,
    Tiff,
}

fn sniff_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some(ImageFormat::Png)
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(ImageFormat::Jpeg)
    } else if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
        Some(ImageFormat::Tiff)
    } else {
        None
    }
}
