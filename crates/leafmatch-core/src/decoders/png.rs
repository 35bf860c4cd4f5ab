//! PNG decoding.

use std::io::Cursor;

use super::DecodedImage;

/// Decode a PNG from raw bytes
pub(super) fn decode_png(bytes: &[u8]) -> Result<DecodedImage, String> {
    let decoder = png::Decoder::new(Cursor::new(bytes));
    let mut reader = decoder
        .read_info()
        .map_err(|e| format!("Failed to read PNG info: {}", e))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    // Allocate buffer for image data
    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| "Failed to determine PNG buffer size".to_string())?;
    let mut buf = vec![0u8; buffer_size];
    let frame_info = reader
        .next_frame(&mut buf)
        .map_err(|e| format!("Failed to read PNG frame: {}", e))?;

    // Get the actual bytes used
    let raw = &buf[..frame_info.buffer_size()];

    // Convert to interleaved 8-bit RGB
    let data = match (color_type, bit_depth) {
        (png::ColorType::Grayscale, png::BitDepth::Eight) => expand_gray8(raw),
        (png::ColorType::Grayscale, png::BitDepth::Sixteen) => expand_gray16(raw),
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => expand_gray_alpha8(raw),
        (png::ColorType::Rgb, png::BitDepth::Eight) => raw.to_vec(),
        (png::ColorType::Rgb, png::BitDepth::Sixteen) => rgb16_to_rgb8(raw),
        (png::ColorType::Rgba, png::BitDepth::Eight) => drop_alpha8(raw),
        (png::ColorType::Rgba, png::BitDepth::Sixteen) => rgba16_to_rgb8(raw),
        (png::ColorType::Indexed, _) => {
            return Err("Indexed PNG not supported".to_string());
        }
        _ => {
            return Err(format!(
                "Unsupported PNG format: {:?} with bit depth {:?}",
                color_type, bit_depth
            ));
        }
    };

    let expected_len = width as usize * height as usize * 3;
    if data.len() != expected_len {
        return Err(format!(
            "PNG buffer size mismatch: expected {}, got {}",
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

/// Expand 8-bit grayscale to RGB
fn expand_gray8(bytes: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(bytes.len() * 3);
    for &gray in bytes {
        rgb.push(gray);
        rgb.push(gray);
        rgb.push(gray);
    }
    rgb
}

/// Expand 16-bit grayscale to 8-bit RGB (PNG 16-bit is big-endian)
fn expand_gray16(bytes: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(bytes.len() / 2 * 3);
    for chunk in bytes.chunks_exact(2) {
        let gray = chunk[0]; // high byte of the big-endian sample
        rgb.push(gray);
        rgb.push(gray);
        rgb.push(gray);
    }
    rgb
}

/// Expand 8-bit grayscale+alpha to RGB, dropping alpha
fn expand_gray_alpha8(bytes: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(bytes.len() / 2 * 3);
    for chunk in bytes.chunks_exact(2) {
        let gray = chunk[0];
        rgb.push(gray);
        rgb.push(gray);
        rgb.push(gray);
    }
    rgb
}

/// Scale 16-bit RGB down to 8-bit
fn rgb16_to_rgb8(bytes: &[u8]) -> Vec<u8> {
    bytes.chunks_exact(2).map(|chunk| chunk[0]).collect()
}

/// Drop the alpha channel from 8-bit RGBA
fn drop_alpha8(bytes: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(bytes.len() / 4 * 3);
    for rgba in bytes.chunks_exact(4) {
        rgb.push(rgba[0]);
        rgb.push(rgba[1]);
        rgb.push(rgba[2]);
    }
    rgb
}

/// Scale 16-bit RGBA down to 8-bit RGB, dropping alpha
fn rgba16_to_rgb8(bytes: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(bytes.len() / 8 * 3);
    for rgba in bytes.chunks_exact(8) {
        rgb.push(rgba[0]);
        rgb.push(rgba[2]);
        rgb.push(rgba[4]);
    }
    rgb
}
