//! PNG output for generated images.
//!
//! Converts result buffers to PNG files with optional integer scaling.

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::error::{Result, VizError};
use crate::types::GenerationResult;

/// Write a generation result to a PNG file.
///
/// # Arguments
///
/// * `result` - The generated image to write
/// * `path` - Output file path
/// * `scale` - Integer scale factor (1 = no scaling)
pub fn write_png(result: &GenerationResult, path: &Path, scale: u32) -> Result<()> {
    let img = to_image(result, scale)?;

    img.save(path).map_err(|e| VizError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write PNG: {}", e),
    })?;

    Ok(())
}

/// Largest accepted upscaling factor.
pub const MAX_SCALE: u32 = 32;

/// Build an RGBA image from a result buffer, upscaled by nearest neighbour.
pub fn to_image(result: &GenerationResult, scale: u32) -> Result<RgbaImage> {
    let scale = scale.max(1); // Minimum scale of 1
    let side = result.resolution;

    let size = side
        .checked_mul(scale)
        .filter(|_| scale <= MAX_SCALE)
        .ok_or_else(|| {
            VizError::config(
                format!("Scale factor too large: {}", scale),
                Some(format!("Use a scale between 1 and {}", MAX_SCALE)),
            )
        })?;

    let expected = side as usize * side as usize * 4;
    if result.buffer.len() != expected {
        return Err(VizError::internal(format!(
            "buffer holds {} bytes, expected {} for {}x{}",
            result.buffer.len(),
            expected,
            side,
            side
        )));
    }

    let mut img: RgbaImage = ImageBuffer::new(size, size);

    for (i, px) in result.buffer.chunks_exact(4).enumerate() {
        let x = (i as u32 % side) * scale;
        let y = (i as u32 / side) * scale;
        let rgba = Rgba([px[0], px[1], px[2], px[3]]);

        // Fill scaled pixels
        for sy in 0..scale {
            for sx in 0..scale {
                img.put_pixel(x + sx, y + sy, rgba);
            }
        }
    }

    Ok(img)
}
