//! Linear contrast stretch of grey levels.

use crate::types::ContrastConfig;

use super::stats::GrayRange;

/// Bounds the stretch maps onto 0..=255.
///
/// Auto mode uses the observed range; otherwise the configured one.
pub fn stretch_bounds(config: &ContrastConfig, observed: GrayRange) -> (u8, u8) {
    if config.auto {
        (observed.min, observed.max)
    } else {
        (config.min, config.max)
    }
}

/// Remap `gray` in place so that `min..=max` spans the full range.
///
/// Values outside the bounds saturate. An empty or inverted range leaves the
/// values untouched, so a flat image stays flat.
pub fn stretch(gray: &mut [u8], min: u8, max: u8) {
    let range = i32::from(max) - i32::from(min);
    if range <= 0 {
        return;
    }

    for value in gray.iter_mut() {
        *value = remap(*value, min, range);
    }
}

#[inline]
fn remap(value: u8, min: u8, range: i32) -> u8 {
    let stretched = (i32::from(value) - i32::from(min)) * 255 / range;
    stretched.clamp(0, 255) as u8
}
