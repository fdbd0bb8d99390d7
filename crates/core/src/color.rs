//! Block color derivation and packed RGB helpers.
//!
//! Each new block gets `base + range * sin(intensity * offset)` per channel,
//! where the offset grows with the stack, so the tower cycles through a smooth
//! palette. Channels are truncated toward zero and clamped into [0, 255] before
//! packing into `0xRRGGBB`.

use crate::config::{ColorsConfig, RgbConfig};
use crate::error::ConfigError;

/// Packed color for the block spawned at `offset` (stack length + round offset).
pub fn block_color(colors: &ColorsConfig, offset: f64) -> u32 {
    let r = channel(colors.base.r, colors.range.r, colors.intensity.r, offset);
    let g = channel(colors.base.g, colors.range.g, colors.intensity.g, offset);
    let b = channel(colors.base.b, colors.range.b, colors.intensity.b, offset);
    pack(r, g, b)
}

fn channel(base: f64, range: f64, intensity: f64, offset: f64) -> u8 {
    let v = (base + range * (intensity * offset).sin()).trunc();
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0) as u8
}

pub fn pack(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

pub fn unpack(rgb: u32) -> (u8, u8, u8) {
    (
        ((rgb >> 16) & 0xff) as u8,
        ((rgb >> 8) & 0xff) as u8,
        (rgb & 0xff) as u8,
    )
}

/// Parse `0xRRGGBB`, `#RRGGBB` or bare `RRGGBB`.
pub fn parse_hex_color(s: &str) -> Result<u32, ConfigError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .or_else(|| trimmed.strip_prefix('#'))
        .unwrap_or(trimmed);

    if digits.is_empty() || digits.len() > 6 {
        return Err(ConfigError::Color(s.to_string()));
    }
    u32::from_str_radix(digits, 16).map_err(|_| ConfigError::Color(s.to_string()))
}

/// Whether `base ± range` can leave the 8-bit range for any channel.
pub fn may_saturate(base: &RgbConfig, range: &RgbConfig) -> bool {
    [(base.r, range.r), (base.g, range.g), (base.b, range.b)]
        .iter()
        .any(|&(b, r)| b + r.abs() > 255.0 || b - r.abs() < 0.0)
}
