// Compositing in linear light instead of on raw sRGB values.
// Visual: glows and translucent panels fade out without the muddy dark fringe
// that sRGB-space mixing gives. Used only when the theme asks for `blend = "linear"`.

use crate::types::Color;

/// Steps in the linear -> sRGB table; finer than 256 so dark tones don't band.
const ENCODE_STEPS: usize = 4096;

/// sRGB transfer curve, 0..1 encoded -> 0..1 linear.
fn decode(c: f32) -> f32 {
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

/// Inverse of `decode`.
fn encode(l: f32) -> f32 {
    if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 }
}

/// Precomputed transfer tables, built once per canvas.
#[derive(Clone)]
pub struct LinearLight {
    to_linear: [f32; 256],
    to_srgb: [u8; ENCODE_STEPS],
}

impl LinearLight {
    pub fn new() -> Self {
        let last = (ENCODE_STEPS - 1) as f32;
        Self {
            to_linear: std::array::from_fn(|v| decode(v as f32 / 255.0)),
            to_srgb: std::array::from_fn(|i| (encode(i as f32 / last) * 255.0).round().clamp(0.0, 255.0) as u8),
        }
    }

    #[inline]
    fn linear(&self, v: u8) -> f32 {
        self.to_linear[v as usize]
    }

    #[inline]
    fn srgb(&self, l: f32) -> u8 {
        let last = (ENCODE_STEPS - 1) as f32;
        self.to_srgb[(l.clamp(0.0, 1.0) * last).round() as usize]
    }

    /// `src` (straight alpha) over the opaque `dst`, mixed in linear light.
    pub fn blend(&self, src: Color, dst: Color) -> Color {
        let a = src.a as f32 / 255.0;
        let mix = |s: u8, d: u8| self.srgb(a * self.linear(s) + (1.0 - a) * self.linear(d));
        Color::rgb(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b))
    }
}

impl Default for LinearLight {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LinearLight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LinearLight")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_round_trip_within_one_step() {
        let light = LinearLight::new();
        for v in [0u8, 1, 64, 128, 200, 255] {
            let back = light.srgb(light.linear(v));
            assert!(back.abs_diff(v) <= 1, "{v} -> {back}");
        }
    }

    #[test]
    fn half_white_over_black_is_brighter_than_midpoint() {
        let light = LinearLight::new();
        let mixed = light.blend(Color::rgba(255, 255, 255, 128), Color::BLACK);
        assert!(mixed.r > 170, "got {mixed:?}");
        assert_eq!(mixed.a, 255);

        let warm = Color::rgb(200, 120, 40);
        let solid = light.blend(warm, Color::rgb(10, 10, 10));
        assert!(solid.r.abs_diff(200) <= 1 && solid.b.abs_diff(40) <= 1);
        let clear = light.blend(warm.with_alpha(0), Color::rgb(10, 20, 30));
        assert!(clear.g.abs_diff(20) <= 1);
    }
}
