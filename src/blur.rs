// Gaussian-style blur for layers, built from three separable box passes.
// Visual expectation: a hard-edged shape turns into a soft halo that fades out
// evenly on every side, with its color intact all the way to the faint edge.

use crate::error::{Error, Result};
use crate::surface::Layer;
use crate::types::Color;
use log::trace;

/// Three box passes are close enough to a true Gaussian for a glow.
const PASSES: usize = 3;

/// Past this std-dev every box is wider than any layer we allocate, so the
/// result no longer changes; clamping keeps the box math in range.
const MAX_SIGMA: f32 = 100_000.0;

/// Reject radii a blur cannot use: negative, NaN or infinite.
pub fn check_radius(radius: f32) -> Result<()> {
    if !radius.is_finite() {
        return Err(Error::BlurRadiusNotFinite(radius));
    }
    if radius < 0.0 {
        return Err(Error::BlurRadiusNegative(radius));
    }
    Ok(())
}

/// Box radii whose repeated application approximates a Gaussian with std-dev `sigma`.
fn box_radii(sigma: f32) -> [usize; PASSES] {
    let sigma = sigma.min(MAX_SIGMA);
    let n = PASSES as f32;
    let var12 = 12.0 * sigma * sigma;
    let w_ideal = (var12 / n + 1.0).sqrt();
    let mut wl = w_ideal.floor() as i64;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wl = wl.max(1);
    let wu = wl + 2;
    let wlf = wl as f32;
    let m_ideal = (var12 - n * wlf * wlf - 4.0 * n * wlf - 3.0 * n) / (-4.0 * wlf - 4.0);
    let m = (m_ideal.round().max(0.0) as usize).min(PASSES);

    let mut radii = [0usize; PASSES];
    for (i, r) in radii.iter_mut().enumerate() {
        let w = if i < m { wl } else { wu };
        *r = ((w - 1) / 2) as usize;
    }
    radii
}

/// How far (in pixels) a blur of `radius` can spread alpha past a shape's edge.
pub fn blur_support(radius: f32) -> u32 {
    if !radius.is_finite() || radius <= 0.0 {
        return 0;
    }
    u32::try_from(box_radii(radius).iter().sum::<usize>()).unwrap_or(u32::MAX)
}

/// One sliding-window box pass over `count` lines of `len` samples.
/// Samples outside the line count as transparent, so nothing leaks in from the edges.
fn box_pass(
    src: &[[f32; 4]],
    dst: &mut [[f32; 4]],
    len: usize,
    count: usize,
    line_stride: usize,
    step: usize,
    r: usize,
) {
    let inv = 1.0 / (2 * r + 1) as f32;
    for line in 0..count {
        let at = |i: usize| line * line_stride + i * step;

        // Prime the window [0..r]
        let mut sum = [0.0f32; 4];
        for i in 0..=r.min(len - 1) {
            let p = src[at(i)];
            for c in 0..4 {
                sum[c] += p[c];
            }
        }

        // Slide: write, then add the sample entering on the right and drop the one leaving
        for i in 0..len {
            let out = &mut dst[at(i)];
            for c in 0..4 {
                out[c] = sum[c] * inv;
            }
            if i + r + 1 < len {
                let p = src[at(i + r + 1)];
                for c in 0..4 {
                    sum[c] += p[c];
                }
            }
            if i >= r {
                let p = src[at(i - r)];
                for c in 0..4 {
                    sum[c] -= p[c];
                }
            }
        }
    }
}

/// Blur `layer` in place with a Gaussian-like kernel of std-dev `radius`.
/// Radius 0 leaves the layer untouched; negative, NaN and infinite radii are rejected.
pub fn gaussian_blur(layer: &mut Layer, radius: f32) -> Result<()> {
    check_radius(radius)?;
    let (w, h) = (layer.width() as usize, layer.height() as usize);
    if radius == 0.0 || w == 0 || h == 0 {
        return Ok(());
    }

    let radii = box_radii(radius);
    trace!("blur radius {radius} -> box radii {radii:?} on {w}x{h}");

    // Premultiply so transparent neighbours don't drag the color toward black.
    let mut buf: Vec<[f32; 4]> = layer
        .pixels()
        .iter()
        .map(|&px| {
            let c = Color::from_argb(px);
            let a = c.a as f32;
            [c.r as f32 * a / 255.0, c.g as f32 * a / 255.0, c.b as f32 * a / 255.0, a]
        })
        .collect();
    let mut tmp = vec![[0.0f32; 4]; buf.len()];

    for r in radii {
        if r == 0 {
            continue;
        }
        box_pass(&buf, &mut tmp, w, h, w, 1, r); // horizontal: buf -> tmp
        box_pass(&tmp, &mut buf, h, w, 1, w, r); // vertical: tmp -> buf
    }

    for (px, p) in layer.pixels_mut().iter_mut().zip(&buf) {
        let a = p[3].round().clamp(0.0, 255.0) as u8;
        if a == 0 {
            *px = 0;
            continue;
        }
        let un = |v: f32| (v * 255.0 / p[3]).round().clamp(0.0, 255.0) as u8;
        *px = Color::rgba(un(p[0]), un(p[1]), un(p[2]), a).to_argb();
    }
    Ok(())
}
