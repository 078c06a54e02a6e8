// FX: glows, paper grain and the edge vignette.
// Visual outcomes:
// - A soft colored halo bleeds out around buttons, cards and magic panels.
// - Parchment gets a faint speckled grain; empty background stays untouched.
// - The canvas border darkens gradually, pulling the eye toward the center.

use crate::blur::{blur_support, check_radius, gaussian_blur};
use crate::draw::{fill_rect, stroke_rect};
use crate::error::{Error, Result};
use crate::surface::{Canvas, Composite, Layer};
use crate::types::{BoundingBox, Color};
use log::trace;
use rand::Rng;

/// One noise sample per this many pixels (about 5% coverage, repeats allowed).
pub const NOISE_SPARSITY: u64 = 20;

// ----------------------------- glow ----------------------------------------------------

/// Blurred halo of `color` around `bbox`, merged onto `target`.
/// `radius` is the blur std-dev (bigger = wider, softer); `intensity` in [0,1] sets the
/// opacity of the solid shape before blurring.
/// Visual: the box itself is tinted and a falloff spreads evenly past all four edges.
pub fn add_glow<T: Composite + ?Sized>(
    target: &mut T,
    bbox: BoundingBox,
    color: Color,
    radius: f32,
    intensity: f32,
) -> Result<()> {
    let bbox = bbox.validate()?;
    check_radius(radius)?;
    if !(0.0..=1.0).contains(&intensity) {
        return Err(Error::IntensityOutOfRange(intensity));
    }

    // Scratch only needs the box plus however far the blur can reach, clipped to the target.
    let (tw, th) = target.dimensions();
    let margin = i32::try_from(blur_support(radius)).unwrap_or(i32::MAX);
    let Some(region) = bbox.expand(margin).clip(tw, th) else {
        return Ok(()); // entirely off-target
    };
    let mut scratch = Layer::new(region.width() as u32, region.height() as u32);

    // Only the part of the box inside the scratch region is ever painted.
    let solid = BoundingBox::new(
        bbox.x1.max(region.x1),
        bbox.y1.max(region.y1),
        bbox.x2.min(region.x2),
        bbox.y2.min(region.y2),
    );
    if solid.is_empty() {
        return Ok(());
    }
    let alpha = (255.0 * intensity).round() as u8;
    fill_rect(&mut scratch, solid.translate(-region.x1, -region.y1), color.with_alpha(alpha))?;
    gaussian_blur(&mut scratch, radius)?;

    trace!("glow {color} r={radius} i={intensity} scratch {region:?}");
    target.composite_at(&scratch, region.x1 as u32, region.y1 as u32)
}

// ----------------------------- paper grain ---------------------------------------------

/// Jitter the RGB of a sparse random sample of painted pixels by up to ±`intensity`.
/// Coordinates are drawn independently (with replacement), `width*height/20` of them;
/// pixels with alpha 0 are skipped and alpha itself never changes.
/// Visual: subtle grain on parchment, no specks in the empty areas around it.
pub fn add_texture_noise<R: Rng + ?Sized>(layer: &mut Layer, intensity: u8, rng: &mut R) {
    let (w, h) = (layer.width(), layer.height());
    if w == 0 || h == 0 {
        return;
    }
    let samples = w as u64 * h as u64 / NOISE_SPARSITY;
    let k = intensity as i32;
    let mut touched = 0u64;

    for _ in 0..samples {
        let x = rng.gen_range(0..w) as i32;
        let y = rng.gen_range(0..h) as i32;
        let Some(px) = layer.pixel(x, y) else { continue };
        if px.a == 0 {
            continue; // background stays clean
        }
        let r = (px.r as i32 + rng.gen_range(-k..=k)).clamp(0, 255) as u8;
        let g = (px.g as i32 + rng.gen_range(-k..=k)).clamp(0, 255) as u8;
        let b = (px.b as i32 + rng.gen_range(-k..=k)).clamp(0, 255) as u8;
        layer.set_pixel(x, y, Color::rgba(r, g, b, px.a));
        touched += 1;
    }
    trace!("noise ±{intensity}: {samples} samples, {touched} on painted pixels");
}

// ----------------------------- vignette ------------------------------------------------

/// Darken the canvas edges with `steps` concentric 1px black rings.
/// Rings are laid down from the innermost (alpha 0) outward; ring i gets alpha
/// round(i / steps * max_alpha), so the outermost ring is the darkest.
/// Must be the last thing merged onto the canvas.
pub fn apply_vignette(canvas: &mut Canvas, steps: u32, max_alpha: u8) -> Result<()> {
    let (w, h) = canvas.dimensions();
    let mut overlay = Layer::new(w, h);
    let full = BoundingBox::new(0, 0, w as i32, h as i32);

    for i in 0..steps {
        let ring = full.inset((steps - 1 - i) as i32);
        if ring.is_empty() {
            continue; // inset past the middle of a small canvas
        }
        let alpha = ((i as f32 / steps as f32) * max_alpha as f32).round() as u8;
        stroke_rect(&mut overlay, ring, Color::BLACK.with_alpha(alpha), 1)?;
    }
    canvas.composite(&overlay)
}
