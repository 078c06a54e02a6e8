// Software drawing onto layers: gradients, ornate borders, plain and rounded boxes.
// Visual effects provided here:
// 1) Vertical gradients (stone plaques, parchment sheets).
// 2) Ornate borders: an outline plus L-shaped accents in every corner.
// 3) Rounded panels, buttons and cards; circles for small emblem markers.
//
// Every routine validates its box first: a bad box is a layout bug and is
// reported before a single pixel changes.

use crate::error::Result;
use crate::surface::Layer;
use crate::types::{BoundingBox, Color};

/// Length of each arm of a corner accent, in pixels.
pub const CORNER_SIZE: i32 = 20;

/// Fill the box with a solid color (blended over what is already there).
pub fn fill_rect(layer: &mut Layer, bbox: BoundingBox, color: Color) -> Result<()> {
    let bbox = bbox.validate()?;
    let Some(area) = bbox.clip(layer.width(), layer.height()) else {
        return Ok(());
    };
    for y in area.y1..area.y2 {
        for x in area.x1..area.x2 {
            layer.blend_pixel(x, y, color);
        }
    }
    Ok(())
}

/// Outline of `width` pixels drawn along the inside of the box edges.
/// Visual: a picture-frame; when the stroke is thicker than the box, the box is simply filled.
pub fn stroke_rect(layer: &mut Layer, bbox: BoundingBox, color: Color, width: u32) -> Result<()> {
    let bbox = bbox.validate()?;
    let w = i32::try_from(width).unwrap_or(i32::MAX);
    if w == 0 || bbox.is_empty() {
        return Ok(());
    }
    if w.saturating_mul(2) >= bbox.width() || w.saturating_mul(2) >= bbox.height() {
        return fill_rect(layer, bbox, color);
    }
    let BoundingBox { x1, y1, x2, y2 } = bbox;
    fill_rect(layer, BoundingBox::new(x1, y1, x2, y1 + w), color)?; // top
    fill_rect(layer, BoundingBox::new(x1, y2 - w, x2, y2), color)?; // bottom
    fill_rect(layer, BoundingBox::new(x1, y1 + w, x1 + w, y2 - w), color)?; // left
    fill_rect(layer, BoundingBox::new(x2 - w, y1 + w, x2, y2 - w), color) // right
}

/// Paint each row with a color interpolated from `top` (first row) to `bottom` (last row).
/// Visual: a smooth vertical fade, one pixel line at a time.
pub fn gradient_vertical(layer: &mut Layer, bbox: BoundingBox, top: Color, bottom: Color) -> Result<()> {
    let bbox = bbox.validate()?;
    if bbox.is_empty() {
        return Ok(());
    }
    // Last covered row gets exactly `bottom`; a single-row box uses ratio 0.
    let span = (bbox.y2 - 1 - bbox.y1) as f64;
    let lerp = |t: u8, b: u8, ratio: f64| {
        let v = t as f64 + (b as f64 - t as f64) * ratio;
        v.clamp(0.0, 255.0) as u8 // truncates
    };

    let x1 = bbox.x1.max(0);
    let x2 = bbox.x2.min(layer.width() as i32);
    for y in bbox.y1.max(0)..bbox.y2.min(layer.height() as i32) {
        let ratio = if span > 0.0 { (y - bbox.y1) as f64 / span } else { 0.0 };
        let color = Color::rgba(
            lerp(top.r, bottom.r, ratio),
            lerp(top.g, bottom.g, ratio),
            lerp(top.b, bottom.b, ratio),
            lerp(top.a, bottom.a, ratio),
        );
        for x in x1..x2 {
            layer.blend_pixel(x, y, color);
        }
    }
    Ok(())
}

/// One L-shaped accent: two arms of CORNER_SIZE from (cx, cy), growing
/// `thickness` pixels toward the inside of the box (dx, dy point inward).
fn corner_accent(layer: &mut Layer, cx: i32, cy: i32, dx: i32, dy: i32, thickness: i32, color: Color) {
    for t in 0..thickness {
        for s in 0..=CORNER_SIZE {
            layer.blend_pixel(cx + dx * s, cy + dy * t, color); // along the horizontal edge
            layer.blend_pixel(cx + dx * t, cy + dy * s, color); // along the vertical edge
        }
    }
}

/// Rectangle outline plus corner accents one pixel thicker than the outline.
/// Visual: a gilded frame whose corners are reinforced with short L strokes.
pub fn ornate_border(layer: &mut Layer, bbox: BoundingBox, color: Color, width: u32) -> Result<()> {
    let bbox = bbox.validate()?;
    stroke_rect(layer, bbox, color, width)?;
    if bbox.is_empty() {
        return Ok(());
    }

    let BoundingBox { x1, y1, .. } = bbox;
    let (x2, y2) = (bbox.x2 - 1, bbox.y2 - 1); // last pixel column / row inside the box
    // Accents never reach past the far side of the box.
    let thickness = i32::try_from(width)
        .unwrap_or(i32::MAX)
        .saturating_add(1)
        .min(bbox.width().max(bbox.height()));

    for (cx, cy) in [(x1, y1), (x2, y1), (x1, y2), (x2, y2)] {
        if cx == x1 && cy == y1 {
            corner_accent(layer, cx, cy, 1, 1, thickness, color); // top-left
        } else if cx == x2 && cy == y1 {
            corner_accent(layer, cx, cy, -1, 1, thickness, color); // top-right
        } else if cx == x1 && cy == y2 {
            corner_accent(layer, cx, cy, 1, -1, thickness, color); // bottom-left
        } else if cx == x2 && cy == y2 {
            corner_accent(layer, cx, cy, -1, -1, thickness, color); // bottom-right
        }
    }
    Ok(())
}

/// Is the center of pixel (x, y) inside `bbox` with corners rounded by `radius`?
#[inline]
fn inside_rounded(bbox: &BoundingBox, radius: f32, x: i32, y: i32) -> bool {
    if !bbox.contains(x, y) {
        return false;
    }
    if radius <= 0.0 {
        return true;
    }
    let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
    // Distance past the straight part of each edge (0 outside the corner zones).
    let dx = (bbox.x1 as f32 + radius - px).max(px - (bbox.x2 as f32 - radius)).max(0.0);
    let dy = (bbox.y1 as f32 + radius - py).max(py - (bbox.y2 as f32 - radius)).max(0.0);
    dx * dx + dy * dy <= radius * radius
}

/// Rounded box with an optional fill and an optional (color, width) outline.
/// Visual: soft-cornered panels and buttons; fills may be translucent.
pub fn rounded_rect(
    layer: &mut Layer,
    bbox: BoundingBox,
    radius: u32,
    fill: Option<Color>,
    outline: Option<(Color, u32)>,
) -> Result<()> {
    let bbox = bbox.validate()?;
    let Some(area) = bbox.clip(layer.width(), layer.height()) else {
        return Ok(());
    };
    let max_r = bbox.width().min(bbox.height()) as f32 / 2.0;
    let r = (radius as f32).min(max_r);

    let (stroke, inner, inner_r) = match outline {
        Some((color, w)) if w > 0 => (Some(color), bbox.inset(i32::try_from(w).unwrap_or(i32::MAX)), (r - w as f32).max(0.0)),
        _ => (None, bbox, r),
    };

    for y in area.y1..area.y2 {
        for x in area.x1..area.x2 {
            if !inside_rounded(&bbox, r, x, y) {
                continue;
            }
            let in_inner = !inner.is_empty() && inside_rounded(&inner, inner_r, x, y);
            match (stroke, in_inner) {
                (Some(color), false) => layer.blend_pixel(x, y, color),
                _ => {
                    if let Some(color) = fill {
                        layer.blend_pixel(x, y, color);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Circle inscribed in a square box (a rounded box with radius = half its side).
pub fn circle(layer: &mut Layer, bbox: BoundingBox, fill: Option<Color>, outline: Option<(Color, u32)>) -> Result<()> {
    let bbox = bbox.validate()?;
    let radius = (bbox.width().min(bbox.height()).max(0) as u32).div_ceil(2);
    rounded_rect(layer, bbox, radius, fill, outline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use proptest::prelude::*;

    const GOLD: Color = Color::rgb(245, 158, 11);

    #[test]
    fn inverted_box_is_rejected_before_painting() {
        let mut layer = Layer::new(32, 32);
        let bad = BoundingBox::new(20, 0, 10, 10);
        let err = gradient_vertical(&mut layer, bad, Color::BLACK, GOLD).unwrap_err();
        assert!(matches!(err, Error::InvalidBoundingBox { x1: 20, x2: 10, .. }));
        assert!(layer.pixels().iter().all(|&p| p == 0));

        assert!(fill_rect(&mut layer, bad, GOLD).is_err());
        assert!(ornate_border(&mut layer, bad, GOLD, 3).is_err());
        assert!(rounded_rect(&mut layer, bad, 4, Some(GOLD), None).is_err());
        assert!(layer.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn single_row_gradient_uses_top_and_empty_box_paints_nothing() {
        let mut layer = Layer::new(8, 8);
        gradient_vertical(&mut layer, BoundingBox::new(0, 3, 8, 4), Color::rgb(10, 20, 30), GOLD).unwrap();
        assert_eq!(layer.pixel(4, 3), Some(Color::rgb(10, 20, 30)));

        let mut empty = Layer::new(8, 8);
        gradient_vertical(&mut empty, BoundingBox::new(0, 5, 8, 5), Color::BLACK, GOLD).unwrap();
        assert!(empty.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn gradient_clips_to_the_layer() {
        let mut layer = Layer::new(10, 10);
        gradient_vertical(&mut layer, BoundingBox::new(-5, -5, 20, 20), Color::BLACK, GOLD).unwrap();
        assert!(layer.pixels().iter().all(|&p| p >> 24 == 255));
    }

    #[test]
    fn border_top_left_accent_matches_corner() {
        let mut layer = Layer::new(200, 100);
        ornate_border(&mut layer, BoundingBox::new(10, 10, 110, 60), GOLD, 3).unwrap();

        // Both arms start at the corner and run 20 pixels inward.
        for p in [(10, 10), (30, 10), (10, 30)] {
            assert_eq!(layer.pixel(p.0, p.1), Some(GOLD), "{p:?}");
        }
        // The accent is one pixel thicker than the 3px outline (rows/cols 10..=13) ...
        assert_eq!(layer.pixel(30, 13), Some(GOLD));
        assert_eq!(layer.pixel(13, 30), Some(GOLD));
        // ... and stops after 20 pixels.
        assert_eq!(layer.pixel(31, 13), Some(Color::TRANSPARENT));
        assert_eq!(layer.pixel(13, 31), Some(Color::TRANSPARENT));
        // Outline itself is 3 wide; interior stays empty.
        assert_eq!(layer.pixel(60, 12), Some(GOLD));
        assert_eq!(layer.pixel(60, 13), Some(Color::TRANSPARENT));
        assert_eq!(layer.pixel(60, 35), Some(Color::TRANSPARENT));
        // Nothing leaks outside the box.
        assert_eq!(layer.pixel(9, 9), Some(Color::TRANSPARENT));
        assert_eq!(layer.pixel(110, 59), Some(Color::TRANSPARENT));
    }

    #[test]
    fn border_accents_on_every_corner() {
        let mut layer = Layer::new(200, 100);
        ornate_border(&mut layer, BoundingBox::new(10, 10, 110, 60), GOLD, 3).unwrap();
        // bottom-right corner pixel is (109, 59); accent reaches 20 px up and left, 4 px thick
        assert_eq!(layer.pixel(89, 56), Some(GOLD));
        assert_eq!(layer.pixel(88, 56), Some(Color::TRANSPARENT));
        assert_eq!(layer.pixel(106, 39), Some(GOLD));
        assert_eq!(layer.pixel(106, 38), Some(Color::TRANSPARENT));
        // top-right and bottom-left
        assert_eq!(layer.pixel(106, 30), Some(GOLD));
        assert_eq!(layer.pixel(30, 56), Some(GOLD));
    }

    #[test]
    fn oversized_stroke_fills_the_box() {
        let mut layer = Layer::new(80, 80);
        let bbox = BoundingBox::new(30, 30, 50, 45);
        ornate_border(&mut layer, bbox, GOLD, u32::MAX).unwrap();
        stroke_rect(&mut layer, bbox, GOLD, u32::MAX).unwrap();
        assert_eq!(layer.pixel(40, 38), Some(GOLD));
        assert_eq!(layer.pixel(30, 44), Some(GOLD));
        // Accent arms end CORNER_SIZE past the far corner at most.
        assert_eq!(layer.pixel(5, 5), Some(Color::TRANSPARENT));
        assert_eq!(layer.pixel(75, 75), Some(Color::TRANSPARENT));

        let mut ring = Layer::new(80, 80);
        rounded_rect(&mut ring, bbox, 4, None, Some((GOLD, u32::MAX))).unwrap();
        assert_eq!(ring.pixel(40, 38), Some(GOLD));
        assert_eq!(ring.pixel(30, 30), Some(Color::TRANSPARENT)); // rounded corner
    }

    #[test]
    fn rounded_rect_leaves_corners_open() {
        let mut layer = Layer::new(60, 60);
        let stone = Color::rgba(45, 45, 53, 200);
        let blue = Color::rgb(59, 130, 246);
        rounded_rect(&mut layer, BoundingBox::new(10, 10, 50, 50), 12, Some(stone), Some((blue, 2))).unwrap();

        assert_eq!(layer.pixel(10, 10), Some(Color::TRANSPARENT)); // cut corner
        assert_eq!(layer.pixel(30, 10), Some(blue)); // top edge stroke
        assert_eq!(layer.pixel(30, 11), Some(blue));
        assert_eq!(layer.pixel(30, 30), Some(stone)); // translucent body
        assert_eq!(layer.pixel(9, 30), Some(Color::TRANSPARENT));
    }

    #[test]
    fn circle_is_round() {
        let mut layer = Layer::new(40, 40);
        circle(&mut layer, BoundingBox::from_origin(0, 0, 40, 40), Some(GOLD), None).unwrap();
        assert_eq!(layer.pixel(20, 20), Some(GOLD));
        assert_eq!(layer.pixel(20, 0), Some(GOLD));
        assert_eq!(layer.pixel(1, 1), Some(Color::TRANSPARENT));
        assert_eq!(layer.pixel(38, 38), Some(Color::TRANSPARENT));
    }

    proptest! {
        #[test]
        fn prop_gradient_hits_both_endpoints(
            x1 in 0i32..20, y1 in 0i32..20, w in 1i32..30, h in 2i32..40,
            top in any::<[u8; 3]>(), bottom in any::<[u8; 3]>()
        ) {
            let mut layer = Layer::new(64, 64);
            let bbox = BoundingBox::from_origin(x1, y1, w, h);
            let top = Color::rgb(top[0], top[1], top[2]);
            let bottom = Color::rgb(bottom[0], bottom[1], bottom[2]);
            gradient_vertical(&mut layer, bbox, top, bottom).unwrap();

            let first = layer.pixel(x1, y1).unwrap();
            let last = layer.pixel(x1 + w - 1, y1 + h - 1).unwrap();
            for (got, want) in [(first.r, top.r), (first.g, top.g), (first.b, top.b)] {
                prop_assert!(got.abs_diff(want) <= 1);
            }
            for (got, want) in [(last.r, bottom.r), (last.g, bottom.g), (last.b, bottom.b)] {
                prop_assert!(got.abs_diff(want) <= 1);
            }
        }

        #[test]
        fn prop_gradient_is_monotone(lo in 0u8..=255, hi in 0u8..=255, h in 1i32..60) {
            let (lo, hi) = (lo.min(hi), lo.max(hi));
            let mut layer = Layer::new(4, 64);
            gradient_vertical(&mut layer, BoundingBox::new(0, 0, 4, h), Color::rgb(7, lo, 9), Color::rgb(7, hi, 9)).unwrap();
            let mut prev = 0u8;
            for y in 0..h {
                let px = layer.pixel(2, y).unwrap();
                prop_assert!(px.g >= prev);
                prop_assert_eq!((px.r, px.b), (7, 9));
                prev = px.g;
            }
        }
    }
}
