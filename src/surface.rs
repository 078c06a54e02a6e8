// Pixel buffers: the opaque Canvas that accumulates the render, and the
// transparent Layers each effect is built on before it gets merged.
// Visual expectation: nothing shows up on the canvas until a layer is composited onto it.

use crate::error::{Error, Result};
use crate::gamma::LinearLight;
#[cfg(test)]
use crate::types::BoundingBox;
use crate::types::Color;
use image::{ImageFormat, Rgb, RgbImage};
use log::debug;
use std::path::Path;

/// Final image. Each entry is 0x00RRGGBB (same packing a minifb window takes).
/// Only mutated through `Composite`.
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    linear: Option<LinearLight>, // Some = composite in linear light
}

impl Canvas {
    /// Solid canvas filled with `background` (alpha ignored).
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![background.to_rgb_u32(); width as usize * height as usize],
            linear: None,
        }
    }

    /// Merge layers in linear light from now on.
    pub fn with_linear_blending(mut self) -> Self {
        self.linear = Some(LinearLight::new());
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Color::from_rgb_u32(self.pixels[y as usize * self.width as usize + x as usize]))
    }

    /// Copy out as an 8-bit RGB image (no alpha is persisted).
    pub fn to_rgb_image(&self) -> RgbImage {
        let w = self.width as usize;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let c = Color::from_rgb_u32(self.pixels[y as usize * w + x as usize]);
            Rgb([c.r, c.g, c.b])
        })
    }

    /// Encode as PNG at `path`.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.to_rgb_image().save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

/// Scratch RGBA buffer, 0xAARRGGBB per pixel, straight (not premultiplied) alpha.
/// Starts fully transparent; lives for one region and is dropped after its merge.
#[derive(Clone)]
pub struct Layer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Layer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![0; width as usize * height as usize] }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| Color::from_argb(self.pixels[i]))
    }

    /// Overwrite the pixel at (x,y) if it is inside the layer.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.to_argb();
        }
    }

    /// Paint `color` over whatever is at (x,y) (source-over). Clipped at the edges.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = over(color, Color::from_argb(self.pixels[i])).to_argb();
        }
    }

    /// Smallest box holding every pixel with alpha > 0, or None for an empty layer.
    #[cfg(test)]
    pub(crate) fn opaque_bounds(&self) -> Option<BoundingBox> {
        let w = self.width as usize;
        let (mut x1, mut y1, mut x2, mut y2) = (usize::MAX, usize::MAX, 0usize, 0usize);
        for (i, &px) in self.pixels.iter().enumerate() {
            if px >> 24 == 0 {
                continue;
            }
            let (x, y) = (i % w, i / w);
            x1 = x1.min(x);
            y1 = y1.min(y);
            x2 = x2.max(x + 1);
            y2 = y2.max(y + 1);
        }
        if x1 == usize::MAX {
            return None;
        }
        Some(BoundingBox::new(x1 as i32, y1 as i32, x2 as i32, y2 as i32))
    }
}

/// Porter-Duff source-over on straight alpha.
#[inline]
pub(crate) fn over(src: Color, dst: Color) -> Color {
    if src.a == 255 || dst.a == 0 {
        return src;
    }
    if src.a == 0 {
        return dst;
    }
    let sa = src.a as f32 / 255.0;
    let da = dst.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let ch = |s: u8, d: u8| ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8;
    Color::rgba(ch(src.r, dst.r), ch(src.g, dst.g), ch(src.b, dst.b), (out_a * 255.0).round() as u8)
}

/// `src * a + dst * (1 - a)` in 8-bit integer math, rounded.
#[inline]
fn mix_u8(src: u8, dst: u8, a: u8) -> u8 {
    let a = a as u32;
    ((src as u32 * a + dst as u32 * (255 - a) + 127) / 255) as u8
}

/// Anything a Layer can be merged onto (the Canvas, or another Layer).
pub trait Composite {
    fn dimensions(&self) -> (u32, u32);

    /// Alpha-composite `layer` with its top-left corner at (x, y).
    /// The layer must fit entirely inside the target.
    fn composite_at(&mut self, layer: &Layer, x: u32, y: u32) -> Result<()>;

    /// Alpha-composite an equally sized layer at the origin.
    fn composite(&mut self, layer: &Layer) -> Result<()> {
        let expected = self.dimensions();
        let found = (layer.width(), layer.height());
        if expected != found {
            return Err(Error::DimensionMismatch { expected, found });
        }
        self.composite_at(layer, 0, 0)
    }
}

fn check_fits(target: (u32, u32), layer: &Layer, x: u32, y: u32) -> Result<()> {
    let fits_x = x.checked_add(layer.width()).is_some_and(|r| r <= target.0);
    let fits_y = y.checked_add(layer.height()).is_some_and(|b| b <= target.1);
    if !(fits_x && fits_y) {
        return Err(Error::LayerOutOfBounds { x, y, width: layer.width(), height: layer.height() });
    }
    Ok(())
}

impl Composite for Canvas {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn composite_at(&mut self, layer: &Layer, x: u32, y: u32) -> Result<()> {
        check_fits(self.dimensions(), layer, x, y)?;
        debug!("canvas <- layer {}x{} at ({x}, {y})", layer.width(), layer.height());

        let lw = layer.width() as usize;
        for (ly, row) in layer.pixels().chunks_exact(lw.max(1)).enumerate() {
            let base = (y as usize + ly) * self.width as usize + x as usize;
            for (lx, &px) in row.iter().enumerate() {
                let src = Color::from_argb(px);
                if src.a == 0 {
                    continue; // keep what is underneath
                }
                let idx = base + lx;
                if src.a == 255 {
                    self.pixels[idx] = src.to_rgb_u32();
                    continue;
                }
                let dst = Color::from_rgb_u32(self.pixels[idx]);
                let out = match &self.linear {
                    Some(light) => light.blend(src, dst),
                    None => Color::rgb(mix_u8(src.r, dst.r, src.a), mix_u8(src.g, dst.g, src.a), mix_u8(src.b, dst.b, src.a)),
                };
                self.pixels[idx] = out.to_rgb_u32();
            }
        }
        Ok(())
    }
}

impl Composite for Layer {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn composite_at(&mut self, layer: &Layer, x: u32, y: u32) -> Result<()> {
        check_fits(self.dimensions(), layer, x, y)?;

        let lw = layer.width() as usize;
        for (ly, row) in layer.pixels().chunks_exact(lw.max(1)).enumerate() {
            let base = (y as usize + ly) * self.width as usize + x as usize;
            for (lx, &px) in row.iter().enumerate() {
                if px >> 24 == 0 {
                    continue;
                }
                let idx = base + lx;
                self.pixels[idx] = over(Color::from_argb(px), Color::from_argb(self.pixels[idx])).to_argb();
            }
        }
        Ok(())
    }
}
