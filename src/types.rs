// Core value types shared by every drawing step.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 8-bit RGB color with an optional alpha (255 = opaque).
/// Written in theme files as "#rrggbb" or "#rrggbbaa".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color, different opacity.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse "#rrggbb" / "#rrggbbaa" (leading '#' optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(Error::InvalidColor(hex.to_string()));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| Error::InvalidColor(hex.to_string()))
        };
        let a = if digits.len() == 8 { byte(6)? } else { 255 };
        Ok(Self { r: byte(0)?, g: byte(2)?, b: byte(4)?, a })
    }

    /// Pack as 0xAARRGGBB (layer storage).
    #[inline]
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    #[inline]
    pub const fn from_argb(px: u32) -> Self {
        Self {
            a: (px >> 24) as u8,
            r: ((px >> 16) & 0xFF) as u8,
            g: ((px >> 8) & 0xFF) as u8,
            b: (px & 0xFF) as u8,
        }
    }

    /// Pack as 0x00RRGGBB (canvas storage, alpha dropped).
    #[inline]
    pub const fn to_rgb_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    #[inline]
    pub const fn from_rgb_u32(px: u32) -> Self {
        Self::rgb(((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Rectangular region an operation applies to.
/// Covers the half-open pixel range [x1, x2) x [y1, y2); outlines are stroked inside it.
/// Construction is unchecked so that bad layout math reaches `validate` and is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box starting at (x, y) with the given size.
    pub const fn from_origin(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    /// Reject x2 < x1 or y2 < y1.
    pub fn validate(self) -> Result<Self> {
        if self.x2 < self.x1 || self.y2 < self.y1 {
            return Err(Error::InvalidBoundingBox { x1: self.x1, y1: self.y1, x2: self.x2, y2: self.y2 });
        }
        Ok(self)
    }

    pub const fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub const fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    pub const fn is_empty(&self) -> bool {
        self.x2 <= self.x1 || self.y2 <= self.y1
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) as f32 / 2.0, (self.y1 + self.y2) as f32 / 2.0)
    }

    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x < self.x2 && y >= self.y1 && y < self.y2
    }

    /// Shrink by `d` on every side (negative grows). May produce an invalid box.
    /// Coordinates saturate at the i32 range.
    pub const fn inset(&self, d: i32) -> Self {
        Self::new(
            self.x1.saturating_add(d),
            self.y1.saturating_add(d),
            self.x2.saturating_sub(d),
            self.y2.saturating_sub(d),
        )
    }

    pub const fn expand(&self, d: i32) -> Self {
        Self::new(
            self.x1.saturating_sub(d),
            self.y1.saturating_sub(d),
            self.x2.saturating_add(d),
            self.y2.saturating_add(d),
        )
    }

    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x1.saturating_add(dx),
            self.y1.saturating_add(dy),
            self.x2.saturating_add(dx),
            self.y2.saturating_add(dy),
        )
    }

    /// Clip to a width x height surface; None when nothing is left.
    pub fn clip(&self, width: u32, height: u32) -> Option<Self> {
        let clipped = Self::new(
            self.x1.max(0),
            self.y1.max(0),
            self.x2.min(i32::try_from(width).unwrap_or(i32::MAX)),
            self.y2.min(i32::try_from(height).unwrap_or(i32::MAX)),
        );
        if clipped.is_empty() { None } else { Some(clipped) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_with_and_without_alpha() {
        assert_eq!(Color::from_hex("#3b82f6").unwrap(), Color::rgb(0x3b, 0x82, 0xf6));
        assert_eq!(Color::from_hex("2d2d35c8").unwrap(), Color::rgba(0x2d, 0x2d, 0x35, 200));
        assert!(matches!(Color::from_hex("#12345"), Err(Error::InvalidColor(_))));
        assert!(matches!(Color::from_hex("#zzzzzz"), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn display_round_trips_through_hex() {
        let c = Color::rgba(1, 2, 3, 4);
        assert_eq!(c.to_string(), "#01020304");
        assert_eq!(Color::from_hex(&c.to_string()).unwrap(), c);
        assert_eq!(Color::rgb(255, 0, 16).to_string(), "#ff0010");
    }

    #[test]
    fn argb_packing() {
        let c = Color::rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.to_argb(), 0x4411_2233);
        assert_eq!(Color::from_argb(0x4411_2233), c);
        assert_eq!(c.to_rgb_u32(), 0x0011_2233);
    }

    #[test]
    fn validate_rejects_inverted_boxes() {
        assert!(BoundingBox::new(0, 0, 10, 10).validate().is_ok());
        assert!(BoundingBox::new(5, 5, 5, 5).validate().is_ok());
        assert!(matches!(
            BoundingBox::new(10, 0, 5, 10).validate(),
            Err(Error::InvalidBoundingBox { x1: 10, x2: 5, .. })
        ));
        assert!(BoundingBox::new(0, 10, 10, 9).validate().is_err());
    }

    #[test]
    fn clip_keeps_only_the_visible_part() {
        let b = BoundingBox::new(-20, 5, 50, 200);
        assert_eq!(b.clip(40, 100), Some(BoundingBox::new(0, 5, 40, 100)));
        assert_eq!(BoundingBox::new(50, 0, 60, 10).clip(40, 100), None);
    }

    #[test]
    fn huge_offsets_saturate_instead_of_wrapping() {
        let b = BoundingBox::new(10, 10, 20, 20).expand(i32::MAX);
        assert_eq!(b, BoundingBox::new(10 - i32::MAX, 10 - i32::MAX, i32::MAX, i32::MAX));
        assert_eq!(b.clip(40, 30), Some(BoundingBox::new(0, 0, 40, 30)));
        assert_eq!(BoundingBox::from_origin(5, 5, i32::MAX, 1).x2, i32::MAX);
    }
}
