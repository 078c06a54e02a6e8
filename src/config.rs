// Theme: canvas size, palette, layout numbers and effect strengths.
// Everything the pipeline paints is read from one immutable `Theme` value;
// the defaults reproduce the dungeon/guild mockup at 1920x1080.
//
// A TOML file may override any subset, e.g.
//
//   blend = "linear"
//   [palette]
//   gold = "#ffd166"
//   [[qualities]]
//   name = "MYTHIC"
//   color = "#ef4444"
//   glow_intensity = 0.7

use crate::error::Result;
use crate::types::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How layers are mixed into the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendSpace {
    /// Mix raw sRGB values (classic image-editor look)
    #[default]
    Srgb,
    /// Mix in linear light
    Linear,
}

/// Named colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Color,
    pub background_deep: Color,
    pub accent: Color,
    pub accent_glow: Color,
    pub gold: Color,
    pub parchment_light: Color,
    pub parchment_mid: Color,
    pub parchment_warm: Color,
    pub stone: Color,
    pub stone_light: Color,
    pub bronze: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::rgb(0x0a, 0x0a, 0x0f),
            background_deep: Color::rgb(15, 15, 20),
            accent: Color::rgb(0x3b, 0x82, 0xf6),
            accent_glow: Color::rgb(0x60, 0xa5, 0xfa),
            gold: Color::rgb(0xf5, 0x9e, 0x0b),
            parchment_light: Color::rgb(0xf8, 0xf4, 0xed),
            parchment_mid: Color::rgb(0xe8, 0xdc, 0xc8),
            parchment_warm: Color::rgb(245, 240, 230),
            stone: Color::rgb(0x2d, 0x2d, 0x35),
            stone_light: Color::rgb(35, 35, 45),
            bronze: Color::rgb(0xcd, 0x7f, 0x32),
        }
    }
}

/// Layout numbers, in pixels. Region boxes are derived from these by the compositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Left/right/bottom distance between panels and the canvas edge
    pub margin: i32,
    /// Horizontal gap between panels, and between the nav bar and the panels
    pub gutter: i32,
    pub top_nav_y: i32,
    pub top_nav_height: i32,
    pub emblem_x: i32,
    pub emblem_size: i32,
    /// Distance of the avatar marker from the right canvas edge
    pub status_offset: i32,
    pub avatar_size: i32,
    pub left_panel_width: i32,
    pub right_panel_width: i32,
    pub right_panel_radius: u32,
    pub tab_top: i32,
    /// Tab inset from the left / right panel edge
    pub tab_inset_left: i32,
    pub tab_inset_right: i32,
    pub tab_height: i32,
    pub tab_spacing: i32,
    pub button_width: i32,
    pub button_height: i32,
    pub button_top: i32,
    pub button_radius: u32,
    pub card_width: i32,
    pub card_height: i32,
    pub card_spacing: i32,
    pub card_top: i32,
    pub card_radius: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            margin: 40,
            gutter: 30,
            top_nav_y: 20,
            top_nav_height: 100,
            emblem_x: 80,
            emblem_size: 60,
            status_offset: 400,
            avatar_size: 60,
            left_panel_width: 320,
            right_panel_width: 340,
            right_panel_radius: 24,
            tab_top: 40,
            tab_inset_left: 20,
            tab_inset_right: 30,
            tab_height: 60,
            tab_spacing: 10,
            button_width: 200,
            button_height: 50,
            button_top: 60,
            button_radius: 8,
            card_width: 180,
            card_height: 240,
            card_spacing: 40,
            card_top: 200,
            card_radius: 12,
        }
    }
}

/// Blur radius (std-dev) and pre-blur opacity of one glow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlowParams {
    pub radius: f32,
    pub intensity: f32,
}

/// Effect strengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Effects {
    pub border_width: u32,
    pub top_nav_glow: GlowParams,
    pub right_panel_glow: GlowParams,
    pub button_glow: GlowParams,
    /// Extra space around the button covered by its glow
    pub button_glow_pad: i32,
    /// Blur radius for card glows (intensity comes from the quality tier)
    pub card_glow_radius: f32,
    pub card_glow_pad: i32,
    pub left_panel_noise: u8,
    pub center_panel_noise: u8,
    pub right_panel_fill_alpha: u8,
    pub card_fill_alpha: u8,
    pub vignette_steps: u32,
    pub vignette_max_alpha: u8,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            border_width: 3,
            top_nav_glow: GlowParams { radius: 15.0, intensity: 0.3 },
            right_panel_glow: GlowParams { radius: 30.0, intensity: 0.4 },
            button_glow: GlowParams { radius: 20.0, intensity: 0.5 },
            button_glow_pad: 10,
            card_glow_radius: 25.0,
            card_glow_pad: 15,
            left_panel_noise: 10,
            center_panel_noise: 12,
            right_panel_fill_alpha: 200,
            card_fill_alpha: 240,
            vignette_steps: 200,
            vignette_max_alpha: 60,
        }
    }
}

/// One item rarity shown as a sample card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityTier {
    pub name: String,
    pub color: Color,
    pub glow_intensity: f32,
}

/// Complete, immutable render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub width: u32,
    pub height: u32,
    pub blend: BlendSpace,
    pub palette: Palette,
    pub layout: Layout,
    pub effects: Effects,
    /// Navigation tab labels, top to bottom
    pub tabs: Vec<String>,
    /// Sample cards, left to right
    pub qualities: Vec<QualityTier>,
}

impl Default for Theme {
    fn default() -> Self {
        let palette = Palette::default();
        let qualities = vec![
            QualityTier { name: "RARE".into(), color: palette.accent, glow_intensity: 0.4 },
            QualityTier { name: "EPIC".into(), color: Color::rgb(0xa8, 0x55, 0xf7), glow_intensity: 0.5 },
            QualityTier { name: "LEGENDARY".into(), color: palette.gold, glow_intensity: 0.6 },
        ];
        Self {
            width: 1920,
            height: 1080,
            blend: BlendSpace::default(),
            palette,
            layout: Layout::default(),
            effects: Effects::default(),
            tabs: ["Quest", "Map", "Party", "Items", "Skills"].map(String::from).to_vec(),
            qualities,
        }
    }
}

impl Theme {
    /// Parse a theme from TOML; missing keys keep their defaults.
    pub fn from_toml_str(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    /// Read and parse a theme file.
    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }
}
