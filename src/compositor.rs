// The render pipeline: one pass, back to front, each region built on its own
// layer and merged onto the canvas in the order given by `PAINT_ORDER`.
// Visual expectation: dark stone backdrop, gilded nav plaque across the top,
// parchment book panel on the left, glowing crystal panel on the right, journal
// page in the middle with a sample button and one glowing card per quality tier,
// all under a soft vignette.

use crate::config::{BlendSpace, Theme};
use crate::draw::{circle, fill_rect, gradient_vertical, ornate_border, rounded_rect, stroke_rect};
use crate::error::{Error, Result};
use crate::fx::{add_glow, add_texture_noise, apply_vignette};
use crate::surface::{Canvas, Composite, Layer};
use crate::types::BoundingBox;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Background,
    TopNav,
    LeftPanel,
    RightPanel,
    CenterPanel,
    Button,
    QualityCards,
    Vignette,
}

/// Paint order, back to front. Later stages may cover earlier ones, so any
/// change here changes the picture. The vignette must stay last.
pub const PAINT_ORDER: [Stage; 8] = [
    Stage::Background,
    Stage::TopNav,
    Stage::LeftPanel,
    Stage::RightPanel,
    Stage::CenterPanel,
    Stage::Button,
    Stage::QualityCards,
    Stage::Vignette,
];

// Outline widths that are part of the look rather than the theme.
const PANEL_OUTLINE: u32 = 2;
const TAB_OUTLINE: u32 = 2;
const AVATAR_OUTLINE: u32 = 2;
const TORN_EDGE_STEP: usize = 8;

/// Region boxes derived from the theme's layout numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub plaque: BoundingBox,
    pub emblem: BoundingBox,
    pub avatar: BoundingBox,
    pub left: BoundingBox,
    pub tabs: Vec<BoundingBox>,
    pub right: BoundingBox,
    pub center: BoundingBox,
    pub button: BoundingBox,
    pub cards: Vec<BoundingBox>,
}

/// Layout math runs in i64. A box whose corners or size do not fit back into
/// i32 is reported (coordinates saturated) instead of wrapping.
fn layout_box(x1: i64, y1: i64, x2: i64, y2: i64) -> Result<BoundingBox> {
    let fits = [x1, y1, x2, y2, x2.saturating_sub(x1), y2.saturating_sub(y1)].iter().all(|&v| i32::try_from(v).is_ok());
    let sat = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    let bbox = BoundingBox::new(sat(x1), sat(y1), sat(x2), sat(y2));
    if !fits {
        return Err(Error::InvalidBoundingBox { x1: bbox.x1, y1: bbox.y1, x2: bbox.x2, y2: bbox.y2 });
    }
    bbox.validate()
}

impl Frame {
    /// Every region box for `theme`. Fails with `InvalidBoundingBox` when the layout
    /// numbers produce an inverted box or one past the i32 range.
    pub fn new(theme: &Theme) -> Result<Self> {
        let l = &theme.layout;
        let (w, h) = (i64::from(theme.width), i64::from(theme.height));
        layout_box(0, 0, w, h)?;
        let v = |n: i32| i64::from(n);

        let plaque_y2 = v(l.top_nav_y) + v(l.top_nav_height);
        let plaque = layout_box(v(l.margin), v(l.top_nav_y), w - v(l.margin), plaque_y2)?;
        let emblem_y = v(l.top_nav_y) + (v(l.top_nav_height) - v(l.emblem_size)).div_euclid(2);
        let emblem =
            layout_box(v(l.emblem_x), emblem_y, v(l.emblem_x) + v(l.emblem_size), emblem_y + v(l.emblem_size))?;
        let avatar_x = w - v(l.status_offset);
        let avatar_y = v(l.top_nav_y) + (v(l.top_nav_height) - v(l.avatar_size)).div_euclid(2);
        let avatar = layout_box(avatar_x, avatar_y, avatar_x + v(l.avatar_size), avatar_y + v(l.avatar_size))?;

        let main_top = plaque_y2 + v(l.gutter);
        let main_bottom = h - v(l.margin);

        let left_x2 = v(l.margin) + v(l.left_panel_width);
        let left = layout_box(v(l.margin), main_top, left_x2, main_bottom)?;
        let tab_pitch = v(l.tab_height) + v(l.tab_spacing);
        let tabs = (0..theme.tabs.len())
            .map(|i| {
                let i = i64::try_from(i).unwrap_or(i64::MAX);
                let y = (main_top + v(l.tab_top)).saturating_add(i.saturating_mul(tab_pitch));
                let x1 = i64::from(left.x1) + v(l.tab_inset_left);
                let x2 = i64::from(left.x2) - v(l.tab_inset_right);
                layout_box(x1, y, x2, y.saturating_add(v(l.tab_height)))
            })
            .collect::<Result<Vec<_>>>()?;

        let right_x = w - v(l.margin) - v(l.right_panel_width);
        let right = layout_box(right_x, main_top, right_x + v(l.right_panel_width), main_bottom)?;

        let center = layout_box(left_x2 + v(l.gutter), main_top, right_x - v(l.gutter), main_bottom)?;
        let (center_x1, center_w) = (i64::from(center.x1), i64::from(center.x2) - i64::from(center.x1));

        let button_x = center_x1 + (center_w - v(l.button_width)).div_euclid(2);
        let button_y = main_top + v(l.button_top);
        let button =
            layout_box(button_x, button_y, button_x + v(l.button_width), button_y + v(l.button_height))?;

        let n = i64::try_from(theme.qualities.len()).unwrap_or(i64::MAX);
        let card_pitch = v(l.card_width) + v(l.card_spacing);
        let gaps = (n - 1).max(0).saturating_mul(v(l.card_spacing));
        let row_w = n.saturating_mul(v(l.card_width)).saturating_add(gaps);
        let cards_x = center_x1 + center_w.saturating_sub(row_w).div_euclid(2);
        let card_y = main_top + v(l.card_top);
        let cards = (0..n)
            .map(|i| {
                let x = cards_x.saturating_add(i.saturating_mul(card_pitch));
                layout_box(x, card_y, x.saturating_add(v(l.card_width)), card_y + v(l.card_height))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { plaque, emblem, avatar, left, tabs, right, center, button, cards })
    }
}

/// Owns the theme and runs the pipeline. Each render gets a fresh canvas.
pub struct Compositor {
    theme: Theme,
}

impl Compositor {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Render with the paper grain seeded from `seed` (same seed = same pixels).
    pub fn render(&self, seed: u64) -> Result<Canvas> {
        info!("rendering {}x{} mockup (seed {seed})", self.theme.width, self.theme.height);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.render_with_rng(&mut rng)
    }

    /// Render, drawing all randomness from `rng`.
    pub fn render_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Canvas> {
        let t = &self.theme;
        let frame = Frame::new(t)?;
        let mut canvas = Canvas::new(t.width, t.height, t.palette.background);
        if t.blend == BlendSpace::Linear {
            canvas = canvas.with_linear_blending();
        }

        for stage in PAINT_ORDER {
            debug!("stage {stage:?}");
            match stage {
                Stage::Background => self.paint_background(&mut canvas)?,
                Stage::TopNav => self.paint_top_nav(&mut canvas, &frame)?,
                Stage::LeftPanel => self.paint_left_panel(&mut canvas, &frame, rng)?,
                Stage::RightPanel => self.paint_right_panel(&mut canvas, &frame)?,
                Stage::CenterPanel => self.paint_center_panel(&mut canvas, &frame, rng)?,
                Stage::Button => self.paint_button(&mut canvas, &frame)?,
                Stage::QualityCards => self.paint_quality_cards(&mut canvas, &frame)?,
                Stage::Vignette => {
                    apply_vignette(&mut canvas, t.effects.vignette_steps, t.effects.vignette_max_alpha)?
                }
            }
        }

        info!("render finished");
        Ok(canvas)
    }

    fn layer(&self) -> Layer {
        Layer::new(self.theme.width, self.theme.height)
    }

    /// Very subtle top-to-bottom depth over the whole canvas.
    fn paint_background(&self, canvas: &mut Canvas) -> Result<()> {
        let p = &self.theme.palette;
        let mut layer = self.layer();
        let full = BoundingBox::new(0, 0, self.theme.width as i32, self.theme.height as i32);
        gradient_vertical(&mut layer, full, p.background, p.background_deep)?;
        canvas.composite(&layer)
    }

    /// Guild plaque: stone gradient, faint blue glow, gold ornate frame, emblem + avatar markers.
    fn paint_top_nav(&self, canvas: &mut Canvas, frame: &Frame) -> Result<()> {
        let (p, fx) = (&self.theme.palette, &self.theme.effects);
        let mut layer = self.layer();

        gradient_vertical(&mut layer, frame.plaque, p.stone, p.stone_light)?;
        add_glow(&mut layer, frame.plaque, p.accent, fx.top_nav_glow.radius, fx.top_nav_glow.intensity)?;
        ornate_border(&mut layer, frame.plaque, p.gold, fx.border_width)?;

        circle(&mut layer, frame.emblem, Some(p.accent), Some((p.gold, fx.border_width)))?;
        circle(&mut layer, frame.avatar, Some(p.parchment_light), Some((p.gold, AVATAR_OUTLINE)))?;
        canvas.composite(&layer)
    }

    /// Parchment book: gradient, grain, torn right edge, then the bookmark tabs.
    fn paint_left_panel<R: Rng + ?Sized>(&self, canvas: &mut Canvas, frame: &Frame, rng: &mut R) -> Result<()> {
        let (p, fx) = (&self.theme.palette, &self.theme.effects);
        let mut layer = self.layer();
        let left = frame.left;

        gradient_vertical(&mut layer, left, p.parchment_light, p.parchment_mid)?;
        add_texture_noise(&mut layer, fx.left_panel_noise, rng);

        // Torn paper: short dashes along the right edge, jittered by row.
        for y in (left.y1..left.y2).step_by(TORN_EDGE_STEP) {
            let x = left.x2.saturating_sub(2 + y.rem_euclid(16) / 4);
            let dash = BoundingBox::new(x.saturating_sub(1), y, x.saturating_add(1), y.saturating_add(5));
            fill_rect(&mut layer, dash, p.parchment_mid)?;
        }

        for tab in &frame.tabs {
            fill_rect(&mut layer, *tab, p.stone)?;
            stroke_rect(&mut layer, *tab, p.bronze, TAB_OUTLINE)?;
        }
        canvas.composite(&layer)
    }

    /// Crystal panel: wide blue glow under a translucent rounded stone slab.
    fn paint_right_panel(&self, canvas: &mut Canvas, frame: &Frame) -> Result<()> {
        let (p, fx, l) = (&self.theme.palette, &self.theme.effects, &self.theme.layout);
        let mut layer = self.layer();

        let glow = fx.right_panel_glow;
        add_glow(&mut layer, frame.right, p.accent_glow, glow.radius, glow.intensity)?;
        rounded_rect(
            &mut layer,
            frame.right,
            l.right_panel_radius,
            Some(p.stone.with_alpha(fx.right_panel_fill_alpha)),
            Some((p.accent, PANEL_OUTLINE)),
        )?;
        canvas.composite(&layer)
    }

    /// Journal page: warm parchment gradient, grain, weathered bronze edge.
    fn paint_center_panel<R: Rng + ?Sized>(&self, canvas: &mut Canvas, frame: &Frame, rng: &mut R) -> Result<()> {
        let (p, fx) = (&self.theme.palette, &self.theme.effects);
        let mut layer = self.layer();

        gradient_vertical(&mut layer, frame.center, p.parchment_light, p.parchment_warm)?;
        add_texture_noise(&mut layer, fx.center_panel_noise, rng);
        stroke_rect(&mut layer, frame.center, p.bronze, PANEL_OUTLINE)?;
        canvas.composite(&layer)
    }

    /// Metallic button with a gold glow.
    fn paint_button(&self, canvas: &mut Canvas, frame: &Frame) -> Result<()> {
        let (p, fx, l) = (&self.theme.palette, &self.theme.effects, &self.theme.layout);
        let mut layer = self.layer();

        let glow = fx.button_glow;
        add_glow(&mut layer, frame.button.expand(fx.button_glow_pad), p.gold, glow.radius, glow.intensity)?;
        rounded_rect(&mut layer, frame.button, l.button_radius, Some(p.stone), Some((p.gold, fx.border_width)))?;
        canvas.composite(&layer)
    }

    /// One card per quality tier, glowing in the tier's color.
    fn paint_quality_cards(&self, canvas: &mut Canvas, frame: &Frame) -> Result<()> {
        let (p, fx, l) = (&self.theme.palette, &self.theme.effects, &self.theme.layout);

        for (tier, card) in self.theme.qualities.iter().zip(&frame.cards) {
            debug!("card {} at {card:?}", tier.name);
            let mut layer = self.layer();
            add_glow(&mut layer, card.expand(fx.card_glow_pad), tier.color, fx.card_glow_radius, tier.glow_intensity)?;
            rounded_rect(
                &mut layer,
                *card,
                l.card_radius,
                Some(p.stone.with_alpha(fx.card_fill_alpha)),
                Some((tier.color, fx.border_width)),
            )?;
            canvas.composite(&layer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn vignette_is_painted_last_and_background_first() {
        assert_eq!(PAINT_ORDER.first(), Some(&Stage::Background));
        assert_eq!(PAINT_ORDER.last(), Some(&Stage::Vignette));
        let top = PAINT_ORDER.iter().position(|s| *s == Stage::TopNav).unwrap();
        let cards = PAINT_ORDER.iter().position(|s| *s == Stage::QualityCards).unwrap();
        assert!(top < cards);
    }

    #[test]
    fn default_frame_matches_the_reference_layout() {
        let frame = Frame::new(&Theme::default()).unwrap();
        assert_eq!(frame.plaque, BoundingBox::new(40, 20, 1880, 120));
        assert_eq!(frame.left, BoundingBox::new(40, 150, 360, 1040));
        assert_eq!(frame.right, BoundingBox::new(1540, 150, 1880, 1040));
        assert_eq!(frame.center, BoundingBox::new(390, 150, 1510, 1040));
        assert_eq!(frame.button, BoundingBox::new(850, 210, 1050, 260));
        assert_eq!(frame.tabs.len(), 5);
        assert_eq!(frame.tabs[1], BoundingBox::new(60, 260, 330, 320));
        // 3 cards of 180 with 40 gaps, centered in the 1120px journal page
        assert_eq!(frame.cards[0], BoundingBox::new(640, 350, 820, 590));
        assert_eq!(frame.cards[2].x2, 1260);
        assert_eq!(frame.emblem, BoundingBox::new(80, 40, 140, 100));
    }

    #[test]
    fn cramped_canvas_is_a_layout_error() {
        // Side panels overlap: the journal page ends before it starts.
        let theme = Theme { width: 700, height: 500, ..Theme::default() };
        let err = Compositor::new(theme).render(1).err().unwrap();
        assert!(matches!(err, Error::InvalidBoundingBox { .. }));
    }

    #[test]
    fn overflowing_layout_numbers_are_rejected_not_wrapped() {
        let theme = Theme::from_toml_str("[layout]\nleft_panel_width = 2147483647").unwrap();
        let err = Compositor::new(theme).render(1).err().unwrap();
        assert!(matches!(err, Error::InvalidBoundingBox { x2: i32::MAX, .. }), "{err}");

        let theme = Theme::from_toml_str("[layout]\nmargin = -2147483648\ntop_nav_y = 2147483647").unwrap();
        assert!(matches!(Frame::new(&theme), Err(Error::InvalidBoundingBox { .. })));

        let theme = Theme { width: u32::MAX, ..Theme::default() };
        assert!(matches!(Frame::new(&theme), Err(Error::InvalidBoundingBox { .. })));
    }

    #[test]
    fn huge_paddings_and_strokes_render_without_overflow() {
        let mut theme = Theme { width: 480, height: 270, ..Theme::default() };
        theme.layout = crate::config::Layout {
            margin: 10,
            gutter: 5,
            top_nav_height: 40,
            left_panel_width: 100,
            right_panel_width: 100,
            card_top: 80,
            card_width: 60,
            card_height: 80,
            card_spacing: 10,
            ..Default::default()
        };
        theme.effects.button_glow_pad = i32::MAX;
        theme.effects.card_glow_pad = i32::MAX;
        theme.effects.border_width = u32::MAX;
        let canvas = Compositor::new(theme).render(2).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (480, 270));
    }

    #[test]
    fn infinite_glow_radius_in_a_theme_file_is_an_error() {
        let theme = Theme::from_toml_str(
            "width = 960\nheight = 540\n[effects]\ntop_nav_glow = { radius = inf, intensity = 0.3 }",
        )
        .unwrap();
        let err = Compositor::new(theme).render(1).err().unwrap();
        assert!(matches!(err, Error::BlurRadiusNotFinite(r) if r.is_infinite()));
    }

    #[test]
    fn cards_follow_the_tier_list() {
        let mut theme = Theme::default();
        theme.qualities.truncate(1);
        let frame = Frame::new(&theme).unwrap();
        assert_eq!(frame.cards.len(), 1);
        // A single card is centered on the page.
        assert_eq!(frame.cards[0].center().0, frame.center.center().0);
    }

    #[test]
    fn bad_glow_settings_fail_fast() {
        let mut theme = Theme { width: 960, height: 540, ..Theme::default() };
        theme.effects.button_glow.radius = -1.0;
        let err = Compositor::new(theme).render(3).err().unwrap();
        assert!(matches!(err, Error::BlurRadiusNegative(_)));
    }
}
