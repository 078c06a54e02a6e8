//! Renders a static preview image of a themed game interface: nav plaque,
//! side panels, journal page, buttons and quality cards, finished with glows,
//! paper grain and a vignette.
//!
//! Every effect is painted on its own transparent [`Layer`] and merged onto the
//! opaque [`Canvas`] in the fixed order of [`compositor::PAINT_ORDER`].

pub mod blur;
pub mod compositor;
pub mod config;
pub mod draw;
pub mod error;
pub mod fx;
pub mod gamma;
#[cfg(feature = "preview")]
pub mod preview;
pub mod surface;
pub mod types;

pub use compositor::{Compositor, Stage, PAINT_ORDER};
pub use config::Theme;
pub use error::{Error, Result};
pub use surface::{Canvas, Composite, Layer};
pub use types::{BoundingBox, Color};
