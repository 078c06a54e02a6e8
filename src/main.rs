// What you GET:
// • A 1920x1080 PNG previewing the themed interface (or the size your theme asks for).
// • --seed makes the paper grain reproducible; without it a seed is picked and logged.
// • --preview (build with `--features preview`) also shows the result in a window.

use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::time::Instant;
use ui_mockup::config::BlendSpace;
use ui_mockup::{Compositor, Result, Theme};

#[derive(Parser)]
#[command(name = "ui-mockup")]
#[command(about = "Render a static preview image of a themed game UI")]
#[command(version)]
struct Cli {
    /// Where to write the PNG
    #[arg(short, long, default_value = "ui-mockup.png")]
    output: PathBuf,

    /// Theme file (TOML) overriding palette, layout and effects
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the paper grain
    #[arg(short, long)]
    seed: Option<u64>,

    /// Composite in linear light instead of sRGB
    #[arg(long)]
    linear: bool,

    /// Show the result in a window after saving (needs the `preview` feature)
    #[arg(long)]
    preview: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    /* --- Theme ---
       Visual: decides every color, size and glow strength in the picture. */
    let mut theme = match &cli.config {
        Some(path) => {
            info!("loading theme from {}", path.display());
            Theme::load(path)?
        }
        None => Theme::default(),
    };
    if cli.linear {
        theme.blend = BlendSpace::Linear;
    }

    /* --- Render --- */
    let seed = cli.seed.unwrap_or_else(rand::random);
    let compositor = Compositor::new(theme);
    let t = compositor.theme();
    info!("{}x{} canvas, {:?} blending, {} quality tiers", t.width, t.height, t.blend, t.qualities.len());

    let started = Instant::now();
    let canvas = compositor.render(seed)?;
    info!("rendered in {:.2?}", started.elapsed());

    /* --- Save ---
       Visual: the PNG on disk is exactly what the canvas holds (RGB, no alpha). */
    canvas.save_png(&cli.output)?;
    info!("mockup written to {} (seed {seed})", cli.output.display());

    if cli.preview {
        show(&canvas)?;
    }

    Ok(())
}

#[cfg(feature = "preview")]
fn show(canvas: &ui_mockup::Canvas) -> Result<()> {
    ui_mockup::preview::Preview::new("UI Mockup", canvas.width() as usize, canvas.height() as usize)?.run(canvas)
}

#[cfg(not(feature = "preview"))]
fn show(_canvas: &ui_mockup::Canvas) -> Result<()> {
    log::warn!("--preview ignored: built without the `preview` feature");
    Ok(())
}
