// trackmark: draw a fake running-track route over a background image.
//
//   trackmark --background field.jpg --output run.png
//   trackmark --seed 42 --preview          (R: new track, S: save, ESC: quit)

mod preview;

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use preview::Preview;
use trackmark::background::{load_background, save_frame};
use trackmark::rng::seeded;
use trackmark::{compose, AppConfig, Error, FrameBuffer};

#[derive(Parser, Debug)]
#[command(about = "Draw a fake GPS running-track overlay onto an image")]
struct Args {
    /// TOML config; defaults are used for anything it leaves out.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Background image. Without one a blank canvas is used.
    #[arg(long)]
    background: Option<PathBuf>,
    #[arg(long, default_value = "track.png")]
    output: PathBuf,
    /// Fix the random seed to reproduce a track.
    #[arg(long)]
    seed: Option<u64>,
    /// Override `output.save_width` (0 keeps the rendered size).
    #[arg(long)]
    save_width: Option<u32>,
    /// Show the result in a window.
    #[arg(long)]
    preview: bool,
}

fn main() -> Result<(), Error> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    match args.save_width {
        Some(0) => config.output.save_width = None,
        Some(w) => config.output.save_width = Some(w),
        None => {}
    }

    // Background must be ready before anything is generated.
    let background = match &args.background {
        Some(path) => load_background(path)?,
        None => config.output.blank_canvas(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut image = render(&background, &config, seed)?;
    save_frame(&image, &args.output, config.output.save_width)?;

    if args.preview {
        let mut window = Preview::new("trackmark", image.width, image.height)?;
        window.present(&image)?;
        while window.is_open() {
            if window.regenerate_pressed() {
                image = render(&background, &config, rand::random())?;
                window.present(&image)?;
            } else if window.save_pressed() {
                save_frame(&image, &args.output, config.output.save_width)?;
            } else {
                window.idle();
            }
        }
    }

    Ok(())
}

fn render(background: &FrameBuffer, config: &AppConfig, seed: u64) -> Result<FrameBuffer, Error> {
    let mut rng = seeded(seed);
    let (image, summary) = compose(background.clone(), config, &mut rng)?;
    info!(seed, segments = summary.segments, bursts = summary.bursts, "track drawn");
    Ok(image)
}
