//! xkcd-wall CLI
//!
//! Builds a duotone wallpaper from an xkcd comic.
//! Prints the target path to stdout on success, errors to stderr.

use clap::Parser;
use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::Level;
use xkcdwall_core::{
    config::{self, Config},
    copy_to_target, ComicSelector, WallpaperPipeline, XkcdClient,
};

#[derive(Parser)]
#[command(name = "xkcd-wall")]
#[command(about = "Turn an xkcd comic into a duotone wallpaper", version)]
struct Cli {
    /// Path to config.json
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// today, random, or <number>
    #[arg(short = 't', long = "type", default_value = "today")]
    comic: String,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(stage: &str, err: impl Display) -> ExitCode {
    eprintln!("Error: {}: {}", stage, err);
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let selector: ComicSelector = match cli.comic.parse() {
        Ok(s) => s,
        Err(e) => return fail("invalid comic type", e),
    };

    let config_path = match cli.config {
        Some(p) => p,
        None => match config::default_config_path() {
            Ok(p) => p,
            Err(e) => return fail("could not locate config", e),
        },
    };

    let settings = match Config::load_or_bootstrap(&config_path).and_then(|c| c.resolve()) {
        Ok(s) => s,
        Err(e) => return fail("could not read config file", e),
    };

    let mut rng = rand::rng();

    let comic = match XkcdClient::new().download(selector, &settings.cache, &mut rng) {
        Ok(p) => p,
        Err(e) => return fail("could not fetch comic", e),
    };

    let palette = match settings.choose_palette(&mut rng) {
        Ok(p) => p,
        Err(e) => return fail("could not choose colors", e),
    };

    let pipeline = WallpaperPipeline::new(&settings.cache);

    let colored = match pipeline.colorize(&comic, &palette) {
        Ok(p) => p,
        Err(e) => return fail("could not colorize comic", e),
    };

    let background = match pipeline.make_background(settings.dimension, palette.background) {
        Ok(p) => p,
        Err(e) => return fail("could not create background", e),
    };

    let wallpaper = match pipeline.composite_center(&colored, &background) {
        Ok(p) => p,
        Err(e) => return fail("could not create final image", e),
    };

    if let Err(e) = copy_to_target(&wallpaper, &settings.target) {
        return fail("could not copy image to target", e);
    }

    println!("{}", settings.target.display());
    ExitCode::SUCCESS
}
