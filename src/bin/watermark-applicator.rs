use std::path::PathBuf;
use std::process;

use clap::Parser;

use watermark_applicator::{BatchEngine, CompositionConfig, Position, Workspace};

#[derive(Parser)]
#[command(
    name = "watermark-applicator",
    about = "Batch-apply a watermark image onto a folder of images and animated GIFs",
    version,
    after_help = "Folder layout: <base>/input holds the source images, <base>/watermark holds\n\
                  exactly one watermark image, and composited copies land in <base>/output.\n\
                  All three folders are created on startup if missing."
)]
struct Cli {
    /// Base directory containing the input/, output/ and watermark/ folders
    #[arg(short, long, default_value = ".")]
    base_dir: PathBuf,

    /// Watermark opacity (0.0-1.0)
    #[arg(short, long, default_value = "0.5")]
    opacity: f32,

    /// Watermark width as a percentage of each image's width (1-100)
    #[arg(short, long, default_value = "15")]
    scale: f32,

    /// Watermark position: top-left, top-right, bottom-left, bottom-right
    /// or center (anything else falls back to bottom-right)
    #[arg(short, long, default_value = "bottom-right", value_parser = parse_position)]
    position: Position,

    /// Corner margin in pixels (0-200)
    #[arg(short, long, default_value = "10")]
    margin: u32,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn parse_position(name: &str) -> Result<Position, String> {
    Ok(Position::from_name(name))
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if !(0.0..=1.0).contains(&cli.opacity) {
        eprintln!("Error: Opacity must be between 0.0 and 1.0");
        process::exit(1);
    }

    if !(1.0..=100.0).contains(&cli.scale) {
        eprintln!("Error: Scale must be between 1 and 100 percent");
        process::exit(1);
    }

    if cli.margin > 200 {
        eprintln!("Error: Margin must be between 0 and 200 pixels");
        process::exit(1);
    }

    let config = CompositionConfig {
        opacity: cli.opacity,
        scale_percent: cli.scale,
        position: cli.position,
        margin: cli.margin,
    };

    let workspace = match Workspace::create(&cli.base_dir) {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("Fatal: Failed to set up working folders: {e}");
            process::exit(1);
        }
    };

    let engine = match BatchEngine::from_workspace(&workspace, config) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if !cli.quiet {
        eprintln!("Processing images in {}...", workspace.input_dir.display());
    }

    match engine.run(&workspace) {
        Ok(result) => {
            for failure in &result.failures {
                eprintln!("[FAIL] {}: {}", failure.filename, failure.message);
            }
            if !cli.quiet {
                eprintln!("{}", result.status_line());
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
