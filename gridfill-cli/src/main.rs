use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gridfill::digits::digit_sum_below;
use gridfill::{label, Generator, GeneratorConfig, Grid};

/// Digit-sum grid CLI: count the cells connected to a seed
#[derive(Parser)]
#[command(name = "gridfill", version, allow_negative_numbers = true)]
struct Args {
    /// A cell (x, y) is active iff digit_sum(x) + digit_sum(y) < BOUND
    bound: i32,

    /// Grid width in cells
    width: i32,

    /// Grid height in cells
    height: i32,

    /// Seed x coordinate
    seed_x: i32,

    /// Seed y coordinate
    seed_y: i32,

    /// Generator config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tile edge length in cells
    #[arg(long)]
    tile_edge: Option<usize>,

    /// Maximum number of tiles generated at once (0 = all cores)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Write the generated grid as an image (PNG or BMP by extension)
    #[arg(long)]
    map: Option<PathBuf>,

    /// Write the flood fill mask as an image (PNG or BMP by extension)
    #[arg(long)]
    mask: Option<PathBuf>,

    /// Print a JSON report instead of plain text
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Suppress the parameter echo
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Report {
    bound: i32,
    width: i32,
    height: i32,
    seed: [i32; 2],
    count: usize,
    active_cells: usize,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            GeneratorConfig::from_toml(&text)
                .with_context(|| format!("invalid config: {}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };
    if let Some(tile_edge) = args.tile_edge {
        config.tile_edge = tile_edge;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    Ok(config)
}

fn write_gray(path: &Path, grid: &Grid<u8>) -> Result<()> {
    let img = image::GrayImage::from_raw(
        grid.width() as u32,
        grid.height() as u32,
        grid.as_slice().to_vec(),
    )
    .context("grid buffer does not match its dimensions")?;
    img.save(path)
        .with_context(|| format!("failed to write image: {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if !args.quiet && !args.json {
        eprintln!("bound: {}", args.bound);
        eprintln!("width: {}", args.width);
        eprintln!("height: {}", args.height);
        eprintln!("px: {}", args.seed_x);
        eprintln!("py: {}", args.seed_y);
    }

    let config = load_config(&args)?;
    let active = config.active;
    let generator = Generator::new(config).context("failed to start generator")?;
    let grid = generator
        .generate(args.width, args.height, digit_sum_below(args.bound))
        .context("grid generation failed")?;
    info!(active = grid.count(active), "grid generated");

    if let Some(path) = &args.map {
        write_gray(path, &grid)?;
    }

    let fill = label(&grid, args.seed_x, args.seed_y, active).context("flood fill failed")?;

    if let Some(path) = &args.mask {
        match fill.mask() {
            Some(mask) => write_gray(path, mask)?,
            None => warn!(
                "seed ({}, {}) is inactive, no mask written",
                args.seed_x,
                args.seed_y
            ),
        }
    }

    if args.json {
        let report = Report {
            bound: args.bound,
            width: args.width,
            height: args.height,
            seed: [args.seed_x, args.seed_y],
            count: fill.count(),
            active_cells: grid.count(active),
        };
        let json = if args.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        println!("{json}");
    } else {
        println!("number of connected pixels: {}", fill.count());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_five_positionals() {
        let args = Args::try_parse_from(["gridfill", "25", "100", "80", "3", "4"]).unwrap();
        assert_eq!(
            (args.bound, args.width, args.height, args.seed_x, args.seed_y),
            (25, 100, 80, 3, 4)
        );
    }

    #[test]
    fn rejects_wrong_argument_count() {
        assert!(Args::try_parse_from(["gridfill", "25", "100", "80", "3"]).is_err());
        assert!(Args::try_parse_from(["gridfill", "1", "2", "3", "4", "5", "6"]).is_err());
    }

    #[test]
    fn rejects_non_integer_argument() {
        assert!(Args::try_parse_from(["gridfill", "25", "wide", "80", "3", "4"]).is_err());
    }

    #[test]
    fn negative_values_reach_the_core() {
        let args = Args::try_parse_from(["gridfill", "5", "-10", "10", "0", "0"]).unwrap();
        assert_eq!(args.width, -10);
        let config = load_config(&args).unwrap();
        let err = Generator::new(config)
            .unwrap()
            .generate(args.width, args.height, digit_sum_below(args.bound))
            .unwrap_err();
        assert!(matches!(err, gridfill::GridError::InvalidDimensions { .. }));
    }

    #[test]
    fn flag_overrides_apply() {
        let args = Args::try_parse_from([
            "gridfill",
            "5",
            "10",
            "10",
            "0",
            "0",
            "--tile-edge",
            "16",
            "--workers",
            "2",
        ])
        .unwrap();
        let config = load_config(&args).unwrap();
        assert_eq!(config.tile_edge, 16);
        assert_eq!(config.workers, 2);
    }
}
