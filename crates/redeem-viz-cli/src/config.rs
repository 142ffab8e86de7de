use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use redeem_viz::GridConfig;

use crate::input::ImageShape;

/// Everything the `grid` subcommand needs, after merging file config and flags.
#[derive(Debug, Clone)]
pub struct GridRunConfig {
    pub input: PathBuf,
    pub output_file: PathBuf,
    pub shape: ImageShape,
    pub has_headers: bool,
    pub grid: GridConfig,
}

impl GridRunConfig {
    /// Flags override the JSON config, which overrides the defaults.
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let mut grid = match matches.get_one::<PathBuf>("config") {
            Some(config_path) => GridConfig::load(config_path)
                .with_context(|| format!("Failed to load grid config: {:?}", config_path))?,
            None => GridConfig::default(),
        };

        if let Some(k) = matches.get_one::<usize>("k") {
            grid.k = *k;
        }
        if let Some(figsize) = matches.get_one::<String>("figsize") {
            let (w, h) = parse_figsize(figsize)?;
            grid.figsize = (w, h);
        }
        if let Some(dpi) = matches.get_one::<f64>("dpi") {
            grid.dpi = *dpi;
        }

        let input = matches
            .get_one::<PathBuf>("input")
            .cloned()
            .context("Missing input image table")?;
        let output_file = matches
            .get_one::<PathBuf>("output_file")
            .cloned()
            .unwrap_or_else(|| PathBuf::from("grid.png"));

        let shape = ImageShape {
            height: *matches.get_one::<usize>("height").context("Missing --height")?,
            width: *matches.get_one::<usize>("width").context("Missing --width")?,
            channels: matches.get_one::<usize>("channels").copied().unwrap_or(1),
        };

        if !matches!(shape.channels, 1 | 3 | 4) {
            anyhow::bail!("--channels must be 1, 3 or 4, got {}", shape.channels);
        }

        Ok(Self {
            input,
            output_file,
            shape,
            has_headers: matches.get_flag("has_headers"),
            grid,
        })
    }
}

/// Parse a `WIDTHxHEIGHT` or `WIDTH,HEIGHT` figure size.
pub fn parse_figsize(s: &str) -> Result<(f64, f64)> {
    let parts: Vec<&str> = s.split(|c| c == 'x' || c == 'X' || c == ',').collect();
    if parts.len() != 2 {
        anyhow::bail!("Figure size must look like 10x10, got {:?}", s);
    }
    let w: f64 = parts[0]
        .trim()
        .parse()
        .with_context(|| format!("Invalid figure width in {:?}", s))?;
    let h: f64 = parts[1]
        .trim()
        .parse()
        .with_context(|| format!("Invalid figure height in {:?}", s))?;
    Ok((w, h))
}
