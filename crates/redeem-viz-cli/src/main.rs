use anyhow::{Context, Result};
use clap::ArgMatches;
use log::LevelFilter;
use std::path::PathBuf;

use redeem_viz::{plot_grid, timers_plot, write_plot_html};
use redeem_viz_cli::cli::build_cli;
use redeem_viz_cli::config::GridRunConfig;
use redeem_viz_cli::input::{load_image_batch, load_timer_record};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(
            env_logger::Env::default()
                .filter_or("REDEEM_VIZ_LOG", "error,redeem_viz=info,redeem_viz_cli=info"),
        )
        .init();

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("timers", sub_m)) => handle_timers(sub_m),
        Some(("grid", sub_m)) => handle_grid(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_timers(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<PathBuf>("input")
        .context("Missing input timings file")?;
    let output = matches
        .get_one::<PathBuf>("output_file")
        .context("Missing --output_file")?;
    let title = matches.get_one::<String>("title").context("Missing --title")?;
    log::info!("[ReDeeM::Viz] Plotting timings from: {:?}", input);

    let record = match load_timer_record(input) {
        Ok(record) => record,
        Err(e) => {
            log::error!("Loading timings failed: {:#}", e);
            std::process::exit(1)
        }
    };

    let plot = timers_plot(&record, title);
    if let Err(e) = write_plot_html(&plot, output) {
        log::error!("Writing {:?} failed: {}", output, e);
        std::process::exit(1)
    }
    log::info!("saved {} timings to {}", record.len(), output.display());
    Ok(())
}

fn handle_grid(matches: &ArgMatches) -> Result<()> {
    let params = match GridRunConfig::from_arguments(matches) {
        Ok(params) => params,
        Err(e) => {
            log::error!("Invalid grid arguments: {:#}", e);
            std::process::exit(1)
        }
    };
    log::info!("[ReDeeM::Viz] Tiling images from: {:?}", params.input);

    if matches.get_one::<PathBuf>("config").is_none() {
        let default_json = serde_json::to_string_pretty(&params.grid).unwrap_or_default();
        eprintln!("[ReDeeM::Viz] Grid config:\n{}", default_json);
    }

    let batch = match load_image_batch(&params.input, params.shape, params.has_headers) {
        Ok(batch) => batch,
        Err(e) => {
            log::error!("Loading images failed: {:#}", e);
            std::process::exit(1)
        }
    };

    match plot_grid(&batch, &params.output_file, &params.grid) {
        Ok(()) => Ok(()),
        Err(e) => {
            log::error!("Grid plot failed: {}", e);
            std::process::exit(1)
        }
    }
}
