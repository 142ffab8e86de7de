use clap::{Arg, ArgAction, Command, ValueHint};
use std::path::PathBuf;

pub fn build_cli() -> Command {
    Command::new("redeem-viz")
        .version(clap::crate_version!())
        .author("Justin Sing <justincsing@gmail.com>")
        .about("\u{1F4CA} ReDeeM Viz - Timing charts and image grids")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("timers")
                .about("Render a bar chart of stage timings to HTML")
                .arg(
                    Arg::new("input")
                        .help("JSON file mapping stage label to seconds")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output_file")
                        .help("HTML file the chart is written to")
                        .default_value("timers.html")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .help("Chart title")
                        .default_value("Timings"),
                ),
        )
        .subcommand(
            Command::new("grid")
                .about("Tile a table of flattened images into a k x k grid figure")
                .arg(
                    Arg::new("input")
                        .help("CSV or TSV file with one flattened image per row")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output_file")
                        .help(
                            "Figure path; the extension picks the format (png, jpg, bmp, tiff, svg, ...).",
                        )
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("height")
                        .long("height")
                        .help("Image height in pixels")
                        .required(true)
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .help("Image width in pixels")
                        .required(true)
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("channels")
                        .long("channels")
                        .help("Values per pixel: 1 (gray), 3 (RGB) or 4 (RGBA). Colour values are read on a 0..1 scale.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("k")
                        .short('k')
                        .long("k")
                        .help("Grid side length. Overrides the configuration file.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("figsize")
                        .long("figsize")
                        .help("Figure size as WIDTHxHEIGHT in figure units. Overrides the configuration file.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("dpi")
                        .long("dpi")
                        .help("Pixels per figure unit. Overrides the configuration file.")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("has_headers")
                        .long("has-headers")
                        .help("Skip the first row of the table as a header.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .help("Path to grid JSON configuration file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
}
