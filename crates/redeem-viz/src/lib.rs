//! redeem-viz: figure helpers for training and benchmarking runs.
//!
//! Two stateless helpers live here: a bar chart of named timing measurements
//! drawn onto a plotly figure, and a `k x k` image grid rendered with plotters
//! and written to disk in the format implied by the file extension.
pub mod config;
pub mod error;
pub mod grid;
pub mod timers;

pub use config::GridConfig;
pub use error::GridError;
pub use grid::{plot_grid, PixelValue};
pub use timers::{plot_timers, timers_plot, write_plot_html, TimerRecord};
