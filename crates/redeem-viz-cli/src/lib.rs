//! Input loading and argument handling for the `redeem-viz` binary.
pub mod cli;
pub mod config;
pub mod input;
pub mod util;
