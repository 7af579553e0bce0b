//! Command-line interface module.

mod args;
pub mod build;
pub mod check;
pub mod repair;
pub mod verify;

pub use args::{CheckArgs, Cli, Commands};
