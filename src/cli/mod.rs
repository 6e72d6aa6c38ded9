//! Command-line interface module.

mod args;
pub mod cache;
pub mod common;
pub mod render;

pub use args::{CacheAction, Cli, Commands, EventArg, RequestArgs};
