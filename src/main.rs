//! Shareable - Open Graph, Twitter Card and schema.org metadata for published content.

#![allow(dead_code)]

mod cache;
mod cli;
mod config;
mod logger;
mod seo;
mod site;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, common};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = common::load_config(&cli)?;

    match &cli.command {
        Commands::Render {
            request,
            status,
            title,
            separator,
        } => {
            let engine = common::load_engine(config)?;
            cli::render::render_head(
                &engine,
                request,
                *status,
                title.as_deref(),
                separator.as_deref(),
            )
        }
        Commands::Attrs { request, existing } => {
            let engine = common::load_engine(config)?;
            cli::render::render_attrs(&engine, request, existing)
        }
        Commands::Touch { event, option } => {
            cli::cache::touch(&common::cache_for(&config), *event, option.as_deref())
        }
        Commands::Cache { action } => cli::cache::run(&common::cache_for(&config), action),
    }
}
