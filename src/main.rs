//! Swagger Declaration Generator - Command-line tool for generating Swagger 1.2 documentation.
//!
//! Reads a service manifest, resolves the read and write sample types against
//! the given model sources, and emits the resource listing and API declarations.
//!
//! # Usage
//!
//! ```bash
//! swagger-decl [OPTIONS] <MANIFEST>
//! ```
//!
//! # Examples
//!
//! Print the resource listing:
//! ```bash
//! swagger-decl services.yaml -m src/models
//! ```
//!
//! Print one declaration as YAML:
//! ```bash
//! swagger-decl services.yaml -m src/models -r /books -f yaml
//! ```
//!
//! Write every document into a directory:
//! ```bash
//! swagger-decl services.yaml -m src/models -o docs/
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_decl::cli;

fn main() -> Result<()> {
    // Parse once up front so the verbose flag can configure the logger
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Swagger declaration generator starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("API declaration generation completed successfully");

    Ok(())
}
