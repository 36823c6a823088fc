//! Command-line front end for the native Git connection layer.

#![warn(missing_docs)]
#![warn(
    clippy::all,
    clippy::as_conversions,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro
)]

pub mod commands;
pub mod opts;

use std::ffi::OsString;

use clap::Parser;
use eyre::Context;
use lib::git::GitRunInfo;
use lib::util::ExitCode;
use tracing::instrument;
use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::opts::Opts;

fn install_tracing() -> eyre::Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse(std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_|
                // Limit to first-party logs by default in case third-party
                // packages log spuriously.
                "nativegit=warn,git_native=warn".to_string()))?;
    let fmt_layer = tracing_fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(fmt_layer.with_filter(env_filter))
        .try_init()?;
    Ok(())
}

/// Wrapper function for `main` to ensure that `Drop` is called for local
/// variables, since `std::process::exit` will skip them.
#[instrument]
pub fn do_main_and_drop_locals(args: Vec<OsString>) -> eyre::Result<i32> {
    let Opts {
        working_directory,
        command,
    } = Opts::parse_from(args);

    if let Some(working_directory) = working_directory {
        std::env::set_current_dir(&working_directory).wrap_err_with(|| {
            format!("Could not set working directory to: {:?}", &working_directory)
        })?;
    }

    install_tracing()?;

    let git_run_info = GitRunInfo::from_env(std::env::current_dir()?);
    let exit_code = match commands::command_main(git_run_info, command)? {
        Ok(()) => 0,
        Err(ExitCode(exit_code)) => {
            let exit_code: i32 = exit_code.try_into()?;
            exit_code
        }
    };
    Ok(exit_code)
}
