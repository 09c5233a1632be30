mod check;
mod cli;
mod error_fmt;
mod logging;
mod run;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use colorimeter_config::{Config, ConfigError, load_calibrations_file, load_config_file};
use eyre::Result;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::run::RunArgs;

fn main() {
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error handler: {e}");
    }
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    // A bad config is not fatal for `run`: the device shows it and falls back.
    let config = load_config_file(&cli.config);
    logging::init_tracing(
        &cli.log_level,
        cli.json,
        config.as_ref().ok().map(|c| &c.logging),
    );

    if let Err(err) = dispatch(cli, config) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn dispatch(cli: Cli, config: std::result::Result<Config, ConfigError>) -> Result<()> {
    match cli.cmd {
        Commands::Run {
            ticks,
            presses,
            press_every,
            light,
            transmission,
            measurement,
            no_sensor,
            all_frames,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&shutdown);
            if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                tracing::warn!(error = %e, "ctrl-c handler not installed");
            }
            let args = RunArgs {
                ticks,
                presses,
                press_every,
                light,
                transmission,
                measurement,
                no_sensor,
                all_frames,
            };
            run::run_device(
                config,
                load_calibrations_file(&cli.calibrations),
                args,
                cli.json,
                shutdown,
            )
        }
        Commands::Check { file } => {
            let path = file.as_deref().unwrap_or(&cli.calibrations);
            check::check_file(path, cli.json)
        }
        Commands::SelfCheck => check::self_check(config, &cli.calibrations),
    }
}
