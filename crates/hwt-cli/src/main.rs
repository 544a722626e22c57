//! Hospital wait-time CLI.

use clap::{ColorChoice, Parser};
use hwt_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod state;
mod tables;

use crate::cli::{Cli, Command, ErrorsCommand, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_errors_list, run_errors_resolve, run_load_hospitals, run_report, run_submit,
};
use crate::state::{load_store, save_store};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let store = match load_store(cli.state.as_deref()) {
        Ok(store) => store,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };

    // Submissions mutate the store even when rejected (the rejection itself
    // is quarantined), so state is saved after every mutating command.
    let (outcome, mutates) = match &cli.command {
        Command::Submit(args) => (run_submit(&store, args), true),
        Command::LoadHospitals(args) => (run_load_hospitals(&store, args), true),
        Command::Report(query) => (run_report(&store, query, cli.output), false),
        Command::Errors(ErrorsCommand::List(args)) => (run_errors_list(&store, args), false),
        Command::Errors(ErrorsCommand::Resolve(args)) => {
            (run_errors_resolve(&store, args), true)
        }
    };

    let exit_code = match outcome {
        Ok(code) => {
            if mutates && let Err(error) = save_store(cli.state.as_deref(), &store) {
                eprintln!("error: {error:#}");
                1
            } else {
                code
            }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
