//! docsave CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use docsave_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use docsave_cli::commands::{already_reported, load_config, run_resolve, run_save};
use docsave_cli::logging::{LogConfig, LogFormat, init_logging};
use docsave_cli::summary::{print_info, print_resolution, print_save_summary};
use docsave_core::SaverConfig;
use docsave_model::SaveOutcome;

const EXIT_CANCELLED: i32 = 130;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };

    let exit_code = match &cli.command {
        Command::Save(args) => {
            let show_progress = !cli.no_progress && io::stderr().is_terminal();
            match run_save(args, config, show_progress) {
                Ok(SaveOutcome::Saved(summary)) => {
                    print_save_summary(&summary);
                    0
                }
                // Already shown through the notifier.
                Ok(SaveOutcome::Failed(_)) => 1,
                Ok(SaveOutcome::Cancelled) => {
                    eprintln!("Save cancelled.");
                    EXIT_CANCELLED
                }
                Err(error) => {
                    if !already_reported(&error) {
                        eprintln!("error: {error:#}");
                    }
                    1
                }
            }
        }
        Command::Resolve(args) => match run_resolve(args) {
            Ok(resolution) => {
                print_resolution(&resolution);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Info => {
            let source = cli
                .config
                .clone()
                .or_else(|| SaverConfig::config_path().filter(|path| path.exists()));
            print_info(&config, source.as_deref());
            0
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
