// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use docsort::cli::{Cli, Commands};
use docsort::config::ConfigBuilder;
use docsort::errors::Error;
use docsort::output::{write_json, write_report, write_undo_report};
#[cfg(feature = "progress")]
use docsort::progress::IndicatifProgress;
use docsort::progress::ProgressReporter;
use docsort::signal::setup_signal_handler;
use docsort::{apply_plan, build_plan, undo_organization, Organized};
use std::io::Write;
use std::sync::Arc;

#[cfg(feature = "web")]
use docsort::web;

// Wrapper struct to handle subcommands without breaking the library's Cli struct
#[derive(Parser)]
#[command(author, version, about)]
struct AppArgs {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    cli: Cli,
}

fn main() {
    // A missing .env is fine; the environment may already carry the key.
    let _ = dotenvy::dotenv();

    let args = AppArgs::parse();
    init_logging(args.cli.verbose);

    log::info!("Starting docsort v{}...", env!("CARGO_PKG_VERSION"));
    log::debug!("Raw arguments: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = dispatch(args) {
        match e.downcast_ref::<Error>() {
            Some(Error::Interrupted) => {
                eprintln!("\nOperation cancelled.");
                std::process::exit(130);
            }
            _ => {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose || cfg!(debug_assertions) {
        "docsort=debug"
    } else {
        "docsort=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn dispatch(args: AppArgs) -> Result<()> {
    match args.command {
        Some(Commands::Undo {
            directory,
            audit_log,
        }) => run_undo(directory, audit_log),
        #[cfg(feature = "web")]
        Some(Commands::Serve { port, no_open }) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(web::start_server(port, !no_open))
        }
        None => run_organize(args.cli),
    }
}

fn run_organize(cli: Cli) -> Result<()> {
    let config = ConfigBuilder::from_cli(cli).build()?;
    log::debug!("Configuration built successfully: {:?}", config);

    let token = setup_signal_handler()?;

    // Decide whether to show a progress bar. Show it if stderr is a TTY.
    let progress_reporter: Option<Arc<dyn ProgressReporter>> = {
        #[cfg(feature = "progress")]
        {
            if atty::is(atty::Stream::Stderr) {
                Some(Arc::new(IndicatifProgress::new()))
            } else {
                None
            }
        }
        #[cfg(not(feature = "progress"))]
        {
            None
        }
    };

    let plan = build_plan(&config, &token, progress_reporter)?;

    let organized = if config.apply {
        token.check()?;
        if !plan.is_empty() {
            eprintln!(
                "WARNING: Applying changes. {} file(s) in '{}' will be renamed and moved.",
                plan.len(),
                config.directory.display()
            );
        }
        Organized::Applied(apply_plan(&config, plan)?)
    } else {
        Organized::DryRun(plan)
    };

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    if config.output.json {
        write_json(&mut writer, &organized)?;
    } else {
        write_report(&mut writer, &organized, &config.directory)?;
    }
    writer.flush().context("Failed to flush output")?;
    Ok(())
}

fn run_undo(directory: String, audit_log: Option<String>) -> Result<()> {
    let mut builder = ConfigBuilder::new().directory(directory);
    if let Some(name) = audit_log {
        builder = builder.audit_log_name(name);
    }
    let config = builder.build()?;

    let report = undo_organization(&config.directory, &config.audit_log_name)?;

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    write_undo_report(&mut writer, &report)?;
    Ok(())
}
