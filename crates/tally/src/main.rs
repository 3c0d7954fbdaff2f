use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process::ExitCode;
use tally_core::config::LogFormat;
use tally_core::types::{LoadSummary, WindowQuery};
use tally_core::{Config, TallyError};
use tally_serve::AppState;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "tally", about = "Batch event loader and activity analytics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve,
    /// Load every pending batch file from the raw directory.
    Load,
    /// Print per-user activity sessions as JSON.
    Sessions {
        #[arg(long, default_value_t = 30)]
        days: i64,
        #[arg(long, default_value_t = 100)]
        limit: i64,
    },
    /// Print the most active entities as JSON.
    Top {
        #[arg(long, default_value_t = 30)]
        days: i64,
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing(config.log_format);

    if let Some(parent) = config.db_path.parent() {
        if let Err(err) = std::fs::create_dir_all(parent) {
            tracing::warn!(
                path = %parent.display(),
                error = %err,
                "could not create database directory"
            );
        }
    }

    let state = AppState::from_config(&config);
    let result = match cli.command {
        Command::Serve => {
            let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), config.port);
            tally_serve::serve(state, addr)
                .await
                .map_err(|err| TallyError::Internal {
                    message: format!("serve error: {err}"),
                })
        }
        Command::Load => run_load(&state),
        Command::Sessions { days, limit } => tally_serve::build_tally(&state)
            .and_then(|tally| tally.sessions().list(WindowQuery::new(days, limit)))
            .and_then(|sessions| print_json(&sessions)),
        Command::Top { days, limit } => tally_serve::build_tally(&state)
            .and_then(|tally| tally.entities().top(WindowQuery::new(days, limit)))
            .and_then(|ranks| print_json(&ranks)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run_load(state: &AppState) -> Result<(), TallyError> {
    let tally = tally_serve::build_tally(state)?;
    let summary = tally.loads().run(&state.load_options)?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &LoadSummary) {
    println!("{}", "Load complete".green().bold());
    println!("  scanned   {}", summary.scanned_files);
    println!("  loaded    {}", summary.loaded_files.to_string().green());
    println!("  skipped   {}", summary.skipped_files.to_string().yellow());
    if summary.failed_files > 0 {
        println!("  failed    {}", summary.failed_files.to_string().red());
    } else {
        println!("  failed    0");
    }
    println!("  inserted  {}", summary.inserted_events);
    println!("  duration  {}ms", summary.duration_ms);
    println!("  database  {}", summary.db_path.dimmed());
    if !summary.views_refreshed {
        println!("  {}", "views not refreshed".yellow());
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), TallyError> {
    let text = serde_json::to_string_pretty(value).map_err(|err| TallyError::Internal {
        message: err.to_string(),
    })?;
    println!("{text}");
    Ok(())
}
