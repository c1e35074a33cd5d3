//! Campdash - campaign performance dashboard
//!
//! A CLI tool that fetches advertising campaign metrics from an API,
//! filters them by status and renders totals for the filtered set.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (configuration, retrieval failure, output failure)
//!   2 - No campaigns matched the filter and --fail-on-empty was set

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod retriever;
mod session;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use indicatif::{ProgressBar, ProgressStyle};
use models::StatusFilter;
use retriever::{campaigns_endpoint, CampaignRetriever, RetrievalError};
use session::{Session, SessionState, View};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config decides the final verbosity, so it is loaded before logging
    let (config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("Campdash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match config_source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }

    match run_dashboard(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Dashboard failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .campdash.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the API URL, default status filter and output format.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so the rendered dashboard on stdout stays clean.
fn init_logging(args: &Args, config: &Config) {
    let level = if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults, then apply CLI overrides.
///
/// Also returns the path the configuration came from, if any.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    let (mut config, source) = if let Some(ref config_path) = args.config {
        (Config::load(config_path)?, Some(config_path.clone()))
    } else {
        match Config::load_default()? {
            Some(config) => (config, Some(PathBuf::from(CONFIG_FILE_NAME))),
            None => (Config::default(), None),
        }
    };

    config.merge_with_args(args);
    Ok((config, source))
}

/// Run the dashboard. Returns the exit code.
async fn run_dashboard(args: Args, config: Config) -> Result<i32> {
    let endpoint = campaigns_endpoint(config.base_url()?);
    let retriever = CampaignRetriever::new(config.retriever_config())
        .context("Failed to initialize campaign retriever")?;
    let session = Session::new(config.display.default_status);
    let format = config.general.format;

    info!("Campaign endpoint: {}", endpoint);
    if let Some(secs) = config.api.timeout_seconds {
        debug!("Request timeout: {}s", secs);
    }

    if args.interactive {
        run_interactive(&args, session, retriever, endpoint, format).await
    } else {
        run_once(&args, session, retriever, endpoint, format).await
    }
}

/// Fetch once, render once.
async fn run_once(
    args: &Args,
    mut session: Session,
    retriever: CampaignRetriever,
    endpoint: String,
    format: OutputFormat,
) -> Result<i32> {
    let spinner = loading_spinner(args.quiet);
    let result = retriever.fetch_campaigns(&endpoint).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    session.complete(result);

    let output = report::render(&session.view(), session.filter(), format)?;
    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write dashboard to {}", path.display()))?;
            if !args.quiet {
                println!("✅ Dashboard saved to: {}", path.display());
            }
        }
        None => print!("{}", output),
    }

    Ok(exit_code(&session, args.fail_on_empty))
}

/// Fetch in the background while reading filter selections from stdin.
async fn run_interactive(
    args: &Args,
    mut session: Session,
    retriever: CampaignRetriever,
    endpoint: String,
    format: OutputFormat,
) -> Result<i32> {
    let mut fetch = tokio::spawn(async move { retriever.fetch_campaigns(&endpoint).await });
    let mut fetched = false;
    let mut stdin_open = true;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("{}", report::render(&session.view(), session.filter(), format)?);
    if !args.quiet {
        println!("Type all, active or paused to filter; quit to exit.");
    }

    while !fetched || stdin_open {
        tokio::select! {
            joined = &mut fetch, if !fetched => {
                fetched = true;
                let result = joined.unwrap_or_else(|e| {
                    Err(RetrievalError::Transport(format!("Retrieval task failed: {}", e)))
                });
                session.complete(result);
                print!("{}", report::render(&session.view(), session.filter(), format)?);

                if matches!(session.state(), SessionState::Failed { .. }) {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line.context("Failed to read from stdin")? {
                    None => stdin_open = false,
                    Some(input) => {
                        let input = input.trim();
                        if input.is_empty() {
                            continue;
                        }
                        if matches!(input, "q" | "quit" | "exit") {
                            break;
                        }
                        match input.parse::<StatusFilter>() {
                            Ok(filter) => {
                                session.set_filter(filter);
                                if fetched {
                                    print!("{}", report::render(&session.view(), session.filter(), format)?);
                                } else {
                                    println!("Filter set to {}; still loading...", filter.label());
                                }
                            }
                            Err(e) => warn!("{}", e),
                        }
                    }
                }
            }
        }
    }

    if !fetched {
        debug!("Session ended before retrieval completed");
        fetch.abort();
    }

    Ok(exit_code(&session, args.fail_on_empty))
}

/// Spinner shown on stderr while the retrieval is outstanding.
fn loading_spinner(quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Loading dashboard...");
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Map the final session to an exit code.
fn exit_code(session: &Session, fail_on_empty: bool) -> i32 {
    match session.view() {
        View::Failed { .. } => 1,
        View::Ready {
            no_results: true, ..
        } if fail_on_empty => {
            eprintln!(
                "\n⛔ No campaigns match the {} filter. Failing (exit code 2).",
                session.filter()
            );
            2
        }
        _ => 0,
    }
}
