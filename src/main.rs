//! jobdeck - review scraped and recommended job postings

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use jobdeck::display;
use jobdeck::gateway::{
    CredentialChain, CredentialProvider, HttpGateway, JobGateway, StaticToken,
};
use jobdeck::models::{AppConfig, JobId, JobSource};
use jobdeck::tui;
use jobdeck::tui::app::filter::{filter_external, filter_recommended, job_stats};

/// Environment variable holding the log filter, e.g. `jobdeck=debug`
const LOG_ENV_VAR: &str = "JOBDECK_LOG";

#[derive(Parser)]
#[command(name = "jobdeck")]
#[command(about = "Review scraped and recommended job postings", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the jobs API
    #[arg(long, global = true, value_name = "URL")]
    server_url: Option<String>,

    /// Bearer token, overriding the environment and token file
    #[arg(long, global = true, value_name = "TOKEN")]
    token: Option<String>,

    /// Additional config file, applied after the system and user files
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show job statistics
    Stats {
        /// Count only jobs from this source
        #[arg(short, long)]
        source: Option<JobSource>,
    },

    /// Show external jobs
    Jobs {
        /// Filter by source (stackoverflow, weworkremotely, remoteok, greenhouse)
        #[arg(short, long)]
        source: Option<JobSource>,

        /// Maximum number of jobs to request
        #[arg(short = 'n', long)]
        limit: Option<u32>,

        /// Only show jobs whose title or company contains this text
        #[arg(short = 'q', long)]
        search: Option<String>,
    },

    /// Show recommended jobs
    #[command(alias = "rec")]
    Recommended {
        /// Maximum number of recommendations to request
        #[arg(short = 'n', long)]
        limit: Option<u32>,

        /// Only show jobs whose title or company contains this text
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Only recommend scraped external jobs
        #[arg(long)]
        scraped: bool,
    },

    /// Ask the server to scrape new jobs
    Scrape,

    /// Enable a job
    Enable {
        /// Job ID
        id: JobId,
    },

    /// Disable a job
    Disable {
        /// Job ID
        id: JobId,
    },

    /// Enable several jobs at once
    BulkEnable {
        /// Job IDs
        ids: Vec<JobId>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Launch interactive TUI mode
    #[command(alias = "ui")]
    Tui,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, Some(Commands::Tui));

    init_logging(interactive)?;

    let (mut config, warnings) = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = &cli.server_url {
        config.server.base_url = Some(url.clone());
    }

    if !interactive {
        for warning in &warnings {
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }
    }

    let credentials: Arc<dyn CredentialProvider> = match &cli.token {
        Some(token) => Arc::new(StaticToken::new(token.clone())),
        None => Arc::new(CredentialChain::standard(config.server.token_file())),
    };
    let gateway = HttpGateway::new(
        config.server.base_url(),
        Duration::from_secs(config.server.timeout_secs),
        credentials,
    )?;
    tracing::debug!(base_url = %gateway.base_url(), "gateway ready");

    match cli.command {
        Some(Commands::Stats { source }) => {
            println!("{}", handle_stats_command(&gateway, &config, source).await?);
        }
        None => {
            // Default: show statistics
            println!("{}", handle_stats_command(&gateway, &config, None).await?);
        }
        Some(Commands::Jobs {
            source,
            limit,
            search,
        }) => {
            let limit = limit.unwrap_or(config.limits.external_jobs);
            let jobs = gateway.list_external_jobs(limit, source).await?;
            let visible = filter_external(&jobs, search.as_deref().unwrap_or_default());
            println!(
                "{}",
                display::format_external_jobs(
                    &visible,
                    config.display.title_max_length,
                    Utc::now()
                )
            );
        }
        Some(Commands::Recommended {
            limit,
            search,
            scraped,
        }) => {
            let limit = limit.unwrap_or(config.limits.recommended_jobs);
            let recs = if scraped {
                gateway.list_recommended_external_jobs(limit).await?
            } else {
                gateway.list_all_recommended_jobs(limit).await?
            };
            let visible = filter_recommended(&recs, search.as_deref().unwrap_or_default());
            println!(
                "{}",
                display::format_recommendations(&visible, config.display.title_max_length)
            );
        }
        Some(Commands::Scrape) => handle_scrape_command(&gateway).await?,
        Some(Commands::Enable { id }) => {
            gateway.set_job_enabled(&id, true).await?;
            println!("{}", "Job enabled successfully".green());
        }
        Some(Commands::Disable { id }) => {
            gateway.set_job_enabled(&id, false).await?;
            println!("{}", "Job disabled successfully".green());
        }
        Some(Commands::BulkEnable { ids, yes }) => {
            handle_bulk_enable_command(&gateway, &config, &ids, yes).await?;
        }
        Some(Commands::Tui) => {
            tui::run(config, warnings, Arc::new(gateway)).await?;
        }
    }

    Ok(())
}

/// Logging is off unless `JOBDECK_LOG` is set. The TUI owns the terminal, so
/// it logs to a file instead of stderr.
fn init_logging(interactive: bool) -> Result<()> {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) else {
        return Ok(());
    };

    if interactive {
        let dir = dirs::data_dir()
            .map(|d| d.join("jobdeck"))
            .context("no data directory for the log file")?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("jobdeck.log"))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

async fn handle_stats_command(
    gateway: &HttpGateway,
    config: &AppConfig,
    source: Option<JobSource>,
) -> Result<String> {
    let filter = source.clone();
    let (jobs, recs) = tokio::join!(
        gateway.list_external_jobs(config.limits.external_jobs, source),
        gateway.list_all_recommended_jobs(config.limits.recommended_jobs),
    );

    let jobs = jobs?;
    // Recommendations are optional; count zero when they fail
    let recs = recs.unwrap_or_else(|e| {
        tracing::warn!("failed to load recommendations: {}", e);
        Vec::new()
    });

    Ok(display::format_stats(&job_stats(&jobs, &recs), filter.as_ref()))
}

async fn handle_scrape_command(gateway: &HttpGateway) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.set_message("Scraping jobs...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = gateway.trigger_scrape().await;
    spinner.finish_and_clear();

    let message = result.context("Failed to scrape jobs")?;
    println!(
        "{}",
        message
            .as_deref()
            .unwrap_or("Successfully scraped external jobs")
            .green()
    );
    Ok(())
}

async fn handle_bulk_enable_command(
    gateway: &HttpGateway,
    config: &AppConfig,
    ids: &[JobId],
    yes: bool,
) -> Result<()> {
    if ids.is_empty() {
        eprintln!("{}", "Please select jobs to enable".yellow());
        return Ok(());
    }

    if config.behavior.confirm_bulk_enable && !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Enable {} jobs?", ids.len()))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let message = gateway
        .bulk_enable(ids)
        .await
        .context("Failed to enable jobs")?;
    println!(
        "{}",
        message.as_deref().unwrap_or("Jobs enabled successfully").green()
    );
    Ok(())
}
