//! Reportrack CLI - drive the report-job lifecycle from the terminal

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use reportrack_core::application::poller::POLL_INTERVAL;
use reportrack_core::application::ReportSession;
use reportrack_core::domain::ReportJob;
use reportrack_core::port::SystemTimeProvider;
use reportrack_infra_http::{BackendConfig, HttpReportBackend};
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "reportrack")]
#[command(about = "Report-job lifecycle tracker CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Report service base URL
    #[arg(long, env = "REPORTRACK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List available report types
    Reports,

    /// Submit a report job
    Run {
        /// Report type (catalog key)
        report_type: String,

        /// Parameter as key=value (value parsed as JSON when possible)
        #[arg(short, long = "param")]
        params: Vec<String>,

        /// All parameters as one JSON object (overrides --param)
        #[arg(long)]
        params_json: Option<String>,
    },

    /// List job history
    Jobs,

    /// Fetch the current status of one job
    Status {
        /// Job ID
        job_id: String,
    },

    /// Poll a job until it reaches a terminal state
    Watch {
        /// Job ID
        job_id: String,
    },

    /// Cancel a non-terminal job
    Cancel {
        /// Job ID
        job_id: String,
    },
}

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "type")]
    report_type: String,
    name: String,
    category: String,
    #[tabled(rename = "params")]
    parameter_count: usize,
}

#[derive(Tabled)]
struct JobRow {
    #[tabled(rename = "job id")]
    job_id: String,
    #[tabled(rename = "type")]
    report_type: String,
    status: String,
    progress: String,
    submitted: String,
}

impl From<&ReportJob> for JobRow {
    fn from(job: &ReportJob) -> Self {
        Self {
            job_id: job.job_id.clone(),
            report_type: job.report_type.clone().unwrap_or_default(),
            status: job.status.clone().unwrap_or_else(|| "unknown".to_string()),
            progress: job
                .progress
                .map(|p| format!("{p:.0}%"))
                .unwrap_or_default(),
            submitted: job.submitted_at.clone().unwrap_or_default(),
        }
    }
}

fn init_logging() {
    let log_format = std::env::var("REPORTRACK_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("reportrack=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
}

/// Build a `{"key": value}` object from repeated `key=value` flags; values
/// that parse as JSON keep their type, anything else stays a string
fn parse_params(pairs: &[String]) -> Result<serde_json::Value> {
    let mut map = serde_json::Map::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .with_context(|| format!("invalid --param '{pair}', expected key=value"))?;
        let value = serde_json::from_str(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
        map.insert(key.to_string(), value);
    }
    Ok(serde_json::Value::Object(map))
}

fn print_job(job: &ReportJob) {
    let table = Table::new(vec![JobRow::from(job)]).to_string();
    println!("{table}");
    if let Some(url) = &job.download_url {
        println!("  {} {}", "Download:".bold(), url);
    }
    if let Some(message) = &job.message {
        println!("  {} {}", "Message:".bold(), message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let backend = Arc::new(
        HttpReportBackend::new(BackendConfig::new(&cli.base_url))
            .context("Failed to build HTTP backend")?,
    );
    let session = ReportSession::new(backend, Arc::new(SystemTimeProvider));

    match cli.command {
        Commands::Reports => {
            let reports = session.reports().await?;
            if reports.is_empty() {
                println!("{}", "No report types available".yellow());
                return Ok(());
            }
            let rows: Vec<ReportRow> = reports
                .iter()
                .map(|def| ReportRow {
                    report_type: def.report_type.clone(),
                    name: def.name.clone(),
                    category: def.category.clone().unwrap_or_default(),
                    parameter_count: def.parameters.len(),
                })
                .collect();
            println!("{}", Table::new(rows));
        }

        Commands::Run {
            report_type,
            params,
            params_json,
        } => {
            let parameters = match params_json {
                Some(raw) => {
                    Some(serde_json::from_str(&raw).context("Invalid --params-json value")?)
                }
                None if !params.is_empty() => Some(parse_params(&params)?),
                None => None,
            };

            let job = session.submit(&report_type, parameters).await?;
            session.shutdown();

            println!("{}", "✓ Report job submitted".green().bold());
            println!("  {} {}", "Job ID:".bold(), job.job_id);
        }

        Commands::Jobs => {
            session.tracked_jobs().await?;
            session.shutdown();

            let history = session.history();
            if history.is_empty() {
                println!("{}", "No jobs in history".yellow());
                return Ok(());
            }
            let rows: Vec<JobRow> = history.iter().map(JobRow::from).collect();
            println!("{}", Table::new(rows));
        }

        Commands::Status { job_id } => {
            let job = session.refresh(&job_id).await?;
            session.shutdown();
            print_job(&job);
        }

        Commands::Watch { job_id } => loop {
            let job = match session.refresh(&job_id).await {
                Ok(job) => job,
                Err(e) => {
                    // A failed refresh is not a job failure; keep watching
                    eprintln!("{} {}", "Last refresh failed:".yellow(), e);
                    tokio::time::sleep(POLL_INTERVAL).await;
                    continue;
                }
            };
            let status = job.status.clone().unwrap_or_else(|| "unknown".to_string());
            let progress = job.progress.map(|p| format!(" {p:.0}%")).unwrap_or_default();
            println!("{} {}{}", job.job_id.bold(), status, progress);

            if job.is_terminal() {
                session.shutdown();
                if status.eq_ignore_ascii_case("failed") {
                    if let Some(message) = &job.message {
                        eprintln!("{} {}", "Failure:".red().bold(), message);
                    }
                    std::process::exit(1);
                }
                if let Some(url) = &job.download_url {
                    println!("{} {}", "Download:".green().bold(), url);
                }
                break;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        },

        Commands::Cancel { job_id } => {
            let job = session.cancel(&job_id).await?;
            session.shutdown();
            println!(
                "{}",
                format!(
                    "✓ Job {} cancellation requested (status: {})",
                    job.job_id,
                    job.status.as_deref().unwrap_or("unknown")
                )
                .green()
                .bold()
            );
        }
    }

    Ok(())
}
