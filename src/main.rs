use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod github;
mod report;

use config::{Credentials, DateRange, ReportRequest, Verbosity, DEFAULT_API_URL};

#[derive(Parser)]
#[command(name = "release-report")]
#[command(about = "Report the releases published across a GitHub organization in a date range")]
struct Cli {
    /// Start date for range (YYYY-MM-DD), exclusive
    #[arg(short = 's', long = "start-date", value_parser = parse_date)]
    start_date: NaiveDate,

    /// End date for range (YYYY-MM-DD), exclusive; must be after the start date
    #[arg(short = 'e', long = "end-date", value_parser = parse_date)]
    end_date: NaiveDate,

    /// GitHub organization
    #[arg(short = 'o', long = "organization", env = "GITHUB_ORG")]
    org: String,

    /// GitHub user for basic auth
    #[arg(short = 'u', long, env = "GITHUB_USER")]
    user: String,

    /// GitHub token for basic auth (can also be set via GITHUB_TOKEN env var)
    #[arg(short = 't', long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// URL of the GitHub API
    #[arg(short = 'a', long = "api_url", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Directory for the report files (defaults to the executable's directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print INFO, WARNING, and ERROR messages to stderr
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Print DEBUG messages to stderr
    #[arg(short = 'd', long)]
    debug: bool,
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got {:?}: {}", value, e))
}

fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let range = DateRange::new(cli.start_date, cli.end_date)?;
    let request = ReportRequest::new(
        cli.org,
        Credentials {
            user: cli.user,
            token: cli.token,
        },
        &cli.api_url,
        range,
        Verbosity::from_flags(cli.verbose, cli.debug),
        cli.output_dir,
    )?;

    init_logging(request.verbosity);
    tracing::debug!(?request, "parsed request");

    let files = report::run(&request)
        .await
        .with_context(|| format!("failed to build release report for {}", request.organization))?;

    println!("{}", files.csv.display());
    println!("{}", files.xlsx.display());

    Ok(())
}
