// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::aggregator::{Aggregator, JobBoard};
use crate::browser::{SnapshotLauncher, WebDriverLauncher};
use crate::config::AppConfig;
use crate::core::{Database, FsOps};
use crate::models::{JobPosting, JobSource};
use crate::scrape::{ScrapeReport, SourceScraper};
use crate::web::start_web_server;

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(about = "Scrape job boards into a deduplicated local listing")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./config.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the job list over HTTP
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Scrape every source, then print all stored jobs
    Scrape,
    /// Print all stored jobs, newest first
    List,
    /// Run one source's pipeline against a saved results page
    Replay {
        source: JobSource,
        html_file: PathBuf,
        /// Use a throwaway in-memory store
        #[arg(long)]
        dry_run: bool,
    },
}

pub async fn handle_command(command: Command, mut config: AppConfig) -> Result<()> {
    match command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            start_web_server(config).await
        }

        Command::Scrape => print_listing(&config, true).await,

        Command::List => print_listing(&config, false).await,

        Command::Replay {
            source,
            html_file,
            dry_run,
        } => {
            let report = replay(&config, source, &html_file, dry_run).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

async fn print_listing(config: &AppConfig, scrape: bool) -> Result<()> {
    let database = Database::new(&config.database_path).await?;
    let board = JobBoard::new(Aggregator::new(
        WebDriverLauncher,
        database.jobs(),
        config.launch_config(),
        config.sources(),
    ));

    let listing = board.listing(scrape).await?;

    if let Some(report) = &listing.report {
        for source in &report.reports {
            println!("{}", summary_line(source));
        }
        println!();
    }

    if listing.jobs.is_empty() {
        println!("No jobs stored yet.");
        return Ok(());
    }

    for job in &listing.jobs {
        println!("{}", listing_line(job));
    }
    Ok(())
}

async fn replay(
    config: &AppConfig,
    source: JobSource,
    html_file: &Path,
    dry_run: bool,
) -> Result<ScrapeReport> {
    let definition = config
        .sources()
        .into_iter()
        .find(|definition| definition.source == source)
        .with_context(|| format!("No source configured for {}", source))?
        .without_pauses();

    let html = FsOps::read_file_safe(html_file).await?;
    let launcher = SnapshotLauncher::new().with_page(definition.search_url.clone(), html);
    let launch = config.launch_config();

    let database = if dry_run {
        Database::in_memory().await?
    } else {
        Database::new(&config.database_path).await?
    };
    let store = database.jobs();

    info!("Replaying {} against {}", source, html_file.display());
    Ok(SourceScraper::new(&launcher, &store, &launch, &definition)
        .run()
        .await)
}

fn summary_line(report: &ScrapeReport) -> String {
    let mut line = format!(
        "{:<9} cards: {:<4} saved: {:<4} duplicates: {:<4} skipped: {:<4} failed: {}",
        report.source,
        report.cards_found,
        report.saved,
        report.duplicates,
        report.skipped_total(),
        report.failed
    );
    if let Some(error) = &report.error {
        line.push_str(&format!("  ({})", error));
    }
    line
}

fn listing_line(job: &JobPosting) -> String {
    format!(
        "{:<5} {:<60} {:<20} posted {}  expires {}  {}",
        job.id,
        job.to_string(),
        job.location,
        job.date_posted.format("%Y-%m-%d"),
        job.expiry_date.format("%Y-%m-%d"),
        job.link
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_replay() {
        let cli = Cli::parse_from(["jobscout", "replay", "linkedin", "page.html", "--dry-run"]);
        match cli.command {
            Command::Replay {
                source,
                html_file,
                dry_run,
            } => {
                assert_eq!(source, JobSource::LinkedIn);
                assert_eq!(html_file, PathBuf::from("page.html"));
                assert!(dry_run);
            }
            _ => panic!("expected replay"),
        }
    }

    #[tokio::test]
    async fn test_replay_dry_run_reads_saved_page() {
        let path = std::env::temp_dir().join(format!("jobscout-replay-{}.html", std::process::id()));
        tokio::fs::write(
            &path,
            r#"<html><body><div class="job_seen_beacon">
                 <h2 class="jobTitle"><a href="/rc/clk?jk=1"><span>Rust Engineer</span></a></h2>
               </div></body></html>"#,
        )
        .await
        .unwrap();

        let report = replay(&AppConfig::default(), JobSource::Indeed, &path, true).await;
        tokio::fs::remove_file(&path).await.unwrap();

        let report = report.unwrap();
        assert!(report.completed());
        assert_eq!(report.cards_found, 1);
        assert_eq!(report.saved, 1);
    }

    #[test]
    fn test_summary_line_mentions_failure() {
        let mut report = ScrapeReport::new(JobSource::Indeed);
        report.error = Some("Indeed job cards did not load within 15s".to_string());
        let line = summary_line(&report);
        assert!(line.starts_with("Indeed"));
        assert!(line.ends_with("(Indeed job cards did not load within 15s)"));
    }
}
