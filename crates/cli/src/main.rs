//! Dormant CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: load `.env`, parse flags and environment
//!    variables, and validate them into a [`report::RunConfig`] before any
//!    API access happens.
//! 2. **Wire observability**: configure `tracing-subscriber` with an env
//!    filter and a compact or JSON format layer. All `tracing` events emitted
//!    by every crate in the workspace flow through this layer.
//! 3. **Construct infrastructure**: create the [`github::GithubClient`] and
//!    inject it, together with a console progress sink and the rate limiter,
//!    into the collector.
//! 4. **Drive the run loop**: one organization at a time, a fresh ledger for
//!    each; write one CSV report per organization that completes.

mod config;
mod console;
mod output;

use std::env;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, Instrument};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use collector::{ActivityCollector, RateLimiter, RosterReconciler};
use github::{GithubClient, TokioDelay};
use report::{ActivityLedger, OrgName, Progress, RunId, SilentProgress, Timestamp};

use crate::config::{AppConfig, Cli};
use crate::console::ConsoleProgress;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DORMANT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("cli=info,collector=info,github=info,warn"));

    let format = env::var("DORMANT_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);
    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; flags and real environment still apply.
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = config::load(cli)?;

    let run_id = RunId::new_random();
    run(config)
        .instrument(tracing::info_span!("report_run", id = %run_id))
        .await
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let client = GithubClient::new(config.run.token(), &config.api_url)
        .context("constructing the GitHub client")?;

    let progress: Box<dyn Progress> = if config.quiet {
        Box::new(SilentProgress)
    } else {
        Box::new(ConsoleProgress)
    };

    let now = Timestamp::now();
    let orgs = config.run.organizations();
    let mut failed = 0;

    for org in orgs {
        match run_org(&client, progress.as_ref(), org, &config, now).await {
            Ok(()) => info!(org = %org, "organization complete"),
            Err(err) => {
                failed += 1;
                error!(org = %org, error = %err, "organization failed");
                eprintln!("skipping organization '{org}': {err:#}");
            }
        }
    }

    if failed == orgs.len() {
        anyhow::bail!("all {} organization(s) failed", orgs.len());
    }
    Ok(())
}

async fn run_org(
    client: &GithubClient,
    progress: &dyn Progress,
    org: &OrgName,
    config: &AppConfig,
    now: Timestamp,
) -> anyhow::Result<()> {
    let threshold = config.run.threshold();
    let cutoff = threshold.cutoff_from(now);

    // Fresh ledger and limiter per organization; nothing crosses runs.
    let mut ledger = ActivityLedger::new();
    let limiter = RateLimiter::with_defaults(Arc::new(TokioDelay));
    let mut activity = ActivityCollector::new(client, progress, limiter);

    let summary = activity
        .collect(org, cutoff, &mut ledger)
        .await
        .context("enumerating repositories")?;

    if !summary.is_complete() {
        eprintln!(
            "warning: {} unit(s) skipped for '{org}'; the report may be partial",
            summary.skipped_units()
        );
        for unit in summary.repos_skipped.iter().chain(&summary.branches_skipped) {
            match &unit.branch {
                Some(branch) => eprintln!("  {}@{}: {}", unit.repo, branch, unit.reason),
                None => eprintln!("  {}: {}", unit.repo, unit.reason),
            }
        }
    }

    let rows = RosterReconciler::new(client, progress)
        .reconcile(org, &ledger, threshold, now)
        .await?;

    let path = output::write_report(&config.output_dir, org, &rows, now)
        .context("writing the report file")?;

    info!(
        org = %org,
        rows = rows.len(),
        events = summary.events_recorded,
        skipped = summary.skipped_units(),
        report = %path.display(),
        "report written"
    );
    if !config.quiet {
        println!("report for '{org}' written to {}", path.display());
    }
    Ok(())
}
