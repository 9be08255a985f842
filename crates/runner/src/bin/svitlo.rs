//! svitlo: posts outage schedule updates to a Telegram channel.
//!
//! Meant to be triggered on a schedule (cron, CI). Each invocation performs
//! exactly one run and exits.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use svitlo_core::config::{load_dotenv, parse_groups};
use svitlo_core::Config;
use svitlo_notify::{Dispatcher, TelegramNotifier};
use svitlo_report::{ReportBuilder, ReportRenderer, GROUP_SEPARATOR, UKRAINIAN};
use svitlo_runner::{
    FeedSource, FileFeedSource, FileRevisionStore, HttpFeedSource, Pipeline, RunOutcome,
};

// ── CLI ─────────────────────────────────────────────────────────────

/// Posts power outage schedule updates, once per feed revision.
#[derive(Parser, Debug)]
#[command(name = "svitlo", version, about)]
struct Cli {
    /// Feed URL, or a path to a local JSON file (overrides SVITLO_FEED_URL).
    #[arg(long)]
    feed_url: Option<String>,

    /// Revision marker file (overrides SVITLO_MARKER_PATH).
    #[arg(long)]
    marker: Option<PathBuf>,

    /// Comma-separated groups to report, in order (overrides SVITLO_GROUPS).
    #[arg(long)]
    groups: Option<String>,

    /// Day template file (overrides SVITLO_TEMPLATE_PATH).
    #[arg(long)]
    template: Option<PathBuf>,

    /// Render and print the report without sending or saving the marker.
    #[arg(long)]
    dry_run: bool,

    /// Deliver even if this revision was already delivered.
    #[arg(long)]
    force: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(ref url) = self.feed_url {
            config.feed.url = url.clone();
        }
        if let Some(ref marker) = self.marker {
            config.marker.path = marker.clone();
        }
        if let Some(ref groups) = self.groups {
            config.schedule.groups = parse_groups(groups);
        }
        if let Some(ref template) = self.template {
            config.schedule.template_path = Some(template.clone());
        }
    }
}

// ── wiring ──────────────────────────────────────────────────────────

fn build_pipeline(config: &Config, cli: &Cli) -> Result<Pipeline> {
    let timeout = Duration::from_secs(config.feed.timeout_secs);

    let url = &config.feed.url;
    let source: Box<dyn FeedSource> = if url.starts_with("http://") || url.starts_with("https://") {
        Box::new(HttpFeedSource::new(url.clone(), timeout).context("failed to build HTTP client")?)
    } else {
        Box::new(FileFeedSource::new(url.trim_start_matches("file://")))
    };

    let mut renderer =
        ReportRenderer::new(&UKRAINIAN).with_group_prefix(config.schedule.group_prefix.clone());
    if let Some(ref path) = config.schedule.template_path {
        renderer = renderer
            .with_template_file(path)
            .with_context(|| format!("invalid day template {}", path.display()))?;
    }
    let builder = ReportBuilder::new(
        renderer,
        config.schedule.groups.clone(),
        config.schedule.timezone,
    )
    .with_policy(config.schedule.maybe_policy);

    let dispatcher = if cli.dry_run {
        None
    } else {
        let tg = &config.telegram;
        let (Some(token), Some(chat_id)) = (tg.bot_token.clone(), tg.chat_id.clone()) else {
            anyhow::bail!(
                "Telegram credentials not configured (TELEGRAM_BOT_TOKEN, TELEGRAM_CHANNEL_ID); use --dry-run to preview"
            );
        };
        let notifier = TelegramNotifier::from_config(token, chat_id, tg.parse_mode.clone(), timeout)
            .context("failed to configure Telegram notifier")?
            .with_api_base(tg.api_base.clone());
        Some(Dispatcher::new(Box::new(notifier)))
    };

    Ok(Pipeline::new(
        source,
        Box::new(FileRevisionStore::new(config.marker.path.clone())),
        builder,
        dispatcher,
        config.telegram.max_message_len,
    )
    .with_force(cli.force))
}

async fn run(cli: Cli) -> Result<RunOutcome> {
    load_dotenv();
    let mut config = Config::from_env().context("failed to load configuration")?;
    cli.apply(&mut config);
    config.log_summary();

    let pipeline = build_pipeline(&config, &cli)?;
    Ok(pipeline.run_once().await?)
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(RunOutcome::DryRun { payloads, .. }) => {
            println!("{}", payloads.join(GROUP_SEPARATOR));
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            info!(?outcome, "Run finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "Run failed, revision marker not updated");
            ExitCode::FAILURE
        }
    }
}
