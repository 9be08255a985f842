//! A single notifier run.
//!
//! Steps run strictly in sequence: read the marker, fetch the feed, gate on
//! the fingerprint, render, chunk, deliver, commit. The marker write is the
//! last step and happens only after every payload was delivered.

use svitlo_core::Fingerprint;
use svitlo_notify::Dispatcher;
use svitlo_report::{split_for_delivery, ReportBuilder};
use tracing::{debug, info, warn};

use crate::error::RunError;
use crate::gate::{evaluate, Gate};
use crate::source::FeedSource;
use crate::store::RevisionStore;

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The feed revision was already delivered.
    Unchanged { fingerprint: Fingerprint },
    /// New revision, but the feed held nothing to report. Marker untouched.
    NothingToReport { fingerprint: Fingerprint },
    /// Rendered without delivering. Marker untouched.
    DryRun {
        fingerprint: Fingerprint,
        payloads: Vec<String>,
    },
    /// Every payload delivered and the marker committed.
    Delivered { fingerprint: Fingerprint, parts: usize },
}

pub struct Pipeline {
    source: Box<dyn FeedSource>,
    store: Box<dyn RevisionStore>,
    builder: ReportBuilder,
    /// `None` renders without delivering.
    dispatcher: Option<Dispatcher>,
    max_message_len: usize,
    force: bool,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn FeedSource>,
        store: Box<dyn RevisionStore>,
        builder: ReportBuilder,
        dispatcher: Option<Dispatcher>,
        max_message_len: usize,
    ) -> Self {
        Self {
            source,
            store,
            builder,
            dispatcher,
            max_message_len,
            force: false,
        }
    }

    /// Deliver even when the revision was already delivered.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub async fn run_once(&self) -> Result<RunOutcome, RunError> {
        let marker = self.store.read()?;

        info!(source = %self.source.describe(), "Fetching feed");
        let feed = self.source.fetch().await?;

        let fingerprint = feed.fingerprint();
        if fingerprint.is_empty() {
            warn!("Feed carries no contentHash");
        }

        match evaluate(&fingerprint, marker.as_ref()) {
            Gate::Unchanged if !self.force => {
                info!(fingerprint = %fingerprint.short(), "No updates detected");
                return Ok(RunOutcome::Unchanged { fingerprint });
            }
            Gate::Unchanged => info!(fingerprint = %fingerprint.short(), "Revision unchanged, forcing delivery"),
            Gate::Changed => info!(
                fingerprint = %fingerprint.short(),
                previous = %marker.as_ref().map(|m| m.short()).unwrap_or("(none)"),
                "New schedule revision detected"
            ),
        }

        let text = self.builder.build(&feed)?;
        if text.trim().is_empty() {
            warn!(fingerprint = %fingerprint.short(), "Nothing to report, marker not updated");
            return Ok(RunOutcome::NothingToReport { fingerprint });
        }
        debug!(report = %text, "Generated message");

        let payloads = split_for_delivery(&text, self.max_message_len);

        let Some(dispatcher) = &self.dispatcher else {
            info!(parts = payloads.len(), "Dry run, skipping delivery");
            return Ok(RunOutcome::DryRun {
                fingerprint,
                payloads,
            });
        };

        let results = dispatcher.deliver_all(&payloads).await?;

        self.store.write(&fingerprint)?;
        info!(
            fingerprint = %fingerprint.short(),
            channel = dispatcher.channel_name(),
            parts = results.len(),
            "Revision delivered, marker saved"
        );

        Ok(RunOutcome::Delivered {
            fingerprint,
            parts: results.len(),
        })
    }
}
