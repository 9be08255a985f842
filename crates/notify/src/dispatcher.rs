//! Ordered, all-or-nothing delivery of a run's payloads.
//!
//! Payloads go out one after another through a single channel. The first
//! failure stops the sequence: later payloads are not attempted and the
//! whole delivery is reported as failed.

use crate::traits::{DispatchResult, Notification, Notifier, NotifyError};

/// Delivers payload sequences through one notifier channel.
pub struct Dispatcher {
    channel: Box<dyn Notifier>,
}

impl Dispatcher {
    pub fn new(channel: Box<dyn Notifier>) -> Self {
        Self { channel }
    }

    pub fn channel_name(&self) -> &str {
        self.channel.channel_name()
    }

    /// Deliver every payload in order.
    ///
    /// Returns one result per payload when all of them were delivered, or
    /// [`NotifyError::Undelivered`] for the first payload that failed.
    pub async fn deliver_all(
        &self,
        payloads: &[String],
    ) -> Result<Vec<DispatchResult>, NotifyError> {
        let parts = payloads.len();
        let mut results = Vec::with_capacity(parts);

        for (index, body) in payloads.iter().enumerate() {
            let notification = Notification {
                body: body.clone(),
                part: index + 1,
                parts,
            };

            let start = std::time::Instant::now();
            let result = self.channel.send(&notification).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(()) => {
                    tracing::info!(
                        channel = self.channel.channel_name(),
                        part = notification.part,
                        parts,
                        duration_ms,
                        "Notification delivered"
                    );
                    results.push(DispatchResult {
                        channel: self.channel.channel_name().to_string(),
                        part: notification.part,
                        duration_ms,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        channel = self.channel.channel_name(),
                        part = notification.part,
                        parts,
                        error = %e,
                        duration_ms,
                        "Notification delivery failed, aborting remaining payloads"
                    );
                    return Err(NotifyError::Undelivered {
                        part: notification.part,
                        parts,
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(results)
    }
}
