//! Terminal printer watch: poll one tenant and report status changes.
//!
//! Polling and repainting run on separate intervals, mirroring the browser
//! console. A failed poll keeps the last list; only a rejected session stops
//! the watch.

#[cfg(test)]
#[path = "watch_test.rs"]
mod watch_test;

use std::collections::HashMap;
use std::time::Duration;

use fleet::error::FleetError;
use fleet::freshness::{DecoratedPrinter, FreshnessTracker, PrinterStatus};
use fleet::model::{PrinterBatch, RejectedRecord};
use fleet::poll::TenantPoller;
use tokio::time::{MissedTickBehavior, interval};

use crate::client::FleetClient;
use crate::render;

/// Intervals for [`run`].
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    pub poll: Duration,
    pub repaint: Duration,
    pub max_polls: Option<u64>,
}

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

pub fn log_rejected(tenant_id: &str, rejected: &[RejectedRecord]) {
    for record in rejected {
        tracing::warn!(tenant = %tenant_id, index = record.index, reason = %record.reason, "printer record skipped");
    }
}

/// One line per printer whose status differs from `before`.
///
/// Only status label changes count; sticky and fresh online read the same.
/// Printers missing from `before` are reported as new; printers gone from
/// `after` as removed.
pub fn status_changes(before: &[DecoratedPrinter], after: &[DecoratedPrinter]) -> Vec<String> {
    let previous: HashMap<&str, PrinterStatus> =
        before.iter().map(|p| (p.record.id.as_str(), p.status)).collect();
    let mut lines = Vec::new();
    for printer in after {
        let label = printer.record.label();
        match previous.get(printer.record.id.as_str()) {
            None => lines.push(format!("+ {label}: {}", printer.status.label())),
            Some(old) if old.label() != printer.status.label() => {
                lines.push(format!("{label}: {} -> {}", old.label(), printer.status.label()));
            }
            Some(_) => {}
        }
    }
    for printer in before {
        if !after.iter().any(|p| p.record.id == printer.record.id) {
            lines.push(format!("- {}", printer.record.label()));
        }
    }
    lines
}

/// Where the watch loop gets printer lists from.
#[allow(async_fn_in_trait)]
pub trait PrinterSource {
    async fn fetch_printers(&self, tenant_id: &str, region: &str) -> Result<PrinterBatch, FleetError>;
}

impl PrinterSource for FleetClient {
    async fn fetch_printers(&self, tenant_id: &str, region: &str) -> Result<PrinterBatch, FleetError> {
        self.printers(tenant_id, region).await
    }
}

/// Watch `tenant_id` until `shutdown` resolves or `max_polls` is reached.
///
/// `shutdown` is also raced against each in-flight request.
///
/// # Errors
///
/// [`FleetError::Unauthorized`] when the backend rejects the session.
pub async fn run<S: PrinterSource>(
    source: &S,
    tenant_id: &str,
    region: &str,
    cadence: Cadence,
    shutdown: impl Future<Output = ()>,
) -> Result<(), FleetError> {
    let mut poller = TenantPoller::default();
    let handle = poller.select(tenant_id);
    let mut tracker = FreshnessTracker::default();
    let mut printers: Vec<DecoratedPrinter> = Vec::new();
    let mut polls = 0_u64;
    let mut first = true;

    let mut poll_tick = interval(cadence.poll);
    poll_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut repaint_tick = interval(cadence.repaint);
    repaint_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Both intervals fire immediately; the first poll covers the repaint.
    repaint_tick.tick().await;

    tokio::pin!(shutdown);

    'watch: loop {
        tokio::select! {
            _ = poll_tick.tick() => {
                polls += 1;
                let Some(token) = poller.issue(&handle) else { break };
                let reply = tokio::select! {
                    reply = source.fetch_printers(tenant_id, region) => reply,
                    () = &mut shutdown => {
                        tracing::info!("watch interrupted during a poll");
                        break 'watch;
                    }
                };
                match reply {
                    Ok(batch) if poller.accepts(&token) => {
                        log_rejected(tenant_id, &batch.rejected);
                        let out = tracker.reconcile(&batch.records, now_ms());
                        log_rejected(tenant_id, &out.rejected);
                        if first {
                            print!("{}", render::printer_table(&out.printers));
                            first = false;
                        } else {
                            for line in status_changes(&printers, &out.printers) {
                                println!("{line}");
                            }
                        }
                        println!("{}", render::online_summary(&out.printers));
                        printers = out.printers;
                    }
                    Ok(_) => {}
                    Err(e) if e.requires_login() => return Err(e),
                    Err(e) => tracing::warn!(tenant = %tenant_id, error = %e, "printer poll failed; keeping last list"),
                }
                if cadence.max_polls.is_some_and(|max| polls >= max) {
                    break;
                }
            }
            _ = repaint_tick.tick() => {
                let before = printers.clone();
                tracker.repaint(&mut printers, now_ms());
                for line in status_changes(&before, &printers) {
                    println!("{line}");
                }
            }
            () = &mut shutdown => {
                tracing::info!("watch interrupted");
                break;
            }
        }
    }
    poller.clear();
    Ok(())
}
