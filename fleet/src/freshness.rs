//! Printer freshness tracking: flicker-resistant online/offline status.
//!
//! SYSTEM CONTEXT
//! ==============
//! Site agents report printer telemetry on their own schedule and the console
//! polls the backend on another. Snapshots therefore arrive late, duplicated,
//! out of order, or with a gap where a reading was expected. This module turns
//! that stream into a stable display status.
//!
//! DESIGN
//! ======
//! [`reconcile`] is a pure function of `(previous state, incoming list, now)`.
//! Per printer it remembers the most recent last-seen time ever observed and a
//! `hold_until` instant before which the printer is shown online regardless of
//! staleness. A strictly newer reading pushes `hold_until` to
//! `now + stale_after + grace`. An explicit `online: false` from the backend
//! always wins over local heuristics.
//!
//! State for ids missing from the incoming list is dropped, so the tracked map
//! never outgrows the current snapshot.

#[cfg(test)]
#[path = "freshness_test.rs"]
mod freshness_test;

use std::collections::{HashMap, HashSet};

use crate::model::{PrinterRecord, RejectReason, RejectedRecord};

/// Default age after which a last-seen time alone no longer implies online.
pub const DEFAULT_STALE_AFTER_MS: i64 = 120_000;
/// Default extra time online is held after a fresh reading.
pub const DEFAULT_GRACE_MS: i64 = 60_000;

/// Tuning for the freshness heuristic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreshnessConfig {
    pub stale_after_ms: i64,
    pub grace_ms: i64,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            stale_after_ms: DEFAULT_STALE_AFTER_MS,
            grace_ms: DEFAULT_GRACE_MS,
        }
    }
}

impl FreshnessConfig {
    /// Length of the sticky-online window opened by a fresh reading.
    #[must_use]
    pub fn hold_window_ms(&self) -> i64 {
        self.stale_after_ms.saturating_add(self.grace_ms)
    }
}

/// Remembered per-printer state, keyed by printer id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackedPrinterState {
    /// Most recent non-null last-seen time ever observed (epoch ms).
    pub last_seen_at: Option<i64>,
    /// Printer is forced online while `now < hold_until` (epoch ms).
    pub hold_until: Option<i64>,
}

/// Tracker state across poll cycles.
pub type TrackerState = HashMap<String, TrackedPrinterState>;

/// Display status of a tracked printer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrinterStatus {
    /// Never reported a last-seen time.
    Unseen,
    /// Inside the hold window opened by a fresh reading.
    OnlineSticky,
    /// Outside the hold window but the last reading is recent enough.
    OnlineFresh,
    /// Last reading older than the staleness threshold.
    OfflineStale,
    /// Backend explicitly reported the printer offline.
    OfflineExplicit,
}

impl PrinterStatus {
    #[must_use]
    pub fn is_online(self) -> bool {
        matches!(self, Self::OnlineSticky | Self::OnlineFresh)
    }

    /// Short label for status chips.
    #[must_use]
    pub fn label(self) -> &'static str {
        if self.is_online() { "Online" } else { "Offline" }
    }
}

/// An incoming record decorated with its derived freshness.
#[derive(Clone, Debug, PartialEq)]
pub struct DecoratedPrinter {
    pub record: PrinterRecord,
    /// Effective last-seen time (later of remembered and reported).
    pub last_seen_at: Option<i64>,
    pub hold_until: Option<i64>,
    pub status: PrinterStatus,
}

impl DecoratedPrinter {
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.status.is_online()
    }
}

/// Output of one [`reconcile`] pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reconciliation {
    pub state: TrackerState,
    pub printers: Vec<DecoratedPrinter>,
    pub rejected: Vec<RejectedRecord>,
}

/// Merge an incoming printer list into the remembered state.
///
/// Records with a blank id, and repeated ids within the same batch, are
/// rejected and reported instead of failing the batch.
#[must_use]
pub fn reconcile(
    previous: &TrackerState,
    incoming: &[PrinterRecord],
    now: i64,
    config: FreshnessConfig,
) -> Reconciliation {
    let mut out = Reconciliation::default();
    let mut seen_ids: HashSet<&str> = HashSet::with_capacity(incoming.len());

    for (index, record) in incoming.iter().enumerate() {
        if record.id.trim().is_empty() {
            out.rejected.push(RejectedRecord { index, reason: RejectReason::MissingId });
            continue;
        }
        if !seen_ids.insert(record.id.as_str()) {
            out.rejected.push(RejectedRecord {
                index,
                reason: RejectReason::DuplicateId(record.id.clone()),
            });
            continue;
        }

        let remembered = previous.get(&record.id).copied().unwrap_or_default();
        let tracked = advance(remembered, record.reported_last_seen(), now, config);
        let status = derive_status(tracked, record.reported_online(), now, config);

        out.state.insert(record.id.clone(), tracked);
        out.printers.push(DecoratedPrinter {
            record: record.clone(),
            last_seen_at: tracked.last_seen_at,
            hold_until: tracked.hold_until,
            status,
        });
    }

    out
}

/// Fold one reading into a printer's remembered state.
fn advance(
    remembered: TrackedPrinterState,
    reported: Option<i64>,
    now: i64,
    config: FreshnessConfig,
) -> TrackedPrinterState {
    let effective = match (remembered.last_seen_at, reported) {
        (Some(prev), Some(new)) => Some(prev.max(new)),
        (prev, new) => prev.or(new),
    };

    let newer = match (reported, remembered.last_seen_at) {
        (Some(new), Some(prev)) => new > prev,
        (Some(_), None) => true,
        (None, _) => false,
    };

    let mut hold_until = remembered.hold_until;
    if newer || (hold_until.is_none() && effective.is_some()) {
        hold_until = Some(now.saturating_add(config.hold_window_ms()));
    }

    TrackedPrinterState {
        last_seen_at: effective,
        hold_until,
    }
}

/// Status rule shared by [`reconcile`] and the repaint timer.
#[must_use]
pub fn derive_status(
    tracked: TrackedPrinterState,
    explicit_online: Option<bool>,
    now: i64,
    config: FreshnessConfig,
) -> PrinterStatus {
    if explicit_online == Some(false) {
        return PrinterStatus::OfflineExplicit;
    }
    if tracked.hold_until.is_some_and(|hold| now < hold) {
        return PrinterStatus::OnlineSticky;
    }
    match tracked.last_seen_at {
        None => PrinterStatus::Unseen,
        Some(seen) if now.saturating_sub(seen) <= config.stale_after_ms => PrinterStatus::OnlineFresh,
        Some(_) => PrinterStatus::OfflineStale,
    }
}

/// Stateful owner of [`TrackerState`] for one selected tenant.
///
/// Rendering code reads decorated printers; only this type mutates the
/// remembered state.
#[derive(Clone, Debug, Default)]
pub struct FreshnessTracker {
    config: FreshnessConfig,
    state: TrackerState,
}

impl FreshnessTracker {
    #[must_use]
    pub fn new(config: FreshnessConfig) -> Self {
        Self {
            config,
            state: TrackerState::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> FreshnessConfig {
        self.config
    }

    /// Reconcile a poll result and keep the new state.
    pub fn reconcile(&mut self, incoming: &[PrinterRecord], now: i64) -> Reconciliation {
        let out = reconcile(&self.state, incoming, now, self.config);
        self.state.clone_from(&out.state);
        out
    }

    /// Re-evaluate statuses against `now` without new telemetry.
    pub fn repaint(&self, printers: &mut [DecoratedPrinter], now: i64) {
        for printer in printers {
            let tracked = self
                .state
                .get(&printer.record.id)
                .copied()
                .unwrap_or(TrackedPrinterState {
                    last_seen_at: printer.last_seen_at,
                    hold_until: printer.hold_until,
                });
            printer.status = derive_status(tracked, printer.record.reported_online(), now, self.config);
        }
    }

    /// Forget every printer, e.g. when the selected tenant changes.
    pub fn clear(&mut self) {
        self.state.clear();
    }

    #[must_use]
    pub fn tracked(&self, id: &str) -> Option<TrackedPrinterState> {
        self.state.get(id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}
