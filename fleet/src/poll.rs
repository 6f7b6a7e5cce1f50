//! Tenant-keyed polling with cancellation by generation.
//!
//! DESIGN
//! ======
//! Every tenant selection bumps a generation counter and returns a
//! [`PollHandle`]. Timers hold the handle and stop once it is no longer
//! active; requests carry a [`RequestToken`] minted from the handle, and a
//! response is applied only if its token still matches the current
//! selection. In-flight requests are never aborted, their results are simply
//! discarded.

#[cfg(test)]
#[path = "poll_test.rs"]
mod poll_test;

/// Interval between printer polls for the selected tenant.
pub const TENANT_POLL_INTERVAL_MS: u32 = 120_000;
/// Interval between freshness repaints with no network input.
pub const REPAINT_INTERVAL_MS: u32 = 15_000;

/// Identifies one selection of a tenant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PollHandle {
    pub tenant_id: String,
    pub generation: u64,
}

/// Tag attached to a request issued under a [`PollHandle`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RequestToken {
    pub tenant_id: String,
    pub generation: u64,
    /// Sequence number within the generation.
    pub seq: u64,
}

/// Tracks the active tenant and whether a response still applies.
#[derive(Clone, Debug, Default)]
pub struct TenantPoller {
    current: Option<PollHandle>,
    generation: u64,
    next_seq: u64,
}

impl TenantPoller {
    /// Make `tenant_id` the active tenant, cancelling every earlier handle.
    pub fn select(&mut self, tenant_id: impl Into<String>) -> PollHandle {
        self.generation += 1;
        self.next_seq = 0;
        let handle = PollHandle {
            tenant_id: tenant_id.into(),
            generation: self.generation,
        };
        self.current = Some(handle.clone());
        handle
    }

    /// Stop polling altogether.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.current = None;
    }

    #[must_use]
    pub fn current(&self) -> Option<&PollHandle> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn is_active(&self, handle: &PollHandle) -> bool {
        self.current.as_ref() == Some(handle)
    }

    /// Mint a token for a new request, or `None` if `handle` was cancelled.
    pub fn issue(&mut self, handle: &PollHandle) -> Option<RequestToken> {
        if !self.is_active(handle) {
            return None;
        }
        self.next_seq += 1;
        Some(RequestToken {
            tenant_id: handle.tenant_id.clone(),
            generation: handle.generation,
            seq: self.next_seq,
        })
    }

    /// Whether a response tagged with `token` may be applied.
    #[must_use]
    pub fn accepts(&self, token: &RequestToken) -> bool {
        self.current
            .as_ref()
            .is_some_and(|h| h.generation == token.generation && h.tenant_id == token.tenant_id)
    }
}
