//! Monitor console state: tenants, the selected tenant and its printers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The monitor page reads and writes this through an `RwSignal`. Printer
//! freshness is owned by the embedded [`FreshnessTracker`]; polling identity
//! by the [`TenantPoller`].
//!
//! DESIGN
//! ======
//! Selecting a tenant clears the printer list and tracker at once and starts a
//! new poll generation. Printer responses carry a [`RequestToken`]; a response
//! minted for an earlier selection is dropped on arrival, so a slow reply for
//! tenant A can never paint over tenant B.

#[cfg(test)]
#[path = "console_test.rs"]
mod console_test;

use fleet::freshness::{DecoratedPrinter, FreshnessTracker};
use fleet::model::{CreatedTenant, PrinterBatch, RejectedRecord, Tenant};
use fleet::poll::{PollHandle, RequestToken, TenantPoller};
use fleet::report::AgentConfig;

/// Dismissible message shown above the console.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Banner {
    Error(String),
    Success(String),
}

/// Console state for the signed-in scope.
#[derive(Clone, Debug, Default)]
pub struct ConsoleState {
    pub tenants: Vec<Tenant>,
    pub tenants_loading: bool,
    pub selected: Option<String>,
    pub printers: Vec<DecoratedPrinter>,
    pub printers_loading: bool,
    pub expanded_printer: Option<String>,
    pub tracker: FreshnessTracker,
    pub poller: TenantPoller,
    pub banner: Option<Banner>,
    /// Agent setup shown in the API-key dialog.
    pub agent_dialog: Option<AgentConfig>,
    /// Printer awaiting cut confirmation.
    pub confirm_cut: Option<String>,
    pub confirm_delete_tenant: bool,
    /// Tenant create/delete or key lookup in flight.
    pub tenant_busy: bool,
    pub cut_busy: Option<String>,
    pub pdf_busy: Option<String>,
}

impl ConsoleState {
    /// Drop everything tied to the current scope.
    ///
    /// The poller keeps counting generations so handles from before the reset
    /// stay cancelled.
    pub fn reset(&mut self) {
        let mut poller = std::mem::take(&mut self.poller);
        poller.clear();
        *self = Self {
            poller,
            ..Self::default()
        };
    }

    /// Store a fresh tenant list and pick the tenant to show.
    ///
    /// The remembered tenant wins if it is still listed; a single tenant is
    /// selected automatically. Returns the poll handle of the new selection.
    pub fn set_tenants(&mut self, tenants: Vec<Tenant>, remembered: Option<&str>) -> Option<PollHandle> {
        self.tenants = tenants;
        self.tenants_loading = false;
        let pick = remembered
            .and_then(|id| self.tenants.iter().find(|t| t.id == id))
            .or_else(|| match self.tenants.as_slice() {
                [only] => Some(only),
                _ => None,
            })
            .map(|t| t.id.clone());
        match pick {
            Some(id) => Some(self.select(id)),
            None => {
                self.clear_selection();
                None
            }
        }
    }

    /// Switch to `tenant_id`, discarding the previous tenant's printers.
    pub fn select(&mut self, tenant_id: String) -> PollHandle {
        self.printers.clear();
        self.tracker.clear();
        self.expanded_printer = None;
        self.confirm_cut = None;
        self.printers_loading = false;
        self.selected = Some(tenant_id.clone());
        self.poller.select(tenant_id)
    }

    pub fn clear_selection(&mut self) {
        self.printers.clear();
        self.tracker.clear();
        self.expanded_printer = None;
        self.confirm_cut = None;
        self.printers_loading = false;
        self.selected = None;
        self.poller.clear();
    }

    #[must_use]
    pub fn selected_tenant(&self) -> Option<&Tenant> {
        let id = self.selected.as_deref()?;
        self.tenants.iter().find(|t| t.id == id)
    }

    /// Start a printer fetch for the active selection.
    pub fn begin_fetch(&mut self, handle: &PollHandle) -> Option<RequestToken> {
        let token = self.poller.issue(handle)?;
        self.printers_loading = true;
        Some(token)
    }

    /// Apply a printer response.
    ///
    /// Returns `None` if the response belongs to an earlier selection,
    /// otherwise the records rejected while decoding or reconciling.
    pub fn apply_printers(&mut self, token: &RequestToken, batch: PrinterBatch, now: i64) -> Option<Vec<RejectedRecord>> {
        if !self.poller.accepts(token) {
            return None;
        }
        let out = self.tracker.reconcile(&batch.records, now);
        self.printers = out.printers;
        self.printers_loading = false;
        if self
            .expanded_printer
            .as_deref()
            .is_some_and(|id| !self.printers.iter().any(|p| p.record.id == id))
        {
            self.expanded_printer = None;
        }
        let mut rejected = batch.rejected;
        rejected.extend(out.rejected);
        Some(rejected)
    }

    /// Record a failed printer fetch. Stale failures are ignored.
    pub fn fail_fetch(&mut self, token: &RequestToken, message: String) {
        if self.poller.accepts(token) {
            self.printers_loading = false;
            self.banner = Some(Banner::Error(message));
        }
    }

    /// Re-evaluate freshness without new telemetry.
    pub fn repaint(&mut self, now: i64) {
        self.tracker.repaint(&mut self.printers, now);
    }

    #[must_use]
    pub fn printer(&self, id: &str) -> Option<&DecoratedPrinter> {
        self.printers.iter().find(|p| p.record.id == id)
    }

    #[must_use]
    pub fn online_count(&self) -> usize {
        self.printers.iter().filter(|p| p.is_online()).count()
    }

    pub fn toggle_expanded(&mut self, printer_id: &str) {
        if self.expanded_printer.as_deref() == Some(printer_id) {
            self.expanded_printer = None;
        } else {
            self.expanded_printer = Some(printer_id.to_owned());
        }
    }

    /// Add a tenant confirmed by the backend, select it and open the
    /// API-key dialog.
    pub fn add_created_tenant(&mut self, name: &str, created: &CreatedTenant, api_base: &str) -> PollHandle {
        self.tenants.insert(
            0,
            Tenant {
                id: created.tenant_id.clone(),
                name: name.to_owned(),
                api_key: Some(created.api_key.clone()),
                region: None,
            },
        );
        self.agent_dialog = Some(AgentConfig::for_created(api_base, name, created));
        self.banner = Some(Banner::Success(format!("Tenant created: {name}")));
        self.select(created.tenant_id.clone())
    }

    /// Drop a tenant deleted on the backend.
    ///
    /// Returns whether it was still the selected tenant; a selection made
    /// while the delete was in flight is kept.
    pub fn remove_tenant(&mut self, tenant_id: &str) -> bool {
        self.tenants.retain(|t| t.id != tenant_id);
        self.confirm_delete_tenant = false;
        let was_selected = self.selected.as_deref() == Some(tenant_id);
        if was_selected {
            self.clear_selection();
        }
        was_selected
    }

    pub fn rename_tenant(&mut self, tenant_id: &str, name: &str) {
        if let Some(tenant) = self.tenants.iter_mut().find(|t| t.id == tenant_id) {
            name.clone_into(&mut tenant.name);
        }
    }

    pub fn rename_printer(&mut self, printer_id: &str, name: &str) {
        if let Some(printer) = self.printers.iter_mut().find(|p| p.record.id == printer_id) {
            printer.record.display_name = Some(name.to_owned());
        }
    }

    pub fn remove_printer(&mut self, printer_id: &str) {
        self.printers.retain(|p| p.record.id != printer_id);
        if self.expanded_printer.as_deref() == Some(printer_id) {
            self.expanded_printer = None;
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.banner = Some(Banner::Error(message.into()));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.banner = Some(Banner::Success(message.into()));
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }
}
