//! Monitor page actions: loading, polling and tenant/printer commands.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each action reads and writes the shared [`Stores`] and talks to the
//! backend through `net::api`. Actions run as local tasks; every write after
//! an await re-checks that the data still belongs to the current scope or
//! selection.
//!
//! POLLING
//! =======
//! One loop per selection. The loop owns a [`PollHandle`]; selecting another
//! tenant, clearing the selection or leaving the page makes the handle stale
//! and the loop exits at its next wake-up.

#[cfg(test)]
#[path = "monitor_actions_test.rs"]
mod monitor_actions_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use fleet::auth::validate_tenant_name;
use fleet::folders::{FolderOp, dispatch};
use fleet::model::{CreatedTenant, RejectedRecord};
use fleet::poll::{PollHandle, TENANT_POLL_INTERVAL_MS};
use fleet::report::AgentConfig;
use leptos::prelude::*;

use crate::net::api::{self, HttpFolders};
use crate::state::Stores;
use crate::util::clock::now_ms;

/// Success banner for a registered cut.
fn cut_message(total_pages: u64) -> String {
    format!("Cut registered: {total_pages} pages in the closed period.")
}

/// One log line describing records dropped from a printer batch.
fn rejected_summary(tenant_id: &str, rejected: &[RejectedRecord]) -> Option<String> {
    if rejected.is_empty() {
        return None;
    }
    let details: Vec<String> = rejected
        .iter()
        .map(|r| format!("#{}: {}", r.index, r.reason))
        .collect();
    Some(format!(
        "tenant {tenant_id}: dropped {} printer record(s) ({})",
        rejected.len(),
        details.join("; ")
    ))
}

fn current_revision(stores: Stores) -> u64 {
    stores.session.with_untracked(|s| s.context.revision())
}

fn remember_selection(stores: Stores, tenant_id: Option<&str>) {
    crate::util::storage::save_selected_tenant(tenant_id);
    stores
        .session
        .update(|s| s.context.select_tenant(tenant_id.map(str::to_owned)));
}

/// Load tenants and folders for the current scope.
pub(crate) fn load_scope(stores: Stores, alive: Arc<AtomicBool>) {
    let Some(scope) = stores.session.with_untracked(|s| s.scope().cloned()) else {
        return;
    };
    let revision = current_revision(stores);
    stores.console.update(|c| c.tenants_loading = true);
    stores.folders.update(|f| f.loading = true);

    let tenants_alive = Arc::clone(&alive);
    leptos::task::spawn_local(async move {
        let result = api::fetch_tenants(&scope).await;
        if current_revision(stores) != revision {
            return;
        }
        match result {
            Ok(tenants) => {
                leptos::logging::log!("loaded {} tenant(s) for {}", tenants.len(), scope.tenant_id);
                let remembered = stores
                    .session
                    .with_untracked(|s| s.context.selected_tenant().map(str::to_owned));
                let handle = stores
                    .console
                    .try_update(|c| c.set_tenants(tenants, remembered.as_deref()))
                    .flatten();
                remember_selection(stores, handle.as_ref().map(|h| h.tenant_id.as_str()));
                if let Some(handle) = handle {
                    start_polling(stores, handle, tenants_alive);
                }
            }
            Err(e) => {
                stores.console.update(|c| c.tenants_loading = false);
                stores.report("Loading tenants", &e);
            }
        }
    });

    leptos::task::spawn_local(async move {
        let folders = api::fetch_folders().await;
        let assignments = api::fetch_assignments().await;
        if current_revision(stores) != revision || !alive.load(Ordering::Relaxed) {
            return;
        }
        match (folders, assignments) {
            (Ok(folders), Ok(assignments)) => stores.folders.update(|f| f.load(folders, assignments)),
            (Err(e), _) | (_, Err(e)) => {
                stores.folders.update(|f| f.loading = false);
                stores.report("Loading folders", &e);
            }
        }
    });
}

/// Switch the console to `tenant_id` and start polling it.
pub(crate) fn select_tenant(stores: Stores, tenant_id: String, alive: Arc<AtomicBool>) {
    if stores.console.with_untracked(|c| c.selected.as_deref() == Some(tenant_id.as_str())) {
        return;
    }
    let handle = stores.console.try_update(|c| c.select(tenant_id.clone()));
    remember_selection(stores, Some(&tenant_id));
    if let Some(handle) = handle {
        start_polling(stores, handle, alive);
    }
}

/// Poll the selected tenant until the handle goes stale or the page closes.
pub(crate) fn start_polling(stores: Stores, handle: PollHandle, alive: Arc<AtomicBool>) {
    leptos::task::spawn_local(async move {
        while poll_once(stores, &handle).await {
            sleep_ms(TENANT_POLL_INTERVAL_MS).await;
            let active = stores.console.with_untracked(|c| c.poller.is_active(&handle));
            if !active || !alive.load(Ordering::Relaxed) {
                break;
            }
        }
    });
}

/// Fetch printers once. Returns whether the selection is still active.
pub(crate) async fn poll_once(stores: Stores, handle: &PollHandle) -> bool {
    let Some(token) = stores.console.try_update(|c| c.begin_fetch(handle)).flatten() else {
        return false;
    };
    let Some(region) = stores.session.with_untracked(|s| s.scope().map(|scope| scope.region.clone())) else {
        return false;
    };
    match api::fetch_printers(&handle.tenant_id, &region).await {
        Ok(batch) => {
            let applied = stores
                .console
                .try_update(|c| c.apply_printers(&token, batch, now_ms()))
                .flatten();
            if let Some(line) = applied.and_then(|rejected| rejected_summary(&handle.tenant_id, &rejected)) {
                leptos::logging::warn!("{line}");
            }
        }
        Err(e) if e.requires_login() => {
            stores.expire();
            return false;
        }
        Err(e) => {
            leptos::logging::warn!("printer poll for {} failed: {e}", handle.tenant_id);
            stores
                .console
                .update(|c| c.fail_fetch(&token, format!("Loading printers: {e}")));
        }
    }
    stores.console.with_untracked(|c| c.poller.is_active(handle))
}

/// Refresh the selected tenant now, outside the polling schedule.
pub(crate) fn refresh(stores: Stores) {
    let Some(handle) = stores.console.with_untracked(|c| c.poller.current().cloned()) else {
        return;
    };
    leptos::task::spawn_local(async move {
        poll_once(stores, &handle).await;
    });
}

/// Re-derive printer freshness on a fixed cadence while the page is open.
pub(crate) fn start_repaint(stores: Stores, alive: Arc<AtomicBool>) {
    leptos::task::spawn_local(async move {
        loop {
            sleep_ms(fleet::poll::REPAINT_INTERVAL_MS).await;
            if !alive.load(Ordering::Relaxed) {
                break;
            }
            stores.console.update(|c| c.repaint(now_ms()));
        }
    });
}

pub(crate) fn create_tenant(stores: Stores, name: String, alive: Arc<AtomicBool>) {
    let name = match validate_tenant_name(&name) {
        Ok(name) => name,
        Err(e) => {
            stores.console.update(|c| c.error(e.to_string()));
            return;
        }
    };
    let Some(scope) = stores.session.with_untracked(|s| s.scope().cloned()) else {
        return;
    };
    if stores.console.with_untracked(|c| c.tenant_busy) {
        return;
    }
    stores.console.update(|c| c.tenant_busy = true);
    let revision = current_revision(stores);
    leptos::task::spawn_local(async move {
        let result = api::create_tenant(&name, &scope).await;
        if current_revision(stores) != revision {
            return;
        }
        stores.console.update(|c| c.tenant_busy = false);
        match result {
            Ok(created) => {
                leptos::logging::log!("created tenant {}", created.tenant_id);
                let handle = stores
                    .console
                    .try_update(|c| c.add_created_tenant(&name, &created, api::api_base()));
                remember_selection(stores, Some(&created.tenant_id));
                if let Some(handle) = handle {
                    start_polling(stores, handle, alive);
                }
            }
            Err(e) => stores.report("Creating tenant", &e),
        }
    });
}

/// Fetch the selected tenant's API key and open the agent dialog.
pub(crate) fn show_api_key(stores: Stores) {
    let Some(tenant_id) = stores.console.with_untracked(|c| c.selected.clone()) else {
        return;
    };
    stores.console.update(|c| c.tenant_busy = true);
    leptos::task::spawn_local(async move {
        let result = api::fetch_tenant(&tenant_id).await;
        stores.console.update(|c| c.tenant_busy = false);
        match result {
            Ok(tenant) => match tenant.api_key {
                Some(api_key) => {
                    let created = CreatedTenant { tenant_id: tenant.id, api_key };
                    let config = AgentConfig::for_created(api::api_base(), &tenant.name, &created);
                    stores.console.update(|c| c.agent_dialog = Some(config));
                }
                None => stores
                    .console
                    .update(|c| c.error("This tenant has no API key.")),
            },
            Err(e) => stores.report("Loading API key", &e),
        }
    });
}

pub(crate) fn rename_tenant(stores: Stores, tenant_id: String, name: String) {
    let name = match validate_tenant_name(&name) {
        Ok(name) => name,
        Err(e) => {
            stores.console.update(|c| c.error(e.to_string()));
            return;
        }
    };
    leptos::task::spawn_local(async move {
        match api::rename_tenant(&tenant_id, &name).await {
            Ok(()) => stores.console.update(|c| {
                c.rename_tenant(&tenant_id, &name);
                c.success(format!("Tenant renamed to {name}"));
            }),
            Err(e) => stores.report("Renaming tenant", &e),
        }
    });
}

/// Delete the selected tenant after the confirm dialog.
pub(crate) fn delete_selected_tenant(stores: Stores) {
    let Some(tenant_id) = stores.console.with_untracked(|c| c.selected.clone()) else {
        return;
    };
    stores.console.update(|c| c.tenant_busy = true);
    leptos::task::spawn_local(async move {
        let result = api::delete_tenant(&tenant_id).await;
        stores.console.update(|c| {
            c.tenant_busy = false;
            c.confirm_delete_tenant = false;
        });
        match result {
            Ok(()) => {
                leptos::logging::log!("deleted tenant {tenant_id}");
                let was_selected = stores.console.try_update(|c| {
                    c.success("Tenant deleted.");
                    c.remove_tenant(&tenant_id)
                });
                if was_selected == Some(true) {
                    remember_selection(stores, None);
                }
            }
            Err(e) => stores.report("Deleting tenant", &e),
        }
    });
}

/// Register a counter cut for the printer awaiting confirmation.
pub(crate) fn register_cut(stores: Stores, printer_id: String) {
    if stores.console.with_untracked(|c| c.cut_busy.is_some()) {
        return;
    }
    stores.console.update(|c| {
        c.confirm_cut = None;
        c.cut_busy = Some(printer_id.clone());
    });
    leptos::task::spawn_local(async move {
        let result = api::register_cut(&printer_id).await;
        stores.console.update(|c| c.cut_busy = None);
        match result {
            Ok(reply) => {
                stores.console.update(|c| c.success(cut_message(reply.total_pages)));
                refresh(stores);
            }
            Err(e) => stores.report("Registering cut", &e),
        }
    });
}

/// Download the usage report of a printer.
pub(crate) fn download_pdf(stores: Stores, printer_id: String) {
    let Some(label) = stores.console.with_untracked(|c| {
        c.printer(&printer_id)
            .map(|p| fleet::report::report_label(&p.record).to_owned())
    }) else {
        return;
    };
    if stores.console.with_untracked(|c| c.pdf_busy.is_some()) {
        return;
    }
    stores.console.update(|c| c.pdf_busy = Some(printer_id.clone()));
    leptos::task::spawn_local(async move {
        let result = api::download_pdf(&printer_id).await;
        stores.console.update(|c| c.pdf_busy = None);
        match result {
            Ok(bytes) => {
                let file_name = fleet::report::pdf_file_name(&label, now_ms());
                if let Err(e) = crate::util::download::save_bytes(&file_name, &bytes, crate::util::download::PDF_MIME) {
                    stores.console.update(|c| c.error(e));
                }
            }
            Err(e) => stores.report("Generating PDF", &e),
        }
    });
}

pub(crate) fn rename_printer(stores: Stores, printer_id: String, name: String) {
    let name = name.trim().to_owned();
    if name.is_empty() {
        stores
            .console
            .update(|c| c.error(fleet::ValidationError::EmptyName.to_string()));
        return;
    }
    leptos::task::spawn_local(async move {
        match api::rename_printer(&printer_id, &name).await {
            Ok(()) => stores.console.update(|c| c.rename_printer(&printer_id, &name)),
            Err(e) => stores.report("Renaming printer", &e),
        }
    });
}

pub(crate) fn delete_printer(stores: Stores, printer_id: String) {
    leptos::task::spawn_local(async move {
        match api::delete_printer(&printer_id).await {
            Ok(()) => stores.console.update(|c| {
                c.remove_printer(&printer_id);
                c.success("Printer removed.");
            }),
            Err(e) => stores.report("Removing printer", &e),
        }
    });
}

/// Validate a folder command locally, then send it.
pub(crate) fn run_folder_op(stores: Stores, op: FolderOp) {
    let started = stores.folders.try_update(|f| f.begin(op));
    let (cmd, op) = match started {
        Some(Ok(started)) => started,
        Some(Err(e)) => {
            stores.console.update(|c| c.error(e.to_string()));
            return;
        }
        None => return,
    };
    let revision = current_revision(stores);
    leptos::task::spawn_local(async move {
        let outcome = dispatch(&HttpFolders, &op).await;
        if current_revision(stores) != revision {
            leptos::logging::log!("dropping folder reply {cmd} from an earlier session");
            return;
        }
        if let Some(Err(e)) = stores.folders.try_update(|f| f.settle(cmd, outcome)) {
            stores.report("Updating folders", &e);
        }
    });
}

#[allow(clippy::unused_async)]
async fn sleep_ms(ms: u32) {
    #[cfg(feature = "hydrate")]
    {
        gloo_timers::future::TimeoutFuture::new(ms).await;
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = ms;
    }
}
