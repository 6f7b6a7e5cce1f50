//! Monitor page: tenant sidebar, printer grid and tenant actions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted behind the route gate, so a scope is always present on entry.
//! Tenants and folders reload whenever the session revision changes; the
//! printer list is polled per selection and repainted on a shorter cadence
//! so freshness ages without new data.

#[cfg(test)]
#[path = "monitor_test.rs"]
mod monitor_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use fleet::freshness::DecoratedPrinter;
use leptos::prelude::*;

use super::monitor_actions as actions;
use crate::components::agent_dialog::AgentDialog;
use crate::components::banner::BannerBar;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::printer_card::{PrinterActions, PrinterCard};
use crate::components::tenant_sidebar::TenantSidebar;
use crate::state::Stores;

/// Identity of a rendered card; any visible change re-renders it.
type CardKey = (String, &'static str, Option<i64>, Option<String>, Option<u64>);

fn card_key(printer: &DecoratedPrinter) -> CardKey {
    (
        printer.record.id.clone(),
        crate::components::printer_card::status_label(printer.status),
        printer.last_seen_at,
        printer.record.display_name.clone(),
        printer.record.latest.as_ref().and_then(|t| t.last_page_count),
    )
}

fn online_summary(online: usize, total: usize) -> String {
    match total {
        0 => "No printers reporting yet".to_owned(),
        _ => format!("{online} of {total} online"),
    }
}

#[component]
pub fn MonitorPage() -> impl IntoView {
    let stores = Stores::from_context();
    let console = stores.console;
    let alive = Arc::new(AtomicBool::new(true));
    {
        let alive = Arc::clone(&alive);
        on_cleanup(move || alive.store(false, Ordering::Relaxed));
    }

    let revision = Memo::new(move |_| stores.session.with(|s| s.context.revision()));
    {
        let alive = Arc::clone(&alive);
        Effect::new(move || {
            revision.track();
            actions::load_scope(stores, Arc::clone(&alive));
        });
    }
    {
        let alive = Arc::clone(&alive);
        Effect::new(move |started: Option<()>| {
            if started.is_none() {
                actions::start_repaint(stores, Arc::clone(&alive));
            }
        });
    }

    let on_select = {
        let alive = Arc::clone(&alive);
        Callback::new(move |id: String| actions::select_tenant(stores, id, Arc::clone(&alive)))
    };
    let on_create_tenant = {
        let alive = Arc::clone(&alive);
        Callback::new(move |name: String| actions::create_tenant(stores, name, Arc::clone(&alive)))
    };
    let on_folder_op = Callback::new(move |op| actions::run_folder_op(stores, op));
    let on_sign_out = Callback::new(move |()| stores.sign_out());

    let printer_actions = PrinterActions {
        on_cut: Callback::new(move |id: String| console.update(|c| c.confirm_cut = Some(id))),
        on_pdf: Callback::new(move |id| actions::download_pdf(stores, id)),
        on_rename: Callback::new(move |(id, name)| actions::rename_printer(stores, id, name)),
        on_delete: Callback::new(move |id: String| {
            let label = console.with_untracked(|c| c.printer(&id).map(|p| p.record.label().to_owned()));
            let message = format!("Remove printer {}?", label.as_deref().unwrap_or(&id));
            if crate::util::prompt::confirm(&message) {
                actions::delete_printer(stores, id);
            }
        }),
    };

    let on_rename_tenant = move |_| {
        let Some((id, name)) = console.with_untracked(|c| c.selected_tenant().map(|t| (t.id.clone(), t.name.clone()))) else {
            return;
        };
        if let Some(next) = crate::util::prompt::ask("Tenant name", &name) {
            actions::rename_tenant(stores, id, next);
        }
    };

    let has_selection = move || console.with(|c| c.selected.is_some());
    let tenant_title = move || {
        console.with(|c| c.selected_tenant().map(|t| t.name.clone()).unwrap_or_default())
    };
    let summary = move || console.with(|c| online_summary(c.online_count(), c.printers.len()));

    view! {
        <div class="monitor-page">
            <TenantSidebar on_select on_create_tenant on_folder_op on_sign_out/>
            <main class="monitor-main">
                <BannerBar/>
                <Show
                    when=has_selection
                    fallback=|| view! { <p class="monitor-empty">"Select a tenant to see its printers."</p> }
                >
                    <header class="monitor-header">
                        <div>
                            <h2 class="monitor-header__title">{tenant_title}</h2>
                            <span class="monitor-header__summary">{summary}</span>
                        </div>
                        <div class="monitor-header__actions">
                            <button class="btn" disabled=move || console.with(|c| c.printers_loading) on:click=move |_| actions::refresh(stores)>
                                {move || if console.with(|c| c.printers_loading) { "Refreshing…" } else { "Refresh" }}
                            </button>
                            <button class="btn" disabled=move || console.with(|c| c.tenant_busy) on:click=move |_| actions::show_api_key(stores)>
                                "API key"
                            </button>
                            <button class="btn" on:click=on_rename_tenant>"Rename"</button>
                            <button class="btn btn--danger" on:click=move |_| console.update(|c| c.confirm_delete_tenant = true)>
                                "Delete"
                            </button>
                        </div>
                    </header>
                    <section class="printer-grid">
                        <For
                            each=move || console.with(|c| c.printers.clone())
                            key=card_key
                            children=move |printer| view! { <PrinterCard printer actions=printer_actions/> }
                        />
                    </section>
                </Show>
            </main>

            {move || {
                console.with(|c| c.confirm_cut.clone()).map(|id| {
                    let label = console
                        .with_untracked(|c| c.printer(&id).map(|p| p.record.label().to_owned()))
                        .unwrap_or_else(|| id.clone());
                    view! {
                        <ConfirmDialog
                            title="Register cut".to_owned()
                            message=format!("Close the current counter period for {label}? This cannot be undone.")
                            confirm_label="Register cut"
                            busy=Signal::derive(move || console.with(|c| c.cut_busy.is_some()))
                            on_confirm=Callback::new(move |()| actions::register_cut(stores, id.clone()))
                            on_cancel=Callback::new(move |()| console.update(|c| c.confirm_cut = None))
                        />
                    }
                })
            }}

            <Show when=move || console.with(|c| c.confirm_delete_tenant)>
                <ConfirmDialog
                    title="Delete tenant".to_owned()
                    message=format!("Delete {} and stop monitoring its printers?", tenant_title())
                    confirm_label="Delete"
                    busy=Signal::derive(move || console.with(|c| c.tenant_busy))
                    on_confirm=Callback::new(move |()| actions::delete_selected_tenant(stores))
                    on_cancel=Callback::new(move |()| console.update(|c| c.confirm_delete_tenant = false))
                />
            </Show>

            <AgentDialog/>
        </div>
    }
}
