//! Printer card: status, counters, supplies and per-printer actions.
//!
//! DESIGN
//! ======
//! Status comes from the freshness tracker, never from the raw `online`
//! flag. The card reads its printer by id from console state so a repaint
//! or refresh updates it in place.

#[cfg(test)]
#[path = "printer_card_test.rs"]
mod printer_card_test;

use fleet::freshness::{DecoratedPrinter, PrinterStatus};
use fleet::model::Supply;
use leptos::prelude::*;

use crate::state::console::ConsoleState;

/// Supplies below this percentage are flagged.
const LOW_SUPPLY_PCT: u8 = 20;

pub(crate) fn status_label(status: PrinterStatus) -> &'static str {
    match status {
        PrinterStatus::Unseen => "Never seen",
        PrinterStatus::OnlineSticky | PrinterStatus::OnlineFresh => "Online",
        PrinterStatus::OfflineStale => "Offline",
        PrinterStatus::OfflineExplicit => "Offline (reported)",
    }
}

fn status_class(status: PrinterStatus) -> &'static str {
    if status.is_online() {
        "status-chip status-chip--online"
    } else if status == PrinterStatus::Unseen {
        "status-chip status-chip--unseen"
    } else {
        "status-chip status-chip--offline"
    }
}

/// Relative age of a reading, e.g. `3 min ago`.
fn last_seen_text(last_seen_at: Option<i64>, now: i64) -> String {
    let Some(at) = last_seen_at else {
        return "no reports yet".to_owned();
    };
    let secs = (now - at).max(0) / 1000;
    match secs {
        0..60 => "just now".to_owned(),
        60..3_600 => format!("{} min ago", secs / 60),
        3_600..86_400 => format!("{} h ago", secs / 3_600),
        _ => format!("{} d ago", secs / 86_400),
    }
}

fn count_text(count: Option<u64>) -> String {
    count.map_or_else(|| "—".to_owned(), |n| n.to_string())
}

fn supply_class(supply: &Supply) -> &'static str {
    if supply.percent() < LOW_SUPPLY_PCT {
        "supply supply--low"
    } else {
        "supply"
    }
}

fn supply_name(supply: &Supply) -> &str {
    if supply.name.trim().is_empty() { "Supply" } else { &supply.name }
}

/// Callbacks for the actions a card can trigger, keyed by printer id.
#[derive(Clone, Copy)]
pub struct PrinterActions {
    pub on_cut: Callback<String>,
    pub on_pdf: Callback<String>,
    pub on_rename: Callback<(String, String)>,
    pub on_delete: Callback<String>,
}

#[component]
pub fn PrinterCard(printer: DecoratedPrinter, actions: PrinterActions) -> impl IntoView {
    let console = expect_context::<RwSignal<ConsoleState>>();
    let id = printer.record.id.clone();
    let renaming = RwSignal::new(false);
    let draft = RwSignal::new(String::new());

    let expanded = {
        let id = id.clone();
        move || console.with(|c| c.expanded_printer.as_deref() == Some(id.as_str()))
    };
    let cut_busy = {
        let id = id.clone();
        Signal::derive(move || console.with(|c| c.cut_busy.as_deref() == Some(id.as_str())))
    };
    let pdf_busy = {
        let id = id.clone();
        Signal::derive(move || console.with(|c| c.pdf_busy.as_deref() == Some(id.as_str())))
    };

    let now = crate::util::clock::now_ms();
    let label = printer.record.label().to_owned();
    let telemetry = printer.record.latest.clone().unwrap_or_default();
    let counters = telemetry.page_counters();
    let low_toner = telemetry.low_toner;
    let last_cut = telemetry.last_cut_date.map(fleet::report::format_date);
    let supplies = telemetry.supplies;
    let host = printer.record.host.clone();
    let seen = last_seen_text(printer.last_seen_at, now);

    let toggle = {
        let id = id.clone();
        move |_| console.update(|c| c.toggle_expanded(&id))
    };
    let start_rename = {
        let label = label.clone();
        move |_| {
            draft.set(label.clone());
            renaming.set(true);
        }
    };
    let submit_rename = {
        let id = id.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            renaming.set(false);
            actions.on_rename.run((id.clone(), draft.get_untracked()));
        }
    };
    let cut = {
        let id = id.clone();
        move |_| actions.on_cut.run(id.clone())
    };
    let pdf = {
        let id = id.clone();
        move |_| actions.on_pdf.run(id.clone())
    };
    let delete = {
        let id = id.clone();
        move |_| actions.on_delete.run(id.clone())
    };

    view! {
        <article class="printer-card" class:printer-card--low=low_toner>
            <header class="printer-card__header" on:click=toggle>
                <span class=status_class(printer.status)>{status_label(printer.status)}</span>
                <h3 class="printer-card__name">{label}</h3>
                <span class="printer-card__seen">{seen}</span>
            </header>
            <Show when=move || renaming.get()>
                <form class="printer-card__rename" on:submit=submit_rename.clone()>
                    <input
                        class="input"
                        prop:value=move || draft.get()
                        on:input=move |ev| draft.set(event_target_value(&ev))
                    />
                    <button class="btn btn--primary" type="submit">"Save"</button>
                    <button class="btn" type="button" on:click=move |_| renaming.set(false)>"Cancel"</button>
                </form>
            </Show>
            <dl class="printer-card__counters">
                <dt>"Total"</dt>
                <dd>{count_text(counters.total)}</dd>
                <dt>"Mono"</dt>
                <dd>{count_text(counters.mono)}</dd>
                <Show when=move || counters.has_color()>
                    <dt>"Color"</dt>
                    <dd>{count_text(counters.color)}</dd>
                </Show>
            </dl>
            <Show when=expanded>
                <div class="printer-card__details">
                    <p class="printer-card__host">{host.clone().unwrap_or_else(|| "unknown host".to_owned())}</p>
                    <p class="printer-card__cut">
                        "Last cut: "
                        {last_cut.clone().unwrap_or_else(|| "never".to_owned())}
                    </p>
                    <ul class="printer-card__supplies">
                        {supplies
                            .iter()
                            .map(|s| {
                                view! {
                                    <li class=supply_class(s)>
                                        <span>{supply_name(s).to_owned()}</span>
                                        <meter min="0" max="100" value=s.percent().to_string()></meter>
                                        <span>{format!("{}%", s.percent())}</span>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                </div>
            </Show>
            <footer class="printer-card__actions">
                <button class="btn" disabled=move || cut_busy.get() on:click=cut>
                    {move || if cut_busy.get() { "Cutting…" } else { "Register cut" }}
                </button>
                <button class="btn" disabled=move || pdf_busy.get() on:click=pdf>
                    {move || if pdf_busy.get() { "Generating…" } else { "PDF report" }}
                </button>
                <button class="btn" on:click=start_rename>"Rename"</button>
                <button class="btn btn--danger" on:click=delete>"Remove"</button>
            </footer>
        </article>
    }
}
