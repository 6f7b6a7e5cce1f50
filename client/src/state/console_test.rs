use fleet::freshness::PrinterStatus;
use fleet::model::{PrinterRecord, RejectReason, Telemetry};

use super::*;

const T: i64 = 1_700_000_000_000;

fn tenant(id: &str) -> Tenant {
    Tenant {
        id: id.to_owned(),
        name: format!("Tenant {id}"),
        api_key: None,
        region: None,
    }
}

fn seen(id: &str, at: i64) -> PrinterRecord {
    let mut record = PrinterRecord::bare(id);
    record.latest = Some(Telemetry {
        last_seen_at: Some(at),
        ..Telemetry::default()
    });
    record
}

fn batch(records: Vec<PrinterRecord>) -> PrinterBatch {
    PrinterBatch { records, rejected: Vec::new() }
}

// =============================================================
// Tenant selection
// =============================================================

#[test]
fn remembered_tenant_is_restored_when_listed() {
    let mut state = ConsoleState::default();
    let handle = state.set_tenants(vec![tenant("a"), tenant("b")], Some("b")).unwrap();
    assert_eq!(handle.tenant_id, "b");
    assert_eq!(state.selected_tenant().map(|t| t.id.as_str()), Some("b"));
}

#[test]
fn single_tenant_is_auto_selected() {
    let mut state = ConsoleState::default();
    let handle = state.set_tenants(vec![tenant("only")], Some("gone")).unwrap();
    assert_eq!(handle.tenant_id, "only");
}

#[test]
fn several_tenants_without_memory_select_nothing() {
    let mut state = ConsoleState::default();
    assert!(state.set_tenants(vec![tenant("a"), tenant("b")], None).is_none());
    assert!(state.selected.is_none());
    assert!(state.poller.current().is_none());
}

// =============================================================
// Printer polling
// =============================================================

#[test]
fn switching_tenant_clears_printers_and_drops_stale_reply() {
    let mut state = ConsoleState::default();
    state.set_tenants(vec![tenant("a"), tenant("b")], None);

    let a = state.select("a".to_owned());
    let slow = state.begin_fetch(&a).unwrap();
    let first = state.begin_fetch(&a).unwrap();
    state.apply_printers(&first, batch(vec![seen("pa", T)]), T).unwrap();
    assert_eq!(state.printers.len(), 1);

    let b = state.select("b".to_owned());
    assert!(state.printers.is_empty());
    assert!(state.tracker.is_empty());

    assert!(state.apply_printers(&slow, batch(vec![seen("pa", T)]), T).is_none());
    assert!(state.printers.is_empty());

    let fresh = state.begin_fetch(&b).unwrap();
    state.apply_printers(&fresh, batch(vec![seen("pb", T)]), T).unwrap();
    assert_eq!(state.printers[0].record.id, "pb");
}

#[test]
fn rejected_records_are_reported() {
    let mut state = ConsoleState::default();
    let h = state.select("a".to_owned());
    let token = state.begin_fetch(&h).unwrap();
    let mut incoming = batch(vec![seen("p1", T), seen("p1", T)]);
    incoming.rejected.push(RejectedRecord { index: 5, reason: RejectReason::MissingId });
    let rejected = state.apply_printers(&token, incoming, T).unwrap();
    assert_eq!(rejected.len(), 2);
    assert_eq!(state.printers.len(), 1);
}

#[test]
fn repaint_flips_stale_printer_offline() {
    let mut state = ConsoleState::default();
    let h = state.select("a".to_owned());
    let token = state.begin_fetch(&h).unwrap();
    state.apply_printers(&token, batch(vec![seen("p1", T)]), T);
    assert_eq!(state.online_count(), 1);

    state.repaint(T + 200_000);
    assert_eq!(state.printers[0].status, PrinterStatus::OfflineStale);
    assert_eq!(state.online_count(), 0);
}

#[test]
fn stale_failure_does_not_raise_banner() {
    let mut state = ConsoleState::default();
    let a = state.select("a".to_owned());
    let token = state.begin_fetch(&a).unwrap();
    state.select("b".to_owned());
    state.fail_fetch(&token, "boom".to_owned());
    assert!(state.banner.is_none());
}

#[test]
fn reset_keeps_old_handles_cancelled() {
    let mut state = ConsoleState::default();
    let a = state.select("a".to_owned());
    state.reset();
    let again = state.select("a".to_owned());
    assert_ne!(a, again);
    assert!(state.begin_fetch(&a).is_none());
}

// =============================================================
// Mutations
// =============================================================

#[test]
fn created_tenant_is_selected_and_opens_dialog() {
    let mut state = ConsoleState::default();
    state.set_tenants(vec![tenant("a"), tenant("b")], None);
    let created = CreatedTenant { tenant_id: "new".into(), api_key: "k".into() };
    let handle = state.add_created_tenant("North Plant", &created, "https://api.example.com");
    assert_eq!(handle.tenant_id, "new");
    assert_eq!(state.tenants[0].id, "new");
    let dialog = state.agent_dialog.as_ref().unwrap();
    assert_eq!(dialog.env_file_name(), "North_Plant.env");
    assert_eq!(state.banner, Some(Banner::Success("Tenant created: North Plant".into())));
}

#[test]
fn removing_selected_tenant_clears_selection() {
    let mut state = ConsoleState::default();
    state.set_tenants(vec![tenant("a"), tenant("b")], Some("a"));
    assert!(state.remove_tenant("a"));
    assert!(state.selected.is_none());
    assert_eq!(state.tenants.len(), 1);
}

#[test]
fn removing_tenant_keeps_newer_selection() {
    let mut state = ConsoleState::default();
    state.set_tenants(vec![tenant("a"), tenant("b")], Some("a"));
    // The user switched to b while the delete of a was in flight.
    state.select("b".to_owned());
    assert!(!state.remove_tenant("a"));
    assert_eq!(state.selected.as_deref(), Some("b"));
    assert!(state.poller.current().is_some());
}

#[test]
fn printer_rename_and_remove() {
    let mut state = ConsoleState::default();
    let h = state.select("a".to_owned());
    let token = state.begin_fetch(&h).unwrap();
    state.apply_printers(&token, batch(vec![seen("p1", T), seen("p2", T)]), T);
    state.toggle_expanded("p2");

    state.rename_printer("p1", "Lobby");
    assert_eq!(state.printer("p1").unwrap().record.label(), "Lobby");

    state.remove_printer("p2");
    assert!(state.printer("p2").is_none());
    assert!(state.expanded_printer.is_none());
}
