use fleet::model::PrinterRecord;

use super::*;

fn printer(id: &str, name: Option<&str>, status: PrinterStatus) -> DecoratedPrinter {
    let mut record = PrinterRecord::bare(id);
    record.display_name = name.map(str::to_owned);
    DecoratedPrinter {
        record,
        last_seen_at: None,
        hold_until: None,
        status,
    }
}

#[test]
fn unchanged_statuses_print_nothing() {
    let list = vec![printer("p1", Some("Lobby"), PrinterStatus::OnlineFresh)];
    assert!(status_changes(&list, &list).is_empty());
}

#[test]
fn online_sub_states_are_not_a_change() {
    let before = vec![printer("p1", None, PrinterStatus::OnlineSticky)];
    let after = vec![printer("p1", None, PrinterStatus::OnlineFresh)];
    assert!(status_changes(&before, &after).is_empty());
}

#[test]
fn transitions_use_display_name() {
    let before = vec![printer("p1", Some("Lobby"), PrinterStatus::OnlineSticky)];
    let after = vec![printer("p1", Some("Lobby"), PrinterStatus::OfflineStale)];
    let lines = status_changes(&before, &after);
    assert_eq!(
        lines,
        vec![format!(
            "Lobby: {} -> {}",
            PrinterStatus::OnlineSticky.label(),
            PrinterStatus::OfflineStale.label()
        )]
    );
}

#[test]
fn new_and_removed_printers_are_reported() {
    let before = vec![printer("gone", None, PrinterStatus::Unseen)];
    let after = vec![printer("p2", Some("  "), PrinterStatus::Unseen)];
    let lines = status_changes(&before, &after);
    assert_eq!(lines, vec![format!("+ p2: {}", PrinterStatus::Unseen.label()), "- gone".to_owned()]);
}

#[test]
fn clock_is_after_2020() {
    assert!(now_ms() > 1_577_836_800_000);
}

struct Stalled;

impl PrinterSource for Stalled {
    async fn fetch_printers(&self, _: &str, _: &str) -> Result<PrinterBatch, FleetError> {
        std::future::pending().await
    }
}

struct Empty;

impl PrinterSource for Empty {
    async fn fetch_printers(&self, _: &str, _: &str) -> Result<PrinterBatch, FleetError> {
        Ok(PrinterBatch::default())
    }
}

struct Rejected;

impl PrinterSource for Rejected {
    async fn fetch_printers(&self, _: &str, _: &str) -> Result<PrinterBatch, FleetError> {
        Err(FleetError::Unauthorized)
    }
}

fn cadence(max_polls: Option<u64>) -> Cadence {
    Cadence {
        poll: Duration::from_millis(10),
        repaint: Duration::from_millis(10),
        max_polls,
    }
}

#[tokio::test]
async fn interrupt_during_slow_request_stops_the_watch() {
    let shutdown = tokio::time::sleep(Duration::from_millis(20));
    let watch = run(&Stalled, "t1", "Tijuana", cadence(None), shutdown);
    let result = tokio::time::timeout(Duration::from_secs(5), watch).await;
    assert!(matches!(result, Ok(Ok(()))));
}

#[tokio::test]
async fn stops_after_max_polls() {
    let watch = run(&Empty, "t1", "Tijuana", cadence(Some(2)), std::future::pending());
    let result = tokio::time::timeout(Duration::from_secs(5), watch).await;
    assert!(matches!(result, Ok(Ok(()))));
}

#[tokio::test]
async fn rejected_session_ends_the_watch() {
    let watch = run(&Rejected, "t1", "Tijuana", cadence(None), std::future::pending());
    let result = tokio::time::timeout(Duration::from_secs(5), watch).await;
    assert!(matches!(result, Ok(Err(FleetError::Unauthorized))));
}
