use super::*;
use fleet::freshness::PrinterStatus;
use fleet::model::{PrinterRecord, Telemetry};

fn printer(status: PrinterStatus, pages: Option<u64>) -> DecoratedPrinter {
    let mut record = PrinterRecord::bare("p1");
    record.latest = Some(Telemetry {
        last_page_count: pages,
        ..Telemetry::default()
    });
    DecoratedPrinter {
        record,
        last_seen_at: Some(1_000),
        hold_until: None,
        status,
    }
}

#[test]
fn card_key_changes_with_visible_state() {
    let base = card_key(&printer(PrinterStatus::OnlineFresh, Some(10)));
    assert_eq!(base, card_key(&printer(PrinterStatus::OnlineSticky, Some(10))));
    assert_ne!(base, card_key(&printer(PrinterStatus::OfflineStale, Some(10))));
    assert_ne!(base, card_key(&printer(PrinterStatus::OnlineFresh, Some(11))));
    assert_ne!(
        card_key(&printer(PrinterStatus::OfflineStale, Some(10))),
        card_key(&printer(PrinterStatus::OfflineExplicit, Some(10)))
    );
}

#[test]
fn summary_counts_online_printers() {
    assert_eq!(online_summary(0, 0), "No printers reporting yet");
    assert_eq!(online_summary(2, 5), "2 of 5 online");
}
