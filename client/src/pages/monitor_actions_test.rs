use super::*;
use fleet::model::RejectReason;

#[test]
fn cut_message_reports_period_total() {
    assert_eq!(cut_message(1520), "Cut registered: 1520 pages in the closed period.");
}

#[test]
fn clean_batch_has_no_summary() {
    assert_eq!(rejected_summary("t1", &[]), None);
}

#[test]
fn rejected_records_are_listed_by_position() {
    let rejected = [
        RejectedRecord { index: 0, reason: RejectReason::MissingId },
        RejectedRecord { index: 3, reason: RejectReason::DuplicateId("p1".into()) },
    ];
    assert_eq!(
        rejected_summary("t1", &rejected).unwrap(),
        "tenant t1: dropped 2 printer record(s) (#0: record has no usable id; #3: duplicate id p1 in batch)"
    );
}
