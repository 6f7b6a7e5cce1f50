use super::*;

#[test]
fn intervals_match_console_timers() {
    assert_eq!(TENANT_POLL_INTERVAL_MS, 120_000);
    assert_eq!(REPAINT_INTERVAL_MS, 15_000);
}

#[test]
fn switching_tenant_discards_in_flight_response() {
    let mut poller = TenantPoller::default();
    let a = poller.select("A");
    let slow = poller.issue(&a).unwrap();

    let b = poller.select("B");
    let fast = poller.issue(&b).unwrap();

    assert!(poller.accepts(&fast));
    assert!(!poller.accepts(&slow));
    assert!(!poller.is_active(&a));
    assert!(poller.issue(&a).is_none());
}

#[test]
fn reselecting_same_tenant_starts_new_generation() {
    let mut poller = TenantPoller::default();
    let first = poller.select("A");
    let token = poller.issue(&first).unwrap();
    let second = poller.select("A");
    assert_ne!(first, second);
    assert!(!poller.accepts(&token));
}

#[test]
fn out_of_order_responses_within_generation_are_accepted() {
    let mut poller = TenantPoller::default();
    let h = poller.select("A");
    let t1 = poller.issue(&h).unwrap();
    let t2 = poller.issue(&h).unwrap();
    assert!(t2.seq > t1.seq);
    assert!(poller.accepts(&t2));
    assert!(poller.accepts(&t1));
}

#[test]
fn clear_cancels_everything() {
    let mut poller = TenantPoller::default();
    let h = poller.select("A");
    let token = poller.issue(&h).unwrap();
    poller.clear();
    assert!(poller.current().is_none());
    assert!(!poller.accepts(&token));
    assert!(!poller.is_active(&h));
}
