use super::*;

#[test]
fn command_starts_pending_and_settles_once() {
    let mut cmd = Command::new(7, "rename");
    assert!(cmd.is_pending());
    cmd.confirm().unwrap();
    assert_eq!(cmd.state, CommandState::Confirmed);
    assert_eq!(cmd.fail("late"), Err(CommandError::AlreadySettled(7)));
    assert_eq!(cmd.state, CommandState::Confirmed);
}

#[test]
fn log_allocates_increasing_ids() {
    let mut log = CommandLog::default();
    let a = log.begin("a");
    let b = log.begin("b");
    assert!(b > a);
    assert_eq!(log.pending().count(), 2);
}

#[test]
fn clear_keeps_counting_ids() {
    let mut log = CommandLog::default();
    let a = log.begin("a");
    log.clear();
    assert!(log.is_empty());
    assert_eq!(log.confirm(a), Err(CommandError::Unknown(a)));
    assert!(log.begin("b") > a);
}

#[test]
fn log_tracks_last_failure() {
    let mut log = CommandLog::default();
    let a = log.begin("a");
    let b = log.begin("b");
    log.fail(a, "first").unwrap();
    assert_eq!(log.last_failure(), Some("first"));
    log.fail(b, "second").unwrap();
    assert_eq!(log.last_failure(), Some("second"));
    assert!(!log.has_pending());
}

#[test]
fn log_rejects_unknown_ids() {
    let mut log: CommandLog<()> = CommandLog::default();
    assert_eq!(log.confirm(99), Err(CommandError::Unknown(99)));
}

#[test]
fn log_evicts_settled_entries_beyond_cap_but_keeps_pending() {
    let mut log = CommandLog::default();
    let first = log.begin(0_usize);
    for i in 1..COMMAND_LOG_CAP {
        let id = log.begin(i);
        log.confirm(id).unwrap();
    }
    assert_eq!(log.len(), COMMAND_LOG_CAP);

    let extra = log.begin(COMMAND_LOG_CAP);
    assert_eq!(log.len(), COMMAND_LOG_CAP);
    assert!(log.get(first).is_some_and(Command::is_pending));
    assert!(log.get(extra).is_some());
    assert!(log.get(2).is_none());
}
