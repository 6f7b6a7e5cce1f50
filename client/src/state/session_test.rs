use super::*;

fn stored(tenant: Option<&str>, region: Option<&str>) -> StoredSession {
    StoredSession {
        tenant_id: tenant.map(str::to_owned),
        region: region.map(str::to_owned),
        selected_tenant: Some("t7".to_owned()),
        user_email: Some("ops@example.com".to_owned()),
    }
}

#[test]
fn session_starts_unloaded() {
    let state = SessionState::default();
    assert!(!state.loaded);
    assert!(state.scope().is_none());
}

#[test]
fn first_sync_restores_selection_and_email() {
    let mut state = SessionState::default();
    let change = state.sync(&stored(Some("acme"), Some("Tijuana")));
    assert_eq!(change, ScopeChange::SignedIn);
    assert!(state.loaded);
    assert_eq!(state.context.selected_tenant(), Some("t7"));
    assert_eq!(state.context.user_email(), Some("ops@example.com"));
}

#[test]
fn first_sync_without_scope_stays_signed_out() {
    let mut state = SessionState::default();
    assert_eq!(state.sync(&stored(Some("acme"), None)), ScopeChange::Unchanged);
    assert!(state.loaded);
    assert_eq!(state.context.selected_tenant(), None);
}

#[test]
fn later_sync_follows_other_tab() {
    let mut state = SessionState::default();
    state.sync(&stored(Some("acme"), Some("Tijuana")));

    assert_eq!(state.sync(&stored(Some("acme"), Some("Tijuana"))), ScopeChange::Unchanged);
    assert_eq!(state.context.selected_tenant(), Some("t7"));

    assert_eq!(state.sync(&stored(Some("acme"), Some("Tecate"))), ScopeChange::Switched);
    assert_eq!(state.context.selected_tenant(), None);

    assert_eq!(state.sync(&StoredSession::default()), ScopeChange::SignedOut);
    assert!(state.scope().is_none());
}
