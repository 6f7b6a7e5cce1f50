use super::*;

fn scope(tenant: &str, region: &str) -> Scope {
    Scope::from_parts(Some(tenant), Some(region)).unwrap()
}

#[test]
fn from_parts_requires_both_values() {
    assert!(Scope::from_parts(Some("acme"), None).is_none());
    assert!(Scope::from_parts(Some("  "), Some("Tijuana")).is_none());
    assert_eq!(scope(" acme ", "Tijuana").tenant_id, "acme");
}

#[test]
fn route_paths_resolve() {
    assert_eq!(Route::from_path("/registro"), Some(Route::Register));
    assert_eq!(Route::from_path("/monitor/"), Some(Route::Monitor));
    assert_eq!(Route::from_path("/elsewhere"), None);
    assert_eq!(Route::Login.path(), "/login");
}

#[test]
fn gate_redirects_by_scope() {
    let s = scope("acme", "Tijuana");
    assert_eq!(gate(Some(Route::Monitor), Some(&s)), GateDecision::Allow);
    assert_eq!(gate(Some(Route::Monitor), None), GateDecision::Redirect(Route::Login));
    assert_eq!(gate(Some(Route::Login), Some(&s)), GateDecision::Redirect(Route::Monitor));
    assert_eq!(gate(Some(Route::Register), None), GateDecision::Allow);
    assert_eq!(gate(None, None), GateDecision::Redirect(Route::Login));
    assert_eq!(gate(None, Some(&s)), GateDecision::Redirect(Route::Monitor));
}

#[test]
fn replace_scope_reports_change_and_clears_selection() {
    let mut ctx = SessionContext::default();
    assert_eq!(ctx.replace_scope(Some(scope("a", "Tijuana"))), ScopeChange::SignedIn);
    ctx.select_tenant(Some("t1".into()));
    assert_eq!(ctx.selected_tenant(), Some("t1"));

    assert_eq!(ctx.replace_scope(Some(scope("a", "Tijuana"))), ScopeChange::Unchanged);
    assert_eq!(ctx.selected_tenant(), Some("t1"));
    assert_eq!(ctx.revision(), 1);

    assert_eq!(ctx.replace_scope(Some(scope("b", "Tijuana"))), ScopeChange::Switched);
    assert_eq!(ctx.selected_tenant(), None);
    assert_eq!(ctx.revision(), 2);
}

#[test]
fn unauthorized_signs_out_and_forgets_email() {
    let mut ctx = SessionContext::default();
    ctx.sign_in(scope("a", "Tecate"), Some("ops@example.com".into()));
    assert_eq!(ctx.user_email(), Some("ops@example.com"));
    assert_eq!(ctx.on_unauthorized(), ScopeChange::SignedOut);
    assert!(!ctx.is_signed_in());
    assert_eq!(ctx.user_email(), None);
    assert_eq!(ctx.sign_out(), ScopeChange::Unchanged);
}

#[test]
fn selecting_tenant_requires_scope() {
    let mut ctx = SessionContext::default();
    ctx.select_tenant(Some("t1".into()));
    assert_eq!(ctx.selected_tenant(), None);
}
