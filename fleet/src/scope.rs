//! Session gate: navigation rules driven by the locally stored scope.
//!
//! The scope (tenant id + region) only decides which screen to show. It is not
//! an authorization token; the backend checks every request, and a 401/403
//! from any scoped call signs the session out regardless of what is cached.

#[cfg(test)]
#[path = "scope_test.rs"]
mod scope_test;

use serde::{Deserialize, Serialize};

/// Storage key holding the signed-in tenant id.
pub const KEY_TENANT_ID: &str = "empresaId";
/// Storage key holding the signed-in region.
pub const KEY_REGION: &str = "ciudad";
/// Storage key caching the tenant last selected in the console.
pub const KEY_SELECTED_TENANT: &str = "selectedEmpresaId";
/// Storage key holding the email used at login.
pub const KEY_USER_EMAIL: &str = "userEmail";

/// Every key cleared on sign-out.
pub const SESSION_KEYS: [&str; 4] = [KEY_TENANT_ID, KEY_REGION, KEY_SELECTED_TENANT, KEY_USER_EMAIL];

/// Tenant id and region the session is scoped to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub tenant_id: String,
    pub region: String,
}

impl Scope {
    /// Build a scope from stored values. Both must be non-blank.
    #[must_use]
    pub fn from_parts(tenant_id: Option<&str>, region: Option<&str>) -> Option<Self> {
        let tenant_id = tenant_id.map(str::trim).filter(|s| !s.is_empty())?;
        let region = region.map(str::trim).filter(|s| !s.is_empty())?;
        Some(Self {
            tenant_id: tenant_id.to_owned(),
            region: region.to_owned(),
        })
    }
}

/// Top-level screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Monitor,
}

impl Route {
    /// Resolve a path. Unknown paths are `None` and fall back to login.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/login" => Some(Self::Login),
            "/registro" => Some(Self::Register),
            "/monitor" => Some(Self::Monitor),
            _ => None,
        }
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/registro",
            Self::Monitor => "/monitor",
        }
    }

    /// Public screens are reachable without a scope.
    #[must_use]
    pub fn is_public(self) -> bool {
        !matches!(self, Self::Monitor)
    }
}

/// Outcome of [`gate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(Route),
}

/// Decide whether `route` may render for the given scope.
#[must_use]
pub fn gate(route: Option<Route>, scope: Option<&Scope>) -> GateDecision {
    match (route, scope) {
        (None, Some(_)) => GateDecision::Redirect(Route::Monitor),
        (None, None) => GateDecision::Redirect(Route::Login),
        (Some(route), Some(_)) if route.is_public() => GateDecision::Redirect(Route::Monitor),
        (Some(Route::Monitor), None) => GateDecision::Redirect(Route::Login),
        (Some(_), _) => GateDecision::Allow,
    }
}

/// How the scope changed in [`SessionContext::replace_scope`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeChange {
    Unchanged,
    SignedIn,
    SignedOut,
    Switched,
}

impl ScopeChange {
    /// Whether console state derived from the old scope must be reloaded.
    #[must_use]
    pub fn requires_reload(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// The session owned by a single provider and passed to consumers.
///
/// `revision` increases on every scope change so dependents can tell a new
/// session apart from the one they loaded against.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionContext {
    scope: Option<Scope>,
    selected_tenant: Option<String>,
    user_email: Option<String>,
    revision: u64,
}

impl SessionContext {
    #[must_use]
    pub fn new(scope: Option<Scope>) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.scope.is_some()
    }

    #[must_use]
    pub fn selected_tenant(&self) -> Option<&str> {
        self.selected_tenant.as_deref()
    }

    #[must_use]
    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Install a new scope. Any real change drops the selected tenant.
    pub fn replace_scope(&mut self, next: Option<Scope>) -> ScopeChange {
        let change = match (&self.scope, &next) {
            (None, None) => ScopeChange::Unchanged,
            (Some(a), Some(b)) if a == b => ScopeChange::Unchanged,
            (None, Some(_)) => ScopeChange::SignedIn,
            (Some(_), None) => ScopeChange::SignedOut,
            (Some(_), Some(_)) => ScopeChange::Switched,
        };
        if change.requires_reload() {
            self.scope = next;
            self.selected_tenant = None;
            if self.scope.is_none() {
                self.user_email = None;
            }
            self.revision += 1;
        }
        change
    }

    /// Sign in after a successful login.
    pub fn sign_in(&mut self, scope: Scope, email: Option<String>) -> ScopeChange {
        let change = self.replace_scope(Some(scope));
        self.user_email = email.filter(|e| !e.trim().is_empty());
        change
    }

    pub fn sign_out(&mut self) -> ScopeChange {
        self.replace_scope(None)
    }

    /// The backend refused the cached scope: sign out unconditionally.
    pub fn on_unauthorized(&mut self) -> ScopeChange {
        self.sign_out()
    }

    /// Remember the tenant picked in the console. Ignored when signed out.
    pub fn select_tenant(&mut self, tenant_id: Option<String>) {
        if self.scope.is_some() {
            self.selected_tenant = tenant_id.filter(|id| !id.trim().is_empty());
        }
    }
}
