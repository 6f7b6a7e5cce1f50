//! Session provider state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps [`SessionContext`] with the hydration flag. Until `loaded` is set the
//! route gate renders a placeholder, because stored scope is only readable in
//! the browser.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use fleet::scope::{Scope, ScopeChange, SessionContext};

/// Raw values read from `localStorage`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoredSession {
    pub tenant_id: Option<String>,
    pub region: Option<String>,
    pub selected_tenant: Option<String>,
    pub user_email: Option<String>,
}

impl StoredSession {
    #[must_use]
    pub fn scope(&self) -> Option<Scope> {
        Scope::from_parts(self.tenant_id.as_deref(), self.region.as_deref())
    }
}

/// Session context plus whether stored values have been read yet.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub context: SessionContext,
    pub loaded: bool,
}

impl SessionState {
    #[must_use]
    pub fn scope(&self) -> Option<&Scope> {
        self.context.scope()
    }

    /// Adopt stored values.
    ///
    /// The first sync restores the remembered tenant and email. Later syncs
    /// only follow scope changes made elsewhere.
    pub fn sync(&mut self, stored: &StoredSession) -> ScopeChange {
        if self.loaded {
            return self.context.replace_scope(stored.scope());
        }
        self.loaded = true;
        let change = match stored.scope() {
            Some(scope) => self.context.sign_in(scope, stored.user_email.clone()),
            None => self.context.sign_out(),
        };
        self.context.select_tenant(stored.selected_tenant.clone());
        change
    }
}
