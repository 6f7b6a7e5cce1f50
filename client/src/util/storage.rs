//! `localStorage` persistence for the session scope.
//!
//! SYSTEM CONTEXT
//! ==============
//! Stored values only pre-fill navigation state; they are never sent as
//! credentials. Reads happen in [`sync_session`], which is the one place that
//! moves stored values into the session signal.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use fleet::scope::{KEY_REGION, KEY_SELECTED_TENANT, KEY_TENANT_ID, KEY_USER_EMAIL, SESSION_KEYS, Scope};
use leptos::prelude::*;

use crate::state::console::ConsoleState;
use crate::state::folders::FolderState;
use crate::state::session::{SessionState, StoredSession};

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn get_item(key: &str) -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        local_storage()?
            .get_item(key)
            .ok()
            .flatten()
            .filter(|v| !v.trim().is_empty())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = key;
        None
    }
}

fn set_item(key: &str, value: Option<&str>) {
    #[cfg(feature = "hydrate")]
    {
        let Some(storage) = local_storage() else {
            return;
        };
        let _ = match value {
            Some(v) => storage.set_item(key, v),
            None => storage.remove_item(key),
        };
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (key, value);
    }
}

/// Read every session key.
pub fn read_session() -> StoredSession {
    StoredSession {
        tenant_id: get_item(KEY_TENANT_ID),
        region: get_item(KEY_REGION),
        selected_tenant: get_item(KEY_SELECTED_TENANT),
        user_email: get_item(KEY_USER_EMAIL),
    }
}

/// Persist the scope and email after a successful login.
pub fn save_login(scope: &Scope, email: &str) {
    set_item(KEY_TENANT_ID, Some(&scope.tenant_id));
    set_item(KEY_REGION, Some(&scope.region));
    set_item(KEY_USER_EMAIL, Some(email));
    set_item(KEY_SELECTED_TENANT, None);
}

/// Remember (or forget) the tenant picked in the console.
pub fn save_selected_tenant(tenant_id: Option<&str>) {
    set_item(KEY_SELECTED_TENANT, tenant_id);
}

/// Remove every session key.
pub fn clear_session() {
    for key in SESSION_KEYS {
        set_item(key, None);
    }
}

/// Whether a `storage` event for `key` can change the scope.
///
/// `None` means the whole store was cleared.
pub fn is_scope_key(key: Option<&str>) -> bool {
    key.is_none_or(|k| k == KEY_TENANT_ID || k == KEY_REGION)
}

/// Re-read stored values into the session signal.
///
/// A scope change resets console and folder state so nothing from the old
/// scope survives; the monitor page reloads from the new revision.
pub fn sync_session(
    session: RwSignal<SessionState>,
    console: RwSignal<ConsoleState>,
    folders: RwSignal<FolderState>,
) {
    let stored = read_session();
    let mut next = session.get_untracked();
    let first = !next.loaded;
    let change = next.sync(&stored);
    if !first && !change.requires_reload() {
        return;
    }
    session.set(next);
    if change.requires_reload() && !first {
        leptos::logging::log!("session scope changed: {change:?}");
        save_selected_tenant(None);
        console.update(ConsoleState::reset);
        folders.update(FolderState::reset);
    }
}
