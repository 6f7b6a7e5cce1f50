//! Reactive application state, one struct per concern.
//!
//! DESIGN
//! ======
//! Each state struct is plain data wrapped in an `RwSignal` by `App` and read
//! from context. Methods on the structs hold the transition logic so it can be
//! tested without a browser.

pub mod console;
pub mod folders;
pub mod session;

use fleet::error::FleetError;
use leptos::prelude::*;

use self::console::ConsoleState;
use self::folders::FolderState;
use self::session::SessionState;

/// The three shared signals, copied into async tasks.
///
/// Context lookups are not available once a task has awaited, so handlers
/// capture this instead.
#[derive(Clone, Copy)]
pub struct Stores {
    pub session: RwSignal<SessionState>,
    pub console: RwSignal<ConsoleState>,
    pub folders: RwSignal<FolderState>,
}

impl Stores {
    pub fn from_context() -> Self {
        Self {
            session: expect_context::<RwSignal<SessionState>>(),
            console: expect_context::<RwSignal<ConsoleState>>(),
            folders: expect_context::<RwSignal<FolderState>>(),
        }
    }

    /// Surface a failed action. A rejected scope signs the user out; the
    /// route gate then sends them to `/login`.
    pub fn report(self, action: &str, error: &FleetError) {
        if error.requires_login() {
            self.expire();
            return;
        }
        leptos::logging::warn!("{action} failed: {error}");
        self.console.update(|c| c.error(format!("{action}: {error}")));
    }

    /// Forget the stored scope and everything loaded for it.
    pub fn expire(self) {
        self.drop_scope(|s| s.context.on_unauthorized());
    }

    /// Sign out on request.
    pub fn sign_out(self) {
        self.drop_scope(|s| s.context.sign_out());
    }

    fn drop_scope(self, apply: impl FnOnce(&mut SessionState) -> fleet::scope::ScopeChange) {
        crate::util::storage::clear_session();
        self.session.update(|s| {
            apply(s);
        });
        self.console.update(ConsoleState::reset);
        self.folders.update(FolderState::reset);
    }
}
