//! Generic confirmation modal.

use leptos::prelude::*;

/// Ask before a destructive action. `busy` disables both buttons while the
/// request is in flight.
#[component]
pub fn ConfirmDialog(
    title: String,
    message: String,
    confirm_label: &'static str,
    #[prop(into)] busy: Signal<bool>,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Escape" && !busy.get_untracked() {
            ev.prevent_default();
            on_cancel.run(());
        }
    };

    view! {
        <div class="dialog-backdrop" on:click=move |_| if !busy.get_untracked() { on_cancel.run(()) }>
            <div class="dialog" on:click=move |ev| ev.stop_propagation() on:keydown=on_keydown tabindex="0">
                <h2>{title}</h2>
                <p class="dialog__message">{message}</p>
                <div class="dialog__actions">
                    <button class="btn" disabled=move || busy.get() on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button class="btn btn--danger" disabled=move || busy.get() on:click=move |_| on_confirm.run(())>
                        {move || if busy.get() { "Working…" } else { confirm_label }}
                    </button>
                </div>
            </div>
        </div>
    }
}
