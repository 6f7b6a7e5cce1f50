//! Dismissible error/success banner above the console.

use leptos::prelude::*;

use crate::state::console::{Banner, ConsoleState};

#[component]
pub fn BannerBar() -> impl IntoView {
    let console = expect_context::<RwSignal<ConsoleState>>();

    move || {
        console.with(|c| c.banner.clone()).map(|banner| {
            let (class, text) = match banner {
                Banner::Error(text) => ("banner banner--error", text),
                Banner::Success(text) => ("banner banner--success", text),
            };
            view! {
                <div class=class role="status">
                    <span class="banner__text">{text}</span>
                    <button class="banner__close" title="Dismiss" on:click=move |_| console.update(ConsoleState::dismiss_banner)>
                        "×"
                    </button>
                </div>
            }
        })
    }
}
