//! Login Prompt Component
//!
//! Modal opened on `login-required`. Signs in locally by name.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::context::use_app_context;

#[component]
pub fn LoginPrompt() -> impl IntoView {
    let ctx = use_app_context();
    let (name, set_name) = signal(String::new());
    let (error, set_error) = signal(None::<String>);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match ctx.sign_in(&name.get_untracked()) {
            Ok(()) => {
                set_name.set(String::new());
                set_error.set(None);
            }
            Err(e) => set_error.set(Some(e.to_string())),
        }
    };

    view! {
        <Show when=move || ctx.login_open.get()>
            <div class="modal-backdrop" on:click=move |_| ctx.close_login()>
                <form
                    class="login-modal"
                    on:click=|ev: web_sys::MouseEvent| ev.stop_propagation()
                    on:submit=submit
                >
                    <h3>"Sign in to save favorites"</h3>
                    <input
                        type="text"
                        placeholder="Your name"
                        prop:value=move || name.get()
                        on:input=move |ev| {
                            if let Some(input) = ev
                                .target()
                                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
                            {
                                set_name.set(input.value());
                            }
                        }
                    />
                    {move || error.get().map(|e| view! { <p class="form-error">{e}</p> })}
                    <div class="modal-actions">
                        <button type="button" class="cancel-btn" on:click=move |_| ctx.close_login()>
                            "Not now"
                        </button>
                        <button type="submit">"Sign in"</button>
                    </div>
                </form>
            </div>
        </Show>
    }
}
