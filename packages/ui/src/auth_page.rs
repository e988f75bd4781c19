//! Sign-in / register page.

use dioxus::prelude::*;
use store::{AuthForm, AuthMode};

use crate::context::{use_auth, use_note_store, AuthState};

#[component]
pub fn AuthPage() -> Element {
    let store = use_note_store();
    let mut auth_state = use_auth();
    let mut form = use_signal(AuthForm::new);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(request) = form.write().prepare() else {
            return;
        };
        let store = store.clone();
        spawn(async move {
            let result = request.send(store.client()).await;
            let Some(session) = form.write().complete(result) else {
                return;
            };
            // The notes view loads the user's notes when it mounts.
            auth_state.set(AuthState::signed_in(session));
        });
    };

    let current = form();
    let register = current.mode == AuthMode::Register;

    rsx! {
        div {
            class: "auth-container",

            form {
                class: "auth-form",
                onsubmit: handle_submit,

                h1 {
                    if register { "Create an account" } else { "Sign in" }
                }

                if let Some(error) = current.error.clone() {
                    div { class: "auth-error", "{error}" }
                }

                input {
                    r#type: "email",
                    placeholder: "Email",
                    required: true,
                    value: current.email().to_string(),
                    oninput: move |evt: FormEvent| form.write().set_email(&evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    required: true,
                    value: current.password.clone(),
                    oninput: move |evt: FormEvent| form.write().password = evt.value(),
                }
                if register {
                    input {
                        r#type: "password",
                        placeholder: "Confirm password",
                        required: true,
                        value: current.confirm_password.clone(),
                        oninput: move |evt: FormEvent| form.write().confirm_password = evt.value(),
                    }
                }

                button {
                    class: "auth-submit",
                    r#type: "submit",
                    disabled: current.loading,
                    if current.loading {
                        "Loading..."
                    } else if register {
                        "Register"
                    } else {
                        "Sign in"
                    }
                }

                button {
                    class: "auth-toggle",
                    r#type: "button",
                    onclick: move |_| form.write().toggle_mode(),
                    if register {
                        "Already have an account? Sign in"
                    } else {
                        "Need an account? Register"
                    }
                }
            }
        }

        style {
            r#"
            .auth-container {{
                display: flex;
                align-items: center;
                justify-content: center;
                min-height: 100vh;
                padding: 2rem;
            }}

            .auth-form {{
                display: flex;
                flex-direction: column;
                gap: 0.75rem;
                width: 100%;
                max-width: 320px;
            }}

            .auth-form input {{
                padding: 0.5rem 0.75rem;
                border: 1px solid #e3e2e0;
                border-radius: 4px;
                font-size: 0.9375rem;
            }}

            .auth-error {{
                padding: 0.5rem 0.75rem;
                border-radius: 4px;
                background: #fdebec;
                color: #9f2f2d;
                font-size: 0.875rem;
            }}

            .auth-submit {{
                padding: 0.625rem 1.25rem;
                border: none;
                border-radius: 4px;
                background: #2383e2;
                color: white;
                font-weight: 500;
                cursor: pointer;
            }}

            .auth-submit:disabled {{
                opacity: 0.5;
                cursor: not-allowed;
            }}

            .auth-toggle {{
                border: none;
                background: none;
                color: #787774;
                cursor: pointer;
            }}
            "#
        }
    }
}
