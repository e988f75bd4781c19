use dioxus::prelude::*;

use ui::{GlobalNotepadWidget, NotepadProvider};
use views::{Login, Notes};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Notes {},
    #[route("/login")]
    Login {},
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        NotepadProvider {
            Router::<Route> {}
            GlobalNotepadWidget {}
        }

        style {
            r#"
            body {{
                margin: 0;
                color: #37352f;
                font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            }}

            .notes-header {{
                display: flex;
                align-items: center;
                justify-content: space-between;
                max-width: 720px;
                margin: 0 auto;
                padding: 1rem;
            }}

            .notes-user {{
                display: flex;
                align-items: center;
                gap: 0.75rem;
                color: #787774;
            }}

            button.primary, button.secondary, button.danger {{
                padding: 0.375rem 0.75rem;
                border-radius: 4px;
                border: 1px solid #e3e2e0;
                cursor: pointer;
            }}

            button.primary {{
                background: #2383e2;
                border-color: #2383e2;
                color: white;
            }}

            button.primary:disabled {{
                opacity: 0.5;
                cursor: not-allowed;
            }}

            button.danger {{
                color: #9f2f2d;
            }}
            "#
        }
    }
}
