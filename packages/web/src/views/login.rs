//! Sign-in / register page view.

use dioxus::prelude::*;
use ui::{use_auth, AuthPage};

use crate::Route;

#[component]
pub fn Login() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    // If already signed in, go to the notes
    use_effect(move || {
        if !auth().loading && auth().session.is_some() {
            nav.replace(Route::Notes {});
        }
    });

    rsx! {
        AuthPage {}
    }
}
