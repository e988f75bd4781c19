//! This crate contains all shared UI for the workspace.

mod backend;
pub use backend::{load_config, make_backend, make_storage, Backend, PlatformStorage};

mod context;
pub use context::{
    use_auth, use_config, use_note_store, use_notes, AuthState, NotepadProvider, SignOutButton,
};

mod auth_page;
pub use auth_page::AuthPage;

mod notepad_list;
pub use notepad_list::NotepadList;

mod global_notepad;
pub use global_notepad::GlobalNotepadWidget;
