pub mod auth;
pub mod config;
pub mod draft;
pub mod error;
pub mod models;
pub mod notes;
pub mod remote;
pub mod storage;
pub mod widget;

mod memory;
pub use memory::{Call, MemoryBackend};

pub use auth::{AuthForm, AuthMode, AuthRequest};
pub use config::NotepadConfig;
pub use draft::{DraftSubmission, NoteDraft};
pub use error::{RemoteError, StorageError, StoreError, ValidationError};
pub use models::{NewNote, Note, NoteId, NotePatch, Session, SessionUser};
pub use notes::{NoteStore, NotesState, SubscriptionId};
pub use remote::RemoteClient;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use storage::LocalStorage;
pub use widget::{GlobalNotepad, Point, Viewport};
