//! Shared backend constructor for all platforms.
//!
//! Returns a [`Backend`] talking to the hosted service when it is configured,
//! and an in-memory [`store::MemoryBackend`] otherwise. Local state lives in the
//! platform's key-value storage:
//! - **Web** (WASM + `web` feature): `window.localStorage` via [`store::LocalStorage`]
//! - **Desktop / Mobile** (native): files under `<data_dir>/notepad/` via [`store::FileStorage`]

use api::{HostedClient, ServiceConfig};
use store::{
    MemoryBackend, NewNote, Note, NoteId, NotePatch, NotepadConfig, RemoteClient, RemoteError,
    Session,
};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStorage = store::LocalStorage;
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type PlatformStorage = store::FileStorage;

/// The remote client used by the application.
pub enum Backend {
    Hosted(HostedClient<PlatformStorage>),
    Offline(MemoryBackend),
}

impl RemoteClient for Backend {
    async fn current_session(&self) -> Result<Option<Session>, RemoteError> {
        match self {
            Self::Hosted(client) => client.current_session().await,
            Self::Offline(client) => client.current_session().await,
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        match self {
            Self::Hosted(client) => client.sign_up(email, password).await,
            Self::Offline(client) => client.sign_up(email, password).await,
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        match self {
            Self::Hosted(client) => client.sign_in(email, password).await,
            Self::Offline(client) => client.sign_in(email, password).await,
        }
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        match self {
            Self::Hosted(client) => client.sign_out().await,
            Self::Offline(client) => client.sign_out().await,
        }
    }

    async fn list_notes(&self, session: &Session) -> Result<Vec<Note>, RemoteError> {
        match self {
            Self::Hosted(client) => client.list_notes(session).await,
            Self::Offline(client) => client.list_notes(session).await,
        }
    }

    async fn insert_note(&self, session: &Session, note: &NewNote) -> Result<Note, RemoteError> {
        match self {
            Self::Hosted(client) => client.insert_note(session, note).await,
            Self::Offline(client) => client.insert_note(session, note).await,
        }
    }

    async fn update_note(
        &self,
        session: &Session,
        id: &NoteId,
        patch: &NotePatch,
    ) -> Result<Note, RemoteError> {
        match self {
            Self::Hosted(client) => client.update_note(session, id, patch).await,
            Self::Offline(client) => client.update_note(session, id, patch).await,
        }
    }

    async fn delete_note(&self, session: &Session, id: &NoteId) -> Result<(), RemoteError> {
        match self {
            Self::Hosted(client) => client.delete_note(session, id).await,
            Self::Offline(client) => client.delete_note(session, id).await,
        }
    }
}

/// Create the platform-appropriate key-value storage.
pub fn make_storage() -> PlatformStorage {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::LocalStorage::new()
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        store::FileStorage::new(data_dir())
    }
}

#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
fn data_dir() -> std::path::PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("notepad")
}

/// Load `notepad.toml` from the data directory, falling back to defaults.
///
/// The web build has no config file and always uses the defaults.
pub fn load_config() -> NotepadConfig {
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        let path = data_dir().join(NotepadConfig::filename());
        match std::fs::read_to_string(&path) {
            Ok(raw) => match NotepadConfig::from_toml(&raw) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config"),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to read config"),
        }
    }
    NotepadConfig::default()
}

fn service_config() -> api::Result<ServiceConfig> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        ServiceConfig::from_env().or_else(|_| ServiceConfig::from_build_env())
    }
    #[cfg(target_arch = "wasm32")]
    {
        ServiceConfig::from_build_env()
    }
}

/// Create the backend for `config`.
pub fn make_backend(config: &NotepadConfig) -> Backend {
    match service_config() {
        Ok(service) => {
            tracing::info!(url = %service.url, "using hosted notes service");
            Backend::Hosted(HostedClient::new(
                service.with_app_config(config),
                make_storage(),
            ))
        }
        Err(e) => {
            tracing::warn!(error = %e, "no notes service configured, notes are kept in memory");
            Backend::Offline(MemoryBackend::new())
        }
    }
}
