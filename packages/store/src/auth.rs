//! # Sign-in / register form
//!
//! [`AuthForm`] holds the fields of the authentication page and its two modes.
//! The mode is plain UI state, flipped with [`toggle_mode`](AuthForm::toggle_mode).
//!
//! Submitting is split in three steps so a reactive UI can release its state
//! borrow while the request is in flight:
//!
//! 1. [`prepare`](AuthForm::prepare) validates locally and returns an
//!    [`AuthRequest`]. A local failure sets `error` and yields nothing to send,
//!    so no remote call can happen (e.g. mismatched passwords in register mode).
//! 2. [`AuthRequest::send`] signs in or signs up through the [`RemoteClient`].
//! 3. [`complete`](AuthForm::complete) clears `loading` and records the
//!    service's message verbatim on failure.
//!
//! [`submit`](AuthForm::submit) runs all three and, on success, loads the
//! user's notes into the given [`NoteStore`]. A failed load shows up in the
//! store's own `error`, not in the form.

use crate::error::{StoreError, ValidationError};
use crate::models::Session;
use crate::notes::NoteStore;
use crate::remote::RemoteClient;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignIn,
    Register,
}

/// Credentials ready to be sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthRequest {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
}

impl AuthRequest {
    pub async fn send<C: RemoteClient>(&self, client: &C) -> Result<Session, StoreError> {
        tracing::debug!(mode = ?self.mode, email = %self.email, "authenticating");
        let session = match self.mode {
            AuthMode::SignIn => client.sign_in(&self.email, &self.password).await?,
            AuthMode::Register => client.sign_up(&self.email, &self.password).await?,
        };
        Ok(session)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthForm {
    pub mode: AuthMode,
    email: String,
    pub password: String,
    pub confirm_password: String,
    pub error: Option<String>,
    pub loading: bool,
}

impl AuthForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Emails are kept trimmed and lower-cased as they are typed.
    pub fn set_email(&mut self, email: &str) {
        self.email = email.trim().to_lowercase();
    }

    pub fn is_register(&self) -> bool {
        self.mode == AuthMode::Register
    }

    /// Switch between sign-in and register, dropping any error shown.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::SignIn => AuthMode::Register,
            AuthMode::Register => AuthMode::SignIn,
        };
        self.error = None;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.email.is_empty() {
            return Err(ValidationError::EmptyEmail);
        }
        if self.password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        if self.is_register() && self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }

    /// Validate the fields and mark the form busy.
    pub fn prepare(&mut self) -> Option<AuthRequest> {
        self.error = None;
        match self.validate() {
            Ok(()) => {
                self.loading = true;
                Some(AuthRequest {
                    mode: self.mode,
                    email: self.email.clone(),
                    password: self.password.clone(),
                })
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Record the outcome of a sent request.
    pub fn complete(&mut self, result: Result<Session, StoreError>) -> Option<Session> {
        self.loading = false;
        match result {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "authentication failed");
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Authenticate and, on success, load the user's notes.
    pub async fn submit<C: RemoteClient>(&mut self, notes: &NoteStore<C>) -> Option<Session> {
        let request = self.prepare()?;
        let result = request.send(notes.client()).await;
        let session = self.complete(result)?;
        let _ = notes.fetch().await;
        Some(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Call, MemoryBackend};
    use crate::models::NewNote;

    fn register_form(password: &str, confirm: &str) -> AuthForm {
        let mut form = AuthForm::new();
        form.toggle_mode();
        form.set_email("  New@Example.COM ");
        form.password = password.into();
        form.confirm_password = confirm.into();
        form
    }

    #[test]
    fn test_email_is_normalised() {
        let mut form = AuthForm::new();
        form.set_email("  Someone@Example.COM ");
        assert_eq!(form.email(), "someone@example.com");
    }

    #[test]
    fn test_toggle_clears_error() {
        let mut form = AuthForm::new();
        form.error = Some("bad".into());
        form.toggle_mode();
        assert!(form.is_register());
        assert_eq!(form.error, None);
        form.toggle_mode();
        assert_eq!(form.mode, AuthMode::SignIn);
    }

    #[tokio::test]
    async fn test_mismatched_passwords_never_call_sign_up() {
        let store = NoteStore::new(MemoryBackend::new());
        let mut form = register_form("secret1", "secret2");

        assert_eq!(form.submit(&store).await, None);

        assert_eq!(form.error.as_deref(), Some("Passwords do not match"));
        assert!(!form.loading);
        assert!(store.client().calls().is_empty());
    }

    #[test]
    fn test_sign_in_ignores_confirmation() {
        let mut form = AuthForm::new();
        form.set_email("a@b.c");
        form.password = "secret1".into();
        form.confirm_password = "other".into();
        let request = form.prepare().unwrap();
        assert_eq!(request.mode, AuthMode::SignIn);
        assert!(form.loading);
    }

    #[tokio::test]
    async fn test_register_loads_user_data() {
        let store = NoteStore::new(MemoryBackend::new());
        let mut form = register_form("secret1", "secret1");

        let session = form.submit(&store).await.unwrap();

        assert_eq!(session.user.email.as_deref(), Some("new@example.com"));
        assert_eq!(form.error, None);
        assert!(!form.loading);
        assert_eq!(
            store.client().calls(),
            vec![Call::SignUp, Call::CurrentSession, Call::List]
        );
    }

    #[tokio::test]
    async fn test_sign_in_shows_existing_notes() {
        let backend = MemoryBackend::new();
        let session = backend.sign_up("a@b.c", "secret1").await.unwrap();
        backend
            .insert_note(&session, &NewNote::new("kept", "x"))
            .await
            .unwrap();
        backend.sign_out().await.unwrap();
        let store = NoteStore::new(backend);

        let mut form = AuthForm::new();
        form.set_email("a@b.c");
        form.password = "secret1".into();
        form.submit(&store).await.unwrap();

        assert_eq!(store.notes()[0].title, "kept");
    }

    #[tokio::test]
    async fn test_remote_error_is_shown_verbatim() {
        let store = NoteStore::new(MemoryBackend::new());
        let mut form = AuthForm::new();
        form.set_email("nobody@example.com");
        form.password = "whatever".into();

        assert_eq!(form.submit(&store).await, None);

        assert_eq!(form.error.as_deref(), Some("Invalid login credentials"));
        assert!(!form.loading);
        assert!(store.notes().is_empty());
    }
}
