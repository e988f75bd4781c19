use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeZone, Utc};

use crate::error::RemoteError;
use crate::models::{NewNote, Note, NoteId, NotePatch, Session, SessionUser};
use crate::remote::RemoteClient;

/// Auth and table calls observed by a [`MemoryBackend`], in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    CurrentSession,
    SignUp,
    SignIn,
    SignOut,
    List,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Default)]
struct Inner {
    /// email -> (user id, password)
    accounts: HashMap<String, (String, String)>,
    /// access token -> user id
    tokens: HashMap<String, String>,
    session: Option<Session>,
    rows: Vec<Note>,
    next_id: u64,
    clock: i64,
    fail_next: Option<String>,
    calls: Vec<Call>,
}

impl Inner {
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        Utc.timestamp_opt(1_700_000_000 + self.clock, 0)
            .single()
            .unwrap_or_default()
    }

    fn issue_session(&mut self, user_id: &str, email: &str) -> Session {
        self.next_id += 1;
        let token = format!("token-{}", self.next_id);
        self.tokens.insert(token.clone(), user_id.to_string());
        let session = Session {
            access_token: token,
            refresh_token: None,
            expires_at: None,
            user: SessionUser {
                id: user_id.to_string(),
                email: Some(email.to_string()),
            },
        };
        self.session = Some(session.clone());
        session
    }

    fn authorize(&self, session: &Session) -> Result<String, RemoteError> {
        self.tokens
            .get(&session.access_token)
            .cloned()
            .ok_or_else(|| RemoteError::new("invalid JWT"))
    }

    fn take_failure(&mut self) -> Result<(), RemoteError> {
        match self.fail_next.take() {
            Some(message) => Err(RemoteError::new(message)),
            None => Ok(()),
        }
    }
}

/// In-memory stand-in for the hosted service, for tests and offline use.
///
/// Rows are scoped by the session user the same way the real service scopes
/// them, ids and timestamps are assigned on insert, and a single failure can
/// be injected with [`fail_next`](MemoryBackend::fail_next).
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create an account without signing in.
    pub fn register_account(&self, email: &str, password: &str) -> String {
        let mut inner = self.lock();
        inner.next_id += 1;
        let user_id = format!("user-{}", inner.next_id);
        inner
            .accounts
            .insert(email.to_string(), (user_id.clone(), password.to_string()));
        user_id
    }

    /// Make the next table call fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.lock().fail_next = Some(message.into());
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Every stored row regardless of owner.
    pub fn rows(&self) -> Vec<Note> {
        self.lock().rows.clone()
    }

    fn record(&self, call: Call) -> MutexGuard<'_, Inner> {
        let mut inner = self.lock();
        inner.calls.push(call);
        inner
    }
}

impl RemoteClient for MemoryBackend {
    async fn current_session(&self) -> Result<Option<Session>, RemoteError> {
        Ok(self.record(Call::CurrentSession).session.clone())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        let mut inner = self.record(Call::SignUp);
        if inner.accounts.contains_key(email) {
            return Err(RemoteError::new("User already registered"));
        }
        if password.len() < 6 {
            return Err(RemoteError::new(
                "Password should be at least 6 characters",
            ));
        }
        inner.next_id += 1;
        let user_id = format!("user-{}", inner.next_id);
        inner
            .accounts
            .insert(email.to_string(), (user_id.clone(), password.to_string()));
        Ok(inner.issue_session(&user_id, email))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        let mut inner = self.record(Call::SignIn);
        let user_id = match inner.accounts.get(email) {
            Some((id, stored)) if stored == password => id.clone(),
            _ => return Err(RemoteError::new("Invalid login credentials")),
        };
        Ok(inner.issue_session(&user_id, email))
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        let mut inner = self.record(Call::SignOut);
        if let Some(session) = inner.session.take() {
            inner.tokens.remove(&session.access_token);
        }
        Ok(())
    }

    async fn list_notes(&self, session: &Session) -> Result<Vec<Note>, RemoteError> {
        let mut inner = self.record(Call::List);
        inner.take_failure()?;
        let user_id = inner.authorize(session)?;
        let mut notes: Vec<Note> = inner
            .rows
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    async fn insert_note(&self, session: &Session, note: &NewNote) -> Result<Note, RemoteError> {
        let mut inner = self.record(Call::Insert);
        inner.take_failure()?;
        let user_id = inner.authorize(session)?;
        let row = note.owned_by(&user_id);
        inner.next_id += 1;
        let id = NoteId::new(inner.next_id.to_string());
        let now = inner.tick();
        let stored = Note {
            id,
            user_id: row.user_id,
            title: row.title,
            content: row.content,
            created_at: now,
            updated_at: now,
        };
        inner.rows.push(stored.clone());
        Ok(stored)
    }

    async fn update_note(
        &self,
        session: &Session,
        id: &NoteId,
        patch: &NotePatch,
    ) -> Result<Note, RemoteError> {
        let mut inner = self.record(Call::Update);
        inner.take_failure()?;
        let user_id = inner.authorize(session)?;
        let now = inner.tick();
        let row = inner
            .rows
            .iter_mut()
            .find(|n| &n.id == id && n.user_id == user_id)
            .ok_or_else(|| RemoteError::new("Cannot coerce the result to a single JSON object"))?;
        row.apply(patch);
        row.updated_at = now;
        Ok(row.clone())
    }

    async fn delete_note(&self, session: &Session, id: &NoteId) -> Result<(), RemoteError> {
        let mut inner = self.record(Call::Delete);
        inner.take_failure()?;
        let user_id = inner.authorize(session)?;
        inner.rows.retain(|n| !(&n.id == id && n.user_id == user_id));
        Ok(())
    }
}
