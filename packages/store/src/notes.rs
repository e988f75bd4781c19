//! # Note store — in-memory mirror of the user's notepads
//!
//! [`NoteStore`] keeps the current user's notes in memory, newest-created
//! first, and reconciles that list with the hosted service after each call.
//! It also exposes a `loading` flag and the message of the last failure.
//!
//! ## Operation protocol
//!
//! Every operation runs the same steps:
//!
//! 1. set `loading = true` and clear `error`;
//! 2. ask the client for its current session, failing with
//!    [`StoreError::NotAuthenticated`] when there is none;
//! 3. perform the remote call with that session;
//! 4. on success reconcile `notes`, on failure record the message in `error`;
//! 5. clear `loading` once no other operation is in flight. A drop guard
//!    does this on every exit path, including the operation future being
//!    dropped half-way.
//!
//! | Method | Reconciliation on success |
//! |--------|---------------------------|
//! | [`fetch`](NoteStore::fetch) | replace `notes` with the server's list |
//! | [`create`](NoteStore::create) | prepend the created row |
//! | [`update`](NoteStore::update) | replace the matching row in place |
//! | [`delete`](NoteStore::delete) | remove the matching row |
//!
//! `notes` only changes after the server confirms, so a failed call leaves it
//! untouched and nothing needs rolling back. Calls are not retried, and
//! overlapping calls are not prevented here; the UI disables its submit
//! controls while `loading` is set.
//!
//! ## Subscribers
//!
//! [`subscribe`](NoteStore::subscribe) registers a callback that receives a
//! snapshot after every state change. The UI uses it to mirror the store into
//! a reactive signal.
//!
//! The store is single-threaded: state lives behind `Rc<RefCell<_>>` and no
//! borrow is held across an `.await`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::StoreError;
use crate::models::{NewNote, Note, NoteId, NotePatch, Session};
use crate::remote::RemoteClient;

/// Observable state of a [`NoteStore`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NotesState {
    pub notes: Vec<Note>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Handle returned by [`NoteStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Rc<dyn Fn(&NotesState)>;

#[derive(Default)]
struct Shared {
    state: RefCell<NotesState>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: Cell<u64>,
    in_flight: Cell<usize>,
}

impl Shared {
    fn update(&self, f: impl FnOnce(&mut NotesState)) {
        f(&mut self.state.borrow_mut());
        self.notify();
    }

    fn notify(&self) {
        let snapshot = self.state.borrow().clone();
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, s)| s.clone())
            .collect();
        for subscriber in subscribers {
            subscriber(&snapshot);
        }
    }
}

/// One operation in flight. `loading` is cleared when the last one drops.
struct Busy<'a> {
    shared: &'a Shared,
}

impl<'a> Busy<'a> {
    fn begin(shared: &'a Shared) -> Self {
        shared.in_flight.set(shared.in_flight.get() + 1);
        shared.update(|state| {
            state.loading = true;
            state.error = None;
        });
        Self { shared }
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        let remaining = self.shared.in_flight.get().saturating_sub(1);
        self.shared.in_flight.set(remaining);
        if remaining == 0 {
            self.shared.update(|state| state.loading = false);
        }
    }
}

/// The user's notes, kept in step with a [`RemoteClient`].
pub struct NoteStore<C> {
    client: Rc<C>,
    shared: Rc<Shared>,
}

impl<C> Clone for NoteStore<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl<C: RemoteClient> NoteStore<C> {
    pub fn new(client: C) -> Self {
        Self {
            client: Rc::new(client),
            shared: Rc::default(),
        }
    }

    /// The remote client the store delegates to.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> NotesState {
        self.shared.state.borrow().clone()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.shared.state.borrow().notes.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.shared.state.borrow().error.clone()
    }

    /// Register `f` to be called with a snapshot after every state change.
    pub fn subscribe(&self, f: impl Fn(&NotesState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.shared.next_subscription.get());
        self.shared.next_subscription.set(id.0 + 1);
        self.shared
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(f)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.shared
            .subscribers
            .borrow_mut()
            .retain(|(sid, _)| *sid != id);
    }

    /// Drop all notes and the last error.
    pub fn clear(&self) {
        self.shared.update(|state| *state = NotesState::default());
    }

    /// Reload every note from the service.
    pub async fn fetch(&self) -> Result<(), StoreError> {
        let _busy = Busy::begin(&self.shared);
        tracing::debug!("fetching notes");
        let result = async {
            let session = self.session().await?;
            Ok::<_, StoreError>(self.client.list_notes(&session).await?)
        }
        .await;
        self.settle("fetch", result, |state, notes| state.notes = notes.clone())
            .map(|_| ())
    }

    /// Create a note and prepend it.
    pub async fn create(&self, note: NewNote) -> Result<Note, StoreError> {
        let _busy = Busy::begin(&self.shared);
        tracing::debug!(title = %note.title, "creating note");
        let result = async {
            let session = self.session().await?;
            Ok::<_, StoreError>(self.client.insert_note(&session, &note).await?)
        }
        .await;
        self.settle("create", result, |state, created| {
            state.notes.insert(0, created.clone())
        })
    }

    /// Apply `patch` to the note `id` and replace it where it stands.
    pub async fn update(&self, id: &NoteId, patch: NotePatch) -> Result<Note, StoreError> {
        let _busy = Busy::begin(&self.shared);
        tracing::debug!(%id, "updating note");
        let result = async {
            let session = self.session().await?;
            Ok::<_, StoreError>(self.client.update_note(&session, id, &patch).await?)
        }
        .await;
        self.settle("update", result, |state, updated| {
            if let Some(slot) = state.notes.iter_mut().find(|n| &n.id == id) {
                *slot = updated.clone();
            }
        })
    }

    /// Delete the note `id` and drop it from the list.
    pub async fn delete(&self, id: &NoteId) -> Result<(), StoreError> {
        let _busy = Busy::begin(&self.shared);
        tracing::debug!(%id, "deleting note");
        let result = async {
            let session = self.session().await?;
            Ok::<_, StoreError>(self.client.delete_note(&session, id).await?)
        }
        .await;
        self.settle("delete", result, |state, _| {
            state.notes.retain(|n| &n.id != id)
        })
    }

    /// End the remote session and forget the local notes.
    pub async fn sign_out(&self) -> Result<(), StoreError> {
        match self.client.sign_out().await {
            Ok(()) => {
                self.clear();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "sign out failed");
                let message = e.to_string();
                self.shared.update(|state| state.error = Some(message));
                Err(e.into())
            }
        }
    }

    async fn session(&self) -> Result<Session, StoreError> {
        self.client
            .current_session()
            .await?
            .ok_or(StoreError::NotAuthenticated)
    }

    fn settle<T>(
        &self,
        op: &'static str,
        result: Result<T, StoreError>,
        reconcile: impl FnOnce(&mut NotesState, &T),
    ) -> Result<T, StoreError> {
        match result {
            Ok(value) => {
                self.shared.update(|state| reconcile(state, &value));
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(op, error = %e, "notes operation failed");
                let message = e.to_string();
                self.shared.update(|state| state.error = Some(message));
                Err(e)
            }
        }
    }
}
