//! # Remote data client contract
//!
//! [`RemoteClient`] is the seam between the note store and the hosted data
//! service. It covers the two halves of that service the application uses:
//!
//! | Group | Methods |
//! |-------|---------|
//! | Auth | [`current_session`](RemoteClient::current_session), [`sign_up`](RemoteClient::sign_up), [`sign_in`](RemoteClient::sign_in), [`sign_out`](RemoteClient::sign_out) |
//! | `notepad` table | [`list_notes`](RemoteClient::list_notes), [`insert_note`](RemoteClient::insert_note), [`update_note`](RemoteClient::update_note), [`delete_note`](RemoteClient::delete_note) |
//!
//! Table calls take the [`Session`] explicitly instead of reading ambient
//! client state, so the store decides when a session is required and tests can
//! drive any implementation without a real backend. The service is trusted to
//! scope rows to the session's user.
//!
//! Implementations: [`crate::MemoryBackend`] here, and the HTTP client in the
//! `api` crate. Futures are not required to be `Send`; everything runs on the
//! UI thread.

use std::future::Future;

use crate::error::RemoteError;
use crate::models::{NewNote, Note, NoteId, NotePatch, Session};

/// Async interface to the hosted auth and table service.
pub trait RemoteClient {
    /// The session currently held by the client, if any.
    fn current_session(&self) -> impl Future<Output = Result<Option<Session>, RemoteError>>;

    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, RemoteError>>;

    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, RemoteError>>;

    fn sign_out(&self) -> impl Future<Output = Result<(), RemoteError>>;

    /// The session user's notes, newest-created first.
    fn list_notes(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<Vec<Note>, RemoteError>>;

    /// Insert a note owned by the session user and return the stored row.
    fn insert_note(
        &self,
        session: &Session,
        note: &NewNote,
    ) -> impl Future<Output = Result<Note, RemoteError>>;

    /// Apply `patch` to the row with `id` and return the updated row.
    fn update_note(
        &self,
        session: &Session,
        id: &NoteId,
        patch: &NotePatch,
    ) -> impl Future<Output = Result<Note, RemoteError>>;

    fn delete_note(
        &self,
        session: &Session,
        id: &NoteId,
    ) -> impl Future<Output = Result<(), RemoteError>>;
}
