//! # HTTP client for the hosted auth and table service
//!
//! [`HostedClient`] implements [`store::RemoteClient`] against a
//! backend-as-a-service that exposes a token-based auth API and a REST view
//! of its Postgres tables.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | sign up | `POST /auth/v1/signup` |
//! | sign in | `POST /auth/v1/token?grant_type=password` |
//! | refresh | `POST /auth/v1/token?grant_type=refresh_token` |
//! | sign out | `POST /auth/v1/logout` |
//! | list | `GET /rest/v1/<table>?select=*&order=created_at.desc` |
//! | insert | `POST /rest/v1/<table>` |
//! | update | `PATCH /rest/v1/<table>?id=eq.<id>` |
//! | delete | `DELETE /rest/v1/<table>?id=eq.<id>` |
//!
//! Every request carries the project's public key in `apikey`. Table requests
//! add `Authorization: Bearer <access token>` from the session passed in, and
//! the service applies its row-level policies to that user. Insert and update
//! ask for the written row back as a single JSON object.
//!
//! The client remembers the last session it obtained and persists it in a
//! [`KeyValueStorage`]. [`current_session`](RemoteClient::current_session)
//! refreshes it when the access token is about to expire. If the service
//! rejects the refresh the session is dropped and the user is signed out; if
//! the service cannot be reached the session is kept and the error returned.
//! Sign-out always forgets the local session, even when the logout request
//! fails.

use std::sync::{Mutex, PoisonError};

use chrono::{Duration, Utc};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use store::{KeyValueStorage, NewNote, Note, NoteId, NotePatch, RemoteClient, RemoteError, Session};

use crate::config::ServiceConfig;
use crate::error::{service_message, Error, Result};
use crate::session::{self, TokenResponse};

const API_KEY_HEADER: &str = "apikey";
const PREFER_HEADER: &str = "Prefer";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Refresh this long before the access token actually expires.
const REFRESH_MARGIN_SECS: i64 = 10;

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Remote client speaking the hosted service's HTTP API.
pub struct HostedClient<S> {
    http: reqwest::Client,
    config: ServiceConfig,
    storage: S,
    session: Mutex<Option<Session>>,
}

impl<S: KeyValueStorage> HostedClient<S> {
    /// Create a client, restoring any session saved in `storage`.
    pub fn new(config: ServiceConfig, storage: S) -> Self {
        let restored = session::restore(&storage);
        if restored.is_some() {
            tracing::debug!("restored stored session");
        }
        Self {
            http: reqwest::Client::new(),
            config,
            storage,
            session: Mutex::new(restored),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn cached(&self) -> Option<Session> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn remember(&self, session: Option<Session>) {
        session::persist(&self.storage, session.as_ref());
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn with_key(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(API_KEY_HEADER, &self.config.anon_key)
    }

    fn authorized(&self, builder: RequestBuilder, session: &Session) -> RequestBuilder {
        self.with_key(builder).bearer_auth(&session.access_token)
    }

    fn single_row(builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT))
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
    }

    async fn token(&self, grant_type: &str, body: &impl Serialize) -> Result<Session> {
        let request = self
            .with_key(self.http.post(self.config.auth_url("token")))
            .query(&[("grant_type", grant_type)])
            .json(body);
        let response: TokenResponse = read_json(request.send().await?).await?;
        response
            .into_session(Utc::now())
            .ok_or_else(|| Error::Service {
                status: 200,
                message: "No session returned".to_string(),
            })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session> {
        tracing::debug!("refreshing session");
        self.token("refresh_token", &RefreshRequest { refresh_token })
            .await
    }
}

impl<S: KeyValueStorage> RemoteClient for HostedClient<S> {
    async fn current_session(&self) -> Result<Option<Session>, RemoteError> {
        let Some(session) = self.cached() else {
            return Ok(None);
        };
        if !session.is_expired(Utc::now() + Duration::seconds(REFRESH_MARGIN_SECS)) {
            return Ok(Some(session));
        }
        let Some(refresh_token) = session.refresh_token.as_deref() else {
            self.remember(None);
            return Ok(None);
        };
        match self.refresh(refresh_token).await {
            Ok(fresh) => {
                self.remember(Some(fresh.clone()));
                Ok(Some(fresh))
            }
            Err(e) if e.is_rejection() => {
                tracing::warn!(error = %e, "session refresh rejected, signing out");
                self.remember(None);
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "session refresh failed, keeping session");
                Err(e.into())
            }
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        let request = self
            .with_key(self.http.post(self.config.auth_url("signup")))
            .json(&Credentials { email, password });
        let response: TokenResponse = read_json(request.send().await.map_err(Error::from)?).await?;
        let session = response
            .into_session(Utc::now())
            .ok_or_else(|| Error::Service {
                status: 200,
                message: "Confirm your email address, then sign in".to_string(),
            })?;
        self.remember(Some(session.clone()));
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        let session = self
            .token("password", &Credentials { email, password })
            .await?;
        self.remember(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        let Some(session) = self.cached() else {
            return Ok(());
        };
        self.remember(None);
        let request = self.authorized(self.http.post(self.config.auth_url("logout")), &session);
        let revoked: Result<()> = async { check(request.send().await?).await }.await;
        // The local sign-out stands whatever the service answers.
        if let Err(e) = revoked {
            tracing::warn!(error = %e, "remote sign-out failed");
        }
        Ok(())
    }

    async fn list_notes(&self, session: &Session) -> Result<Vec<Note>, RemoteError> {
        let request = self
            .authorized(self.http.get(self.config.table_url()), session)
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        Ok(read_json(request.send().await.map_err(Error::from)?).await?)
    }

    async fn insert_note(&self, session: &Session, note: &NewNote) -> Result<Note, RemoteError> {
        let row = note.owned_by(session.user_id());
        let request = Self::single_row(
            self.authorized(self.http.post(self.config.table_url()), session),
        )
        .json(&row);
        Ok(read_json(request.send().await.map_err(Error::from)?).await?)
    }

    async fn update_note(
        &self,
        session: &Session,
        id: &NoteId,
        patch: &NotePatch,
    ) -> Result<Note, RemoteError> {
        let request = Self::single_row(
            self.authorized(self.http.patch(self.config.table_url()), session),
        )
        .query(&[("id", format!("eq.{id}"))])
        .json(patch);
        Ok(read_json(request.send().await.map_err(Error::from)?).await?)
    }

    async fn delete_note(&self, session: &Session, id: &NoteId) -> Result<(), RemoteError> {
        let request = self
            .authorized(self.http.delete(self.config.table_url()), session)
            .query(&[("id", format!("eq.{id}"))]);
        Ok(check(request.send().await.map_err(Error::from)?).await?)
    }
}

/// Fail with the service's message unless the status is a success.
async fn check(response: Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await?;
    Err(Error::Service {
        status: status.as_u16(),
        message: service_message(status, &body),
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "service returned an error");
        return Err(Error::Service {
            status: status.as_u16(),
            message: service_message(status, &body),
        });
    }
    Ok(serde_json::from_str(&body)?)
}
