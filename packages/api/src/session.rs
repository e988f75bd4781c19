//! # Auth endpoint responses and session persistence
//!
//! The token endpoints answer with an access token, a refresh token, the
//! lifetime of the access token and the user. [`TokenResponse::into_session`]
//! turns that into a [`store::Session`] with an absolute expiry.
//!
//! Sign-up answers with the same shape when the project confirms accounts
//! automatically. When email confirmation is required it answers with only the
//! user, and no session can be built.
//!
//! Sessions are kept as JSON under [`SESSION_KEY`] in the client's
//! [`KeyValueStorage`], so a reload restores the signed-in state.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;
use store::{KeyValueStorage, Session, SessionUser};

/// Storage key of the persisted session.
pub const SESSION_KEY: &str = "notepad.auth.session";

#[derive(Debug, Deserialize)]
pub(crate) struct WireUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Absolute expiry in Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub user: Option<WireUser>,
}

impl TokenResponse {
    /// Build a session, or `None` when the response carries no token.
    pub fn into_session(self, now: DateTime<Utc>) -> Option<Session> {
        let access_token = self.access_token?;
        let user = self.user?;
        let expires_at = match (self.expires_at, self.expires_in) {
            (Some(at), _) => Utc.timestamp_opt(at, 0).single(),
            (None, Some(secs)) => Some(now + Duration::seconds(secs)),
            (None, None) => None,
        };
        Some(Session {
            access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: SessionUser {
                id: user.id,
                email: user.email,
            },
        })
    }
}

/// Read a previously persisted session. Corrupt entries are ignored.
pub(crate) fn restore<S: KeyValueStorage>(storage: &S) -> Option<Session> {
    let raw = storage.get(SESSION_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable stored session");
            None
        }
    }
}

pub(crate) fn persist<S: KeyValueStorage>(storage: &S, session: Option<&Session>) {
    let result = match session {
        Some(session) => match serde_json::to_string(session) {
            Ok(json) => storage.set(SESSION_KEY, &json),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialise session");
                return;
            }
        },
        None => storage.remove(SESSION_KEY),
    };
    if let Err(e) = result {
        tracing::error!(error = %e, "failed to persist session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStorage;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).single().unwrap()
    }

    #[test]
    fn test_token_response_with_expires_in() {
        let json = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r1",
            "user": {"id": "u-1", "email": "a@b.c", "aud": "authenticated"}
        }"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        let session = response.into_session(now()).unwrap();
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.refresh_token.as_deref(), Some("r1"));
        assert_eq!(session.user.id, "u-1");
        assert_eq!(session.expires_at, Some(now() + Duration::seconds(3600)));
    }

    #[test]
    fn test_absolute_expiry_wins() {
        let json = r#"{"access_token":"jwt","expires_in":10,"expires_at":1700000500,"user":{"id":"u"}}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        let session = response.into_session(now()).unwrap();
        assert_eq!(
            session.expires_at,
            Utc.timestamp_opt(1_700_000_500, 0).single()
        );
    }

    #[test]
    fn test_confirmation_pending_has_no_session() {
        // Sign-up with email confirmation returns the bare user.
        let json = r#"{"id":"u-1","email":"a@b.c","confirmation_sent_at":"2024-01-01T00:00:00Z"}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert!(response.into_session(now()).is_none());
    }

    #[test]
    fn test_persist_and_restore() {
        let storage = MemoryStorage::new();
        assert!(restore(&storage).is_none());

        let session = Session {
            access_token: "jwt".into(),
            refresh_token: Some("r".into()),
            expires_at: Some(now()),
            user: SessionUser {
                id: "u".into(),
                email: None,
            },
        };
        persist(&storage, Some(&session));
        assert_eq!(restore(&storage), Some(session));

        persist(&storage, None);
        assert!(restore(&storage).is_none());
    }

    #[test]
    fn test_corrupt_entry_is_ignored() {
        let storage = MemoryStorage::new();
        storage.set(SESSION_KEY, "{not json").unwrap();
        assert!(restore(&storage).is_none());
    }
}
