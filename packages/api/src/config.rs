//! Hosted service configuration from environment variables.

use store::NotepadConfig;

use crate::error::Error;

const URL_VAR: &str = "NOTEPAD_SERVICE_URL";
const KEY_VAR: &str = "NOTEPAD_SERVICE_KEY";

/// Where the hosted service lives and how to identify this application to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Project base URL, e.g. `https://xyzcompany.example.co`.
    pub url: String,
    /// Public (anon) API key sent as the `apikey` header.
    pub anon_key: String,
    /// Table holding the notes.
    pub table: String,
}

impl ServiceConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            table: NotepadConfig::default().service.table,
        }
    }

    /// Use the table named in `config`.
    pub fn with_app_config(mut self, config: &NotepadConfig) -> Self {
        self.table = config.service.table.clone();
        self
    }

    /// Read `NOTEPAD_SERVICE_URL` and `NOTEPAD_SERVICE_KEY`, loading `.env` first.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok();

        let url = std::env::var(URL_VAR).map_err(|_| Error::Config {
            message: format!("{URL_VAR} not set"),
        })?;
        let anon_key = std::env::var(KEY_VAR).map_err(|_| Error::Config {
            message: format!("{KEY_VAR} not set"),
        })?;
        Ok(Self::new(url, anon_key))
    }

    /// Values baked in at compile time, for browser builds.
    pub fn from_build_env() -> Result<Self, Error> {
        match (option_env!("NOTEPAD_SERVICE_URL"), option_env!("NOTEPAD_SERVICE_KEY")) {
            (Some(url), Some(key)) => Ok(Self::new(url, key)),
            _ => Err(Error::Config {
                message: format!("{URL_VAR} and {KEY_VAR} must be set at build time"),
            }),
        }
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.url, path)
    }

    pub(crate) fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let config = ServiceConfig::new("https://demo.example.co/", "anon");
        assert_eq!(config.auth_url("signup"), "https://demo.example.co/auth/v1/signup");
        assert_eq!(config.table_url(), "https://demo.example.co/rest/v1/notepad");
    }

    #[test]
    fn test_table_from_app_config() {
        let app = NotepadConfig::from_toml("[service]\ntable = \"memos\"\n").unwrap();
        let config = ServiceConfig::new("http://localhost:54321", "anon").with_app_config(&app);
        assert_eq!(config.table_url(), "http://localhost:54321/rest/v1/memos");
    }
}
