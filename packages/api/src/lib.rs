//! # API crate — client for the hosted notepad service
//!
//! The notes and accounts of the application live in a hosted
//! backend-as-a-service. This crate is the only place that knows how to talk
//! to it; everything else goes through [`store::RemoteClient`].
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | [`ServiceConfig`]: base URL, public key and table name, from the environment (`dotenvy`) or build-time values |
//! | `client` | [`HostedClient`], the `reqwest` implementation of [`store::RemoteClient`] |
//! | `session` | Token responses, session expiry and persistence in a [`store::KeyValueStorage`] |
//! | `error` | [`Error`] and the extraction of the service's own error messages |

pub mod config;

mod client;
mod error;
mod session;

pub use client::HostedClient;
pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use session::SESSION_KEY;
