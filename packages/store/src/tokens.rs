//! # Bearer token storage
//!
//! The API hands out two JWTs at login: a short-lived *access* token sent as
//! `Authorization: Bearer …` and a *refresh* token used to obtain a new access token.
//! Both are persisted under fixed keys through the [`TokenStore`] trait and cleared on
//! logout. Implementations live in sibling modules ([`crate::memory`],
//! [`crate::file_store`]).

use std::future::Future;

use serde::{Deserialize, Serialize};

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "JWT__access__token";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "JWT__refresh__token";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    #[serde(rename = "JWT__access__token", default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(rename = "JWT__refresh__token", default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

impl Tokens {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: Some(access.into()),
            refresh: Some(refresh.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("token file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("tokens could not be serialised: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Async trait for reading and writing the bearer tokens.
pub trait TokenStore {
    fn load(&self) -> impl Future<Output = Result<Tokens, TokenError>>;
    fn save(&self, tokens: &Tokens) -> impl Future<Output = Result<(), TokenError>>;
    fn clear(&self) -> impl Future<Output = Result<(), TokenError>>;
}
