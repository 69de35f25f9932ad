//! # Filesystem-backed token store
//!
//! [`FileTokens`] is a [`TokenStore`] implementation that keeps both bearer tokens in a
//! small TOML file, so that a session survives restarts of a desktop or console client.
//!
//! ```toml
//! JWT__access__token = "eyJ..."
//! JWT__refresh__token = "eyJ..."
//! ```
//!
//! A missing file reads as "no tokens"; clearing deletes the file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::tokens::{TokenError, TokenStore, Tokens};

#[derive(Clone, Debug)]
pub struct FileTokens {
    path: PathBuf,
}

impl FileTokens {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokens {
    async fn load(&self) -> Result<Tokens, TokenError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Tokens::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, tokens: &Tokens) -> Result<(), TokenError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string_pretty(tokens)?)?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_tokens_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session").join("tokens.toml");

        let store = FileTokens::new(path.clone());
        assert!(store.load().await.unwrap().is_empty());

        store.save(&Tokens::new("a1", "r1")).await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("JWT__access__token"));

        // Re-open from the same path
        let reopened = FileTokens::new(path.clone());
        assert_eq!(reopened.load().await.unwrap(), Tokens::new("a1", "r1"));

        reopened.clear().await.unwrap();
        assert!(!path.exists());
        assert!(store.clear().await.is_ok());
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let store = FileTokens::new(path);
        assert!(matches!(store.load().await, Err(TokenError::Parse(_))));
    }
}
