use std::sync::{Arc, Mutex};

use crate::tokens::{TokenError, TokenStore, Tokens};

/// In-memory TokenStore for testing and short-lived sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokens {
    tokens: Arc<Mutex<Tokens>>,
}

impl MemoryTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `tokens`.
    pub fn with(tokens: Tokens) -> Self {
        Self {
            tokens: Arc::new(Mutex::new(tokens)),
        }
    }

    /// Current content, without going through the async interface.
    pub fn snapshot(&self) -> Tokens {
        self.tokens.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl TokenStore for MemoryTokens {
    async fn load(&self) -> Result<Tokens, TokenError> {
        Ok(self.snapshot())
    }

    async fn save(&self, tokens: &Tokens) -> Result<(), TokenError> {
        *self.tokens.lock().unwrap_or_else(|e| e.into_inner()) = tokens.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenError> {
        *self.tokens.lock().unwrap_or_else(|e| e.into_inner()) = Tokens::default();
        Ok(())
    }
}
