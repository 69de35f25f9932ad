//! # Store crate — client-side domain state for the association platform
//!
//! Everything the client keeps between two requests lives here, with no network code:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Serde records mirroring the API resources |
//! | [`diff`] | Working copies, field-by-field comparison and sparse patches |
//! | [`dates`] | Date/timestamp normalisation used by the diffs |
//! | [`collection`] | Cached list holder with staleness tracking |
//! | [`state`] | Per-entity state objects and [`AppState`] |
//! | [`pagination`] | In-memory pagination of directory lists |
//! | [`search`] | Advanced association search |
//! | [`tokens`] | Bearer token storage trait, with [`MemoryTokens`] and [`FileTokens`] |
//! | [`config`] | `client.toml` preferences |

pub mod collection;
pub mod config;
pub mod dates;
pub mod diff;
pub mod models;
pub mod pagination;
pub mod search;
pub mod state;
pub mod tokens;

mod file_store;
mod memory;
pub use file_store::FileTokens;
pub use memory::MemoryTokens;

pub use collection::Collection;
pub use config::ClientConfig;
pub use diff::{arrays_are_equal, DiffError, Patch, SetChanges};
pub use pagination::Paginator;
pub use search::AssociationFilter;
pub use state::AppState;
pub use tokens::{TokenError, TokenStore, Tokens};
