//! # API crate — typed REST client for the association platform
//!
//! Everything that talks to the REST API. Client-side state and the domain types live
//! in the `store` crate; this crate moves them over HTTP.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`settings`] | [`Settings`] from defaults, `config.toml` and `PLATFORM_*` variables |
//! | [`transport`] | [`Transport`] seam, [`ReqwestTransport`], request/response types |
//! | [`client`] | [`ApiClient`]: public and authenticated profiles, token refresh and replay |
//! | [`error`] | [`ApiError`], HTTP status to [`Notification`] mapping |
//! | [`auth`] | [`Session`], login, CAS, registration, logout, route guard |
//! | [`services`] | `fetch_*`/`get_*` loaders, mutations and link synchronisation per entity |
//!
//! ## Typical use
//!
//! ```no_run
//! # async fn run() -> Result<(), api::ApiError> {
//! use api::services::associations::{get_associations, AssociationQuery};
//! use api::{ApiClient, ReqwestTransport, Settings};
//! use store::MemoryTokens;
//!
//! let settings = Settings::default();
//! let transport = ReqwestTransport::new(&settings.base_url)?;
//! let mut state = settings.client_config().app_state();
//! let client = ApiClient::new(transport, MemoryTokens::new(), settings);
//!
//! get_associations(&client, &mut state.associations, &AssociationQuery::public()).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod services;
pub mod settings;
pub mod transport;

mod memory;

pub use auth::Session;
pub use client::{ApiClient, Profile};
pub use error::{ApiError, ErrorReport, Notification, Redirect, SyncFailure};
pub use memory::MemoryTransport;
pub use settings::Settings;
pub use transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};
