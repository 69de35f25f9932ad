//! # Entity services
//!
//! One module per entity family. Each exposes two kinds of loaders that write into the
//! matching state holder from [`store::state`]:
//!
//! - `fetch_*` always requests and overwrites the holder;
//! - `get_*` requests only when [`Collection::needs_fetch`] says so, otherwise it issues
//!   no request at all.
//!
//! Updates take the server copy and the working copy, compute the patch and send a
//! `PATCH` only when it is non-empty; they return whether a request was made.
//! Link synchronisations (`sync_*`) issue their add and remove calls with at most
//! `Settings::sync_concurrency` in flight and report every failure together as
//! [`ApiError::SyncFailed`].
//!
//! | Module | Resources |
//! |--------|-----------|
//! | [`associations`] | associations, names, institutions, components, activity fields, memberships |
//! | [`projects`] | projects, categories, review, per-fund requests |
//! | [`documents`] | document types, uploads |
//! | [`commissions`] | commissions, funds, commission/fund links |
//! | [`users`] | users, groups, user/group links |
//! | [`contents`] | editable page contents |

pub mod associations;
pub mod commissions;
pub mod contents;
pub mod documents;
pub mod projects;
pub mod users;

use futures::stream::{self, StreamExt};
use serde::de::DeserializeOwned;
use store::{Collection, TokenStore};

use crate::client::{ApiClient, Profile};
use crate::error::{ApiError, SyncFailure};
use crate::transport::{ApiRequest, Transport};

/// Request `request` and overwrite `collection` with the answer.
pub(crate) async fn fetch_into<T, S, R>(
    client: &ApiClient<T, S>,
    collection: &mut Collection<R>,
    profile: Profile,
    request: ApiRequest,
) -> Result<(), ApiError>
where
    T: Transport,
    S: TokenStore,
    R: DeserializeOwned,
{
    let source = request.cache_key();
    let items: Vec<R> = client.call(profile, request).await?;
    tracing::debug!(%source, count = items.len(), "collection fetched");
    collection.set_from(items, source);
    Ok(())
}

/// [`fetch_into`], skipped when `collection` is populated, fresh and filled by the
/// same request.
pub(crate) async fn get_into<T, S, R>(
    client: &ApiClient<T, S>,
    collection: &mut Collection<R>,
    profile: Profile,
    request: ApiRequest,
) -> Result<(), ApiError>
where
    T: Transport,
    S: TokenStore,
    R: DeserializeOwned,
{
    if !collection.needs_fetch_for(&request.cache_key()) {
        tracing::debug!(path = %request.path, "collection cached, skipping fetch");
        return Ok(());
    }
    fetch_into(client, collection, profile, request).await
}

/// Send authenticated link requests with bounded concurrency, collecting failures.
///
/// Each request is paired with a label naming the link it changes.
pub(crate) async fn sync_batch<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    requests: Vec<(String, ApiRequest)>,
) -> Result<(), ApiError> {
    let attempted = requests.len();
    if attempted == 0 {
        return Ok(());
    }
    let concurrency = client.settings().sync_concurrency.max(1);

    let results: Vec<(String, Result<(), ApiError>)> = stream::iter(requests)
        .map(|(item, request)| async move {
            let result = client.execute(Profile::Authenticated, request).await;
            (item, result)
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let failures: Vec<SyncFailure> = results
        .into_iter()
        .filter_map(|(item, result)| result.err().map(|error| SyncFailure { item, error }))
        .collect();
    if failures.is_empty() {
        tracing::debug!(attempted, "links synchronised");
        return Ok(());
    }
    for failure in &failures {
        tracing::warn!(item = %failure.item, error = %failure.error, "link synchronisation failed");
    }
    Err(ApiError::SyncFailed {
        attempted,
        failures,
    })
}

/// Comma-separated list for query strings such as `?process_types=A,B`.
pub(crate) fn join_list<V: ToString>(values: &[V]) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    Some(
        values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
    )
}
