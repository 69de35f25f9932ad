//! User management: accounts, validation and group memberships.

use serde_json::json;
use store::diff::UserEdit;
use store::models::User;
use store::state::UserState;
use store::{Patch, TokenStore};

use super::{fetch_into, get_into, sync_batch};
use crate::client::{ApiClient, Profile};
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

pub const USERS_PATH: &str = "/users/";
pub const GROUPS_PATH: &str = "/groups/";
pub const USER_GROUPS_PATH: &str = "/users/groups/";

pub fn user_path(id: i64) -> String {
    format!("/users/{id}")
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub is_validated_by_admin: Option<bool>,
    pub is_cas: Option<bool>,
}

pub async fn fetch_users<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut UserState,
    query: &UserQuery,
) -> Result<(), ApiError> {
    let request = ApiRequest::get(USERS_PATH)
        .query_opt("is_validated_by_admin", query.is_validated_by_admin)
        .query_opt("is_cas", query.is_cas);
    fetch_into(client, &mut state.users, Profile::Authenticated, request).await
}

/// Load one user as the one being managed, with their groups.
pub async fn fetch_user<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut UserState,
    id: i64,
) -> Result<(), ApiError> {
    let user: User = client
        .call(Profile::Authenticated, ApiRequest::get(user_path(id)))
        .await?;
    state.current = Some(user);
    fetch_user_groups(client, state, id).await
}

pub async fn get_groups<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut UserState,
) -> Result<(), ApiError> {
    let request = ApiRequest::get(GROUPS_PATH);
    get_into(client, &mut state.groups, Profile::Public, request).await
}

pub async fn fetch_user_groups<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut UserState,
    user: i64,
) -> Result<(), ApiError> {
    let request = ApiRequest::get(format!("{}/groups/", user_path(user)));
    fetch_into(client, &mut state.user_groups, Profile::Authenticated, request).await
}

pub async fn update_user<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut UserState,
    reference: &User,
    edit: &UserEdit,
) -> Result<bool, ApiError> {
    let patch = edit.diff(reference);
    if patch.is_empty() {
        tracing::debug!(id = reference.id, "user unchanged, nothing to send");
        return Ok(false);
    }
    let request = ApiRequest::patch(user_path(reference.id)).json(patch.to_body());
    let updated: User = client.call(Profile::Authenticated, request).await?;
    replace_user(state, updated);
    Ok(true)
}

/// Accept a pending account.
pub async fn validate_user<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut UserState,
    id: i64,
) -> Result<(), ApiError> {
    let request = ApiRequest::patch(user_path(id)).json(json!({ "is_validated_by_admin": true }));
    let updated: User = client.call(Profile::Authenticated, request).await?;
    tracing::info!(id, "user validated");
    replace_user(state, updated);
    Ok(())
}

pub async fn delete_user<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut UserState,
    id: i64,
) -> Result<(), ApiError> {
    client
        .execute(Profile::Authenticated, ApiRequest::delete(user_path(id)))
        .await?;
    tracing::info!(id, "user deleted");
    state.users.items_mut().retain(|u| u.id != id);
    if state.current.as_ref().is_some_and(|u| u.id == id) {
        state.current = None;
        state.user_groups.clear();
    }
    Ok(())
}

/// Add and remove memberships so that `user` belongs to exactly `edit.groups`, then
/// reload their memberships.
pub async fn sync_user_groups<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut UserState,
    user: &User,
    edit: &UserEdit,
) -> Result<(), ApiError> {
    let changes = edit.group_changes(&state.current_group_ids());
    if changes.is_empty() {
        return Ok(());
    }

    let mut requests = Vec::new();
    for group in &changes.to_add {
        let request = ApiRequest::post(USER_GROUPS_PATH)
            .json(json!({ "username": user.username, "group": group }));
        requests.push((format!("add group {group}"), request));
    }
    for group in &changes.to_remove {
        let request = ApiRequest::delete(format!("{}/groups/{group}", user_path(user.id)));
        requests.push((format!("remove group {group}"), request));
    }
    let outcome = sync_batch(client, requests).await;

    let reloaded = fetch_user_groups(client, state, user.id).await;
    outcome.and(reloaded)
}

fn replace_user(state: &mut UserState, user: User) {
    if let Some(slot) = state.users.items_mut().iter_mut().find(|u| u.id == user.id) {
        *slot = user.clone();
    }
    if state.current.as_ref().is_some_and(|u| u.id == user.id) {
        state.current = Some(user);
    }
}
