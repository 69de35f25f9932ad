//! # Login, CAS and registration flows
//!
//! | Function | Requests |
//! |----------|----------|
//! | [`login`] | `POST /users/auth/login/`, then [`load_user`] |
//! | [`cas_login`] | `POST /users/auth/cas/login/`, then [`load_user`] when signing in |
//! | [`register`] | identity, association memberships, group memberships, in that order |
//! | [`logout`] | `POST /users/auth/logout/` |
//! | [`load_user`] | `GET /users/auth/user/`, `GET /users/auth/user/groups/` |
//!
//! ## Registration
//!
//! A registration is recorded in [`Session::pending`] until all three steps have
//! succeeded. Steps already applied are not rolled back when a later one fails: the
//! error is [`ApiError::RegistrationIncomplete`] listing the applied steps, and the
//! pending registration remembers them so that calling [`register`] again resumes at
//! the failed step.

use serde::Deserialize;
use serde_json::json;
use store::models::{User, UserGroup};
use store::{TokenStore, Tokens};

use super::session::{PendingRegistration, RegistrationKind, RegistrationStep, Session};
use crate::client::{ApiClient, Profile};
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

pub const LOGIN_PATH: &str = "/users/auth/login/";
pub const CAS_LOGIN_PATH: &str = "/users/auth/cas/login/";
pub const LOGOUT_PATH: &str = "/users/auth/logout/";
pub const CURRENT_USER_PATH: &str = "/users/auth/user/";
pub const CURRENT_USER_GROUPS_PATH: &str = "/users/auth/user/groups/";
pub const REGISTRATION_PATH: &str = "/users/auth/registration/";
pub const USER_ASSOCIATIONS_PATH: &str = "/users/associations/";
pub const USER_GROUPS_PATH: &str = "/users/groups/";

/// Front-end route CAS sends the browser back to after a sign-in.
pub const CAS_LOGIN_RETURN: &str = "/cas-login";
/// Front-end route CAS sends the browser back to during a registration.
pub const CAS_REGISTER_RETURN: &str = "/cas-register";

#[derive(Deserialize)]
struct TokenPair {
    access: String,
    refresh: String,
}

#[derive(Deserialize)]
struct CasLoginResponse {
    access: String,
    refresh: String,
    #[serde(default)]
    user: Option<User>,
}

/// Sign in with a username and password.
pub async fn login<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    session: &mut Session,
    username: &str,
    password: &str,
) -> Result<(), ApiError> {
    let request = ApiRequest::post(LOGIN_PATH)
        .json(json!({ "username": username, "password": password }));
    let pair: TokenPair = client.call(Profile::Public, request).await?;
    client
        .tokens()
        .save(&Tokens::new(pair.access, pair.refresh))
        .await?;

    load_user(client, session).await?;
    ensure_validated(client, session).await?;
    tracing::info!(username, "signed in");
    Ok(())
}

/// Exchange a CAS `ticket` for tokens.
///
/// With `new_user` set, this starts a registration: an account already validated by an
/// administrator is refused with [`ApiError::AccountAlreadyExists`] (and signed out),
/// anything else becomes a pending CAS registration. Without it, this is a sign-in.
pub async fn cas_login<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    session: &mut Session,
    ticket: &str,
    new_user: bool,
) -> Result<(), ApiError> {
    let return_path = if new_user {
        CAS_REGISTER_RETURN
    } else {
        CAS_LOGIN_RETURN
    };
    let service = client.settings().service_url(return_path);
    let request = ApiRequest::post(CAS_LOGIN_PATH).json(json!({ "ticket": ticket, "service": service }));
    let response: CasLoginResponse = client.call(Profile::Public, request).await?;
    client
        .tokens()
        .save(&Tokens::new(response.access, response.refresh))
        .await?;

    if !new_user {
        load_user(client, session).await?;
        ensure_validated(client, session).await?;
        tracing::info!("signed in through CAS");
        return Ok(());
    }

    let user = match response.user {
        Some(user) => user,
        None => client.call(Profile::Authenticated, ApiRequest::get(CURRENT_USER_PATH)).await?,
    };
    if user.is_validated_by_admin {
        tracing::info!(username = %user.username, "CAS registration refused, account exists");
        logout(client, session).await?;
        return Err(ApiError::AccountAlreadyExists);
    }

    tracing::info!(username = %user.username, "CAS registration started");
    session.pending = Some(PendingRegistration::new(RegistrationKind::Cas, (&user).into()));
    Ok(())
}

/// Run the pending registration's remaining steps in order.
pub async fn register<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    session: &mut Session,
) -> Result<(), ApiError> {
    let pending = session
        .pending
        .as_mut()
        .ok_or(ApiError::NoPendingRegistration)?;

    for step in RegistrationStep::ALL {
        if pending.is_done(step) {
            tracing::debug!(?step, "registration step already applied");
            continue;
        }
        if let Err(source) = run_step(client, pending, step).await {
            tracing::error!(?step, error = %source, "registration step failed");
            return Err(ApiError::RegistrationIncomplete {
                completed: pending.completed.clone(),
                source: Box::new(source),
            });
        }
        tracing::info!(?step, "registration step applied");
        pending.completed.push(step);
    }

    session.pending = None;
    Ok(())
}

async fn run_step<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    pending: &mut PendingRegistration,
    step: RegistrationStep,
) -> Result<(), ApiError> {
    // CAS accounts hold tokens from the ticket exchange; local ones have none yet.
    let profile = match pending.kind {
        RegistrationKind::Cas => Profile::Authenticated,
        RegistrationKind::Local => Profile::Public,
    };
    let username = pending.identity.username.clone();

    match step {
        RegistrationStep::Identity => {
            let body = serde_json::to_value(&pending.identity)?;
            let request = match pending.kind {
                RegistrationKind::Cas => ApiRequest::patch(CURRENT_USER_PATH),
                RegistrationKind::Local => ApiRequest::post(REGISTRATION_PATH),
            };
            client.execute(profile, request.json(body)).await
        }
        RegistrationStep::Associations => {
            while let Some(membership) = pending.associations.get(pending.applied_associations) {
                let request = ApiRequest::post(USER_ASSOCIATIONS_PATH).json(json!({
                    "user": username,
                    "association": membership.association,
                    "is_president": membership.is_president,
                }));
                client.execute(profile, request).await?;
                pending.applied_associations += 1;
            }
            Ok(())
        }
        RegistrationStep::Groups => {
            while let Some(membership) = pending.groups.get(pending.applied_groups) {
                let request = ApiRequest::post(USER_GROUPS_PATH).json(json!({
                    "username": username,
                    "group": membership.group,
                    "institution": membership.institution,
                    "fund": membership.fund,
                }));
                client.execute(profile, request).await?;
                pending.applied_groups += 1;
            }
            Ok(())
        }
    }
}

/// Sign out: tell the API (best effort), then drop tokens and session.
pub async fn logout<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    session: &mut Session,
) -> Result<(), ApiError> {
    if let Err(e) = client
        .execute(Profile::Authenticated, ApiRequest::post(LOGOUT_PATH))
        .await
    {
        tracing::warn!(error = %e, "logout request failed");
    }
    client.tokens().clear().await?;
    session.clear();
    tracing::info!("signed out");
    Ok(())
}

/// Reload the signed-in user and their groups into `session`.
pub async fn load_user<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    session: &mut Session,
) -> Result<(), ApiError> {
    let user: User = client
        .call(Profile::Authenticated, ApiRequest::get(CURRENT_USER_PATH))
        .await?;
    let groups: Vec<UserGroup> = client
        .call(Profile::Authenticated, ApiRequest::get(CURRENT_USER_GROUPS_PATH))
        .await?;
    tracing::debug!(username = %user.username, groups = groups.len(), "user loaded");
    session.user = Some(user);
    session.groups = groups;
    Ok(())
}

async fn ensure_validated<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    session: &mut Session,
) -> Result<(), ApiError> {
    let validated = session
        .user
        .as_ref()
        .is_some_and(|u| u.is_validated_by_admin);
    if validated {
        return Ok(());
    }
    tracing::info!("account awaiting validation, signing out");
    client.tokens().clear().await?;
    session.clear();
    Err(ApiError::NotValidatedByAdmin)
}
