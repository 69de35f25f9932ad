//! Commissions, funds and the funds each commission hands out.

use serde::Serialize;
use serde_json::json;
use store::diff::CommissionEdit;
use store::models::Commission;
use store::state::CommissionState;
use store::{Patch, TokenStore};

use super::{fetch_into, get_into, sync_batch};
use crate::client::{ApiClient, Profile};
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

pub const COMMISSIONS_PATH: &str = "/commissions/";
pub const FUND_NAMES_PATH: &str = "/commissions/funds/names";
pub const COMMISSION_FUNDS_PATH: &str = "/commissions/commission_funds";

pub fn commission_path(id: i64) -> String {
    format!("/commissions/{id}")
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewCommission {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
    pub commission_date: String,
    pub submission_date: String,
}

fn commissions_request(open_only: bool) -> ApiRequest {
    ApiRequest::get(COMMISSIONS_PATH).query_opt("is_open_to_projects", open_only.then_some(true))
}

pub async fn fetch_commissions<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut CommissionState,
    open_only: bool,
) -> Result<(), ApiError> {
    let request = commissions_request(open_only);
    fetch_into(client, &mut state.commissions, Profile::Public, request).await
}

pub async fn get_commissions<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut CommissionState,
    open_only: bool,
) -> Result<(), ApiError> {
    let request = commissions_request(open_only);
    get_into(client, &mut state.commissions, Profile::Public, request).await
}

pub async fn get_funds<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut CommissionState,
) -> Result<(), ApiError> {
    let request = ApiRequest::get(FUND_NAMES_PATH);
    get_into(client, &mut state.funds, Profile::Public, request).await
}

pub async fn fetch_commission_funds<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut CommissionState,
) -> Result<(), ApiError> {
    let request = ApiRequest::get(COMMISSION_FUNDS_PATH);
    fetch_into(client, &mut state.commission_funds, Profile::Public, request).await
}

pub async fn get_commission_funds<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut CommissionState,
) -> Result<(), ApiError> {
    let request = ApiRequest::get(COMMISSION_FUNDS_PATH);
    get_into(client, &mut state.commission_funds, Profile::Public, request).await
}

pub async fn create_commission<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut CommissionState,
    commission: &NewCommission,
) -> Result<Commission, ApiError> {
    let body = serde_json::to_value(commission)?;
    let created: Commission = client
        .call(Profile::Authenticated, ApiRequest::post(COMMISSIONS_PATH).json(body))
        .await?;
    tracing::info!(id = created.id, name = %created.name, "commission created");
    state.commissions.items_mut().push(created.clone());
    Ok(created)
}

pub async fn update_commission<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut CommissionState,
    reference: &Commission,
    edit: &CommissionEdit,
) -> Result<bool, ApiError> {
    let patch = edit.diff(reference)?;
    if patch.is_empty() {
        tracing::debug!(id = reference.id, "commission unchanged, nothing to send");
        return Ok(false);
    }
    let request = ApiRequest::patch(commission_path(reference.id)).json(patch.to_body());
    let updated: Commission = client.call(Profile::Authenticated, request).await?;
    if let Some(slot) = state
        .commissions
        .items_mut()
        .iter_mut()
        .find(|c| c.id == updated.id)
    {
        *slot = updated;
    }
    Ok(true)
}

pub async fn delete_commission<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut CommissionState,
    id: i64,
) -> Result<(), ApiError> {
    client
        .execute(Profile::Authenticated, ApiRequest::delete(commission_path(id)))
        .await?;
    tracing::info!(id, "commission deleted");
    state.commissions.items_mut().retain(|c| c.id != id);
    state.commission_funds.items_mut().retain(|cf| cf.commission != id);
    Ok(())
}

/// Link and unlink funds so that the commission's match `edit.funds`, then reload
/// the links.
pub async fn sync_commission_funds<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut CommissionState,
    commission: i64,
    edit: &CommissionEdit,
) -> Result<(), ApiError> {
    let changes = edit.fund_changes(&state.funds_of(commission));
    if changes.is_empty() {
        return Ok(());
    }

    let mut requests = Vec::new();
    for fund in &changes.to_add {
        let request = ApiRequest::post(COMMISSION_FUNDS_PATH)
            .json(json!({ "commission": commission, "fund": fund }));
        requests.push((format!("link fund {fund}"), request));
    }
    for fund in &changes.to_remove {
        let request = ApiRequest::delete(format!("{}/funds/{fund}", commission_path(commission)));
        requests.push((format!("unlink fund {fund}"), request));
    }
    let outcome = sync_batch(client, requests).await;

    // Some links may have changed even when others failed.
    let reloaded = fetch_commission_funds(client, state).await;
    outcome.and(reloaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTransport;
    use crate::settings::Settings;
    use crate::transport::Method;
    use store::models::CommissionFund;
    use store::{MemoryTokens, Tokens};

    fn client() -> ApiClient<MemoryTransport, MemoryTokens> {
        ApiClient::new(
            MemoryTransport::new(),
            MemoryTokens::with(Tokens::new("a", "r")),
            Settings::default(),
        )
    }

    fn link(id: i64, fund: i64) -> CommissionFund {
        CommissionFund {
            id,
            commission: 1,
            fund,
        }
    }

    #[tokio::test]
    async fn test_sync_funds() {
        let client = client();
        let transport = client.transport();
        transport
            .on(Method::Post, COMMISSION_FUNDS_PATH, 201, json!({}))
            .on(Method::Delete, "/commissions/1/funds/2", 204, json!(null))
            .on(
                Method::Get,
                COMMISSION_FUNDS_PATH,
                200,
                serde_json::to_value(vec![link(10, 1), link(12, 3)]).unwrap(),
            );

        let mut state = CommissionState::default();
        state.commission_funds.set(vec![link(10, 1), link(11, 2)]);
        let commission = Commission {
            id: 1,
            ..Default::default()
        };
        let edit = CommissionEdit::new(&commission, vec![1, 3]);

        sync_commission_funds(&client, &mut state, 1, &edit).await.unwrap();
        assert_eq!(transport.count(Method::Post, COMMISSION_FUNDS_PATH), 1);
        assert_eq!(transport.count(Method::Delete, "/commissions/1/funds/2"), 1);
        assert_eq!(state.funds_of(1), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_sync_funds_keeps_link_failures_when_reload_fails() {
        let client = client();
        client
            .transport()
            .on(Method::Post, COMMISSION_FUNDS_PATH, 400, json!({"fund": ["Invalid pk."]}))
            .on(Method::Get, COMMISSION_FUNDS_PATH, 500, json!({"detail": "Server error"}));

        let mut state = CommissionState::default();
        state.commission_funds.set(vec![link(10, 1)]);
        let edit = CommissionEdit::new(&Commission::default(), vec![1, 4]);

        let error = sync_commission_funds(&client, &mut state, 1, &edit)
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::SyncFailed { attempted: 1, .. }));
        assert_eq!(state.funds_of(1), vec![1]);
    }

    #[tokio::test]
    async fn test_open_only_filter_is_not_served_from_full_list() {
        let client = client();
        let spring = Commission {
            id: 1,
            is_open_to_projects: true,
            ..Default::default()
        };
        let autumn = Commission {
            id: 2,
            ..Default::default()
        };
        client.transport().on(
            Method::Get,
            COMMISSIONS_PATH,
            200,
            serde_json::to_value(vec![spring.clone(), autumn]).unwrap(),
        );

        let mut state = CommissionState::default();
        get_commissions(&client, &mut state, false).await.unwrap();
        assert_eq!(state.commissions.len(), 2);
        get_commissions(&client, &mut state, false).await.unwrap();
        assert_eq!(client.transport().requests().len(), 1);

        client.transport().on(
            Method::Get,
            COMMISSIONS_PATH,
            200,
            serde_json::to_value(vec![spring]).unwrap(),
        );
        get_commissions(&client, &mut state, true).await.unwrap();
        let requests = client.transport().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].query_value("is_open_to_projects"), Some("true"));
        assert_eq!(state.commissions.len(), 1);
    }

    #[tokio::test]
    async fn test_unchanged_funds_send_nothing() {
        let client = client();
        let mut state = CommissionState::default();
        state.commission_funds.set(vec![link(10, 1), link(11, 2)]);
        let edit = CommissionEdit::new(&Commission::default(), vec![2, 1]);

        sync_commission_funds(&client, &mut state, 1, &edit).await.unwrap();
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_update_commission() {
        let client = client();
        let reference = Commission {
            id: 1,
            name: "Spring".into(),
            commission_date: Some("2024-04-12T00:00:00Z".into()),
            ..Default::default()
        };
        let renamed = Commission {
            name: "Spring session".into(),
            ..reference.clone()
        };
        client.transport().on(
            Method::Patch,
            &commission_path(1),
            200,
            serde_json::to_value(&renamed).unwrap(),
        );

        let mut state = CommissionState::default();
        state.commissions.set(vec![reference.clone()]);
        let mut edit = CommissionEdit::new(&reference, Vec::new());
        assert!(!update_commission(&client, &mut state, &reference, &edit)
            .await
            .unwrap());

        edit.name = "Spring session".into();
        assert!(update_commission(&client, &mut state, &reference, &edit)
            .await
            .unwrap());
        assert_eq!(state.commissions.items()[0].name, "Spring session");
    }
}
