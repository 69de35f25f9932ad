//! Projects: submission, categories, per-fund requests and the post-project review.

use serde::Serialize;
use serde_json::json;
use store::diff::{ProjectEdit, ReviewEdit};
use store::models::{Project, ProjectCommissionFund};
use store::state::ProjectState;
use store::{Patch, TokenStore};

use super::{fetch_into, get_into, join_list, sync_batch};
use crate::client::{ApiClient, Profile};
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

pub const PROJECTS_PATH: &str = "/projects/";
pub const CATEGORY_NAMES_PATH: &str = "/projects/categories/names";
pub const PROJECT_CATEGORIES_PATH: &str = "/projects/categories";
pub const PROJECT_COMMISSION_FUNDS_PATH: &str = "/projects/commission_funds";

pub fn project_path(id: i64) -> String {
    format!("/projects/{id}")
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    pub association_id: Option<i64>,
    pub user_id: Option<i64>,
    pub statuses: Vec<String>,
}

impl ProjectQuery {
    fn request(&self) -> ApiRequest {
        ApiRequest::get(PROJECTS_PATH)
            .query_opt("association_id", self.association_id)
            .query_opt("user_id", self.user_id)
            .query_opt("project_statuses", join_list(&self.statuses))
    }
}

/// Body of a project creation: carried by an association, or by a user alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association_user: Option<i64>,
}

pub async fn fetch_projects<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut ProjectState,
    query: &ProjectQuery,
) -> Result<(), ApiError> {
    fetch_into(client, &mut state.projects, Profile::Authenticated, query.request()).await
}

pub async fn get_projects<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut ProjectState,
    query: &ProjectQuery,
) -> Result<(), ApiError> {
    get_into(client, &mut state.projects, Profile::Authenticated, query.request()).await
}

pub async fn fetch_project<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut ProjectState,
    id: i64,
) -> Result<(), ApiError> {
    let project: Project = client
        .call(Profile::Authenticated, ApiRequest::get(project_path(id)))
        .await?;
    state.current = Some(project);
    Ok(())
}

pub async fn get_project_categories<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut ProjectState,
) -> Result<(), ApiError> {
    let request = ApiRequest::get(CATEGORY_NAMES_PATH);
    get_into(client, &mut state.categories, Profile::Public, request).await
}

/// Amounts requested by `project` from each commission fund.
pub async fn fetch_project_commission_funds<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut ProjectState,
    project: i64,
) -> Result<(), ApiError> {
    let request = ApiRequest::get(format!("{}/commission_funds", project_path(project)));
    fetch_into(client, &mut state.commission_funds, Profile::Authenticated, request).await
}

pub async fn create_project<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut ProjectState,
    project: &NewProject,
) -> Result<Project, ApiError> {
    let body = serde_json::to_value(project)?;
    let created: Project = client
        .call(Profile::Authenticated, ApiRequest::post(PROJECTS_PATH).json(body))
        .await?;
    tracing::info!(id = created.id, name = %created.name, "project created");
    state.projects.items_mut().push(created.clone());
    state.current = Some(created.clone());
    Ok(created)
}

/// Send the general information and budget fields of `edit` that differ from `reference`.
pub async fn update_project<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut ProjectState,
    reference: &Project,
    edit: &ProjectEdit,
) -> Result<bool, ApiError> {
    let patch = edit.diff(reference)?;
    send_patch(client, state, reference.id, project_path(reference.id), &patch).await
}

/// Send the review fields of `edit` that differ from `reference`.
pub async fn submit_review<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut ProjectState,
    reference: &Project,
    edit: &ReviewEdit,
) -> Result<bool, ApiError> {
    let patch = edit.diff(reference)?;
    let path = format!("{}/review", project_path(reference.id));
    send_patch(client, state, reference.id, path, &patch).await
}

async fn send_patch<T: Transport, S: TokenStore, P: Patch>(
    client: &ApiClient<T, S>,
    state: &mut ProjectState,
    id: i64,
    path: String,
    patch: &P,
) -> Result<bool, ApiError> {
    if patch.is_empty() {
        tracing::debug!(id, "project unchanged, nothing to send");
        return Ok(false);
    }
    tracing::debug!(id, fields = ?patch.changed_fields(), "updating project");
    client
        .execute(Profile::Authenticated, ApiRequest::patch(path).json(patch.to_body()))
        .await?;
    fetch_project(client, state, id).await?;
    if let Some(current) = state.current.clone() {
        if let Some(slot) = state.projects.items_mut().iter_mut().find(|p| p.id == id) {
            *slot = current;
        }
    }
    Ok(true)
}

/// Move the project to `status`, e.g. when it is submitted for review.
pub async fn set_project_status<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut ProjectState,
    id: i64,
    status: &str,
) -> Result<(), ApiError> {
    let request = ApiRequest::patch(format!("{}/status", project_path(id)))
        .json(json!({ "project_status": status }));
    client.execute(Profile::Authenticated, request).await?;
    tracing::info!(id, status, "project status changed");
    for project in state
        .projects
        .items_mut()
        .iter_mut()
        .chain(state.current.as_mut())
        .filter(|p| p.id == id)
    {
        project.project_status = Some(status.to_string());
    }
    Ok(())
}

/// Attach and detach categories so that the project's match `edit.categories`.
pub async fn sync_project_categories<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut ProjectState,
    reference: &Project,
    edit: &ProjectEdit,
) -> Result<(), ApiError> {
    let changes = edit.category_changes(reference);
    if changes.is_empty() {
        return Ok(());
    }

    let id = reference.id;
    let mut requests = Vec::new();
    for category in &changes.to_add {
        let request = ApiRequest::post(PROJECT_CATEGORIES_PATH)
            .json(json!({ "project": id, "category": category }));
        requests.push((format!("add category {category}"), request));
    }
    for category in &changes.to_remove {
        let request = ApiRequest::delete(format!("{}/categories/{category}", project_path(id)));
        requests.push((format!("remove category {category}"), request));
    }
    sync_batch(client, requests).await?;

    for project in state
        .projects
        .items_mut()
        .iter_mut()
        .chain(state.current.as_mut())
        .filter(|p| p.id == id)
    {
        project.categories = edit.categories.clone();
    }
    Ok(())
}

/// Request an amount from one commission fund.
pub async fn submit_commission_fund<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut ProjectState,
    request: &ProjectCommissionFund,
) -> Result<(), ApiError> {
    let body = serde_json::to_value(request)?;
    client
        .execute(
            Profile::Authenticated,
            ApiRequest::post(PROJECT_COMMISSION_FUNDS_PATH).json(body),
        )
        .await?;
    state.commission_funds.items_mut().push(request.clone());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTransport;
    use crate::settings::Settings;
    use crate::transport::{Body, Method};
    use store::{MemoryTokens, Tokens};

    fn client() -> ApiClient<MemoryTransport, MemoryTokens> {
        ApiClient::new(
            MemoryTransport::new(),
            MemoryTokens::with(Tokens::new("a", "r")),
            Settings::default(),
        )
    }

    fn project() -> Project {
        Project {
            id: 3,
            name: "Concert".into(),
            association: Some(1),
            categories: vec![1, 2],
            ticket_price: Some(5.0),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_query_string() {
        let client = client();
        client.transport().on(Method::Get, PROJECTS_PATH, 200, json!([]));

        let mut state = ProjectState::default();
        let query = ProjectQuery {
            association_id: Some(1),
            statuses: vec!["PROJECT_PROCESSING".into(), "PROJECT_REVIEW_DRAFT".into()],
            ..Default::default()
        };
        fetch_projects(&client, &mut state, &query).await.unwrap();
        let sent = &client.transport().requests()[0];
        assert_eq!(sent.query_value("association_id"), Some("1"));
        assert_eq!(sent.query_value("user_id"), None);
        assert_eq!(
            sent.query_value("project_statuses"),
            Some("PROJECT_PROCESSING,PROJECT_REVIEW_DRAFT")
        );
    }

    #[tokio::test]
    async fn test_update_project_budget() {
        let client = client();
        let reference = project();
        let updated = Project {
            ticket_price: Some(7.5),
            ..reference.clone()
        };
        let transport = client.transport();
        transport
            .on(Method::Patch, &project_path(3), 200, json!({}))
            .on(
                Method::Get,
                &project_path(3),
                200,
                serde_json::to_value(&updated).unwrap(),
            );

        let mut state = ProjectState::default();
        state.projects.set(vec![reference.clone()]);

        let mut edit = ProjectEdit::from(&reference);
        edit.ticket_price = "7,5".into();
        assert!(update_project(&client, &mut state, &reference, &edit)
            .await
            .unwrap());

        assert_eq!(
            transport.requests()[0].body,
            Body::Json(json!({"ticket_price": 7.5}))
        );
        assert_eq!(state.projects.items()[0].ticket_price, Some(7.5));
    }

    #[tokio::test]
    async fn test_unchanged_review_sends_nothing() {
        let client = client();
        let reference = project();
        let mut state = ProjectState::default();
        let edit = ReviewEdit::from(&reference);
        assert!(!submit_review(&client, &mut state, &reference, &edit)
            .await
            .unwrap());
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_sync_categories() {
        let client = client();
        let transport = client.transport();
        transport
            .on(Method::Post, PROJECT_CATEGORIES_PATH, 201, json!({}))
            .on(Method::Delete, "/projects/3/categories/1", 204, json!(null));

        let reference = project();
        let mut state = ProjectState::default();
        state.projects.set(vec![reference.clone()]);
        let mut edit = ProjectEdit::from(&reference);
        edit.categories = vec![2, 4];

        sync_project_categories(&client, &mut state, &reference, &edit)
            .await
            .unwrap();
        assert_eq!(transport.count(Method::Post, PROJECT_CATEGORIES_PATH), 1);
        assert_eq!(transport.count(Method::Delete, "/projects/3/categories/1"), 1);
        assert_eq!(state.projects.items()[0].categories, vec![2, 4]);
    }

    #[tokio::test]
    async fn test_sync_categories_partial_failure_keeps_state() {
        let client = client();
        let transport = client.transport();
        transport.on(Method::Post, PROJECT_CATEGORIES_PATH, 201, json!({}));

        let reference = project();
        let mut state = ProjectState::default();
        state.projects.set(vec![reference.clone()]);
        let mut edit = ProjectEdit::from(&reference);
        edit.categories = vec![2, 4];

        let error = sync_project_categories(&client, &mut state, &reference, &edit)
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::SyncFailed { attempted: 2, .. }));
        assert_eq!(state.projects.items()[0].categories, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_set_status() {
        let client = client();
        client
            .transport()
            .on(Method::Patch, "/projects/3/status", 200, json!({}));

        let mut state = ProjectState::default();
        state.current = Some(project());
        set_project_status(&client, &mut state, 3, "PROJECT_PROCESSING")
            .await
            .unwrap();
        assert_eq!(
            state.current.unwrap().project_status.as_deref(),
            Some("PROJECT_PROCESSING")
        );
    }
}
