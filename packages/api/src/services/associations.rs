//! Associations and the reference data used to describe them.

use serde::Serialize;
use store::diff::AssociationEdit;
use store::models::{Association, AssociationUser};
use store::state::AssociationState;
use store::{Patch, TokenStore};

use super::{fetch_into, get_into, join_list};
use crate::client::{ApiClient, Profile};
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

pub const ASSOCIATIONS_PATH: &str = "/associations/";
pub const ASSOCIATION_NAMES_PATH: &str = "/associations/names";
pub const ACTIVITY_FIELDS_PATH: &str = "/associations/activity_fields";
pub const INSTITUTIONS_PATH: &str = "/institutions/";
pub const COMPONENTS_PATH: &str = "/institutions/institution_components";
pub const USER_ASSOCIATIONS_PATH: &str = "/users/associations/";

pub fn association_path(id: i64) -> String {
    format!("/associations/{id}")
}

/// Filters for association lists.
///
/// `public` lists the public directory without credentials and adds `is_public=true`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssociationQuery {
    pub public: bool,
    pub is_enabled: Option<bool>,
    pub is_site: Option<bool>,
    pub institutions: Vec<i64>,
}

impl AssociationQuery {
    pub fn public() -> Self {
        Self {
            public: true,
            ..Default::default()
        }
    }

    fn profile(&self) -> Profile {
        if self.public {
            Profile::Public
        } else {
            Profile::Authenticated
        }
    }

    fn request(&self, path: &str) -> ApiRequest {
        ApiRequest::get(path)
            .query_opt("is_public", self.public.then_some(true))
            .query_opt("is_enabled", self.is_enabled)
            .query_opt("is_site", self.is_site)
            .query_opt("institutions", join_list(&self.institutions))
    }
}

/// Body of an association creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewAssociation {
    pub name: String,
    pub institution: Option<i64>,
    pub is_site: bool,
}

pub async fn fetch_associations<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut AssociationState,
    query: &AssociationQuery,
) -> Result<(), ApiError> {
    let request = query.request(ASSOCIATIONS_PATH);
    fetch_into(client, &mut state.associations, query.profile(), request).await
}

pub async fn get_associations<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut AssociationState,
    query: &AssociationQuery,
) -> Result<(), ApiError> {
    let request = query.request(ASSOCIATIONS_PATH);
    get_into(client, &mut state.associations, query.profile(), request).await
}

/// Load one association as the one being viewed or edited.
pub async fn fetch_association<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut AssociationState,
    id: i64,
    profile: Profile,
) -> Result<(), ApiError> {
    let association: Association = client
        .call(profile, ApiRequest::get(association_path(id)))
        .await?;
    state.current = Some(association);
    Ok(())
}

pub async fn fetch_association_names<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut AssociationState,
    query: &AssociationQuery,
) -> Result<(), ApiError> {
    let request = query.request(ASSOCIATION_NAMES_PATH);
    fetch_into(client, &mut state.names, Profile::Public, request).await
}

pub async fn get_association_names<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut AssociationState,
    query: &AssociationQuery,
) -> Result<(), ApiError> {
    let request = query.request(ASSOCIATION_NAMES_PATH);
    get_into(client, &mut state.names, Profile::Public, request).await
}

pub async fn get_institutions<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut AssociationState,
) -> Result<(), ApiError> {
    let request = ApiRequest::get(INSTITUTIONS_PATH);
    get_into(client, &mut state.institutions, Profile::Public, request).await
}

pub async fn get_institution_components<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut AssociationState,
) -> Result<(), ApiError> {
    let request = ApiRequest::get(COMPONENTS_PATH);
    get_into(client, &mut state.components, Profile::Public, request).await
}

pub async fn get_activity_fields<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut AssociationState,
) -> Result<(), ApiError> {
    let request = ApiRequest::get(ACTIVITY_FIELDS_PATH);
    get_into(client, &mut state.fields, Profile::Public, request).await
}

/// Load every reference list used by association forms and filters.
pub async fn get_reference_data<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut AssociationState,
) -> Result<(), ApiError> {
    get_institutions(client, state).await?;
    get_institution_components(client, state).await?;
    get_activity_fields(client, state).await
}

/// Memberships, of the signed-in user or of one association.
pub async fn fetch_user_associations<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut AssociationState,
    association_id: Option<i64>,
) -> Result<(), ApiError> {
    let request = ApiRequest::get(USER_ASSOCIATIONS_PATH).query_opt("association_id", association_id);
    fetch_into(client, &mut state.user_associations, Profile::Authenticated, request).await
}

pub async fn create_association<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut AssociationState,
    association: &NewAssociation,
) -> Result<Association, ApiError> {
    let body = serde_json::to_value(association)?;
    let created: Association = client
        .call(
            Profile::Authenticated,
            ApiRequest::post(ASSOCIATIONS_PATH).json(body),
        )
        .await?;
    tracing::info!(id = created.id, name = %created.name, "association created");
    state.associations.items_mut().push(created.clone());
    state.names.invalidate();
    Ok(created)
}

/// Send the fields of `edit` that differ from `reference`.
pub async fn update_association<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut AssociationState,
    reference: &Association,
    edit: &AssociationEdit,
) -> Result<bool, ApiError> {
    let patch = edit.diff(reference)?;
    if patch.is_empty() {
        tracing::debug!(id = reference.id, "association unchanged, nothing to send");
        return Ok(false);
    }
    tracing::debug!(id = reference.id, fields = ?patch.changed_fields(), "updating association");
    let request = ApiRequest::patch(association_path(reference.id)).json(patch.to_body());
    let updated: Association = client.call(Profile::Authenticated, request).await?;
    state.replace(updated);
    Ok(true)
}

pub async fn delete_association<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut AssociationState,
    id: i64,
) -> Result<(), ApiError> {
    client
        .execute(Profile::Authenticated, ApiRequest::delete(association_path(id)))
        .await?;
    tracing::info!(id, "association deleted");
    state.remove(id);
    Ok(())
}

/// Validate or refuse a membership.
pub async fn validate_membership<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut AssociationState,
    membership: &AssociationUser,
    is_validated: bool,
) -> Result<(), ApiError> {
    let path = format!(
        "{USER_ASSOCIATIONS_PATH}{}/{}",
        membership.user, membership.association
    );
    let request = ApiRequest::patch(path).json(serde_json::json!({
        "is_validated_by_admin": is_validated,
    }));
    client.execute(Profile::Authenticated, request).await?;
    if let Some(slot) = state
        .user_associations
        .items_mut()
        .iter_mut()
        .find(|m| m.id == membership.id)
    {
        slot.is_validated_by_admin = is_validated;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTransport;
    use crate::settings::Settings;
    use crate::transport::{Body, Method};
    use serde_json::json;
    use store::{MemoryTokens, Tokens};

    fn client() -> ApiClient<MemoryTransport, MemoryTokens> {
        ApiClient::new(
            MemoryTransport::new(),
            MemoryTokens::with(Tokens::new("a", "r")),
            Settings::default(),
        )
    }

    #[tokio::test]
    async fn test_public_directory() {
        let client = client();
        client.transport().on(
            Method::Get,
            ASSOCIATIONS_PATH,
            200,
            json!([{"id": 1, "name": "Chess Club", "is_public": true}]),
        );

        let mut state = AssociationState::default();
        let query = AssociationQuery::public();
        get_associations(&client, &mut state, &query).await.unwrap();
        get_associations(&client, &mut state, &query).await.unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].bearer, None);
        assert_eq!(requests[0].query_value("is_public"), Some("true"));
        assert_eq!(state.associations.len(), 1);

        fetch_associations(&client, &mut state, &query).await.unwrap();
        assert_eq!(client.transport().count(Method::Get, ASSOCIATIONS_PATH), 2);
    }

    #[tokio::test]
    async fn test_update_sends_only_changes() {
        let client = client();
        let reference = Association {
            id: 4,
            name: "Chess Club".into(),
            city: Some("Strasbourg".into()),
            ..Default::default()
        };
        let updated = Association {
            city: Some("Mulhouse".into()),
            ..reference.clone()
        };
        client.transport().on(
            Method::Patch,
            &association_path(4),
            200,
            serde_json::to_value(&updated).unwrap(),
        );

        let mut state = AssociationState::default();
        state.associations.set(vec![reference.clone()]);

        let mut edit = AssociationEdit::from(&reference);
        assert!(!update_association(&client, &mut state, &reference, &edit)
            .await
            .unwrap());
        assert!(client.transport().requests().is_empty());

        edit.city = Some("Mulhouse".into());
        assert!(update_association(&client, &mut state, &reference, &edit)
            .await
            .unwrap());
        let sent = &client.transport().requests()[0];
        assert_eq!(sent.body, Body::Json(json!({"city": "Mulhouse"})));
        assert_eq!(state.associations.items()[0].city.as_deref(), Some("Mulhouse"));
    }

    #[tokio::test]
    async fn test_invalid_number_sends_nothing() {
        let client = client();
        let reference = Association {
            id: 4,
            ..Default::default()
        };
        let mut edit = AssociationEdit::from(&reference);
        edit.amount_members_allowed = "twelve".into();

        let mut state = AssociationState::default();
        let error = update_association(&client, &mut state, &reference, &edit)
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Diff(_)));
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_reference_data_cached() {
        let client = client();
        let transport = client.transport();
        transport
            .on(Method::Get, INSTITUTIONS_PATH, 200, json!([{"id": 1, "name": "University", "acronym": "UNI"}]))
            .on(Method::Get, COMPONENTS_PATH, 200, json!([{"id": 2, "name": "Faculty of Arts"}]))
            .on(Method::Get, ACTIVITY_FIELDS_PATH, 200, json!([{"id": 3, "name": "Culture"}]));

        let mut state = AssociationState::default();
        get_reference_data(&client, &mut state).await.unwrap();
        get_reference_data(&client, &mut state).await.unwrap();
        assert_eq!(transport.requests().len(), 3);
        assert_eq!(state.institution_label(Some(1)), Some("UNI"));
        assert_eq!(state.field_label(Some(3)), Some("Culture"));
    }

    #[tokio::test]
    async fn test_delete_removes_from_state() {
        let client = client();
        client
            .transport()
            .on(Method::Delete, &association_path(9), 204, json!(null));

        let mut state = AssociationState::default();
        state.associations.set(vec![Association {
            id: 9,
            ..Default::default()
        }]);
        delete_association(&client, &mut state, 9).await.unwrap();
        assert!(state.associations.is_empty());
    }
}
