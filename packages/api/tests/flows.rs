//! End-to-end flows over the in-memory transport.

use api::auth::{
    self, AssociationMembership, GroupMembership, RegistrationKind, RegistrationStep, Session,
};
use api::services::{associations, projects};
use api::transport::Body;
use api::{ApiClient, ApiError, Method, MemoryTransport, Redirect, Settings};
use serde_json::json;
use store::models::Association;
use store::{AssociationFilter, FileTokens, TokenStore, Tokens};

fn file_client(dir: &tempfile::TempDir) -> ApiClient<MemoryTransport, FileTokens> {
    let tokens = FileTokens::new(dir.path().join("tokens.toml"));
    ApiClient::new(MemoryTransport::new(), tokens, Settings::default())
}

#[tokio::test]
async fn cas_registration_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let client = file_client(&dir);
    let transport = client.transport();
    transport
        .on(
            Method::Post,
            auth::CAS_LOGIN_PATH,
            200,
            json!({
                "access": "a1",
                "refresh": "r1",
                "user": {"id": 7, "username": "jdoe", "email": "jane@example.org", "is_cas": true},
            }),
        )
        .on(Method::Patch, auth::CURRENT_USER_PATH, 200, json!({}))
        .on(Method::Post, auth::USER_ASSOCIATIONS_PATH, 201, json!({}))
        .on(Method::Post, auth::USER_GROUPS_PATH, 201, json!({}));

    let mut session = Session::default();
    auth::cas_login(&client, &mut session, "ST-42", true)
        .await
        .unwrap();
    assert_eq!(client.tokens().load().await.unwrap(), Tokens::new("a1", "r1"));

    let pending = session.pending.as_mut().unwrap();
    assert_eq!(pending.kind, RegistrationKind::Cas);
    pending.identity.phone = Some("0102030405".into());
    pending.associations.push(AssociationMembership {
        association: 3,
        is_president: false,
    });
    pending.groups.push(GroupMembership {
        group: 6,
        institution: None,
        fund: None,
    });

    auth::register(&client, &mut session).await.unwrap();
    assert!(session.pending.is_none());

    let requests = transport.requests();
    let identity = &requests[1];
    assert_eq!(identity.method, Method::Patch);
    assert_eq!(identity.bearer.as_deref(), Some("a1"));
    let Body::Json(body) = &identity.body else {
        panic!("expected a JSON body");
    };
    assert_eq!(body["phone"], "0102030405");
    assert!(body.get("password").is_none());
    assert_eq!(
        requests[2..]
            .iter()
            .map(|r| r.path.as_str())
            .collect::<Vec<_>>(),
        vec![auth::USER_ASSOCIATIONS_PATH, auth::USER_GROUPS_PATH]
    );
}

#[tokio::test]
async fn registration_failure_names_applied_steps() {
    let client = ApiClient::new(
        MemoryTransport::new(),
        store::MemoryTokens::new(),
        Settings::default(),
    );
    client
        .transport()
        .on(Method::Post, auth::REGISTRATION_PATH, 201, json!({}))
        .on(Method::Post, auth::USER_ASSOCIATIONS_PATH, 400, json!({"association": ["Invalid pk."]}));

    let mut pending = api::auth::PendingRegistration::new(
        RegistrationKind::Local,
        api::auth::NewUser {
            username: "jdoe".into(),
            password: Some("secret".into()),
            ..Default::default()
        },
    );
    pending.associations.push(AssociationMembership {
        association: 99,
        is_president: true,
    });
    let mut session = Session {
        pending: Some(pending),
        ..Default::default()
    };

    let error = auth::register(&client, &mut session).await.unwrap_err();
    let ApiError::RegistrationIncomplete { completed, .. } = &error else {
        panic!("unexpected error {error:?}");
    };
    assert_eq!(completed, &vec![RegistrationStep::Identity]);
    assert_eq!(
        session.pending.as_ref().map(|p| p.completed.clone()),
        Some(vec![RegistrationStep::Identity])
    );

    let report = error.report(true);
    assert_eq!(report.key, "notifications.error-400");
    assert_eq!(report.detail.as_deref(), Some("association: Invalid pk."));
    assert_eq!(client.transport().count(Method::Post, auth::USER_GROUPS_PATH), 0);
}

#[tokio::test]
async fn directory_search_and_pages() {
    let client = ApiClient::new(
        MemoryTransport::new(),
        store::MemoryTokens::new(),
        Settings::default(),
    );
    let listing: Vec<Association> = (1..=20)
        .map(|id| Association {
            id,
            name: if id <= 16 {
                format!("Club {id}")
            } else {
                format!("Choir {id}")
            },
            is_public: true,
            ..Default::default()
        })
        .collect();
    client.transport().on(
        Method::Get,
        associations::ASSOCIATIONS_PATH,
        200,
        serde_json::to_value(&listing).unwrap(),
    );

    let settings = client.settings().clone();
    let mut state = settings.client_config().app_state();
    associations::get_associations(
        &client,
        &mut state.associations,
        &associations::AssociationQuery::public(),
    )
    .await
    .unwrap();

    let clubs = AssociationFilter::with_text("club").apply(state.associations.associations.items());
    assert_eq!(clubs.len(), 16);

    let mut paginator = settings.client_config().paginator();
    assert_eq!(paginator.slice(&clubs).len(), 15);
    assert!(paginator.next(clubs.len()));
    let last: Vec<i64> = paginator.slice(&clubs).iter().map(|a| a.id).collect();
    assert_eq!(last, vec![16]);
    assert!(!paginator.next(clubs.len()));
}

#[tokio::test]
async fn expired_token_refreshed_and_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let client = file_client(&dir);
    client.tokens().save(&Tokens::new("stale", "r1")).await.unwrap();
    client
        .transport()
        .once(Method::Get, projects::PROJECTS_PATH, 401, json!({"detail": "Token expired"}))
        .on(Method::Get, projects::PROJECTS_PATH, 200, json!([{"id": 1, "name": "Concert"}]))
        .on(
            Method::Post,
            api::client::TOKEN_REFRESH_PATH,
            200,
            json!({"access": "fresh"}),
        );

    let mut state = store::state::ProjectState::default();
    projects::get_projects(&client, &mut state, &projects::ProjectQuery::default())
        .await
        .unwrap();

    assert_eq!(state.projects.len(), 1);
    let stored = client.tokens().load().await.unwrap();
    assert_eq!(stored, Tokens::new("fresh", "r1"));
}

#[tokio::test]
async fn maintenance_redirect_on_503() {
    let client = ApiClient::new(
        MemoryTransport::new(),
        store::MemoryTokens::new(),
        Settings::default(),
    );
    client.transport().on(
        Method::Get,
        associations::ASSOCIATIONS_PATH,
        503,
        json!({"detail": "Maintenance"}),
    );

    let mut state = store::state::AssociationState::default();
    let error = associations::fetch_associations(
        &client,
        &mut state,
        &associations::AssociationQuery::public(),
    )
    .await
    .unwrap_err();

    let report = error.report(false);
    assert_eq!(report.key, "notifications.error-503");
    assert_eq!(report.redirect, Some(Redirect::Maintenance));
    assert_eq!(report.detail, None);
    assert!(state.associations.is_empty());
}
