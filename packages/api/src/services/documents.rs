//! Document types and uploaded files.

use store::models::DocumentUpload;
use store::state::DocumentState;
use store::TokenStore;

use super::{fetch_into, get_into, join_list};
use crate::client::{ApiClient, Profile};
use crate::error::ApiError;
use crate::transport::{ApiRequest, Part, Transport};

pub const DOCUMENTS_PATH: &str = "/documents/";
pub const UPLOADS_PATH: &str = "/documents/uploads";

/// Owners an upload list can be narrowed to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadQuery {
    pub project_id: Option<i64>,
    pub association_id: Option<i64>,
    pub user_id: Option<i64>,
}

/// A file to attach to a document type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewUpload {
    pub document: i64,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub project: Option<i64>,
    pub association: Option<i64>,
    pub user: Option<String>,
}

impl NewUpload {
    fn parts(&self) -> Vec<Part> {
        let mut parts = vec![Part::Text {
            name: "document".into(),
            value: self.document.to_string(),
        }];
        let owners = [
            ("project", self.project.map(|id| id.to_string())),
            ("association", self.association.map(|id| id.to_string())),
            ("user", self.user.clone()),
        ];
        for (name, value) in owners {
            if let Some(value) = value {
                parts.push(Part::Text {
                    name: name.into(),
                    value,
                });
            }
        }
        parts.push(Part::File {
            name: "path_file".into(),
            file_name: self.file_name.clone(),
            mime: self.mime.clone(),
            bytes: self.bytes.clone(),
        });
        parts
    }
}

fn documents_request(process_types: &[&str]) -> ApiRequest {
    ApiRequest::get(DOCUMENTS_PATH).query_opt("process_types", join_list(process_types))
}

/// Document types of the given process types, all of them when `process_types` is empty.
pub async fn fetch_documents<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut DocumentState,
    process_types: &[&str],
) -> Result<(), ApiError> {
    let request = documents_request(process_types);
    fetch_into(client, &mut state.documents, Profile::Public, request).await
}

pub async fn get_documents<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut DocumentState,
    process_types: &[&str],
) -> Result<(), ApiError> {
    let request = documents_request(process_types);
    get_into(client, &mut state.documents, Profile::Public, request).await
}

pub async fn fetch_uploads<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut DocumentState,
    query: &UploadQuery,
) -> Result<(), ApiError> {
    let request = ApiRequest::get(UPLOADS_PATH)
        .query_opt("project_id", query.project_id)
        .query_opt("association_id", query.association_id)
        .query_opt("user_id", query.user_id);
    fetch_into(client, &mut state.uploads, Profile::Authenticated, request).await
}

/// Upload each file as its own multipart request, stopping at the first failure.
///
/// Files uploaded before a failure stay uploaded and are already in `state`.
pub async fn upload_documents<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut DocumentState,
    files: &[NewUpload],
) -> Result<(), ApiError> {
    for file in files {
        let request = ApiRequest::post(UPLOADS_PATH).multipart(file.parts());
        let uploaded: DocumentUpload = client.call(Profile::Authenticated, request).await?;
        tracing::info!(id = uploaded.id, document = file.document, name = %file.file_name, "document uploaded");
        state.uploads.items_mut().push(uploaded);
    }
    Ok(())
}

pub async fn delete_upload<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut DocumentState,
    id: i64,
) -> Result<(), ApiError> {
    client
        .execute(
            Profile::Authenticated,
            ApiRequest::delete(format!("{UPLOADS_PATH}/{id}")),
        )
        .await?;
    state.uploads.items_mut().retain(|u| u.id != id);
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
    async fn test_process_types_filter() {
        let client = client();
        client.transport().on(
            Method::Get,
            DOCUMENTS_PATH,
            200,
            json!([{"id": 1, "name": "Charter", "process_type": "CHARTER_ASSOCIATION"}]),
        );

        let mut state = DocumentState::default();
        get_documents(&client, &mut state, &["CHARTER_ASSOCIATION", "DOCUMENT_ASSOCIATION"])
            .await
            .unwrap();
        get_documents(&client, &mut state, &["CHARTER_ASSOCIATION"])
            .await
            .unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].query_value("process_types"),
            Some("CHARTER_ASSOCIATION,DOCUMENT_ASSOCIATION")
        );
        assert!(state.documents.items()[0].is_charter());
    }

    #[tokio::test]
    async fn test_upload_is_multipart() {
        let client = client();
        client.transport().on(
            Method::Post,
            UPLOADS_PATH,
            201,
            json!({"id": 12, "name": "statuts.pdf", "document": 1, "association": 4}),
        );

        let mut state = DocumentState::default();
        let file = NewUpload {
            document: 1,
            file_name: "statuts.pdf".into(),
            mime: "application/pdf".into(),
            bytes: b"%PDF-1.7".to_vec(),
            association: Some(4),
            ..Default::default()
        };
        upload_documents(&client, &mut state, &[file]).await.unwrap();

        let sent = &client.transport().requests()[0];
        let Body::Multipart(parts) = &sent.body else {
            panic!("expected a multipart body");
        };
        assert_eq!(parts.len(), 3);
        assert!(parts.contains(&Part::Text {
            name: "association".into(),
            value: "4".into(),
        }));
        assert_eq!(state.uploads_for(1).len(), 1);
    }

    #[tokio::test]
    async fn test_upload_stops_at_first_failure() {
        let client = client();
        client
            .transport()
            .once(Method::Post, UPLOADS_PATH, 201, json!({"id": 1, "document": 1}))
            .once(Method::Post, UPLOADS_PATH, 413, json!({"detail": "File too large."}));

        let mut state = DocumentState::default();
        let files = vec![NewUpload::default(), NewUpload::default(), NewUpload::default()];
        let error = upload_documents(&client, &mut state, &files).await.unwrap_err();
        assert_eq!(error.status(), Some(413));
        assert_eq!(state.uploads.len(), 1);
        assert_eq!(client.transport().requests().len(), 2);
    }
}
