//! Editable page contents, addressed by code.

use store::diff::ContentEdit;
use store::models::Content;
use store::state::ContentState;
use store::{Patch, TokenStore};

use super::{fetch_into, get_into};
use crate::client::{ApiClient, Profile};
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

pub const CONTENTS_PATH: &str = "/contents/";

pub async fn fetch_contents<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut ContentState,
) -> Result<(), ApiError> {
    let request = ApiRequest::get(CONTENTS_PATH);
    fetch_into(client, &mut state.contents, Profile::Public, request).await
}

pub async fn get_contents<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut ContentState,
) -> Result<(), ApiError> {
    let request = ApiRequest::get(CONTENTS_PATH);
    get_into(client, &mut state.contents, Profile::Public, request).await
}

pub async fn update_content<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    state: &mut ContentState,
    reference: &Content,
    edit: &ContentEdit,
) -> Result<bool, ApiError> {
    let patch = edit.diff(reference);
    if patch.is_empty() {
        return Ok(false);
    }
    let request = ApiRequest::patch(format!("{CONTENTS_PATH}{}", reference.id)).json(patch.to_body());
    let updated: Content = client.call(Profile::Authenticated, request).await?;
    tracing::info!(code = %updated.code, "content updated");
    if let Some(slot) = state
        .contents
        .items_mut()
        .iter_mut()
        .find(|c| c.id == updated.id)
    {
        *slot = updated;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTransport;
    use crate::settings::Settings;
    use crate::transport::{Body, Method};
    use serde_json::json;
    use store::{MemoryTokens, Tokens};

    #[tokio::test]
    async fn test_update_content() {
        let client = ApiClient::new(
            MemoryTransport::new(),
            MemoryTokens::with(Tokens::new("a", "r")),
            Settings::default(),
        );
        let transport = client.transport();
        transport
            .on(
                Method::Get,
                CONTENTS_PATH,
                200,
                json!([{"id": 2, "code": "HOME_INFO", "header": "Welcome"}]),
            )
            .on(
                Method::Patch,
                "/contents/2",
                200,
                json!({"id": 2, "code": "HOME_INFO", "header": "Hello"}),
            );

        let mut state = ContentState::default();
        get_contents(&client, &mut state).await.unwrap();
        let reference = state.by_code("HOME_INFO").cloned().unwrap();
        let mut edit = ContentEdit::from(&reference);
        edit.header = Some("Hello".into());

        assert!(update_content(&client, &mut state, &reference, &edit)
            .await
            .unwrap());
        assert_eq!(
            transport.requests()[1].body,
            Body::Json(json!({"header": "Hello"}))
        );
        assert_eq!(
            state.by_code("HOME_INFO").and_then(|c| c.header.as_deref()),
            Some("Hello")
        );
    }
}
