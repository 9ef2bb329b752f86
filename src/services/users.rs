// src/services/users.rs
use crate::core::endpoints::ai;
use crate::core::{ApiError, RequestBody, TransportClient};
use crate::types::{AiUser, AiUserPatch, NewAiUser};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::Serialize;

pub const EXTERNAL_USER_ID_HEADER: &str = "x-external-user-id";

#[derive(Serialize)]
struct EmailQuery<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct PageWindow {
    limit: u32,
    offset: u32,
}

/// User records on the AI backend.
#[derive(Clone)]
pub struct UsersService {
    client: TransportClient,
}

impl UsersService {
    pub fn new(client: TransportClient) -> Self {
        Self { client }
    }

    /// Look a user up by email. A 404 means no such user and is not an error.
    pub async fn by_email(&self, email: &str) -> Result<Option<AiUser>, ApiError> {
        match self
            .client
            .get_with(ai::USERS_BY_EMAIL.path(), &EmailQuery { email })
            .await
        {
            Ok(user) => Ok(Some(user)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create the user if missing, otherwise return the existing record.
    pub async fn ensure(&self, body: &NewAiUser) -> Result<AiUser, ApiError> {
        self.client.post(ai::USERS_ENSURE.path(), body).await
    }

    /// Create a user, optionally linking the identity provider's id.
    pub async fn create(
        &self,
        payload: &NewAiUser,
        external_user_id: Option<&str>,
    ) -> Result<AiUser, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(external_id) = external_user_id.filter(|id| !id.is_empty()) {
            let value = HeaderValue::from_str(external_id).map_err(|e| {
                ApiError::unknown(format!("Invalid external user id: {}", e))
                    .with_code("INVALID_REQUEST")
            })?;
            headers.insert(EXTERNAL_USER_ID_HEADER, value);
        }

        self.client
            .request_with_headers::<AiUser, ()>(
                Method::POST,
                ai::USERS_CREATE.path(),
                Some(RequestBody::json(payload)?),
                None,
                headers,
            )
            .await
    }

    pub async fn update(&self, id: &str, patch: &AiUserPatch) -> Result<AiUser, ApiError> {
        self.client.patch(&ai::USERS_DETAIL.with_id(id), patch).await
    }

    pub async fn list(&self, limit: u32, offset: u32) -> Result<Vec<AiUser>, ApiError> {
        self.client
            .get_with(ai::USERS_LIST.path(), &PageWindow { limit, offset })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Backend, ErrorSource, TokenSlot};
    use crate::services::test_support::transport;
    use crate::types::Role;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> UsersService {
        UsersService::new(transport(server, Backend::Ai, TokenSlot::new()))
    }

    fn user_json(id: &str, email: &str) -> serde_json::Value {
        json!({
            "id": id,
            "email": email,
            "full_name": "Dana Doe",
            "role": "org:member",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_by_email_found_and_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/users/by-email"))
            .and(query_param("email", "dana@acme.test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u1", "dana@acme.test")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/users/by-email"))
            .and(query_param("email", "ghost@acme.test"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "User not found"})))
            .mount(&server)
            .await;

        let users = service(&server);
        let found = users.by_email("dana@acme.test").await.unwrap().unwrap();
        assert_eq!(found.role, Some(Role::Member));
        assert!(users.by_email("ghost@acme.test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_by_email_other_errors_propagate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/users/by-email"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({"detail": "Database unavailable"})))
            .mount(&server)
            .await;

        let err = service(&server).by_email("x@acme.test").await.unwrap_err();
        assert_eq!(err.source, ErrorSource::Ai);
        assert_eq!(err.status, Some(503));
        assert_eq!(err.message, "Database unavailable");
    }

    #[tokio::test]
    async fn test_create_sends_external_id_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/users"))
            .and(header("x-external-user-id", "user_2abc"))
            .and(body_json(json!({"email": "new@acme.test"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(user_json("u2", "new@acme.test")))
            .expect(1)
            .mount(&server)
            .await;

        let payload = NewAiUser {
            email: "new@acme.test".into(),
            ..NewAiUser::default()
        };
        let user = service(&server)
            .create(&payload, Some("user_2abc"))
            .await
            .unwrap();
        assert_eq!(user.id, "u2");
    }

    #[tokio::test]
    async fn test_update_uses_patch_and_list_uses_window() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/users/u1"))
            .and(body_json(json!({"headline": "Staff Engineer"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u1", "dana@acme.test")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/users"))
            .and(query_param("limit", "100"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                user_json("u1", "dana@acme.test"),
                user_json("u2", "new@acme.test")
            ])))
            .mount(&server)
            .await;

        let users = service(&server);
        let patch = AiUserPatch {
            headline: Some("Staff Engineer".into()),
            ..AiUserPatch::default()
        };
        users.update("u1", &patch).await.unwrap();
        assert_eq!(users.list(100, 0).await.unwrap().len(), 2);
    }
}
