//! Stateless HTTP request builder and response parser for the user API.
//!
//! # Design
//! `UserClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping this layer
//! deterministic and free of I/O.

use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{User, UserId};

const COLLECTION_PATH: &str = "/api/users";

/// Synchronous, stateless client for the user API.
#[derive(Debug, Clone)]
pub struct UserClient {
    base_url: String,
}

impl UserClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}{COLLECTION_PATH}", self.base_url)
    }

    fn item_url(&self, id: UserId) -> String {
        format!("{}{COLLECTION_PATH}/{id}", self.base_url)
    }

    pub fn build_list_users(&self) -> HttpRequest {
        bodyless(HttpMethod::Get, self.collection_url())
    }

    pub fn build_search_users(&self, name: &str) -> HttpRequest {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("name", name)
            .finish();
        bodyless(HttpMethod::Get, format!("{}/search?{query}", self.collection_url()))
    }

    pub fn build_get_user(&self, id: UserId) -> HttpRequest {
        bodyless(HttpMethod::Get, self.item_url(id))
    }

    /// The draft's id, if any, is never sent: the backend assigns ids.
    pub fn build_create_user(&self, draft: &User) -> Result<HttpRequest, ApiError> {
        with_json(HttpMethod::Post, self.collection_url(), &draft.without_id())
    }

    pub fn build_update_user(&self, id: UserId, record: &User) -> Result<HttpRequest, ApiError> {
        with_json(HttpMethod::Put, self.item_url(id), record)
    }

    pub fn build_delete_user(&self, id: UserId) -> HttpRequest {
        bodyless(HttpMethod::Delete, self.item_url(id))
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        check_status(&response, &[200])?;
        decode(&response)
    }

    pub fn parse_search_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        self.parse_list_users(response)
    }

    pub fn parse_get_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response, &[200])?;
        decode(&response)
    }

    pub fn parse_create_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response, &[200, 201])?;
        decode(&response)
    }

    pub fn parse_update_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response, &[200])?;
        decode(&response)
    }

    pub fn parse_delete_user(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 204])
    }
}

fn bodyless(method: HttpMethod, url: String) -> HttpRequest {
    HttpRequest {
        method,
        url,
        headers: Vec::new(),
        body: None,
    }
}

fn with_json(method: HttpMethod, url: String, payload: &User) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(HttpRequest {
        method,
        url,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

/// Responses without a content-type are parsed as JSON; a declared
/// non-JSON content-type is rejected before parsing.
fn decode<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    if let Some(content_type) = response.header("content-type") {
        if !content_type.trim_start().starts_with("application/json") {
            return Err(ApiError::DeserializationError(format!(
                "expected application/json, got {content_type}"
            )));
        }
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, accepted: &[u16]) -> Result<(), ApiError> {
    if accepted.contains(&response.status) {
        return Ok(());
    }
    match response.status {
        404 => Err(ApiError::NotFound),
        400 | 422 => Err(ApiError::Validation {
            status: response.status,
            body: response.body.clone(),
        }),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> UserClient {
        UserClient::new("http://localhost:8080")
    }

    #[test]
    fn build_list_users_produces_correct_request() {
        let req = client().build_list_users();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/api/users");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_user_produces_correct_request() {
        let req = client().build_get_user(42);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/api/users/42");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_user_strips_id() {
        let draft = User {
            id: Some(9),
            name: "Bob".to_string(),
            email: "b@x.com".to_string(),
        };
        let req = client().build_create_user(&draft).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/api/users");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"name": "Bob", "email": "b@x.com"}));
    }

    #[test]
    fn build_update_user_sends_whole_record() {
        let record = User {
            id: Some(1),
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
        };
        let req = client().build_update_user(1, &record).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:8080/api/users/1");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"id": 1, "name": "Ann", "email": "ann@x.com"}));
    }

    #[test]
    fn build_delete_user_produces_correct_request() {
        let req = client().build_delete_user(7);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:8080/api/users/7");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_search_users_encodes_query() {
        let req = client().build_search_users("Ann & co");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/api/users/search?name=Ann+%26+co");
    }

    #[test]
    fn parse_list_users_success() {
        let response = HttpResponse::new(200, r#"[{"id":1,"name":"Ann","email":"a@x.com"}]"#);
        let users = client().parse_list_users(response).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Ann");
        assert_eq!(users[0].id, Some(1));
    }

    #[test]
    fn parse_list_users_server_error() {
        let response = HttpResponse::new(500, "internal error");
        let err = client().parse_list_users(response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_get_user_not_found() {
        let err = client().parse_get_user(HttpResponse::new(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_create_user_accepts_200_and_201() {
        let body = r#"{"id":5,"name":"New","email":"n@x.com"}"#;
        for status in [200, 201] {
            let user = client().parse_create_user(HttpResponse::new(status, body)).unwrap();
            assert_eq!(user.id, Some(5));
        }
    }

    #[test]
    fn parse_create_user_rejected_payload() {
        let err = client()
            .parse_create_user(HttpResponse::new(400, "name is required"))
            .unwrap_err();
        match err {
            ApiError::Validation { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "name is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_update_user_not_found() {
        let err = client().parse_update_user(HttpResponse::new(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_delete_user_accepts_200_and_204() {
        assert!(client().parse_delete_user(HttpResponse::new(204, "")).is_ok());
        assert!(client().parse_delete_user(HttpResponse::new(200, "")).is_ok());
    }

    #[test]
    fn parse_delete_user_not_found() {
        let err = client().parse_delete_user(HttpResponse::new(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = UserClient::new("http://localhost:8080/");
        assert_eq!(client.build_list_users().url, "http://localhost:8080/api/users");
    }

    #[test]
    fn parse_get_user_accepts_json_content_type() {
        let response = HttpResponse::new(200, r#"{"id":1,"name":"Ann","email":"a@x.com"}"#)
            .with_header("Content-Type", "application/json; charset=utf-8");
        let user = client().parse_get_user(response).unwrap();
        assert_eq!(user.id, Some(1));
    }

    #[test]
    fn parse_list_users_rejects_html_content_type() {
        let response = HttpResponse::new(200, "<html>login</html>").with_header("content-type", "text/html");
        let err = client().parse_list_users(response).unwrap_err();
        match err {
            ApiError::DeserializationError(msg) => assert!(msg.contains("text/html")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_list_users_bad_json() {
        let err = client().parse_list_users(HttpResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
