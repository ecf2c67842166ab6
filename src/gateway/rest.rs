//! Client for the hosted PostgREST-style backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::DataGateway;
use crate::errors::AppError;
use crate::models::{Book, Category, NewBook};

/// Column list for active books, joining the uploader profile.
const BOOK_SELECT: &str = "*,profiles:uploaded_by(username,full_name)";

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Gateway talking to the hosted backend over HTTPS.
pub struct RestGateway {
    http: Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl RestGateway {
    pub fn new(
        base_url: &str,
        api_key: &str,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token,
        })
    }

    fn endpoint(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection)
    }

    /// Attach the project key and the caller's session token.
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        request
            .header("apikey", &self.api_key)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(bearer)
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<BackendErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| {
                    format!("{}: {}", status, body.chars().take(200).collect::<String>())
                });
            tracing::warn!("Backend responded with {}: {}", status, message);
            return Err(AppError::Backend(message));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl DataGateway for RestGateway {
    async fn fetch_categories(&self) -> Result<Vec<Category>, AppError> {
        let response = self
            .authorized(self.http.get(self.endpoint("categories")))
            .query(&[("select", "*")])
            .send()
            .await?;

        Self::read(response).await
    }

    async fn fetch_active_books(&self) -> Result<Vec<Book>, AppError> {
        let response = self
            .authorized(self.http.get(self.endpoint("books")))
            .query(&[
                ("select", BOOK_SELECT),
                ("status", "eq.active"),
                ("order", "created_at.desc"),
            ])
            .send()
            .await?;

        Self::read(response).await
    }

    async fn insert_book(&self, book: &NewBook) -> Result<Book, AppError> {
        let response = self
            .authorized(self.http.post(self.endpoint("books")))
            .header("Prefer", "return=representation")
            .json(&[book])
            .send()
            .await?;

        let created: Vec<Book> = Self::read(response).await?;
        created.into_iter().next().ok_or_else(|| {
            AppError::Backend("Backend returned no record for the new book".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use crate::models::{Difficulty, RecordId};

    fn authorized(headers: &HeaderMap) -> bool {
        headers.get("apikey").and_then(|v| v.to_str().ok()) == Some("anon-key")
            && headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                == Some("Bearer user-token")
    }

    async fn categories(headers: HeaderMap) -> (StatusCode, Json<Value>) {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "JWT expired" })));
        }
        (
            StatusCode::OK,
            Json(json!([{ "id": 1, "name": "Science", "icon": "Microscope", "color": "bg-green-500" }])),
        )
    }

    async fn list_books(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        assert_eq!(params.get("status").map(String::as_str), Some("eq.active"));
        assert_eq!(
            params.get("order").map(String::as_str),
            Some("created_at.desc")
        );
        assert_eq!(params.get("select").map(String::as_str), Some(BOOK_SELECT));
        Json(json!([{
            "id": 10,
            "title": "Dune",
            "author": "Frank Herbert",
            "category_id": 1,
            "difficulty": "Principiante",
            "tags": ["scifi"],
            "status": "active",
            "created_at": "2024-05-01T08:00:00+00:00",
            "profiles": { "username": "paul", "full_name": "Paul Atreides" }
        }]))
    }

    async fn create_book(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        assert_eq!(
            headers.get("prefer").and_then(|v| v.to_str().ok()),
            Some("return=representation")
        );
        let draft = &body[0];
        if draft["title"] == "Duplicate" {
            return (
                StatusCode::CONFLICT,
                Json(json!({ "code": "23505", "message": "duplicate key value" })),
            );
        }
        assert!(draft.get("uploaded_by").is_none());
        (
            StatusCode::CREATED,
            Json(json!([{
                "id": 11,
                "title": draft["title"],
                "author": draft["author"],
                "category_id": draft["category_id"],
                "difficulty": draft["difficulty"],
                "description": draft["description"],
                "tags": draft["tags"],
                "status": "active",
                "uploaded_by": "user-1",
                "created_at": "2024-05-02T08:00:00+00:00"
            }])),
        )
    }

    async fn spawn_backend() -> String {
        let app = Router::new()
            .route("/rest/v1/categories", get(categories))
            .route("/rest/v1/books", get(list_books).post(create_book));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn gateway(url: &str, token: Option<&str>) -> RestGateway {
        RestGateway::new(
            url,
            "anon-key",
            token.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn draft(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Frank Herbert".to_string(),
            category_id: RecordId::from("1"),
            difficulty: Difficulty::Advanced,
            description: None,
            tags: vec!["scifi".to_string()],
        }
    }

    #[tokio::test]
    async fn test_fetch_categories() {
        let url = spawn_backend().await;
        let categories = gateway(&url, Some("user-token"))
            .fetch_categories()
            .await
            .unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Science");
    }

    #[tokio::test]
    async fn test_backend_error_message_is_surfaced() {
        let url = spawn_backend().await;
        let err = gateway(&url, None).fetch_categories().await.unwrap_err();
        assert_eq!(err, AppError::Backend("JWT expired".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_active_books() {
        let url = spawn_backend().await;
        let books = gateway(&url, Some("user-token"))
            .fetch_active_books()
            .await
            .unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].uploader_name(), "Paul Atreides");
        assert_eq!(books[0].tags, vec!["scifi"]);
    }

    #[tokio::test]
    async fn test_insert_book() {
        let url = spawn_backend().await;
        let book = gateway(&url, Some("user-token"))
            .insert_book(&draft("Children of Dune"))
            .await
            .unwrap();
        assert_eq!(book.id, RecordId::from("11"));
        assert_eq!(book.difficulty, Difficulty::Advanced);
        assert_eq!(book.uploaded_by.as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_insert_constraint_violation() {
        let url = spawn_backend().await;
        let err = gateway(&url, Some("user-token"))
            .insert_book(&draft("Duplicate"))
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Backend("duplicate key value".to_string()));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let err = gateway("http://127.0.0.1:9", None)
            .fetch_categories()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Backend(_)));
    }
}
