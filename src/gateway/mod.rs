//! Data gateway to the book backend.
//!
//! Every read and write of categories and books goes through [`DataGateway`]. Two backends
//! exist: the hosted REST backend and an embedded SQLite database for local development.

mod local;
#[cfg(test)]
pub mod memory;
mod rest;

pub use local::*;
pub use rest::*;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{BackendConfig, Config};
use crate::errors::AppError;
use crate::models::{Book, Category, NewBook};

/// Read/insert access to the `categories` and `books` collections.
///
/// Failures are reported once as [`AppError::Backend`]; nothing is retried.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// All categories, in backend order. Empty when none exist.
    async fn fetch_categories(&self) -> Result<Vec<Category>, AppError>;

    /// Active books with their uploader profile, newest first.
    async fn fetch_active_books(&self) -> Result<Vec<Book>, AppError>;

    /// Persist a new book. The backend assigns `id`, `created_at`, `status` and `uploaded_by`.
    async fn insert_book(&self, book: &NewBook) -> Result<Book, AppError>;
}

/// Build the gateway selected by the configuration.
pub async fn connect(config: &Config) -> Result<Arc<dyn DataGateway>, AppError> {
    match &config.backend {
        BackendConfig::Remote {
            url,
            api_key,
            access_token,
        } => {
            tracing::info!("Using hosted backend at {}", url);
            let gateway = RestGateway::new(
                url,
                api_key,
                access_token.clone(),
                config.request_timeout,
            )?;
            Ok(Arc::new(gateway))
        }
        BackendConfig::Local { db_path, user_id } => {
            tracing::info!("Using local database at {:?}", db_path);
            let gateway = LocalGateway::open(db_path, user_id).await?;
            Ok(Arc::new(gateway))
        }
    }
}
