//! The user's session: catalog, view routing and the submission form.
//!
//! [`SessionHandle`] is the one place these are wired together. Its lock is only held for
//! synchronous state changes, never across a gateway call.

mod views;

pub use views::*;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::catalog::{Catalog, CatalogSnapshot};
use crate::errors::AppError;
use crate::form::{FormState, SubmissionForm};
use crate::gateway::DataGateway;
use crate::models::{Book, NewBook};
use crate::navigation::ViewRouter;

/// Everything the views read from.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub catalog: Catalog,
    pub router: ViewRouter,
    pub form: SubmissionForm,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Shared, owned session plus the gateway it talks to.
#[derive(Clone)]
pub struct SessionHandle {
    gateway: Arc<dyn DataGateway>,
    session: Arc<RwLock<Session>>,
    /// Held across fetch and replace so catalog reloads never interleave
    refresh: Arc<Mutex<()>>,
    success_delay: Duration,
}

impl SessionHandle {
    pub fn new(gateway: Arc<dyn DataGateway>, session: Session, success_delay: Duration) -> Self {
        Self {
            gateway,
            session: Arc::new(RwLock::new(session)),
            refresh: Arc::new(Mutex::new(())),
            success_delay,
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().await
    }

    /// Re-fetch the catalog and swap it in.
    ///
    /// Reloads run one at a time, so a slow fetch can never overwrite a newer snapshot.
    pub async fn reload(&self) -> Result<(), AppError> {
        let _refresh = self.refresh.lock().await;
        let snapshot = CatalogSnapshot::fetch(self.gateway.as_ref()).await?;
        self.session.write().await.catalog.replace(snapshot);
        Ok(())
    }

    /// Like [`Self::reload`], but a failure only gets logged and the previous catalog stays.
    pub async fn load(&self) {
        if let Err(e) = self.reload().await {
            tracing::warn!("Failed to load catalog: {}", e);
        }
    }

    /// Submit the current draft.
    ///
    /// The insert runs on its own task: once the form is `Submitting` it always settles, even
    /// if the caller stops waiting. On success the catalog is reloaded and, after the
    /// configured delay, the user is taken to the browse view.
    pub async fn submit(&self) -> Result<Book, AppError> {
        let draft = self.session.write().await.form.begin_submit()?;

        let handle = self.clone();
        let task = tokio::spawn(async move { handle.settle(draft).await });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Submission task failed: {}", e);
                let err = AppError::Backend("The submission was interrupted".to_string());
                let mut session = self.session.write().await;
                if session.form.state() == FormState::Submitting {
                    let _ = session.form.complete_submit(Err(err.clone()));
                }
                Err(err)
            }
        }
    }

    async fn settle(&self, draft: NewBook) -> Result<Book, AppError> {
        let outcome = self.gateway.insert_book(&draft).await;

        let (result, ticket) = {
            let mut session = self.session.write().await;
            let result = session.form.complete_submit(outcome);
            (result, session.form.success_ticket())
        };

        let book = match result {
            Ok(book) => book,
            Err(e) => {
                tracing::warn!("Book submission failed: {}", e);
                return Err(e);
            }
        };
        tracing::info!("Book {} ('{}') submitted", book.id, book.title);

        self.load().await;
        if let Some(ticket) = ticket {
            self.schedule_return(ticket);
        }

        Ok(book)
    }

    /// After the display delay, go to browse and clear the success message it was armed for.
    fn schedule_return(&self, ticket: u64) {
        let session = Arc::clone(&self.session);
        let delay = self.success_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut session = session.write().await;
            session.form.dismiss_success(ticket);
            session.router.browse();
        });
    }
}
