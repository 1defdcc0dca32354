//! CRUD services for every record kind the console manages.
//!
//! Services validate locally before touching a backend, report the outcome of
//! each operation as a toast, and log backend failures with `tracing`.

pub mod activities;
pub mod articles;
pub mod events;
pub mod membership;
pub mod profile;
pub mod registry;
pub mod service_requests;
pub mod team;

pub use activities::{ActivityService, ActivityUpdate, NewActivity};
pub use articles::{ArticleService, ArticleUpdate, NewArticle};
pub use events::{EventInput, EventService};
pub use membership::{MembershipService, NewMembershipRequest};
pub use profile::{ProfileSaved, ProfileService};
pub use registry::RegistryService;
pub use service_requests::{NewServiceRequest, ServiceRequestService, ServiceRequestUpdate};
pub use team::{NewTeamMember, TeamMemberUpdate, TeamService};

use std::future::Future;
use std::sync::Arc;

use rpa_blob::BlobStore;
use rpa_storage::DocumentStore;
use tracing::warn;

use crate::error::RecordError;
use crate::notify::Notifier;
use crate::validation::FieldErrors;

/// Backends shared by the record services.
#[derive(Clone)]
pub struct RecordContext {
    pub documents: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl RecordContext {
    /// Toast the outcome of a backend operation.
    pub(crate) fn report<T, E>(
        &self,
        result: Result<T, E>,
        success: &str,
        failure: &str,
    ) -> Result<T, RecordError>
    where
        E: Into<RecordError>,
    {
        match result {
            Ok(value) => {
                self.notifier.success(success);
                Ok(value)
            }
            Err(e) => {
                let err = e.into();
                warn!(error = %err, "{}", failure);
                self.notifier.error(failure);
                Err(err)
            }
        }
    }

    /// Toast a failed read. Nothing is shown on success.
    pub(crate) fn report_fetch<T, E>(&self, result: Result<T, E>, failure: &str) -> Result<T, RecordError>
    where
        E: Into<RecordError>,
    {
        result.map_err(|e| {
            let err = e.into();
            warn!(error = %err, "{}", failure);
            self.notifier.error(failure);
            err
        })
    }

    /// Reject a form with field errors.
    pub(crate) fn reject<T>(&self, errors: FieldErrors) -> Result<T, RecordError> {
        let err = RecordError::Validation(errors);
        self.notifier.error(&err.to_string());
        Err(err)
    }
}

/// A record selected for deletion, awaiting the operator's confirmation.
#[derive(Clone, Debug, Default)]
pub struct DeleteConfirmation<T> {
    selected: Option<T>,
}

impl<T: Clone> DeleteConfirmation<T> {
    pub fn new() -> Self {
        Self { selected: None }
    }

    pub fn select(&mut self, item: T) {
        self.selected = Some(item);
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    pub fn cancel(&mut self) {
        self.selected = None;
    }

    /// Run `delete` on the selected item, clearing the selection whatever the outcome.
    ///
    /// Returns `Ok(None)` when nothing was selected.
    pub async fn confirm<F, Fut, E>(&mut self, delete: F) -> Result<Option<T>, E>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let Some(item) = self.selected.take() else {
            return Ok(None);
        };
        delete(item.clone()).await?;
        Ok(Some(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_confirm_deletes_then_clears() {
        let mut confirmation = DeleteConfirmation::new();
        confirmation.select("req-1".to_string());
        assert_eq!(confirmation.selected().map(String::as_str), Some("req-1"));

        let deleted = confirmation
            .confirm(|id| async move {
                assert_eq!(id, "req-1");
                Ok::<_, RecordError>(())
            })
            .await
            .unwrap();
        assert_eq!(deleted.as_deref(), Some("req-1"));
        assert!(confirmation.selected().is_none());
    }

    #[tokio::test]
    async fn test_failed_confirm_still_clears() {
        let mut confirmation = DeleteConfirmation::new();
        confirmation.select(7u32);
        let result = confirmation
            .confirm(|_| async { Err::<(), _>(RecordError::MissingImages) })
            .await;
        assert!(result.is_err());
        assert!(confirmation.selected().is_none());
    }

    #[tokio::test]
    async fn test_confirm_without_selection_is_noop() {
        let mut confirmation: DeleteConfirmation<u32> = DeleteConfirmation::new();
        let result = confirmation
            .confirm(|_| async { Err::<(), _>(RecordError::MissingImages) })
            .await;
        assert!(matches!(result, Ok(None)));

        confirmation.select(1);
        confirmation.cancel();
        assert!(confirmation.selected().is_none());
    }
}
