//! The console: its backends and the services built on them.

use std::sync::Arc;

use rpa_backend_memory::{DirBlobStore, MemoryIdentityProvider, MemoryStore};
use rpa_blob::{BlobLocator, BlobStore};
use rpa_config::{ConfigError, ConsoleConfig, FileLocalStore, LocalStore};
use rpa_identity::IdentityProvider;
use rpa_storage::DocumentStore;
use tracing::{debug, info};

use crate::error::SetupError;
use crate::login::LoginSequencer;
use crate::notify::Notifier;
use crate::records::{
    ActivityService, ArticleService, EventService, MembershipService, ProfileService,
    RecordContext, RegistryService, ServiceRequestService, TeamService,
};
use crate::session::{self, Session};

/// Backends shared by every console workflow.
#[derive(Clone)]
pub struct Console {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    identity: Arc<dyn IdentityProvider>,
    local: Arc<dyn LocalStore>,
    notifier: Arc<dyn Notifier>,
    country_code: String,
}

impl Console {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        identity: Arc<dyn IdentityProvider>,
        local: Arc<dyn LocalStore>,
        notifier: Arc<dyn Notifier>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            documents,
            blobs,
            identity,
            local,
            notifier,
            country_code: country_code.into(),
        }
    }

    /// Open the local development backends under `config.data_dir`.
    pub fn open(config: &ConsoleConfig, notifier: Arc<dyn Notifier>) -> Result<Self, SetupError> {
        std::fs::create_dir_all(&config.data_dir).map_err(ConfigError::from)?;
        debug!(data_dir = %config.data_dir.display(), "Opening console backends");

        let documents = MemoryStore::open_snapshot(config.documents_path())?;
        let identity = MemoryIdentityProvider::open_snapshot(config.identity_path())?;
        let locator = BlobLocator::new(&config.storage_endpoint, &config.storage_bucket)?;
        let blobs = DirBlobStore::new(config.blobs_dir(), locator);
        let local = FileLocalStore::open(config.local_storage_path())?;

        info!(data_dir = %config.data_dir.display(), "Console ready");
        Ok(Self::new(
            Arc::new(documents),
            Arc::new(blobs),
            Arc::new(identity),
            Arc::new(local),
            notifier,
            config.default_country_code.clone(),
        ))
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn session(&self) -> Option<Session> {
        Session::restore(self.local.as_ref())
    }

    pub async fn sign_out(&self) -> Result<(), ConfigError> {
        session::sign_out(self.identity.as_ref(), self.local.as_ref()).await
    }

    pub fn login(&self) -> LoginSequencer {
        LoginSequencer::new(
            self.documents.clone(),
            self.identity.clone(),
            self.local.clone(),
            self.notifier.clone(),
            self.country_code.clone(),
        )
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    fn records(&self) -> RecordContext {
        RecordContext {
            documents: self.documents.clone(),
            blobs: self.blobs.clone(),
            notifier: self.notifier.clone(),
        }
    }

    pub fn registry(&self) -> RegistryService {
        RegistryService::new(self.records())
    }

    pub fn profile(&self) -> ProfileService {
        ProfileService::new(self.records(), self.local.clone())
    }

    pub fn team(&self) -> TeamService {
        TeamService::new(self.records())
    }

    pub fn activities(&self) -> ActivityService {
        ActivityService::new(self.records())
    }

    pub fn articles(&self) -> ArticleService {
        ArticleService::new(self.records())
    }

    pub fn events(&self) -> EventService {
        EventService::new(self.records())
    }

    pub fn service_requests(&self) -> ServiceRequestService {
        ServiceRequestService::new(self.records())
    }

    pub fn membership(&self) -> MembershipService {
        MembershipService::new(self.records())
    }
}
