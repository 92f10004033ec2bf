use crate::adapters::{InMemoryBackend, RestAuth, RestBackend, RestBlobStore, RestClient};
use crate::config::toml_config::{BackendKind, SiteConfig};
use crate::core::auth_gate::AuthGate;
use crate::core::content::ContentService;
use crate::core::drag::DragSensor;
use crate::core::editors::{CollectionEditor, ProjectEditor, SingletonEditor};
use crate::core::notify::CollectingNotifier;
use crate::core::persistence::SequentialOrderWriter;
use crate::core::reorder::{ProjectList, ServiceList};
use crate::domain::model::{Service, Session, TableRow};
use crate::domain::ports::{BlobStore, ContentBackend, Notifier};
use crate::utils::error::{CmsError, Result};
use serde_json::Value;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

pub const ADMIN_EMAIL_VAR: &str = "CMS_ADMIN_EMAIL";
pub const ADMIN_PASSWORD_VAR: &str = "CMS_ADMIN_PASSWORD";

/// Everything the site and its admin panel need, wired from one [`SiteConfig`].
///
/// The memory backend has no auth or storage; admin operations run
/// unauthenticated against it, which is what local previews want.
pub struct SiteContext {
    config: SiteConfig,
    backend: Arc<dyn ContentBackend>,
    blobs: Option<Arc<dyn BlobStore>>,
    auth: Option<Arc<AuthGate>>,
    notifier: CollectingNotifier,
}

impl SiteContext {
    pub async fn from_config(config: SiteConfig) -> Result<Self> {
        let notifier = CollectingNotifier::new();

        let context = match config.backend.kind {
            BackendKind::Rest => {
                let http = RestClient::new(
                    &config.backend.url,
                    &config.backend.anon_key,
                    config.timeout(),
                )?;
                let provider = Arc::new(RestAuth::new(http.clone()));
                let gate = AuthGate::new(provider, &config.admin.login_route);

                tracing::info!("Using hosted backend at {}", config.backend.url);
                Self {
                    backend: Arc::new(RestBackend::new(http.clone())),
                    blobs: Some(Arc::new(RestBlobStore::new(http))),
                    auth: Some(Arc::new(gate)),
                    notifier,
                    config,
                }
            }
            BackendKind::Memory => {
                let backend = InMemoryBackend::new();
                if let Some(seed_file) = &config.backend.seed_file {
                    let tables = load_seed(&backend, seed_file).await?;
                    tracing::info!("Seeded {} tables from {}", tables, seed_file.display());
                }

                tracing::info!("Using in-memory backend");
                Self {
                    backend: Arc::new(backend),
                    blobs: None,
                    auth: None,
                    notifier,
                    config,
                }
            }
        };

        Ok(context)
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn backend(&self) -> Arc<dyn ContentBackend> {
        Arc::clone(&self.backend)
    }

    pub fn notifier(&self) -> &CollectingNotifier {
        &self.notifier
    }

    fn shared_notifier(&self) -> Arc<dyn Notifier> {
        Arc::new(self.notifier.clone())
    }

    pub fn auth(&self) -> Option<&Arc<AuthGate>> {
        self.auth.as_ref()
    }

    pub fn content(&self) -> ContentService {
        ContentService::new(self.backend())
    }

    pub fn project_list(&self) -> ProjectList {
        ProjectList::new(
            self.backend(),
            Arc::new(SequentialOrderWriter::new(self.backend())),
            self.shared_notifier(),
        )
    }

    pub fn service_list(&self) -> ServiceList {
        ServiceList::new(
            self.backend(),
            Arc::new(SequentialOrderWriter::new(self.backend())),
            self.shared_notifier(),
        )
    }

    pub fn drag_sensor(&self, len: usize) -> DragSensor {
        DragSensor::with_activation_distance(len, self.config.admin.drag_activation_distance)
    }

    pub fn service_editor(&self) -> CollectionEditor<Service> {
        CollectionEditor::new(self.backend(), self.shared_notifier())
    }

    pub async fn singleton_editor<T: TableRow + Default>(&self) -> Result<SingletonEditor<T>> {
        SingletonEditor::load(self.backend(), self.shared_notifier()).await
    }

    pub fn project_editor(&self) -> Result<ProjectEditor> {
        let blobs = self.blobs.clone().ok_or_else(|| {
            CmsError::config("image storage is only available with the rest backend")
        })?;
        Ok(ProjectEditor::new(
            self.backend(),
            blobs,
            self.shared_notifier(),
            &self.config.storage.bucket,
        ))
    }

    /// Signs in with the admin credentials from the environment.
    ///
    /// Returns `Ok(None)` on the memory backend, which has no accounts.
    pub async fn sign_in_from_env(&self) -> Result<Option<Session>> {
        let Some(gate) = &self.auth else {
            return Ok(None);
        };

        let email = std::env::var(ADMIN_EMAIL_VAR).map_err(|_| CmsError::MissingConfigError {
            field: ADMIN_EMAIL_VAR.to_string(),
        })?;
        let password =
            std::env::var(ADMIN_PASSWORD_VAR).map_err(|_| CmsError::MissingConfigError {
                field: ADMIN_PASSWORD_VAR.to_string(),
            })?;

        gate.sign_in(&email, &password).await.map(Some)
    }

    /// Runs `work` inside an admin session from the environment and signs out
    /// afterwards, whether or not `work` succeeded.
    pub async fn with_admin_session<T, F, Fut>(&self, work: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(session) = self.sign_in_from_env().await? {
            tracing::debug!("Admin session valid until {}", session.expires_at);
        }

        let result = work().await;

        if let Some(gate) = &self.auth {
            if let Err(e) = gate.sign_out().await {
                tracing::warn!("Sign-out failed: {}", e);
            }
        }
        result
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let gate = self
            .auth
            .as_ref()
            .ok_or_else(|| CmsError::config("password reset needs the rest backend"))?;
        gate.request_password_reset(email, self.config.admin.password_reset_redirect.as_deref())
            .await
    }
}

async fn load_seed(backend: &InMemoryBackend, path: &Path) -> Result<usize> {
    let content = tokio::fs::read_to_string(path).await?;
    let Value::Object(tables) = serde_json::from_str::<Value>(&content)? else {
        return Err(CmsError::InvalidConfigValueError {
            field: "backend.seed_file".to_string(),
            value: path.display().to_string(),
            reason: "expected a JSON object of table name to rows".to_string(),
        });
    };

    let mut seeded = 0;
    for (table, rows) in tables {
        match rows {
            Value::Array(rows) => {
                backend.seed(&table, rows).await;
                seeded += 1;
            }
            _ => tracing::warn!("Seed entry {} is not an array, skipping", table),
        }
    }
    Ok(seeded)
}
