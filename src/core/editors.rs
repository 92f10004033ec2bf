use crate::core::content::merge_with_defaults;
use crate::domain::model::{
    NewProject, NewService, Notification, Ordered, Project, Service, TableRow, DISPLAY_ORDER,
};
use crate::domain::ports::{BlobStore, ContentBackend, Notifier, Query};
use crate::utils::error::{CmsError, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

fn report<T>(notifier: &dyn Notifier, result: Result<T>, success: &str, failure: &str) -> Result<T> {
    match &result {
        Ok(_) => notifier.notify(Notification::success(success, "Changes are live on the site")),
        Err(e) => {
            tracing::warn!("{}: {}", failure, e);
            notifier.notify(Notification::error(failure, e.user_friendly_message()));
        }
    }
    result
}

/// Editor for a one-row section (home hero, who-we-are, contact details).
pub struct SingletonEditor<T> {
    backend: Arc<dyn ContentBackend>,
    notifier: Arc<dyn Notifier>,
    current: T,
}

impl<T: TableRow + Default> SingletonEditor<T> {
    /// Loads the stored row, filling blank fields from the defaults.
    pub async fn load(backend: Arc<dyn ContentBackend>, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let rows = backend
            .select(T::TABLE.as_str(), &Query::new().limit(1))
            .await;
        let rows = report_load(notifier.as_ref(), T::TABLE.as_str(), rows)?;
        let current = merge_with_defaults(rows.into_iter().next())?;

        Ok(Self {
            backend,
            notifier,
            current,
        })
    }

    pub fn value(&self) -> &T {
        &self.current
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.current
    }

    /// Upserts the edited section and keeps the stored representation.
    pub async fn save(&mut self) -> Result<()> {
        let result = async {
            let row = serde_json::to_value(&self.current)?;
            let stored = self.backend.upsert(T::TABLE.as_str(), row).await?;
            Ok::<T, CmsError>(serde_json::from_value(stored)?)
        }
        .await;

        let stored = report(
            self.notifier.as_ref(),
            result,
            "Saved",
            &format!("Failed to save {}", T::TABLE),
        )?;
        self.current = stored;
        Ok(())
    }
}

fn report_load(notifier: &dyn Notifier, table: &str, rows: Result<Vec<Value>>) -> Result<Vec<Value>> {
    if let Err(e) = &rows {
        tracing::warn!("Failed to load {}: {}", table, e);
        notifier.notify(Notification::error(
            format!("Could not load {}", table),
            e.user_friendly_message(),
        ));
    }
    rows
}

/// Insert payload for an ordered collection.
pub trait NewRow: Serialize + Send + Sync {
    type Row: TableRow + Ordered;
    fn set_display_order(&mut self, order: i64);
}

impl NewRow for NewProject {
    type Row = Project;

    fn set_display_order(&mut self, order: i64) {
        self.display_order = order;
    }
}

impl NewRow for NewService {
    type Row = Service;

    fn set_display_order(&mut self, order: i64) {
        self.display_order = order;
    }
}

/// Create/update/delete for an ordered collection (services, projects).
pub struct CollectionEditor<T> {
    backend: Arc<dyn ContentBackend>,
    notifier: Arc<dyn Notifier>,
    _row: PhantomData<fn() -> T>,
}

impl<T: TableRow + Ordered> CollectionEditor<T> {
    pub fn new(backend: Arc<dyn ContentBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            _row: PhantomData,
        }
    }

    async fn next_display_order(&self) -> Result<i64> {
        let last = self
            .backend
            .select(
                T::TABLE.as_str(),
                &Query::new().order_by(DISPLAY_ORDER, false).limit(1),
            )
            .await?;

        Ok(last
            .first()
            .and_then(|row| row.get(DISPLAY_ORDER))
            .and_then(Value::as_i64)
            .map_or(0, |order| order + 1))
    }

    /// Inserts a new row at the end of the display order.
    pub async fn create<N: NewRow<Row = T>>(&self, mut new_row: N) -> Result<T> {
        let result = async {
            new_row.set_display_order(self.next_display_order().await?);
            let row = serde_json::to_value(&new_row)?;
            let stored = self.backend.insert(T::TABLE.as_str(), row).await?;
            Ok::<T, CmsError>(serde_json::from_value(stored)?)
        }
        .await;

        report(
            self.notifier.as_ref(),
            result,
            "Created",
            &format!("Failed to create {} row", T::TABLE),
        )
    }

    /// Writes every editable column of `row` back by id.
    pub async fn save(&self, row: &T) -> Result<()> {
        let result = async {
            let mut patch = serde_json::to_value(row)?;
            if let Value::Object(columns) = &mut patch {
                columns.remove("id");
                columns.remove("created_at");
            }
            self.backend.update(T::TABLE.as_str(), row.id(), patch).await
        }
        .await;

        report(
            self.notifier.as_ref(),
            result,
            "Saved",
            &format!("Failed to save {}", row.id()),
        )
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = self.backend.delete(T::TABLE.as_str(), id).await;
        report(
            self.notifier.as_ref(),
            result,
            "Deleted",
            &format!("Failed to delete {}", id),
        )
    }
}

/// Keeps ASCII letters, digits, dots and dashes; everything else becomes a dash.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    let cleaned = cleaned.trim_matches('-');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Project editing plus the project image bucket.
pub struct ProjectEditor {
    rows: CollectionEditor<Project>,
    blobs: Arc<dyn BlobStore>,
    bucket: String,
}

impl ProjectEditor {
    pub fn new(
        backend: Arc<dyn ContentBackend>,
        blobs: Arc<dyn BlobStore>,
        notifier: Arc<dyn Notifier>,
        bucket: &str,
    ) -> Self {
        Self {
            rows: CollectionEditor::new(backend, notifier),
            blobs,
            bucket: bucket.to_string(),
        }
    }

    pub fn rows(&self) -> &CollectionEditor<Project> {
        &self.rows
    }

    /// Uploads an image and returns the public URL to store in `image_url`.
    pub async fn upload_image(
        &self,
        data: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<String> {
        if !content_type.starts_with("image/") {
            return Err(CmsError::validation(format!(
                "project images must be images, got {}",
                content_type
            )));
        }

        let path = format!(
            "projects/{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(file_name)
        );
        let stored = self
            .blobs
            .upload(&self.bucket, &path, data, content_type)
            .await?;
        Ok(self.blobs.public_url(&self.bucket, &stored))
    }

    fn stored_path(&self, image_url: &str) -> Option<String> {
        let prefix = self.blobs.public_url(&self.bucket, "");
        image_url
            .strip_prefix(&prefix)
            .filter(|path| !path.is_empty())
            .map(str::to_string)
    }

    /// Deletes the row, then its image. A failed image removal only logs.
    pub async fn delete(&self, project: &Project) -> Result<()> {
        self.rows.delete(&project.id).await?;

        if let Some(path) = project.image_url.as_deref().and_then(|u| self.stored_path(u)) {
            if let Err(e) = self.blobs.remove(&self.bucket, &[path.clone()]).await {
                tracing::warn!("Project {} deleted but image {} was not: {}", project.id, path, e);
            }
        }
        Ok(())
    }
}
