use crate::domain::model::{Notification, PositionWrite, Session};
use crate::utils::error::{CmsError, Result};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Read query against one table: equality filters, one sort key, optional limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(String, String)>,
    pub order: Option<(String, bool)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some((column.to_string(), ascending));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Table operations of the hosted relational store.
#[async_trait]
pub trait ContentBackend: Send + Sync {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>>;
    async fn insert(&self, table: &str, row: Value) -> Result<Value>;
    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<()>;
    async fn delete(&self, table: &str, id: &str) -> Result<()>;
    async fn upsert(&self, table: &str, row: Value) -> Result<Value>;
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `data` at `path` inside `bucket` and returns the stored path.
    async fn upload(&self, bucket: &str, path: &str, data: Vec<u8>, content_type: &str)
        -> Result<String>;
    fn public_url(&self, bucket: &str, path: &str) -> String;
    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<()>;
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;
    async fn sign_out(&self, session: &Session) -> Result<()>;
    async fn send_password_reset(&self, email: &str, redirect_to: Option<&str>) -> Result<()>;
    async fn update_password(&self, session: &Session, new_password: &str) -> Result<()>;

    /// Drops any credentials held for a session that ended without a sign-out call.
    fn clear_local_session(&self) {}
}

/// Failure of a position write run: how far it got and why it stopped.
#[derive(Debug, Error)]
#[error("position write for '{failed_id}' failed after {committed} committed writes: {source}")]
pub struct PartialWriteError {
    /// Writes that the backend acknowledged before the failure.
    pub committed: usize,
    pub failed_id: String,
    #[source]
    pub source: CmsError,
}

/// Strategy for persisting a new ordering of a table's rows.
#[async_trait]
pub trait OrderWriter: Send + Sync {
    async fn write_positions(
        &self,
        table: &str,
        writes: &[PositionWrite],
    ) -> std::result::Result<usize, PartialWriteError>;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_partial_write_error_reports_progress_and_cause() {
        let err = PartialWriteError {
            committed: 1,
            failed_id: "p3".to_string(),
            source: CmsError::NotFound {
                table: "projects".to_string(),
                id: "p3".to_string(),
            },
        };

        let message = err.to_string();
        assert!(message.starts_with("position write for 'p3' failed after 1 committed writes"));
        assert!(err.source().is_some());
    }
}
