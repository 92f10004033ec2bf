use crate::domain::model::{PositionWrite, DISPLAY_ORDER};
use crate::domain::ports::{ContentBackend, OrderWriter, PartialWriteError};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Writes positions one row at a time, awaiting each acknowledgement before the next.
///
/// There is no transaction around the run: when write `k` fails, writes `0..k`
/// stay applied and `k+1..` are never sent.
#[derive(Clone)]
pub struct SequentialOrderWriter {
    backend: Arc<dyn ContentBackend>,
}

impl SequentialOrderWriter {
    pub fn new(backend: Arc<dyn ContentBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl OrderWriter for SequentialOrderWriter {
    async fn write_positions(
        &self,
        table: &str,
        writes: &[PositionWrite],
    ) -> std::result::Result<usize, PartialWriteError> {
        for (committed, write) in writes.iter().enumerate() {
            tracing::debug!(
                "Writing {}={} for {} in {}",
                DISPLAY_ORDER,
                write.display_order,
                write.id,
                table
            );

            let patch = json!({ DISPLAY_ORDER: write.display_order });
            if let Err(source) = self.backend.update(table, &write.id, patch).await {
                return Err(PartialWriteError {
                    committed,
                    failed_id: write.id.clone(),
                    source,
                });
            }
        }

        Ok(writes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::Query;
    use crate::utils::error::{CmsError, Result};
    use serde_json::Value;
    use std::sync::Mutex;

    /// Records every update and fails the update whose zero-based call number is `fail_at`.
    struct RecordingBackend {
        calls: Mutex<Vec<(String, Value)>>,
        fail_at: Option<usize>,
    }

    #[async_trait]
    impl ContentBackend for RecordingBackend {
        async fn select(&self, _table: &str, _query: &Query) -> Result<Vec<Value>> {
            Ok(vec![])
        }

        async fn insert(&self, _table: &str, row: Value) -> Result<Value> {
            Ok(row)
        }

        async fn update(&self, _table: &str, id: &str, patch: Value) -> Result<()> {
            let mut calls = self.calls.lock().unwrap();
            let call = calls.len();
            calls.push((id.to_string(), patch));
            if Some(call) == self.fail_at {
                return Err(CmsError::BackendError {
                    operation: "update".to_string(),
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(())
        }

        async fn delete(&self, _table: &str, _id: &str) -> Result<()> {
            Ok(())
        }

        async fn upsert(&self, _table: &str, row: Value) -> Result<Value> {
            Ok(row)
        }
    }

    fn writes(ids: &[&str]) -> Vec<PositionWrite> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| PositionWrite {
                id: id.to_string(),
                display_order: i as i64,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_writes_every_position_in_order() {
        let backend = Arc::new(RecordingBackend {
            calls: Mutex::new(vec![]),
            fail_at: None,
        });
        let writer = SequentialOrderWriter::new(backend.clone());

        let written = writer
            .write_positions("projects", &writes(&["p3", "p1", "p2"]))
            .await
            .unwrap();

        assert_eq!(written, 3);
        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls[0], ("p3".to_string(), json!({"display_order": 0})));
        assert_eq!(calls[1], ("p1".to_string(), json!({"display_order": 1})));
        assert_eq!(calls[2], ("p2".to_string(), json!({"display_order": 2})));
    }

    #[tokio::test]
    async fn test_stops_at_first_failed_write() {
        let backend = Arc::new(RecordingBackend {
            calls: Mutex::new(vec![]),
            fail_at: Some(1),
        });
        let writer = SequentialOrderWriter::new(backend.clone());

        let err = writer
            .write_positions("projects", &writes(&["p3", "p1", "p2"]))
            .await
            .unwrap_err();

        assert_eq!(err.committed, 1);
        assert_eq!(err.failed_id, "p1");
        assert_eq!(backend.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_run_writes_nothing() {
        let backend = Arc::new(RecordingBackend {
            calls: Mutex::new(vec![]),
            fail_at: Some(0),
        });
        let writer = SequentialOrderWriter::new(backend.clone());

        assert_eq!(writer.write_positions("projects", &[]).await.unwrap(), 0);
        assert!(backend.calls.lock().unwrap().is_empty());
    }
}
