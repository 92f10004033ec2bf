use crate::domain::ports::{ContentBackend, Query};
use crate::utils::error::{CmsError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Table store kept in process memory. Used for offline previews and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    tables: Arc<RwLock<HashMap<String, Vec<Value>>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut tables = self.tables.write().await;
        tables.insert(table.to_string(), rows);
    }

    pub async fn rows(&self, table: &str) -> Vec<Value> {
        let tables = self.tables.read().await;
        tables.get(table).cloned().unwrap_or_default()
    }

    fn assign_id(&self, row: &mut Map<String, Value>) {
        if !matches!(row.get("id"), Some(Value::String(_)) | Some(Value::Number(_))) {
            let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst) + 1;
            row.insert("id".to_string(), Value::String(format!("row-{}", id)));
        }
    }
}

fn id_matches(row: &Value, id: &str) -> bool {
    match row.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

fn column_text(row: &Value, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Sort rank per JSON type. Nulls rank last ascending, matching the hosted store's default.
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        Some(Value::Bool(_)) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Array(_)) => 3,
        Some(Value::Object(_)) => 4,
        None | Some(Value::Null) => 5,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn into_object(table: &str, row: Value) -> Result<Map<String, Value>> {
    match row {
        Value::Object(map) => Ok(map),
        other => Err(CmsError::validation(format!(
            "rows for {} must be JSON objects, got {}",
            table, other
        ))),
    }
}

#[async_trait]
impl ContentBackend for InMemoryBackend {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Value> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        query.filters.iter().all(|(column, expected)| {
                            column_text(row, column).as_deref() == Some(expected.as_str())
                        })
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some((column, ascending)) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(column), b.get(column));
                if *ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value> {
        let mut row = into_object(table, row)?;
        self.assign_id(&mut row);
        let row = Value::Object(row);

        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<()> {
        let patch = into_object(table, patch)?;
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| id_matches(row, id)))
            .ok_or_else(|| CmsError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            })?;

        if let Value::Object(existing) = row {
            for (key, value) in patch {
                existing.insert(key, value);
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| !id_matches(row, id));
        }
        Ok(())
    }

    async fn upsert(&self, table: &str, row: Value) -> Result<Value> {
        let mut row = into_object(table, row)?;
        let id = row.get("id").and_then(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();

        if let Some(id) = id {
            if let Some(Value::Object(existing)) = rows.iter_mut().find(|r| id_matches(r, &id)) {
                for (key, value) in row {
                    existing.insert(key, value);
                }
                return Ok(Value::Object(existing.clone()));
            }
        }

        self.assign_id(&mut row);
        let row = Value::Object(row);
        rows.push(row.clone());
        Ok(row)
    }
}
