use crate::core::drag::DragOutcome;
use crate::core::ordering::OrderedList;
use crate::domain::model::{
    Notification, Ordered, PositionWrite, Project, Service, TableRow, DISPLAY_ORDER,
};
use crate::domain::ports::{ContentBackend, Notifier, OrderWriter, Query};
use crate::utils::error::{CmsError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Same position, cancelled gesture or an order identical to the current one.
    Unchanged,
    /// Every position write was acknowledged.
    Persisted { writes: usize },
    /// A write failed; the list was reloaded from the backend if `reloaded`.
    Reverted {
        committed: usize,
        failed_id: String,
        reloaded: bool,
    },
}

/// Admin list of ordered rows with optimistic drag-and-drop reordering.
///
/// A reorder updates the in-memory order first, then hands the new positions
/// to the [`OrderWriter`]. A failed write is never retried: the user is
/// notified and the list is reloaded from the backend, which may show an
/// order that is neither the old nor the requested one.
pub struct ReorderableList<T> {
    backend: Arc<dyn ContentBackend>,
    writer: Arc<dyn OrderWriter>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<OrderedList<T>>,
}

pub type ProjectList = ReorderableList<Project>;
pub type ServiceList = ReorderableList<Service>;

impl<T: TableRow + Ordered> ReorderableList<T> {
    pub fn new(
        backend: Arc<dyn ContentBackend>,
        writer: Arc<dyn OrderWriter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            writer,
            notifier,
            state: RwLock::new(OrderedList::default()),
        }
    }

    async fn fetch(&self) -> Result<OrderedList<T>> {
        let rows = self
            .backend
            .select(
                T::TABLE.as_str(),
                &Query::new().order_by(DISPLAY_ORDER, true),
            )
            .await?;

        let items = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<serde_json::Result<Vec<T>>>()?;
        Ok(OrderedList::from_rows(items))
    }

    /// Replaces the local list with the backend's current order.
    pub async fn load(&self) -> Result<usize> {
        match self.fetch().await {
            Ok(list) => {
                let len = list.len();
                *self.state.write().await = list;
                tracing::debug!("Loaded {} rows from {}", len, T::TABLE);
                Ok(len)
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", T::TABLE, e);
                self.notifier.notify(Notification::error(
                    format!("Could not load {}", T::TABLE),
                    e.user_friendly_message(),
                ));
                Err(e)
            }
        }
    }

    pub async fn items(&self) -> Vec<T> {
        self.state.read().await.items().to_vec()
    }

    pub async fn ids(&self) -> Vec<String> {
        self.state.read().await.ids()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.is_empty()
    }

    /// Moves the row at `from` to `to` and persists the new order.
    ///
    /// Only invalid indices are returned as `Err`; backend failures are
    /// reported through the notifier and the [`ReorderOutcome`].
    pub async fn reorder(&self, from: usize, to: usize) -> Result<ReorderOutcome> {
        let writes = {
            let mut state = self.state.write().await;
            if !state.move_item(from, to)? {
                return Ok(ReorderOutcome::Unchanged);
            }
            state.position_writes()
        };

        tracing::info!("Reordering {}: moved row {} to {}", T::TABLE, from, to);
        Ok(self.persist(writes).await)
    }

    /// Same as [`reorder`](Self::reorder) for callers that report the full new id order.
    pub async fn reorder_to_ids(&self, ids: &[String]) -> Result<ReorderOutcome> {
        let writes = {
            let mut state = self.state.write().await;
            if !state.apply_id_order(ids)? {
                return Ok(ReorderOutcome::Unchanged);
            }
            state.position_writes()
        };

        tracing::info!("Reordering {} to {} ids", T::TABLE, ids.len());
        Ok(self.persist(writes).await)
    }

    /// Moves the row with `id` to position `to`.
    pub async fn move_id(&self, id: &str, to: usize) -> Result<ReorderOutcome> {
        let from = {
            let state = self.state.read().await;
            state.position_of(id).ok_or_else(|| CmsError::NotFound {
                table: T::TABLE.to_string(),
                id: id.to_string(),
            })?
        };
        self.reorder(from, to).await
    }

    /// Commits a finished drag gesture. Anything but a drop leaves the list alone.
    pub async fn apply_drop(&self, outcome: DragOutcome) -> Result<ReorderOutcome> {
        match outcome {
            DragOutcome::Dropped { from, to } => self.reorder(from, to).await,
            _ => Ok(ReorderOutcome::Unchanged),
        }
    }

    async fn persist(&self, writes: Vec<PositionWrite>) -> ReorderOutcome {
        match self.writer.write_positions(T::TABLE.as_str(), &writes).await {
            Ok(written) => {
                self.notifier.notify(Notification::success(
                    "Order updated",
                    format!("Saved the new order of {} {}", written, T::TABLE),
                ));
                ReorderOutcome::Persisted { writes: written }
            }
            Err(err) => {
                tracing::warn!(
                    "Reorder of {} stopped after {} of {} writes: {}",
                    T::TABLE,
                    err.committed,
                    writes.len(),
                    err
                );
                self.notifier.notify(Notification::error(
                    "Failed to update order",
                    err.source.user_friendly_message(),
                ));

                let reloaded = self.load().await.is_ok();
                ReorderOutcome::Reverted {
                    committed: err.committed,
                    failed_id: err.failed_id,
                    reloaded,
                }
            }
        }
    }

    /// Runs the reorder on its own task; it keeps going if the caller goes away.
    pub fn reorder_detached(
        self: &Arc<Self>,
        from: usize,
        to: usize,
    ) -> JoinHandle<Result<ReorderOutcome>> {
        let list = Arc::clone(self);
        tokio::spawn(async move { list.reorder(from, to).await })
    }
}
