pub mod auth_gate;
pub mod content;
pub mod drag;
pub mod editors;
pub mod notify;
pub mod ordering;
pub mod persistence;
pub mod reorder;

pub use crate::domain::model::{Ordered, Project, Service, TableRow};
pub use crate::domain::ports::{ContentBackend, Notifier, OrderWriter};
pub use crate::utils::error::Result;
