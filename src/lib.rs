pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use app::SiteContext;
pub use config::SiteConfig;
pub use core::{
    auth_gate::{Access, AuthGate},
    content::ContentService,
    drag::{DragOutcome, DragSensor},
    reorder::{ProjectList, ReorderOutcome, ServiceList},
};
pub use utils::error::{CmsError, Result};
