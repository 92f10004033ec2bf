pub mod context;

pub use context::SiteContext;
