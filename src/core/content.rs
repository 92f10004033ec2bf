use crate::domain::model::{
    AboutContent, ContactInfo, ContactSubmission, HomeContent, Project, Service, Table, TableRow,
    DISPLAY_ORDER,
};
use crate::domain::ports::{ContentBackend, Query};
use crate::utils::error::{CmsError, Result};
use crate::utils::validation::{validate_email, Validate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

pub const FEATURED_PROJECT_LIMIT: usize = 3;

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Overlays the non-blank columns of `row` on top of `T::default()`.
///
/// Null, whitespace-only and empty-list columns keep the default, so a
/// half-filled row still renders a complete section.
pub fn merge_with_defaults<T>(row: Option<Value>) -> Result<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    let mut merged = serde_json::to_value(T::default())?;

    if let (Value::Object(target), Some(Value::Object(source))) = (&mut merged, row) {
        for (key, value) in source {
            if !is_blank(&value) {
                target.insert(key, value);
            }
        }
    }

    Ok(serde_json::from_value(merged)?)
}

pub fn default_services() -> Vec<Service> {
    [
        ("general-contracting", "General Contracting", "Full project delivery from groundbreaking to closeout.", "hard-hat"),
        ("renovation", "Renovation & Remodeling", "Upgrades and additions for occupied commercial and residential buildings.", "hammer"),
        ("design-build", "Design-Build", "One contract covering design and construction for faster schedules.", "ruler"),
        ("project-management", "Project Management", "Scheduling, budgeting and subcontractor coordination for owners.", "clipboard"),
    ]
    .iter()
    .enumerate()
    .map(|(index, (id, title, description, icon))| Service {
        id: format!("default-{}", id),
        title: title.to_string(),
        description: description.to_string(),
        icon: Some(icon.to_string()),
        display_order: index as i64,
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomePage {
    pub hero: HomeContent,
    pub featured_projects: Vec<Project>,
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServicesPage {
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectsPage {
    pub projects: Vec<Project>,
    pub categories: Vec<String>,
    pub selected_category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhoWeArePage {
    pub about: AboutContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactPage {
    pub contact: ContactInfo,
}

impl Validate for ContactSubmission {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CmsError::validation("name is required"));
        }
        validate_email("email", &self.email)?;
        if self.message.trim().is_empty() {
            return Err(CmsError::validation("message is required"));
        }
        Ok(())
    }
}

/// Read side of the public pages.
///
/// Public pages never fail: a read error is logged and the page falls back
/// to its built-in content.
#[derive(Clone)]
pub struct ContentService {
    backend: Arc<dyn ContentBackend>,
}

impl ContentService {
    pub fn new(backend: Arc<dyn ContentBackend>) -> Self {
        Self { backend }
    }

    async fn singleton<T>(&self) -> T
    where
        T: TableRow + Default,
    {
        let row = match self
            .backend
            .select(T::TABLE.as_str(), &Query::new().limit(1))
            .await
        {
            Ok(rows) => rows.into_iter().next(),
            Err(e) => {
                tracing::warn!("Using default {} content: {}", T::TABLE, e);
                None
            }
        };

        merge_with_defaults(row).unwrap_or_else(|e| {
            tracing::warn!("Malformed {} row, using defaults: {}", T::TABLE, e);
            T::default()
        })
    }

    async fn collection<T: TableRow>(&self, query: Query) -> Vec<T> {
        let rows = match self.backend.select(T::TABLE.as_str(), &query).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("Could not read {}: {}", T::TABLE, e);
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|row| match serde_json::from_value::<T>(row) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("Skipping malformed {} row: {}", T::TABLE, e);
                    None
                }
            })
            .collect()
    }

    async fn services(&self) -> Vec<Service> {
        let services: Vec<Service> = self
            .collection(Query::new().order_by(DISPLAY_ORDER, true))
            .await;
        if services.is_empty() {
            default_services()
        } else {
            services
        }
    }

    pub async fn home_page(&self) -> HomePage {
        let featured_query = Query::new()
            .eq("featured", true)
            .order_by(DISPLAY_ORDER, true)
            .limit(FEATURED_PROJECT_LIMIT);

        let (hero, featured_projects, services) = tokio::join!(
            self.singleton::<HomeContent>(),
            self.collection::<Project>(featured_query),
            self.services(),
        );

        HomePage {
            hero,
            featured_projects,
            services,
        }
    }

    pub async fn services_page(&self) -> ServicesPage {
        ServicesPage {
            services: self.services().await,
        }
    }

    /// All projects in display order, optionally narrowed to one category.
    /// The category list always covers every project.
    pub async fn projects_page(&self, category: Option<&str>) -> ProjectsPage {
        let projects: Vec<Project> = self
            .collection(Query::new().order_by(DISPLAY_ORDER, true))
            .await;

        let categories: Vec<String> = projects
            .iter()
            .map(|p| p.category.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let projects = match category {
            Some(selected) => projects
                .into_iter()
                .filter(|p| p.category.eq_ignore_ascii_case(selected))
                .collect(),
            None => projects,
        };

        ProjectsPage {
            projects,
            categories,
            selected_category: category.map(str::to_string),
        }
    }

    pub async fn who_we_are_page(&self) -> WhoWeArePage {
        WhoWeArePage {
            about: self.singleton().await,
        }
    }

    pub async fn contact_page(&self) -> ContactPage {
        ContactPage {
            contact: self.singleton().await,
        }
    }

    /// Stores a contact-form inquiry. Unlike page reads, failures reach the caller.
    pub async fn submit_inquiry(&self, submission: &ContactSubmission) -> Result<()> {
        submission.validate()?;
        let row = serde_json::to_value(submission)?;
        self.backend
            .insert(Table::ContactSubmissions.as_str(), row)
            .await?;
        tracing::info!("Stored contact inquiry from {}", submission.email);
        Ok(())
    }
}
