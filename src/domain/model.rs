use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DISPLAY_ORDER: &str = "display_order";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    HomeContent,
    Services,
    Projects,
    AboutContent,
    ContactInfo,
    ContactSubmissions,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::HomeContent => "home_content",
            Table::Services => "services",
            Table::Projects => "projects",
            Table::AboutContent => "about_content",
            Table::ContactInfo => "contact_info",
            Table::ContactSubmissions => "contact_submissions",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row type stored in one backend table.
pub trait TableRow: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: Table;
}

/// Records that carry a position among their siblings.
pub trait Ordered {
    fn id(&self) -> &str;
    fn display_order(&self) -> i64;
    fn set_display_order(&mut self, order: i64);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Project {
    const TABLE: Table = Table::Projects;
}

impl Ordered for Project {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_order(&self) -> i64 {
        self.display_order
    }

    fn set_display_order(&mut self, order: i64) {
        self.display_order = order;
    }
}

/// Insert payload for a project; the backend assigns `id` and `created_at`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub category: String,
    pub year: Option<i32>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub featured: bool,
    pub display_order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub display_order: i64,
}

impl TableRow for Service {
    const TABLE: Table = Table::Services;
}

impl Ordered for Service {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_order(&self) -> i64 {
        self.display_order
    }

    fn set_display_order(&mut self, order: i64) {
        self.display_order = order;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewService {
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub display_order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub cta_label: String,
    pub intro: String,
}

impl Default for HomeContent {
    fn default() -> Self {
        Self {
            id: None,
            hero_title: "Building with Integrity Since Day One".to_string(),
            hero_subtitle: "Commercial and residential construction, delivered on time and on budget."
                .to_string(),
            cta_label: "Request a Quote".to_string(),
            intro: "We are a full-service general contractor handling everything from site preparation to final walkthrough."
                .to_string(),
        }
    }
}

impl TableRow for HomeContent {
    const TABLE: Table = Table::HomeContent;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub headline: String,
    pub story: String,
    pub mission: String,
    pub values: Vec<String>,
    pub years_experience: u32,
}

impl Default for AboutContent {
    fn default() -> Self {
        Self {
            id: None,
            headline: "Who We Are".to_string(),
            story: "Founded by tradespeople, our firm has grown into a team of builders, project managers and craftsmen."
                .to_string(),
            mission: "Deliver durable, safe and well-crafted buildings for the communities we serve."
                .to_string(),
            values: vec![
                "Safety".to_string(),
                "Quality".to_string(),
                "Accountability".to_string(),
            ],
            years_experience: 25,
        }
    }
}

impl TableRow for AboutContent {
    const TABLE: Table = Table::AboutContent;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub hours: String,
}

impl Default for ContactInfo {
    fn default() -> Self {
        Self {
            id: None,
            phone: "(555) 010-2040".to_string(),
            email: "info@example-builders.com".to_string(),
            address: "100 Main Street, Suite 200".to_string(),
            hours: "Mon-Fri 7:00am - 5:00pm".to_string(),
        }
    }
}

impl TableRow for ContactInfo {
    const TABLE: Table = Table::ContactInfo;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
}

/// One `display_order` write produced by a reorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionWrite {
    pub id: String,
    pub display_order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
    PasswordRecoverySent { email: String },
    PasswordUpdated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// User-facing message, the headless counterpart of a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}
