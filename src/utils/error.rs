use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmsError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Backend returned {status} for {operation}: {message}")]
    BackendError {
        operation: String,
        status: u16,
        message: String,
    },

    #[error("Authentication failed: {message}")]
    AuthError { message: String },

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Index {index} is out of range for a list of {len} items")]
    InvalidIndex { index: usize, len: usize },

    #[error("Identifier list is not a permutation of the current items: {message}")]
    NotAPermutation { message: String },

    #[error("No row with id '{id}' in {table}")]
    NotFound { table: String, id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Worth retrying, possibly after a reload.
    Medium,
    /// The request itself was wrong.
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status for a CLI command that failed with this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl CmsError {
    pub fn config(message: impl Into<String>) -> Self {
        CmsError::ConfigError {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CmsError::ValidationError {
            message: message.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CmsError::HttpError(_) | CmsError::BackendError { .. } | CmsError::NotFound { .. } => {
                ErrorSeverity::Medium
            }
            CmsError::InvalidIndex { .. }
            | CmsError::NotAPermutation { .. }
            | CmsError::ValidationError { .. }
            | CmsError::AuthError { .. }
            | CmsError::Unauthenticated
            | CmsError::SerializationError(_) => ErrorSeverity::High,
            CmsError::ConfigError { .. }
            | CmsError::MissingConfigError { .. }
            | CmsError::InvalidConfigValueError { .. }
            | CmsError::UrlError(_)
            | CmsError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CmsError::HttpError(_) => "Could not reach the content backend".to_string(),
            CmsError::BackendError { operation, .. } => {
                format!("The content backend rejected the {} request", operation)
            }
            CmsError::AuthError { .. } | CmsError::Unauthenticated => {
                "You need to sign in to the admin area first".to_string()
            }
            CmsError::ConfigError { .. }
            | CmsError::MissingConfigError { .. }
            | CmsError::InvalidConfigValueError { .. }
            | CmsError::UrlError(_) => format!("Site configuration is invalid: {}", self),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CmsError::HttpError(_) => "Check the network connection and backend.url",
            CmsError::BackendError { status, .. } if *status == 401 || *status == 403 => {
                "Sign in again; the session may have expired or lacks permission"
            }
            CmsError::BackendError { .. } => "Retry the operation or check the backend logs",
            CmsError::AuthError { .. } | CmsError::Unauthenticated => {
                "Set CMS_ADMIN_EMAIL and CMS_ADMIN_PASSWORD or sign in again"
            }
            CmsError::ConfigError { .. }
            | CmsError::MissingConfigError { .. }
            | CmsError::InvalidConfigValueError { .. }
            | CmsError::UrlError(_) => "Fix the value in the site TOML file or its environment variables",
            CmsError::IoError(_) => "Make sure the file exists and is readable",
            CmsError::InvalidIndex { .. } | CmsError::NotAPermutation { .. } => {
                "Reload the list and try the move again"
            }
            CmsError::NotFound { .. } => "Reload the list; the row may have been deleted",
            CmsError::ValidationError { .. } | CmsError::SerializationError(_) => {
                "Correct the submitted fields and try again"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CmsError>;
