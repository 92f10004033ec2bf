use crate::core::auth_gate::DEFAULT_LOGIN_ROUTE;
use crate::core::drag::DEFAULT_ACTIVATION_DISTANCE;
use crate::utils::error::{CmsError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_route, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_BUCKET: &str = "project-images";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site: SiteInfo,
    pub backend: BackendConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfo {
    pub name: String,
    pub public_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Rest,
    /// Process-local tables, optionally seeded from a JSON file. No auth or storage.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
    pub timeout_seconds: Option<u64>,
    /// JSON object of `table -> [rows]` loaded into the memory backend.
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub login_route: String,
    pub password_reset_redirect: Option<String>,
    pub drag_activation_distance: f64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            password_reset_redirect: None,
            drag_activation_distance: DEFAULT_ACTIVATION_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub json: bool,
}

impl SiteConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CmsError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| CmsError::config(format!("TOML parsing error: {}", e)))
    }

    /// Replaces `${VAR}` with the environment value. Unset variables stay
    /// verbatim so validation reports which field still needs one.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| CmsError::config(format!("bad substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!("Environment variable {} is not set", var_name);
                format!("${{{}}}", var_name)
            })
        });

        Ok(result.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.backend
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("site.name", &self.site.name)?;
        if let Some(public_url) = &self.site.public_url {
            validate_url("site.public_url", public_url)?;
        }

        if self.backend.kind == BackendKind::Rest {
            validate_url("backend.url", &self.backend.url)?;
            validate_non_empty_string("backend.anon_key", &self.backend.anon_key)?;
            if self.backend.anon_key.contains("${") {
                return Err(CmsError::InvalidConfigValueError {
                    field: "backend.anon_key".to_string(),
                    value: self.backend.anon_key.clone(),
                    reason: "environment variable was not resolved".to_string(),
                });
            }
        }
        if let Some(timeout) = self.backend.timeout_seconds {
            validate_range("backend.timeout_seconds", timeout, 1, 300)?;
        }

        validate_non_empty_string("storage.bucket", &self.storage.bucket)?;
        validate_route("admin.login_route", &self.admin.login_route)?;
        if let Some(redirect) = &self.admin.password_reset_redirect {
            validate_url("admin.password_reset_redirect", redirect)?;
        }
        validate_range(
            "admin.drag_activation_distance",
            self.admin.drag_activation_distance,
            0.0,
            100.0,
        )?;

        Ok(())
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[site]
name = "Summit Builders"

[backend]
url = "https://abc.supabase.co"
anon_key = "anon"
"#;

    #[test]
    fn test_parse_basic_config_with_defaults() {
        let config = SiteConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.site.name, "Summit Builders");
        assert_eq!(config.backend.kind, BackendKind::Rest);
        assert_eq!(config.storage.bucket, DEFAULT_BUCKET);
        assert_eq!(config.admin.login_route, "/admin/login");
        assert_eq!(config.admin.drag_activation_distance, 8.0);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_CMS_BACKEND_URL", "https://env.supabase.co");

        let toml_content = r#"
[site]
name = "Summit Builders"

[backend]
url = "${TEST_CMS_BACKEND_URL}"
anon_key = "${TEST_CMS_UNSET_KEY}"
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.backend.url, "https://env.supabase.co");
        assert_eq!(config.backend.anon_key, "${TEST_CMS_UNSET_KEY}");
        assert!(config.validate().is_err());

        std::env::remove_var("TEST_CMS_BACKEND_URL");
    }

    #[test]
    fn test_memory_backend_needs_no_url() {
        let toml_content = r#"
[site]
name = "Preview"

[backend]
kind = "memory"
"#;
        let config = SiteConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.backend.kind, BackendKind::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[site]
name = "Summit Builders"

[backend]
url = "not-a-url"
anon_key = "anon"

[admin]
login_route = "admin/login"
drag_activation_distance = 8.0
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_activation_distance_is_rejected() {
        let toml_content = format!("{}\n[admin]\ndrag_activation_distance = nan\n", BASIC);
        let config = SiteConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.admin.drag_activation_distance.is_nan());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = SiteConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.backend.url, "https://abc.supabase.co");
    }
}
