//! Configuration module for the Catalog service.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, defaults, and a builder pattern for
//! programmatic use.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for the Catalog service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub provider: ProviderConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the API listens on, e.g. `127.0.0.1:8080`.
    pub bind: String,
    /// Page size applied when a list request does not specify one.
    pub default_page_size: u32,
    /// Upper bound a client-supplied page size is clamped to.
    pub max_page_size: u32,
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
}

/// Token issuance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for signing access tokens. Must be overridden in any
    /// real deployment.
    pub secret: String,
    /// Access token lifetime in minutes.
    pub token_ttl_minutes: u64,
}

/// External product provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider implementation to use: currently `dummyjson`.
    pub kind: String,
    /// Base URL of the provider's product listing endpoint.
    pub base_url: String,
    /// Records requested per page.
    pub page_size: u32,
    /// Per-request timeout for the HTTP client, in seconds.
    pub request_timeout_secs: u64,
}

/// Reconciliation job settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Seconds between scheduled reconciliation runs.
    pub interval_secs: u64,
    /// Deadline for fetching a single provider page. A page that takes
    /// longer fails the run, so a hung provider cannot hold the run gate.
    pub page_timeout_secs: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/catalog/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("catalog")
            .join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("catalog");
        Self {
            path: data_dir.join("catalog.db"),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            token_ttl_minutes: 30,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: "dummyjson".to_string(),
            base_url: "https://dummyjson.com/products".to_string(),
            page_size: 30,
            request_timeout_secs: 10,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: 1800,
            page_timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"sync.interval_secs"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid values for `provider.kind`.
const VALID_PROVIDER_KINDS: &[&str] = &["dummyjson"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- server ---
        if self.server.bind.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError {
                field: "server.bind".into(),
                message: format!("not a valid socket address: {}", self.server.bind),
            });
        }
        if self.server.default_page_size == 0 {
            errors.push(ValidationError {
                field: "server.default_page_size".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.server.max_page_size == 0 {
            errors.push(ValidationError {
                field: "server.max_page_size".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.server.default_page_size > self.server.max_page_size {
            errors.push(ValidationError {
                field: "server.default_page_size".into(),
                message: format!(
                    "default_page_size ({}) must not exceed max_page_size ({})",
                    self.server.default_page_size, self.server.max_page_size
                ),
            });
        }

        // --- auth ---
        if self.auth.secret.is_empty() {
            errors.push(ValidationError {
                field: "auth.secret".into(),
                message: "must not be empty".into(),
            });
        }
        if self.auth.token_ttl_minutes == 0 {
            errors.push(ValidationError {
                field: "auth.token_ttl_minutes".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- provider ---
        if !VALID_PROVIDER_KINDS.contains(&self.provider.kind.as_str()) {
            errors.push(ValidationError {
                field: "provider.kind".into(),
                message: format!(
                    "unknown provider '{}'; valid options: {}",
                    self.provider.kind,
                    VALID_PROVIDER_KINDS.join(", ")
                ),
            });
        }
        if self.provider.base_url.is_empty() {
            errors.push(ValidationError {
                field: "provider.base_url".into(),
                message: "must not be empty".into(),
            });
        }
        if self.provider.page_size == 0 {
            errors.push(ValidationError {
                field: "provider.page_size".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.provider.request_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "provider.request_timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- sync ---
        if self.sync.interval_secs == 0 {
            errors.push(ValidationError {
                field: "sync.interval_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.sync.page_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "sync.page_timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use catalog_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .server_bind("0.0.0.0:9000")
///     .sync_interval_secs(600)
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- server ---

    pub fn server_bind(mut self, bind: impl Into<String>) -> Self {
        self.config.server.bind = bind.into();
        self
    }

    pub fn server_default_page_size(mut self, n: u32) -> Self {
        self.config.server.default_page_size = n;
        self
    }

    pub fn server_max_page_size(mut self, n: u32) -> Self {
        self.config.server.max_page_size = n;
        self
    }

    // --- database ---

    pub fn database_path(mut self, path: PathBuf) -> Self {
        self.config.database.path = path;
        self
    }

    // --- auth ---

    pub fn auth_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.auth.secret = secret.into();
        self
    }

    pub fn auth_token_ttl_minutes(mut self, minutes: u64) -> Self {
        self.config.auth.token_ttl_minutes = minutes;
        self
    }

    // --- provider ---

    pub fn provider_kind(mut self, kind: impl Into<String>) -> Self {
        self.config.provider.kind = kind.into();
        self
    }

    pub fn provider_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.provider.base_url = base_url.into();
        self
    }

    pub fn provider_page_size(mut self, n: u32) -> Self {
        self.config.provider.page_size = n;
        self
    }

    pub fn provider_request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.provider.request_timeout_secs = secs;
        self
    }

    // --- sync ---

    pub fn sync_interval_secs(mut self, secs: u64) -> Self {
        self.config.sync.interval_secs = secs;
        self
    }

    pub fn sync_page_timeout_secs(mut self, secs: u64) -> Self {
        self.config.sync.page_timeout_secs = secs;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // -- Defaults --

    #[test]
    fn default_config_has_sensible_values() {
        let cfg = Config::default();
        assert_eq!(cfg.server.bind, "127.0.0.1:8080");
        assert_eq!(cfg.server.default_page_size, 20);
        assert_eq!(cfg.server.max_page_size, 100);
        assert!(cfg.database.path.to_string_lossy().contains("catalog"));
        assert_eq!(cfg.auth.token_ttl_minutes, 30);
        assert_eq!(cfg.provider.kind, "dummyjson");
        assert_eq!(cfg.provider.base_url, "https://dummyjson.com/products");
        assert_eq!(cfg.provider.page_size, 30);
        assert_eq!(cfg.provider.request_timeout_secs, 10);
        assert_eq!(cfg.sync.interval_secs, 1800);
        assert_eq!(cfg.sync.page_timeout_secs, 30);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn default_config_passes_validation() {
        let cfg = Config::default();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "unexpected validation errors: {errors:?}");
    }

    // -- Loading --

    #[test]
    fn load_from_yaml_file() {
        let yaml = r#"
server:
  bind: 0.0.0.0:9000
  default_page_size: 10
  max_page_size: 50
database:
  path: /tmp/test-catalog.db
auth:
  secret: test-secret
  token_ttl_minutes: 60
provider:
  kind: dummyjson
  base_url: http://localhost:9999/products
  page_size: 15
  request_timeout_secs: 5
sync:
  interval_secs: 600
  page_timeout_secs: 20
logging:
  level: debug
"#;
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.server.bind, "0.0.0.0:9000");
        assert_eq!(cfg.server.default_page_size, 10);
        assert_eq!(cfg.database.path, PathBuf::from("/tmp/test-catalog.db"));
        assert_eq!(cfg.auth.secret, "test-secret");
        assert_eq!(cfg.auth.token_ttl_minutes, 60);
        assert_eq!(cfg.provider.base_url, "http://localhost:9999/products");
        assert_eq!(cfg.provider.page_size, 15);
        assert_eq!(cfg.sync.interval_secs, 600);
        assert_eq!(cfg.sync.page_timeout_secs, 20);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn load_or_default_returns_default_on_missing_file() {
        let cfg = Config::load_or_default(Path::new("/nonexistent/config.yaml"));
        assert_eq!(cfg.sync.interval_secs, 1800);
    }

    #[test]
    fn load_returns_error_on_invalid_yaml() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"not: [valid: yaml: {{{").unwrap();
        tmp.flush().unwrap();

        let result = Config::load(tmp.path());
        assert!(result.is_err());
    }

    // -- Validation --

    #[test]
    fn validate_catches_bad_bind_address() {
        let mut cfg = Config::default();
        cfg.server.bind = "not-an-address".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "server.bind"));
    }

    #[test]
    fn validate_catches_page_size_inversion() {
        let mut cfg = Config::default();
        cfg.server.default_page_size = 200;
        cfg.server.max_page_size = 100;
        let errors = cfg.validate();
        assert!(errors
            .iter()
            .any(|e| e.field == "server.default_page_size"
                && e.message.contains("must not exceed")));
    }

    #[test]
    fn validate_catches_empty_secret() {
        let mut cfg = Config::default();
        cfg.auth.secret = String::new();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "auth.secret"));
    }

    #[test]
    fn validate_catches_unknown_provider() {
        let mut cfg = Config::default();
        cfg.provider.kind = "yolojson".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "provider.kind"));
    }

    #[test]
    fn validate_catches_zero_sync_values() {
        let mut cfg = Config::default();
        cfg.sync.interval_secs = 0;
        cfg.sync.page_timeout_secs = 0;
        let errors = cfg.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"sync.interval_secs"));
        assert!(fields.contains(&"sync.page_timeout_secs"));
    }

    #[test]
    fn validate_catches_invalid_log_level() {
        let mut cfg = Config::default();
        cfg.logging.level = "verbose".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "logging.level"));
    }

    #[test]
    fn validate_accepts_all_valid_log_levels() {
        for level in VALID_LOG_LEVELS {
            let mut cfg = Config::default();
            cfg.logging.level = level.to_string();
            let errors = cfg.validate();
            assert!(
                !errors.iter().any(|e| e.field == "logging.level"),
                "level '{level}' should be valid"
            );
        }
    }

    // -- Builder --

    #[test]
    fn builder_starts_from_defaults() {
        let cfg = ConfigBuilder::new().build();
        assert_eq!(cfg.sync.interval_secs, 1800);
        assert_eq!(cfg.provider.kind, "dummyjson");
    }

    #[test]
    fn builder_overrides_fields() {
        let cfg = ConfigBuilder::new()
            .server_bind("0.0.0.0:3000")
            .server_default_page_size(25)
            .server_max_page_size(200)
            .database_path(PathBuf::from("/custom/catalog.db"))
            .auth_secret("s3cret")
            .auth_token_ttl_minutes(15)
            .provider_kind("dummyjson")
            .provider_base_url("http://localhost:1234/products")
            .provider_page_size(50)
            .provider_request_timeout_secs(3)
            .sync_interval_secs(60)
            .sync_page_timeout_secs(10)
            .logging_level("trace")
            .build();

        assert_eq!(cfg.server.bind, "0.0.0.0:3000");
        assert_eq!(cfg.server.default_page_size, 25);
        assert_eq!(cfg.server.max_page_size, 200);
        assert_eq!(cfg.database.path, PathBuf::from("/custom/catalog.db"));
        assert_eq!(cfg.auth.secret, "s3cret");
        assert_eq!(cfg.auth.token_ttl_minutes, 15);
        assert_eq!(cfg.provider.base_url, "http://localhost:1234/products");
        assert_eq!(cfg.provider.page_size, 50);
        assert_eq!(cfg.provider.request_timeout_secs, 3);
        assert_eq!(cfg.sync.interval_secs, 60);
        assert_eq!(cfg.sync.page_timeout_secs, 10);
        assert_eq!(cfg.logging.level, "trace");
    }

    #[test]
    fn builder_build_validated_succeeds_for_valid_config() {
        let result = ConfigBuilder::new().auth_secret("ok").build_validated();
        assert!(result.is_ok());
    }

    #[test]
    fn builder_build_validated_fails_for_invalid_config() {
        let result = ConfigBuilder::new()
            .sync_interval_secs(0)
            .logging_level("nope")
            .build_validated();
        assert!(result.is_err());
        let errors = result.unwrap_err();
        assert!(errors.len() >= 2);
    }

    // -- default_path --

    #[test]
    fn default_path_ends_with_config_yaml() {
        let p = Config::default_path();
        assert!(p.ends_with("catalog/config.yaml"));
    }

    // -- ValidationError Display --

    #[test]
    fn validation_error_display() {
        let err = ValidationError {
            field: "sync.interval_secs".into(),
            message: "must be greater than 0".into(),
        };
        assert_eq!(err.to_string(), "sync.interval_secs: must be greater than 0");
    }
}
