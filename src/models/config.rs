//! Configuration types for jobdeck.
//!
//! Configuration is layered. Later layers win:
//! 1. Built-in defaults
//! 2. `/etc/jobdeck/config.toml`
//! 3. The user config file (see [`AppConfig::user_config_path`])
//! 4. An explicit `--config` file
//! 5. Environment variables (`JOBDECK_*`)
//! 6. Command-line flags (applied by the caller)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Origin used when nothing else configures one
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Minimum HTTP timeout in seconds
const MIN_TIMEOUT_SECS: u64 = 1;

/// Minimum fetch limit
const MIN_LIMIT: u32 = 1;

/// Errors that abort configuration loading (strict mode only)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("could not read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value '{value}' for {var}: {reason}")]
    InvalidEnv {
        var: String,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,

    pub limits: LimitsConfig,

    pub display: DisplayConfig,

    pub behavior: BehaviorConfig,
}

/// Where the jobs API lives and how to talk to it
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the jobs API. `None` falls through to lower layers.
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// File holding the bearer token. Read on every request.
    pub token_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 30,
            token_file: None,
        }
    }
}

impl ServerConfig {
    /// Effective base URL (configured value or [`DEFAULT_SERVER_URL`])
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Effective token file: configured path or `<data dir>/jobdeck/token`
    #[must_use]
    pub fn token_file(&self) -> Option<PathBuf> {
        self.token_file
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("jobdeck/token")))
    }
}

/// How many postings each list requests
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub external_jobs: u32,
    pub recommended_jobs: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            external_jobs: 100,
            recommended_jobs: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Theme name (dark | light)
    pub theme: String,

    /// Maximum title length before truncation in tables
    pub title_max_length: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            title_max_length: 40,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Refetch the job list even when a scrape reports failure
    pub refresh_after_failed_scrape: bool,

    /// Ask before bulk-enabling from the CLI
    pub confirm_bulk_enable: bool,

    /// Enable clipboard support
    pub copy_to_clipboard: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            refresh_after_failed_scrape: false,
            confirm_bulk_enable: true,
            copy_to_clipboard: true,
        }
    }
}

/// Validate that a value meets its minimum.
/// In non-strict mode, corrects invalid values to the default and adds a warning.
fn validate_minimum<T>(
    value: &mut T,
    field: &str,
    min: T,
    default: T,
    strict: bool,
    warnings: &mut Vec<String>,
) -> Result<(), ConfigError>
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    if *value < min {
        let msg = format!("{field} must be at least {min}, got {value}");
        if strict {
            return Err(ConfigError::Invalid(msg));
        }
        warnings.push(format!("{msg} - using default ({default})"));
        *value = default;
    }
    Ok(())
}

impl AppConfig {
    /// Get the user config file path, respecting XDG_CONFIG_HOME
    ///
    /// Resolution order:
    /// 1. $XDG_CONFIG_HOME/jobdeck/config.toml
    /// 2. $HOME/.config/jobdeck/config.toml
    /// 3. dirs::config_dir()/jobdeck/config.toml
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config.is_empty()
        {
            return Some(PathBuf::from(xdg_config).join("jobdeck/config.toml"));
        }

        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(".config/jobdeck/config.toml"));
        }

        dirs::config_dir().map(|dir| dir.join("jobdeck/config.toml"))
    }

    /// Load configuration from files and the process environment.
    /// Returns the config and any warnings encountered during loading.
    pub fn load(extra_file: Option<&Path>) -> Result<(Self, Vec<String>), ConfigError> {
        let mut files = vec![PathBuf::from("/etc/jobdeck/config.toml")];
        if let Some(user_path) = Self::user_config_path() {
            files.push(user_path);
        }
        if let Some(extra) = extra_file {
            files.push(extra.to_path_buf());
        }

        Self::load_from(&files, |var| std::env::var(var).ok())
    }

    /// Load from an explicit list of files (lowest precedence first) and an
    /// environment lookup.
    pub fn load_from<F>(files: &[PathBuf], env: F) -> Result<(Self, Vec<String>), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();
        let strict = env("JOBDECK_STRICT_CONFIG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let mut merged = toml::Table::new();
        for path in files {
            if let Some(layer) = Self::read_layer(path, strict, &mut warnings)? {
                merge_tables(&mut merged, layer);
            }
        }

        let mut config: AppConfig = toml::Value::Table(merged)
            .try_into()
            .map_err(|e| ConfigError::Invalid(format!("invalid merged config: {e}")))?;

        config.apply_env_overrides(&env, strict, &mut warnings)?;
        warnings.extend(config.validate(strict)?);

        Ok((config, warnings))
    }

    /// Read one config layer as a raw table. Missing files yield `None`,
    /// unreadable or malformed files yield a warning unless strict.
    fn read_layer(
        path: &Path,
        strict: bool,
        warnings: &mut Vec<String>,
    ) -> Result<Option<toml::Table>, ConfigError> {
        let path_str = path.display().to_string();

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) if strict => {
                return Err(ConfigError::Read {
                    path: path_str,
                    source: e,
                });
            }
            Err(e) => {
                warnings.push(format!("Could not read config '{}': {}", path_str, e));
                return Ok(None);
            }
        };

        // Each layer must type-check on its own
        let parsed = toml::from_str::<toml::Table>(&content).and_then(|table| {
            toml::Value::Table(table.clone())
                .try_into::<AppConfig>()
                .map(|_| table)
        });

        match parsed {
            Ok(table) => {
                tracing::debug!(path = %path_str, "loaded config file");
                Ok(Some(table))
            }
            Err(e) if strict => Err(ConfigError::Parse {
                path: path_str,
                message: e.to_string(),
            }),
            Err(e) => {
                warnings.push(format!("Config parse error in '{}': {}", path_str, e));
                Ok(None)
            }
        }
    }

    fn apply_env_overrides<F>(
        &mut self,
        env: &F,
        strict: bool,
        warnings: &mut Vec<String>,
    ) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = env("JOBDECK_SERVER_URL")
            && !val.trim().is_empty()
        {
            self.server.base_url = Some(val);
        }

        if let Some(val) = env("JOBDECK_TIMEOUT") {
            match val.parse::<u64>() {
                Ok(secs) if secs >= MIN_TIMEOUT_SECS => self.server.timeout_secs = secs,
                _ => report_env_error(
                    strict,
                    warnings,
                    "JOBDECK_TIMEOUT",
                    &val,
                    &format!("expected an integer of at least {MIN_TIMEOUT_SECS} (seconds)"),
                )?,
            }
        }

        if let Some(val) = env("JOBDECK_TOKEN_FILE")
            && !val.is_empty()
        {
            self.server.token_file = Some(PathBuf::from(val));
        }
        if let Some(val) = env("JOBDECK_THEME") {
            self.display.theme = val;
        }
        if env("JOBDECK_NO_CLIPBOARD").is_some() {
            self.behavior.copy_to_clipboard = false;
        }
        Ok(())
    }

    /// Validate numeric settings.
    /// Returns warnings for invalid values that were corrected to defaults.
    pub fn validate(&mut self, strict: bool) -> Result<Vec<String>, ConfigError> {
        let mut warnings = Vec::new();
        let server_defaults = ServerConfig::default();
        let limit_defaults = LimitsConfig::default();

        validate_minimum(
            &mut self.server.timeout_secs,
            "server.timeout_secs",
            MIN_TIMEOUT_SECS,
            server_defaults.timeout_secs,
            strict,
            &mut warnings,
        )?;
        validate_minimum(
            &mut self.limits.external_jobs,
            "limits.external_jobs",
            MIN_LIMIT,
            limit_defaults.external_jobs,
            strict,
            &mut warnings,
        )?;
        validate_minimum(
            &mut self.limits.recommended_jobs,
            "limits.recommended_jobs",
            MIN_LIMIT,
            limit_defaults.recommended_jobs,
            strict,
            &mut warnings,
        )?;

        Ok(warnings)
    }
}

/// Overlay `layer` onto `base`, descending into nested tables so keys a
/// later file leaves out keep their earlier value
fn merge_tables(base: &mut toml::Table, layer: toml::Table) {
    for (key, value) in layer {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Report an environment variable error, failing if strict mode is enabled
fn report_env_error(
    strict: bool,
    warnings: &mut Vec<String>,
    var: &str,
    value: &str,
    reason: &str,
) -> Result<(), ConfigError> {
    if strict {
        return Err(ConfigError::InvalidEnv {
            var: var.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        });
    }
    warnings.push(format!(
        "Invalid value '{}' for {}, {} - using default",
        value, var, reason
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("jobdeck-config-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_defaults() {
        let (config, warnings) = AppConfig::load_from(&[], env_from(&[])).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(config.server.base_url(), DEFAULT_SERVER_URL);
        assert_eq!(config.limits.external_jobs, 100);
        assert_eq!(config.limits.recommended_jobs, 50);
        assert!(!config.behavior.refresh_after_failed_scrape);
    }

    #[test]
    fn test_base_url_precedence() {
        let dir = temp_dir("precedence");
        let system = write_config(&dir, "system.toml", "[server]\nbase_url = \"http://system:1\"\n");
        let user = write_config(&dir, "user.toml", "[server]\ntimeout_secs = 5\n");

        // User file without base_url keeps the system value
        let (config, _) =
            AppConfig::load_from(&[system.clone(), user.clone()], env_from(&[])).unwrap();
        assert_eq!(config.server.base_url(), "http://system:1");
        assert_eq!(config.server.timeout_secs, 5);

        // Environment beats files
        let (config, _) = AppConfig::load_from(
            &[system, user],
            env_from(&[("JOBDECK_SERVER_URL", "http://env:2")]),
        )
        .unwrap();
        assert_eq!(config.server.base_url(), "http://env:2");

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_later_file_keeps_unmentioned_keys() {
        let dir = temp_dir("layering");
        let system = write_config(
            &dir,
            "system.toml",
            "[server]\ntimeout_secs = 90\n\n[limits]\nexternal_jobs = 250\n\n[behavior]\nrefresh_after_failed_scrape = true\n",
        );
        let user = write_config(&dir, "user.toml", "[display]\ntheme = \"light\"\n");

        let (config, warnings) = AppConfig::load_from(&[system, user], env_from(&[])).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(config.display.theme, "light");
        assert_eq!(config.server.timeout_secs, 90);
        assert_eq!(config.limits.external_jobs, 250);
        assert_eq!(config.limits.recommended_jobs, 50);
        assert!(config.behavior.refresh_after_failed_scrape);
        assert_eq!(config.display.title_max_length, 40);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_bad_layer_is_skipped_without_losing_others() {
        let dir = temp_dir("badlayer");
        let system = write_config(&dir, "system.toml", "[limits]\nexternal_jobs = 250\n");
        let user = write_config(&dir, "user.toml", "[limits]\nexternal_jobs = \"many\"\n");

        let (config, warnings) = AppConfig::load_from(&[system, user], env_from(&[])).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("user.toml"));
        assert_eq!(config.limits.external_jobs, 250);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_parse_error_is_warning_unless_strict() {
        let dir = temp_dir("parse");
        let bad = write_config(&dir, "bad.toml", "[server\nbase_url = 1");

        let (_, warnings) = AppConfig::load_from(&[bad.clone()], env_from(&[])).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Config parse error"));

        let strict = AppConfig::load_from(&[bad], env_from(&[("JOBDECK_STRICT_CONFIG", "1")]));
        assert!(matches!(strict, Err(ConfigError::Parse { .. })));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_file_is_silent() {
        let missing = PathBuf::from("/nonexistent/jobdeck/config.toml");
        let (_, warnings) = AppConfig::load_from(&[missing], env_from(&[])).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_zero_limits_corrected() {
        let mut config = AppConfig::default();
        config.limits.external_jobs = 0;
        config.server.timeout_secs = 0;

        let warnings = config.validate(false).unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("limits.external_jobs")));
        assert_eq!(config.limits.external_jobs, 100);
        assert_eq!(config.server.timeout_secs, 30);
    }

    #[test]
    fn test_zero_limit_strict_error() {
        let mut config = AppConfig::default();
        config.limits.recommended_jobs = 0;
        let err = config.validate(true).unwrap_err();
        assert!(err.to_string().contains("limits.recommended_jobs"));
    }

    #[test]
    fn test_invalid_timeout_env() {
        let (config, warnings) =
            AppConfig::load_from(&[], env_from(&[("JOBDECK_TIMEOUT", "soon")])).unwrap();
        assert_eq!(config.server.timeout_secs, 30);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("JOBDECK_TIMEOUT"));

        let strict = AppConfig::load_from(
            &[],
            env_from(&[("JOBDECK_TIMEOUT", "0"), ("JOBDECK_STRICT_CONFIG", "true")]),
        );
        assert!(matches!(strict, Err(ConfigError::InvalidEnv { .. })));
    }

    #[test]
    fn test_env_toggles() {
        let (config, _) = AppConfig::load_from(
            &[],
            env_from(&[
                ("JOBDECK_NO_CLIPBOARD", "1"),
                ("JOBDECK_THEME", "light"),
                ("JOBDECK_TOKEN_FILE", "/tmp/tok"),
            ]),
        )
        .unwrap();
        assert!(!config.behavior.copy_to_clipboard);
        assert_eq!(config.display.theme, "light");
        assert_eq!(config.server.token_file(), Some(PathBuf::from("/tmp/tok")));
    }
}
