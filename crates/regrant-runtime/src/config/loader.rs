//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.regrant/config.toml`)
//! 3. Project config (`<project>/.regrant/config.toml`)
//! 4. Environment variables (`REGRANT_*`)
//!
//! Each layer overrides the previous.

use super::{
    default_config_path, ConfigError, RegrantConfig, PROJECT_CONFIG_DIR, PROJECT_CONFIG_FILE,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Helper macro for parsing boolean environment variables.
macro_rules! parse_env_bool {
    ($field:expr, $var:literal) => {
        if let Ok(val) = std::env::var($var) {
            $field = parse_bool(&val).ok_or_else(|| ConfigError::env($var, &val, "bool"))?;
        }
    };
}

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```no_run
/// use regrant_runtime::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_project_root("/path/to/project")
///     .skip_env_vars()
///     .load()?;
/// # Ok::<(), regrant_runtime::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to ~/.regrant/config.toml).
    global_config_path: Option<PathBuf>,

    /// Project root directory.
    project_root: Option<PathBuf>,

    /// Skip environment variable loading.
    skip_env: bool,

    /// Skip global config loading.
    skip_global: bool,

    /// Skip project config loading.
    skip_project: bool,
}

impl ConfigLoader {
    /// Creates a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Sets the project root directory.
    ///
    /// Project config will be loaded from `<project_root>/.regrant/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    ///
    /// Useful for testing with deterministic config.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips global config loading.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Skips project config loading.
    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any config file exists but cannot be parsed,
    /// or an environment variable holds an invalid value.
    /// Missing config files are silently ignored.
    pub fn load(&self) -> Result<RegrantConfig, ConfigError> {
        let mut config = RegrantConfig::default();

        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(global_config) = self.load_file(&global_path)? {
                debug!(path = %global_path.display(), "Loaded global config");
                config.merge(&global_config);
            }
        }

        if !self.skip_project {
            if let Some(ref project_root) = self.project_root {
                let project_config_path = project_root
                    .join(PROJECT_CONFIG_DIR)
                    .join(PROJECT_CONFIG_FILE);

                if let Some(project_config) = self.load_file(&project_config_path)? {
                    debug!(
                        path = %project_config_path.display(),
                        project = %project_root.display(),
                        "Loaded project config"
                    );
                    config.merge(&project_config);
                }
            }
        }

        if !self.skip_env {
            self.apply_env_vars(&mut config)?;
        }

        Ok(config)
    }

    /// Loads a config file, returning None if it doesn't exist.
    fn load_file(&self, path: &Path) -> Result<Option<RegrantConfig>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io("read", path, e))?;

        let config = RegrantConfig::from_toml(&content).map_err(|e| ConfigError::invalid(path, e))?;

        Ok(Some(config))
    }

    /// Applies environment variable overrides.
    fn apply_env_vars(&self, config: &mut RegrantConfig) -> Result<(), ConfigError> {
        parse_env_bool!(config.debug, "REGRANT_DEBUG");
        parse_env_bool!(config.logging.json, "REGRANT_LOG_JSON");

        if let Ok(val) = std::env::var("REGRANT_LOG_LEVEL") {
            config.logging.level = val;
        }

        if let Ok(val) = std::env::var("REGRANT_STORE_PATH") {
            config.store.path = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("REGRANT_PASSWORD_TTL_DAYS") {
            config.users.password_ttl_days = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::env("REGRANT_PASSWORD_TTL_DAYS", &val, "day count"))?;
        }

        Ok(())
    }
}

/// Parses a boolean from string.
///
/// Accepts: "true", "false", "1", "0", "yes", "no", "on", "off" (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Saves a config to `path`.
///
/// Creates the parent directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be written.
pub fn save_config(path: &Path, config: &RegrantConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::io("create directory for", parent, e))?;
        }
    }

    let toml = config.to_toml()?;
    std::fs::write(path, toml).map_err(|e| ConfigError::io("write", path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regrant_auth::Permission;
    use tempfile::TempDir;

    fn create_config_file(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_defaults_only() {
        let config = ConfigLoader::new()
            .skip_global_config()
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap();

        assert_eq!(config, RegrantConfig::default());
    }

    #[test]
    fn load_global_config() {
        let temp = TempDir::new().unwrap();
        let config_path = create_config_file(
            temp.path(),
            r#"
debug = true

[users]
password_ttl_days = 7
"#,
        );

        let config = ConfigLoader::new()
            .with_global_config(&config_path)
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap();

        assert!(config.debug);
        assert_eq!(config.users.password_ttl_days, 7);
    }

    #[test]
    fn load_project_overrides_global() {
        let global_temp = TempDir::new().unwrap();
        let project_temp = TempDir::new().unwrap();

        let global_path = create_config_file(
            global_temp.path(),
            r#"
[logging]
level = "warn"

[users]
password_ttl_days = 30

[[rules]]
name = "edit"
permissions = "update"
"#,
        );

        let project_dir = project_temp.path().join(PROJECT_CONFIG_DIR);
        std::fs::create_dir_all(&project_dir).unwrap();
        create_config_file(
            &project_dir,
            r#"
[logging]
level = "debug"

[policy]
defaults = { owner = "crud", group = "read", all = "nothing" }

[[rules]]
name = "edit"
permissions = "write"
"#,
        );

        let config = ConfigLoader::new()
            .with_global_config(&global_path)
            .with_project_root(project_temp.path())
            .skip_env_vars()
            .load()
            .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.users.password_ttl_days, 30);
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].permissions, Permission::Write);
        assert_eq!(
            config.policy.defaults.map(|d| d.owner),
            Some(Permission::Crud)
        );
    }

    #[test]
    fn missing_files_are_ignored() {
        let temp = TempDir::new().unwrap();
        let config = ConfigLoader::new()
            .with_global_config(temp.path().join("absent.toml"))
            .with_project_root(temp.path())
            .skip_env_vars()
            .load()
            .unwrap();

        assert_eq!(config, RegrantConfig::default());
    }

    #[test]
    fn malformed_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = create_config_file(
            temp.path(),
            r#"
[[rules]]
name = "bad"
permissions = "create|read"
"#,
        );

        let err = ConfigLoader::new()
            .with_global_config(&path)
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    // The only test that reads REGRANT_* variables; every other test skips them.
    #[test]
    fn env_vars_override_files() {
        std::env::set_var("REGRANT_PASSWORD_TTL_DAYS", "12");
        std::env::set_var("REGRANT_LOG_JSON", "yes");
        let config = ConfigLoader::new()
            .skip_global_config()
            .skip_project_config()
            .load();
        std::env::remove_var("REGRANT_LOG_JSON");

        let config = config.unwrap();
        assert_eq!(config.users.password_ttl_days, 12);
        assert!(config.logging.json);

        std::env::set_var("REGRANT_PASSWORD_TTL_DAYS", "soon");
        let err = ConfigLoader::new()
            .skip_global_config()
            .skip_project_config()
            .load()
            .unwrap_err();
        std::env::remove_var("REGRANT_PASSWORD_TTL_DAYS");

        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar { ref name, ref value, .. }
                if name == "REGRANT_PASSWORD_TTL_DAYS" && value == "soon"
        ));
    }

    #[test]
    fn save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = RegrantConfig::default();
        config.debug = true;
        config.store.path = Some(PathBuf::from("perms.json"));
        save_config(&path, &config).unwrap();

        let loaded = ConfigLoader::new()
            .with_global_config(&path)
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
