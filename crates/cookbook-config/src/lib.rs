//! Configuration management for the cookbook server.
//!
//! Parses `cookbook.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `recipes.source_dir`
//! - `recipes.static_dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override recipe source directory.
    pub source_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "cookbook.toml";

/// Folder names hidden from listings unless configured otherwise.
const DEFAULT_EXCLUDE_DIRS: &[&str] = &["config"];

/// Word separator used in URLs in place of spaces.
const DEFAULT_WORD_SEPARATOR: char = '_';

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Recipe tree configuration (paths are relative strings from TOML).
    recipes: RecipesConfigRaw,

    /// Resolved recipe tree configuration (set after loading).
    #[serde(skip)]
    pub recipes_resolved: RecipesConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5000,
        }
    }
}

/// Raw recipe configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RecipesConfigRaw {
    source_dir: Option<String>,
    static_dir: Option<String>,
    exclude_dirs: Option<Vec<String>>,
    word_separator: Option<String>,
}

/// Resolved recipe tree configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipesConfig {
    /// Root of the recipe content tree.
    pub source_dir: PathBuf,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Folder names hidden from folder listings.
    pub exclude_dirs: Vec<String>,
    /// Character used in URLs in place of a space.
    pub word_separator: char,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("recipes"),
            static_dir: PathBuf::from("static"),
            exclude_dirs: default_exclude_dirs(),
            word_separator: DEFAULT_WORD_SEPARATOR,
        }
    }
}

fn default_exclude_dirs() -> Vec<String> {
    DEFAULT_EXCLUDE_DIRS.iter().map(|&d| d.to_owned()).collect()
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`recipes.source_dir`").
        field: String,
        /// Error message (e.g., "${`RECIPES`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Characters a path segment may not contain, or that form `.`/`..` segments.
const RESERVED_SEPARATORS: [char; 4] = ['/', '\\', '\0', '.'];

/// Reject separators that would turn every separated name into an invalid segment.
fn check_word_separator(separator: char) -> Result<char, ConfigError> {
    if RESERVED_SEPARATORS.contains(&separator) {
        return Err(ConfigError::Validation(format!(
            "recipes.word_separator cannot be {separator:?}"
        )));
    }
    Ok(separator)
}

/// Parse a word separator string into exactly one character.
fn parse_word_separator(value: &str) -> Result<char, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => check_word_separator(c),
        _ => Err(ConfigError::Validation(
            "recipes.word_separator must be exactly one character".to_owned(),
        )),
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `cookbook.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.recipes_resolved.source_dir.clone_from(source_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            recipes: RecipesConfigRaw::default(),
            recipes_resolved: RecipesConfig {
                source_dir: base.join("recipes"),
                static_dir: base.join("static"),
                ..RecipesConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 lets the OS pick a port, which is never what a config file means
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        check_word_separator(self.recipes_resolved.word_separator)?;

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref dir) = self.recipes.source_dir {
            self.recipes.source_dir = Some(expand::expand_env(dir, "recipes.source_dir")?);
        }
        if let Some(ref dir) = self.recipes.static_dir {
            self.recipes.static_dir = Some(expand::expand_env(dir, "recipes.static_dir")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory.
    ///
    /// Absolute paths in the file are kept as they are.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        let word_separator = match self.recipes.word_separator.as_deref() {
            Some(value) => parse_word_separator(value)?,
            None => DEFAULT_WORD_SEPARATOR,
        };

        self.recipes_resolved = RecipesConfig {
            source_dir: resolve(self.recipes.source_dir.as_deref(), "recipes"),
            static_dir: resolve(self.recipes.static_dir.as_deref(), "static"),
            exclude_dirs: self
                .recipes
                .exclude_dirs
                .clone()
                .unwrap_or_else(default_exclude_dirs),
            word_separator,
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(
            config.recipes_resolved,
            RecipesConfig {
                source_dir: PathBuf::from("/test/recipes"),
                static_dir: PathBuf::from("/test/static"),
                exclude_dirs: vec!["config".to_owned()],
                word_separator: '_',
            }
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_parse_server_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[recipes]
source_dir = "cookbook"
static_dir = "/srv/static"
exclude_dirs = ["config", "drafts"]
word_separator = "-"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project")).unwrap();

        assert_eq!(
            config.recipes_resolved,
            RecipesConfig {
                source_dir: PathBuf::from("/project/cookbook"),
                static_dir: PathBuf::from("/srv/static"),
                exclude_dirs: vec!["config".to_owned(), "drafts".to_owned()],
                word_separator: '-',
            }
        );
    }

    #[test]
    fn test_resolve_paths_defaults() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project")).unwrap();

        assert_eq!(
            config.recipes_resolved.source_dir,
            PathBuf::from("/project/recipes")
        );
        assert_eq!(config.recipes_resolved.exclude_dirs, vec!["config"]);
        assert_eq!(config.recipes_resolved.word_separator, '_');
    }

    #[test]
    fn test_empty_exclude_dirs_is_kept() {
        let toml = r"
[recipes]
exclude_dirs = []
";
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project")).unwrap();

        assert!(config.recipes_resolved.exclude_dirs.is_empty());
    }

    #[test]
    fn test_word_separator_must_be_single_char() {
        let toml = r#"
[recipes]
word_separator = "__"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.resolve_paths(Path::new("/project")).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("word_separator"));
    }

    #[test]
    fn test_word_separator_rejects_slash() {
        let toml = r#"
[recipes]
word_separator = "/"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.resolve_paths(Path::new("/project")).unwrap_err();

        assert!(err.to_string().contains("'/'"));
    }

    #[test]
    fn test_word_separator_rejects_reserved_chars() {
        for (value, shown) in [(r"\\", r"'\\'"), (r"\u0000", r"'\0'"), (".", "'.'")] {
            let toml = format!("[recipes]\nword_separator = \"{value}\"\n");
            let mut config: Config = toml::from_str(&toml).unwrap();
            let err = config.resolve_paths(Path::new("/project")).unwrap_err();

            assert!(
                err.to_string().contains(shown),
                "{value}: unexpected error {err}"
            );
        }
    }

    #[test]
    fn test_validate_rejects_reserved_separator() {
        for separator in ['/', '\\', '\0', '.'] {
            let mut config = Config::default();
            config.recipes_resolved.word_separator = separator;

            assert!(config.validate().is_err(), "{separator:?} was accepted");
        }
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(8080),
            source_dir: Some(PathBuf::from("/custom/recipes")),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.recipes_resolved.source_dir,
            PathBuf::from("/custom/recipes")
        );
        // Unchanged
        assert_eq!(
            config.recipes_resolved.static_dir,
            PathBuf::from("/test/static")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(
            config.recipes_resolved.source_dir,
            PathBuf::from("/test/recipes")
        );
    }

    #[test]
    fn test_expand_env_vars_source_dir() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("COOKBOOK_TEST_RECIPES", "/data/recipes");
        }

        let toml = r#"
[recipes]
source_dir = "${COOKBOOK_TEST_RECIPES}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project")).unwrap();

        assert_eq!(
            config.recipes_resolved.source_dir,
            PathBuf::from("/data/recipes")
        );

        unsafe {
            std::env::remove_var("COOKBOOK_TEST_RECIPES");
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[server]\nport = 7000\n\n[recipes]\nsource_dir = \"my recipes\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 7000);
        assert_eq!(
            config.recipes_resolved.source_dir,
            dir.path().join("my recipes")
        );
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/cookbook.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_port_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nport = 0\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("server.host"));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }
}
