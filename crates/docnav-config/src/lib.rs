//! `docnav.toml` loading.
//!
//! A config file is looked up in the working directory and its parents
//! unless one is given explicitly. Relative paths in `[docs]` resolve against
//! the directory holding the file; command-line overrides ([`CliSettings`])
//! apply on top and the merged result is validated.
//!
//! `site.base_path` may reference the environment as `${VAR}` or
//! `${VAR:-default}`.

mod declaration;
mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use declaration::{EntryDecl, SiteInfo};

const CONFIG_FILENAME: &str = "docnav.toml";
const PROJECT_DIRNAME: &str = ".docnav";

/// Values given on the command line. `None` keeps the file's value.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub source_dir: Option<PathBuf>,
    pub base_path: Option<String>,
    pub cache_enabled: Option<bool>,
    pub out_dir: Option<PathBuf>,
}

/// `docnav.toml` as written on disk.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    site: SiteInfo,
    docs: DocsSection,
    nav: Vec<EntryDecl>,
    sidebar: Vec<EntryDecl>,
}

/// `[docs]` table; paths are relative to the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DocsSection {
    source_dir: Option<String>,
    out_dir: Option<String>,
    exclude: Vec<String>,
    cache_enabled: Option<bool>,
}

impl DocsSection {
    fn resolve(self, root: &Path) -> DocsConfig {
        let project_dir = root.join(PROJECT_DIRNAME);
        DocsConfig {
            source_dir: root.join(self.source_dir.as_deref().unwrap_or("docs")),
            out_dir: match self.out_dir {
                Some(dir) => root.join(dir),
                None => project_dir.join("dist"),
            },
            project_dir,
            exclude: self.exclude,
            cache_enabled: self.cache_enabled.unwrap_or(true),
        }
    }
}

/// Site configuration with every path resolved.
#[derive(Debug)]
pub struct Config {
    /// `[site]` table.
    pub site: SiteInfo,
    /// `[docs]` table, resolved.
    pub docs: DocsConfig,
    /// Top bar navigation.
    pub nav: Vec<EntryDecl>,
    /// Main content tree.
    pub sidebar: Vec<EntryDecl>,
    /// File the configuration was read from, if any.
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Where documents live and where build artifacts go.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Markdown source directory.
    pub source_dir: PathBuf,
    /// docnav's own data directory (`.docnav/`).
    pub project_dir: PathBuf,
    /// Where the resolved site manifest is written.
    pub out_dir: PathBuf,
    /// Glob patterns, relative to `source_dir`, of files to skip.
    pub exclude: Vec<String>,
    /// Persist the last-updated ledger between builds.
    pub cache_enabled: bool,
}

impl DocsConfig {
    /// `.docnav/cache/`
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.project_dir.join("cache")
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    /// `field` referenced an unset variable without a default.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar { field: String, message: String },
}

impl Config {
    /// Load the configuration and apply `cli_settings` on top.
    ///
    /// With no `config_path`, `docnav.toml` is searched for from the working
    /// directory upwards; if none exists the defaults apply, rooted at the
    /// working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if an explicit `config_path` is
    /// missing, and parse, expansion or validation errors otherwise.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let found = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_config_from(&cwd)),
        };

        let mut config = match found {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                let root = path.parent().unwrap_or(Path::new("."));
                let mut config = Self::parse(&content, root)?;
                config.config_path = Some(path);
                config
            }
            None => Self::default_with_base(&std::env::current_dir().unwrap_or_default()),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text, resolving paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, env expansion, or validation fails.
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let config = Self::parse(content, base_dir)?;
        config.validate()?;
        Ok(config)
    }

    fn parse(content: &str, root: &Path) -> Result<Self, ConfigError> {
        let ConfigFile {
            mut site,
            docs,
            nav,
            sidebar,
        } = toml::from_str(content)?;
        site.base_path = expand::expand_env(&site.base_path, "site.base_path")?;

        Ok(Self {
            site,
            docs: docs.resolve(root),
            nav,
            sidebar,
            config_path: None,
        })
    }

    fn default_with_base(base: &Path) -> Self {
        let file = ConfigFile::default();
        Self {
            site: file.site,
            docs: file.docs.resolve(base),
            nav: file.nav,
            sidebar: file.sidebar,
            config_path: None,
        }
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(dir) = &settings.source_dir {
            self.docs.source_dir.clone_from(dir);
        }
        if let Some(base_path) = &settings.base_path {
            self.site.base_path.clone_from(base_path);
        }
        if let Some(enabled) = settings.cache_enabled {
            self.docs.cache_enabled = enabled;
        }
        if let Some(dir) = &settings.out_dir {
            self.docs.out_dir.clone_from(dir);
        }
    }

    /// Nearest `docnav.toml` in `dir` or one of its ancestors.
    fn discover_config_from(dir: &Path) -> Option<PathBuf> {
        dir.ancestors()
            .map(|ancestor| ancestor.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Check the values the file format can't express.
    ///
    /// Navigation entries are validated later, against the content registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = &self.site.base_path;
        if !(base.starts_with('/') && base.ends_with('/')) {
            return Err(ConfigError::Validation(format!(
                "site.base_path must start and end with '/', got {base:?}"
            )));
        }
        if let Some(index) = self.docs.exclude.iter().position(String::is_empty) {
            return Err(ConfigError::Validation(format!(
                "docs.exclude[{index}] is an empty pattern"
            )));
        }
        Ok(())
    }
}
