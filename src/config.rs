//! Configuration: `eidos-apidoc.toml` merged with command-line overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "eidos-apidoc.toml";

/// Placeholders: `{path}`, `{module}`, `{name}`, `{line}`.
pub const DEFAULT_SOURCE_URL: &str = "#source:{path}:{name}";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// On-disk shape. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigToml {
    roots: Option<Vec<PathBuf>>,
    modules: Option<Vec<String>>,
    packages: Option<Vec<String>>,
    source_url: Option<String>,
    source_links: Option<bool>,
    format: Option<String>,
}

/// Effective configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directories dotted module names are resolved against, in order
    pub roots: Vec<PathBuf>,
    /// Modules always offered for documentation
    pub modules: Vec<String>,
    /// Packages whose submodules are discovered
    pub packages: Vec<String>,
    pub source_url: String,
    pub source_links: bool,
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            roots: vec![PathBuf::from(".")],
            modules: vec![
                "eidos.tags".to_string(),
                "eidos.styles".to_string(),
                "eidos.utils".to_string(),
            ],
            packages: vec!["eidos.components".to_string(), "eidos.plugins".to_string()],
            source_url: DEFAULT_SOURCE_URL.to_string(),
            source_links: true,
            format: "html".to_string(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit path the file must exist. Without one,
    /// [`DEFAULT_CONFIG_FILE`] is used when present and defaults otherwise.
    /// Relative roots are resolved against the config file's directory.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Config::default());
                }
                candidate
            }
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Config::from_toml(&content, path.parent()).map_err(|source| {
            ConfigError::Parse {
                path: path.clone(),
                source,
            }
        })?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration text, resolving relative roots against `base`.
    pub fn from_toml(content: &str, base: Option<&Path>) -> Result<Config, toml::de::Error> {
        let raw: ConfigToml = toml::from_str(content)?;
        let mut config = Config::default();

        if let Some(roots) = raw.roots {
            config.roots = roots
                .into_iter()
                .map(|r| match base {
                    Some(b) if r.is_relative() && !b.as_os_str().is_empty() => b.join(r),
                    _ => r,
                })
                .collect();
        }
        if let Some(modules) = raw.modules {
            config.modules = modules;
        }
        if let Some(packages) = raw.packages {
            config.packages = packages;
        }
        if let Some(url) = raw.source_url {
            config.source_url = url;
        }
        if let Some(links) = raw.source_links {
            config.source_links = links;
        }
        if let Some(format) = raw.format {
            config.format = format;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_eidos_layout() {
        let c = Config::default();
        assert_eq!(c.modules, vec!["eidos.tags", "eidos.styles", "eidos.utils"]);
        assert_eq!(c.packages, vec!["eidos.components", "eidos.plugins"]);
        assert!(c.source_links);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let c = Config::from_toml("modules = [\"pkg.a\"]\nsource_links = false\n", None).unwrap();
        assert_eq!(c.modules, vec!["pkg.a"]);
        assert!(!c.source_links);
        assert_eq!(c.packages, Config::default().packages);
        assert_eq!(c.roots, vec![PathBuf::from(".")]);
    }

    #[test]
    fn relative_roots_resolve_against_config_dir() {
        let c = Config::from_toml("roots = [\"src\", \"/abs\"]", Some(Path::new("/proj"))).unwrap();
        assert_eq!(c.roots, vec![PathBuf::from("/proj/src"), PathBuf::from("/abs")]);
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(Config::from_toml("bogus = 1", None).is_err());
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let err = Config::load(Some(Path::new("/nonexistent/eidos-apidoc.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
