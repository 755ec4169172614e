//! Application settings and where each value came from.
//!
//! Priority for every key: command-line flag > environment variable (a
//! `.env` file loaded by the CLI counts as environment) > `settings.toml`
//! > built-in default.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Audit records kept when nothing else is configured.
pub const DEFAULT_HISTORY_CAPACITY: usize = 24;

pub const ENV_CATALOG: &str = "FILM_FINDER_CATALOG";
pub const ENV_ACCOUNTS: &str = "FILM_FINDER_ACCOUNTS";
pub const ENV_HISTORY: &str = "FILM_FINDER_HISTORY";
pub const ENV_LAST_QUERY_DIR: &str = "FILM_FINDER_LAST_QUERY_DIR";
pub const ENV_HISTORY_CAPACITY: &str = "FILM_FINDER_HISTORY_CAPACITY";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Canonical path to the settings file: `~/.config/film-finder/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("film-finder").join("settings.toml")
}

/// Default directory for the databases and the last-query slot.
pub fn data_dir() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("film-finder")
}

/// Where a setting's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    Flag,
    EnvVar(&'static str),
    ConfigFile,
    Default,
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => write!(f, "command line"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SettingOverrides {
    pub catalog_path: Option<PathBuf>,
    pub history_path: Option<PathBuf>,
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub catalog_path: PathBuf,
    pub accounts_path: PathBuf,
    pub history_path: PathBuf,
    pub last_query_dir: PathBuf,
    pub history_capacity: usize,
    pub replay_enabled: bool,
}

/// Provenance of each resolved setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingSources {
    pub catalog_path: SettingSource,
    pub accounts_path: SettingSource,
    pub history_path: SettingSource,
    pub last_query_dir: SettingSource,
    pub history_capacity: SettingSource,
    pub replay_enabled: SettingSource,
}

/// `settings.toml` format. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SettingsFile {
    pub catalog_path: Option<PathBuf>,
    pub accounts_path: Option<PathBuf>,
    pub history_path: Option<PathBuf>,
    pub last_query_dir: Option<PathBuf>,
    pub history_capacity: Option<usize>,
    pub replay_enabled: Option<bool>,
}

impl SettingsFile {
    /// Read the file at `path`; a missing file is `None`.
    pub fn load(path: &Path) -> Result<Option<Self>, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Some(toml::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Settings {
    /// Resolve settings from the process environment and the settings file.
    pub fn load(overrides: &SettingOverrides) -> Result<(Self, SettingSources), SettingsError> {
        let file = SettingsFile::load(&settings_path())?;
        Self::resolve(overrides, file.as_ref(), &data_dir(), |key| {
            std::env::var(key).ok()
        })
    }

    /// Resolve settings from explicit sources. `lookup` reads an
    /// environment variable; empty values count as unset.
    pub fn resolve(
        overrides: &SettingOverrides,
        file: Option<&SettingsFile>,
        data_dir: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(Self, SettingSources), SettingsError> {
        let env = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());
        let file_value = |get: fn(&SettingsFile) -> Option<PathBuf>| file.and_then(get);

        let (catalog_path, catalog_src) = resolve_path(
            overrides.catalog_path.clone(),
            ENV_CATALOG,
            env(ENV_CATALOG),
            file_value(|f| f.catalog_path.clone()),
            data_dir.join("catalog.db"),
        );
        let (accounts_path, accounts_src) = resolve_path(
            None,
            ENV_ACCOUNTS,
            env(ENV_ACCOUNTS),
            file_value(|f| f.accounts_path.clone()),
            data_dir.join("accounts.db"),
        );
        let (history_path, history_src) = resolve_path(
            overrides.history_path.clone(),
            ENV_HISTORY,
            env(ENV_HISTORY),
            file_value(|f| f.history_path.clone()),
            data_dir.join("history.db"),
        );
        let (last_query_dir, last_query_src) = resolve_path(
            None,
            ENV_LAST_QUERY_DIR,
            env(ENV_LAST_QUERY_DIR),
            file_value(|f| f.last_query_dir.clone()),
            data_dir.to_path_buf(),
        );

        let (history_capacity, capacity_src) = if let Some(raw) = env(ENV_HISTORY_CAPACITY) {
            (
                parse_capacity(&raw)?,
                SettingSource::EnvVar(ENV_HISTORY_CAPACITY),
            )
        } else if let Some(capacity) = file.and_then(|f| f.history_capacity) {
            if capacity == 0 {
                return Err(SettingsError::InvalidValue {
                    key: "history_capacity",
                    value: capacity.to_string(),
                });
            }
            (capacity, SettingSource::ConfigFile)
        } else {
            (DEFAULT_HISTORY_CAPACITY, SettingSource::Default)
        };

        let (replay_enabled, replay_src) = match file.and_then(|f| f.replay_enabled) {
            Some(enabled) => (enabled, SettingSource::ConfigFile),
            None => (true, SettingSource::Default),
        };

        Ok((
            Self {
                catalog_path,
                accounts_path,
                history_path,
                last_query_dir,
                history_capacity,
                replay_enabled,
            },
            SettingSources {
                catalog_path: catalog_src,
                accounts_path: accounts_src,
                history_path: history_src,
                last_query_dir: last_query_src,
                history_capacity: capacity_src,
                replay_enabled: replay_src,
            },
        ))
    }
}

fn resolve_path(
    flag: Option<PathBuf>,
    var: &'static str,
    env: Option<String>,
    file: Option<PathBuf>,
    default: PathBuf,
) -> (PathBuf, SettingSource) {
    if let Some(p) = flag {
        (p, SettingSource::Flag)
    } else if let Some(p) = env {
        (PathBuf::from(p), SettingSource::EnvVar(var))
    } else if let Some(p) = file {
        (p, SettingSource::ConfigFile)
    } else {
        (default, SettingSource::Default)
    }
}

fn parse_capacity(raw: &str) -> Result<usize, SettingsError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(SettingsError::InvalidValue {
            key: "history_capacity",
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_live_in_data_dir() {
        let (settings, sources) =
            Settings::resolve(&SettingOverrides::default(), None, Path::new("/data"), no_env)
                .unwrap();
        assert_eq!(settings.catalog_path, PathBuf::from("/data/catalog.db"));
        assert_eq!(settings.last_query_dir, PathBuf::from("/data"));
        assert_eq!(settings.history_capacity, DEFAULT_HISTORY_CAPACITY);
        assert!(settings.replay_enabled);
        assert_eq!(sources.catalog_path, SettingSource::Default);
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let file = SettingsFile {
            catalog_path: Some(PathBuf::from("/file/catalog.db")),
            history_path: Some(PathBuf::from("/file/history.db")),
            accounts_path: Some(PathBuf::from("/file/accounts.db")),
            history_capacity: Some(10),
            replay_enabled: Some(false),
            ..SettingsFile::default()
        };
        let overrides = SettingOverrides {
            catalog_path: Some(PathBuf::from("/flag/catalog.db")),
            history_path: None,
        };
        let env = |key: &str| match key {
            ENV_CATALOG | ENV_HISTORY => Some("/env/x.db".to_string()),
            _ => None,
        };
        let (settings, sources) =
            Settings::resolve(&overrides, Some(&file), Path::new("/data"), env).unwrap();

        assert_eq!(settings.catalog_path, PathBuf::from("/flag/catalog.db"));
        assert_eq!(sources.catalog_path, SettingSource::Flag);
        assert_eq!(settings.history_path, PathBuf::from("/env/x.db"));
        assert_eq!(sources.history_path, SettingSource::EnvVar(ENV_HISTORY));
        assert_eq!(settings.accounts_path, PathBuf::from("/file/accounts.db"));
        assert_eq!(sources.accounts_path, SettingSource::ConfigFile);
        assert_eq!(settings.history_capacity, 10);
        assert!(!settings.replay_enabled);
    }

    #[test]
    fn capacity_must_be_positive() {
        let env = |key: &str| (key == ENV_HISTORY_CAPACITY).then(|| "0".to_string());
        assert!(matches!(
            Settings::resolve(&SettingOverrides::default(), None, Path::new("/d"), env),
            Err(SettingsError::InvalidValue { .. })
        ));
        let env = |key: &str| (key == ENV_HISTORY_CAPACITY).then(|| "many".to_string());
        assert!(Settings::resolve(&SettingOverrides::default(), None, Path::new("/d"), env).is_err());
    }

    #[test]
    fn empty_env_value_is_unset() {
        let env = |_: &str| Some("  ".to_string());
        let (_, sources) =
            Settings::resolve(&SettingOverrides::default(), None, Path::new("/d"), env).unwrap();
        assert_eq!(sources.history_path, SettingSource::Default);
        assert_eq!(sources.history_capacity, SettingSource::Default);
    }

    #[test]
    fn settings_file_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        assert!(SettingsFile::load(&path).unwrap().is_none());
        std::fs::write(&path, "history_capacity = 5\nreplay_enabled = false\n").unwrap();
        let file = SettingsFile::load(&path).unwrap().unwrap();
        assert_eq!(file.history_capacity, Some(5));
        assert_eq!(file.replay_enabled, Some(false));
        std::fs::write(&path, "history_capacity = \"x\"").unwrap();
        assert!(matches!(SettingsFile::load(&path), Err(SettingsError::Toml(_))));
    }
}
