// ABOUTME: Configuration loading for specport from environment variables and the rc file.
// ABOUTME: CLI flags override environment values; the rc file supplies per-command defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Name of the optional per-workspace configuration file.
pub const RC_FILE_NAME: &str = ".specportrc.yaml";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("working directory does not exist: {}", .0.display())]
    WorkingDirNotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    ReadRcFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid rc file {}: {source}", .path.display())]
    InvalidRcFile {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Process-wide settings shared by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecportConfig {
    pub working_dir: PathBuf,
    pub app_data_dir: Option<PathBuf>,
    pub ci: bool,
}

/// Values given on the command line, which take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub working_dir: Option<PathBuf>,
    pub app_data_dir: Option<PathBuf>,
    pub ci: bool,
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "true" | "1" | "yes")
}

impl SpecportConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - SPECPORT_WORKING_DIR: workspace root (default: current directory)
    /// - SPECPORT_APP_DATA_DIR: app database directory (default: ~/.specport)
    /// - SPECPORT_CI: disable implicit spec selection (default: false, or true when CI is set)
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(overrides, |key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment.
    pub fn from_lookup(
        overrides: ConfigOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let working_dir = overrides
            .working_dir
            .or_else(|| env("SPECPORT_WORKING_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        let app_data_dir = overrides
            .app_data_dir
            .or_else(|| env("SPECPORT_APP_DATA_DIR").map(PathBuf::from))
            .or_else(|| env("HOME").map(|home| PathBuf::from(home).join(".specport")));

        let ci = overrides.ci
            || env("SPECPORT_CI").is_some_and(|v| is_truthy(&v))
            || env("CI").is_some_and(|v| v != "false" && v != "0");

        if !working_dir.is_dir() {
            return Err(ConfigError::WorkingDirNotFound(working_dir));
        }

        Ok(Self {
            working_dir,
            app_data_dir,
            ci,
        })
    }
}

/// Contents of `.specportrc.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcFile {
    #[serde(default)]
    pub options: RcOptions,
}

/// Default command options from the rc file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcOptions {
    pub output: Option<PathBuf>,
    pub skip_annotations: Option<bool>,
}

impl RcFile {
    /// Read the rc file from `working_dir`. A missing file yields defaults.
    pub fn load(working_dir: &Path) -> Result<Self, ConfigError> {
        let path = working_dir.join(RC_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadRcFile {
            path: path.clone(),
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&text).map_err(|source| ConfigError::InvalidRcFile { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn config_loads_defaults() {
        let config =
            SpecportConfig::from_lookup(ConfigOverrides::default(), lookup_from(&[("HOME", "/home/dev")]))
                .unwrap();

        assert_eq!(config.working_dir, PathBuf::from("."));
        assert_eq!(
            config.app_data_dir,
            Some(PathBuf::from("/home/dev/.specport"))
        );
        assert!(!config.ci);
    }

    #[test]
    fn config_reads_environment() {
        let dir = TempDir::new().unwrap();
        let working = dir.path().to_str().unwrap().to_string();

        let config = SpecportConfig::from_lookup(
            ConfigOverrides::default(),
            lookup_from(&[
                ("SPECPORT_WORKING_DIR", working.as_str()),
                ("SPECPORT_APP_DATA_DIR", "/var/lib/specport"),
                ("SPECPORT_CI", "yes"),
            ]),
        )
        .unwrap();

        assert_eq!(config.working_dir, dir.path());
        assert_eq!(config.app_data_dir, Some(PathBuf::from("/var/lib/specport")));
        assert!(config.ci);
    }

    #[test]
    fn overrides_win_over_environment() {
        let env_dir = TempDir::new().unwrap();
        let flag_dir = TempDir::new().unwrap();
        let env_working = env_dir.path().to_str().unwrap().to_string();

        let config = SpecportConfig::from_lookup(
            ConfigOverrides {
                working_dir: Some(flag_dir.path().to_path_buf()),
                app_data_dir: Some(PathBuf::from("/flag/data")),
                ci: true,
            },
            lookup_from(&[
                ("SPECPORT_WORKING_DIR", env_working.as_str()),
                ("SPECPORT_APP_DATA_DIR", "/env/data"),
            ]),
        )
        .unwrap();

        assert_eq!(config.working_dir, flag_dir.path());
        assert_eq!(config.app_data_dir, Some(PathBuf::from("/flag/data")));
        assert!(config.ci);
    }

    #[test]
    fn generic_ci_variable_enables_ci_mode() {
        let config =
            SpecportConfig::from_lookup(ConfigOverrides::default(), lookup_from(&[("CI", "true")]))
                .unwrap();
        assert!(config.ci);

        let config =
            SpecportConfig::from_lookup(ConfigOverrides::default(), lookup_from(&[("CI", "false")]))
                .unwrap();
        assert!(!config.ci);
    }

    #[test]
    fn config_rejects_missing_working_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = SpecportConfig::from_lookup(
            ConfigOverrides {
                working_dir: Some(missing.clone()),
                ..Default::default()
            },
            lookup_from(&[]),
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::WorkingDirNotFound(ref p) if p == &missing));
    }

    #[test]
    fn rc_file_missing_or_empty_gives_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(RcFile::load(dir.path()).unwrap(), RcFile::default());

        std::fs::write(dir.path().join(RC_FILE_NAME), "\n").unwrap();
        assert_eq!(RcFile::load(dir.path()).unwrap(), RcFile::default());
    }

    #[test]
    fn rc_file_reads_export_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(RC_FILE_NAME),
            "options:\n  output: build/openapi.yaml\n  skipAnnotations: true\n",
        )
        .unwrap();

        let rc = RcFile::load(dir.path()).unwrap();

        assert_eq!(rc.options.output, Some(PathBuf::from("build/openapi.yaml")));
        assert_eq!(rc.options.skip_annotations, Some(true));
    }

    #[test]
    fn rc_file_rejects_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(RC_FILE_NAME), "options: [unclosed").unwrap();

        let err = RcFile::load(dir.path()).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidRcFile { .. }));
        assert!(err.to_string().contains(RC_FILE_NAME));
    }
}
