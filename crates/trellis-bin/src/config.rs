// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Daemon configuration loading.
//!
//! Settings are read from a YAML or TOML file selected by extension. A
//! missing file is not an error for `run` (the defaults serve on the
//! standard port); `validate` loads strictly.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BinError, BinResult};
use trellis_net::NetConfig;

// =============================================================================
// Settings
// =============================================================================

/// Daemon settings.
///
/// # Example file
///
/// ```yaml
/// application_uri: "urn:factory:trellis"
/// net:
///   bind_address: "0.0.0.0:4840"
///   max_sessions: 32
///   idle_timeout: "2m"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// URI of the server's application namespace (index 1).
    #[serde(default = "default_application_uri")]
    pub application_uri: String,

    /// Network layer configuration.
    #[serde(default)]
    pub net: NetConfig,
}

fn default_application_uri() -> String {
    "urn:trellis:server".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            application_uri: default_application_uri(),
            net: NetConfig::default(),
        }
    }
}

impl Settings {
    /// Loads settings from a file, selecting the parser by extension.
    pub fn load(path: &Path) -> BinResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| BinError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;

        let settings: Settings = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| BinError::config_parse(path, e.to_string()))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| BinError::config_parse(path, e.to_string()))?,
            _ => {
                return Err(BinError::ConfigFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings, falling back to the defaults when the file does not
    /// exist.
    pub fn load_or_default(path: &Path) -> BinResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            info!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Validates the settings.
    pub fn validate(&self) -> BinResult<Self> {
        if self.application_uri.is_empty() {
            return Err(BinError::config_parse(
                "<settings>",
                "application_uri must not be empty",
            ));
        }
        self.net.validate()?;
        Ok(self.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "trellis.yaml",
            "application_uri: urn:test\nnet:\n  bind_address: \"127.0.0.1:14840\"\n",
        );
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.application_uri, "urn:test");
        assert_eq!(settings.net.bind_address, "127.0.0.1:14840");
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "trellis.toml",
            "application_uri = \"urn:test\"\n[net]\nbind_address = \"127.0.0.1:14840\"\n",
        );
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.net.bind_address, "127.0.0.1:14840");
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "trellis.ini", "[net]\n");
        assert!(matches!(
            Settings::load(&path),
            Err(BinError::ConfigFormat { .. })
        ));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "trellis.yaml",
            "net:\n  bind_address: \"not-an-address\"\n",
        );
        assert!(Settings::load(&path).is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(settings.net.bind_address, "0.0.0.0:4840");
    }
}
