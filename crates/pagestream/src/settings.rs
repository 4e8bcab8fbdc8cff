//! Settings files.
//!
//! Every section is optional:
//!
//! ```toml
//! token_env = "GITHUB_TOKEN"
//!
//! [query]
//! state = "open"
//! labels = ["Type: Bug"]
//! sort = "updated"
//! direction = "desc"
//! page_size = 50
//!
//! [viewport]
//! estimated_item_size = 120
//! overscan = 8
//! prefetch_threshold_px = 900.0
//!
//! [github]
//! owner = "facebook"
//! repo = "react"
//! ```

use std::path::{Path, PathBuf};

use pagestream_core::{QueryConfig, ViewportConfig};
use serde::{Deserialize, Serialize};

#[cfg(feature = "networking")]
use pagestream_net::GitHubConfig;

/// Errors from loading or saving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The file could not be read or written.
    #[error("failed to access settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or has fields of the wrong type.
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
    /// The settings could not be rendered as TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Everything needed to set up a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Environment variable holding the API token. Defaults to
    /// `GITHUB_TOKEN`.
    pub token_env: Option<String>,
    /// Which records to list.
    pub query: QueryConfig,
    /// Window and prefetch tuning.
    pub viewport: ViewportConfig,
    /// Where the records come from.
    #[cfg(feature = "networking")]
    pub github: GitHubConfig,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// Read settings from the TOML file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&text)?;
        tracing::debug!(target: "pagestream::settings", path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Render the settings as TOML.
    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the settings to `path` as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_toml_string()?).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The GitHub settings with the token read from [`token_env`](Self::token_env).
    #[cfg(feature = "networking")]
    pub fn github_config(&self) -> GitHubConfig {
        let var = self
            .token_env
            .as_deref()
            .unwrap_or(pagestream_net::github::DEFAULT_TOKEN_ENV);
        self.github.clone().with_token_from(var)
    }
}
