//! Text manager configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::utils::expand_language;

fn default_language() -> String {
    "English".to_string()
}
fn default_true() -> bool {
    true
}
fn default_string_file() -> String {
    "data/Generals.str".to_string()
}
fn default_csf_file() -> String {
    "data/{language}/Generals.csf".to_string()
}
fn default_title_label() -> String {
    "GUI:Command&ConquerGenerals".to_string()
}

/// Where the main string table comes from.
///
/// Path fields may contain `{language}`, replaced by [`TextConfig::language`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextConfig {
    /// Current language, used to pick the localized file
    #[serde(default = "default_language")]
    pub language: String,
    /// Try the legacy `.str` file before the compiled one
    #[serde(default = "default_true")]
    pub use_string_file: bool,
    #[serde(default = "default_string_file")]
    pub string_file: String,
    #[serde(default = "default_csf_file")]
    pub csf_file: String,
    /// Label fetched once after loading, for the host's window title
    #[serde(default = "default_title_label")]
    pub title_label: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            use_string_file: true,
            string_file: default_string_file(),
            csf_file: default_csf_file(),
            title_label: default_title_label(),
        }
    }
}

impl TextConfig {
    /// Load a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load a JSON config file, or return the defaults if it is missing or
    /// unreadable.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Using default text config ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Legacy file path for the current language.
    pub fn string_path(&self) -> String {
        expand_language(&self.string_file, &self.language)
    }

    /// Compiled file path for the current language.
    pub fn csf_path(&self) -> String {
        expand_language(&self.csf_file, &self.language)
    }
}
