use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{NormalizerConfig, PayloadConfig};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub normalizer: Option<NormalizerSection>,
    pub payload: Option<PayloadSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerSection {
    pub max_input_len: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadSection {
    pub must_match_categories: Option<Vec<String>>,
}

/// Platform config directory path: `<config_dir>/docmatch/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("docmatch").join("config.toml"))
}

/// Load config by cascading CWD `.docmatch.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".docmatch.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed; a parse failure is logged.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Some(config)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        normalizer: Some(NormalizerSection {
            max_input_len: overlay
                .normalizer
                .as_ref()
                .and_then(|n| n.max_input_len)
                .or_else(|| base.normalizer.as_ref().and_then(|n| n.max_input_len)),
        }),
        payload: Some(PayloadSection {
            must_match_categories: overlay
                .payload
                .as_ref()
                .and_then(|p| p.must_match_categories.clone())
                .or_else(|| {
                    base.payload
                        .as_ref()
                        .and_then(|p| p.must_match_categories.clone())
                }),
        }),
    }
}

impl ConfigFile {
    /// Apply the values set in this file on top of `config`.
    pub fn apply(&self, mut config: PayloadConfig) -> PayloadConfig {
        if let Some(len) = self.normalizer.as_ref().and_then(|n| n.max_input_len) {
            config.normalizer = NormalizerConfig::new().max_input_len(len);
        }
        if let Some(categories) = self
            .payload
            .as_ref()
            .and_then(|p| p.must_match_categories.clone())
        {
            config.must_match_categories = categories;
        }
        config
    }
}

impl From<ConfigFile> for PayloadConfig {
    fn from(file: ConfigFile) -> Self {
        file.apply(PayloadConfig::default())
    }
}
