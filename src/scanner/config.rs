//! Label configuration: per-kind enable flags and the optional host pattern.

use serde::{Deserialize, Serialize};

use super::error::{ActiveTextError, Result};

fn default_true() -> bool { true }

/// Per-kind enable flags. Regex has no flag: a configured pattern is always active.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnabledFlags {
    #[serde(default = "default_true")]
    pub mention_enabled: bool,
    #[serde(default = "default_true")]
    pub hashtag_enabled: bool,
    #[serde(default = "default_true")]
    pub url_enabled: bool,
}

impl Default for EnabledFlags {
    fn default() -> Self {
        Self {
            mention_enabled: true,
            hashtag_enabled: true,
            url_enabled: true,
        }
    }
}

impl EnabledFlags {
    pub fn none() -> Self {
        Self {
            mention_enabled: false,
            hashtag_enabled: false,
            url_enabled: false,
        }
    }
}

/// Full label configuration as accepted from the host
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct LabelConfig {
    #[serde(flatten)]
    pub flags: EnabledFlags,
    /// Source of the host pattern; compiled when the config is applied
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub case_insensitive: bool,
}

impl LabelConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ActiveTextError::InvalidConfig(e.to_string()))
    }
}
