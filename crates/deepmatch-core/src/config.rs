//! Comparison settings.
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `DEEPMATCH_ROOT_NAME` | First element of error paths (default: `DATA`) |
//! | `DEEPMATCH_BE_LAX` | Allow convertible-but-different types (`1`/`true`) |
//! | `DEEPMATCH_BOOLEAN_ONLY` | Skip building detailed errors (`1`/`true`) |
//! | `DEEPMATCH_MAX_DEPTH` | Reject data nested deeper than this |

use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

pub const ENV_ROOT_NAME: &str = "DEEPMATCH_ROOT_NAME";
pub const ENV_BE_LAX: &str = "DEEPMATCH_BE_LAX";
pub const ENV_BOOLEAN_ONLY: &str = "DEEPMATCH_BOOLEAN_ONLY";
pub const ENV_MAX_DEPTH: &str = "DEEPMATCH_MAX_DEPTH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextConfig {
    pub root_name: String,
    pub be_lax: bool,
    pub boolean_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            root_name: "DATA".to_string(),
            be_lax: false,
            boolean_only: false,
            max_depth: None,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

impl ContextConfig {
    /// Defaults overridden by `DEEPMATCH_*` variables. Unparseable values
    /// are ignored with a warning.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(name) = std::env::var(ENV_ROOT_NAME) {
            if !name.trim().is_empty() {
                self.root_name = name.trim().to_string();
            }
        }
        for (var, slot) in [
            (ENV_BE_LAX, &mut self.be_lax),
            (ENV_BOOLEAN_ONLY, &mut self.boolean_only),
        ] {
            if let Ok(raw) = std::env::var(var) {
                match parse_flag(&raw) {
                    Some(v) => *slot = v,
                    None => tracing::warn!(var, value = %raw, "ignoring unparseable flag"),
                }
            }
        }
        if let Ok(raw) = std::env::var(ENV_MAX_DEPTH) {
            match raw.trim().parse::<usize>() {
                Ok(0) => self.max_depth = None,
                Ok(n) => self.max_depth = Some(n),
                Err(e) => tracing::warn!(var = ENV_MAX_DEPTH, value = %raw, error = %e, "ignoring unparseable depth"),
            }
        }
        self
    }

    /// Loads a YAML (`.yaml`/`.yml`) or JSON config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let cfg = if is_yaml {
            Self::from_yaml_str(&raw)
        } else {
            serde_json::from_str(&raw).map_err(anyhow::Error::from)
        }
        .with_context(|| format!("failed to parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?cfg, "loaded comparison config");
        Ok(cfg)
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn lax(mut self, on: bool) -> Self {
        self.be_lax = on;
        self
    }

    pub fn boolean(mut self, on: bool) -> Self {
        self.boolean_only = on;
        self
    }

    pub fn root(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }
}
