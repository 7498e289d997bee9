//! Animator configuration with TOML file support.
//!
//! Options serialize to/from TOML so hosts can ship tuned timing presets
//! alongside their map styles.

mod animation;

use std::path::Path;

pub use animation::AnimationOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::AnimatorError;

/// Top-level options container. Sub-structs use `#[serde(default)]` so
/// partial TOML files work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Animation timing.
    pub animation: AnimationOptions,
}

impl Options {
    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, AnimatorError> {
        let content =
            std::fs::read_to_string(path).map_err(AnimatorError::Io)?;
        toml::from_str(&content)
            .map_err(|e| AnimatorError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), AnimatorError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AnimatorError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(AnimatorError::Io)?;
        }
        std::fs::write(path, content).map_err(AnimatorError::Io)
    }
}
