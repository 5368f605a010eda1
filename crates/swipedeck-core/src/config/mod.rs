//! Engine configuration.
//!
//! Clients provision an `EngineConfig` from their profile file or from
//! defaults. The exclusion window defaults to one calendar day.

use serde::{Deserialize, Serialize};

use crate::engine::ExclusionWindow;
use crate::error::{Error, Result};

const DEFAULT_WINDOW_HOURS: u32 = 24;

/// Which likes invalidate an armed undo token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndoInvalidation {
    /// Any like, on any target, clears the pending undo
    #[default]
    AnyLike,
    /// Only a like on the armed target clears the pending undo
    SameTarget,
}

impl std::str::FromStr for UndoInvalidation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "any_like" => Ok(Self::AnyLike),
            "same_target" => Ok(Self::SameTarget),
            other => Err(Error::InvalidInput(format!(
                "unknown undo invalidation scope '{other}'"
            ))),
        }
    }
}

/// Tunables for the exclusion and undo engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default = "default_window_hours")]
    pub exclusion_window_hours: u32,
    #[serde(default)]
    pub undo_invalidation: UndoInvalidation,
}

const fn default_window_hours() -> u32 {
    DEFAULT_WINDOW_HOURS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exclusion_window_hours: DEFAULT_WINDOW_HOURS,
            undo_invalidation: UndoInvalidation::AnyLike,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config payload.
    pub fn from_json(payload: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.exclusion_window_hours == 0 {
            return Err(Error::InvalidInput(
                "exclusion_window_hours must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured exclusion window.
    pub fn exclusion_window(&self) -> ExclusionWindow {
        ExclusionWindow::from_hours(self.exclusion_window_hours)
    }
}
