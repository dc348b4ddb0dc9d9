//! # Configuration
//!
//! Tunables for message actions. Embedders usually build this in code, but
//! it also deserializes from JSON so it can live next to the rest of the
//! client settings.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default cap on quoted body length, in characters.
pub const DEFAULT_MAX_QUOTE_BODY_CHARS: usize = 2048;

/// When to ask before deleting a message for everyone
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationMode {
    /// Ask every time
    Always,
    /// Ask until the user has accepted once
    #[default]
    FirstTimeOnly,
    /// Never ask
    Never,
}

/// Configuration for [`MessageActions`](crate::MessageActions)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ActionsConfig {
    /// Confirmation policy for delete-for-everyone
    pub delete_confirmation: ConfirmationMode,
    /// Trip a debug assertion on every reported failure
    pub assert_on_failure: bool,
    /// Quoted bodies longer than this are truncated
    pub max_quote_body_chars: usize,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            delete_confirmation: ConfirmationMode::default(),
            assert_on_failure: false,
            max_quote_body_chars: DEFAULT_MAX_QUOTE_BODY_CHARS,
        }
    }
}

impl ActionsConfig {
    /// Development profile: failures stop at a debug assertion.
    pub fn development() -> Self {
        Self {
            assert_on_failure: true,
            ..Self::default()
        }
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
