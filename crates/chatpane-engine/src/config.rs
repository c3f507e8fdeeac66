//! Configuration types for the chat widget.
//!
//! This module defines which page elements the widget binds to and how the
//! bot replies. Configuration is JSON, passed in by the host page.

use serde::{Deserialize, Serialize};

use crate::host::ElementRole;

/// Widget configuration. Every field has a default matching the stock page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Selector of the submission source.
    #[serde(default = "default_form_selector")]
    pub form_selector: String,

    /// Selector of the text input.
    #[serde(default = "default_input_selector")]
    pub input_selector: String,

    /// Selector of the render target.
    #[serde(default = "default_chat_selector")]
    pub chat_selector: String,

    /// How the bot answers each user message.
    #[serde(default)]
    pub bot_reply: BotReply,
}

fn default_form_selector() -> String {
    "form".into()
}

fn default_input_selector() -> String {
    "textarea".into()
}

fn default_chat_selector() -> String {
    ".chat".into()
}

/// Bot reply policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BotReply {
    /// Repeat the user's text verbatim.
    #[default]
    Echo,
}

impl BotReply {
    /// Produce the bot's text for a user message.
    pub fn reply_to(self, input: &str) -> String {
        match self {
            Self::Echo => input.to_string(),
        }
    }
}

impl WidgetConfig {
    /// Parse configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    /// Serialize configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// The selector configured for `role`.
    pub fn selector_for(&self, role: ElementRole) -> &str {
        match role {
            ElementRole::Form => &self.form_selector,
            ElementRole::TextInput => &self.input_selector,
            ElementRole::ChatContainer => &self.chat_selector,
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            form_selector: default_form_selector(),
            input_selector: default_input_selector(),
            chat_selector: default_chat_selector(),
            bot_reply: BotReply::default(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
