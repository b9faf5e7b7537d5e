//! Mail envelope configuration.
//!
//! Sender defaults and the debug redirect are explicit configuration
//! passed into the envelope resolver, never ambient global lookups.

use serde::{Deserialize, Serialize};

/// Mail envelope configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Sender address used when a notification does not specify one.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Display name for the default sender.
    #[serde(default)]
    pub from_name: Option<String>,
    /// Ceiling on delivery attempts when a notification does not specify one.
    #[serde(default = "default_max_attempts")]
    pub default_max_attempts: i32,
    /// Debug redirect settings.
    #[serde(default)]
    pub debug: MailDebugConfig,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_address: default_from_address(),
            from_name: None,
            default_max_attempts: default_max_attempts(),
            debug: MailDebugConfig::default(),
        }
    }
}

/// Debug-mode redirect configuration.
///
/// When enabled, resolved envelopes are redirected to a fixed set of test
/// recipients instead of the notification's real recipient list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailDebugConfig {
    /// Whether debug redirection is enabled system-wide.
    #[serde(default)]
    pub enabled: bool,
    /// Test addresses that replace the real recipients in debug mode.
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Prefix added to the subject line of redirected messages.
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
    /// Whether to log the envelope when a redirection happens.
    #[serde(default = "default_true")]
    pub log_envelope: bool,
}

impl Default for MailDebugConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            recipients: Vec::new(),
            subject_prefix: default_subject_prefix(),
            log_envelope: default_true(),
        }
    }
}

fn default_from_address() -> String {
    "no-reply@localhost".to_string()
}

fn default_max_attempts() -> i32 {
    3
}

fn default_subject_prefix() -> String {
    "[DEBUG]".to_string()
}

fn default_true() -> bool {
    true
}
