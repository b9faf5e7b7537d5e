//! Envelope resolution: sender defaults, recipient normalization, and the
//! debug redirect.

use tracing::info;

use outbox_core::config::mail::MailConfig;
use outbox_entity::notification::Notification;

/// The resolved addressing of a notification, ready for a delivery
/// mechanism to consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Sender address.
    pub sender: String,
    /// Display name for the sender, if configured.
    pub sender_name: Option<String>,
    /// Recipient addresses after normalization or debug redirection.
    pub recipients: Vec<String>,
    /// Optional reply-to address.
    pub reply_to: Option<String>,
    /// Subject line, prefixed in debug mode.
    pub subject: String,
}

/// Normalize raw address entries.
///
/// Each entry may itself be a comma-separated list. Entries are split,
/// trimmed, and empty results dropped; order is preserved.
pub fn normalize_addresses(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Resolves notification records into concrete envelopes.
///
/// All defaults come from the [`MailConfig`] handed in at construction;
/// the resolver never reads ambient global state.
#[derive(Debug, Clone)]
pub struct EnvelopeResolver {
    config: MailConfig,
}

impl EnvelopeResolver {
    /// Create a resolver from mail configuration.
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Return the mail configuration backing this resolver.
    pub fn config(&self) -> &MailConfig {
        &self.config
    }

    /// Resolve the envelope for a notification record.
    ///
    /// A record is in debug mode when its own flag is set or when the
    /// debug redirect is enabled system-wide. Debug envelopes go to the
    /// configured test recipients and carry a prefixed subject.
    pub fn resolve(&self, record: &Notification) -> Envelope {
        let sender = if record.sender.trim().is_empty() {
            self.config.from_address.clone()
        } else {
            record.sender.clone()
        };

        let reply_to = record
            .reply_to
            .as_deref()
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .map(ToString::to_string);

        if record.is_debug || self.config.debug.enabled {
            let recipients = normalize_addresses(&self.config.debug.recipients);
            if self.config.debug.log_envelope {
                info!(
                    notification_id = %record.id,
                    original = ?record.recipients,
                    redirected = ?recipients,
                    subject = %record.subject,
                    "Envelope redirected in debug mode"
                );
            }
            return Envelope {
                sender,
                sender_name: self.config.from_name.clone(),
                recipients,
                reply_to,
                subject: format!("{} {}", self.config.debug.subject_prefix, record.subject),
            };
        }

        Envelope {
            sender,
            sender_name: self.config.from_name.clone(),
            recipients: normalize_addresses(&record.recipients),
            reply_to,
            subject: record.subject.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use outbox_core::config::mail::MailDebugConfig;
    use outbox_entity::notification::{NotificationStatus, Priority};
    use uuid::Uuid;

    fn record() -> Notification {
        let now = Utc::now();
        Notification {
            id: Uuid::new_v4(),
            owner_type: None,
            owner_id: None,
            status: NotificationStatus::Pending,
            is_debug: false,
            sender: "billing@example.com".to_string(),
            recipients: vec!["a@example.com".to_string(), "b@example.com".to_string()],
            reply_to: None,
            subject: "Invoice ready".to_string(),
            error_message: None,
            category: "billing".to_string(),
            template_name: None,
            template_data: None,
            message: None,
            metadata: None,
            priority: Priority::Normal,
            attempts: 0,
            max_attempts: 3,
            sent_at: None,
            scheduled_at: None,
            failed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_normalize_addresses() {
        let raw = vec![
            " a@example.com , b@example.com".to_string(),
            String::new(),
            "  ".to_string(),
            "c@example.com".to_string(),
        ];
        assert_eq!(
            normalize_addresses(&raw),
            vec!["a@example.com", "b@example.com", "c@example.com"]
        );
    }

    #[test]
    fn test_blank_sender_falls_back_to_config() {
        let resolver = EnvelopeResolver::new(MailConfig {
            from_address: "system@example.com".to_string(),
            ..Default::default()
        });
        let mut n = record();
        n.sender = "  ".to_string();

        let envelope = resolver.resolve(&n);
        assert_eq!(envelope.sender, "system@example.com");
        assert_eq!(envelope.subject, "Invoice ready");
        assert_eq!(envelope.recipients.len(), 2);
    }

    #[test]
    fn test_debug_flag_redirects_recipients() {
        let resolver = EnvelopeResolver::new(MailConfig {
            debug: MailDebugConfig {
                enabled: false,
                recipients: vec!["qa@example.com".to_string()],
                ..Default::default()
            },
            ..Default::default()
        });
        let mut n = record();
        n.is_debug = true;

        let envelope = resolver.resolve(&n);
        assert_eq!(envelope.recipients, vec!["qa@example.com"]);
        assert_eq!(envelope.subject, "[DEBUG] Invoice ready");
        assert_eq!(envelope.sender, "billing@example.com");
    }

    #[test]
    fn test_system_wide_debug_overrides_clean_records() {
        let resolver = EnvelopeResolver::new(MailConfig {
            debug: MailDebugConfig {
                enabled: true,
                recipients: vec!["qa@example.com".to_string()],
                subject_prefix: "[TEST]".to_string(),
                ..Default::default()
            },
            ..Default::default()
        });

        let envelope = resolver.resolve(&record());
        assert_eq!(envelope.recipients, vec!["qa@example.com"]);
        assert_eq!(envelope.subject, "[TEST] Invoice ready");
    }

    #[test]
    fn test_blank_reply_to_is_dropped() {
        let resolver = EnvelopeResolver::new(MailConfig::default());
        let mut n = record();
        n.reply_to = Some("   ".to_string());
        assert_eq!(resolver.resolve(&n).reply_to, None);

        n.reply_to = Some(" support@example.com ".to_string());
        assert_eq!(
            resolver.resolve(&n).reply_to.as_deref(),
            Some("support@example.com")
        );
    }
}
