// src/realtime.rs
//! Connection parameters for the notifications hub. The duplex connection
//! itself is owned by the caller; this module only decides whether to connect
//! and with which credential.

use crate::core::TokenSlot;
use crate::environment::EnvironmentConfig;
use serde::Serialize;

/// Server event carrying a new notification.
pub const NOTIFICATION_EVENT: &str = "Notification";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RealtimeSettings {
    pub url: Option<String>,
    pub enabled: bool,
}

impl From<&EnvironmentConfig> for RealtimeSettings {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            url: config.realtime_url.clone(),
            enabled: config.realtime_enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeHandshake {
    pub url: String,
    /// Empty when no session is active; the hub decides whether to accept it.
    pub access_token: String,
}

impl RealtimeSettings {
    pub fn is_active(&self) -> bool {
        self.enabled && self.url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// Resolve the hub URL and current token. `None` when realtime is off or unconfigured.
    pub async fn handshake(&self, tokens: &TokenSlot) -> Option<RealtimeHandshake> {
        if !self.is_active() {
            return None;
        }
        let url = self.url.clone()?;
        let access_token = tokens.token().await.unwrap_or_default();
        Some(RealtimeHandshake { url, access_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(url: Option<&str>, enabled: bool) -> RealtimeSettings {
        RealtimeSettings {
            url: url.map(str::to_string),
            enabled,
        }
    }

    #[tokio::test]
    async fn test_disabled_or_unset_yields_none() {
        let tokens = TokenSlot::new();
        tokens.set_static("t");
        assert!(settings(Some("https://hub.test"), false)
            .handshake(&tokens)
            .await
            .is_none());
        assert!(settings(None, true).handshake(&tokens).await.is_none());
    }

    #[tokio::test]
    async fn test_handshake_token_or_empty() {
        let hub = settings(Some("https://hub.test/notifications"), true);
        let tokens = TokenSlot::new();

        let anonymous = hub.handshake(&tokens).await.unwrap();
        assert_eq!(anonymous.access_token, "");

        tokens.set(|| async { Some("session-9".to_string()) });
        let signed_in = hub.handshake(&tokens).await.unwrap();
        assert_eq!(signed_in.url, "https://hub.test/notifications");
        assert_eq!(signed_in.access_token, "session-9");
    }
}
