// src/client.rs
//! Session-scoped entry point: one token slot, one error normalizer and one
//! transport per backend, shared by every service handed out.

use crate::app_log;
use crate::core::{ApiError, Backend, ErrorNormalizer, TokenSlot, TransportClient, TransportOptions};
use crate::environment::EnvironmentConfig;
use crate::realtime::RealtimeSettings;
use crate::services::orgs::orgs_service;
use crate::services::{
    AiService, ApplicationsService, AuthService, JobsService, NotificationsService, OrgsService,
    UploadsService, UsersService,
};
use std::future::Future;
use std::sync::Arc;

#[derive(Clone)]
pub struct PortalClient {
    tokens: TokenSlot,
    normalizer: Arc<ErrorNormalizer>,
    primary: TransportClient,
    ai: TransportClient,
    realtime: RealtimeSettings,
}

impl PortalClient {
    pub fn new(config: &EnvironmentConfig) -> Result<Self, ApiError> {
        let tokens = TokenSlot::new();
        let normalizer = Arc::new(ErrorNormalizer::new(
            config.primary_api_url.as_str(),
            config.ai_api_url.as_str(),
        ));
        let options = TransportOptions {
            timeout: config.timeout(),
            with_credentials: config.with_credentials,
        };

        let primary = TransportClient::new(
            Backend::Primary,
            &config.primary_api_url,
            tokens.clone(),
            normalizer.clone(),
            options.clone(),
        )?;
        let ai = TransportClient::new(
            Backend::Ai,
            &config.ai_api_url,
            tokens.clone(),
            normalizer.clone(),
            options,
        )?;

        app_log!(
            info,
            "Portal client ready: primary={} ai={}",
            primary.base_url(),
            ai.base_url()
        );

        Ok(Self {
            tokens,
            normalizer,
            primary,
            ai,
            realtime: RealtimeSettings::from(config),
        })
    }

    /// Register the session's token supplier on both transports at once.
    pub fn sign_in_with<F, Fut>(&self, supplier: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<String>> + Send + 'static,
    {
        self.tokens.set(supplier);
        app_log!(debug, "Token supplier registered");
    }

    pub fn sign_out(&self) {
        self.tokens.clear();
        app_log!(debug, "Token supplier cleared");
    }

    pub fn tokens(&self) -> &TokenSlot {
        &self.tokens
    }

    pub fn normalizer(&self) -> &ErrorNormalizer {
        &self.normalizer
    }

    pub fn primary(&self) -> &TransportClient {
        &self.primary
    }

    pub fn ai(&self) -> &TransportClient {
        &self.ai
    }

    pub fn realtime(&self) -> &RealtimeSettings {
        &self.realtime
    }

    // ===== Services =====

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.primary.clone())
    }

    pub fn jobs(&self) -> JobsService {
        JobsService::new(self.primary.clone())
    }

    pub fn orgs(&self) -> OrgsService {
        orgs_service(self.primary.clone())
    }

    pub fn applications(&self) -> ApplicationsService {
        ApplicationsService::new(self.primary.clone())
    }

    pub fn notifications(&self) -> NotificationsService {
        NotificationsService::new(self.primary.clone())
    }

    pub fn uploads(&self) -> UploadsService {
        UploadsService::new(self.primary.clone())
    }

    pub fn ai_service(&self) -> AiService {
        AiService::new(self.ai.clone())
    }

    pub fn users(&self) -> UsersService {
        UsersService::new(self.ai.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorSource;

    fn config() -> EnvironmentConfig {
        EnvironmentConfig {
            primary_api_url: "https://api.jobs.test".into(),
            ai_api_url: "https://ai.jobs.test".into(),
            realtime_url: Some("https://api.jobs.test/hubs/notifications".into()),
            realtime_enabled: true,
            ..EnvironmentConfig::default()
        }
    }

    #[test]
    fn test_transports_are_tagged() {
        let client = PortalClient::new(&config()).unwrap();
        assert_eq!(client.primary().backend(), Backend::Primary);
        assert_eq!(client.ai().backend(), Backend::Ai);
        assert_eq!(client.ai().base_url(), "https://ai.jobs.test");
        assert_eq!(
            client.normalizer().source_for_url("https://ai.jobs.test/v1/jobs"),
            ErrorSource::Ai
        );
    }

    #[tokio::test]
    async fn test_sign_in_and_out_share_one_slot() {
        let client = PortalClient::new(&config()).unwrap();
        client.sign_in_with(|| async { Some("abc".to_string()) });
        assert_eq!(client.primary().tokens().token().await.as_deref(), Some("abc"));
        assert_eq!(client.ai().tokens().token().await.as_deref(), Some("abc"));

        client.sign_out();
        assert!(client.ai().tokens().token().await.is_none());
        let hub = client.realtime().handshake(client.tokens()).await.unwrap();
        assert_eq!(hub.access_token, "");
    }
}
