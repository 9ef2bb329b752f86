// src/services/mod.rs
//! Typed per-domain services. Each one wraps the transport for its backend
//! and inherits its auth and error normalization.

pub mod ai;
pub mod applications;
pub mod auth;
pub mod jobs;
pub mod notifications;
pub mod orgs;
pub mod resource;
pub mod uploads;
pub mod users;

pub use ai::AiService;
pub use applications::ApplicationsService;
pub use auth::AuthService;
pub use jobs::JobsService;
pub use notifications::NotificationsService;
pub use orgs::OrgsService;
pub use resource::ResourceService;
pub use uploads::UploadsService;
pub use users::UsersService;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::{Backend, ErrorNormalizer, TokenSlot, TransportClient, TransportOptions};
    use std::sync::Arc;
    use wiremock::MockServer;

    /// Transport for `backend` pointed at the mock server; the other backend gets an unroutable base.
    pub fn transport(server: &MockServer, backend: Backend, tokens: TokenSlot) -> TransportClient {
        let normalizer = match backend {
            Backend::Primary => ErrorNormalizer::new(server.uri(), "http://ai.invalid"),
            Backend::Ai => ErrorNormalizer::new("http://primary.invalid", server.uri()),
        };
        TransportClient::new(
            backend,
            &server.uri(),
            tokens,
            Arc::new(normalizer),
            TransportOptions::default(),
        )
        .unwrap()
    }
}
