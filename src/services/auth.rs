// src/services/auth.rs
use crate::core::endpoints::primary;
use crate::core::{ApiError, TransportClient};
use crate::types::User;

#[derive(Clone)]
pub struct AuthService {
    client: TransportClient,
}

impl AuthService {
    pub fn new(client: TransportClient) -> Self {
        Self { client }
    }

    /// The user behind the current bearer token.
    pub async fn me(&self) -> Result<User, ApiError> {
        self.client.get(primary::AUTH_ME.path()).await
    }
}
