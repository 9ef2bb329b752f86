// src/core/token.rs
//! Swappable bearer token supplier shared by every transport of one session

use arc_swap::ArcSwapOption;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type TokenFuture = Pin<Box<dyn Future<Output = Option<String>> + Send>>;

struct Supplier {
    call: Box<dyn Fn() -> TokenFuture + Send + Sync>,
}

/// Single-slot holder for the current token supplier.
///
/// Clones share the slot. Registering a supplier replaces the previous one
/// atomically; each request snapshots the slot once, so a request never sees
/// two suppliers.
#[derive(Clone)]
pub struct TokenSlot {
    inner: Arc<ArcSwapOption<Supplier>>,
}

impl TokenSlot {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ArcSwapOption::empty()),
        }
    }

    /// Register an async supplier, e.g. one asking an identity provider for a fresh session token.
    pub fn set<F, Fut>(&self, supplier: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<String>> + Send + 'static,
    {
        let supplier = Supplier {
            call: Box::new(move || -> TokenFuture { Box::pin(supplier()) }),
        };
        self.inner.store(Some(Arc::new(supplier)));
    }

    pub fn set_sync<F>(&self, supplier: F)
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.set(move || {
            let token = supplier();
            async move { token }
        });
    }

    pub fn set_static(&self, token: impl Into<String>) {
        let token = token.into();
        self.set_sync(move || Some(token.clone()));
    }

    /// Drop the current supplier (sign-out). Later requests go out unauthenticated.
    pub fn clear(&self) {
        self.inner.store(None);
    }

    pub fn is_set(&self) -> bool {
        self.inner.load().is_some()
    }

    /// Resolve the current token. Blank tokens count as no token.
    pub async fn token(&self) -> Option<String> {
        let supplier = self.inner.load_full()?;
        (supplier.call)()
            .await
            .filter(|token| !token.trim().is_empty())
    }

    /// `Bearer <token>` for the current supplier, if it produced one.
    pub async fn bearer(&self) -> Option<String> {
        self.token().await.map(|token| format!("Bearer {}", token))
    }
}

impl Default for TokenSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TokenSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSlot")
            .field("is_set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_unset_slot_yields_no_token() {
        let slot = TokenSlot::new();
        assert!(!slot.is_set());
        assert_eq!(slot.token().await, None);
        assert_eq!(slot.bearer().await, None);
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let slot = TokenSlot::new();
        slot.set_static("first");
        slot.set_static("second");
        assert_eq!(slot.bearer().await.as_deref(), Some("Bearer second"));
    }

    #[tokio::test]
    async fn test_clones_share_the_slot() {
        let slot = TokenSlot::new();
        let handle = slot.clone();
        handle.set_static("tok123");
        assert_eq!(slot.token().await.as_deref(), Some("tok123"));

        slot.clear();
        assert!(!handle.is_set());
        assert_eq!(handle.token().await, None);
    }

    #[tokio::test]
    async fn test_async_supplier_is_invoked_per_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let slot = TokenSlot::new();
        slot.set(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::task::yield_now().await;
                Some(format!("tok{}", n))
            }
        });

        assert_eq!(slot.token().await.as_deref(), Some("tok0"));
        assert_eq!(slot.token().await.as_deref(), Some("tok1"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_blank_or_missing_token_is_dropped() {
        let slot = TokenSlot::new();
        slot.set_sync(|| Some("   ".to_string()));
        assert_eq!(slot.token().await, None);

        slot.set_sync(|| None);
        assert!(slot.is_set());
        assert_eq!(slot.bearer().await, None);
    }
}
