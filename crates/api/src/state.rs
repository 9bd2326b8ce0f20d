use std::sync::Arc;

use quire_core::auth::{AccountService, AuthorizationGate, TokenAuthority};
use quire_core::events::EventBus;
use quire_core::store::KvStore;
use quire_core::ContentService;

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    store: Arc<dyn KvStore>,
    config: AppConfig,
    event_bus: EventBus,
    content: ContentService,
    accounts: AccountService,
    tokens: TokenAuthority,
    gate: AuthorizationGate,
}

impl AppState {
    pub fn new(store: Arc<dyn KvStore>, config: AppConfig, event_bus: EventBus) -> Self {
        let tokens = TokenAuthority::new(config.jwt_secret.as_bytes(), config.jwt_ttl_secs);
        Self {
            inner: Arc::new(InnerState {
                content: ContentService::new(store.clone(), event_bus.clone()),
                accounts: AccountService::new(store.clone()),
                gate: AuthorizationGate::new(Arc::new(tokens.clone())),
                tokens,
                store,
                config,
                event_bus,
            }),
        }
    }

    pub fn store(&self) -> &dyn KvStore {
        self.inner.store.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }

    pub fn content(&self) -> &ContentService {
        &self.inner.content
    }

    pub fn accounts(&self) -> &AccountService {
        &self.inner.accounts
    }

    pub fn tokens(&self) -> &TokenAuthority {
        &self.inner.tokens
    }

    pub fn gate(&self) -> &AuthorizationGate {
        &self.inner.gate
    }
}
