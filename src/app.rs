//! Application context: one API client and every store, shared through
//! Leptos context.
//!
//! SYSTEM CONTEXT
//! ==============
//! The root component calls [`provide_app_context`] once. Views fetch the
//! stores with [`use_app_context`]; nothing else constructs an `ApiClient`.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use leptos::prelude::*;

use crate::config::ClientConfig;
use crate::net::client::ApiClient;
use crate::net::transport::Transport;
use crate::state::dashboard::DashboardStore;
use crate::state::leagues::LeaguesStore;
use crate::state::pilots::PilotsStore;
use crate::state::prediction::PredictionStore;
use crate::state::session::Session;
use crate::util::navigation::Navigator;
use crate::util::storage::CredentialStore;

#[derive(Clone)]
pub struct AppContext {
    pub client: Arc<ApiClient>,
    pub session: Session,
    pub dashboard: DashboardStore,
    pub leagues: LeaguesStore,
    pub pilots: PilotsStore,
    pub prediction: PredictionStore,
}

impl AppContext {
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let client = Arc::new(ApiClient::with_default_pipeline(config, transport, store.clone(), navigator));
        Self {
            session: Session::new(client.clone(), store),
            dashboard: DashboardStore::new(client.clone()),
            leagues: LeaguesStore::new(client.clone()),
            pilots: PilotsStore::new(client.clone()),
            prediction: PredictionStore::new(client.clone()),
            client,
        }
    }

    /// Context wired to the browser (`hydrate`) or to offline stand-ins.
    pub fn for_platform(config: &ClientConfig) -> Self {
        #[cfg(feature = "hydrate")]
        {
            use crate::net::transport::GlooTransport;
            use crate::util::navigation::BrowserNavigator;
            use crate::util::storage::BrowserStorage;
            Self::new(config, Arc::new(GlooTransport), Arc::new(BrowserStorage), Arc::new(BrowserNavigator))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            use crate::net::transport::OfflineTransport;
            use crate::util::navigation::NoopNavigator;
            use crate::util::storage::MemoryStorage;
            Self::new(config, Arc::new(OfflineTransport), Arc::new(MemoryStorage::new()), Arc::new(NoopNavigator))
        }
    }
}

/// Resolve configuration, build the context, and provide it. In the
/// browser the stored session is restored in the background.
pub fn provide_app_context() -> AppContext {
    let config = ClientConfig::resolve().unwrap_or_else(|e| {
        leptos::logging::warn!("config error, using development defaults: {e}");
        ClientConfig::development()
    });
    let ctx = AppContext::for_platform(&config);
    provide_context(ctx.clone());

    #[cfg(feature = "hydrate")]
    {
        let session = ctx.session.clone();
        leptos::task::spawn_local(async move { session.init_auth().await });
    }

    ctx
}

#[must_use]
pub fn use_app_context() -> Option<AppContext> {
    use_context::<AppContext>()
}
