use std::sync::Arc;

use crate::{
    Config, Result,
    catalog::{CatalogSources, ChannelResolver, Clock, SystemClock},
    gate::RedirectEngine,
    proxy::ProxyClient,
    stream::ManifestEngine,
    subscription::SubscriptionOracle,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: ProxyClient,
    pub sources: Arc<CatalogSources>,
    pub resolver: Arc<ChannelResolver>,
    pub gate: Arc<RedirectEngine>,
    pub manifests: Arc<ManifestEngine>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let client = ProxyClient::new()?;
        let sources = Arc::new(CatalogSources::new(&config, client.clone(), clock));
        let oracle = Arc::new(SubscriptionOracle::new(
            client.clone(),
            config.subscription_url_template.clone(),
        ));

        Ok(Self {
            resolver: Arc::new(ChannelResolver::new(sources.clone())),
            gate: Arc::new(RedirectEngine::new(oracle, config.expired_video_url.clone())),
            manifests: Arc::new(ManifestEngine::new(
                client.clone(),
                config.playlist_url.clone(),
                config.proxy_segments,
                config.fallback_mode,
            )),
            sources,
            client,
            config: Arc::new(config),
        })
    }
}
