use std::{sync::Arc, time::Duration};

use crate::{
    Config, Error, Result,
    proxy::{ProxyClient, client::CATALOG_TIMEOUT},
};

use super::{
    ttl::{Clock, TtlCache},
    types::{BdixCatalog, Playlist},
};

/// Fetchers for the three upstream catalogs.
///
/// The primary playlist is fetched live on every call. The nvision M3U text and
/// the BDIX catalog each sit behind their own [`TtlCache`].
pub struct CatalogSources {
    client: ProxyClient,
    playlist_url: String,
    nvision_url: Option<String>,
    bdix_url: Option<String>,
    ttl: Duration,
    nvision: TtlCache<Arc<String>>,
    bdix: TtlCache<Arc<BdixCatalog>>,
}

impl CatalogSources {
    pub fn new(config: &Config, client: ProxyClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            playlist_url: config.playlist_url.clone(),
            nvision_url: config.nvision_m3u_url.clone(),
            bdix_url: config.bdix_url.clone(),
            ttl: config.cache_ttl,
            nvision: TtlCache::new("nvision", clock.clone()),
            bdix: TtlCache::new("bdix", clock),
        }
    }

    /// Fetch the primary catalog. Never cached.
    pub async fn fetch_playlist(&self) -> Result<Playlist> {
        tracing::info!("Fetching playlist from {}", self.playlist_url);
        let playlist: Playlist = self
            .client
            .fetch_json(&self.playlist_url, CATALOG_TIMEOUT)
            .await
            .inspect_err(|e| tracing::error!("Playlist fetch failed: {}", e))?;
        tracing::info!("Fetched playlist with {} channels", playlist.channels.len());
        Ok(playlist)
    }

    /// Raw nvision M3U text.
    pub async fn fetch_nvision_m3u(&self) -> Result<Arc<String>> {
        let url = self
            .nvision_url
            .as_deref()
            .ok_or(Error::SourceNotConfigured("NVSIONBD_M3U"))?;
        let client = &self.client;

        self.nvision
            .get_or_refresh(self.ttl, || async move {
                tracing::info!("Fetching nvision playlist from {}", url);
                client.fetch_text(url, CATALOG_TIMEOUT).await.map(Arc::new)
            })
            .await
    }

    pub async fn fetch_bdix_channels(&self) -> Result<Arc<BdixCatalog>> {
        let url = self
            .bdix_url
            .as_deref()
            .ok_or(Error::SourceNotConfigured("BDIX_M3U"))?;
        let client = &self.client;

        self.bdix
            .get_or_refresh(self.ttl, || async move {
                tracing::info!("Fetching bdix channels from {}", url);
                client
                    .fetch_json::<BdixCatalog>(url, CATALOG_TIMEOUT)
                    .await
                    .map(Arc::new)
            })
            .await
    }
}
