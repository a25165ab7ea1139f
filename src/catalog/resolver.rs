use regex::Regex;
use std::sync::{Arc, LazyLock};

use crate::{Error, Result};

use super::{
    source::CatalogSources,
    types::{BdixCatalog, BdixChannel, CatalogNumber, Channel, Playlist},
};

static XUI_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)xui-id="([^"]+)""#).expect("valid xui-id pattern"));

/// Maps route identifiers to stream URLs using the matching catalog.
pub struct ChannelResolver {
    sources: Arc<CatalogSources>,
}

impl ChannelResolver {
    pub fn new(sources: Arc<CatalogSources>) -> Self {
        Self { sources }
    }

    /// Stream URL of the primary-catalog channel numbered `number`.
    pub async fn by_number(&self, number: f64) -> Result<String> {
        let playlist = self.sources.fetch_playlist().await?;
        let channel = find_channel(&playlist, number)
            .ok_or_else(|| Error::ChannelNotFound(number.to_string()))?;

        tracing::info!(
            "Channel found #{} -> name={:?} stream_path={:?} url={}",
            number,
            channel.name.as_deref().unwrap_or_default(),
            channel.stream_path.as_deref().unwrap_or_default(),
            channel.stream_url
        );
        Ok(channel.stream_url.clone())
    }

    pub async fn by_bdix_number(&self, number: f64) -> Result<String> {
        let catalog = self.sources.fetch_bdix_channels().await?;
        let channel = find_bdix_channel(&catalog, number).ok_or_else(|| {
            tracing::warn!("Bdix channel #{} not found", number);
            Error::ChannelNotFound(number.to_string())
        })?;

        tracing::info!(
            "Bdix channel found #{} -> name={:?}",
            number,
            channel.name.as_deref().unwrap_or_default()
        );
        Ok(channel.m3u8_url.clone())
    }

    pub async fn by_xui_id(&self, xui_id: &str) -> Result<String> {
        let text = self.sources.fetch_nvision_m3u().await?;
        let stream_url = find_stream_by_xui_id(&text, xui_id).ok_or_else(|| {
            tracing::warn!("xui-id {} not found in nvision playlist", xui_id);
            Error::ChannelNotFound(xui_id.to_string())
        })?;

        Ok(stream_url.to_string())
    }
}

/// First channel whose number is numerically equal to `number`.
pub fn find_channel(playlist: &Playlist, number: f64) -> Option<&Channel> {
    playlist.channels.iter().find(|channel| {
        channel
            .number
            .as_ref()
            .and_then(|n| n.as_number())
            .is_some_and(|n| n == number)
    })
}

/// First BDIX channel whose number has the same string form as `number`.
pub fn find_bdix_channel(catalog: &BdixCatalog, number: f64) -> Option<&BdixChannel> {
    let key = CatalogNumber::Float(number).to_key();
    catalog
        .channels
        .iter()
        .find(|channel| channel.number.as_ref().is_some_and(|n| n.to_key() == key))
}

/// Stream URL for the first entry tagged `xui-id="<xui_id>"`: the next line
/// that is neither blank nor a `#` comment.
pub fn find_stream_by_xui_id<'a>(m3u: &'a str, xui_id: &str) -> Option<&'a str> {
    if xui_id.is_empty() {
        return None;
    }

    let lines: Vec<&str> = m3u.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        let tagged = XUI_ID
            .captures(line)
            .and_then(|caps| caps.get(1))
            .is_some_and(|id| id.as_str() == xui_id);
        if !tagged {
            continue;
        }

        let url = lines[i + 1..]
            .iter()
            .map(|candidate| candidate.trim())
            .find(|candidate| !candidate.is_empty() && !candidate.starts_with('#'));
        if url.is_some() {
            return url;
        }
    }
    None
}
