use crate::{
    Result,
    proxy::{ProxyClient, body_preview, client::SUBSCRIPTION_TIMEOUT},
};

use super::verdict::SubscriptionVerdict;

/// Client for the external subscription-status service.
#[derive(Clone)]
pub struct SubscriptionOracle {
    client: ProxyClient,
    url_template: String,
}

impl SubscriptionOracle {
    pub fn new(client: ProxyClient, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    /// Status URL for a subscriber, with the id percent-encoded into `{id}`.
    pub fn status_url(&self, subscriber: &str) -> String {
        self.url_template
            .replacen("{id}", &urlencoding::encode(subscriber), 1)
    }

    /// Whether `subscriber` is active. Never fails: a missing id, an error
    /// status, a timeout or any other failure all mean inactive.
    pub async fn check(&self, subscriber: Option<&str>) -> bool {
        let Some(subscriber) = subscriber.filter(|s| !s.is_empty()) else {
            return false;
        };

        match self.query(subscriber).await {
            Ok(verdict) => verdict.active,
            Err(e) => {
                tracing::warn!("Subscription check failed for {}: {}", subscriber, e);
                false
            }
        }
    }

    async fn query(&self, subscriber: &str) -> Result<SubscriptionVerdict> {
        let url = self.status_url(subscriber);
        tracing::info!("Checking subscriber={} -> {}", subscriber, url);

        let response = self.client.get(&url, None, SUBSCRIPTION_TIMEOUT).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Non-OK response ({}) for subscriber {}", status, subscriber);
            return Ok(SubscriptionVerdict::inactive());
        }

        let body = response.text().await?;
        tracing::debug!("Subscription response preview: {}", body_preview(&body));

        let verdict = SubscriptionVerdict::from_body(&body);
        match verdict.matched {
            Some(rule) => tracing::info!("Subscriber {} active ({})", subscriber, rule.describe()),
            None => tracing::info!("Subscriber {} not active", subscriber),
        }
        Ok(verdict)
    }
}
