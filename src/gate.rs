//! Subscription-gated redirect decisions shared by the channel routes.

use std::sync::Arc;

use crate::{Error, Result, subscription::SubscriptionOracle};

/// How a route treats the `m3u` and `subscriber` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePolicy {
    /// Gated only when both manifest mode and a subscriber are present.
    Open,
    /// Manifest mode demands a subscriber; without manifest mode the route is open.
    SubscriberWithManifest,
    /// Always gated; a subscriber is mandatory.
    SubscriberRequired,
    /// Always gated; manifest mode and a subscriber are both mandatory.
    ManifestAndSubscriberRequired,
}

/// What to do once the channel resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatePlan {
    /// Redirect to the source without asking the subscription service.
    Bypass,
    /// Ask the subscription service about this subscriber first.
    Check(String),
}

impl RoutePolicy {
    /// Validate the request parameters before any upstream fetch happens.
    pub fn plan(self, manifest_mode: bool, subscriber: Option<&str>) -> Result<GatePlan> {
        let subscriber = subscriber.filter(|s| !s.is_empty());
        let check = |s: &str| GatePlan::Check(s.to_string());

        match self {
            Self::Open => Ok(match (manifest_mode, subscriber) {
                (true, Some(s)) => check(s),
                _ => GatePlan::Bypass,
            }),
            Self::SubscriberWithManifest => match (manifest_mode, subscriber) {
                (true, Some(s)) => Ok(check(s)),
                (true, None) => Err(Error::MissingParameter("subscriber")),
                (false, _) => Ok(GatePlan::Bypass),
            },
            Self::SubscriberRequired => subscriber
                .map(check)
                .ok_or(Error::MissingParameter("subscriber")),
            Self::ManifestAndSubscriberRequired => {
                if !manifest_mode {
                    return Err(Error::MissingParameter("m3u=1"));
                }
                subscriber
                    .map(check)
                    .ok_or(Error::MissingParameter("subscriber"))
            }
        }
    }
}

/// Picks between a resolved stream URL and the expired-subscription stream.
pub struct RedirectEngine {
    oracle: Arc<SubscriptionOracle>,
    expired_url: String,
}

impl RedirectEngine {
    pub fn new(oracle: Arc<SubscriptionOracle>, expired_url: impl Into<String>) -> Self {
        Self {
            oracle,
            expired_url: expired_url.into(),
        }
    }

    /// Redirect target for a resolved `source_url` under `plan`.
    pub async fn target(&self, plan: &GatePlan, source_url: &str) -> String {
        match plan {
            GatePlan::Bypass => {
                tracing::info!("No subscription check -> redirecting to {}", source_url);
                source_url.to_string()
            }
            GatePlan::Check(subscriber) => {
                let active = self.oracle.check(Some(subscriber)).await;
                let target = if active { source_url } else { &self.expired_url };
                tracing::info!(
                    "subscriber={} active={} -> redirect target: {}",
                    subscriber,
                    active,
                    target
                );
                target.to_string()
            }
        }
    }
}
