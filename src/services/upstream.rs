use anyhow::{Context, Result};
use governor::{clock::DefaultClock, state::{InMemoryState, NotKeyed}, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::types::models::{AllTokensResponse, BtcPrices, HoldersPage, Token};

pub type UpstreamLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Client for the token API and the BTC price feed. Every request waits on
/// the shared rate limiter first.
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    btc_price_url: String,
    rate_limiter: Arc<UpstreamLimiter>,
}

impl UpstreamClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        let rps = NonZeroU32::new(config.upstream_rps).unwrap_or(nonzero!(5u32));

        Ok(Self {
            http,
            base_url: config.upstream_api_url.trim_end_matches('/').to_string(),
            btc_price_url: config.btc_price_url.clone(),
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_second(rps))),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder, what: &str) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("request for {} failed", what))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Upstream returned {} for {}", status, what);
        }
        let response = response.error_for_status()?;

        response
            .json::<T>()
            .await
            .with_context(|| format!("malformed response for {}", what))
    }

    pub async fn fetch_token(&self, token_id: &str) -> Result<Token> {
        let url = format!("{}/api/token/{}", self.base_url, token_id);
        tracing::info!("Fetching token data for {}", token_id);
        self.get_json(self.http.get(&url), "token").await
    }

    pub async fn fetch_all_tokens(&self) -> Result<Vec<Token>> {
        let url = format!("{}/api/all-tokens", self.base_url);
        let response: AllTokensResponse = self.get_json(self.http.get(&url), "token list").await?;
        tracing::info!("Received {} tokens from listing", response.data.len());
        Ok(response.data)
    }

    pub async fn fetch_holders(&self, token_id: &str, page: u32, limit: u32) -> Result<HoldersPage> {
        let url = format!("{}/api/token/{}/owners", self.base_url, token_id);
        let page: HoldersPage = self
            .get_json(self.http.get(&url).query(&[("page", page), ("limit", limit)]), "holders")
            .await?;
        tracing::info!(
            "Received {} holders for token {} (total {})",
            page.data.len(),
            token_id,
            page.count
        );
        Ok(page)
    }

    pub async fn fetch_trades(&self, token_id: &str) -> Result<Value> {
        let url = format!("{}/api/token/{}/trades", self.base_url, token_id);
        tracing::info!("Fetching trades for {}", token_id);
        self.get_json(self.http.get(&url), "trades").await
    }

    pub async fn fetch_btc_usd(&self) -> Result<f64> {
        let prices: BtcPrices = self
            .get_json(self.http.get(&self.btc_price_url), "BTC price")
            .await?;
        if !prices.usd.is_finite() || prices.usd <= 0.0 {
            anyhow::bail!("BTC price feed returned an unusable rate: {}", prices.usd);
        }
        Ok(prices.usd)
    }
}
