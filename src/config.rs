use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:3000,https://tools.humanz.fun,https://odinscan.fun";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub upstream_api_url: String,
    pub btc_price_url: String,
    /// Used when the BTC price feed is unreachable.
    pub default_btc_usd: f64,
    pub allowed_origins: Vec<String>,
    pub upstream_rps: u32,
    pub holders_page_size: u32,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            upstream_api_url: "https://api.humanz.fun".to_string(),
            btc_price_url: "https://mempool.space/api/v1/prices".to_string(),
            default_btc_usd: 30000.0,
            allowed_origins: split_origins(DEFAULT_ALLOWED_ORIGINS),
            upstream_rps: 5,
            holders_page_size: 100,
            request_timeout_secs: 30,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        _ => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

impl AppConfig {
    /// Reads the process environment. Call `dotenv().ok()` first if a
    /// `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let upstream_api_url = env::var("UPSTREAM_API_URL")
            .unwrap_or(defaults.upstream_api_url)
            .trim_end_matches('/')
            .to_string();
        let btc_price_url = env::var("BTC_PRICE_URL").unwrap_or(defaults.btc_price_url);
        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|raw| split_origins(&raw))
            .unwrap_or(defaults.allowed_origins);

        let config = Self {
            listen_addr: env_or("LISTEN_ADDR", defaults.listen_addr)?,
            upstream_api_url,
            btc_price_url,
            default_btc_usd: env_or("DEFAULT_BTC_USD", defaults.default_btc_usd)?,
            allowed_origins,
            upstream_rps: env_or("UPSTREAM_RPS", defaults.upstream_rps)?,
            holders_page_size: env_or("HOLDERS_PAGE_SIZE", defaults.holders_page_size)?,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
        };

        config.validate()
    }

    pub fn validate(self) -> Result<Self> {
        if self.upstream_rps == 0 {
            anyhow::bail!("UPSTREAM_RPS must be greater than zero");
        }
        if self.holders_page_size == 0 {
            anyhow::bail!("HOLDERS_PAGE_SIZE must be greater than zero");
        }
        Ok(self)
    }
}
