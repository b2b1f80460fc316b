use anyhow::{Context, Result, bail};
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

use crate::error::TrackError;

pub const DEFAULT_BASE_URL: &str = "https://ws.narvar.com/api/v2";
pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Application configuration loaded from environment variables
#[derive(Clone)]
pub struct Config {
    pub retailer_moniker: Option<String>,
    pub hmac_token: Option<String>,
    pub bind_addr: SocketAddr,
    pub base_url: Url,
    pub upstream_timeout: Duration,
}

/// Signing material required before any upstream call is made
#[derive(Clone)]
pub struct Credentials {
    pub retailer_moniker: String,
    pub hmac_token: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Environment Variables
    /// - `RETAILER_MONIKER`: Required per request - Retailer identifier for the tracking API
    /// - `HMAC_TOKEN`: Required per request - Shared HMAC secret
    /// - `TRACKER_ADDR`: Optional - Bind address (default: "0.0.0.0:8080")
    /// - `NARVAR_BASE_URL`: Optional - Tracking API root (default: "https://ws.narvar.com/api/v2")
    /// - `UPSTREAM_TIMEOUT_SECS`: Optional - Outbound request timeout in seconds (default: 5)
    ///
    /// Missing credentials do not fail startup; each request answers 400 until they are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading values through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let retailer_moniker = non_empty(lookup("RETAILER_MONIKER"));
        let hmac_token = non_empty(lookup("HMAC_TOKEN"));

        let bind_addr = lookup("TRACKER_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("TRACKER_ADDR is not a valid socket address")?;

        let base_url = lookup("NARVAR_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(base_url.trim()).context("NARVAR_BASE_URL is not a valid URL")?;

        if base_url.cannot_be_a_base() {
            bail!("NARVAR_BASE_URL cannot be used as a base URL");
        }

        let timeout_secs = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        if timeout_secs == 0 {
            bail!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            retailer_moniker,
            hmac_token,
            bind_addr,
            base_url,
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Configuration with explicit credentials and defaults for everything else.
    pub fn with_credentials(retailer_moniker: Option<&str>, hmac_token: Option<&str>) -> Result<Self> {
        Self::from_lookup(|key| match key {
            "RETAILER_MONIKER" => retailer_moniker.map(str::to_string),
            "HMAC_TOKEN" => hmac_token.map(str::to_string),
            _ => None,
        })
    }

    pub fn credentials(&self) -> Result<Credentials, TrackError> {
        match (&self.retailer_moniker, &self.hmac_token) {
            (Some(retailer_moniker), Some(hmac_token)) => Ok(Credentials {
                retailer_moniker: retailer_moniker.clone(),
                hmac_token: hmac_token.clone(),
            }),
            _ => Err(TrackError::ConfigurationMissing),
        }
    }
}

/// Unset and empty are the same; any other value, whitespace included, is kept as-is.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("retailer_moniker", &self.retailer_moniker)
            .field("hmac_token", &self.hmac_token.as_ref().map(|_| "<redacted>"))
            .field("bind_addr", &self.bind_addr)
            .field("base_url", &self.base_url.as_str())
            .field("upstream_timeout", &self.upstream_timeout)
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("retailer_moniker", &self.retailer_moniker)
            .field("hmac_token", &"<redacted>")
            .finish()
    }
}
