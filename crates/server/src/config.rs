//! Startup configuration, read once from the environment.

use std::time::Duration;

use anyhow::{Context, bail};

pub const DEFAULT_SERVER_NAME: &str = "Jellyfin";
pub const DEFAULT_BIND: &str = "0.0.0.0:7000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonConfig {
    pub jellyfin_url: String,
    pub api_key: String,
    pub user_id: Option<String>,
    pub server_name: String,
    pub bind: String,
    pub upstream_timeout: Duration,
    pub catalog_page_size: u32,
}

impl AddonConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jellyfin_url =
            var("STREMFIN_JELLYFIN_URL").context("STREMFIN_JELLYFIN_URL is required")?;
        let api_key =
            var("STREMFIN_JELLYFIN_API_KEY").context("STREMFIN_JELLYFIN_API_KEY is required")?;

        let timeout_secs = match var("STREMFIN_UPSTREAM_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .with_context(|| format!("invalid STREMFIN_UPSTREAM_TIMEOUT_SECS {v:?}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            bail!("STREMFIN_UPSTREAM_TIMEOUT_SECS must be positive");
        }

        let catalog_page_size = match var("STREMFIN_CATALOG_PAGE_SIZE") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("invalid STREMFIN_CATALOG_PAGE_SIZE {v:?}"))?,
            None => DEFAULT_PAGE_SIZE,
        };
        if catalog_page_size == 0 {
            bail!("STREMFIN_CATALOG_PAGE_SIZE must be positive");
        }

        Ok(Self {
            jellyfin_url,
            api_key,
            user_id: var("STREMFIN_JELLYFIN_USER_ID"),
            server_name: var("STREMFIN_SERVER_NAME")
                .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
            bind: var("STREMFIN_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            upstream_timeout: Duration::from_secs(timeout_secs),
            catalog_page_size,
        })
    }
}
