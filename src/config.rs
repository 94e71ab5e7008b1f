use std::time::Duration;

use alloy::{
    primitives::{Address, U256},
    providers::{Provider, ProviderBuilder},
    transports::http::reqwest::Url,
};
use clap::Parser;
use eyre::WrapErr;

use crate::booster::BOOSTER_ADDRESS;

pub const USAGE: &str = "Please set NODE_URLS environment variable.";

/// Command line and environment configuration.
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Print the Convex booster call incentive")]
pub struct Config {
    /// Comma separated JSON-RPC endpoints, the first reachable one is used
    #[arg(long, env = "NODE_URLS", hide_env_values = true)]
    pub node_urls: Option<String>,

    /// Keep polling until interrupted
    #[arg(long, env = "WATCH")]
    pub watch: bool,

    /// Seconds between polls in watch mode
    #[arg(long, env = "POLL_INTERVAL", default_value_t = 1)]
    pub interval: u64,

    /// Booster contract address
    #[arg(long, env = "BOOSTER_ADDRESS", default_value_t = BOOSTER_ADDRESS)]
    pub booster: Address,

    /// Use a fixed balance instead of reading it from the reward token
    #[arg(long, env = "ASSUMED_BALANCE")]
    pub balance: Option<U256>,

    /// Print each report as a JSON line
    #[arg(long)]
    pub json: bool,
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.interval.max(1))
    }

    /// Parsed endpoints, `None` when nothing is configured.
    pub fn endpoints(&self) -> eyre::Result<Option<Vec<Url>>> {
        let Some(raw) = self.node_urls.as_deref() else {
            return Ok(None);
        };

        let urls = parse_endpoints(raw)?;
        match urls.is_empty() {
            true => Ok(None),
            false => Ok(Some(urls)),
        }
    }
}

fn parse_endpoints(raw: &str) -> eyre::Result<Vec<Url>> {
    raw.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(|url| url.parse().wrap_err_with(|| format!("invalid node url {url:?}")))
        .collect()
}

/// Returns a provider for the first endpoint that answers `eth_chainId`.
pub async fn connect(endpoints: &[Url]) -> eyre::Result<impl Provider + 'static> {
    let mut last_err = None;

    for url in endpoints {
        let provider = ProviderBuilder::new().on_http(url.clone());
        match provider.get_chain_id().await {
            Ok(chain_id) => {
                tracing::info!(%url, chain_id, "connected to node");
                return Ok(provider);
            }
            Err(err) => {
                tracing::warn!(%url, %err, "node unreachable");
                last_err = Some(err);
            }
        }
    }

    match last_err {
        Some(err) => Err(err).wrap_err("no reachable node in NODE_URLS"),
        None => Err(eyre::eyre!("NODE_URLS has no endpoints")),
    }
}
