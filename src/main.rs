//! Prints the reward a caller of `earmarkRewards` on the Convex booster would receive.
//!
//! `_earmarkRewards` pays the caller `crvBal * earmarkIncentive / FEE_DENOMINATOR`,
//! where `crvBal` is the CRV held by the booster. Everything but the balance is a
//! contract parameter, so the incentive can be derived from four read calls.
//!
//! Usage:
//! ```bash
//! NODE_URLS=https://eth.example/rpc cargo run --release -- --watch
//! ```

use std::sync::{atomic::AtomicBool, Arc};

use alloy::transports::http::reqwest::Url;
use booster_incentive::{
    booster::BoosterReader,
    config::{connect, Config, USAGE},
    watch::{join_poll_task, wait_for_interrupt, OutputFormat, Poller, SHUTDOWN_GRACE},
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    let endpoints = match config.endpoints() {
        Ok(Some(endpoints)) => endpoints,
        Ok(None) => {
            println!("{USAGE}");
            return;
        }
        Err(err) => exit_with_error(err),
    };

    if let Err(err) = run(config, endpoints).await {
        exit_with_error(err);
    }
}

async fn run(config: Config, endpoints: Vec<Url>) -> eyre::Result<()> {
    let provider = connect(&endpoints).await?;
    let format = match config.json {
        true => OutputFormat::Json,
        false => OutputFormat::Text,
    };
    let poller = Poller::new(
        BoosterReader::new(provider, config.booster),
        config.balance,
        format,
    );

    if !config.watch {
        return poller.poll_once().await;
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    let mut handle = tokio::spawn(poller.run(config.poll_interval(), shutdown.clone()));

    tokio::select! {
        res = &mut handle => return res?,
        res = wait_for_interrupt(shutdown) => res?,
    }

    join_poll_task(handle, SHUTDOWN_GRACE).await
}

fn exit_with_error(err: eyre::Report) -> ! {
    tracing::error!("{err:?}");
    std::process::exit(1);
}
