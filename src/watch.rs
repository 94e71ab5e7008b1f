use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use alloy::{primitives::U256, providers::Provider};
use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::booster::{BoosterReader, IncentiveReport};

/// How long an in-flight poll may keep the process alive after an interrupt.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// How a report is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn render(self, report: &IncentiveReport) -> eyre::Result<String> {
        match self {
            OutputFormat::Text => Ok(report.lines().join("\n")),
            OutputFormat::Json => Ok(serde_json::to_string(report)?),
        }
    }
}

/// Reads the booster state and derives a report.
pub struct Poller<P> {
    reader: BoosterReader<P>,
    assumed_balance: Option<U256>,
    format: OutputFormat,
}

impl<P: Provider> Poller<P> {
    pub fn new(
        reader: BoosterReader<P>,
        assumed_balance: Option<U256>,
        format: OutputFormat,
    ) -> Self {
        Self {
            reader,
            assumed_balance,
            format,
        }
    }

    pub async fn report(&self) -> eyre::Result<IncentiveReport> {
        let params = self.reader.fetch_fee_params().await?;

        let balance = match self.assumed_balance {
            Some(balance) => balance,
            None => self.reader.fetch_balance(params.reward_token).await?,
        };
        tracing::debug!(booster = %self.reader.address(), %balance, "fetched balance");

        IncentiveReport::new(params, balance)
    }

    /// One read, compute and print cycle.
    pub async fn poll_once(&self) -> eyre::Result<()> {
        let report = self.report().await?;
        println!("{}", self.format.render(&report)?);
        Ok(())
    }

    /// Polls every `period` until `shutdown` is set.
    pub async fn run(self, period: Duration, shutdown: Arc<AtomicBool>) -> eyre::Result<()> {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut polls: u64 = 0;
        loop {
            ticker.tick().await;
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            if polls > 0 && self.format == OutputFormat::Text {
                println!();
            }
            self.poll_once().await?;
            polls += 1;
        }

        tracing::info!(polls, "poll loop stopped");
        Ok(())
    }
}

/// Sets `shutdown` once the process receives an interrupt.
pub async fn wait_for_interrupt(shutdown: Arc<AtomicBool>) -> eyre::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!("interrupt received, shutting down");
    shutdown.store(true, Ordering::Relaxed);
    Ok(())
}

/// Joins the poll task once shutdown was requested.
///
/// RPC calls carry no timeout, so the task is aborted when `grace` elapses or a
/// second interrupt arrives.
pub async fn join_poll_task(
    mut handle: JoinHandle<eyre::Result<()>>,
    grace: Duration,
) -> eyre::Result<()> {
    tokio::select! {
        res = &mut handle => return res?,
        _ = tokio::time::sleep(grace) => {
            tracing::warn!(?grace, "poll did not finish in time, aborting");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("second interrupt, aborting poll");
        }
    }

    handle.abort();
    Ok(())
}
