use std::fmt::Display;

use alloy::{
    primitives::{address, Address, U256, U512},
    providers::Provider,
    sol,
};
use eyre::WrapErr;
use serde::{Serialize, Serializer};

use crate::incentive::compute_incentive;

/// Convex Finance `Booster` on Ethereum mainnet.
pub const BOOSTER_ADDRESS: Address = address!("f403c135812408bfbe8713b5a23a04b3d48aae31");

sol! {
    #[sol(rpc)]
    contract Booster {
        function FEE_DENOMINATOR() external view returns (uint256 denominator);
        function earmarkIncentive() external view returns (uint256 incentive);
        function lockIncentive() external view returns (uint256 incentive);
        function stakerIncentive() external view returns (uint256 incentive);
        function crv() external view returns (address token);
    }

    #[sol(rpc)]
    contract ERC20 {
        function balanceOf(address owner) external view returns (uint256 balance);
    }
}

/// Fee parameters of the booster.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FeeParams {
    #[serde(serialize_with = "decimal")]
    pub fee_denominator: U256,
    #[serde(serialize_with = "decimal")]
    pub earmark_incentive: U256,
    #[serde(serialize_with = "decimal")]
    pub lock_incentive: U256,
    #[serde(serialize_with = "decimal")]
    pub staker_incentive: U256,
    pub reward_token: Address,
}

/// Everything fetched and derived in one poll.
///
/// Amounts serialize as decimal strings so JSON output never mixes encodings.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct IncentiveReport {
    #[serde(flatten)]
    pub params: FeeParams,
    #[serde(serialize_with = "decimal")]
    pub balance: U256,
    #[serde(serialize_with = "decimal")]
    pub call_amount: U512,
    #[serde(serialize_with = "decimal")]
    pub lock_amount: U512,
    #[serde(serialize_with = "decimal")]
    pub staker_amount: U512,
}

fn decimal<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl IncentiveReport {
    /// Derives the three incentives `_earmarkRewards` pays out of `balance`.
    pub fn new(params: FeeParams, balance: U256) -> eyre::Result<Self> {
        let share = |rate: U256| {
            compute_incentive(balance, rate, params.fee_denominator)
                .ok_or_else(|| eyre::eyre!("fee denominator is zero"))
        };

        Ok(Self {
            call_amount: share(params.earmark_incentive)?,
            lock_amount: share(params.lock_incentive)?,
            staker_amount: share(params.staker_incentive)?,
            balance,
            params,
        })
    }

    /// Human readable lines, one value per line.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Fee Denominator: {}", self.params.fee_denominator),
            format!("Earmark Incentive: {}", self.params.earmark_incentive),
            format!("Lock Incentive: {}", self.params.lock_incentive),
            format!("Staker Incentive: {}", self.params.staker_incentive),
            format!("CRV Address: {}", self.params.reward_token),
            format!("CRV Balance: {}", self.balance),
            format!("Call Incentive: {}", self.call_amount),
            format!("Lock Amount: {}", self.lock_amount),
            format!("Staker Amount: {}", self.staker_amount),
        ]
    }
}

/// Read-only view of a booster contract over some provider.
pub struct BoosterReader<P> {
    provider: P,
    address: Address,
}

impl<P: Provider> BoosterReader<P> {
    pub fn new(provider: P, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn fetch_fee_params(&self) -> eyre::Result<FeeParams> {
        let booster = Booster::new(self.address, &self.provider);

        let fee_denominator = booster
            .FEE_DENOMINATOR()
            .call()
            .await
            .wrap_err("FEE_DENOMINATOR() call failed")?
            .denominator;
        tracing::debug!(%fee_denominator, "fetched fee denominator");

        let earmark_incentive = booster
            .earmarkIncentive()
            .call()
            .await
            .wrap_err("earmarkIncentive() call failed")?
            .incentive;
        tracing::debug!(%earmark_incentive, "fetched earmark incentive");

        let lock_incentive = booster
            .lockIncentive()
            .call()
            .await
            .wrap_err("lockIncentive() call failed")?
            .incentive;

        let staker_incentive = booster
            .stakerIncentive()
            .call()
            .await
            .wrap_err("stakerIncentive() call failed")?
            .incentive;

        let reward_token = booster
            .crv()
            .call()
            .await
            .wrap_err("crv() call failed")?
            .token;
        tracing::debug!(%reward_token, "fetched reward token");

        Ok(FeeParams {
            fee_denominator,
            earmark_incentive,
            lock_incentive,
            staker_incentive,
            reward_token,
        })
    }

    /// Balance of `token` held by the booster itself.
    pub async fn fetch_balance(&self, token: Address) -> eyre::Result<U256> {
        let balance = ERC20::new(token, &self.provider)
            .balanceOf(self.address)
            .call()
            .await
            .wrap_err_with(|| format!("balanceOf({}) on {token} failed", self.address))?
            .balance;

        Ok(balance)
    }
}
