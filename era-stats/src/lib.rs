//! Era-windowed reward point retrieval and per-geo-bin statistics.
//!
//! The pipeline combines a node directory (validator wallet address to geo-bin)
//! with per-era reward data read from a staking chain, then summarises the
//! joined data per geo-bin. Network access lives behind [`ChainClient`] and the
//! caller-supplied directory records, so everything here is deterministic for a
//! fixed chain state and directory snapshot.

pub mod aggregate;
pub mod chain;
pub mod directory;
pub mod error;
pub mod fetcher;
pub mod join;
pub mod pipeline;
pub mod stats;
pub mod window;

#[cfg(test)]
mod mock;

use std::collections::BTreeMap;

pub use aggregate::{GeoBinStats, Shape, ValidatorStats};
pub use chain::{ChainClient, RewardEvent};
pub use directory::{GeoBinDirectory, NodeDirectoryResponse, NodeRecord, StatusFilter};
pub use error::{SampleScope, StatsError};
pub use join::{JoinedPoints, ValidatorRewards};
pub use pipeline::{PipelineConfig, Report, Source};
pub use stats::{PercentileMethod, SummaryStats};
pub use window::EraWindow;

/// Era index as stored by the staking pallet.
pub type Era = u32;

/// Validator wallet address (SS58 string).
pub type ValidatorId = String;

/// Geographic/network region label.
pub type GeoBin = String;

/// Joined per-era scalar. Chain points are `u32`, reward balances are `u128`.
pub type Points = u128;

/// Era-first table: era -> validator -> value.
pub type EraTable<T> = BTreeMap<Era, BTreeMap<ValidatorId, T>>;

/// `Staking.ErasRewardPoints` shaped table.
pub type EraPointsTable = EraTable<u32>;

/// Itemized reward records, era-first as the chain returns them.
pub type EraRewardsTable = EraTable<Vec<RewardEvent>>;
