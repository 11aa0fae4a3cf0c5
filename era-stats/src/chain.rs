//! The chain surface the pipeline consumes.

use serde::{Deserialize, Serialize};

use crate::{Era, EraPointsTable, EraRewardsTable};

/// One reward record for a validator in an era.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEvent {
    pub reward: u128,
}

/// Read access to staking history.
///
/// Range queries return at most `count` eras starting at `start_era`. Eras the
/// chain has no data for are simply absent from the result; the fetcher decides
/// whether that is fatal.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    type Error: std::error::Error + Send + Sync + 'static;

    /// `Staking.ActiveEra.index`
    async fn active_era(&self) -> Result<Era, Self::Error>;

    /// Number of consecutive eras one range query may cover.
    async fn history_depth(&self) -> Result<u32, Self::Error>;

    /// `Staking.ErasRewardPoints` for `[start_era, start_era + count)`.
    async fn era_reward_points(
        &self,
        start_era: Era,
        count: u32,
    ) -> Result<EraPointsTable, Self::Error>;

    /// Itemized reward records for `[start_era, start_era + count)`.
    async fn era_validator_rewards(
        &self,
        start_era: Era,
        count: u32,
    ) -> Result<EraRewardsTable, Self::Error>;
}
