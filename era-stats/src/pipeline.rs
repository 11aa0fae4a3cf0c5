//! End-to-end run: window, fetch, join, aggregate.

use serde::Serialize;

use crate::aggregate::aggregate;
use crate::fetcher::{fetch_era_points, fetch_era_rewards};
use crate::join::{join_points, join_rewards};
use crate::{
    ChainClient, Era, EraWindow, GeoBinDirectory, GeoBinStats, JoinedPoints, PercentileMethod,
    SampleScope, Shape, StatsError, ValidatorRewards,
};

/// Which chain item feeds the join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// `Staking.ErasRewardPoints`, one scalar per validator per era.
    Points,
    /// Itemized reward records, summed per validator per era.
    Rewards,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of finalized eras to look back over.
    pub lookback: u32,
    /// Last era of the window. Defaults to the last finalized era.
    pub end_era: Option<Era>,
    pub shape: Shape,
    pub source: Source,
    pub percentile: PercentileMethod,
}

impl PipelineConfig {
    pub fn new(shape: Shape, source: Source) -> Self {
        Self {
            lookback: Self::default_lookback(shape),
            end_era: None,
            shape,
            source,
            percentile: PercentileMethod::default(),
        }
    }

    /// 10 eras for the era-sum report, 7 for the validator-average report.
    pub fn default_lookback(shape: Shape) -> u32 {
        match shape {
            Shape::SumThenStatistic => 10,
            Shape::AverageThenStatistic => 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub window: EraWindow,
    pub shape: Shape,
    pub source: Source,
    pub geo_bins: Vec<GeoBinStats>,
}

/// Resolve the era window against the chain's active era, read once.
pub async fn resolve_window<C: ChainClient>(
    client: &C,
    lookback: u32,
    end_era: Option<Era>,
) -> Result<EraWindow, StatsError> {
    let active_era = client.active_era().await.map_err(StatsError::upstream)?;
    let window = match end_era {
        Some(end_era) => EraWindow::ending_at(active_era, end_era, lookback)?,
        None => EraWindow::ending_before(active_era, lookback)?,
    };
    log::info!(
        "Active era {}, analysing eras {}..={}",
        active_era,
        window.start,
        window.end
    );
    Ok(window)
}

/// Fetch `source` data for `window` and join it with `directory`.
pub async fn fetch_joined<C: ChainClient>(
    client: &C,
    directory: &GeoBinDirectory,
    window: EraWindow,
    source: Source,
) -> Result<JoinedPoints, StatsError> {
    let joined = match source {
        Source::Points => {
            let table = fetch_era_points(client, window).await?;
            join_points(&table, directory)
        }
        Source::Rewards => {
            let table = fetch_era_rewards(client, window).await?;
            join_rewards(&ValidatorRewards::from_era_table(table), directory)
        }
    };
    Ok(joined)
}

/// Fails before touching the chain when the filtered directory is empty.
pub async fn run<C: ChainClient>(
    client: &C,
    directory: &GeoBinDirectory,
    config: &PipelineConfig,
) -> Result<Report, StatsError> {
    if directory.is_empty() {
        return Err(StatsError::EmptySample(SampleScope::Directory));
    }
    log::debug!("{} validators in the filtered directory", directory.len());

    let window = resolve_window(client, config.lookback, config.end_era).await?;
    let joined = fetch_joined(client, directory, window, config.source).await?;
    let geo_bins = aggregate(config.shape, &joined, config.percentile)?;

    Ok(Report {
        window,
        shape: config.shape,
        source: config.source,
        geo_bins,
    })
}
