//! Paginated era data retrieval bounded by the chain's history depth.

use std::future::Future;

use crate::error::BoxError;
use crate::{
    ChainClient, Era, EraPointsTable, EraRewardsTable, EraTable, EraWindow, StatsError,
};

/// Owns the table being built across pages.
#[derive(Debug)]
pub struct EraAccumulator<T> {
    window: EraWindow,
    table: EraTable<T>,
}

impl<T> EraAccumulator<T> {
    pub fn new(window: EraWindow) -> Self {
        Self {
            window,
            table: EraTable::new(),
        }
    }

    /// Union merge. An era already present is replaced by the new page's value.
    pub fn merge(&mut self, page: EraTable<T>) {
        for (era, validators) in page {
            self.table.insert(era, validators);
        }
    }

    pub fn missing_eras(&self) -> Vec<Era> {
        self.window
            .eras()
            .filter(|era| !self.table.contains_key(era))
            .collect()
    }

    /// Checks coverage of the window and returns the table restricted to it.
    pub fn finish(mut self) -> Result<EraTable<T>, StatsError> {
        let missing = self.missing_eras();
        if !missing.is_empty() {
            return Err(StatsError::IncompleteCoverage {
                start: self.window.start,
                end: self.window.end,
                missing,
            });
        }

        let window = self.window;
        self.table.retain(|era, _| window.contains(*era));
        Ok(self.table)
    }
}

/// Cover `window` with range queries of at most `depth` eras each.
///
/// Consecutive pages overlap by one era: the cursor advances by `depth - 1`
/// and stops once it reaches the window end or would overflow. A window of `n` eras therefore
/// takes `max(1, ceil((n - 1) / (depth - 1)))` queries. Any failing page aborts
/// the fetch.
pub async fn fetch_paginated<T, E, F, Fut>(
    window: EraWindow,
    depth: u32,
    mut query: F,
) -> Result<EraTable<T>, StatsError>
where
    F: FnMut(Era, u32) -> Fut,
    Fut: Future<Output = Result<EraTable<T>, E>>,
    E: Into<BoxError>,
{
    if depth <= 1 {
        return Err(StatsError::Configuration(format!(
            "history depth {} is degenerate, pagination needs at least 2",
            depth
        )));
    }

    let mut accumulator = EraAccumulator::new(window);
    let mut cursor = window.start;

    loop {
        let count = depth.min((window.end - cursor).saturating_add(1));
        log::debug!("Querying {} eras starting at era {}", count, cursor);

        let page = query(cursor, count).await.map_err(StatsError::upstream)?;
        log::debug!("Page at era {} returned {} eras", cursor, page.len());
        accumulator.merge(page);

        match cursor.checked_add(depth - 1) {
            Some(next) if next < window.end => cursor = next,
            _ => break,
        }
    }

    accumulator.finish()
}

/// Reward points for every era of `window`, paginated by the chain's history depth.
pub async fn fetch_era_points<C: ChainClient>(
    client: &C,
    window: EraWindow,
) -> Result<EraPointsTable, StatsError> {
    let depth = client
        .history_depth()
        .await
        .map_err(StatsError::upstream)?;
    log::info!(
        "Fetching reward points for eras {}..={} (history depth {})",
        window.start,
        window.end,
        depth
    );

    fetch_paginated(window, depth, move |start, count| {
        client.era_reward_points(start, count)
    })
    .await
}

/// Itemized rewards for every era of `window`, paginated by the chain's history depth.
pub async fn fetch_era_rewards<C: ChainClient>(
    client: &C,
    window: EraWindow,
) -> Result<EraRewardsTable, StatsError> {
    let depth = client
        .history_depth()
        .await
        .map_err(StatsError::upstream)?;
    log::info!(
        "Fetching validator rewards for eras {}..={} (history depth {})",
        window.start,
        window.end,
        depth
    );

    fetch_paginated(window, depth, move |start, count| {
        client.era_validator_rewards(start, count)
    })
    .await
}
