use std::ops::RangeInclusive;

use serde::Serialize;

use crate::{Era, StatsError};

/// Inclusive era range `[start, end]`, never containing the active era.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EraWindow {
    pub start: Era,
    pub end: Era,
}

impl EraWindow {
    pub fn new(start: Era, end: Era) -> Result<Self, StatsError> {
        if start > end {
            return Err(StatsError::Configuration(format!(
                "start era {} is after end era {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Window of `lookback` eras ending at the last finalized era (`active_era - 1`).
    pub fn ending_before(active_era: Era, lookback: u32) -> Result<Self, StatsError> {
        let last_finalized = last_finalized_era(active_era)?;
        Self::ending_at(active_era, last_finalized, lookback)
    }

    /// Window of `lookback` eras ending at `end_era`, which must be finalized
    /// relative to `active_era`.
    pub fn ending_at(active_era: Era, end_era: Era, lookback: u32) -> Result<Self, StatsError> {
        if lookback == 0 {
            return Err(StatsError::Configuration(
                "lookback era count must be positive".into(),
            ));
        }

        let last_finalized = last_finalized_era(active_era)?;
        if end_era > last_finalized {
            return Err(StatsError::Configuration(format!(
                "end era {} can't be larger than last finalized era {}",
                end_era, last_finalized
            )));
        }

        // start = end - lookback + 1 must not go negative
        let start = (end_era + 1).checked_sub(lookback).ok_or_else(|| {
            StatsError::Configuration(format!(
                "lookback of {} eras reaches before era 0 (end era {})",
                lookback, end_era
            ))
        })?;

        Self::new(start, end_era)
    }

    pub fn era_count(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn contains(&self, era: Era) -> bool {
        self.start <= era && era <= self.end
    }

    pub fn eras(&self) -> RangeInclusive<Era> {
        self.start..=self.end
    }
}

fn last_finalized_era(active_era: Era) -> Result<Era, StatsError> {
    active_era.checked_sub(1).ok_or_else(|| {
        StatsError::Configuration("active era is 0, no era has finished yet".into())
    })
}
