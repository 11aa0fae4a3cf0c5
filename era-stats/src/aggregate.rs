//! Two-level aggregation of joined points into per-geo-bin statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    GeoBin, JoinedPoints, PercentileMethod, SampleScope, StatsError, SummaryStats, ValidatorId,
};

/// Which quantity the geo-bin statistic is taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// A: sum validators per era, statistic across the era sums.
    SumThenStatistic,
    /// B: average each validator across eras, statistic across validators.
    AverageThenStatistic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatorStats {
    pub validator: ValidatorId,
    /// Eras with data in the window.
    pub eras: usize,
    /// Across the validator's eras. `mean` is the validator's average.
    pub stats: SummaryStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoBinStats {
    pub geo_bin: GeoBin,
    /// Size of the sample set `stats` was computed over.
    pub samples: usize,
    pub stats: SummaryStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<ValidatorStats>,
}

pub fn aggregate(
    shape: Shape,
    joined: &JoinedPoints,
    method: PercentileMethod,
) -> Result<Vec<GeoBinStats>, StatsError> {
    if joined.is_empty() {
        return Err(StatsError::EmptySample(SampleScope::Directory));
    }

    match shape {
        Shape::SumThenStatistic => sum_then_statistic(joined, method),
        Shape::AverageThenStatistic => average_then_statistic(joined, method),
    }
}

/// Shape A. Only eras where at least one validator of the bin has data
/// contribute a sample. Reports mean, median and p10.
pub fn sum_then_statistic(
    joined: &JoinedPoints,
    method: PercentileMethod,
) -> Result<Vec<GeoBinStats>, StatsError> {
    let mut result = Vec::new();

    for (geo_bin, validators) in joined.iter() {
        let mut era_sums: BTreeMap<_, f64> = BTreeMap::new();
        for eras in validators.values() {
            for (era, points) in eras {
                *era_sums.entry(*era).or_insert(0.0) += *points as f64;
            }
        }

        let samples: Vec<f64> = era_sums.into_values().collect();
        let stats = SummaryStats::compute(&samples, method)
            .ok_or_else(|| StatsError::EmptySample(SampleScope::GeoBin(geo_bin.clone())))?;

        result.push(GeoBinStats {
            geo_bin: geo_bin.clone(),
            samples: samples.len(),
            stats: stats.without_p90(),
            validators: Vec::new(),
        });
    }

    Ok(result)
}

/// Shape B. Each validator's average over its eras is one sample of its
/// geo-bin. Reports mean, median, p10 and p90, plus per-validator stats.
pub fn average_then_statistic(
    joined: &JoinedPoints,
    method: PercentileMethod,
) -> Result<Vec<GeoBinStats>, StatsError> {
    let mut result = Vec::new();

    for (geo_bin, validators) in joined.iter() {
        let mut per_validator = Vec::with_capacity(validators.len());

        for (validator, eras) in validators {
            let samples: Vec<f64> = eras.values().map(|points| *points as f64).collect();
            let stats = SummaryStats::compute(&samples, method).ok_or_else(|| {
                StatsError::EmptySample(SampleScope::Validator(validator.clone()))
            })?;
            per_validator.push(ValidatorStats {
                validator: validator.clone(),
                eras: samples.len(),
                stats,
            });
        }

        let averages: Vec<f64> = per_validator.iter().map(|v| v.stats.mean).collect();
        let stats = SummaryStats::compute(&averages, method)
            .ok_or_else(|| StatsError::EmptySample(SampleScope::GeoBin(geo_bin.clone())))?;

        result.push(GeoBinStats {
            geo_bin: geo_bin.clone(),
            samples: averages.len(),
            stats,
            validators: per_validator,
        });
    }

    Ok(result)
}
