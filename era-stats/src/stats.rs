//! Summary statistics over finite sample sets.

use serde::Serialize;

/// How fractional percentile ranks are placed between sorted samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PercentileMethod {
    /// Rank `p * (n - 1)`, linear interpolation between neighbours.
    #[default]
    Linear,
    /// Rank `p * n - 0.5`, clamped to the sample range, then interpolated.
    Midpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    pub p10: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p90: Option<f64>,
}

impl SummaryStats {
    /// `None` for an empty sample set.
    pub fn compute(samples: &[f64], method: PercentileMethod) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Some(Self {
            mean: mean(&sorted),
            median: median(&sorted),
            p10: percentile_sorted(&sorted, 10.0, method),
            p90: Some(percentile_sorted(&sorted, 90.0, method)),
        })
    }

    pub fn without_p90(self) -> Self {
        Self { p90: None, ..self }
    }
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Middle sample, or the average of the two middle samples.
fn median(sorted: &[f64]) -> f64 {
    let len = sorted.len();
    if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
    } else {
        sorted[len / 2]
    }
}

/// Percentile `p` (0..=100) of a non-empty, sorted sample set.
fn percentile_sorted(sorted: &[f64], p: f64, method: PercentileMethod) -> f64 {
    let len = sorted.len();
    if len == 1 {
        return sorted[0];
    }

    let fraction = p.clamp(0.0, 100.0) / 100.0;
    let last = (len - 1) as f64;
    let rank = match method {
        PercentileMethod::Linear => fraction * last,
        PercentileMethod::Midpoint => (fraction * len as f64 - 0.5).clamp(0.0, last),
    };

    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
