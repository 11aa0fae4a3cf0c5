use std::fmt;

use era_stats::{GeoBinStats, Report, Shape, Source};

const BOLD: &str = "\x1B[1m";
const RESET: &str = "\x1B[0m";

fn quantity(source: Source) -> &'static str {
    match source {
        Source::Points => "points",
        Source::Rewards => "rewards",
    }
}

/// Console rendering of a report, one block per geo-bin.
pub struct TextReport<'a> {
    report: &'a Report,
    per_validator: bool,
}

impl<'a> TextReport<'a> {
    pub fn new(report: &'a Report, per_validator: bool) -> Self {
        Self {
            report,
            per_validator,
        }
    }

    fn era_sums(&self, f: &mut fmt::Formatter<'_>, geo_bin: &GeoBinStats) -> fmt::Result {
        let stats = &geo_bin.stats;
        let unit = quantity(self.report.source);
        writeln!(
            f,
            "For geo bin `{}` over the last {} eras:",
            geo_bin.geo_bin,
            self.report.window.era_count()
        )?;
        writeln!(f, "Average total {}: {}", unit, stats.mean)?;
        writeln!(f, "Median total {}: {}", unit, stats.median)?;
        writeln!(f, "10th percentile of total {}: {}", unit, stats.p10)
    }

    fn validator_averages(&self, f: &mut fmt::Formatter<'_>, geo_bin: &GeoBinStats) -> fmt::Result {
        let stats = &geo_bin.stats;
        let unit = quantity(self.report.source);
        writeln!(
            f,
            "{} For geo bin `{}` over the last {} eras: {}",
            BOLD,
            geo_bin.geo_bin,
            self.report.window.era_count(),
            RESET
        )?;

        if self.per_validator {
            for validator in &geo_bin.validators {
                writeln!(
                    f,
                    "  validator `{}` ({} eras): average {}, median {}, 10th percentile {}",
                    validator.validator,
                    validator.eras,
                    validator.stats.mean,
                    validator.stats.median,
                    validator.stats.p10
                )?;
            }
        }

        writeln!(f, "Average of average {}: {}", unit, stats.mean)?;
        writeln!(f, "Median of average {}: {}", unit, stats.median)?;
        writeln!(f, "10th percentile of average {}: {}", unit, stats.p10)?;
        if let Some(p90) = stats.p90 {
            writeln!(f, "90th percentile of average {}: {}", unit, p90)?;
        }
        Ok(())
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for geo_bin in &self.report.geo_bins {
            match self.report.shape {
                Shape::SumThenStatistic => self.era_sums(f, geo_bin)?,
                Shape::AverageThenStatistic => self.validator_averages(f, geo_bin)?,
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use era_stats::{EraWindow, SummaryStats, ValidatorStats};

    fn stats(mean: f64, median: f64, p10: f64, p90: Option<f64>) -> SummaryStats {
        SummaryStats {
            mean,
            median,
            p10,
            p90,
        }
    }

    fn report(shape: Shape, geo_bins: Vec<GeoBinStats>) -> Report {
        Report {
            window: EraWindow { start: 96, end: 98 },
            shape,
            source: Source::Points,
            geo_bins,
        }
    }

    #[test]
    fn renders_era_sum_report() {
        let report = report(
            Shape::SumThenStatistic,
            vec![GeoBinStats {
                geo_bin: "eu".into(),
                samples: 3,
                stats: stats(20.0, 20.0, 12.0, None),
                validators: vec![],
            }],
        );

        assert_eq!(
            TextReport::new(&report, false).to_string(),
            "For geo bin `eu` over the last 3 eras:\n\
             Average total points: 20\n\
             Median total points: 20\n\
             10th percentile of total points: 12\n\n"
        );
    }

    #[test]
    fn renders_validator_average_report_with_breakdown() {
        let report = report(
            Shape::AverageThenStatistic,
            vec![GeoBinStats {
                geo_bin: "eu".into(),
                samples: 1,
                stats: stats(10.0, 10.0, 10.0, Some(10.0)),
                validators: vec![ValidatorStats {
                    validator: "A".into(),
                    eras: 3,
                    stats: stats(10.0, 10.0, 6.0, Some(14.0)),
                }],
            }],
        );

        let text = TextReport::new(&report, true).to_string();
        assert!(text.starts_with("\x1B[1m For geo bin `eu` over the last 3 eras: \x1B[0m\n"));
        assert!(text.contains("  validator `A` (3 eras): average 10, median 10, 10th percentile 6\n"));
        assert!(text.contains("90th percentile of average points: 10\n"));

        let without = TextReport::new(&report, false).to_string();
        assert!(!without.contains("validator `A`"));
    }
}
