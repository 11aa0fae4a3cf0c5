use clap::{Parser, ValueEnum};

use era_stats::{PercentileMethod, PipelineConfig, Shape, Source, StatusFilter};

pub const DEFAULT_RPC_URL: &str = "wss://xx.api.onfinality.io/public-ws";
pub const DEFAULT_DIRECTORY_URL: &str = "https://dashboard-api.xx.network/v1/nodes";

/// xx network SS58 address prefix.
pub const XX_SS58_PREFIX: u16 = 55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShapeArg {
    /// Sum validators per era, then summarise across eras
    A,
    /// Average each validator across eras, then summarise across validators
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// Staking.ErasRewardPoints
    Points,
    /// Era payout share per validator
    Rewards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Nodes whose status is "online"
    Online,
    /// Nodes not marked "not currently a validator"
    Validator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PercentileArg {
    Linear,
    Midpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

/// Per-geo-bin validator performance over recent eras.
#[derive(Debug, Parser)]
#[command(name = "reporter", version)]
pub struct Cli {
    /// Websocket endpoint of a chain node
    #[arg(long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Node directory endpoint
    #[arg(long, env = "DIRECTORY_URL", default_value = DEFAULT_DIRECTORY_URL)]
    pub directory_url: String,

    #[arg(long, env = "SHAPE", value_enum, default_value_t = ShapeArg::A)]
    pub shape: ShapeArg,

    #[arg(long, env = "SOURCE", value_enum, default_value_t = SourceArg::Points)]
    pub source: SourceArg,

    /// Number of finalized eras to analyse [default: 10 for shape a, 7 for shape b]
    #[arg(long, env = "ERAS")]
    pub eras: Option<u32>,

    /// Last era to analyse [default: active era - 1]
    #[arg(long, env = "END_ERA")]
    pub end_era: Option<u32>,

    /// Directory status filter [default: online for shape a, validator for shape b]
    #[arg(long, env = "STATUS_FILTER", value_enum)]
    pub status: Option<StatusArg>,

    #[arg(long, env = "PERCENTILE", value_enum, default_value_t = PercentileArg::Linear)]
    pub percentile: PercentileArg,

    #[arg(long, env = "SS58_PREFIX", default_value_t = XX_SS58_PREFIX)]
    pub ss58_prefix: u16,

    /// Timeout for the directory request, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout_secs: u64,

    /// Also print per-validator statistics (shape b)
    #[arg(long)]
    pub per_validator: bool,

    #[arg(long, env = "FORMAT", value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,
}

impl Cli {
    pub fn shape(&self) -> Shape {
        match self.shape {
            ShapeArg::A => Shape::SumThenStatistic,
            ShapeArg::B => Shape::AverageThenStatistic,
        }
    }

    pub fn status_filter(&self) -> StatusFilter {
        match (self.status, self.shape) {
            (Some(StatusArg::Online), _) | (None, ShapeArg::A) => StatusFilter::Online,
            (Some(StatusArg::Validator), _) | (None, ShapeArg::B) => StatusFilter::Validator,
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        let shape = self.shape();
        let source = match self.source {
            SourceArg::Points => Source::Points,
            SourceArg::Rewards => Source::Rewards,
        };

        PipelineConfig {
            lookback: self
                .eras
                .unwrap_or_else(|| PipelineConfig::default_lookback(shape)),
            end_era: self.end_era,
            shape,
            source,
            percentile: match self.percentile {
                PercentileArg::Linear => PercentileMethod::Linear,
                PercentileArg::Midpoint => PercentileMethod::Midpoint,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("reporter").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_follow_shape_a() {
        let cli = parse(&[]);
        let config = cli.pipeline_config();

        assert_eq!(config.shape, Shape::SumThenStatistic);
        assert_eq!(config.source, Source::Points);
        assert_eq!(config.lookback, 10);
        assert_eq!(config.end_era, None);
        assert_eq!(config.percentile, PercentileMethod::Linear);
        assert_eq!(cli.status_filter(), StatusFilter::Online);
    }

    #[test]
    fn shape_b_changes_lookback_and_filter() {
        let cli = parse(&["--shape", "b"]);
        assert_eq!(cli.pipeline_config().lookback, 7);
        assert_eq!(cli.status_filter(), StatusFilter::Validator);
    }

    #[test]
    fn explicit_options_override_defaults() {
        let cli = parse(&[
            "--shape",
            "b",
            "--source",
            "rewards",
            "--eras",
            "3",
            "--end-era",
            "98",
            "--status",
            "online",
            "--percentile",
            "midpoint",
            "--per-validator",
        ]);
        let config = cli.pipeline_config();

        assert_eq!(config.source, Source::Rewards);
        assert_eq!(config.lookback, 3);
        assert_eq!(config.end_era, Some(98));
        assert_eq!(config.percentile, PercentileMethod::Midpoint);
        assert_eq!(cli.status_filter(), StatusFilter::Online);
        assert!(cli.per_validator);
    }

    #[test]
    fn rejects_unknown_shape() {
        assert!(Cli::try_parse_from(["reporter", "--shape", "c"]).is_err());
    }
}
