use std::fmt;

use thiserror::Error;

use crate::{Era, GeoBin, ValidatorId};

/// Boxed collaborator error (chain client or directory transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every failure aborts the run; there is no partial report.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("upstream fetch failed: {0}")]
    Upstream(#[source] BoxError),

    #[error("eras {missing:?} missing after fetching window {start}..={end}")]
    IncompleteCoverage {
        start: Era,
        end: Era,
        missing: Vec<Era>,
    },

    #[error("no samples for {0}")]
    EmptySample(SampleScope),
}

impl StatsError {
    pub fn upstream<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        StatsError::Upstream(err.into())
    }
}

/// What ended up without samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleScope {
    /// No validator passed the directory filter, so there is no geo-bin at all.
    Directory,
    GeoBin(GeoBin),
    Validator(ValidatorId),
}

impl fmt::Display for SampleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleScope::Directory => write!(f, "the filtered node directory"),
            SampleScope::GeoBin(bin) => write!(f, "geo bin `{}`", bin),
            SampleScope::Validator(validator) => write!(f, "validator `{}`", validator),
        }
    }
}
