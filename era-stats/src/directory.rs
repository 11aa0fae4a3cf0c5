//! Geo-bin directory built from the node dashboard snapshot.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{GeoBin, ValidatorId};

/// Status reported for nodes that are online.
pub const STATUS_ONLINE: &str = "online";

/// Status reported for nodes whose wallet is not in the validator set.
pub const STATUS_NOT_A_VALIDATOR: &str = "not currently a validator";

/// Body of `GET /v1/nodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDirectoryResponse {
    pub nodes: Vec<NodeRecord>,
}

/// One node as listed by the dashboard. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub geo_bin: Option<String>,
    pub status: String,
}

impl NodeRecord {
    pub fn new(wallet_address: &str, geo_bin: &str, status: &str) -> Self {
        Self {
            wallet_address: Some(wallet_address.to_string()),
            geo_bin: Some(geo_bin.to_string()),
            status: status.to_string(),
        }
    }
}

/// Status predicate presets used by the reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// `status == "online"`
    Online,
    /// `status != "not currently a validator"`
    Validator,
}

impl StatusFilter {
    pub fn matches(&self, status: &str) -> bool {
        match self {
            StatusFilter::Online => status == STATUS_ONLINE,
            StatusFilter::Validator => status != STATUS_NOT_A_VALIDATOR,
        }
    }
}

/// Validator wallet address -> geo-bin. Immutable once resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoBinDirectory {
    bins: BTreeMap<ValidatorId, GeoBin>,
}

impl GeoBinDirectory {
    /// Build the directory from raw records, keeping those whose status passes
    /// `predicate`. A later record for the same wallet overwrites an earlier one.
    pub fn resolve<'a, I, P>(records: I, predicate: P) -> Self
    where
        I: IntoIterator<Item = &'a NodeRecord>,
        P: Fn(&str) -> bool,
    {
        let mut bins = BTreeMap::new();
        let mut skipped = 0usize;

        for record in records {
            if !predicate(&record.status) {
                continue;
            }
            match (&record.wallet_address, &record.geo_bin) {
                (Some(wallet), Some(geo_bin)) => {
                    bins.insert(wallet.clone(), geo_bin.clone());
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            log::debug!(
                "Skipped {} directory records without wallet address or geo bin",
                skipped
            );
        }
        log::info!("Resolved {} validators into geo bins", bins.len());

        Self { bins }
    }

    pub fn with_filter<'a, I>(records: I, filter: StatusFilter) -> Self
    where
        I: IntoIterator<Item = &'a NodeRecord>,
    {
        Self::resolve(records, |status| filter.matches(status))
    }

    pub fn geo_bin(&self, validator: &str) -> Option<&GeoBin> {
        self.bins.get(validator)
    }

    /// Distinct geo-bins, sorted.
    pub fn geo_bins(&self) -> BTreeSet<&GeoBin> {
        self.bins.values().collect()
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

impl FromIterator<(ValidatorId, GeoBin)> for GeoBinDirectory {
    fn from_iter<T: IntoIterator<Item = (ValidatorId, GeoBin)>>(iter: T) -> Self {
        Self {
            bins: iter.into_iter().collect(),
        }
    }
}
