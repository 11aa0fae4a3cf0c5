//! Cross-referencing era data with the geo-bin directory.

use std::collections::BTreeMap;

use crate::{
    Era, EraPointsTable, EraRewardsTable, GeoBin, GeoBinDirectory, Points, RewardEvent,
    ValidatorId,
};

/// Per-validator era map inside a geo-bin.
pub type ValidatorEras = BTreeMap<Era, Points>;

/// geo-bin -> validator -> era -> points.
///
/// Every geo-bin of the directory it was joined against is present, possibly
/// with no validators. A validator without data for an era has no entry for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinedPoints {
    bins: BTreeMap<GeoBin, BTreeMap<ValidatorId, ValidatorEras>>,
}

impl JoinedPoints {
    /// Empty join with one slot per geo-bin known to `directory`.
    pub fn seeded(directory: &GeoBinDirectory) -> Self {
        let bins = directory
            .geo_bins()
            .into_iter()
            .map(|bin| (bin.clone(), BTreeMap::new()))
            .collect();
        Self { bins }
    }

    pub fn geo_bin(&self, geo_bin: &str) -> Option<&BTreeMap<ValidatorId, ValidatorEras>> {
        self.bins.get(geo_bin)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GeoBin, &BTreeMap<ValidatorId, ValidatorEras>)> {
        self.bins.iter()
    }

    pub fn validators(&self) -> impl Iterator<Item = &ValidatorId> {
        self.bins.values().flat_map(|validators| validators.keys())
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn validator_count(&self) -> usize {
        self.validators().count()
    }

    /// Era map for `validator` in `geo_bin`, inserted empty if absent.
    fn validator_slot(&mut self, geo_bin: &GeoBin, validator: &ValidatorId) -> &mut ValidatorEras {
        self.bins
            .entry(geo_bin.clone())
            .or_default()
            .entry(validator.clone())
            .or_default()
    }

    fn record(&mut self, geo_bin: &GeoBin, validator: &ValidatorId, era: Era, points: Points) {
        self.validator_slot(geo_bin, validator).insert(era, points);
    }
}

/// Validator-first itemized rewards: validator -> era -> reward records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorRewards {
    accounts: BTreeMap<ValidatorId, BTreeMap<Era, Vec<RewardEvent>>>,
}

impl ValidatorRewards {
    /// Regroup an era-first table by validator.
    pub fn from_era_table(table: EraRewardsTable) -> Self {
        let mut accounts: BTreeMap<ValidatorId, BTreeMap<Era, Vec<RewardEvent>>> =
            BTreeMap::new();
        for (era, validators) in table {
            for (validator, events) in validators {
                accounts
                    .entry(validator)
                    .or_default()
                    .entry(era)
                    .or_default()
                    .extend(events);
            }
        }
        Self { accounts }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ValidatorId, &BTreeMap<Era, Vec<RewardEvent>>)> {
        self.accounts.iter()
    }
}

impl FromIterator<(ValidatorId, BTreeMap<Era, Vec<RewardEvent>>)> for ValidatorRewards {
    fn from_iter<T: IntoIterator<Item = (ValidatorId, BTreeMap<Era, Vec<RewardEvent>>)>>(
        iter: T,
    ) -> Self {
        Self {
            accounts: iter.into_iter().collect(),
        }
    }
}

/// The single place unknown validators are dropped. Validators without a
/// geo-bin contribute nothing, not even an empty entry.
fn lookup_or_skip<'a>(directory: &'a GeoBinDirectory, validator: &str) -> Option<&'a GeoBin> {
    let geo_bin = directory.geo_bin(validator);
    if geo_bin.is_none() {
        log::trace!("Validator {} has no geo bin, skipping", validator);
    }
    geo_bin
}

/// Join era-first reward points with the directory.
pub fn join_points(table: &EraPointsTable, directory: &GeoBinDirectory) -> JoinedPoints {
    let mut joined = JoinedPoints::seeded(directory);
    let mut dropped = 0usize;

    for (era, validators) in table {
        for (validator, points) in validators {
            match lookup_or_skip(directory, validator) {
                Some(geo_bin) => joined.record(geo_bin, validator, *era, Points::from(*points)),
                None => dropped += 1,
            }
        }
    }

    log::info!(
        "Joined {} validators, dropped {} era entries without geo bin",
        joined.validator_count(),
        dropped
    );
    joined
}

/// Join validator-first itemized rewards with the directory. All records of a
/// (validator, era) pair are summed into one scalar.
pub fn join_rewards(rewards: &ValidatorRewards, directory: &GeoBinDirectory) -> JoinedPoints {
    let mut joined = JoinedPoints::seeded(directory);
    let mut dropped = 0usize;

    for (validator, eras) in rewards.iter() {
        let Some(geo_bin) = lookup_or_skip(directory, validator) else {
            dropped += 1;
            continue;
        };
        for (era, events) in eras {
            let total: Points = events.iter().map(|event| event.reward).sum();
            joined.record(geo_bin, validator, *era, total);
        }
    }

    log::info!(
        "Joined {} validators, dropped {} validators without geo bin",
        joined.validator_count(),
        dropped
    );
    joined
}
