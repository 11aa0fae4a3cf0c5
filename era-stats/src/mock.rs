use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use crate::{ChainClient, Era, EraPointsTable, EraRewardsTable, EraTable, RewardEvent};

#[derive(Debug, thiserror::Error)]
#[error("mock chain: {0}")]
pub struct MockError(pub String);

/// In-memory chain. Every range query is recorded as `(start_era, count)`.
#[derive(Debug, Default)]
pub struct MockChain {
    pub active_era: Era,
    pub depth: u32,
    pub points: EraPointsTable,
    pub rewards: EraRewardsTable,
    /// Eras the chain pretends not to have.
    pub withheld: BTreeSet<Era>,
    /// A page starting at this era fails.
    pub fail_at: Option<Era>,
    pub calls: RefCell<Vec<(Era, u32)>>,
}

impl MockChain {
    pub fn new(active_era: Era, depth: u32) -> Self {
        Self {
            active_era,
            depth,
            ..Default::default()
        }
    }

    pub fn with_points(mut self, era: Era, points: &[(&str, u32)]) -> Self {
        self.points.insert(era, validator_map(points));
        self
    }

    pub fn with_rewards(mut self, era: Era, rewards: &[(&str, &[u128])]) -> Self {
        let validators = rewards
            .iter()
            .map(|(validator, amounts)| {
                let events = amounts.iter().map(|reward| RewardEvent { reward: *reward }).collect();
                (validator.to_string(), events)
            })
            .collect();
        self.rewards.insert(era, validators);
        self
    }

    /// Same points for every validator in every era of `eras`.
    pub fn with_flat_points(mut self, eras: impl IntoIterator<Item = Era>, points: u32) -> Self {
        for era in eras {
            self.points.insert(era, validator_map(&[("flat", points)]));
        }
        self
    }

    pub fn withholding(mut self, era: Era) -> Self {
        self.withheld.insert(era);
        self
    }

    pub fn failing_at(mut self, era: Era) -> Self {
        self.fail_at = Some(era);
        self
    }

    pub fn calls(&self) -> Vec<(Era, u32)> {
        self.calls.borrow().clone()
    }

    fn page<T: Clone>(&self, data: &EraTable<T>, start_era: Era, count: u32) -> Result<EraTable<T>, MockError> {
        self.calls.borrow_mut().push((start_era, count));
        if self.fail_at == Some(start_era) {
            return Err(MockError(format!("page at era {} unavailable", start_era)));
        }
        Ok(data
            .range(start_era..)
            .take_while(|(era, _)| **era - start_era < count)
            .filter(|(era, _)| !self.withheld.contains(era))
            .map(|(era, validators)| (*era, validators.clone()))
            .collect())
    }
}

pub fn validator_map<T: Clone>(entries: &[(&str, T)]) -> BTreeMap<String, T> {
    entries
        .iter()
        .map(|(validator, value)| (validator.to_string(), value.clone()))
        .collect()
}

impl ChainClient for MockChain {
    type Error = MockError;

    async fn active_era(&self) -> Result<Era, MockError> {
        Ok(self.active_era)
    }

    async fn history_depth(&self) -> Result<u32, MockError> {
        Ok(self.depth)
    }

    async fn era_reward_points(&self, start_era: Era, count: u32) -> Result<EraPointsTable, MockError> {
        self.page(&self.points, start_era, count)
    }

    async fn era_validator_rewards(
        &self,
        start_era: Era,
        count: u32,
    ) -> Result<EraRewardsTable, MockError> {
        self.page(&self.rewards, start_era, count)
    }
}
