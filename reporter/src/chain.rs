use sp_core::crypto::{AccountId32 as SpAccountId32, Ss58AddressFormat, Ss58Codec};
use subxt::backend::legacy::LegacyRpcMethods;
use subxt::backend::rpc::RpcClient;
use subxt::dynamic::Value;
use subxt::ext::scale_decode::DecodeAsType;
use subxt::storage::Storage;
use subxt::utils::AccountId32;
use subxt::{OnlineClient, SubstrateConfig};

use era_stats::{ChainClient, Era, EraPointsTable, EraRewardsTable, RewardEvent};

const STAKING: &str = "Staking";

type ChainStorage = Storage<SubstrateConfig, OnlineClient<SubstrateConfig>>;

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error(transparent)]
    Subxt(#[from] subxt::Error),

    #[error("failed to decode storage value: {0}")]
    Decode(#[from] subxt::ext::scale_decode::Error),

    #[error("storage value {pallet}.{item} not found")]
    Missing {
        pallet: &'static str,
        item: &'static str,
    },

    #[error("no block hash for block #{0}")]
    BlockNotFound(u64),
}

/// Only the era index; the start timestamp is left undecoded.
#[derive(Debug, DecodeAsType)]
#[decode_as_type(crate_path = "subxt::ext::scale_decode")]
struct ActiveEraInfo {
    index: u32,
}

#[derive(Debug, DecodeAsType)]
#[decode_as_type(crate_path = "subxt::ext::scale_decode")]
struct EraRewardPoints {
    total: u32,
    individual: Vec<(AccountId32, u32)>,
}

/// Render a raw account id as an SS58 address with the given network prefix.
pub fn to_ss58(account: &[u8; 32], prefix: u16) -> String {
    SpAccountId32::new(*account).to_ss58check_with_version(Ss58AddressFormat::custom(prefix))
}

/// Validator share of an era payout, pro rata to its points.
fn reward_share(payout: u128, points: u32, total: u32) -> u128 {
    if total == 0 {
        return 0;
    }
    let (points, total) = (points as u128, total as u128);
    (payout / total) * points + (payout % total) * points / total
}

/// Generic `pallet.item` storage read, decoded into `T`.
async fn item_query<T: DecodeAsType>(
    storage: &ChainStorage,
    pallet: &'static str,
    item: &'static str,
    keys: Vec<Value>,
) -> Result<Option<T>, ChainError> {
    let address = subxt::dynamic::storage(pallet, item, keys);
    match storage.fetch(&address).await? {
        Some(value) => Ok(Some(value.as_type::<T>()?)),
        None => Ok(None),
    }
}

/// Staking history reader over a live node.
pub struct SubxtChain {
    api: OnlineClient<SubstrateConfig>,
    rpc: LegacyRpcMethods<SubstrateConfig>,
    ss58_prefix: u16,
}

impl SubxtChain {
    pub async fn connect(rpc_url: &str, ss58_prefix: u16) -> Result<Self, ChainError> {
        let rpc_client = RpcClient::from_url(rpc_url).await?;
        let api = OnlineClient::<SubstrateConfig>::from_rpc_client(rpc_client.clone()).await?;
        let rpc = LegacyRpcMethods::<SubstrateConfig>::new(rpc_client);

        Ok(Self {
            api,
            rpc,
            ss58_prefix,
        })
    }

    async fn latest_storage(&self) -> Result<(ChainStorage, u64), ChainError> {
        let block = self.api.blocks().at_latest().await?;
        let number: u64 = block.number().into();
        Ok((self.api.storage().at(block.hash()), number))
    }

    async fn storage_at_number(&self, number: u64) -> Result<ChainStorage, ChainError> {
        let hash = self
            .rpc
            .chain_get_block_hash(Some(number.into()))
            .await?
            .ok_or(ChainError::BlockNotFound(number))?;
        Ok(self.api.storage().at(hash))
    }

    /// Genesis blocks have no active era yet.
    async fn active_era_at(storage: &ChainStorage) -> Result<Era, ChainError> {
        let info = item_query::<ActiveEraInfo>(storage, STAKING, "ActiveEra", vec![]).await?;
        Ok(info.map(|info| info.index).unwrap_or(0))
    }

    /// Storage at the first block whose active era is `start_era + count`, so
    /// the whole page is both finalized and still retained there. Pages reaching
    /// the current era are read at the latest block.
    async fn storage_for_page(&self, start_era: Era, count: u32) -> Result<ChainStorage, ChainError> {
        let target = start_era.saturating_add(count);
        let (latest, latest_number) = self.latest_storage().await?;
        if target >= Self::active_era_at(&latest).await? {
            return Ok(latest);
        }

        let (mut low, mut high) = (0u64, latest_number);
        while low < high {
            let mid = low + (high - low) / 2;
            let era = Self::active_era_at(&self.storage_at_number(mid).await?).await?;
            if era >= target {
                high = mid;
            } else {
                low = mid + 1;
            }
        }

        log::debug!("Eras {}..{} read at block #{}", start_era, target, low);
        self.storage_at_number(low).await
    }

    async fn reward_points_at(
        &self,
        storage: &ChainStorage,
        era: Era,
    ) -> Result<Option<EraRewardPoints>, ChainError> {
        item_query(storage, STAKING, "ErasRewardPoints", vec![Value::u128(era as u128)]).await
    }

    fn address(&self, account: &AccountId32) -> String {
        to_ss58(&account.0, self.ss58_prefix)
    }
}

impl ChainClient for SubxtChain {
    type Error = ChainError;

    async fn active_era(&self) -> Result<Era, ChainError> {
        let (storage, _) = self.latest_storage().await?;
        item_query::<ActiveEraInfo>(&storage, STAKING, "ActiveEra", vec![])
            .await?
            .map(|info| info.index)
            .ok_or(ChainError::Missing {
                pallet: STAKING,
                item: "ActiveEra",
            })
    }

    /// Storage item on older runtimes, pallet constant on newer ones.
    async fn history_depth(&self) -> Result<u32, ChainError> {
        let (storage, _) = self.latest_storage().await?;
        if let Some(depth) = item_query::<u32>(&storage, STAKING, "HistoryDepth", vec![]).await? {
            return Ok(depth);
        }

        let address = subxt::dynamic::constant(STAKING, "HistoryDepth");
        let depth = self.api.constants().at(&address)?.as_type::<u32>()?;
        Ok(depth)
    }

    async fn era_reward_points(&self, start_era: Era, count: u32) -> Result<EraPointsTable, ChainError> {
        let storage = self.storage_for_page(start_era, count).await?;
        let mut table = EraPointsTable::new();

        for era in start_era..start_era.saturating_add(count) {
            let Some(points) = self.reward_points_at(&storage, era).await? else {
                log::warn!("No reward points stored for era {}", era);
                continue;
            };
            let validators = points
                .individual
                .iter()
                .map(|(account, points)| (self.address(account), *points))
                .collect();
            table.insert(era, validators);
        }

        Ok(table)
    }

    async fn era_validator_rewards(
        &self,
        start_era: Era,
        count: u32,
    ) -> Result<EraRewardsTable, ChainError> {
        let storage = self.storage_for_page(start_era, count).await?;
        let mut table = EraRewardsTable::new();

        for era in start_era..start_era.saturating_add(count) {
            let payout = item_query::<u128>(
                &storage,
                STAKING,
                "ErasValidatorReward",
                vec![Value::u128(era as u128)],
            )
            .await?;
            let (Some(payout), Some(points)) = (payout, self.reward_points_at(&storage, era).await?)
            else {
                log::warn!("No validator payout stored for era {}", era);
                continue;
            };

            let validators = points
                .individual
                .iter()
                .map(|(account, validator_points)| {
                    let reward = reward_share(payout, *validator_points, points.total);
                    (self.address(account), vec![RewardEvent { reward }])
                })
                .collect();
            table.insert(era, validators);
        }

        Ok(table)
    }
}
