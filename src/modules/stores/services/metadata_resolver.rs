use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::core::{Result, ShopId};
use crate::modules::stores::models::store_profile::{RegionEntry, StoreEntry};
use crate::modules::stores::models::{AccountRecord, StoreMetadata, StoreProfile, StoreRegion};
use crate::modules::stores::repositories::AccountRepository;

/// Parse an optional JSON array, `None` when absent or unparseable
fn parse_entries<T: DeserializeOwned>(
    account: &str,
    document: &str,
    raw: Option<&str>,
) -> Option<Vec<T>> {
    let raw = raw.map(str::trim).filter(|raw| !raw.is_empty())?;

    // Non-object entries are dropped individually
    match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(values) => Some(
            values
                .into_iter()
                .filter(|value| value.is_object())
                .filter_map(|value| serde_json::from_value(value).ok())
                .collect(),
        ),
        Err(e) => {
            warn!(account = %account, document, error = %e, "Skipping malformed account JSON");
            None
        }
    }
}

/// Flatten each account's store list to `shop_id -> {operator, sales, city}`.
/// Later accounts overwrite earlier ones for the same id.
pub fn resolve_metadata(accounts: &[AccountRecord]) -> HashMap<ShopId, StoreMetadata> {
    let mut mapping = HashMap::new();

    for account in accounts {
        let Some(stores) =
            parse_entries::<StoreEntry>(&account.account, "stores_json", account.stores_json.as_deref())
        else {
            continue;
        };

        let metadata = StoreMetadata {
            operator: account.operator_name.clone().unwrap_or_default(),
            sales: account.sales_name.clone().unwrap_or_default(),
            city: account.city_name.clone().unwrap_or_default(),
        };

        for shop_id in stores.into_iter().filter_map(|store| store.shop_id) {
            mapping.insert(shop_id, metadata.clone());
        }
    }

    mapping
}

/// Flatten each account's region document to `shop_id -> {city, district, region}`.
/// Later accounts overwrite earlier ones for the same id.
pub fn resolve_regions(accounts: &[AccountRecord]) -> HashMap<ShopId, StoreRegion> {
    let mut mapping = HashMap::new();

    for account in accounts {
        let Some(entries) =
            parse_entries::<RegionEntry>(&account.account, "region_json", account.region_json.as_deref())
        else {
            continue;
        };

        for entry in entries {
            let Some(shop_id) = entry.shop_id else {
                continue;
            };
            mapping.insert(
                shop_id,
                StoreRegion {
                    city: entry.city.unwrap_or_default(),
                    district: entry.district.unwrap_or_default(),
                    region: entry.region.unwrap_or_default(),
                },
            );
        }
    }

    mapping
}

/// Lookup table of resolved store metadata and regions
#[derive(Debug, Clone, Default)]
pub struct StoreDirectory {
    metadata: HashMap<ShopId, StoreMetadata>,
    regions: HashMap<ShopId, StoreRegion>,
}

impl StoreDirectory {
    pub fn new(
        metadata: HashMap<ShopId, StoreMetadata>,
        regions: HashMap<ShopId, StoreRegion>,
    ) -> Self {
        Self { metadata, regions }
    }

    pub fn from_accounts(accounts: &[AccountRecord]) -> Self {
        Self::new(resolve_metadata(accounts), resolve_regions(accounts))
    }

    /// Merged profile; the account city wins over the region city
    pub fn profile(&self, shop_id: ShopId) -> StoreProfile {
        let metadata = self.metadata.get(&shop_id).cloned().unwrap_or_default();
        let region = self.regions.get(&shop_id).cloned().unwrap_or_default();

        StoreProfile {
            operator: metadata.operator,
            sales: metadata.sales,
            city: if metadata.city.is_empty() {
                region.city
            } else {
                metadata.city
            },
            district: region.district,
            region: region.region,
        }
    }

    /// Number of distinct stores known from either source
    pub fn len(&self) -> usize {
        self.metadata
            .keys()
            .chain(self.regions.keys())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty() && self.regions.is_empty()
    }
}

/// Loads accounts and builds a [`StoreDirectory`] per report run
pub struct MetadataResolver {
    account_repo: Arc<dyn AccountRepository>,
}

impl MetadataResolver {
    pub fn new(account_repo: Arc<dyn AccountRepository>) -> Self {
        Self { account_repo }
    }

    pub async fn load_directory(&self, account_filter: Option<&[String]>) -> Result<StoreDirectory> {
        let accounts = self.account_repo.fetch_accounts(account_filter).await?;
        let directory = StoreDirectory::from_accounts(&accounts);

        info!(
            accounts = accounts.len(),
            stores = directory.len(),
            "Store metadata resolved"
        );

        Ok(directory)
    }
}
