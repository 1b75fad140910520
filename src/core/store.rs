use crate::core::transform::{expand_routes, filter_and_sort_chains, route_touches_chain};
use crate::core::validators::parse_validators;
use crate::core::{RegistrySource, ValidatorSource};
use crate::domain::model::{
    ChainAddresses, ChainMap, ChainMetadata, ChainWarpRoutes, MultisigConfig, ValidatorInfo,
    WarpCoreConfig, WarpRoute,
};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Everything one load produced. Replaced as a whole, never patched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub chains: Vec<ChainMetadata>,
    pub routes: Vec<WarpRoute>,
    pub addresses: ChainMap<ChainAddresses>,
    pub warp_routes: BTreeMap<String, WarpCoreConfig>,
    pub validators: ChainMap<MultisigConfig>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn build(
        metadata: ChainMap<ChainMetadata>,
        addresses: ChainMap<ChainAddresses>,
        warp_routes: BTreeMap<String, WarpCoreConfig>,
        validators_file: Option<&str>,
    ) -> Self {
        let chains = filter_and_sort_chains(&metadata, &addresses);
        let routes = expand_routes(&warp_routes);
        let validators = validators_file.map(parse_validators).unwrap_or_default();

        Self {
            chains,
            routes,
            addresses,
            warp_routes,
            validators,
            loaded_at: Some(Utc::now()),
        }
    }

    pub fn get_chain(&self, chain: &str) -> Option<&ChainMetadata> {
        self.chains.iter().find(|c| c.name == chain)
    }

    pub fn get_addresses(&self, chain: &str) -> Option<&ChainAddresses> {
        self.addresses.get(chain)
    }

    pub fn get_validators(&self, chain: &str) -> Option<&[ValidatorInfo]> {
        self.validators.get(chain).map(|c| c.validators.as_slice())
    }

    pub fn get_threshold(&self, chain: &str) -> Option<u32> {
        self.validators.get(chain).and_then(|c| c.threshold)
    }

    /// Warp routes whose label names `chain`, e.g. `USDC/arbitrum-base` for `base`.
    pub fn get_warp_routes(&self, chain: &str) -> ChainWarpRoutes {
        let warp_routes_array: Vec<(String, WarpCoreConfig)> = self
            .warp_routes
            .iter()
            .filter(|(id, _)| route_touches_chain(id, chain))
            .map(|(id, config)| (id.clone(), config.clone()))
            .collect();
        let warp_routes = warp_routes_array.iter().cloned().collect();

        ChainWarpRoutes {
            warp_routes_array,
            warp_routes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub chains: usize,
    pub routes: usize,
    pub warp_routes: usize,
    pub validator_chains: usize,
}

impl From<&Snapshot> for LoadSummary {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            chains: snapshot.chains.len(),
            routes: snapshot.routes.len(),
            warp_routes: snapshot.warp_routes.len(),
            validator_chains: snapshot.validators.len(),
        }
    }
}

#[derive(Debug)]
struct StoreState {
    is_loading: bool,
    snapshot: Arc<Snapshot>,
}

/// In-memory registry cache with synchronous lookups.
///
/// `load` fetches everything and swaps in a fresh [`Snapshot`]; readers
/// holding an older `Arc<Snapshot>` keep seeing consistent data.
pub struct RegistryStore<R: RegistrySource, V: ValidatorSource> {
    registry: R,
    validator_source: V,
    state: RwLock<StoreState>,
}

impl<R: RegistrySource, V: ValidatorSource> RegistryStore<R, V> {
    pub fn new(registry: R, validator_source: V) -> Self {
        Self {
            registry,
            validator_source,
            state: RwLock::new(StoreState {
                is_loading: true,
                snapshot: Arc::new(Snapshot::default()),
            }),
        }
    }

    /// Fetches metadata, addresses, warp routes and the validators file
    /// concurrently, then replaces the snapshot.
    ///
    /// A failed validators fetch leaves validators empty; any other failure
    /// is returned and the previous snapshot stays in place.
    pub async fn load(&self) -> Result<LoadSummary> {
        tracing::info!("Loading registry data");

        let (metadata, addresses, warp_routes, validators_file) = tokio::join!(
            self.registry.get_metadata(),
            self.registry.get_addresses(),
            self.registry.get_warp_routes(),
            self.validator_source.fetch_validators_file(),
        );

        let metadata = metadata?;
        let addresses = addresses?;
        let warp_routes = warp_routes?;
        let validators_file = match validators_file {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("⚠️ Validators file unavailable, continuing without validators: {}", e);
                None
            }
        };

        tracing::debug!(
            "Fetched {} chains, {} address sets, {} warp routes",
            metadata.len(),
            addresses.len(),
            warp_routes.len()
        );

        let snapshot = Snapshot::build(metadata, addresses, warp_routes, validators_file.as_deref());
        let summary = LoadSummary::from(&snapshot);

        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.snapshot = Arc::new(snapshot);
            state.is_loading = false;
        }

        tracing::info!(
            "✅ Registry loaded: {} chains, {} routes, {} warp route configs, {} validator sets",
            summary.chains,
            summary.routes,
            summary.warp_routes,
            summary.validator_chains
        );
        Ok(summary)
    }

    /// True until the first successful load.
    pub fn is_loading(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_loading
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(
            &self
                .state
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .snapshot,
        )
    }

    pub fn chains(&self) -> Vec<ChainMetadata> {
        self.snapshot().chains.clone()
    }

    pub fn routes(&self) -> Vec<WarpRoute> {
        self.snapshot().routes.clone()
    }

    pub fn addresses(&self) -> ChainMap<ChainAddresses> {
        self.snapshot().addresses.clone()
    }

    pub fn warp_routes(&self) -> BTreeMap<String, WarpCoreConfig> {
        self.snapshot().warp_routes.clone()
    }

    pub fn validators(&self) -> ChainMap<MultisigConfig> {
        self.snapshot().validators.clone()
    }

    pub fn get_chain(&self, chain: &str) -> Option<ChainMetadata> {
        self.snapshot().get_chain(chain).cloned()
    }

    pub fn get_addresses(&self, chain: &str) -> Option<ChainAddresses> {
        self.snapshot().get_addresses(chain).cloned()
    }

    pub fn get_validators(&self, chain: &str) -> Option<Vec<ValidatorInfo>> {
        self.snapshot().get_validators(chain).map(<[ValidatorInfo]>::to_vec)
    }

    pub fn get_threshold(&self, chain: &str) -> Option<u32> {
        self.snapshot().get_threshold(chain)
    }

    pub fn get_warp_routes(&self, chain: &str) -> ChainWarpRoutes {
        self.snapshot().get_warp_routes(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ChainId, ProtocolType, WarpToken};
    use crate::utils::error::StoreError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct MockRegistry {
        fail_addresses: AtomicBool,
    }

    impl MockRegistry {
        fn new() -> Self {
            Self {
                fail_addresses: AtomicBool::new(false),
            }
        }
    }

    fn chain(name: &str, chain_id: u64, protocol: ProtocolType) -> ChainMetadata {
        ChainMetadata {
            name: name.to_string(),
            chain_id: ChainId::Numeric(chain_id),
            domain_id: Some(chain_id as u32),
            protocol,
            display_name: None,
            native_token: None,
            rpc_urls: vec![],
            block_explorers: vec![],
            is_testnet: None,
            extra: BTreeMap::new(),
        }
    }

    fn token(chain_name: &str) -> WarpToken {
        WarpToken {
            chain_name: chain_name.to_string(),
            standard: "EvmHypSynthetic".to_string(),
            decimals: Some(18),
            symbol: Some("ETH".to_string()),
            name: Some("Ether".to_string()),
            address_or_denom: None,
            collateral_address_or_denom: None,
            connections: vec![],
            extra: BTreeMap::new(),
        }
    }

    #[async_trait]
    impl RegistrySource for MockRegistry {
        async fn get_metadata(&self) -> Result<ChainMap<ChainMetadata>> {
            let mut metadata = ChainMap::new();
            metadata.insert("base".to_string(), chain("base", 8453, ProtocolType::Ethereum));
            metadata.insert("ethereum".to_string(), chain("ethereum", 1, ProtocolType::Ethereum));
            metadata.insert("nomailbox".to_string(), chain("nomailbox", 5, ProtocolType::Ethereum));
            Ok(metadata)
        }

        async fn get_addresses(&self) -> Result<ChainMap<ChainAddresses>> {
            if self.fail_addresses.load(Ordering::SeqCst) {
                return Err(StoreError::HttpStatusError {
                    url: "http://registry/addresses".to_string(),
                    status: 503,
                });
            }
            let mut addresses = ChainMap::new();
            for name in ["base", "ethereum"] {
                let mut map = ChainAddresses::new();
                map.insert("mailbox".to_string(), format!("0x{}", name));
                addresses.insert(name.to_string(), map);
            }
            Ok(addresses)
        }

        async fn get_warp_routes(&self) -> Result<BTreeMap<String, WarpCoreConfig>> {
            let mut routes = BTreeMap::new();
            routes.insert(
                "ETH/base-ethereum".to_string(),
                WarpCoreConfig {
                    tokens: vec![token("base"), token("ethereum")],
                    options: None,
                },
            );
            routes.insert(
                "USDC/arbitrum-optimism".to_string(),
                WarpCoreConfig {
                    tokens: vec![token("arbitrum"), token("optimism")],
                    options: None,
                },
            );
            Ok(routes)
        }
    }

    struct MockValidators {
        body: Option<&'static str>,
    }

    #[async_trait]
    impl ValidatorSource for MockValidators {
        async fn fetch_validators_file(&self) -> Result<String> {
            self.body
                .map(str::to_string)
                .ok_or_else(|| StoreError::HttpStatusError {
                    url: "http://cdn/multisigIsm.ts".to_string(),
                    status: 404,
                })
        }
    }

    const VALIDATORS: &str = r#"
export const defaultMultisigConfigs = {
  base: {
    threshold: 1,
    validators: [{ address: '0xb0', alias: 'Abacus Works' }],
  },
};
"#;

    #[tokio::test]
    async fn test_store_starts_loading_and_empty() {
        let store = RegistryStore::new(MockRegistry::new(), MockValidators { body: None });

        assert!(store.is_loading());
        assert!(store.chains().is_empty());
        assert!(store.get_chain("base").is_none());
        assert!(store.get_warp_routes("base").is_empty());
    }

    #[tokio::test]
    async fn test_load_populates_snapshot() {
        let store = RegistryStore::new(
            MockRegistry::new(),
            MockValidators {
                body: Some(VALIDATORS),
            },
        );

        let summary = store.load().await.unwrap();

        assert!(!store.is_loading());
        assert_eq!(
            summary,
            LoadSummary {
                chains: 2,
                routes: 4,
                warp_routes: 2,
                validator_chains: 1,
            }
        );

        let names: Vec<String> = store.chains().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["ethereum", "base"]);
        assert!(store.snapshot().loaded_at.is_some());
    }

    #[tokio::test]
    async fn test_accessors_after_load() {
        let store = RegistryStore::new(
            MockRegistry::new(),
            MockValidators {
                body: Some(VALIDATORS),
            },
        );
        store.load().await.unwrap();

        assert_eq!(store.get_chain("base").unwrap().chain_id, ChainId::Numeric(8453));
        assert!(store.get_chain("nomailbox").is_none());
        assert!(store.get_chain("unknown").is_none());

        // 地址表保留原始資料，不受鏈過濾影響
        assert!(store.get_addresses("ethereum").is_some());
        assert!(store.get_addresses("unknown").is_none());

        let validators = store.get_validators("base").unwrap();
        assert_eq!(validators[0].address, "0xb0");
        assert_eq!(store.get_threshold("base"), Some(1));
        assert!(store.get_validators("ethereum").is_none());
        assert!(store.get_threshold("ethereum").is_none());

        let base_routes = store.get_warp_routes("base");
        assert_eq!(base_routes.warp_routes_array.len(), 1);
        assert_eq!(base_routes.warp_routes_array[0].0, "ETH/base-ethereum");
        assert!(base_routes.warp_routes.contains_key("ETH/base-ethereum"));
        assert!(store.get_warp_routes("ETH").is_empty());
    }

    #[tokio::test]
    async fn test_validators_failure_is_swallowed() {
        let store = RegistryStore::new(MockRegistry::new(), MockValidators { body: None });

        let summary = store.load().await.unwrap();

        assert_eq!(summary.validator_chains, 0);
        assert!(store.validators().is_empty());
        assert_eq!(store.chains().len(), 2);
    }

    #[tokio::test]
    async fn test_registry_failure_propagates_and_keeps_previous_snapshot() {
        let registry = MockRegistry::new();
        let store = RegistryStore::new(
            registry,
            MockValidators {
                body: Some(VALIDATORS),
            },
        );
        store.load().await.unwrap();
        let before = store.snapshot();

        store.registry.fail_addresses.store(true, Ordering::SeqCst);
        let result = store.load().await;

        assert!(matches!(
            result,
            Err(StoreError::HttpStatusError { status: 503, .. })
        ));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(store.chains().len(), 2);
    }

    #[tokio::test]
    async fn test_routes_exclude_self_pairs() {
        let store = RegistryStore::new(MockRegistry::new(), MockValidators { body: None });
        store.load().await.unwrap();

        let routes = store.routes();
        assert_eq!(routes.len(), 4);
        assert!(routes.iter().all(|r| r.from != r.to));
    }
}
