use httpmock::prelude::*;
use registry_store::core::RegistrySource;
use registry_store::utils::error::StoreError;
use registry_store::{CdnValidatorSource, LocalRegistry, RegistryStore};
use std::path::PathBuf;
use tempfile::TempDir;

fn registry_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/registry")
}

fn validators_at(server: &MockServer) -> CdnValidatorSource {
    CdnValidatorSource::with_client(reqwest::Client::new(), server.url("/multisigIsm.ts"))
}

#[tokio::test]
async fn test_local_registry_reads_layout() {
    let registry = LocalRegistry::new(registry_fixture());

    let metadata = registry.get_metadata().await.unwrap();
    let addresses = registry.get_addresses().await.unwrap();
    let warp_routes = registry.get_warp_routes().await.unwrap();

    assert_eq!(
        metadata.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["base", "ethereum", "osmosis", "unlaunched"]
    );
    assert_eq!(
        addresses.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["base", "ethereum"]
    );
    // *-deploy.yaml 不是路由設定
    assert_eq!(
        warp_routes.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["ETH/base-osmosis-unlaunched", "USDC/base-ethereum"]
    );
    assert!(warp_routes["ETH/base-osmosis-unlaunched"].options.is_some());
}

#[tokio::test]
async fn test_store_over_local_registry() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/multisigIsm.ts");
        then.status(200).body(
            std::fs::read_to_string(
                PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/multisigIsm.ts"),
            )
            .unwrap(),
        );
    });

    let store = RegistryStore::new(LocalRegistry::new(registry_fixture()), validators_at(&server));
    let summary = store.load().await.unwrap();

    assert_eq!(summary.chains, 3);
    assert_eq!(summary.routes, 8);

    let ids: Vec<String> = store
        .chains()
        .into_iter()
        .map(|c| c.chain_id.to_string())
        .collect();
    assert_eq!(ids, vec!["1", "8453", "osmosis-1"]);

    let osmosis = store.get_validators("osmosis").unwrap();
    assert_eq!(osmosis.len(), 1);
    assert!(osmosis[0].alias.is_none());
}

#[tokio::test]
async fn test_unreachable_validators_host_is_tolerated() {
    // 沒有任何 mock，CDN 回 404
    let server = MockServer::start();

    let store = RegistryStore::new(LocalRegistry::new(registry_fixture()), validators_at(&server));
    let summary = store.load().await.unwrap();

    assert_eq!(summary.validator_chains, 0);
    assert!(store.validators().is_empty());
    assert!(store.get_chain("base").is_some());
}

#[tokio::test]
async fn test_empty_directory_is_an_empty_registry() {
    let temp_dir = TempDir::new().unwrap();
    let registry = LocalRegistry::new(temp_dir.path());

    assert!(registry.get_metadata().await.unwrap().is_empty());
    assert!(registry.get_warp_routes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_metadata_file_fails_load() {
    let temp_dir = TempDir::new().unwrap();
    let chain_dir = temp_dir.path().join("chains").join("broken");
    std::fs::create_dir_all(&chain_dir).unwrap();
    std::fs::write(chain_dir.join("metadata.yaml"), "name: broken\n").unwrap();

    let server = MockServer::start();
    let store = RegistryStore::new(LocalRegistry::new(temp_dir.path()), validators_at(&server));

    let result = store.load().await;

    assert!(matches!(result, Err(StoreError::RegistryError { .. })));
    assert!(store.is_loading());
}
