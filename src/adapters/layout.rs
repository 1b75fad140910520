//! Registry repository layout shared by the GitHub and filesystem sources.

use std::collections::BTreeMap;

pub const CHAINS_DIR: &str = "chains";
pub const WARP_ROUTES_DIR: &str = "deployments/warp_routes";

const METADATA_FILE: &str = "metadata.yaml";
const ADDRESSES_FILE: &str = "addresses.yaml";
const WARP_CONFIG_SUFFIX: &str = "-config.yaml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryPath {
    ChainMetadata(String),
    ChainAddresses(String),
    /// Route id such as `USDC/arbitrum-base`.
    WarpRouteConfig(String),
}

/// Classifies a `/` separated path relative to the registry root.
pub fn classify_path(path: &str) -> Option<RegistryPath> {
    let parts: Vec<&str> = path.split('/').collect();

    match parts.as_slice() {
        [CHAINS_DIR, chain, METADATA_FILE] => Some(RegistryPath::ChainMetadata(chain.to_string())),
        [CHAINS_DIR, chain, ADDRESSES_FILE] => {
            Some(RegistryPath::ChainAddresses(chain.to_string()))
        }
        ["deployments", "warp_routes", symbol, file] => file
            .strip_suffix(WARP_CONFIG_SUFFIX)
            .filter(|label| !label.is_empty())
            .map(|label| RegistryPath::WarpRouteConfig(format!("{}/{}", symbol, label))),
        _ => None,
    }
}

/// Registry files grouped by kind, each entry `key -> path`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryContent {
    pub metadata: BTreeMap<String, String>,
    pub addresses: BTreeMap<String, String>,
    pub warp_routes: BTreeMap<String, String>,
}

impl RegistryContent {
    pub fn from_paths<'a>(paths: impl IntoIterator<Item = &'a str>) -> Self {
        let mut content = Self::default();

        for path in paths {
            match classify_path(path) {
                Some(RegistryPath::ChainMetadata(chain)) => {
                    content.metadata.insert(chain, path.to_string());
                }
                Some(RegistryPath::ChainAddresses(chain)) => {
                    content.addresses.insert(chain, path.to_string());
                }
                Some(RegistryPath::WarpRouteConfig(id)) => {
                    content.warp_routes.insert(id, path.to_string());
                }
                None => {}
            }
        }

        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_registry_paths() {
        assert_eq!(
            classify_path("chains/ethereum/metadata.yaml"),
            Some(RegistryPath::ChainMetadata("ethereum".to_string()))
        );
        assert_eq!(
            classify_path("chains/ethereum/addresses.yaml"),
            Some(RegistryPath::ChainAddresses("ethereum".to_string()))
        );
        assert_eq!(
            classify_path("deployments/warp_routes/USDC/arbitrum-base-config.yaml"),
            Some(RegistryPath::WarpRouteConfig("USDC/arbitrum-base".to_string()))
        );
        assert_eq!(classify_path("deployments/warp_routes/USDC/arbitrum-base-deploy.yaml"), None);
        assert_eq!(classify_path("chains/ethereum/logo.svg"), None);
        assert_eq!(classify_path("chains/metadata.yaml"), None);
        assert_eq!(classify_path("deployments/warp_routes/USDC/-config.yaml"), None);
    }

    #[test]
    fn test_content_from_paths() {
        let content = RegistryContent::from_paths([
            "README.md",
            "chains/base/metadata.yaml",
            "chains/base/addresses.yaml",
            "chains/osmosis/metadata.yaml",
            "deployments/warp_routes/ETH/base-ethereum-config.yaml",
        ]);

        assert_eq!(content.metadata.len(), 2);
        assert_eq!(content.addresses.len(), 1);
        assert_eq!(
            content.warp_routes.get("ETH/base-ethereum").map(String::as_str),
            Some("deployments/warp_routes/ETH/base-ethereum-config.yaml")
        );
    }
}
