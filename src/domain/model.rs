use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Chain name keyed map, ordered so listings are stable between loads.
pub type ChainMap<T> = BTreeMap<String, T>;

/// Contract name to address, e.g. `mailbox` -> `0x...`.
pub type ChainAddresses = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolType {
    Ethereum,
    Sealevel,
    Cosmos,
    CosmosNative,
    Starknet,
    Radix,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProtocolType::Ethereum => "ethereum",
            ProtocolType::Sealevel => "sealevel",
            ProtocolType::Cosmos => "cosmos",
            ProtocolType::CosmosNative => "cosmosnative",
            ProtocolType::Starknet => "starknet",
            ProtocolType::Radix => "radix",
            ProtocolType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Registry chain ids are numeric for EVM chains and free text for others
/// (`osmosis-1`, `mainnet-beta`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainId {
    Numeric(u64),
    Text(String),
}

impl ChainId {
    /// Numeric value used for ordering; text ids count when they parse.
    pub fn as_number(&self) -> Option<u64> {
        match self {
            ChainId::Numeric(n) => Some(*n),
            ChainId::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainId::Numeric(n) => write!(f, "{}", n),
            ChainId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeToken {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcUrl {
    pub http: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockExplorer {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainMetadata {
    pub name: String,
    pub chain_id: ChainId,
    #[serde(default)]
    pub domain_id: Option<u32>,
    pub protocol: ProtocolType,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub native_token: Option<NativeToken>,
    #[serde(default)]
    pub rpc_urls: Vec<RpcUrl>,
    #[serde(default)]
    pub block_explorers: Vec<BlockExplorer>,
    #[serde(default)]
    pub is_testnet: Option<bool>,
    /// Keys this crate does not model, kept so callers can still read them.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarpTokenConnection {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarpToken {
    pub chain_name: String,
    pub standard: String,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address_or_denom: Option<String>,
    #[serde(default)]
    pub collateral_address_or_denom: Option<String>,
    #[serde(default)]
    pub connections: Vec<WarpTokenConnection>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarpCoreConfig {
    pub tokens: Vec<WarpToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

/// One direction of a warp route: a transfer from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarpRoute {
    pub id: String,
    pub from: WarpToken,
    pub to: WarpToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorInfo {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u32>,
    pub validators: Vec<ValidatorInfo>,
}

/// Warp routes touching a single chain, as a list and as a map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChainWarpRoutes {
    pub warp_routes_array: Vec<(String, WarpCoreConfig)>,
    pub warp_routes: BTreeMap<String, WarpCoreConfig>,
}

impl ChainWarpRoutes {
    pub fn is_empty(&self) -> bool {
        self.warp_routes_array.is_empty()
    }
}
