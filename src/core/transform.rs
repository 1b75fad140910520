use crate::domain::model::{
    ChainAddresses, ChainMap, ChainMetadata, ProtocolType, WarpCoreConfig, WarpRoute,
};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Drops EVM chains without a deployed mailbox and orders the rest by chain id.
///
/// Non-EVM chains are kept regardless of addresses. Chain ids that are not
/// numeric sort after every numeric id; ties keep registry order.
pub fn filter_and_sort_chains(
    metadata: &ChainMap<ChainMetadata>,
    addresses: &ChainMap<ChainAddresses>,
) -> Vec<ChainMetadata> {
    let mut chains: Vec<ChainMetadata> = metadata
        .values()
        .filter(|chain| match chain.protocol {
            ProtocolType::Ethereum => has_mailbox(addresses, &chain.name),
            _ => true,
        })
        .cloned()
        .collect();

    chains.sort_by(compare_chain_ids);
    chains
}

fn has_mailbox(addresses: &ChainMap<ChainAddresses>, chain: &str) -> bool {
    addresses
        .get(chain)
        .and_then(|a| a.get("mailbox"))
        .is_some_and(|mailbox| !mailbox.is_empty())
}

fn compare_chain_ids(a: &ChainMetadata, b: &ChainMetadata) -> Ordering {
    match (a.chain_id.as_number(), b.chain_id.as_number()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Expands every route config into directed token pairs.
///
/// A token is never paired with itself; two tokens at different positions
/// are distinct even if their contents are equal.
pub fn expand_routes(warp_routes: &BTreeMap<String, WarpCoreConfig>) -> Vec<WarpRoute> {
    let mut routes = Vec::new();

    for (route_id, route) in warp_routes {
        for (i, from) in route.tokens.iter().enumerate() {
            for (j, to) in route.tokens.iter().enumerate() {
                if i == j {
                    continue;
                }
                routes.push(WarpRoute {
                    id: route_id.clone(),
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }
    }

    routes
}

/// Whether `chain` is one of the dash separated names in the route label,
/// e.g. `USDC/arbitrum-base-ethereum`.
pub fn route_touches_chain(route_id: &str, chain: &str) -> bool {
    route_id
        .split('/')
        .nth(1)
        .is_some_and(|label| label.split('-').any(|name| name == chain))
}
