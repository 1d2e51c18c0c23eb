//! ENS reverse lookup over JSON-RPC

use alloy_primitives::{address, Address, B256};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::rpc_client::RpcClient;
use crate::account::checksum::parse_address;
use crate::account::ChainId;
use crate::ens::namehash::{namehash, reverse_node};
use crate::ens::NameLookupService;
use crate::error::AccountsError;

/// ENS registry, same address on every chain it is deployed to
pub const ENS_REGISTRY: Address = address!("00000000000C2E074eC69A0dFb2997BA6C7d2e1e");

sol! {
    interface IEnsRegistry {
        function resolver(bytes32 node) external view returns (address);
    }

    interface INameResolver {
        function name(bytes32 node) external view returns (string);
    }

    interface IAddrResolver {
        function addr(bytes32 node) external view returns (address);
    }
}

pub fn has_ens_deployment(chain: ChainId) -> bool {
    matches!(chain, ChainId::MAINNET | ChainId::GOERLI | ChainId::SEPOLIA)
}

/// `eth_call` plus return decoding; `None` when the target returned no data
async fn call<C: SolCall>(rpc: &RpcClient, to: Address, call: C) -> Result<Option<C::Return>, AccountsError> {
    let data = rpc.eth_call(to, call.abi_encode()).await?;
    if data.is_empty() {
        return Ok(None);
    }
    C::abi_decode_returns(&data)
        .map(Some)
        .map_err(|e| AccountsError::Rpc(format!("Bad {} return data: {}", C::SIGNATURE, e)))
}

/// Reverse resolution with forward verification, one RPC endpoint per chain
pub struct EnsRpcClient {
    endpoints: HashMap<ChainId, RpcClient>,
}

impl EnsRpcClient {
    pub fn new(endpoints: &HashMap<ChainId, String>, timeout: Duration) -> Result<Self, AccountsError> {
        let endpoints = endpoints
            .iter()
            .map(|(chain, url)| Ok((*chain, RpcClient::new(url.clone(), timeout)?)))
            .collect::<Result<HashMap<_, _>, AccountsError>>()?;
        Ok(Self { endpoints })
    }

    pub fn supports(&self, chain: ChainId) -> bool {
        has_ens_deployment(chain) && self.endpoints.contains_key(&chain)
    }

    async fn resolver_for(&self, rpc: &RpcClient, node: B256) -> Result<Option<Address>, AccountsError> {
        let resolver = call(rpc, ENS_REGISTRY, IEnsRegistry::resolverCall { node }).await?;
        Ok(resolver.filter(|r| !r.is_zero()))
    }
}

#[async_trait]
impl NameLookupService for EnsRpcClient {
    async fn reverse_lookup(
        &self,
        address: &str,
        chain: ChainId,
    ) -> Result<Option<String>, AccountsError> {
        if !has_ens_deployment(chain) {
            return Ok(None);
        }
        let Some(rpc) = self.endpoints.get(&chain) else {
            debug!("No RPC endpoint configured for {}", chain);
            return Ok(None);
        };
        let account = parse_address(address)?;

        let node = reverse_node(&account);
        let Some(resolver) = self.resolver_for(rpc, node).await? else {
            return Ok(None);
        };
        let name = call(rpc, resolver, INameResolver::nameCall { node })
            .await?
            .unwrap_or_default();
        if name.is_empty() {
            return Ok(None);
        }

        // A reverse record is only trusted if the name points back at the address
        let forward_node = namehash(&name);
        let Some(forward_resolver) = self.resolver_for(rpc, forward_node).await? else {
            return Ok(None);
        };
        let resolved = call(rpc, forward_resolver, IAddrResolver::addrCall { node: forward_node }).await?;
        if resolved == Some(account) {
            Ok(Some(name))
        } else {
            debug!("Reverse record {} for {} does not resolve back", name, address);
            Ok(None)
        }
    }
}
