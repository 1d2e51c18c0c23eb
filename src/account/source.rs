//! Upstream account, balance and rate inputs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use super::balance::{BalanceMap, FiatRate, Wei};
use super::checksum::to_checksum_address;
use super::types::{ChainId, RawAccount};
use crate::error::AccountsError;

/// Ordered accounts and the currently active one
pub trait AccountSource {
    fn accounts(&self) -> Vec<RawAccount>;
    fn selected_address(&self) -> String;

    /// Upstream state is still being populated and should not be shown yet
    fn is_loading(&self) -> bool {
        false
    }
}

/// Raw balances per chain, keyed by checksum address
pub trait BalanceSource {
    fn balances(&self, chain: ChainId) -> BalanceMap;
}

/// Current fiat conversion
pub trait RateSource {
    fn rate(&self) -> FiatRate;
}

/// Point-in-time wallet state, loadable from TOML
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct WalletSnapshot {
    pub chain_id: Option<ChainId>,
    #[serde(default)]
    pub selected_address: String,
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub rate: FiatRate,
    #[serde(default)]
    pub accounts: Vec<RawAccount>,
    /// chain id -> address -> balance
    #[serde(default)]
    pub balances: HashMap<ChainId, HashMap<String, Wei>>,
    #[serde(default)]
    pub loading: bool,
}

impl WalletSnapshot {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AccountsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let snapshot: WalletSnapshot = toml::from_str(&text)?;
        info!(
            "Loaded wallet snapshot from {} ({} accounts)",
            path.display(),
            snapshot.accounts.len()
        );
        Ok(snapshot)
    }

    pub fn chain(&self) -> ChainId {
        self.chain_id.unwrap_or(ChainId::MAINNET)
    }

    pub fn set_balance(&mut self, chain: ChainId, address: &str, balance: Wei) {
        self.balances
            .entry(chain)
            .or_default()
            .insert(address.to_string(), balance);
    }
}

impl AccountSource for WalletSnapshot {
    fn accounts(&self) -> Vec<RawAccount> {
        self.accounts.clone()
    }

    fn selected_address(&self) -> String {
        self.selected_address.clone()
    }

    fn is_loading(&self) -> bool {
        self.loading
    }
}

impl BalanceSource for WalletSnapshot {
    fn balances(&self, chain: ChainId) -> BalanceMap {
        let Some(per_chain) = self.balances.get(&chain) else {
            return BalanceMap::new();
        };
        // Snapshot files are hand-edited; accept any casing
        per_chain
            .iter()
            .filter_map(|(address, balance)| match to_checksum_address(address) {
                Ok(checksummed) => Some((checksummed, balance.clone())),
                Err(e) => {
                    warn!("Skipping balance entry: {}", e);
                    None
                }
            })
            .collect()
    }
}

impl RateSource for WalletSnapshot {
    fn rate(&self) -> FiatRate {
        self.rate.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::types::KeyringType;
    use std::io::Write;

    const SNAPSHOT: &str = r#"
chain_id = "0x1"
selected_address = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359"
ticker = "ETH"

[rate]
conversion_rate = 1850.25
currency = "usd"

[[accounts]]
address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
name = "Account 1"

[[accounts]]
address = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359"
name = "Ledger 1"
keyring = "Ledger Hardware"

[balances."0x1"]
"0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed" = "0x1bc16d674ec80000"
"#;

    #[test]
    fn test_load_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let snapshot = WalletSnapshot::load(file.path()).unwrap();
        assert_eq!(snapshot.chain(), ChainId::MAINNET);
        assert_eq!(snapshot.accounts().len(), 2);
        assert_eq!(snapshot.accounts()[0].keyring, KeyringType::Hd);
        assert_eq!(snapshot.accounts()[1].keyring, KeyringType::Ledger);
        assert!(snapshot.rate().usable_rate().is_some());

        let balances = snapshot.balances(ChainId::MAINNET);
        assert_eq!(
            balances.get("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"),
            Some(&Wei::from_u128(2_000_000_000_000_000_000))
        );
        assert!(snapshot.balances(ChainId::SEPOLIA).is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(WalletSnapshot::load("/definitely/not/here.toml").is_err());
    }
}
