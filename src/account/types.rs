//! Account type definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AccountsError;

/// Reverse-resolved names keyed by checksum address
pub type EnsByAccountAddress = HashMap<String, String>;

/// Raw account record as handed over by the account source
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RawAccount {
    pub address: String,
    pub name: String,
    #[serde(default)]
    pub keyring: KeyringType,
}

/// Keyring that owns an account's key material
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum KeyringType {
    /// Standard hierarchical-deterministic derivation
    #[default]
    Hd,
    /// Imported private key
    Simple,
    Ledger,
    Trezor,
    Qr,
    Lattice,
    Snap,
    Other(String),
}

impl KeyringType {
    pub fn as_str(&self) -> &str {
        match self {
            KeyringType::Hd => "HD Key Tree",
            KeyringType::Simple => "Simple Key Pair",
            KeyringType::Ledger => "Ledger Hardware",
            KeyringType::Trezor => "Trezor Hardware",
            KeyringType::Qr => "QR Hardware Wallet Device",
            KeyringType::Lattice => "Lattice Hardware",
            KeyringType::Snap => "Snap Keyring",
            KeyringType::Other(s) => s,
        }
    }

    /// Anything but the default derivation gets a keyring badge in the list
    pub fn is_default(&self) -> bool {
        matches!(self, KeyringType::Hd)
    }
}

impl From<String> for KeyringType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "HD Key Tree" => KeyringType::Hd,
            "Simple Key Pair" => KeyringType::Simple,
            "Ledger Hardware" => KeyringType::Ledger,
            "Trezor Hardware" => KeyringType::Trezor,
            "QR Hardware Wallet Device" => KeyringType::Qr,
            "Lattice Hardware" => KeyringType::Lattice,
            "Snap Keyring" => KeyringType::Snap,
            _ => KeyringType::Other(s),
        }
    }
}

impl From<KeyringType> for String {
    fn from(k: KeyringType) -> Self {
        k.as_str().to_string()
    }
}

impl fmt::Display for KeyringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Balance labels shown under an account
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AccountAssets {
    pub fiat_balance: String,
    pub native_balance: String,
    pub ticker: String,
}

impl AccountAssets {
    pub fn label(&self) -> String {
        format!("{}\n{} {}", self.fiat_balance, self.native_balance, self.ticker)
    }
}

/// Display-ready account
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Account {
    pub name: String,
    pub address: String,
    pub keyring: KeyringType,
    /// Cumulative offset of this row, used for scroll-to-selected
    pub y_offset: u32,
    pub is_selected: bool,
    pub assets: Option<AccountAssets>,
    pub balance_error: Option<String>,
}

/// Chain identifier, displayed in `0x` hex form
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ChainId(pub u64);

impl ChainId {
    pub const MAINNET: ChainId = ChainId(1);
    pub const GOERLI: ChainId = ChainId(5);
    pub const SEPOLIA: ChainId = ChainId(11_155_111);
}

impl FromStr for ChainId {
    type Err = AccountsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => s.parse::<u64>(),
        };
        parsed
            .map(ChainId)
            .map_err(|_| AccountsError::InvalidChainId(s.to_string()))
    }
}

impl TryFrom<String> for ChainId {
    type Error = AccountsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ChainId> for String {
    fn from(c: ChainId) -> Self {
        c.to_string()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyring_type_strings() {
        assert_eq!(KeyringType::from("HD Key Tree".to_string()), KeyringType::Hd);
        assert_eq!(
            KeyringType::from("Ledger Hardware".to_string()),
            KeyringType::Ledger
        );
        assert_eq!(
            KeyringType::from("Custody".to_string()),
            KeyringType::Other("Custody".to_string())
        );
        assert!(KeyringType::Hd.is_default());
        assert!(!KeyringType::Simple.is_default());
    }

    #[test]
    fn test_chain_id_parse() {
        assert_eq!("0x1".parse::<ChainId>().unwrap(), ChainId::MAINNET);
        assert_eq!("11155111".parse::<ChainId>().unwrap(), ChainId::SEPOLIA);
        assert_eq!(ChainId(137).to_string(), "0x89");
        assert!("0xzz".parse::<ChainId>().is_err());
    }

    #[test]
    fn test_assets_label() {
        let assets = AccountAssets {
            fiat_balance: "$3.70".to_string(),
            native_balance: "0.002".to_string(),
            ticker: "ETH".to_string(),
        };
        assert_eq!(assets.label(), "$3.70\n0.002 ETH");
    }
}
