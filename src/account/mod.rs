//! Account aggregation
//!
//! Turns raw keyring accounts, balances and fiat rates into the ordered,
//! display-ready list the wallet renders:
//! - EIP-55 address normalization
//! - native/fiat balance labels
//! - per-row scroll offsets

pub mod aggregator;
pub mod balance;
pub mod checksum;
pub mod source;
pub mod types;
pub mod validator;

pub use aggregator::{aggregate, Aggregation, AggregationInput, ItemLayout};
pub use balance::{BalanceMap, FiatRate, Wei};
pub use checksum::to_checksum_address;
pub use source::{AccountSource, BalanceSource, RateSource, WalletSnapshot};
pub use types::{Account, AccountAssets, ChainId, EnsByAccountAddress, KeyringType, RawAccount};
pub use validator::{BalanceValidator, MinimumBalance};
