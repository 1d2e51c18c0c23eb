//! Display aggregation of wallet accounts

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::balance::{render_from_wei, wei_to_fiat, BalanceMap, FiatRate, Wei};
use super::checksum::to_checksum_address;
use super::types::{Account, AccountAssets, RawAccount};
use super::validator::BalanceValidator;

/// Row heights used to compute scroll offsets
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ItemLayout {
    pub base_height: u32,
    pub balance_error_height: u32,
    pub keyring_badge_height: u32,
}

impl Default for ItemLayout {
    fn default() -> Self {
        Self {
            base_height: 78,
            balance_error_height: 22,
            keyring_badge_height: 24,
        }
    }
}

impl ItemLayout {
    /// Height taken by one rendered account
    pub fn height_of(&self, account: &Account) -> u32 {
        let mut height = self.base_height;
        if account.balance_error.as_deref().is_some_and(|e| !e.is_empty()) {
            height = height.saturating_add(self.balance_error_height);
        }
        if !account.keyring.is_default() {
            height = height.saturating_add(self.keyring_badge_height);
        }
        height
    }
}

/// Everything one aggregation pass reads
pub struct AggregationInput<'a> {
    pub accounts: &'a [RawAccount],
    pub selected_address: &'a str,
    pub balances: &'a BalanceMap,
    pub rate: &'a FiatRate,
    pub ticker: &'a str,
    /// Show balances for every account, not just the selected one
    pub multi_account_balances: bool,
    pub layout: ItemLayout,
    pub validator: Option<&'a dyn BalanceValidator>,
}

/// Result of one aggregation pass
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Aggregation {
    pub accounts: Vec<Account>,
    pub selected_index: Option<usize>,
}

impl Aggregation {
    /// Index name resolution should start from
    pub fn resolution_start(&self) -> usize {
        self.selected_index.unwrap_or(0)
    }

    pub fn addresses(&self) -> Vec<String> {
        self.accounts.iter().map(|a| a.address.clone()).collect()
    }
}

/// Network ticker shown next to native balances
pub fn display_ticker(ticker: &str) -> &str {
    if ticker.trim().is_empty() {
        "ETH"
    } else {
        ticker
    }
}

/// Build the ordered, display-ready account list.
///
/// Output order mirrors input order. Bad addresses, missing balances and
/// missing rates all degrade per account; nothing here fails the pass.
pub fn aggregate(input: &AggregationInput<'_>) -> Aggregation {
    let selected = to_checksum_address(input.selected_address).ok();
    let ticker = display_ticker(input.ticker);
    let zero = Wei::zero();

    let mut y_offset = 0u32;
    let mut selected_index = None;
    let mut accounts = Vec::with_capacity(input.accounts.len());

    for (index, raw) in input.accounts.iter().enumerate() {
        let address = match to_checksum_address(&raw.address) {
            Ok(a) => a,
            Err(e) => {
                warn!("Keeping unnormalized address for '{}': {}", raw.name, e);
                raw.address.clone()
            }
        };

        let is_selected = selected.as_deref() == Some(address.as_str());
        if is_selected && selected_index.is_none() {
            selected_index = Some(index);
        }

        let balance = input.balances.get(&address).unwrap_or(&zero);
        let show_balance = input.multi_account_balances || is_selected;
        let assets = show_balance.then(|| AccountAssets {
            fiat_balance: wei_to_fiat(balance, input.rate),
            native_balance: render_from_wei(balance),
            ticker: ticker.to_string(),
        });
        let balance_error = input
            .validator
            .and_then(|v| v.validate(balance))
            .filter(|e| !e.is_empty());

        let account = Account {
            name: raw.name.clone(),
            address,
            keyring: raw.keyring.clone(),
            y_offset,
            is_selected,
            assets,
            balance_error,
        };
        y_offset = y_offset.saturating_add(input.layout.height_of(&account));
        accounts.push(account);
    }

    Aggregation {
        accounts,
        selected_index,
    }
}
