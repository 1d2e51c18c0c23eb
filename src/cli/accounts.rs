use std::sync::Arc;
use tracing::{info, warn};

use crate::account::{
    aggregate, to_checksum_address, Account, AccountSource, AggregationInput, BalanceSource,
    ChainId, EnsByAccountAddress, RateSource, WalletSnapshot,
};
use crate::client::EnsRpcClient;
use crate::config::AccountsConfig;
use crate::controller::AccountsController;
use crate::ens::{CachedLookup, NameLookupService};
use crate::error::AccountsError;

fn print_accounts(accounts: &[Account], names: &EnsByAccountAddress) {
    for account in accounts {
        let marker = if account.is_selected { "*" } else { " " };
        let ens = names
            .get(&account.address)
            .map(|n| format!(" ({})", n))
            .unwrap_or_default();
        println!("{} {} {}{}", marker, account.name, account.address, ens);
        println!("    keyring: {} | offset: {}", account.keyring, account.y_offset);
        if let Some(assets) = &account.assets {
            let fiat = if assets.fiat_balance.is_empty() { "-" } else { assets.fiat_balance.as_str() };
            println!("    balance: {} {} ({})", assets.native_balance, assets.ticker, fiat);
        }
        if let Some(err) = &account.balance_error {
            println!("    ⚠️  {}", err);
        }
    }
}

pub fn handle_list(
    config: &AccountsConfig,
    snapshot_path: &str,
    selected_balance_only: bool,
) -> Result<(), AccountsError> {
    let snapshot = WalletSnapshot::load(snapshot_path)?;
    if snapshot.is_loading() {
        warn!("Snapshot {} is still loading; nothing to list", snapshot_path);
        return Ok(());
    }
    let chain = snapshot.chain();
    let accounts = snapshot.accounts();
    let selected = snapshot.selected_address();
    let balances = snapshot.balances(chain);
    let rate = snapshot.rate();

    let aggregation = aggregate(&AggregationInput {
        accounts: &accounts,
        selected_address: &selected,
        balances: &balances,
        rate: &rate,
        ticker: &snapshot.ticker,
        multi_account_balances: config.display.multi_account_balances && !selected_balance_only,
        layout: config.layout,
        validator: None,
    });

    println!("\n=== Accounts on {} ===", chain);
    if aggregation.selected_index.is_none() {
        warn!("Selected address {} matches no account", selected);
    }
    print_accounts(&aggregation.accounts, &EnsByAccountAddress::new());
    Ok(())
}

pub async fn handle_resolve(
    config: &AccountsConfig,
    snapshot_path: &str,
    chain_override: Option<String>,
) -> Result<(), AccountsError> {
    if !config.ens.enabled {
        return Err(AccountsError::Config("ENS resolution is disabled in config".to_string()));
    }

    let snapshot = WalletSnapshot::load(snapshot_path)?;
    let chain = match chain_override {
        Some(c) => c.parse::<ChainId>()?,
        None => snapshot.chain(),
    };

    let client = EnsRpcClient::new(&config.ens.endpoints, config.ens.timeout())?;
    if !client.supports(chain) {
        warn!("No ENS deployment or endpoint for {}; names will stay empty", chain);
    }
    let lookup: Arc<dyn NameLookupService> =
        Arc::new(CachedLookup::with_ttl(client, config.ens.cache_ttl()));

    let mut controller = AccountsController::new(lookup, config.display_settings());
    let mut names_rx = controller.subscribe_names();
    let progress = tokio::spawn(async move {
        while names_rx.changed().await.is_ok() {
            let count = names_rx.borrow_and_update().len();
            println!("  … {} name(s) resolved", count);
        }
    });

    let aggregation = controller.refresh(&snapshot, &snapshot, &snapshot, chain, &snapshot.ticker);
    println!("\n=== Resolving {} accounts on {} ===", aggregation.accounts.len(), chain);

    if let Some(outcome) = controller.wait_for_resolution().await {
        info!(
            "Resolution {:?}: {} attempted, {} named",
            outcome.state,
            outcome.attempted.len(),
            outcome.names.len()
        );
    }
    let names = controller.names();
    let accounts = controller.accounts();
    drop(controller);
    if let Err(e) = progress.await {
        warn!("Progress printer failed: {}", e);
    }

    println!();
    print_accounts(&accounts, &names);
    Ok(())
}

pub fn handle_checksum(address: &str) -> Result<(), AccountsError> {
    println!("{}", to_checksum_address(address)?);
    Ok(())
}
