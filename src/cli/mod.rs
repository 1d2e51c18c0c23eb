pub mod accounts;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wallet_accounts")]
#[command(about = "Wallet account list and ENS name resolution", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "accounts.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the aggregated account list for a wallet snapshot
    List {
        /// Wallet snapshot (TOML)
        #[arg(long)]
        snapshot: String,
        /// Only show the balance of the selected account
        #[arg(long)]
        selected_balance_only: bool,
    },
    /// Aggregate accounts, then resolve their ENS names
    Resolve {
        #[arg(long)]
        snapshot: String,
        /// Override the snapshot's chain id (hex or decimal)
        #[arg(long)]
        chain: Option<String>,
    },
    /// Print the checksum form of an address
    Checksum {
        address: String,
    },
}
