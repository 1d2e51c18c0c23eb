use clap::Parser;
use tracing_subscriber::EnvFilter;

use wallet_accounts::cli::{accounts, Cli, Commands};
use wallet_accounts::config::AccountsConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = AccountsConfig::load_or_default(&cli.config);

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::List { snapshot, selected_balance_only } => {
            accounts::handle_list(&config, &snapshot, selected_balance_only)
        }
        Commands::Resolve { snapshot, chain } => {
            accounts::handle_resolve(&config, &snapshot, chain).await
        }
        Commands::Checksum { address } => accounts::handle_checksum(&address),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
