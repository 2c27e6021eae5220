use anyhow::{Context, Result};
use clap::Parser;

use pair_arb_scanner::config::Config;
use pair_arb_scanner::dex::moralis::MoralisClient;
use pair_arb_scanner::models::Network;
use pair_arb_scanner::report;
use pair_arb_scanner::scanner::ArbitrageScanner;

/// Find cross-venue price spreads for a token's trading pairs.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// ERC-20 token address (falls back to TOKEN_ADDRESS)
    #[arg(short, long)]
    token: Option<String>,

    /// eth, bsc, polygon, base, optimism or arbitrum (falls back to NETWORK)
    #[arg(short, long)]
    network: Option<Network>,

    /// Print the scan as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let token = cli
        .token
        .or_else(|| config.token_address.clone())
        .context("No token address given (use --token or set TOKEN_ADDRESS)")?;
    let network = cli.network.unwrap_or(config.network);

    log::info!("Starting pair arbitrage scan");

    let scanner = ArbitrageScanner::new(MoralisClient::new(&config)?);
    let scan = match scanner.scan(&token, network).await {
        Ok(scan) => scan,
        Err(e) => {
            log::error!("Error fetching arbitrage opportunities: {:#}", e);
            return Err(e);
        }
    };

    if cli.json {
        println!("{}", report::render_json(&scan)?);
    } else {
        print!("{}", report::render_text(&scan));
    }

    Ok(())
}
