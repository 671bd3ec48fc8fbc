use anyhow::{anyhow, bail, Result};

use spread_monitor::binance::{BinanceRestClient, PriceSampler};
use spread_monitor::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("failed to install rustls crypto provider"))?;

    let config = Config::load()?;
    let (symbol_a, symbol_b) = config.binance.symbols();
    let client = BinanceRestClient::new(
        &config.binance.rest_base_url,
        config.binance.request_timeout_ms,
    )?;

    println!("price probe ({})", config.binance.rest_base_url);
    println!("=========================");

    let mut has_failure = false;
    match client.ping().await {
        Ok(()) => println!("- {:<10} OK", "ping"),
        Err(e) => {
            has_failure = true;
            println!("- {:<10} FAILED  {:#}", "ping", e);
        }
    }

    match client.server_time().await {
        Ok(ms) => println!("- {:<10} {}", "server", ms),
        Err(e) => println!("- {:<10} FAILED {:#}", "server", e),
    }

    let mut prices = Vec::new();
    for symbol in [&symbol_a, &symbol_b] {
        match client.fetch(symbol).await {
            Ok(price) => {
                println!("- {:<10} OK      {:.2}", symbol, price);
                prices.push(price);
            }
            Err(e) => {
                has_failure = true;
                println!("- {:<10} FAILED  {}", symbol, e);
            }
        }
    }

    if let [a, b] = prices.as_slice() {
        println!("- {:<10} {:.2}", "spread", a - b);
    }

    if has_failure {
        bail!("one or more probe requests failed");
    }

    Ok(())
}
