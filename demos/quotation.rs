//! Example: Fetching public market data from Upbit.
//!
//! Run with: cargo run --example quotation
//! Set `RUST_LOG=upbit_api_client=debug` to see rate limiting and retries.

use tracing_subscriber::EnvFilter;
use upbit_api_client::rest::UpbitRestClient;
use upbit_api_client::rest::quotation::{CandleRequest, CandleUnit, MinuteUnit};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Create a client for quotation endpoints (no credentials needed)
    let client = UpbitRestClient::new();

    println!("=== Markets ===");
    let markets = client.get_markets(false).await?;
    for market in markets.iter().filter(|m| m.market.starts_with("KRW-")).take(5) {
        println!("{}: {}", market.market, market.english_name);
    }

    println!("\n=== Tickers ===");
    for ticker in client.get_ticker(&["KRW-BTC", "KRW-ETH"]).await? {
        println!(
            "{}: {} ({:+}%)",
            ticker.market,
            ticker.trade_price,
            ticker.signed_change_rate * rust_decimal::Decimal::ONE_HUNDRED
        );
    }

    println!("\n=== 15m Candles ===");
    let request = CandleRequest::new(CandleUnit::Minutes(MinuteUnit::Fifteen), "KRW-BTC").count(3);
    for candle in client.get_candles(&request).await? {
        println!(
            "{} O:{} H:{} L:{} C:{}",
            candle.candle_date_time_kst,
            candle.opening_price,
            candle.high_price,
            candle.low_price,
            candle.trade_price
        );
    }

    println!("\n=== Order Book ===");
    let books = client.get_orderbook(&["KRW-BTC"]).await?;
    if let Some(level) = books.first().and_then(|b| b.orderbook_units.first()) {
        println!("Best bid {} / ask {}", level.bid_price, level.ask_price);
    }

    Ok(())
}
