//! Quotation endpoints (no authentication required).

mod types;

pub use types::*;

use crate::error::ApiError;
use crate::rate_limit::EndpointGroup;
use crate::rest::endpoints::quotation;
use crate::rest::{Method, RequestDescriptor, UpbitRestClient};

impl UpbitRestClient {
    /// List all markets.
    ///
    /// With `detail`, each entry carries its market warning flag.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use upbit_api_client::rest::UpbitRestClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = UpbitRestClient::new();
    ///     for market in client.get_markets(false).await? {
    ///         println!("{} ({})", market.market, market.english_name);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_markets(&self, detail: bool) -> Result<Vec<Market>, ApiError> {
        let request =
            RequestDescriptor::public(Method::Get, quotation::MARKET_ALL, EndpointGroup::Market)
                .param("isDetails", detail);
        self.call(request).await
    }

    /// Get candles, newest first.
    pub async fn get_candles(&self, request: &CandleRequest) -> Result<Vec<Candle>, ApiError> {
        let descriptor =
            RequestDescriptor::public(Method::Get, request.unit.path(), EndpointGroup::Candle)
                .serialized(request)?;
        self.call(descriptor).await
    }

    /// Get recent trades, newest first.
    pub async fn get_trade_ticks(
        &self,
        request: &TradeTicksRequest,
    ) -> Result<Vec<TradeTick>, ApiError> {
        let descriptor =
            RequestDescriptor::public(Method::Get, quotation::TRADES_TICKS, EndpointGroup::Trade)
                .serialized(request)?;
        self.call(descriptor).await
    }

    /// Get the current ticker of one or more markets.
    ///
    /// # Arguments
    ///
    /// * `markets` - Market codes (e.g., `["KRW-BTC", "KRW-ETH"]`).
    pub async fn get_ticker(&self, markets: &[&str]) -> Result<Vec<Ticker>, ApiError> {
        let request =
            RequestDescriptor::public(Method::Get, quotation::TICKER, EndpointGroup::Ticker)
                .param("markets", markets.join(","));
        self.call(request).await
    }

    /// Get order book snapshots of one or more markets.
    pub async fn get_orderbook(&self, markets: &[&str]) -> Result<Vec<Orderbook>, ApiError> {
        let request =
            RequestDescriptor::public(Method::Get, quotation::ORDERBOOK, EndpointGroup::Orderbook)
                .param("markets", markets.join(","));
        self.call(request).await
    }
}
