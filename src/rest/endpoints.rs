//! Upbit REST API endpoint paths.

/// Base URL for the Upbit REST API.
pub const UPBIT_BASE_URL: &str = "https://api.upbit.com";

/// Quotation endpoints (no authentication required).
pub mod quotation {
    /// List markets.
    pub const MARKET_ALL: &str = "/v1/market/all";
    /// Minute candles; followed by `/{unit}`.
    pub const CANDLES_MINUTES: &str = "/v1/candles/minutes";
    /// Day candles.
    pub const CANDLES_DAYS: &str = "/v1/candles/days";
    /// Week candles.
    pub const CANDLES_WEEKS: &str = "/v1/candles/weeks";
    /// Month candles.
    pub const CANDLES_MONTHS: &str = "/v1/candles/months";
    /// Recent trade ticks.
    pub const TRADES_TICKS: &str = "/v1/trades/ticks";
    /// Current ticker.
    pub const TICKER: &str = "/v1/ticker";
    /// Order book.
    pub const ORDERBOOK: &str = "/v1/orderbook";
}

/// Exchange endpoints (authentication required).
pub mod exchange {
    // Account
    /// Balances per currency.
    pub const ACCOUNTS: &str = "/v1/accounts";
    /// API keys and their expiry.
    pub const API_KEYS: &str = "/v1/api_keys";
    /// Deposit and withdrawal status per currency.
    pub const WALLET_STATUS: &str = "/v1/status/wallet";

    // Orders
    /// Order constraints for a market.
    pub const ORDERS_CHANCE: &str = "/v1/orders/chance";
    /// Single order (GET to look up, DELETE to cancel).
    pub const ORDER: &str = "/v1/order";
    /// Order list (GET) and order placement (POST).
    pub const ORDERS: &str = "/v1/orders";

    // Withdrawals
    /// Withdrawal list.
    pub const WITHDRAWS: &str = "/v1/withdraws";
    /// Single withdrawal.
    pub const WITHDRAW: &str = "/v1/withdraw";
    /// Withdrawal constraints for a currency.
    pub const WITHDRAWS_CHANCE: &str = "/v1/withdraws/chance";
    /// Coin withdrawal.
    pub const WITHDRAWS_COIN: &str = "/v1/withdraws/coin";
    /// KRW withdrawal.
    pub const WITHDRAWS_KRW: &str = "/v1/withdraws/krw";

    // Deposits
    /// Deposit list.
    pub const DEPOSITS: &str = "/v1/deposits";
    /// Single deposit.
    pub const DEPOSIT: &str = "/v1/deposit";
    /// Request a deposit address.
    pub const GENERATE_COIN_ADDRESS: &str = "/v1/deposits/generate_coin_address";
    /// All deposit addresses.
    pub const COIN_ADDRESSES: &str = "/v1/deposits/coin_addresses";
    /// Deposit address of one currency.
    pub const COIN_ADDRESS: &str = "/v1/deposits/coin_address";
}
