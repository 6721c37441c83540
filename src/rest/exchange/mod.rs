//! Exchange endpoints (authentication required).
//!
//! These endpoints require credentials to be configured on the client.
//! Calls without credentials fail with a `Signing` error before any
//! rate-limit token is spent.

mod types;

pub use types::*;

use rust_decimal::Decimal;

use crate::error::ApiError;
use crate::rate_limit::EndpointGroup;
use crate::rest::endpoints::exchange;
use crate::rest::{Method, RequestDescriptor, UpbitRestClient};

fn get(path: &str) -> RequestDescriptor {
    RequestDescriptor::private(Method::Get, path, EndpointGroup::Default)
}

fn post(path: &str) -> RequestDescriptor {
    RequestDescriptor::private(Method::Post, path, EndpointGroup::Default)
}

impl UpbitRestClient {
    /// Get balances of all currencies held.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use upbit_api_client::auth::Credentials;
    /// use upbit_api_client::rest::UpbitRestClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = UpbitRestClient::builder()
    ///         .credentials(Credentials::new("access_key", "secret_key"))
    ///         .build();
    ///
    ///     for account in client.get_accounts().await? {
    ///         println!("{}: {}", account.currency, account.balance);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_accounts(&self) -> Result<Vec<Account>, ApiError> {
        self.call(get(exchange::ACCOUNTS)).await
    }

    /// Get fees, constraints and balances for ordering on a market.
    pub async fn get_order_chance(&self, market: &str) -> Result<OrderChance, ApiError> {
        self.call(get(exchange::ORDERS_CHANCE).param("market", market))
            .await
    }

    /// Look up a single order, including its fills.
    pub async fn get_order(&self, lookup: &OrderLookup) -> Result<Order, ApiError> {
        lookup.validate()?;
        self.call(get(exchange::ORDER).serialized(lookup)?).await
    }

    /// List orders.
    pub async fn list_orders(&self, request: &ListOrdersRequest) -> Result<Vec<Order>, ApiError> {
        self.call(get(exchange::ORDERS).serialized(request)?).await
    }

    /// Cancel an order.
    pub async fn cancel_order(&self, lookup: &OrderLookup) -> Result<Order, ApiError> {
        lookup.validate()?;
        let request =
            RequestDescriptor::private(Method::Delete, exchange::ORDER, EndpointGroup::Default)
                .serialized(lookup)?;
        self.call(request).await
    }

    /// Place an order.
    ///
    /// Counts against the order placement budget rather than the default one.
    pub async fn place_order(&self, request: &PlaceOrderRequest) -> Result<Order, ApiError> {
        request.validate()?;
        let descriptor =
            RequestDescriptor::private(Method::Post, exchange::ORDERS, EndpointGroup::Order)
                .serialized(request)?;
        self.call(descriptor).await
    }

    /// List withdrawals.
    pub async fn list_withdraws(
        &self,
        request: &TransferListRequest,
    ) -> Result<Vec<Transfer>, ApiError> {
        self.call(get(exchange::WITHDRAWS).serialized(request)?).await
    }

    /// Look up a single withdrawal.
    pub async fn get_withdraw(&self, lookup: &TransferLookup) -> Result<Transfer, ApiError> {
        lookup.validate()?;
        self.call(get(exchange::WITHDRAW).serialized(lookup)?).await
    }

    /// Get withdrawal constraints for a currency.
    pub async fn get_withdraw_chance(&self, currency: &str) -> Result<WithdrawChance, ApiError> {
        self.call(get(exchange::WITHDRAWS_CHANCE).param("currency", currency))
            .await
    }

    /// Withdraw coins to a registered address.
    pub async fn withdraw_coin(&self, request: &CoinWithdrawRequest) -> Result<Transfer, ApiError> {
        self.call(post(exchange::WITHDRAWS_COIN).serialized(request)?)
            .await
    }

    /// Withdraw KRW to the registered bank account.
    pub async fn withdraw_krw(&self, amount: Decimal) -> Result<Transfer, ApiError> {
        self.call(post(exchange::WITHDRAWS_KRW).param("amount", amount.to_string()))
            .await
    }

    /// List deposits.
    pub async fn list_deposits(
        &self,
        request: &TransferListRequest,
    ) -> Result<Vec<Transfer>, ApiError> {
        self.call(get(exchange::DEPOSITS).serialized(request)?).await
    }

    /// Look up a single deposit.
    pub async fn get_deposit(&self, lookup: &TransferLookup) -> Result<Transfer, ApiError> {
        lookup.validate()?;
        self.call(get(exchange::DEPOSIT).serialized(lookup)?).await
    }

    /// Request a deposit address for a currency.
    ///
    /// Generation is asynchronous; a `Pending` response means the address
    /// should be fetched later with [`get_coin_address`](Self::get_coin_address).
    pub async fn generate_coin_address(
        &self,
        currency: &str,
    ) -> Result<GenerateAddressResponse, ApiError> {
        self.call(post(exchange::GENERATE_COIN_ADDRESS).param("currency", currency))
            .await
    }

    /// Get all deposit addresses.
    pub async fn get_coin_addresses(&self) -> Result<Vec<CoinAddress>, ApiError> {
        self.call(get(exchange::COIN_ADDRESSES)).await
    }

    /// Get the deposit address of a currency.
    pub async fn get_coin_address(&self, currency: &str) -> Result<CoinAddress, ApiError> {
        self.call(get(exchange::COIN_ADDRESS).param("currency", currency))
            .await
    }

    /// Get deposit and withdrawal status of every currency.
    pub async fn get_wallet_status(&self) -> Result<Vec<WalletStatus>, ApiError> {
        self.call(get(exchange::WALLET_STATUS)).await
    }

    /// List the API keys of the account.
    pub async fn get_api_keys(&self) -> Result<Vec<ApiKey>, ApiError> {
        self.call(get(exchange::API_KEYS)).await
    }
}
