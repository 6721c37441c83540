//! Types for exchange endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, InvalidRequestReason};

// ============================================================================
// Account
// ============================================================================

/// Balance of one currency.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// Currency code.
    pub currency: String,
    /// Available balance.
    pub balance: Decimal,
    /// Balance locked in open orders or withdrawals.
    pub locked: Decimal,
    /// Average buy price.
    pub avg_buy_price: Decimal,
    /// Whether the average buy price was edited by the user.
    #[serde(default)]
    pub avg_buy_price_modified: bool,
    /// Currency the average buy price is quoted in.
    pub unit_currency: String,
}

/// An API key of the account.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKey {
    /// Access key.
    pub access_key: String,
    /// Expiry time.
    pub expire_at: String,
}

/// Deposit and withdrawal status of a currency.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletStatus {
    /// Currency code.
    pub currency: String,
    /// `working`, `withdraw_only`, `deposit_only`, `paused` or `unsupported`.
    pub wallet_state: String,
    /// Blockchain sync state.
    #[serde(default)]
    pub block_state: Option<String>,
    /// Latest block height.
    #[serde(default)]
    pub block_height: Option<i64>,
    /// Last block update time.
    #[serde(default)]
    pub block_updated_at: Option<String>,
    /// Minutes since the last block.
    #[serde(default)]
    pub block_elapsed_minutes: Option<i64>,
    /// Network type.
    #[serde(default)]
    pub net_type: Option<String>,
    /// Network name.
    #[serde(default)]
    pub network_name: Option<String>,
}

// ============================================================================
// Orders
// ============================================================================

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy.
    Bid,
    /// Sell.
    Ask,
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Limit order; needs price and volume.
    Limit,
    /// Market buy for a total amount; needs price only.
    Price,
    /// Market sell of a volume; needs volume only.
    Market,
    /// Best-price order.
    Best,
}

/// Order state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    /// Resting on the book.
    Wait,
    /// Reserved (stop) order waiting for its trigger.
    Watch,
    /// Fully filled.
    Done,
    /// Cancelled.
    Cancel,
}

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first.
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

/// An order.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    /// Order id.
    pub uuid: String,
    /// Side.
    pub side: OrderSide,
    /// Type.
    pub ord_type: OrderType,
    /// Limit price, or total amount for market buys.
    #[serde(default)]
    pub price: Option<Decimal>,
    /// State.
    pub state: OrderState,
    /// Market code.
    pub market: String,
    /// Creation time.
    pub created_at: String,
    /// Ordered volume.
    #[serde(default)]
    pub volume: Option<Decimal>,
    /// Volume left to fill.
    #[serde(default)]
    pub remaining_volume: Option<Decimal>,
    /// Fee reserved for the order.
    pub reserved_fee: Decimal,
    /// Fee left to pay.
    pub remaining_fee: Decimal,
    /// Fee paid so far.
    pub paid_fee: Decimal,
    /// Funds locked by the order.
    pub locked: Decimal,
    /// Filled volume.
    pub executed_volume: Decimal,
    /// Number of fills.
    pub trades_count: u32,
    /// Client-supplied identifier.
    #[serde(default)]
    pub identifier: Option<String>,
    /// Fills, only returned when looking up a single order.
    #[serde(default)]
    pub trades: Vec<OrderTrade>,
}

/// A fill of an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderTrade {
    /// Market code.
    pub market: String,
    /// Trade id.
    pub uuid: String,
    /// Price.
    pub price: Decimal,
    /// Volume.
    pub volume: Decimal,
    /// Price times volume.
    pub funds: Decimal,
    /// Side.
    pub side: OrderSide,
    /// Trade time.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Fee and constraint information for ordering on a market.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderChance {
    /// Buy fee rate.
    pub bid_fee: Decimal,
    /// Sell fee rate.
    pub ask_fee: Decimal,
    /// Market constraints.
    pub market: OrderChanceMarket,
    /// Balance of the quote currency.
    pub bid_account: Account,
    /// Balance of the base currency.
    pub ask_account: Account,
}

/// Market constraints returned with an [`OrderChance`].
#[derive(Debug, Clone, Deserialize)]
pub struct OrderChanceMarket {
    /// Market code.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Supported order types.
    #[serde(default)]
    pub order_types: Vec<String>,
    /// Supported sides.
    #[serde(default)]
    pub order_sides: Vec<String>,
    /// Buy side constraints.
    pub bid: OrderConstraint,
    /// Sell side constraints.
    pub ask: OrderConstraint,
    /// Maximum order total.
    pub max_total: Decimal,
    /// Market state.
    pub state: String,
}

/// Constraints for one side of a market.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderConstraint {
    /// Currency spent on this side.
    pub currency: String,
    /// Minimum order total.
    pub min_total: Decimal,
}

/// Identifies a single order by its id or client identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderLookup {
    /// Order id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Client-supplied identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl OrderLookup {
    /// Look up by order id.
    pub fn by_uuid(uuid: impl Into<String>) -> Self {
        Self {
            uuid: Some(uuid.into()),
            identifier: None,
        }
    }

    /// Look up by client identifier.
    pub fn by_identifier(identifier: impl Into<String>) -> Self {
        Self {
            uuid: None,
            identifier: Some(identifier.into()),
        }
    }

    /// Fails unless an id or an identifier is set.
    pub fn validate(&self) -> Result<(), ApiError> {
        if is_blank(&self.uuid) && is_blank(&self.identifier) {
            return Err(ApiError::invalid_request(
                InvalidRequestReason::InvalidParameter,
                "order lookup needs a uuid or an identifier",
            ));
        }
        Ok(())
    }
}

/// Request parameters for listing orders.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListOrdersRequest {
    /// Market code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    /// Order ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uuids: Vec<String>,
    /// Client identifiers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    /// Single state filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<OrderState>,
    /// Multiple state filter.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub states: Vec<OrderState>,
    /// Page number, from 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size, up to 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<SortOrder>,
}

impl ListOrdersRequest {
    /// Orders of one market.
    pub fn for_market(market: impl Into<String>) -> Self {
        Self {
            market: Some(market.into()),
            ..Default::default()
        }
    }

    /// Filter by state.
    pub fn state(mut self, state: OrderState) -> Self {
        self.state = Some(state);
        self
    }
}

/// Request parameters for placing an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceOrderRequest {
    /// Market code.
    pub market: String,
    /// Side.
    pub side: OrderSide,
    /// Volume.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
    /// Limit price, or total amount for market buys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Type.
    pub ord_type: OrderType,
    /// Client identifier, unique per account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl PlaceOrderRequest {
    /// Limit order.
    pub fn limit(
        market: impl Into<String>,
        side: OrderSide,
        volume: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            market: market.into(),
            side,
            volume: Some(volume),
            price: Some(price),
            ord_type: OrderType::Limit,
            identifier: None,
        }
    }

    /// Market buy spending `total` of the quote currency.
    pub fn market_buy(market: impl Into<String>, total: Decimal) -> Self {
        Self {
            market: market.into(),
            side: OrderSide::Bid,
            volume: None,
            price: Some(total),
            ord_type: OrderType::Price,
            identifier: None,
        }
    }

    /// Market sell of `volume`.
    pub fn market_sell(market: impl Into<String>, volume: Decimal) -> Self {
        Self {
            market: market.into(),
            side: OrderSide::Ask,
            volume: Some(volume),
            price: None,
            ord_type: OrderType::Market,
            identifier: None,
        }
    }

    /// Attach a client identifier.
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Check that price and volume match the order type.
    pub fn validate(&self) -> Result<(), ApiError> {
        let missing = match self.ord_type {
            OrderType::Limit if self.volume.is_none() || self.price.is_none() => {
                Some("limit orders need a price and a volume")
            }
            OrderType::Price if self.price.is_none() => Some("market buys need a price"),
            OrderType::Market if self.volume.is_none() => Some("market sells need a volume"),
            _ => None,
        };
        match missing {
            Some(message) => Err(ApiError::invalid_request(
                InvalidRequestReason::InvalidParameter,
                message,
            )),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Withdrawals and deposits
// ============================================================================

/// A withdrawal or deposit.
#[derive(Debug, Clone, Deserialize)]
pub struct Transfer {
    /// `withdraw` or `deposit`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Transfer id.
    pub uuid: String,
    /// Currency code.
    pub currency: String,
    /// Transaction id.
    #[serde(default)]
    pub txid: Option<String>,
    /// State, e.g. `DONE`.
    pub state: String,
    /// Creation time.
    pub created_at: String,
    /// Completion time.
    #[serde(default)]
    pub done_at: Option<String>,
    /// Amount.
    pub amount: Decimal,
    /// Fee.
    pub fee: Decimal,
    /// `default` or `internal`.
    #[serde(default)]
    pub transaction_type: Option<String>,
}

/// Request parameters for listing withdrawals or deposits.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransferListRequest {
    /// Currency code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// State filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Transfer ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uuids: Vec<String>,
    /// Transaction ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub txids: Vec<String>,
    /// Page size, up to 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Page number, from 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<SortOrder>,
}

impl TransferListRequest {
    /// Transfers of one currency.
    pub fn for_currency(currency: impl Into<String>) -> Self {
        Self {
            currency: Some(currency.into()),
            ..Default::default()
        }
    }
}

/// Identifies a single withdrawal or deposit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferLookup {
    /// Transfer id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Transaction id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    /// Currency code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl TransferLookup {
    /// Look up by transfer id.
    pub fn by_uuid(uuid: impl Into<String>) -> Self {
        Self {
            uuid: Some(uuid.into()),
            ..Default::default()
        }
    }

    /// Look up by transaction id.
    pub fn by_txid(txid: impl Into<String>) -> Self {
        Self {
            txid: Some(txid.into()),
            ..Default::default()
        }
    }

    /// Fails unless a transfer id or a transaction id is set.
    pub fn validate(&self) -> Result<(), ApiError> {
        if is_blank(&self.uuid) && is_blank(&self.txid) {
            return Err(ApiError::invalid_request(
                InvalidRequestReason::InvalidParameter,
                "transfer lookup needs a uuid or a txid",
            ));
        }
        Ok(())
    }
}

/// Withdrawal constraints for a currency.
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawChance {
    /// Account security level details.
    pub member_level: serde_json::Value,
    /// Currency details.
    pub currency: WithdrawCurrency,
    /// Balance of the currency.
    pub account: Account,
    /// Limits.
    pub withdraw_limit: WithdrawLimit,
}

/// Currency details returned with a [`WithdrawChance`].
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawCurrency {
    /// Currency code.
    pub code: String,
    /// Withdrawal fee.
    pub withdraw_fee: Decimal,
    /// Whether the currency is a coin (as opposed to KRW).
    pub is_coin: bool,
    /// Wallet state.
    pub wallet_state: String,
    /// Supported operations.
    #[serde(default)]
    pub wallet_support: Vec<String>,
}

/// Withdrawal limits.
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawLimit {
    /// Currency code.
    pub currency: String,
    /// Minimum per withdrawal.
    #[serde(default)]
    pub minimum: Option<Decimal>,
    /// Maximum per withdrawal.
    #[serde(default)]
    pub onetime: Option<Decimal>,
    /// Daily maximum.
    #[serde(default)]
    pub daily: Option<Decimal>,
    /// Daily amount left.
    #[serde(default)]
    pub remaining_daily: Option<Decimal>,
    /// Decimal places allowed.
    #[serde(default)]
    pub fixed: Option<u32>,
    /// Whether withdrawals are currently possible.
    pub can_withdraw: bool,
}

/// Request parameters for a coin withdrawal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoinWithdrawRequest {
    /// Currency code.
    pub currency: String,
    /// Amount.
    pub amount: Decimal,
    /// Registered withdrawal address.
    pub address: String,
    /// Secondary address (memo or destination tag).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_address: Option<String>,
    /// `default` or `internal`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
}

impl CoinWithdrawRequest {
    /// Withdraw `amount` of `currency` to `address`.
    pub fn new(currency: impl Into<String>, amount: Decimal, address: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            amount,
            address: address.into(),
            secondary_address: None,
            transaction_type: None,
        }
    }

    /// Set the secondary address.
    pub fn secondary_address(mut self, address: impl Into<String>) -> Self {
        self.secondary_address = Some(address.into());
        self
    }
}

/// Deposit address of a currency.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinAddress {
    /// Currency code.
    pub currency: String,
    /// Address, absent while being generated.
    #[serde(default)]
    pub deposit_address: Option<String>,
    /// Secondary address (memo or destination tag).
    #[serde(default)]
    pub secondary_address: Option<String>,
}

/// Response to a deposit address request.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GenerateAddressResponse {
    /// Generation started; fetch the address later.
    Pending {
        /// Whether the request was accepted.
        success: bool,
        /// Status message.
        message: String,
    },
    /// The address already exists.
    Ready(CoinAddress),
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}
