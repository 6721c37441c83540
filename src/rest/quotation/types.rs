//! Types for quotation endpoints.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::rest::endpoints::quotation;

/// Market listing entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Market {
    /// Market code, e.g. `KRW-BTC`.
    pub market: String,
    /// Korean display name.
    pub korean_name: String,
    /// English display name.
    pub english_name: String,
    /// Warning flag, only present when details were requested.
    #[serde(default)]
    pub market_warning: Option<String>,
}

/// Minute candle sizes supported by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinuteUnit {
    /// 1 minute.
    One,
    /// 3 minutes.
    Three,
    /// 5 minutes.
    Five,
    /// 10 minutes.
    Ten,
    /// 15 minutes.
    Fifteen,
    /// 30 minutes.
    Thirty,
    /// 60 minutes.
    Sixty,
    /// 240 minutes.
    TwoForty,
}

impl MinuteUnit {
    /// Length in minutes.
    pub fn minutes(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Three => 3,
            Self::Five => 5,
            Self::Ten => 10,
            Self::Fifteen => 15,
            Self::Thirty => 30,
            Self::Sixty => 60,
            Self::TwoForty => 240,
        }
    }

    /// Unit for a length in minutes, if supported.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Some(match minutes {
            1 => Self::One,
            3 => Self::Three,
            5 => Self::Five,
            10 => Self::Ten,
            15 => Self::Fifteen,
            30 => Self::Thirty,
            60 => Self::Sixty,
            240 => Self::TwoForty,
            _ => return None,
        })
    }
}

/// Candle period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandleUnit {
    /// Minute candles of the given size.
    Minutes(MinuteUnit),
    /// Daily candles.
    Days,
    /// Weekly candles.
    Weeks,
    /// Monthly candles.
    Months,
}

impl CandleUnit {
    /// Endpoint path for this period.
    pub fn path(self) -> String {
        match self {
            Self::Minutes(unit) => format!("{}/{}", quotation::CANDLES_MINUTES, unit.minutes()),
            Self::Days => quotation::CANDLES_DAYS.to_string(),
            Self::Weeks => quotation::CANDLES_WEEKS.to_string(),
            Self::Months => quotation::CANDLES_MONTHS.to_string(),
        }
    }
}

impl fmt::Display for CandleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minutes(unit) => write!(f, "{}m", unit.minutes()),
            Self::Days => f.write_str("day"),
            Self::Weeks => f.write_str("week"),
            Self::Months => f.write_str("month"),
        }
    }
}

/// Request parameters for candles.
#[derive(Debug, Clone, Serialize)]
pub struct CandleRequest {
    /// Candle period; selects the endpoint.
    #[serde(skip)]
    pub unit: CandleUnit,
    /// Market code.
    pub market: String,
    /// Last candle time (exclusive), `yyyy-MM-dd HH:mm:ss` or ISO 8601.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Number of candles, up to 200.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    /// Currency to convert closing prices to (day candles only).
    #[serde(rename = "convertingPriceUnit", skip_serializing_if = "Option::is_none")]
    pub converting_price_unit: Option<String>,
}

impl CandleRequest {
    /// Create a request for the most recent candles of a market.
    pub fn new(unit: CandleUnit, market: impl Into<String>) -> Self {
        Self {
            unit,
            market: market.into(),
            to: None,
            count: None,
            converting_price_unit: None,
        }
    }

    /// Set the end time.
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Set the number of candles.
    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Convert closing prices to another currency.
    pub fn converting_price_unit(mut self, unit: impl Into<String>) -> Self {
        self.converting_price_unit = Some(unit.into());
        self
    }
}

/// OHLCV candle.
#[derive(Debug, Clone, Deserialize)]
pub struct Candle {
    /// Market code.
    pub market: String,
    /// Candle start (UTC).
    pub candle_date_time_utc: String,
    /// Candle start (KST).
    pub candle_date_time_kst: String,
    /// Open price.
    pub opening_price: Decimal,
    /// High price.
    pub high_price: Decimal,
    /// Low price.
    pub low_price: Decimal,
    /// Close price.
    pub trade_price: Decimal,
    /// Time of the last trade in the candle (ms).
    pub timestamp: i64,
    /// Accumulated trade value.
    pub candle_acc_trade_price: Decimal,
    /// Accumulated trade volume.
    pub candle_acc_trade_volume: Decimal,
    /// Minute size, minute candles only.
    #[serde(default)]
    pub unit: Option<u32>,
    /// Previous close, day candles only.
    #[serde(default)]
    pub prev_closing_price: Option<Decimal>,
    /// Change against the previous close, day candles only.
    #[serde(default)]
    pub change_price: Option<Decimal>,
    /// Change rate against the previous close, day candles only.
    #[serde(default)]
    pub change_rate: Option<Decimal>,
    /// Converted close, when a conversion unit was requested.
    #[serde(default)]
    pub converted_trade_price: Option<Decimal>,
    /// First day of the period, week and month candles only.
    #[serde(default)]
    pub first_day_of_period: Option<String>,
}

/// Request parameters for recent trade ticks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TradeTicksRequest {
    /// Market code.
    pub market: String,
    /// Last trade time (exclusive), `HHmmss` or `HH:mm:ss`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Number of ticks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    /// Pagination cursor (a `sequential_id`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Days back from today, 1 to 7.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_ago: Option<u8>,
}

impl TradeTicksRequest {
    /// Create a request for the most recent ticks of a market.
    pub fn new(market: impl Into<String>) -> Self {
        Self {
            market: market.into(),
            ..Default::default()
        }
    }

    /// Set the number of ticks.
    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }
}

/// Taker side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AskBid {
    /// Seller-initiated.
    Ask,
    /// Buyer-initiated.
    Bid,
}

/// A single trade.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeTick {
    /// Market code.
    pub market: String,
    /// Trade date (UTC), `yyyy-MM-dd`.
    pub trade_date_utc: String,
    /// Trade time (UTC), `HH:mm:ss`.
    pub trade_time_utc: String,
    /// Trade timestamp (ms).
    pub timestamp: i64,
    /// Price.
    pub trade_price: Decimal,
    /// Volume.
    pub trade_volume: Decimal,
    /// Previous close.
    pub prev_closing_price: Decimal,
    /// Change against the previous close.
    pub change_price: Decimal,
    /// Taker side.
    pub ask_bid: AskBid,
    /// Unique, increasing trade id.
    pub sequential_id: i64,
}

/// Direction of the price against the previous close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Change {
    /// Up.
    Rise,
    /// Unchanged.
    Even,
    /// Down.
    Fall,
}

/// Current ticker of a market.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker {
    /// Market code.
    pub market: String,
    /// Last trade date (UTC), `yyyyMMdd`.
    pub trade_date: String,
    /// Last trade time (UTC), `HHmmss`.
    pub trade_time: String,
    /// Last trade timestamp (ms).
    pub trade_timestamp: i64,
    /// Open.
    pub opening_price: Decimal,
    /// High.
    pub high_price: Decimal,
    /// Low.
    pub low_price: Decimal,
    /// Last.
    pub trade_price: Decimal,
    /// Previous close.
    pub prev_closing_price: Decimal,
    /// Direction against the previous close.
    pub change: Change,
    /// Absolute change.
    pub change_price: Decimal,
    /// Absolute change rate.
    pub change_rate: Decimal,
    /// Signed change.
    pub signed_change_price: Decimal,
    /// Signed change rate.
    pub signed_change_rate: Decimal,
    /// Last trade volume.
    pub trade_volume: Decimal,
    /// Accumulated trade value since 00:00 UTC.
    pub acc_trade_price: Decimal,
    /// Accumulated trade value over 24h.
    pub acc_trade_price_24h: Decimal,
    /// Accumulated volume since 00:00 UTC.
    pub acc_trade_volume: Decimal,
    /// Accumulated volume over 24h.
    pub acc_trade_volume_24h: Decimal,
    /// 52-week high.
    #[serde(default)]
    pub highest_52_week_price: Option<Decimal>,
    /// 52-week high date.
    #[serde(default)]
    pub highest_52_week_date: Option<String>,
    /// 52-week low.
    #[serde(default)]
    pub lowest_52_week_price: Option<Decimal>,
    /// 52-week low date.
    #[serde(default)]
    pub lowest_52_week_date: Option<String>,
    /// Ticker timestamp (ms).
    pub timestamp: i64,
}

/// Order book snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct Orderbook {
    /// Market code.
    pub market: String,
    /// Snapshot timestamp (ms).
    pub timestamp: i64,
    /// Total resting ask size.
    pub total_ask_size: Decimal,
    /// Total resting bid size.
    pub total_bid_size: Decimal,
    /// Levels, best first.
    pub orderbook_units: Vec<OrderbookUnit>,
}

/// One price level on each side.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderbookUnit {
    /// Ask price.
    pub ask_price: Decimal,
    /// Bid price.
    pub bid_price: Decimal,
    /// Ask size.
    pub ask_size: Decimal,
    /// Bid size.
    pub bid_size: Decimal,
}
