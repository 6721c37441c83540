//! Endpoint groups sharing a rate-limit budget.

use std::fmt;
use std::str::FromStr;

/// Rate-limit category of an endpoint.
///
/// Upbit budgets requests per group; the group name also appears in the
/// `Remaining-Req` response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EndpointGroup {
    /// Market list (quotation).
    Market,
    /// Candles (quotation).
    Candle,
    /// Recent trades (quotation).
    Trade,
    /// Tickers (quotation).
    Ticker,
    /// Order books (quotation).
    Orderbook,
    /// Exchange endpoints other than order placement.
    Default,
    /// Order placement (exchange).
    Order,
}

impl EndpointGroup {
    /// All known groups.
    pub const ALL: [EndpointGroup; 7] = [
        Self::Market,
        Self::Candle,
        Self::Trade,
        Self::Ticker,
        Self::Orderbook,
        Self::Default,
        Self::Order,
    ];

    /// Name used by the exchange in the `Remaining-Req` header.
    pub fn header_name(self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Candle => "candles",
            Self::Trade => "crix-trades",
            Self::Ticker => "ticker",
            Self::Orderbook => "orderbook",
            Self::Default => "default",
            Self::Order => "order",
        }
    }

    /// Whether the group belongs to the public quotation API.
    pub fn is_quotation(self) -> bool {
        !matches!(self, Self::Default | Self::Order)
    }
}

impl fmt::Display for EndpointGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_name())
    }
}

/// Error returned when a group name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGroup(pub String);

impl fmt::Display for UnknownGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown endpoint group `{}`", self.0)
    }
}

impl std::error::Error for UnknownGroup {}

impl FromStr for EndpointGroup {
    type Err = UnknownGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "market" => Ok(Self::Market),
            "candles" | "candle" => Ok(Self::Candle),
            "crix-trades" | "trades" | "trade" => Ok(Self::Trade),
            "ticker" => Ok(Self::Ticker),
            "orderbook" => Ok(Self::Orderbook),
            "default" => Ok(Self::Default),
            "order" => Ok(Self::Order),
            other => Err(UnknownGroup(other.to_string())),
        }
    }
}
