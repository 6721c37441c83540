//! Parsing of the `Remaining-Req` response header.
//!
//! Upbit reports the quota left in the caller's current windows as
//! ```text
//! Remaining-Req: group=default; min=1799; sec=29
//! ```
//! The `min` field is omitted by newer API versions.

/// Name of the header carrying the remaining quota.
pub const REMAINING_REQ_HEADER: &str = "Remaining-Req";

/// Server-reported remaining quota for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemainingReq {
    /// Group name as reported by the server.
    pub group: String,
    /// Requests left in the current minute, if reported.
    pub min: Option<u32>,
    /// Requests left in the current second.
    pub sec: u32,
}

impl RemainingReq {
    /// Parse a header value. Returns `None` when `group` or `sec` is missing.
    pub fn parse(value: &str) -> Option<Self> {
        let mut group = None;
        let mut min = None;
        let mut sec = None;

        for part in value.split(';') {
            let Some((key, val)) = part.split_once('=') else {
                continue;
            };
            match key.trim() {
                "group" => group = Some(val.trim().to_string()),
                "min" => min = val.trim().parse().ok(),
                "sec" => sec = val.trim().parse().ok(),
                _ => {}
            }
        }

        Some(Self {
            group: group?,
            min,
            sec: sec?,
        })
    }
}
