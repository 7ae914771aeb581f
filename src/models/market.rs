use serde::{Deserialize, Serialize};

/// One hotel entry shown in the "Live Market Options" panel.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HotelListing {
    pub name: String,
}

/// JSON body returned by the market-data endpoint.
///
/// `status` keeps the backward-compatible display semantics: the UI only needs
/// to know whether to show hotels, a "no data" warning, or an error banner.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MarketDataResponse {
    pub city_code: Option<String>,
    pub status: MarketDataStatus,
    pub hotels: Vec<HotelListing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MarketDataStatus {
    /// City resolved and the hotel lookup succeeded (possibly with zero hotels).
    Ok,
    /// The city name did not resolve to a code; the hotel step was skipped.
    NotFound,
    /// A remote call failed after being issued.
    Error,
    /// Amadeus credentials are not configured; the feature is disabled.
    Unavailable,
}
