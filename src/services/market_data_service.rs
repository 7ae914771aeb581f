use std::error::Error;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{error, info, warn};
use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{AuthUrl, ClientId, ClientSecret, TokenResponse, TokenUrl};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use url::Url;

use crate::models::market::HotelListing;

const AMADEUS_BASE_URL: &str = "https://test.api.amadeus.com";
/// Hotel listings shown per city, in the order the service returned them.
const MAX_HOTEL_RESULTS: usize = 5;
/// Refresh the cached token this long before the reported expiry.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug)]
pub enum MarketDataError {
    ConfigError(String),
    HttpError(reqwest::Error),
    TokenError(String),
    ApiResponseError { status_code: u16, message: String },
}

impl fmt::Display for MarketDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketDataError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            MarketDataError::HttpError(err) => write!(f, "HTTP error: {}", err),
            MarketDataError::TokenError(msg) => write!(f, "Token error: {}", msg),
            MarketDataError::ApiResponseError {
                status_code,
                message,
            } => write!(f, "Travel data API error {}: {}", status_code, message),
        }
    }
}

impl Error for MarketDataError {}

impl From<reqwest::Error> for MarketDataError {
    fn from(err: reqwest::Error) -> Self {
        MarketDataError::HttpError(err)
    }
}

/// Outcome of a city-code resolution.
///
/// The three causes stay distinguishable for callers and tests; the HTTP layer
/// collapses them back to the display statuses the UI expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    Found(T),
    NotFound,
    ServiceError(String),
}

impl<T> Resolution<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Resolution::Found(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LocationSearchResponse {
    #[serde(default)]
    data: Vec<LocationEntry>,
}

#[derive(Debug, Deserialize)]
struct LocationEntry {
    #[serde(rename = "iataCode")]
    iata_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HotelSearchResponse {
    #[serde(default)]
    data: Vec<HotelEntry>,
}

#[derive(Debug, Deserialize)]
struct HotelEntry {
    name: Option<String>,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Client for the Amadeus self-service travel-data API.
///
/// Covers the two lookups the trip form needs: free-text city name to IATA
/// code, and hotels by city code. Access tokens are obtained through the
/// OAuth2 client-credentials flow and reused until shortly before expiry.
pub struct MarketDataService {
    http_client: Client,
    oauth_client: BasicClient,
    base_url: Url,
    token: Mutex<Option<CachedToken>>,
}

impl MarketDataService {
    pub fn new(client_id: &str, client_secret: &str) -> Result<Self, MarketDataError> {
        let base_url = Url::parse(AMADEUS_BASE_URL).expect("valid Amadeus base URL");
        Self::with_base_url(client_id, client_secret, base_url)
    }

    /// Point the client at a different host (used by tests).
    pub fn with_base_url(
        client_id: &str,
        client_secret: &str,
        base_url: Url,
    ) -> Result<Self, MarketDataError> {
        let token_url = base_url
            .join("/v1/security/oauth2/token")
            .map_err(|e| MarketDataError::ConfigError(format!("Invalid token URL: {}", e)))?;

        // The client-credentials flow never uses the authorization endpoint,
        // but the client type requires one; point it at the token endpoint.
        let oauth_client = BasicClient::new(
            ClientId::new(client_id.to_string()),
            Some(ClientSecret::new(client_secret.to_string())),
            AuthUrl::new(token_url.to_string())
                .map_err(|e| MarketDataError::ConfigError(format!("Invalid auth URL: {}", e)))?,
            Some(
                TokenUrl::new(token_url.to_string()).map_err(|e| {
                    MarketDataError::ConfigError(format!("Invalid token URL: {}", e))
                })?,
            ),
        );

        Ok(Self {
            http_client: Client::new(),
            oauth_client,
            base_url,
            token: Mutex::new(None),
        })
    }

    /// Resolve a free-text city name to its 3-letter IATA code.
    ///
    /// An empty name short-circuits to `NotFound` without a request. Remote
    /// failures come back as `ServiceError` so callers can tell them apart
    /// from a genuine miss.
    pub async fn resolve_city_code(&self, name: &str) -> Resolution<String> {
        let name = name.trim();
        if name.is_empty() {
            return Resolution::NotFound;
        }

        let token = match self.access_token().await {
            Ok(token) => token,
            Err(err) => {
                error!("Token acquisition failed: {}", err);
                return Resolution::ServiceError(err.to_string());
            }
        };

        let url = match self.base_url.join("/v1/reference-data/locations") {
            Ok(url) => url,
            Err(err) => return Resolution::ServiceError(format!("Invalid endpoint: {}", err)),
        };

        let response = self
            .http_client
            .get(url)
            .query(&[("keyword", name), ("subType", "CITY")])
            .bearer_auth(&token)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                error!("City lookup request failed: {}", err);
                return Resolution::ServiceError(err.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("City lookup returned status {}: {}", status, message);
            return Resolution::ServiceError(format!("status {}", status));
        }

        match response.json::<LocationSearchResponse>().await {
            Ok(body) => match first_city_code(body) {
                Some(code) => {
                    info!("Resolved '{}' to city code {}", name, code);
                    Resolution::Found(code)
                }
                None => {
                    warn!("No city code found for '{}'", name);
                    Resolution::NotFound
                }
            },
            Err(err) => {
                error!("City lookup response unreadable: {}", err);
                Resolution::ServiceError(err.to_string())
            }
        }
    }

    /// Fetch hotel listings for a resolved city code, truncated to the first
    /// [`MAX_HOTEL_RESULTS`] in the order the service returned them. Zero
    /// listings is a valid, empty result.
    pub async fn fetch_hotels(&self, city_code: &str) -> Result<Vec<HotelListing>, MarketDataError> {
        let token = self.access_token().await?;

        let url = self
            .base_url
            .join("/v1/reference-data/locations/hotels/by-city")
            .map_err(|e| MarketDataError::ConfigError(format!("Invalid endpoint: {}", e)))?;

        let response = self
            .http_client
            .get(url)
            .query(&[("cityCode", city_code)])
            .bearer_auth(&token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MarketDataError::ApiResponseError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: HotelSearchResponse = response.json().await?;
        let listings = truncate_listings(body.data);
        info!("Fetched {} hotel listings for {}", listings.len(), city_code);
        Ok(listings)
    }

    /// Return a valid access token, exchanging client credentials only when
    /// the cached one is missing or about to expire.
    async fn access_token(&self) -> Result<String, MarketDataError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.value.clone());
            }
        }

        let response = self
            .oauth_client
            .exchange_client_credentials()
            .request_async(async_http_client)
            .await
            .map_err(|e| MarketDataError::TokenError(e.to_string()))?;

        let value = response.access_token().secret().clone();
        let lifetime = response
            .expires_in()
            .and_then(|d| Duration::from_std(d).ok())
            .unwrap_or_else(|| Duration::seconds(1799));
        let expires_at = Utc::now() + lifetime - Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS);

        *cached = Some(CachedToken {
            value: value.clone(),
            expires_at,
        });
        Ok(value)
    }
}

fn first_city_code(response: LocationSearchResponse) -> Option<String> {
    response
        .data
        .into_iter()
        .filter_map(|entry| entry.iata_code)
        .next()
        .map(|code| code.to_uppercase())
}

fn truncate_listings(entries: Vec<HotelEntry>) -> Vec<HotelListing> {
    entries
        .into_iter()
        .take(MAX_HOTEL_RESULTS)
        .map(|entry| HotelListing {
            name: entry.name.unwrap_or_else(|| "Hotel".to_string()),
        })
        .collect()
}

/// The two dependent market-data lookups behind one seam, so the pipeline can
/// be exercised with a stub in tests.
#[async_trait]
pub trait CityLookup: Send + Sync {
    async fn resolve_city_code(&self, name: &str) -> Resolution<String>;
    async fn fetch_hotels(&self, city_code: &str) -> Result<Vec<HotelListing>, MarketDataError>;
}

#[async_trait]
impl CityLookup for MarketDataService {
    async fn resolve_city_code(&self, name: &str) -> Resolution<String> {
        MarketDataService::resolve_city_code(self, name).await
    }

    async fn fetch_hotels(&self, city_code: &str) -> Result<Vec<HotelListing>, MarketDataError> {
        MarketDataService::fetch_hotels(self, city_code).await
    }
}

/// Result of one full market-data cycle for a destination.
#[derive(Debug)]
pub struct MarketDataOutcome {
    pub resolution: Resolution<String>,
    pub hotels: Vec<HotelListing>,
    /// Set when resolution succeeded but the hotel lookup failed.
    pub hotels_error: Option<String>,
}

/// Two-step pipeline: resolve the city code, then — only on success, with the
/// code obtained in this same cycle — fetch its hotels.
pub async fn plan_market_data<L: CityLookup + ?Sized>(
    lookup: &L,
    destination: &str,
) -> MarketDataOutcome {
    let resolution = lookup.resolve_city_code(destination).await;

    let (hotels, hotels_error) = match &resolution {
        Resolution::Found(code) => match lookup.fetch_hotels(code).await {
            Ok(hotels) => (hotels, None),
            Err(err) => {
                error!("Hotel lookup failed for {}: {}", code, err);
                (Vec::new(), Some(err.to_string()))
            }
        },
        _ => (Vec::new(), None),
    };

    MarketDataOutcome {
        resolution,
        hotels,
        hotels_error,
    }
}
