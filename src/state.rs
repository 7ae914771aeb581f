use log::warn;

use crate::config::AppConfig;
use crate::services::itinerary_service::ItineraryService;
use crate::services::market_data_service::MarketDataService;

/// Shared handler state: the startup config snapshot plus the vendor clients
/// it allowed us to build. A service stays `None` when its credentials are
/// absent, and the corresponding feature reports itself as unavailable.
pub struct AppState {
    pub config: AppConfig,
    pub itinerary: Option<ItineraryService>,
    pub market_data: Option<MarketDataService>,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Self {
        let itinerary = match config.gemini_api_key() {
            Some(key) => Some(ItineraryService::new(key)),
            None => {
                warn!("GEMINI_API_KEY not set; itinerary generation disabled");
                None
            }
        };

        let market_data = match (config.amadeus_client_id(), config.amadeus_client_secret()) {
            (Some(id), Some(secret)) => match MarketDataService::new(id, secret) {
                Ok(service) => Some(service),
                Err(e) => {
                    warn!("Market data client not available: {}", e);
                    None
                }
            },
            _ => {
                warn!("Amadeus credentials not set; market data disabled");
                None
            }
        };

        Self {
            config,
            itinerary,
            market_data,
        }
    }
}
