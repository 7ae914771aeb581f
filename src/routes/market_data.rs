use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::models::market::{MarketDataResponse, MarketDataStatus};
use crate::services::market_data_service::{plan_market_data, MarketDataOutcome, Resolution};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MarketDataRequest {
    pub destination: String,
}

/*
    POST /api/market-data

    Resolves the destination to a city code, then fetches up to five hotels
    for it. Every failure collapses to a warning-level status in the response;
    nothing here returns a 5xx.
*/
pub async fn lookup(
    data: web::Data<AppState>,
    payload: web::Json<MarketDataRequest>,
) -> impl Responder {
    let Some(service) = data.market_data.as_ref() else {
        return HttpResponse::Ok().json(MarketDataResponse {
            city_code: None,
            status: MarketDataStatus::Unavailable,
            hotels: Vec::new(),
            message: Some("Amadeus keys are missing. Comparison feature disabled.".to_string()),
        });
    };

    let outcome = plan_market_data(service, &payload.destination).await;
    HttpResponse::Ok().json(display_response(outcome))
}

/// Collapse the tagged pipeline outcome to the display statuses the UI shows.
fn display_response(outcome: MarketDataOutcome) -> MarketDataResponse {
    match outcome.resolution {
        Resolution::Found(code) => match outcome.hotels_error {
            None => MarketDataResponse {
                city_code: Some(code),
                status: MarketDataStatus::Ok,
                hotels: outcome.hotels,
                message: None,
            },
            Some(message) => MarketDataResponse {
                city_code: Some(code),
                status: MarketDataStatus::Error,
                hotels: Vec::new(),
                message: Some(message),
            },
        },
        Resolution::NotFound => MarketDataResponse {
            city_code: None,
            status: MarketDataStatus::NotFound,
            hotels: Vec::new(),
            message: Some("No city match for that destination.".to_string()),
        },
        Resolution::ServiceError(detail) => MarketDataResponse {
            city_code: None,
            status: MarketDataStatus::Error,
            hotels: Vec::new(),
            message: Some(format!("Market API error: {}", detail)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::market::HotelListing;

    #[test]
    fn found_outcome_maps_to_ok_with_hotels() {
        let response = display_response(MarketDataOutcome {
            resolution: Resolution::Found("GOI".to_string()),
            hotels: vec![HotelListing {
                name: "Taj Resort".to_string(),
            }],
            hotels_error: None,
        });
        assert_eq!(response.status, MarketDataStatus::Ok);
        assert_eq!(response.city_code.as_deref(), Some("GOI"));
        assert_eq!(response.hotels.len(), 1);
    }

    #[test]
    fn not_found_outcome_has_no_code_and_a_warning() {
        let response = display_response(MarketDataOutcome {
            resolution: Resolution::NotFound,
            hotels: Vec::new(),
            hotels_error: None,
        });
        assert_eq!(response.status, MarketDataStatus::NotFound);
        assert!(response.city_code.is_none());
        assert!(response.message.is_some());
    }

    #[test]
    fn hotel_failure_keeps_the_resolved_code() {
        let response = display_response(MarketDataOutcome {
            resolution: Resolution::Found("GOI".to_string()),
            hotels: Vec::new(),
            hotels_error: Some("status 500".to_string()),
        });
        assert_eq!(response.status, MarketDataStatus::Error);
        assert_eq!(response.city_code.as_deref(), Some("GOI"));
    }

    #[test]
    fn service_error_outcome_maps_to_error() {
        let response = display_response(MarketDataOutcome {
            resolution: Resolution::ServiceError("timeout".to_string()),
            hotels: Vec::new(),
            hotels_error: None,
        });
        assert_eq!(response.status, MarketDataStatus::Error);
        assert!(response.message.unwrap().contains("timeout"));
    }
}
