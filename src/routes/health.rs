use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::config::AppConfig;
use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let generation_result = check_generation(&data.config);
    health
        .services
        .insert("itinerary_generation".to_string(), generation_result.clone());

    let market_result = check_market_data(&data.config);
    health
        .services
        .insert("market_data".to_string(), market_result.clone());

    // A missing credential degrades the report but the service keeps running.
    if generation_result.status != "ok" || market_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_generation(config: &AppConfig) -> ServiceStatus {
    match config.gemini_api_key() {
        Some(key) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Gemini API key configured ({})", mask(key))),
        },
        None => ServiceStatus {
            status: "error".to_string(),
            details: Some("GEMINI_API_KEY not configured".to_string()),
        },
    }
}

fn check_market_data(config: &AppConfig) -> ServiceStatus {
    let client_id = config.amadeus_client_id();
    let client_secret = config.amadeus_client_secret();

    if let (Some(id), Some(_)) = (client_id, client_secret) {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Amadeus configured, Client ID: {}", mask(id))),
        }
    } else {
        let mut missing = Vec::new();

        if client_id.is_none() {
            missing.push("AMADEUS_CLIENT_ID");
        }
        if client_secret.is_none() {
            missing.push("AMADEUS_CLIENT_SECRET");
        }

        ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("Missing configuration: {}", missing.join(", "))),
        }
    }
}

fn mask(value: &str) -> String {
    if value.len() > 8 {
        format!("{}***{}", &value[0..4], &value[value.len() - 4..])
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_hides_the_middle_of_long_keys() {
        assert_eq!(mask("abcd1234efgh"), "abcd***efgh");
    }

    #[test]
    fn mask_hides_short_keys_entirely() {
        assert_eq!(mask("short"), "***");
    }
}
