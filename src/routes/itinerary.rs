use actix_web::{web, HttpResponse, Responder};
use futures::StreamExt;
use log::error;
use serde_json::json;

use crate::models::trip::TripRequest;
use crate::state::AppState;

/*
    POST /api/itineraries/generate

    Streams the generated itinerary as plain-text fragments in arrival order;
    the client appends them as they come in.
*/
pub async fn generate(data: web::Data<AppState>, payload: web::Json<TripRequest>) -> impl Responder {
    let Some(service) = data.itinerary.as_ref() else {
        return HttpResponse::ServiceUnavailable().json(json!({
            "error": "Itinerary generation is unavailable: GEMINI_API_KEY is not configured."
        }));
    };

    let request = payload.into_inner();

    match service.generate(&request).await {
        Ok(fragments) => {
            let body = fragments.map(|item| {
                item.map(web::Bytes::from).map_err(|err| {
                    // Fragments already sent stay sent; the connection just
                    // ends with an error.
                    error!("Itinerary stream failed mid-flight: {}", err);
                    err
                })
            });
            HttpResponse::Ok()
                .content_type("text/plain; charset=utf-8")
                .streaming(body)
        }
        Err(err) => {
            error!("Failed to start itinerary generation: {}", err);
            HttpResponse::BadGateway().json(json!({
                "error": format!("Itinerary generation failed: {}", err)
            }))
        }
    }
}
