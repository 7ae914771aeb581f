use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use url::form_urlencoded;

use crate::models::trip::TripRequest;

/// Inbox that pre-filled itinerary inquiries are addressed to.
const INQUIRY_RECIPIENT: &str = "inquiries@trip-companion.example";

#[derive(Serialize)]
pub struct ShareResponse {
    pub mailto_url: String,
}

/*
    POST /api/share

    Builds the pre-filled mailto link for the "email this itinerary" button.
*/
pub async fn share_link(payload: web::Json<TripRequest>) -> impl Responder {
    HttpResponse::Ok().json(ShareResponse {
        mailto_url: build_mailto(&payload),
    })
}

fn build_mailto(request: &TripRequest) -> String {
    let days = request.clamped_duration_days();
    let subject = format!("Travel Inquiry: {}-Day {} Trip", days, request.destination);
    let body = format!(
        "I am interested in a {}-day trip to {} for {} with a budget of ₹{}.",
        days,
        request.destination,
        request.travelers.as_str(),
        request.budget_value()
    );

    format!(
        "mailto:{}?subject={}&body={}",
        INQUIRY_RECIPIENT,
        encode_component(&subject),
        encode_component(&body)
    )
}

/// Percent-encode one mailto query component. Mail clients show a literal '+'
/// for form-encoded spaces, so those are rewritten to %20.
fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::TravelerProfile;

    fn request() -> TripRequest {
        TripRequest {
            destination: "Goa".to_string(),
            budget: "50000".to_string(),
            duration_days: 3,
            travelers: TravelerProfile::TwoAdults,
        }
    }

    #[test]
    fn mailto_embeds_subject_and_body() {
        let url = build_mailto(&request());
        assert!(url.starts_with("mailto:inquiries@trip-companion.example?subject="));
        assert!(url.contains("Travel%20Inquiry%3A%203-Day%20Goa%20Trip"));
        assert!(url.contains("2%20Adults"));
        assert!(url.contains("50000"));
    }

    #[test]
    fn mailto_contains_no_raw_spaces() {
        let url = build_mailto(&request());
        assert!(!url.contains(' '));
        assert!(!url.contains('+'));
    }

    #[test]
    fn mailto_uses_clamped_duration() {
        let mut request = request();
        request.duration_days = 40;
        let url = build_mailto(&request);
        assert!(url.contains("14-Day") || url.contains("14-day") || url.contains("14"));
        assert!(!url.contains("40"));
    }
}
