use regex::Regex;
use serde::{Deserialize, Serialize};

/// Fallback budget (in rupees) when the free-text input contains no digits.
pub const DEFAULT_BUDGET: u64 = 50_000;
/// Trip duration bounds enforced on every request.
pub const MIN_DURATION_DAYS: u32 = 1;
pub const MAX_DURATION_DAYS: u32 = 14;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TripRequest {
    pub destination: String,
    /// Free-text budget as typed into the form, e.g. "50000" or "Rs. 50,000".
    pub budget: String,
    pub duration_days: u32,
    pub travelers: TravelerProfile,
}

impl TripRequest {
    /// Numeric budget extracted from the free-text field.
    pub fn budget_value(&self) -> u64 {
        extract_budget(&self.budget)
    }

    /// Duration clamped to the supported range. The form slider enforces the
    /// same range, but requests do not have to come from the form.
    pub fn clamped_duration_days(&self) -> u32 {
        self.duration_days
            .clamp(MIN_DURATION_DAYS, MAX_DURATION_DAYS)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TravelerProfile {
    Solo,
    #[serde(rename = "2 Adults")]
    TwoAdults,
    Family,
    Friends,
}

impl TravelerProfile {
    /// Label used in prompts and share links, matching the form options.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelerProfile::Solo => "Solo",
            TravelerProfile::TwoAdults => "2 Adults",
            TravelerProfile::Family => "Family",
            TravelerProfile::Friends => "Friends",
        }
    }
}

/// Interpret the digits-only substring of `raw` as a base-10 integer.
/// Falls back to [`DEFAULT_BUDGET`] when no usable number is present.
pub fn extract_budget(raw: &str) -> u64 {
    let digits: String = Regex::new(r"[^0-9]")
        .expect("static regex")
        .replace_all(raw, "")
        .into_owned();
    digits.parse().unwrap_or(DEFAULT_BUDGET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_budget_keeps_digits_only() {
        assert_eq!(extract_budget("50000"), 50_000);
        assert_eq!(extract_budget("Rs. 75,000"), 75_000);
        assert_eq!(extract_budget("about 1 20 000 total"), 120_000);
    }

    #[test]
    fn extract_budget_defaults_without_digits() {
        assert_eq!(extract_budget(""), DEFAULT_BUDGET);
        assert_eq!(extract_budget("a generous amount"), DEFAULT_BUDGET);
        assert_eq!(extract_budget("---"), DEFAULT_BUDGET);
    }

    #[test]
    fn duration_is_clamped_to_supported_range() {
        let mut request = TripRequest {
            destination: "Goa".to_string(),
            budget: "50000".to_string(),
            duration_days: 0,
            travelers: TravelerProfile::Solo,
        };
        assert_eq!(request.clamped_duration_days(), MIN_DURATION_DAYS);

        request.duration_days = 30;
        assert_eq!(request.clamped_duration_days(), MAX_DURATION_DAYS);

        request.duration_days = 7;
        assert_eq!(request.clamped_duration_days(), 7);
    }

    #[test]
    fn traveler_profile_round_trips_form_labels() {
        let json = serde_json::to_string(&TravelerProfile::TwoAdults).unwrap();
        assert_eq!(json, "\"2 Adults\"");

        let parsed: TravelerProfile = serde_json::from_str("\"2 Adults\"").unwrap();
        assert_eq!(parsed, TravelerProfile::TwoAdults);
        assert_eq!(parsed.as_str(), "2 Adults");
    }
}
