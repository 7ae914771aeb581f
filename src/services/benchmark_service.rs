use serde::{Deserialize, Serialize};

/// Fixed market reference points (in rupees) the user's plan is charted against.
const BUDGET_TIER: u64 = 25_000;
const MID_RANGE_TIER: u64 = 75_000;
const LUXURY_TIER: u64 = 150_000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BenchmarkPoint {
    pub category: String,
    pub amount: u64,
}

pub struct BenchmarkService;

impl BenchmarkService {
    /// Build the four-point comparison series for the price bar chart.
    /// Pure and infallible; the order matches the chart's category axis.
    pub fn series(budget: u64) -> Vec<BenchmarkPoint> {
        [
            ("Budget", BUDGET_TIER),
            ("Your Plan", budget),
            ("Mid-Range", MID_RANGE_TIER),
            ("Luxury", LUXURY_TIER),
        ]
        .into_iter()
        .map(|(category, amount)| BenchmarkPoint {
            category: category.to_string(),
            amount,
        })
        .collect()
    }
}
