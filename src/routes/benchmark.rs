use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::models::trip::extract_budget;
use crate::services::benchmark_service::{BenchmarkPoint, BenchmarkService};

#[derive(Deserialize)]
pub struct BenchmarkRequest {
    /// Free-text budget as typed into the form.
    pub budget: String,
}

#[derive(Serialize)]
pub struct BenchmarkResponse {
    pub budget_value: u64,
    pub series: Vec<BenchmarkPoint>,
}

/*
    POST /api/benchmark

    Pure comparison series for the price chart; works with or without any
    vendor credentials.
*/
pub async fn compare(payload: web::Json<BenchmarkRequest>) -> impl Responder {
    let budget_value = extract_budget(&payload.budget);
    HttpResponse::Ok().json(BenchmarkResponse {
        budget_value,
        series: BenchmarkService::series(budget_value),
    })
}
