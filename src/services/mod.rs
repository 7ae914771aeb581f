pub mod benchmark_service;
pub mod itinerary_service;
pub mod market_data_service;
