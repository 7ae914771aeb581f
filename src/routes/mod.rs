pub mod benchmark;
pub mod health;
pub mod itinerary;
pub mod market_data;
pub mod share;
