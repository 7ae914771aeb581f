use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::info;

use trip_companion_api::config::AppConfig;
use trip_companion_api::routes;
use trip_companion_api::state::AppState;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    // One snapshot of the environment; everything downstream gets it injected.
    let config = AppConfig::from_env();
    let state = web::Data::new(AppState::from_config(config));

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .service(web::scope("/itineraries").route(
                        "/generate",
                        web::post().to(routes::itinerary::generate),
                    ))
                    .route(
                        "/market-data",
                        web::post().to(routes::market_data::lookup),
                    )
                    .route("/benchmark", web::post().to(routes::benchmark::compare))
                    .route("/share", web::post().to(routes::share::share_link)),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
