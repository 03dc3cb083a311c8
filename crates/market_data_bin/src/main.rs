use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use dotenvy::dotenv;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use yahoo_api::api::{History, YahooAPI, YahooError};

mod frontend;
mod records;

#[derive(Serialize)]
struct StatusResponse {
    status: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

#[derive(Debug, Deserialize)]
struct MarketDataQuery {
    symbol: String,
    interval: String,
    period: String,
}

fn market_data_response(result: Result<History, YahooError>) -> HttpResponse {
    match result {
        Ok(history) => HttpResponse::Ok().json(records::to_records(&history)),
        Err(YahooError::NoData { symbol }) => HttpResponse::NotFound().json(ErrorResponse {
            detail: format!(
                "No data found for symbol '{}' with the given parameters. It may be an invalid ticker.",
                symbol
            ),
        }),
        Err(e) => {
            error!("market data request failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                detail: format!("An internal server error occurred: {}", e),
            })
        }
    }
}

#[get("/api/market_data")]
async fn get_market_data(
    query: web::Query<MarketDataQuery>,
    api: web::Data<YahooAPI>,
) -> HttpResponse {
    let result = api
        .get_history(&query.symbol, &query.interval, &query.period)
        .await;
    market_data_response(result)
}

#[get("/")]
async fn serve_frontend() -> HttpResponse {
    frontend::render(Path::new(frontend::FRONTEND_FILE))
}

#[get("/healthcheck")]
async fn healthcheck() -> impl Responder {
    web::Json(StatusResponse {
        status: "ok".to_string(),
    })
}

async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(StatusResponse {
        status: "not found".to_string(),
    })
}

struct Config {
    workers: usize,
    allowed_origin: Option<String>,
}

impl Config {
    fn new() -> Config {
        dotenv().ok();

        let workers = env::var("MARKET_DATA_WORKERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|w| *w > 0)
            .unwrap_or(1);

        let allowed_origin = env::var("MARKET_DATA_ALLOWED_ORIGIN")
            .ok()
            .filter(|origin| !origin.trim().is_empty());

        Config {
            workers,
            allowed_origin,
        }
    }
}

fn cors_policy(allowed_origin: Option<&str>) -> Cors {
    match allowed_origin {
        // any origin, any method, any header, credentials allowed
        None => Cors::permissive(),
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let config = Config::new();

    let api = web::Data::new(YahooAPI::new());
    let allowed_origin = config.allowed_origin.clone();

    info!("listening on 0.0.0.0:8000");

    HttpServer::new(move || {
        App::new()
            .app_data(api.clone())
            .service(healthcheck)
            .service(get_market_data)
            .service(serve_frontend)
            .default_service(web::to(not_found))
            .wrap(cors_policy(allowed_origin.as_deref()))
            .wrap(Logger::default())
    })
    .bind(("0.0.0.0", 8000))?
    .workers(config.workers)
    .run()
    .await
}
