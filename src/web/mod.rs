// src/web/mod.rs
//! HTTP trigger: `GET /` lists stored jobs, `GET /?scrape=true` scrapes first.

pub mod handlers;
pub mod types;

pub use types::*;

use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, routes, Build, Request, Response, Rocket, State};
use tracing::info;

use crate::aggregator::{Aggregator, JobBoard, Listing};
use crate::browser::WebDriverLauncher;
use crate::config::AppConfig;
use crate::core::Database;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new("Access-Control-Allow-Methods", "GET, OPTIONS"));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[get("/?<scrape>")]
pub async fn job_list(
    scrape: Option<&str>,
    state: &State<ServerState>,
) -> Result<Json<DataResponse<Listing>>, Json<StandardErrorResponse>> {
    handlers::job_list_handler(scrape == Some("true"), state).await
}

#[get("/health")]
pub async fn health(state: &State<ServerState>) -> Result<Json<&'static str>, Status> {
    handlers::health_handler(state).await
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Use GET / or GET /?scrape=true".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec!["Try again in a few moments".to_string()],
    ))
}

pub fn build_rocket(state: ServerState, port: u16) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    rocket::custom(figment)
        .attach(Cors)
        .manage(state)
        .register("/", catchers![not_found, internal_error])
        .mount("/", routes![job_list, health])
}

// Main server start function
pub async fn start_web_server(config: AppConfig) -> Result<()> {
    let database = Database::new(&config.database_path).await?;

    let aggregator = Aggregator::new(
        WebDriverLauncher,
        database.jobs(),
        config.launch_config(),
        config.sources(),
    );
    let state = ServerState {
        board: JobBoard::new(aggregator),
        database,
    };

    info!("Starting job board server on port {}", config.port);
    info!("Database: {}", config.database_path.display());
    info!("WebDriver: {}", config.webdriver_url);

    build_rocket(state, config.port)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;

    Ok(())
}
