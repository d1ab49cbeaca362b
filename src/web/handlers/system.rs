// src/web/handlers/system.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

use crate::web::types::ServerState;

pub async fn health_handler(state: &State<ServerState>) -> Result<Json<&'static str>, Status> {
    match state.database.health_check().await {
        Ok(()) => Ok(Json("OK")),
        Err(e) => {
            error!("Health check failed: {:#}", e);
            Err(Status::ServiceUnavailable)
        }
    }
}
