// src/web/handlers/jobs.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

use crate::aggregator::Listing;
use crate::web::types::*;

pub async fn job_list_handler(
    scrape: bool,
    state: &State<ServerState>,
) -> Result<Json<DataResponse<Listing>>, Json<StandardErrorResponse>> {
    if scrape {
        info!("Scrape requested before listing");
    }

    match state.board.listing(scrape).await {
        Ok(listing) => {
            let message = match &listing.report {
                Some(report) => format!(
                    "{} jobs listed, {} new from this scrape",
                    listing.jobs.len(),
                    report.total_saved()
                ),
                None => format!("{} jobs listed", listing.jobs.len()),
            };
            Ok(Json(DataResponse::new(message, listing)))
        }
        Err(e) => {
            error!("Failed to list jobs: {:#}", e);
            Err(Json(StandardErrorResponse::new(
                "Failed to read stored jobs".to_string(),
                "STORAGE_ERROR".to_string(),
                vec!["Check the database path and permissions".to_string()],
            )))
        }
    }
}
