// src/web/types.rs
use rocket::serde::Serialize;

use crate::aggregator::JobBoard;
use crate::browser::WebDriverLauncher;
use crate::core::{Database, JobRepository};

pub type Board = JobBoard<WebDriverLauncher, JobRepository>;

/// Managed state shared by every route.
pub struct ServerState {
    pub board: Board,
    pub database: Database,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}
