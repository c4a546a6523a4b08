use actix_web::{HttpResponse, web};
use log::warn;

use crate::state::app_state::AppState;
use crate::structs::api_response::ErrorResponse;

pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    // Ping the document store without touching any visit
    match state.store.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => {
            warn!("Health check failed: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Database connection failed"))
        }
    }
}
