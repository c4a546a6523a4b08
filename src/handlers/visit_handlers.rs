use std::panic::AssertUnwindSafe;

use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::{FutureExt, StreamExt};
use log::{debug, info};
use serde_json::Value;
use validator::Validate;

use crate::errors::visit_error::VisitError;
use crate::models::device::Device;
use crate::models::visitor_log::{UNKNOWN, VisitorLog};
use crate::services::visitor_store::LogOutcome;
use crate::state::app_state::AppState;
use crate::structs::api_response::SuccessResponse;
use crate::structs::visit_request::VisitRequest;
use crate::utils::headers::extract_header_value;

/// Largest request body read into memory.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Record a page visit
pub async fn log_visit(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, VisitError> {
    info!("Received a new visitor.");

    // A panic anywhere in the pipeline still gets an answer
    AssertUnwindSafe(process_visit(&app_state, &req, payload))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| {
            Err(VisitError::Internal(anyhow::anyhow!(
                "LogVisit pipeline panicked"
            )))
        })
}

async fn read_body(mut payload: web::Payload) -> Result<web::BytesMut, VisitError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            VisitError::Internal(anyhow::anyhow!("Failed to read request body: {}", e))
        })?;
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(VisitError::BodyTooLarge);
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

async fn process_visit(
    app_state: &AppState,
    req: &HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, VisitError> {
    let body = read_body(payload).await?;
    let body = String::from_utf8_lossy(&body);
    debug!("Received request body: {}", body);

    if body.trim().is_empty() {
        return Err(VisitError::EmptyBody);
    }

    // Malformed JSON and JSON of the wrong shape are reported differently
    let value: Value = serde_json::from_str(&body).map_err(|_| VisitError::InvalidJson)?;
    match &value {
        Value::Object(_) => {}
        Value::Null => return Err(VisitError::MissingPage),
        _ => return Err(VisitError::InvalidJson),
    }

    let request: VisitRequest =
        serde_json::from_value(value).map_err(|_| VisitError::MissingPage)?;
    if request.validate().is_err() {
        return Err(VisitError::MissingPage);
    }
    let page_visited = request.page_visited.ok_or(VisitError::MissingPage)?;

    let mut visit = VisitorLog::new(page_visited);
    enrich(&mut visit, req, request.ip_address);

    info!(
        "Logging visit for page {} from IP {}.",
        visit.page_visited, visit.ip_address
    );

    let outcome = app_state.store.log_visit(&mut visit).await;
    let message = outcome.message();

    match outcome {
        LogOutcome::Logged(_) => Ok(HttpResponse::Ok().json(SuccessResponse::new(message))),
        // Callers have to read the message to notice the failure
        _ if app_state.success_on_storage_failure => {
            Ok(HttpResponse::Ok().json(SuccessResponse::new(message)))
        }
        LogOutcome::StorageFailed(_) => Err(VisitError::StorageUnavailable(message)),
        LogOutcome::ValidationFailed(_) => Err(VisitError::Rejected(message)),
    }
}

/// Overwrites every server-derived field from the request metadata.
/// Only the IP address may fall back to what the client sent.
fn enrich(visit: &mut VisitorLog, req: &HttpRequest, client_ip: Option<String>) {
    visit.touch();
    visit.ip_address = extract_header_value(req, "X-Forwarded-For")
        .or(client_ip)
        .unwrap_or_else(|| UNKNOWN.to_string());
    visit.browser = extract_header_value(req, "User-Agent").unwrap_or_else(|| UNKNOWN.to_string());
    visit.referrer = extract_header_value(req, "Referer").unwrap_or_else(|| UNKNOWN.to_string());
    // browser is never empty at this point, so Device::Unknown is not produced here
    visit.device = Device::from_user_agent(&visit.browser);
}
