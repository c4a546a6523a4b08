use actix_web::HttpRequest;

/// Returns the first comma separated segment of a header, trimmed.
///
/// `None` when the header is missing or not readable as text; callers
/// supply their own fallback.
pub fn extract_header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
}
