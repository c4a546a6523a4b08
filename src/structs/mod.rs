pub mod api_response;
pub mod visit_request;
