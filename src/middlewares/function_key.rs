use std::future::{Ready, ready};

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    error::ErrorUnauthorized,
    web,
};
use futures_util::future::LocalBoxFuture;
use log::warn;

use crate::state::app_state::AppState;

const KEY_HEADER: &str = "x-functions-key";

/// Trigger-level key check. A no-op when the service has no key configured.
pub struct FunctionKey;

impl<S, B> Transform<S, ServiceRequest> for FunctionKey
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = FunctionKeyMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(FunctionKeyMiddleware { service }))
    }
}

pub struct FunctionKeyMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for FunctionKeyMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let expected = req
            .app_data::<web::Data<AppState>>()
            .and_then(|state| state.function_key.clone());

        let expected = match expected {
            Some(key) => key,
            None => return Box::pin(self.service.call(req)),
        };

        // Key from the header first, then from the `code` query parameter
        let supplied = req
            .headers()
            .get(KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .or_else(|| query_code(req.query_string()));

        if supplied.as_deref() != Some(expected.as_str()) {
            warn!("Rejected request to {} without a valid function key", req.path());
            return Box::pin(async move { Err(ErrorUnauthorized("Invalid function key")) });
        }

        Box::pin(self.service.call(req))
    }
}

fn query_code(query: &str) -> Option<String> {
    web::Query::<Vec<(String, String)>>::from_query(query)
        .ok()?
        .into_inner()
        .into_iter()
        .find(|(name, _)| name == "code")
        .map(|(_, value)| value)
}
