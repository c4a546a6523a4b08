use actix_web::web;

use crate::handlers::health_handlers::health_check;
use crate::handlers::visit_handlers::log_visit;
use crate::middlewares::function_key::FunctionKey;

/// Configure the routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::resource("/LogVisit")
                    .wrap(FunctionKey)
                    .route(web::post().to(log_visit)),
            )
            .route("/health/check", web::get().to(health_check)),
    );
}
