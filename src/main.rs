mod config;
mod db;
mod errors;
mod handlers;
mod middlewares;
mod models;
mod routes;
mod services;
mod state;
mod structs;
mod utils;

use crate::config::settings::Settings;
use crate::services::visitor_store::VisitorStore;
use crate::state::app_state::AppState;
use actix_cors::Cors;
use actix_web::{App, HttpServer, http, middleware::Logger, web};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use routes::init_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Connect the document store once for the whole process
    let store = match VisitorStore::connect(&settings).await {
        Ok(store) => store,
        Err(e) => {
            error!("Error connecting to the database: {:#}", e);
            std::process::exit(1);
        }
    };

    let app_state = web::Data::new(AppState {
        store: store.clone(),
        success_on_storage_failure: settings.success_on_storage_failure,
        function_key: settings.function_key.clone(),
    });

    let allowed_origins = settings.allowed_origins.clone();

    info!("Listening on {}:{}", settings.host, settings.port);

    HttpServer::new(move || {
        let logger = Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %D ms");
        // Visits are posted from the tracked site, so CORS has to let it through
        let cors = if allowed_origins.is_empty() {
            Cors::default().allow_any_origin()
        } else {
            allowed_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        };
        let cors = cors
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![http::header::ACCEPT, http::header::CONTENT_TYPE])
            .allowed_header("x-functions-key")
            .max_age(3600);

        App::new()
            .wrap(logger)
            .wrap(cors)
            .app_data(app_state.clone())
            .configure(init_routes)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await?;

    store.shutdown().await;
    Ok(())
}
