#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the planning map application.
//!
//! Serves the REST API for reviewing neighbor comments on planning
//! applications, plus the static frontend files. All data comes from a
//! single JSON file behind [`ApplicationStore`]; there is no database and
//! no authentication (single-officer prototype).

mod handlers;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, error, middleware, web};
use planning_map_server_models::{ApiErrorCode, ApiErrorResponse};
use planning_map_store::ApplicationStore;
use std::sync::Arc;

/// Default location of the JSON data file.
pub const DEFAULT_DATA_PATH: &str = "data/applications.json";

/// Shared application state.
pub struct AppState {
    /// The file-backed application store.
    pub store: Arc<ApplicationStore>,
}

/// Registers the `/api` routes and the JSON payload error handler.
///
/// Shared between [`run_server`] and the handler tests so both exercise
/// the same route table.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health))
                .route("/applications", web::get().to(handlers::applications))
                .route(
                    "/applications/{id}",
                    web::get().to(handlers::application_by_id),
                )
                .route(
                    "/applications/{id}/comments",
                    web::get().to(handlers::application_comments),
                )
                .route(
                    "/applications/{id}/comments/{commentId}",
                    web::put().to(handlers::update_comment),
                )
                .route(
                    "/applications/{id}/dashboard",
                    web::get().to(handlers::dashboard),
                ),
        );
}

/// Maps malformed JSON request bodies to the uniform error envelope so
/// the client always receives well-formed JSON.
fn json_error_handler(err: error::JsonPayloadError, req: &HttpRequest) -> error::Error {
    let response = HttpResponse::BadRequest().json(ApiErrorResponse::new(
        ApiErrorCode::ValidationError,
        "Request body must be a valid JSON object",
        req.path(),
    ));
    error::InternalError::from_response(err, response).into()
}

/// Starts the planning map API server.
///
/// Opens the store over the JSON data file named by `PLANNING_DATA_PATH`
/// (default `data/applications.json`) and starts the Actix-Web HTTP
/// server. This is a regular async function — the caller provides the
/// async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let data_path =
        std::env::var("PLANNING_DATA_PATH").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());
    log::info!("Serving application data from {data_path}");

    let store = Arc::new(ApplicationStore::new(&data_path));
    let state = web::Data::new(AppState { store });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
