//! HTTP handlers and route configuration.

mod applications;
mod auth;
mod bulk_checks;
mod health;
mod upload;

use actix_web::web;
use uuid::Uuid;

use crate::middleware::error::{AppError, AppResult};

pub(crate) fn parse_guid(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::BadRequest(format!("Invalid GUID format '{raw}'")))
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    // Public routes
    .route("/api/health", web::get().to(health::health_check))
    .route("/oauth2/token", web::post().to(auth::token))
    // Scoped routes
    .service(
        web::scope("/application")
            .route("", web::post().to(applications::create))
            .route("/search", web::post().to(applications::search))
            .route("/bulk-import", web::post().to(applications::bulk_import))
            .route("/bulk-import/json", web::post().to(applications::bulk_import_json))
            .route("/bulk-delete", web::post().to(applications::bulk_delete))
            .route("/bulk-delete/json", web::post().to(applications::bulk_delete_json))
            .route("/{guid}", web::get().to(applications::get))
            .route("/{guid}", web::patch().to(applications::update_status))
            .route("/{guid}", web::delete().to(applications::delete)),
    )
    .service(
        web::scope("/bulk-check")
            .route("", web::get().to(bulk_checks::list))
            .route("/{guid}", web::delete().to(bulk_checks::delete)),
    );
}
