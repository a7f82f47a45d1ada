//! Health check endpoint.

use actix_web::HttpResponse;

use eligibility_shared::dto::HealthResponse;

/// GET /api/health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
