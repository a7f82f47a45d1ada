//! Bulk check handlers.

use actix_web::{HttpResponse, web};

use eligibility_shared::ApiResponse;

use crate::handlers::parse_guid;
use crate::middleware::auth::{BULK_CHECK_SCOPE, Identity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /bulk-check
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    identity.require_scope(BULK_CHECK_SCOPE)?;

    let checks = state
        .get_bulk_checks()
        .execute(&identity.local_authorities())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(checks)))
}

/// DELETE /bulk-check/{guid}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    identity.require_scope(BULK_CHECK_SCOPE)?;
    let id = parse_guid(&path)?;

    state
        .delete_bulk_check()
        .execute(id, &identity.local_authorities())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(id, "Bulk check deleted")))
}
