//! Application handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use eligibility_core::domain::{ApplicationImportRow, ApplicationStatus};
use eligibility_core::usecases::ApplicationSearch;
use eligibility_shared::ApiResponse;
use eligibility_shared::dto::BulkDeleteRequest;

use crate::handlers::{parse_guid, upload};
use crate::middleware::auth::{APPLICATION_SCOPE, Identity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
}

// Structural rejections are client errors; batches with row failures are not.
fn batch_response<T: Serialize>(rejected: bool, result: &T) -> HttpResponse {
    if rejected {
        HttpResponse::BadRequest().json(result)
    } else {
        HttpResponse::Ok().json(result)
    }
}

/// POST /application
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ApplicationImportRow>,
) -> AppResult<HttpResponse> {
    identity.require_scope(APPLICATION_SCOPE)?;

    let application = state
        .create_application()
        .execute(body.into_inner(), &identity.access())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(application)))
}

/// GET /application/{guid}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    identity.require_scope(APPLICATION_SCOPE)?;
    let id = parse_guid(&path)?;

    let application = state
        .get_application()
        .execute(id, &identity.access())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(application)))
}

/// PATCH /application/{guid}
pub async fn update_status(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<StatusUpdateRequest>,
) -> AppResult<HttpResponse> {
    identity.require_scope(APPLICATION_SCOPE)?;
    let id = parse_guid(&path)?;

    let application = state
        .update_application_status()
        .execute(id, body.status, &identity.access())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(application)))
}

/// DELETE /application/{guid}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    identity.require_scope(APPLICATION_SCOPE)?;
    let id = parse_guid(&path)?;

    state
        .delete_application()
        .execute(id, &identity.access())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(id, "Application deleted")))
}

/// POST /application/search
pub async fn search(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ApplicationSearch>,
) -> AppResult<HttpResponse> {
    identity.require_scope(APPLICATION_SCOPE)?;

    let page = state
        .search_applications()
        .execute(body.into_inner(), &identity.access())
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// POST /application/bulk-import
pub async fn bulk_import(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    identity.require_scope(APPLICATION_SCOPE)?;
    let file = upload::read_file_field(payload).await?;

    let result = state
        .import_applications()
        .execute(file, &identity.local_authorities())
        .await;

    tracing::info!(
        client_id = %identity.client_id,
        total = result.total_records,
        imported = result.successful_imports,
        failed = result.failed_imports,
        "Bulk import processed"
    );
    Ok(batch_response(result.is_rejection(), &result))
}

/// POST /application/bulk-import/json
pub async fn bulk_import_json(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<Vec<ApplicationImportRow>>,
) -> AppResult<HttpResponse> {
    identity.require_scope(APPLICATION_SCOPE)?;

    let result = state
        .import_applications()
        .execute_from_json(body.into_inner(), &identity.local_authorities())
        .await;

    Ok(batch_response(result.is_rejection(), &result))
}

/// POST /application/bulk-delete
pub async fn bulk_delete(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    identity.require_scope(APPLICATION_SCOPE)?;
    let file = upload::read_file_field(payload).await?;

    let result = state
        .delete_applications()
        .execute(file, &identity.local_authorities())
        .await;

    tracing::info!(
        client_id = %identity.client_id,
        total = result.total_records,
        deleted = result.successful_deletions,
        failed = result.failed_deletions,
        "Bulk delete processed"
    );
    Ok(batch_response(result.is_rejection(), &result))
}

/// POST /application/bulk-delete/json
pub async fn bulk_delete_json(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<BulkDeleteRequest>,
) -> AppResult<HttpResponse> {
    identity.require_scope(APPLICATION_SCOPE)?;

    let result = state
        .delete_applications()
        .execute_from_json(body.into_inner().guids, &identity.local_authorities())
        .await;

    Ok(batch_response(result.is_rejection(), &result))
}
