//! OAuth2 token endpoint.

use actix_web::{Either, HttpResponse, web};

use eligibility_core::usecases::SystemUser;
use eligibility_shared::dto::TokenResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /oauth2/token
///
/// Accepts the client credentials either form-encoded or as JSON.
pub async fn token(
    state: web::Data<AppState>,
    body: Either<web::Json<SystemUser>, web::Form<SystemUser>>,
) -> AppResult<HttpResponse> {
    let user = match body {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };

    let granted = state.authenticate_user().execute(user).await?;

    Ok(HttpResponse::Ok().json(TokenResponse::bearer(
        granted.access_token,
        granted.expires_in,
        granted.scope,
    )))
}
