//! Authentication handlers.

use actix_web::{HttpResponse, web};

use quill_core::ports::{AuthError, BaseRepository, STAFF_ROLE};
use quill_shared::dto::{AuthResponse, LoginRequest};

use super::render;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "Rejected login");
        return Err(AuthError::InvalidCredentials.into());
    }

    let roles = if user.is_staff {
        vec![STAFF_ROLE.to_string()]
    } else {
        Vec::new()
    };
    let token = state
        .tokens
        .generate_token(user.id, &user.email, roles)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    }))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(HttpResponse::Ok().json(render::user(user)))
}
