//! Authentication gateway
//!
//! Email/password sign-in issues an opaque session token, delivered as the
//! `synap_session` cookie. Requests authenticate with that cookie or with an
//! `Authorization: Bearer <token>` header. Only the token's SHA-256 is stored.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use synap_common::api::auth::{
    generate_session_token, hash_session_token, verify_dummy_password, verify_password,
};
use synap_common::api::ApiSuccess;
use synap_common::db::User;
use tracing::{info, warn};

use crate::db::users;
use crate::{ApiError, ApiResult, AppState};

/// Session cookie name
pub const SESSION_COOKIE: &str = "synap_session";

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Authenticated admin, inserted into request extensions by [`require_admin`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Public view of an account
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub role: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            email_verified: user.email_verified,
            role: user.role.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionPayload {
    pub user: SessionUser,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Session token from the cookie, falling back to a bearer header
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string());

    from_cookie.filter(|t| !t.is_empty()).or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// User owning the request's session, if any
pub async fn session_user(state: &AppState, headers: &HeaderMap) -> ApiResult<Option<User>> {
    let Some(token) = session_token(headers) else {
        return Ok(None);
    };
    Ok(users::find_session_user(&state.db, &hash_session_token(&token)).await?)
}

fn session_cookie(token: &str, max_age_secs: i64) -> ApiResult<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    ))
    .map_err(|e| ApiError::Internal(e.to_string()))
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> ApiResult<Response> {
    let Some(user) = users::find_user_by_email(&state.db, &request.email).await? else {
        verify_dummy_password(&request.password);
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let valid = verify_password(&request.password, &user.password_hash).unwrap_or_else(|e| {
        warn!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
        false
    });
    if !valid {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = generate_session_token();
    users::create_session(
        &state.db,
        &user.id,
        &hash_session_token(&token),
        state.session_ttl_hours,
    )
    .await?;

    info!(user_id = %user.id, "User signed in");

    let cookie = session_cookie(&token, state.session_ttl_hours.saturating_mul(3600))?;
    let body = Json(ApiSuccess::new(SessionPayload {
        user: SessionUser::from(&user),
    }));
    Ok(([(header::SET_COOKIE, cookie)], body).into_response())
}

/// POST /api/auth/sign-out
///
/// Always succeeds; the cookie is cleared even without a live session.
pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    if let Some(token) = session_token(&headers) {
        users::delete_session(&state.db, &hash_session_token(&token)).await?;
    }

    let cookie = session_cookie("", 0)?;
    Ok(([(header::SET_COOKIE, cookie)], Json(ApiSuccess::empty())).into_response())
}

/// GET /api/auth/session
pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ApiSuccess<SessionPayload>>> {
    let user = session_user(&state, &headers)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

    Ok(Json(ApiSuccess::new(SessionPayload {
        user: SessionUser::from(&user),
    })))
}

/// Admin guard middleware
///
/// No session → 401, non-admin session → 403.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = session_user(&state, request.headers())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

    if !user.is_admin() {
        warn!(user_id = %user.id, path = %request.uri().path(), "Non-admin request to admin route");
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Build authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/sign-in", post(sign_in))
        .route("/api/auth/sign-out", post(sign_out))
        .route("/api/auth/session", get(get_session))
}
