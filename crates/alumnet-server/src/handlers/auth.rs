//! Authentication request handlers: registration, email verification,
//! resend, login, and password reset.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use alumnet_core::error::AlumnetError;
use alumnet_core::models::registration::RegistrationForm;
use alumnet_core::models::role::Role;
use alumnet_core::models::session::Session;
use alumnet_core::models::verification::VerificationCode;

use crate::AppState;
use crate::envelope::{ApiResponse, ApiResult};
use crate::payload::SessionPayload;

/// `POST /auth/register` — validate a submission, store the draft, and
/// email a verification code. Throttled per target address.
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegistrationForm>,
) -> ApiResult<ApiResponse> {
    if let Some(email) = form.resolved_email() {
        state.throttle.check(email)?;
    }

    let out = state.auth.register(&form).await?;
    state.mailer.send_verification(&out.token);

    Ok(ApiResponse::message(
        "Verification code sent. Please check your email.",
    ))
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub code: String,
    pub email: String,
}

/// `POST /auth/verify-email-code` — the typed six-digit code path.
/// Success promotes the draft and auto-issues a session.
pub async fn verify_email_code(
    State(state): State<AppState>,
    Json(body): Json<VerifyCodeRequest>,
) -> ApiResult<ApiResponse> {
    let code = VerificationCode::Otp(body.code);
    let out = state.auth.verify_email(&body.email, &code).await?;
    Ok(session_response(out.session, "Email verified successfully"))
}

#[derive(Debug, Deserialize)]
pub struct VerifyLinkQuery {
    pub token: String,
    pub email: String,
}

/// `GET /auth/verify-email?token=&email=` — the emailed-link path.
///
/// The verification mail carries one one-time value, rendered both as
/// a typed code and embedded in this link's `token` parameter, so the
/// two endpoints consume the same stored token. Clicking the link and
/// typing the code are interchangeable.
pub async fn verify_email_link(
    State(state): State<AppState>,
    Query(query): Query<VerifyLinkQuery>,
) -> ApiResult<ApiResponse> {
    let code = VerificationCode::LinkToken(query.token);
    let out = state.auth.verify_email(&query.email, &code).await?;
    Ok(session_response(out.session, "Email verified successfully"))
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// `POST /auth/resend-verification` — reissue the code for a stored
/// draft; the previous code stops working.
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(body): Json<EmailRequest>,
) -> ApiResult<ApiResponse> {
    state.throttle.check(&body.email)?;

    let token = state.auth.resend_verification(&body.email).await?;
    state.mailer.send_verification(&token);

    Ok(ApiResponse::message("Verification code sent"))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Frontend role vocabulary: `student` / `alumni` / `institution`.
    pub role: String,
}

/// `POST /auth/login` — email + password + role tab. Pending alumni
/// authenticate; the session they get routes to the waiting page.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<ApiResponse> {
    state.throttle.check(&body.email)?;

    let role = Role::parse(&body.role).ok_or(AlumnetError::Validation {
        message: format!("unknown role: {}", body.role),
    })?;

    let out = state.auth.login(&body.email, &body.password, role).await?;
    Ok(session_response(out.session, "Login successful"))
}

/// `POST /auth/forgot-password` — responds identically whether or not
/// the address holds an account.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<EmailRequest>,
) -> ApiResult<ApiResponse> {
    state.throttle.check(&body.email)?;

    if let Some(token) = state.auth.forgot_password(&body.email).await? {
        state.mailer.send_password_reset(&token);
    }

    Ok(ApiResponse::message(
        "If that address has an account, a reset link is on its way.",
    ))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    pub password: String,
}

/// `POST /auth/reset-password` — consume the emailed link token and
/// replace the password.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> ApiResult<ApiResponse> {
    state
        .auth
        .reset_password(&body.email, &body.token, &body.password)
        .await?;
    Ok(ApiResponse::message("Password has been reset"))
}

fn session_response(session: Session, message: &str) -> ApiResponse {
    ApiResponse::message(message)
        .with_token(session.token.clone())
        .with_data(SessionPayload::of(&session))
}
