//! Login and signup for admins and contributors.
//!
//! Each handler validates the body, performs one existence check and, for
//! signup, one insert. Auth responses keep their own top-level shape:
//! `{ success, token, user }`. Emails are kept as submitted; the store
//! matches them case-insensitively.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::models::{AdminSummary, ContributorUser, NewAdmin, NewDeveloper};
use crate::service::{
    hash_password, verify_password_or_dummy, FieldSpec, RequestValidator, Role,
};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{Map, Value};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

const LOGIN_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("email").required().email(),
    FieldSpec::string("password").required().untrimmed().min_length(1),
];

const ADMIN_SIGNUP_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("email").required().email(),
    FieldSpec::string("password").required().untrimmed().min_length(6),
    FieldSpec::string("name").min_length(1),
];

const CONTRIBUTOR_SIGNUP_FIELDS: &[FieldSpec] = &[
    FieldSpec::string_or_integer("githubId").required(),
    FieldSpec::string("username").required().min_length(3),
    FieldSpec::string("email").email(),
    FieldSpec::string("password").untrimmed().min_length(6),
];

#[derive(Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn parse(body: &Map<String, Value>) -> Result<Self, AppError> {
        let mut v = RequestValidator::validate(body, LOGIN_FIELDS)?;
        Ok(Self {
            email: v.take_required("email")?,
            password: v.take_required("password")?,
        })
    }
}

#[derive(Debug)]
pub struct AdminSignupRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

impl AdminSignupRequest {
    pub fn parse(body: &Map<String, Value>) -> Result<Self, AppError> {
        let mut v = RequestValidator::validate(body, ADMIN_SIGNUP_FIELDS)?;
        Ok(Self {
            email: v.take_required("email")?,
            password: v.take_required("password")?,
            name: v.take("name"),
        })
    }
}

#[derive(Debug)]
pub struct ContributorSignupRequest {
    pub github_id: String,
    pub username: String,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl ContributorSignupRequest {
    pub fn parse(body: &Map<String, Value>) -> Result<Self, AppError> {
        let mut v = RequestValidator::validate(body, CONTRIBUTOR_SIGNUP_FIELDS)?;
        Ok(Self {
            github_id: v.take_required("githubId")?,
            username: v.take_required("username")?,
            email: v.take("email"),
            password: v.take("password"),
        })
    }
}

#[derive(Serialize)]
struct AuthResponse<U> {
    success: bool,
    token: String,
    user: U,
}

/// POST /api/auth/admin/login
pub async fn admin_login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let req = LoginRequest::parse(&body)?;
    let admin = state.store.find_admin_by_email(&req.email).await?;
    let stored = admin.as_ref().map(|a| a.password_hash.clone());
    let matched = verify_password_or_dummy(req.password, stored).await?;
    let admin = match admin {
        Some(admin) if matched => admin,
        Some(admin) => {
            tracing::info!(admin_id = %admin.id, "admin login rejected");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
        None => return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into())),
    };
    let token = state.tokens.issue(admin.id, Role::Admin, Some(&admin.email))?;
    tracing::info!(admin_id = %admin.id, "admin logged in");
    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            success: true,
            token,
            user: AdminSummary::from(&admin),
        }),
    ))
}

/// POST /api/auth/admin/signin (account creation)
pub async fn admin_signin(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let req = AdminSignupRequest::parse(&body)?;
    if state.store.find_admin_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("An admin with this email already exists".into()));
    }
    let admin = state
        .store
        .create_admin(NewAdmin {
            email: req.email,
            password_hash: hash_password(req.password).await?,
            name: req.name,
        })
        .await?;
    let token = state.tokens.issue(admin.id, Role::Admin, Some(&admin.email))?;
    tracing::info!(admin_id = %admin.id, "admin account created");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            token,
            user: AdminSummary::from(&admin),
        }),
    ))
}

/// POST /api/auth/contributer/login
///
/// Credentials are checked, but contributor sessions are not offered yet:
/// a correct email/password pair answers 501 without a token or user data.
pub async fn contributor_login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<StatusCode, AppError> {
    let req = LoginRequest::parse(&body)?;
    let developer = state.store.find_developer_by_email(&req.email).await?;
    let stored = developer.as_ref().and_then(|d| d.password_hash.clone());
    let matched = verify_password_or_dummy(req.password, stored).await?;
    let developer = match developer {
        Some(developer) if matched => developer,
        _ => return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into())),
    };
    tracing::info!(developer_id = %developer.id, "contributor login attempted on unimplemented path");
    Err(AppError::NotImplemented(
        "Contributor login is not implemented yet".into(),
    ))
}

/// POST /api/auth/contributer/signin (account creation)
pub async fn contributor_signin(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let req = ContributorSignupRequest::parse(&body)?;
    if state
        .store
        .find_developer_by_github_id(&req.github_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("This GitHub account is already registered".into()));
    }
    if state
        .store
        .find_developer_by_username(&req.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username is already taken".into()));
    }
    if let Some(email) = req.email.as_deref() {
        if state.store.find_developer_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".into()));
        }
    }
    let password_hash = match req.password {
        Some(password) => Some(hash_password(password).await?),
        None => None,
    };
    let developer = state
        .store
        .create_developer(NewDeveloper {
            github_id: req.github_id,
            username: req.username,
            email: req.email,
            password_hash,
        })
        .await?;
    let token = state
        .tokens
        .issue(developer.id, Role::Contributor, developer.email.as_deref())?;
    tracing::info!(developer_id = %developer.id, "contributor account created");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            token,
            user: ContributorUser::from(&developer),
        }),
    ))
}
