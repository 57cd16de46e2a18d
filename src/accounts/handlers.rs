use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::accounts::dto::{
    AccountResponse, DeleteResponse, LoginRequest, LoginResponse, RegisterRequest,
    UpdateAccountRequest,
};
use crate::accounts::repo_types::Account;
use crate::accounts::services;
use crate::error::ApiError;
use crate::state::AppState;

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(list_accounts))
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route(
            "/user/:id",
            get(get_account)
                .put(update_account)
                .patch(update_account)
                .delete(delete_account),
        )
}

#[instrument(skip(state))]
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let accounts = Account::list(&state.db).await?;
    Ok(Json(
        accounts.into_iter().map(AccountResponse::from).collect(),
    ))
}

#[instrument(skip(state))]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let id = services::parse_account_id(&id)?;
    let account = Account::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(account.into()))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let new_account = services::validate_registration(payload)?;

    // Fast path for the common duplicate; the unique index still backs this
    // up when two registrations race.
    if Account::find_by_email(&state.db, &new_account.email)
        .await?
        .is_some()
    {
        warn!(email = %new_account.email, "email already registered");
        return Err(ApiError::EmailAlreadyRegistered);
    }

    // Hashing happens here and nowhere else.
    let password_hash = services::hash_password(&new_account.password)?;
    let account = Account::create(&state.db, &new_account, &password_hash).await?;

    info!(account_id = %account.id, email = %account.email, "account registered");
    Ok((StatusCode::CREATED, Json(account.into())))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = services::normalize_email(payload.email.as_deref().unwrap_or(""));
    let password = payload.password.unwrap_or_default();

    // Unknown email and wrong password must be indistinguishable.
    let account = Account::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !services::verify_password(&password, &account.password_hash)? {
        warn!(account_id = %account.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    info!(account_id = %account.id, email = %account.email, "login successful");
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: account.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let id = services::parse_account_id(&id)?;
    let patch = services::validate_update(payload)?;

    let account = Account::update(&state.db, id, &patch)
        .await?
        .ok_or(ApiError::NotFound)?;

    info!(account_id = %account.id, "account updated");
    Ok(Json(account.into()))
}

#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = services::parse_account_id(&id)?;
    if !Account::delete(&state.db, id).await? {
        return Err(ApiError::NotFound);
    }

    info!(account_id = %id, "account deleted");
    Ok(Json(DeleteResponse {
        message: "User deleted successfully".to_string(),
    }))
}
