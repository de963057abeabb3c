//! Account registry routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{AppState, routes::error_response};
use tally_core::ledger::{Account, AccountKind};
use tally_shared::types::{AccountId, Amount, UserId};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}/bootstrap", post(bootstrap_user))
        .route(
            "/users/{user_id}/accounts",
            get(list_accounts).post(create_account),
        )
        .route(
            "/users/{user_id}/accounts/{account_id}/deactivate",
            post(deactivate_account),
        )
        .route("/users/{user_id}/balances", get(account_balances))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Display name, e.g. "BofA Checking".
    pub name: String,
    /// Account kind.
    pub kind: AccountKind,
    /// Opening balance in minor units. Defaults to zero.
    #[serde(default)]
    pub starting_balance: Amount,
}

/// Response for a single account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Account kind.
    pub kind: AccountKind,
    /// Opening balance in minor units.
    pub starting_balance: Amount,
    /// Whether the account accepts new entries.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            kind: account.kind,
            starting_balance: account.starting_balance,
            is_active: account.is_active,
            created_at: account.created_at.to_rfc3339(),
        }
    }
}

/// Response for one account's derived balance.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Account ID.
    pub account_id: AccountId,
    /// Display name.
    pub name: String,
    /// Account kind.
    pub kind: AccountKind,
    /// Current balance in minor units. Negative is normal for liabilities.
    pub balance: Amount,
    /// Sum of debit entries folded in.
    pub debit_total: Amount,
    /// Sum of credit entries folded in.
    pub credit_total: Amount,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/users/{user_id}/bootstrap` - Provision the default account set.
async fn bootstrap_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> impl IntoResponse {
    let created = state.repo.bootstrap_user(user_id).await;
    let accounts: Vec<AccountResponse> = created.into_iter().map(Into::into).collect();
    (StatusCode::CREATED, Json(json!({ "accounts": accounts }))).into_response()
}

/// GET `/users/{user_id}/accounts` - List all accounts, active or not.
async fn list_accounts(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> impl IntoResponse {
    let accounts: Vec<AccountResponse> = state
        .repo
        .list_accounts(user_id)
        .await
        .into_iter()
        .map(Into::into)
        .collect();
    (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response()
}

/// POST `/users/{user_id}/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let account = state
        .repo
        .create_account(user_id, payload.name, payload.kind, payload.starting_balance)
        .await;
    (
        StatusCode::CREATED,
        Json(json!({ "account": AccountResponse::from(account) })),
    )
        .into_response()
}

/// POST `/users/{user_id}/accounts/{account_id}/deactivate` - Retire an
/// account. Its history stays in every balance.
async fn deactivate_account(
    State(state): State<AppState>,
    Path((user_id, account_id)): Path<(UserId, AccountId)>,
) -> impl IntoResponse {
    match state.repo.deactivate_account(user_id, account_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e.into()),
    }
}

/// GET `/users/{user_id}/balances` - Derived balance per account.
async fn account_balances(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> impl IntoResponse {
    let mut balances = state.repo.account_balances(user_id).await;
    let accounts = state.repo.list_accounts(user_id).await;
    let items: Vec<BalanceResponse> = accounts
        .into_iter()
        .filter_map(|a| balances.remove(&a.id).map(|b| (a, b)))
        .map(|(a, b)| BalanceResponse {
            account_id: a.id,
            name: a.name,
            kind: a.kind,
            balance: b.balance,
            debit_total: b.debit_total,
            credit_total: b.credit_total,
        })
        .collect();
    (StatusCode::OK, Json(json!({ "balances": items }))).into_response()
}
