//! Movement and transaction routes.
//!
//! The request boundary accepts movements with loose account references (an
//! explicit id, a free-text name, or nothing) and resolves them against the
//! user's registry before the entry builder runs. Handlers never write
//! entries themselves; the builder is the only producer of entry sets.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{AppState, routes::error_response};
use tally_core::ledger::{
    AccountKind, AccountRegistry, AliasTable, Direction, Entry, EntrySide, LedgerError, Movement,
    MovementKind, PaymentHint, build_entries, resolve,
};
use tally_shared::types::{
    AccountId, Amount, CategoryId, EntryId, IdempotencyKey, TransactionId, UserId,
};
use tally_store::{
    CreateTransactionInput, StoreError, TransactionFilter, TransactionRecord,
    UpdateTransactionInput,
};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{user_id}/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/users/{user_id}/transactions/{transaction_id}",
            get(get_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
        .route(
            "/users/{user_id}/transactions/{transaction_id}/restore",
            post(restore_transaction),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Movement kind with loose account references, resolved server-side.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MovementRequest {
    /// Money spent from a payment account.
    Expense {
        /// Explicit payment account id.
        payment_id: Option<AccountId>,
        /// Free-text payment account hint, e.g. "bofa cc".
        payment_name: Option<String>,
        /// Portion owed back by a friend, in minor units.
        shared_amount: Option<Amount>,
    },
    /// Money received into an account.
    Income {
        /// Explicit destination account id.
        into_id: Option<AccountId>,
        /// Free-text destination hint.
        into_name: Option<String>,
    },
    /// Money moved between two owned accounts.
    Transfer {
        /// Source account.
        from: AccountId,
        /// Destination account.
        to: AccountId,
    },
    /// A friend paying back what they owe.
    FriendSettlement {
        /// Explicit destination account id.
        into_id: Option<AccountId>,
        /// Free-text destination hint.
        into_name: Option<String>,
    },
    /// A merchant refund reversing an earlier expense.
    RefundReversal {
        /// Explicit destination account id.
        into_id: Option<AccountId>,
        /// Free-text destination hint.
        into_name: Option<String>,
    },
}

/// Request body for recording a movement.
#[derive(Debug, Deserialize)]
pub struct CreateMovementRequest {
    /// Movement kind and account references.
    #[serde(flatten)]
    pub movement: MovementRequest,
    /// Total amount in minor units; strictly positive.
    pub amount: Amount,
    /// Movement date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Optional category.
    pub category: Option<CategoryId>,
    /// Optional necessity flag.
    pub is_necessary: Option<bool>,
    /// Optional client-supplied idempotency key.
    pub idempotency_key: Option<IdempotencyKey>,
}

/// Query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    /// Inclusive date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Inclusive date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Filter by category.
    pub category: Option<CategoryId>,
    /// Filter by derived direction.
    pub direction: Option<Direction>,
    /// Include soft-deleted transactions.
    #[serde(default)]
    pub include_deleted: bool,
}

/// Request body for editing a transaction header.
///
/// Omitting a field leaves it unchanged; sending `"category": null` clears
/// the category.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// New description.
    pub description: Option<String>,
    /// New category; `null` clears, absent leaves as-is.
    #[serde(default, deserialize_with = "explicit_null")]
    pub category: Option<Option<CategoryId>>,
    /// New necessity flag.
    pub is_necessary: Option<bool>,
}

/// Distinguishes an absent field (outer `None`) from an explicit JSON
/// `null` (inner `None`).
fn explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Response for a ledger entry.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Entry ID.
    pub id: EntryId,
    /// Account the entry posts to.
    pub account_id: AccountId,
    /// Debit or credit.
    pub side: EntrySide,
    /// Amount in minor units; always positive.
    pub amount: Amount,
}

/// Response for a transaction with entries and derived direction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: TransactionId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Total amount in minor units.
    pub amount: Amount,
    /// Derived direction; computed per read, never stored.
    pub direction: Direction,
    /// Category, if any.
    pub category: Option<CategoryId>,
    /// Necessity flag, if set.
    pub is_necessary: Option<bool>,
    /// Whether the transaction is soft-deleted.
    pub is_deleted: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Ledger entries.
    pub entries: Vec<EntryResponse>,
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(record: TransactionRecord) -> Self {
        let entries = record.entries.iter().map(entry_response).collect();
        let is_deleted = record.transaction.is_deleted();
        let created_at = record.transaction.created_at.to_rfc3339();
        Self {
            id: record.transaction.id,
            date: record.transaction.date,
            description: record.transaction.description,
            amount: record.transaction.amount,
            direction: record.direction,
            category: record.transaction.category,
            is_necessary: record.transaction.is_necessary,
            is_deleted,
            created_at,
            entries,
        }
    }
}

fn entry_response(entry: &Entry) -> EntryResponse {
    EntryResponse {
        id: entry.id,
        account_id: entry.account_id,
        side: entry.side,
        amount: entry.amount,
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/users/{user_id}/transactions` - Record a movement.
///
/// Returns 201 for a fresh commit, 200 when an idempotency key matched a
/// prior transaction.
async fn create_transaction(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(payload): Json<CreateMovementRequest>,
) -> impl IntoResponse {
    let ceiling = state.config.ledger.max_amount_minor;
    if payload.amount.minor() > ceiling {
        return ledger_error(LedgerError::AmountAboveCeiling {
            amount: payload.amount.minor(),
            ceiling,
        });
    }

    let registry = state.repo.registry(user_id).await;
    let kind = match resolve_movement(&payload.movement, &registry, &state.aliases) {
        Ok(kind) => kind,
        Err(e) => return ledger_error(e),
    };

    let movement = Movement {
        user_id,
        kind,
        amount: payload.amount,
        date: payload.date,
        description: payload.description,
        category: payload.category,
        is_necessary: payload.is_necessary,
    };
    let entries = match build_entries(&movement, &registry) {
        Ok(entries) => entries,
        Err(e) => return ledger_error(e),
    };

    let outcome = match state
        .repo
        .create_transaction(CreateTransactionInput {
            user_id,
            date: movement.date,
            description: movement.description,
            amount: movement.amount,
            category: movement.category,
            is_necessary: movement.is_necessary,
            idempotency_key: payload.idempotency_key,
            entries,
        })
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => return error_response(&e.into()),
    };

    match state
        .repo
        .get_transaction(user_id, outcome.transaction_id)
        .await
    {
        Ok(record) => {
            let status = if outcome.was_already_created {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            (
                status,
                Json(json!({
                    "transaction": TransactionResponse::from(record),
                    "was_already_created": outcome.was_already_created,
                })),
            )
                .into_response()
        }
        Err(e) => error_response(&e.into()),
    }
}

/// GET `/users/{user_id}/transactions` - List transactions, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let filter = TransactionFilter {
        date_from: query.from,
        date_to: query.to,
        category: query.category,
        direction: query.direction,
        include_deleted: query.include_deleted,
    };
    match state.repo.list_transactions(user_id, &filter).await {
        Ok(records) => {
            let items: Vec<TransactionResponse> =
                records.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(json!({ "transactions": items }))).into_response()
        }
        Err(e) => error_response(&e.into()),
    }
}

/// GET `/users/{user_id}/transactions/{transaction_id}` - Fetch one.
async fn get_transaction(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(UserId, TransactionId)>,
) -> impl IntoResponse {
    match state.repo.get_transaction(user_id, transaction_id).await {
        Ok(record) => (
            StatusCode::OK,
            Json(json!({ "transaction": TransactionResponse::from(record) })),
        )
            .into_response(),
        Err(e) => error_response(&e.into()),
    }
}

/// PATCH `/users/{user_id}/transactions/{transaction_id}` - Edit header
/// fields. Entries are immutable after commit.
async fn update_transaction(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(UserId, TransactionId)>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    let update = UpdateTransactionInput {
        description: payload.description,
        category: payload.category,
        is_necessary: payload.is_necessary,
    };
    if let Err(e) = state
        .repo
        .update_transaction(user_id, transaction_id, update)
        .await
    {
        return error_response(&e.into());
    }
    match state.repo.get_transaction(user_id, transaction_id).await {
        Ok(record) => (
            StatusCode::OK,
            Json(json!({ "transaction": TransactionResponse::from(record) })),
        )
            .into_response(),
        Err(e) => error_response(&e.into()),
    }
}

/// DELETE `/users/{user_id}/transactions/{transaction_id}` - Soft delete.
async fn delete_transaction(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(UserId, TransactionId)>,
) -> impl IntoResponse {
    match state.repo.delete_transaction(user_id, transaction_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e.into()),
    }
}

/// POST `/users/{user_id}/transactions/{transaction_id}/restore` - Undo a
/// soft delete.
async fn restore_transaction(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(UserId, TransactionId)>,
) -> impl IntoResponse {
    if let Err(e) = state
        .repo
        .restore_transaction(user_id, transaction_id)
        .await
    {
        return error_response(&e.into());
    }
    match state.repo.get_transaction(user_id, transaction_id).await {
        Ok(record) => (
            StatusCode::OK,
            Json(json!({ "transaction": TransactionResponse::from(record) })),
        )
            .into_response(),
        Err(e) => error_response(&e.into()),
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Turns loose account references into concrete ids.
///
/// Expense payments and income-like destinations resolve through the payment
/// resolver, falling back to the first active checking account. Transfers
/// require both ids explicitly.
fn resolve_movement(
    request: &MovementRequest,
    registry: &AccountRegistry,
    aliases: &AliasTable,
) -> Result<MovementKind, LedgerError> {
    match request {
        MovementRequest::Expense {
            payment_id,
            payment_name,
            shared_amount,
        } => Ok(MovementKind::Expense {
            payment: resolve_or_default(*payment_id, payment_name.clone(), registry, aliases)?,
            shared_amount: *shared_amount,
        }),
        MovementRequest::Income { into_id, into_name } => Ok(MovementKind::Income {
            into: resolve_or_default(*into_id, into_name.clone(), registry, aliases)?,
        }),
        MovementRequest::Transfer { from, to } => Ok(MovementKind::Transfer {
            from: *from,
            to: *to,
        }),
        MovementRequest::FriendSettlement { into_id, into_name } => {
            Ok(MovementKind::FriendSettlement {
                into: resolve_or_default(*into_id, into_name.clone(), registry, aliases)?,
            })
        }
        MovementRequest::RefundReversal { into_id, into_name } => {
            Ok(MovementKind::RefundReversal {
                into: resolve_or_default(*into_id, into_name.clone(), registry, aliases)?,
            })
        }
    }
}

fn resolve_or_default(
    id: Option<AccountId>,
    name: Option<String>,
    registry: &AccountRegistry,
    aliases: &AliasTable,
) -> Result<AccountId, LedgerError> {
    let hint = PaymentHint::from_parts(id, name);
    resolve(&hint, registry, aliases)
        .or_else(|| registry.default_payment())
        .map(|a| a.id)
        .ok_or(LedgerError::MissingAccount(AccountKind::Checking))
}

fn ledger_error(e: LedgerError) -> Response {
    error_response(&StoreError::from(e).into())
}
