//! Payments ledger endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::api::payments::{
    payment_stats, PaymentCreate, PaymentListQuery, PaymentPatch, PaymentResponse, PaymentStats,
    EMPTY_LEDGER_RECEIPT,
};
use crate::api::{fail_soft, Page};
use crate::http::error::AppError;
use crate::http::state::AppState;

use super::HandlerResult;

/// `GET /payments` — filtered, paginated listing, newest payment first.
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentListQuery>,
) -> HandlerResult<Vec<PaymentResponse>> {
    let payments = state
        .store
        .list_payments(&query.filter(), query.page())
        .await?;
    Ok(Json(payments.iter().map(PaymentResponse::from).collect()))
}

/// `GET /payments/count`
pub async fn count_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentListQuery>,
) -> HandlerResult<u64> {
    let total = state.store.count_payments(&query.filter()).await?;
    Ok(Json(total))
}

/// `GET /payments/{id}`
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<PaymentResponse> {
    let payment = state
        .store
        .get_payment(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment {id} not found")))?;
    Ok(Json(PaymentResponse::from(&payment)))
}

/// `POST /payments` — 201; the receipt number is drawn from the store's
/// sequence, and a sequence failure fails the request.
pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<PaymentCreate>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    let payment = state.store.insert_payment(payload).await?;
    Ok((StatusCode::CREATED, Json(PaymentResponse::from(&payment))))
}

/// `PATCH /payments/{id}` — partial update with strip-null semantics; the
/// receipt number is immutable.
pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<PaymentPatch>,
) -> HandlerResult<PaymentResponse> {
    let payment = state
        .store
        .update_payment(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment {id} not found")))?;
    Ok(Json(PaymentResponse::from(&payment)))
}

/// `DELETE /payments/{id}` — 204 or 404.
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_payment(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Payment {id} not found")))
    }
}

/// `GET /payments/receipts/latest` — the highest issued receipt number as a
/// bare JSON string, `"0000000"` on an empty ledger.
pub async fn latest_receipt(State(state): State<AppState>) -> HandlerResult<String> {
    let latest = state.store.latest_receipt_number().await?;
    Ok(Json(
        latest.unwrap_or_else(|| EMPTY_LEDGER_RECEIPT.to_string()),
    ))
}

/// `GET /payments/stats/overview`
pub async fn payment_stats_overview(
    State(state): State<AppState>,
) -> HandlerResult<PaymentStats> {
    let fetched = state
        .store
        .list_payments(&Default::default(), Page::stats_sample())
        .await;
    let outcome = fail_soft(fetched, |payments| {
        payment_stats(&payments, Utc::now().date_naive())
    });
    Ok(Json(outcome.into_inner()))
}
