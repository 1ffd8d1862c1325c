//! Equipment inventory endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::api::equipment::{
    equipment_stats, EquipmentCreate, EquipmentListQuery, EquipmentPatch, EquipmentResponse,
    EquipmentStats,
};
use crate::api::{fail_soft, Page};
use crate::http::error::AppError;
use crate::http::state::AppState;

use super::HandlerResult;

/// `GET /equipment` — filtered, paginated listing ordered by name.
pub async fn list_equipment(
    State(state): State<AppState>,
    Query(query): Query<EquipmentListQuery>,
) -> HandlerResult<Vec<EquipmentResponse>> {
    let items = state
        .store
        .list_equipment(&query.filter(), query.page())
        .await?;
    Ok(Json(items.iter().map(EquipmentResponse::from).collect()))
}

/// `GET /equipment/count`
pub async fn count_equipment(
    State(state): State<AppState>,
    Query(query): Query<EquipmentListQuery>,
) -> HandlerResult<u64> {
    let total = state.store.count_equipment(&query.filter()).await?;
    Ok(Json(total))
}

/// `GET /equipment/{id}`
pub async fn get_equipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<EquipmentResponse> {
    let item = state
        .store
        .get_equipment(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {id} not found")))?;
    Ok(Json(EquipmentResponse::from(&item)))
}

/// `POST /equipment` — 201 with the stored representation.
pub async fn create_equipment(
    State(state): State<AppState>,
    Json(payload): Json<EquipmentCreate>,
) -> Result<(StatusCode, Json<EquipmentResponse>), AppError> {
    let item = state.store.insert_equipment(payload).await?;
    Ok((StatusCode::CREATED, Json(EquipmentResponse::from(&item))))
}

/// `PATCH /equipment/{id}` — partial update; explicit nulls clear fields.
pub async fn update_equipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<EquipmentPatch>,
) -> HandlerResult<EquipmentResponse> {
    let item = state
        .store
        .update_equipment(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {id} not found")))?;
    Ok(Json(EquipmentResponse::from(&item)))
}

/// `DELETE /equipment/{id}` — 204 or 404.
pub async fn delete_equipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_equipment(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Equipment {id} not found")))
    }
}

/// `GET /equipment/stats/overview`
pub async fn equipment_stats_overview(
    State(state): State<AppState>,
) -> HandlerResult<EquipmentStats> {
    let fetched = state
        .store
        .list_equipment(&Default::default(), Page::stats_sample())
        .await;
    let outcome = fail_soft(fetched, |items| {
        equipment_stats(&items, Utc::now().date_naive())
    });
    Ok(Json(outcome.into_inner()))
}
