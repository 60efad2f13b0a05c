//! Interns API endpoints

use api_types::intern::{
    FeeStatus as ApiFeeStatus, InternCreated, InternListResponse, InternNew, InternUpdate,
    InternView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_fee_status(status: ledger::FeeStatus) -> ApiFeeStatus {
    match status {
        ledger::FeeStatus::Unpaid => ApiFeeStatus::Unpaid,
        ledger::FeeStatus::Partial => ApiFeeStatus::Partial,
        ledger::FeeStatus::Paid => ApiFeeStatus::Paid,
    }
}

fn view(intern: ledger::Intern) -> InternView {
    InternView {
        id: intern.id,
        outstanding_minor: intern.outstanding_minor(),
        full_name: intern.full_name,
        domain: intern.domain,
        total_fee_minor: intern.total_fee_minor,
        paid_fee_minor: intern.paid_fee_minor,
        fee_status: map_fee_status(intern.fee_status),
        created_at: intern.created_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InternNew>,
) -> Result<(StatusCode, Json<InternCreated>), ServerError> {
    let id = state
        .ledger
        .enroll_intern(&payload.full_name, &payload.domain, payload.total_fee_minor)
        .await?;

    Ok((StatusCode::CREATED, Json(InternCreated { id })))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<InternListResponse>, ServerError> {
    let interns = state
        .ledger
        .list_interns()
        .await?
        .into_iter()
        .map(view)
        .collect();
    Ok(Json(InternListResponse { interns }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InternUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .update_intern(
            id,
            ledger::InternPatch {
                full_name: payload.full_name,
                domain: payload.domain,
                total_fee_minor: payload.total_fee_minor,
            },
        )
        .await?;
    Ok(StatusCode::OK)
}
