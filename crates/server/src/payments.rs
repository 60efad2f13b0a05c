//! Payments API endpoints

use std::collections::HashMap;

use api_types::payment::{
    PaymentCreated, PaymentKind as ApiKind, PaymentList, PaymentListResponse,
    PaymentMethod as ApiMethod, PaymentNew, PaymentStatus as ApiStatus, PaymentView,
    SubjectKind as ApiSubject,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_subject_kind(kind: ApiSubject) -> ledger::SubjectKind {
    match kind {
        ApiSubject::Intern => ledger::SubjectKind::Intern,
        ApiSubject::Project => ledger::SubjectKind::Project,
        ApiSubject::Unlinked => ledger::SubjectKind::Unlinked,
    }
}

fn map_subject_kind_back(kind: ledger::SubjectKind) -> ApiSubject {
    match kind {
        ledger::SubjectKind::Intern => ApiSubject::Intern,
        ledger::SubjectKind::Project => ApiSubject::Project,
        ledger::SubjectKind::Unlinked => ApiSubject::Unlinked,
    }
}

fn map_method(method: ApiMethod) -> ledger::PaymentMethod {
    match method {
        ApiMethod::Upi => ledger::PaymentMethod::Upi,
        ApiMethod::BankTransfer => ledger::PaymentMethod::BankTransfer,
        ApiMethod::Cash => ledger::PaymentMethod::Cash,
        ApiMethod::Card => ledger::PaymentMethod::Card,
        ApiMethod::NeftRtgs => ledger::PaymentMethod::NeftRtgs,
        ApiMethod::Check => ledger::PaymentMethod::Check,
    }
}

fn map_method_back(method: ledger::PaymentMethod) -> ApiMethod {
    match method {
        ledger::PaymentMethod::Upi => ApiMethod::Upi,
        ledger::PaymentMethod::BankTransfer => ApiMethod::BankTransfer,
        ledger::PaymentMethod::Cash => ApiMethod::Cash,
        ledger::PaymentMethod::Card => ApiMethod::Card,
        ledger::PaymentMethod::NeftRtgs => ApiMethod::NeftRtgs,
        ledger::PaymentMethod::Check => ApiMethod::Check,
    }
}

fn map_status(status: ApiStatus) -> ledger::PaymentStatus {
    match status {
        ApiStatus::Completed => ledger::PaymentStatus::Completed,
        ApiStatus::Pending => ledger::PaymentStatus::Pending,
        ApiStatus::Failed => ledger::PaymentStatus::Failed,
    }
}

fn map_status_back(status: ledger::PaymentStatus) -> ApiStatus {
    match status {
        ledger::PaymentStatus::Completed => ApiStatus::Completed,
        ledger::PaymentStatus::Pending => ApiStatus::Pending,
        ledger::PaymentStatus::Failed => ApiStatus::Failed,
    }
}

fn map_kind(kind: ApiKind) -> ledger::PaymentKind {
    match kind {
        ApiKind::InternshipFee => ledger::PaymentKind::InternshipFee,
        ApiKind::ProjectMilestone => ledger::PaymentKind::ProjectMilestone,
    }
}

fn map_kind_back(kind: ledger::PaymentKind) -> ApiKind {
    match kind {
        ledger::PaymentKind::InternshipFee => ApiKind::InternshipFee,
        ledger::PaymentKind::ProjectMilestone => ApiKind::ProjectMilestone,
    }
}

pub async fn record(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentNew>,
) -> Result<(StatusCode, Json<PaymentCreated>), ServerError> {
    let id = state
        .ledger
        .record_payment(ledger::RecordPaymentCmd {
            subject_kind: map_subject_kind(payload.subject_kind),
            subject_id: payload.subject_id,
            amount_minor: payload.amount_minor,
            paid_on: payload.paid_on,
            method: map_method(payload.method),
            reference: payload.reference,
            status: map_status(payload.status),
            kind: map_kind(payload.kind),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PaymentCreated { id })))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(payload): Query<PaymentList>,
) -> Result<Json<PaymentListResponse>, ServerError> {
    let filter = ledger::PaymentListFilter {
        kind: payload.kind.map(map_kind),
        status: payload.status.map(map_status),
        subject_kind: payload.subject_kind.map(map_subject_kind),
        limit: payload.limit,
    };
    let payments = state.ledger.list_payments(&filter).await?;

    // Resolve subject display names in one pass per entity table.
    let intern_names: HashMap<Uuid, String> = state
        .ledger
        .list_interns()
        .await?
        .into_iter()
        .map(|i| (i.id, i.full_name))
        .collect();
    let project_names: HashMap<Uuid, String> = state
        .ledger
        .list_projects()
        .await?
        .into_iter()
        .map(|p| (p.id, p.title))
        .collect();

    let payments = payments
        .into_iter()
        .map(|p| {
            let subject_name = p.subject_id.and_then(|id| match p.subject_kind {
                ledger::SubjectKind::Intern => intern_names.get(&id).cloned(),
                ledger::SubjectKind::Project => project_names.get(&id).cloned(),
                ledger::SubjectKind::Unlinked => None,
            });
            PaymentView {
                id: p.id,
                subject_kind: map_subject_kind_back(p.subject_kind),
                subject_id: p.subject_id,
                subject_name,
                amount_minor: p.amount_minor,
                paid_on: p.paid_on,
                method: map_method_back(p.method),
                reference: p.reference,
                status: map_status_back(p.status),
                kind: map_kind_back(p.kind),
                created_at: p.created_at,
            }
        })
        .collect();

    Ok(Json(PaymentListResponse { payments }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.ledger.delete_payment(id).await?;
    Ok(StatusCode::OK)
}
