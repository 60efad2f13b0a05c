//! Projects API endpoints

use api_types::project::{
    ProjectCreated, ProjectListResponse, ProjectNew, ProjectUpdate, ProjectView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn view(project: ledger::Project) -> ProjectView {
    ProjectView {
        id: project.id,
        outstanding_minor: project.outstanding_minor(),
        title: project.title,
        client: project.client,
        value_minor: project.value_minor,
        paid_amount_minor: project.paid_amount_minor,
        created_at: project.created_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProjectNew>,
) -> Result<(StatusCode, Json<ProjectCreated>), ServerError> {
    let id = state
        .ledger
        .create_project(&payload.title, &payload.client, payload.value_minor)
        .await?;

    Ok((StatusCode::CREATED, Json(ProjectCreated { id })))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<ProjectListResponse>, ServerError> {
    let projects = state
        .ledger
        .list_projects()
        .await?
        .into_iter()
        .map(view)
        .collect();
    Ok(Json(ProjectListResponse { projects }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProjectUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .update_project(
            id,
            ledger::ProjectPatch {
                title: payload.title,
                client: payload.client,
                value_minor: payload.value_minor,
            },
        )
        .await?;
    Ok(StatusCode::OK)
}
