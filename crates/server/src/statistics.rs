//! Statistics API endpoints

use api_types::stats::{
    DomainBucket, DomainQuery, DomainResponse, MonthlyBucket, MonthlyQuery, MonthlyResponse,
    Overview, ResyncResponse,
};
use axum::{
    Json,
    extract::{Query, State},
};

use crate::{ServerError, server::ServerState};

const DEFAULT_MONTHS: u32 = 6;
const MAX_MONTHS: u32 = 36;
const DEFAULT_TOP_DOMAINS: usize = 5;

pub async fn overview(State(state): State<ServerState>) -> Result<Json<Overview>, ServerError> {
    let figures = state.ledger.total_revenue().await?;
    let outstanding_minor = state.ledger.outstanding_balance().await?;

    Ok(Json(Overview {
        total_revenue_minor: figures.revenue_minor,
        ledger_revenue_minor: figures.ledger_minor,
        repository_revenue_minor: figures.repository_minor,
        outstanding_minor,
    }))
}

pub async fn monthly(
    State(state): State<ServerState>,
    Query(payload): Query<MonthlyQuery>,
) -> Result<Json<MonthlyResponse>, ServerError> {
    let months = payload.months.unwrap_or(DEFAULT_MONTHS);
    if months == 0 || months > MAX_MONTHS {
        return Err(ServerError::Generic(format!(
            "months must be between 1 and {MAX_MONTHS}"
        )));
    }

    let months = state
        .ledger
        .monthly_revenue(months)
        .await?
        .into_iter()
        .map(|m| MonthlyBucket {
            year: m.year,
            month: m.month,
            total_minor: m.total_minor,
        })
        .collect();
    Ok(Json(MonthlyResponse { months }))
}

pub async fn domains(
    State(state): State<ServerState>,
    Query(payload): Query<DomainQuery>,
) -> Result<Json<DomainResponse>, ServerError> {
    let top = payload.top.unwrap_or(DEFAULT_TOP_DOMAINS);
    if top == 0 {
        return Err(ServerError::Generic("top must be at least 1".to_string()));
    }

    let domains = state
        .ledger
        .domain_distribution(top)
        .await?
        .into_iter()
        .map(|d| DomainBucket {
            domain: d.domain,
            count: d.count,
        })
        .collect();
    Ok(Json(DomainResponse { domains }))
}

pub async fn resync(State(state): State<ServerState>) -> Result<Json<ResyncResponse>, ServerError> {
    let report = state.ledger.resync_all().await?;
    Ok(Json(ResyncResponse {
        interns_synced: report.interns_synced,
        projects_synced: report.projects_synced,
        failures: report.failures,
    }))
}
