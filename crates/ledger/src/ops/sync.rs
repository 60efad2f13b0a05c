//! Balance synchronizer.
//!
//! Derived columns are a pure function of current ledger contents: every
//! sync reloads the full set of completed payments for one subject and
//! rewrites the summary from scratch. Deletes, corrections and out-of-order
//! writes self-heal because no prior summary state is ever consulted.

use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, Statement, TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    FeeStatus, LedgerError, PaymentStatus, ResultLedger, SubjectKind, interns, payments, projects,
};

use super::{Ledger, with_tx};

/// Outcome of a full re-sync sweep.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResyncReport {
    pub interns_synced: u64,
    pub projects_synced: u64,
    pub failures: u64,
}

/// Sum of completed payment amounts for one subject.
pub(crate) async fn completed_total<C: ConnectionTrait>(
    conn: &C,
    kind: SubjectKind,
    id: Uuid,
) -> ResultLedger<i64> {
    let backend = conn.get_database_backend();
    let stmt = Statement::from_sql_and_values(
        backend,
        "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
         FROM payments \
         WHERE subject_kind = ? AND subject_id = ? AND status = ?",
        vec![
            kind.as_str().into(),
            id.to_string().into(),
            PaymentStatus::Completed.as_str().into(),
        ],
    );
    let row = conn.query_one(stmt).await?;
    Ok(row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0))
}

/// Recomputes one subject's derived columns from the ledger.
///
/// Returns the new total. A missing subject row surfaces as [`LedgerError::SyncFailure`];
/// the caller decides whether that aborts the surrounding transaction.
pub(crate) async fn synchronize_in<C: ConnectionTrait>(
    conn: &C,
    kind: SubjectKind,
    id: Uuid,
) -> ResultLedger<i64> {
    let total = completed_total(conn, kind, id).await?;

    match kind {
        SubjectKind::Intern => {
            let model = interns::Entity::find_by_id(id.to_string())
                .one(conn)
                .await?
                .ok_or_else(|| {
                    LedgerError::SyncFailure(format!("intern {id} missing during sync"))
                })?;
            let status = FeeStatus::derive(total, model.total_fee_minor);
            let active = interns::ActiveModel {
                id: ActiveValue::Set(model.id),
                paid_fee_minor: ActiveValue::Set(total),
                fee_status: ActiveValue::Set(status.as_str().to_string()),
                ..Default::default()
            };
            active.update(conn).await?;
        }
        SubjectKind::Project => {
            let model = projects::Entity::find_by_id(id.to_string())
                .one(conn)
                .await?
                .ok_or_else(|| {
                    LedgerError::SyncFailure(format!("project {id} missing during sync"))
                })?;
            let active = projects::ActiveModel {
                id: ActiveValue::Set(model.id),
                paid_amount_minor: ActiveValue::Set(total),
                ..Default::default()
            };
            active.update(conn).await?;
        }
        // Unlinked rows have no summary to maintain.
        SubjectKind::Unlinked => {}
    }

    Ok(total)
}

impl Ledger {
    /// Recomputes the derived columns of a single subject from the ledger.
    ///
    /// Idempotent: running it twice with no intervening ledger change leaves
    /// the summary untouched the second time.
    pub async fn synchronize(&self, kind: SubjectKind, id: Uuid) -> ResultLedger<i64> {
        with_tx!(self, |db_tx| {
            synchronize_in(&db_tx, kind, id).await
        })
    }

    /// Re-synchronizes every intern and project.
    ///
    /// Per-entity failures are logged and counted instead of aborting the
    /// sweep: this is the recovery path for legacy rows seeded outside the
    /// synchronizer or for summaries left stale by a crash.
    pub async fn resync_all(&self) -> ResultLedger<ResyncReport> {
        let mut report = ResyncReport::default();

        let intern_ids: Vec<String> = interns::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();
        for raw_id in intern_ids {
            let Ok(id) = Uuid::parse_str(&raw_id) else {
                tracing::warn!("skipping intern with malformed id {raw_id}");
                report.failures += 1;
                continue;
            };
            match self.synchronize(SubjectKind::Intern, id).await {
                Ok(_) => report.interns_synced += 1,
                Err(err) => {
                    tracing::warn!("resync failed for intern {id}: {err}");
                    report.failures += 1;
                }
            }
        }

        let project_ids: Vec<String> = projects::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();
        for raw_id in project_ids {
            let Ok(id) = Uuid::parse_str(&raw_id) else {
                tracing::warn!("skipping project with malformed id {raw_id}");
                report.failures += 1;
                continue;
            };
            match self.synchronize(SubjectKind::Project, id).await {
                Ok(_) => report.projects_synced += 1,
                Err(err) => {
                    tracing::warn!("resync failed for project {id}: {err}");
                    report.failures += 1;
                }
            }
        }

        Ok(report)
    }

    /// Lists payments recorded against a subject (audit display).
    pub async fn payments_for_subject(
        &self,
        kind: SubjectKind,
        id: Uuid,
    ) -> ResultLedger<Vec<crate::Payment>> {
        let models = payments::Entity::find()
            .filter(payments::Column::SubjectKind.eq(kind.as_str()))
            .filter(payments::Column::SubjectId.eq(id.to_string()))
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            out.push(crate::Payment::try_from(model)?);
        }
        Ok(out)
    }
}
