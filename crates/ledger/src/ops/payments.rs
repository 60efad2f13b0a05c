//! Ledger mutation API.
//!
//! The only entry point allowed to change `payments` rows. Each mutation
//! writes the ledger row and recomputes the affected subject's summary in
//! one transaction.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ConnectionTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    LedgerError, Payment, PaymentKind, PaymentMethod, PaymentStatus, ResultLedger, SubjectKind,
    interns, payments, projects,
};

use super::{Ledger, normalize_optional_text, sync, with_tx};

/// Input for [`Ledger::record_payment`].
#[derive(Clone, Debug)]
pub struct RecordPaymentCmd {
    pub subject_kind: SubjectKind,
    pub subject_id: Option<Uuid>,
    pub amount_minor: i64,
    /// Defaults to today when absent.
    pub paid_on: Option<NaiveDate>,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub status: PaymentStatus,
    pub kind: PaymentKind,
}

/// Filters for [`Ledger::list_payments`].
#[derive(Clone, Debug, Default)]
pub struct PaymentListFilter {
    pub kind: Option<PaymentKind>,
    pub status: Option<PaymentStatus>,
    pub subject_kind: Option<SubjectKind>,
    pub limit: Option<u64>,
}

impl Ledger {
    /// Records a payment and updates the subject summary atomically.
    ///
    /// Validates the amount, the subject pair, and that the subject row
    /// exists before anything is written. Unlinked payments skip the
    /// summary step entirely.
    pub async fn record_payment(&self, cmd: RecordPaymentCmd) -> ResultLedger<Uuid> {
        let paid_on = cmd.paid_on.unwrap_or_else(|| Utc::now().date_naive());
        let reference = normalize_optional_text(cmd.reference.as_deref());
        let payment = Payment::new(
            cmd.subject_kind,
            cmd.subject_id,
            cmd.amount_minor,
            paid_on,
            cmd.method,
            reference,
            cmd.status,
            cmd.kind,
        )?;

        with_tx!(self, |db_tx| {
            if let Some((kind, subject_id)) = payment.subject() {
                ensure_subject_exists(&db_tx, kind, subject_id).await?;
            }

            payments::ActiveModel::from(&payment).insert(&db_tx).await?;

            if let Some((kind, subject_id)) = payment.subject() {
                sync::synchronize_in(&db_tx, kind, subject_id).await?;
            }
            Ok(payment.id)
        })
    }

    /// Deletes a payment (hard delete, no tombstone) and re-synchronizes the
    /// subject it was recorded against.
    ///
    /// If the subject row has since vanished the delete still commits and
    /// the summary step is skipped with a warning: the ledger stays
    /// authoritative and a later re-sync reconciles things.
    pub async fn delete_payment(&self, id: Uuid) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let model = payments::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::KeyNotFound("payment not exists".to_string()))?;
            // Capture the subject before the row disappears.
            let payment = Payment::try_from(model)?;

            payments::Entity::delete_by_id(id.to_string())
                .exec(&db_tx)
                .await?;

            if let Some((kind, subject_id)) = payment.subject() {
                match sync::synchronize_in(&db_tx, kind, subject_id).await {
                    Ok(_) => {}
                    Err(LedgerError::SyncFailure(msg)) => {
                        tracing::warn!("summary sync skipped after delete: {msg}");
                    }
                    Err(err) => return Err(err),
                }
            }
            Ok(())
        })
    }

    /// Returns a payment by id.
    pub async fn payment(&self, id: Uuid) -> ResultLedger<Payment> {
        let model = payments::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound("payment not exists".to_string()))?;
        Payment::try_from(model)
    }

    /// Lists payments, newest first.
    pub async fn list_payments(&self, filter: &PaymentListFilter) -> ResultLedger<Vec<Payment>> {
        let mut query = payments::Entity::find()
            .order_by_desc(payments::Column::PaidOn)
            .order_by_desc(payments::Column::CreatedAt);

        if let Some(kind) = filter.kind {
            query = query.filter(payments::Column::Kind.eq(kind.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(payments::Column::Status.eq(status.as_str()));
        }
        if let Some(subject_kind) = filter.subject_kind {
            query = query.filter(payments::Column::SubjectKind.eq(subject_kind.as_str()));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let models = query.all(&self.database).await?;
        let mut out = Vec::with_capacity(models.len());
        for model in models {
            out.push(Payment::try_from(model)?);
        }
        Ok(out)
    }
}

/// Explicit existence check: the source system allowed orphaned ledger rows,
/// here an unknown subject is a validation error before any write.
async fn ensure_subject_exists<C: ConnectionTrait>(
    conn: &C,
    kind: SubjectKind,
    id: Uuid,
) -> ResultLedger<()> {
    let found = match kind {
        SubjectKind::Intern => interns::Entity::find_by_id(id.to_string())
            .one(conn)
            .await?
            .is_some(),
        SubjectKind::Project => projects::Entity::find_by_id(id.to_string())
            .one(conn)
            .await?
            .is_some(),
        SubjectKind::Unlinked => true,
    };

    if !found {
        return Err(LedgerError::Validation(format!(
            "{} {id} not exists",
            kind.as_str()
        )));
    }
    Ok(())
}
