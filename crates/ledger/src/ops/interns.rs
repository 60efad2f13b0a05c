//! Intern repository operations.
//!
//! Owned fields (`full_name`, `domain`, `total_fee_minor`) belong to the
//! enrollment flow; the derived pair is owned by the synchronizer. Changing
//! the target fee re-derives `fee_status` in the same transaction so the
//! summary never lags the new target.

use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Intern, LedgerError, ResultLedger, SubjectKind, interns};

use super::{Ledger, normalize_required_name, sync, with_tx};

/// Owned-field updates for an intern. Derived fields are never patchable.
#[derive(Clone, Debug, Default)]
pub struct InternPatch {
    pub full_name: Option<String>,
    pub domain: Option<String>,
    pub total_fee_minor: Option<i64>,
}

impl Ledger {
    /// Enrolls a new intern. Derived fields start at zero/unpaid.
    pub async fn enroll_intern(
        &self,
        full_name: &str,
        domain: &str,
        total_fee_minor: i64,
    ) -> ResultLedger<Uuid> {
        let full_name = normalize_required_name(full_name, "intern name")?;
        let domain = normalize_required_name(domain, "domain")?;
        if total_fee_minor < 0 {
            return Err(LedgerError::InvalidAmount(
                "total_fee_minor must be >= 0".to_string(),
            ));
        }

        let intern = Intern::new(full_name, domain, total_fee_minor);
        let id = intern.id;
        interns::ActiveModel::from(&intern)
            .insert(&self.database)
            .await?;
        Ok(id)
    }

    /// Returns an intern by id.
    pub async fn intern(&self, id: Uuid) -> ResultLedger<Intern> {
        let model = interns::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound("intern not exists".to_string()))?;
        Intern::try_from(model)
    }

    /// Lists all interns.
    pub async fn list_interns(&self) -> ResultLedger<Vec<Intern>> {
        let models = interns::Entity::find().all(&self.database).await?;
        let mut out = Vec::with_capacity(models.len());
        for model in models {
            out.push(Intern::try_from(model)?);
        }
        Ok(out)
    }

    /// Updates owned fields and re-derives the status when the fee moved.
    pub async fn update_intern(&self, id: Uuid, patch: InternPatch) -> ResultLedger<()> {
        let full_name = patch
            .full_name
            .as_deref()
            .map(|v| normalize_required_name(v, "intern name"))
            .transpose()?;
        let domain = patch
            .domain
            .as_deref()
            .map(|v| normalize_required_name(v, "domain"))
            .transpose()?;
        if patch.total_fee_minor.is_some_and(|fee| fee < 0) {
            return Err(LedgerError::InvalidAmount(
                "total_fee_minor must be >= 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let model = interns::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::KeyNotFound("intern not exists".to_string()))?;

            let mut active = interns::ActiveModel {
                id: ActiveValue::Set(model.id),
                ..Default::default()
            };
            if let Some(full_name) = full_name {
                active.full_name = ActiveValue::Set(full_name);
            }
            if let Some(domain) = domain {
                active.domain = ActiveValue::Set(domain);
            }
            let fee_changed = patch.total_fee_minor.is_some();
            if let Some(fee) = patch.total_fee_minor {
                active.total_fee_minor = ActiveValue::Set(fee);
            }
            active.update(&db_tx).await?;

            // The paid total is unchanged but the status threshold may have moved.
            if fee_changed {
                sync::synchronize_in(&db_tx, SubjectKind::Intern, id).await?;
            }
            Ok(())
        })
    }
}
