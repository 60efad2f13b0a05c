//! The module contains the representation of an intern.
//!
//! An intern is a billable entity on the training side: the company charges
//! `total_fee_minor` for the internship and staff record fee payments against
//! it over time. `paid_fee_minor` and `fee_status` are **derived** columns:
//! they must always equal a function of the payment ledger and are written
//! only by the synchronizer.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::LedgerError;

/// Where an intern stands against their agreed fee.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    #[default]
    Unpaid,
    Partial,
    Paid,
}

impl FeeStatus {
    /// Derives the status from the paid/total pair.
    ///
    /// `Paid` requires a positive target fee: an intern enrolled with a zero
    /// fee stays `Unpaid` until a fee is set, even if stray payments exist.
    pub fn derive(paid_minor: i64, total_fee_minor: i64) -> Self {
        if total_fee_minor > 0 && paid_minor >= total_fee_minor {
            Self::Paid
        } else if paid_minor > 0 {
            Self::Partial
        } else {
            Self::Unpaid
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }
}

impl TryFrom<&str> for FeeStatus {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "unpaid" => Ok(Self::Unpaid),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            other => Err(LedgerError::Validation(format!(
                "invalid fee status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intern {
    pub id: Uuid,
    pub full_name: String,
    pub domain: String,
    pub total_fee_minor: i64,
    pub paid_fee_minor: i64,
    pub fee_status: FeeStatus,
    pub created_at: DateTime<Utc>,
}

impl Intern {
    pub fn new(full_name: String, domain: String, total_fee_minor: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name,
            domain,
            total_fee_minor,
            paid_fee_minor: 0,
            fee_status: FeeStatus::Unpaid,
            created_at: Utc::now(),
        }
    }

    /// Unpaid portion of the fee, floored at zero (overpayment never goes
    /// negative in aggregate figures).
    pub fn outstanding_minor(&self) -> i64 {
        (self.total_fee_minor - self.paid_fee_minor).max(0)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "interns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub full_name: String,
    pub domain: String,
    pub total_fee_minor: i64,
    pub paid_fee_minor: i64,
    pub fee_status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Intern> for ActiveModel {
    fn from(intern: &Intern) -> Self {
        Self {
            id: ActiveValue::Set(intern.id.to_string()),
            full_name: ActiveValue::Set(intern.full_name.clone()),
            domain: ActiveValue::Set(intern.domain.clone()),
            total_fee_minor: ActiveValue::Set(intern.total_fee_minor),
            paid_fee_minor: ActiveValue::Set(intern.paid_fee_minor),
            fee_status: ActiveValue::Set(intern.fee_status.as_str().to_string()),
            created_at: ActiveValue::Set(intern.created_at),
        }
    }
}

impl TryFrom<Model> for Intern {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::KeyNotFound("intern not exists".to_string()))?,
            full_name: model.full_name,
            domain: model.domain,
            total_fee_minor: model.total_fee_minor,
            paid_fee_minor: model.paid_fee_minor,
            fee_status: FeeStatus::try_from(model.fee_status.as_str())?,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_derivation_boundaries() {
        assert_eq!(FeeStatus::derive(0, 4000), FeeStatus::Unpaid);
        assert_eq!(FeeStatus::derive(1, 4000), FeeStatus::Partial);
        assert_eq!(FeeStatus::derive(3999, 4000), FeeStatus::Partial);
        assert_eq!(FeeStatus::derive(4000, 4000), FeeStatus::Paid);
        assert_eq!(FeeStatus::derive(5000, 4000), FeeStatus::Paid);
    }

    #[test]
    fn zero_fee_never_reaches_paid() {
        // Legacy rows enrolled before the fee was agreed carry total_fee = 0.
        assert_eq!(FeeStatus::derive(0, 0), FeeStatus::Unpaid);
        assert_eq!(FeeStatus::derive(500, 0), FeeStatus::Partial);
    }

    #[test]
    fn outstanding_floors_overpayment_at_zero() {
        let mut intern = Intern::new("Asha".to_string(), "Web Development".to_string(), 4000);
        intern.paid_fee_minor = 5000;
        assert_eq!(intern.outstanding_minor(), 0);

        intern.paid_fee_minor = 1500;
        assert_eq!(intern.outstanding_minor(), 2500);
    }
}
