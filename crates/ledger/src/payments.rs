//! Payment primitives.
//!
//! A `Payment` is a single ledger row recorded against a billable subject
//! (an intern or a project). Rows are immutable by convention: the only
//! mutations the ledger allows are insert and hard delete.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

/// Which kind of billable entity a payment is recorded against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Intern,
    Project,
    Unlinked,
}

impl SubjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intern => "intern",
            Self::Project => "project",
            Self::Unlinked => "unlinked",
        }
    }
}

impl TryFrom<&str> for SubjectKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "intern" => Ok(Self::Intern),
            "project" => Ok(Self::Project),
            "unlinked" => Ok(Self::Unlinked),
            other => Err(LedgerError::Validation(format!(
                "invalid subject kind: {other}"
            ))),
        }
    }
}

/// How the money moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Upi,
    BankTransfer,
    Cash,
    Card,
    NeftRtgs,
    Check,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upi => "upi",
            Self::BankTransfer => "bank_transfer",
            Self::Cash => "cash",
            Self::Card => "card",
            Self::NeftRtgs => "neft_rtgs",
            Self::Check => "check",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "upi" => Ok(Self::Upi),
            "bank_transfer" => Ok(Self::BankTransfer),
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "neft_rtgs" => Ok(Self::NeftRtgs),
            "check" => Ok(Self::Check),
            other => Err(LedgerError::Validation(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}

/// Settlement state of a payment. Only `Completed` rows count toward derived
/// balances and revenue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Failed => "failed",
        }
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            "failed" => Ok(Self::Failed),
            other => Err(LedgerError::Validation(format!(
                "invalid payment status: {other}"
            ))),
        }
    }
}

/// Partitions the ledger into the training side and the client side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    InternshipFee,
    ProjectMilestone,
}

impl PaymentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InternshipFee => "internship_fee",
            Self::ProjectMilestone => "project_milestone",
        }
    }
}

impl TryFrom<&str> for PaymentKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "internship_fee" => Ok(Self::InternshipFee),
            "project_milestone" => Ok(Self::ProjectMilestone),
            other => Err(LedgerError::Validation(format!(
                "invalid payment kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub subject_kind: SubjectKind,
    pub subject_id: Option<Uuid>,
    pub amount_minor: i64,
    pub paid_on: NaiveDate,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub status: PaymentStatus,
    pub kind: PaymentKind,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        subject_kind: SubjectKind,
        subject_id: Option<Uuid>,
        amount_minor: i64,
        paid_on: NaiveDate,
        method: PaymentMethod,
        reference: Option<String>,
        status: PaymentStatus,
        kind: PaymentKind,
    ) -> ResultLedger<Self> {
        if amount_minor <= 0 {
            return Err(LedgerError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        match (subject_kind, subject_id) {
            (SubjectKind::Unlinked, Some(_)) => {
                return Err(LedgerError::Validation(
                    "unlinked payment must not carry a subject_id".to_string(),
                ));
            }
            (SubjectKind::Intern | SubjectKind::Project, None) => {
                return Err(LedgerError::Validation(
                    "subject_id is required for intern/project payments".to_string(),
                ));
            }
            _ => {}
        }

        Ok(Self {
            id: Uuid::new_v4(),
            subject_kind,
            subject_id,
            amount_minor,
            paid_on,
            method,
            reference,
            status,
            kind,
            created_at: Utc::now(),
        })
    }

    /// Returns the `(kind, id)` pair for payments linked to a subject.
    pub fn subject(&self) -> Option<(SubjectKind, Uuid)> {
        self.subject_id.map(|id| (self.subject_kind, id))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub subject_kind: String,
    pub subject_id: Option<String>,
    pub amount_minor: i64,
    pub paid_on: Date,
    pub method: String,
    pub reference: Option<String>,
    pub status: String,
    pub kind: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Payment> for ActiveModel {
    fn from(payment: &Payment) -> Self {
        Self {
            id: ActiveValue::Set(payment.id.to_string()),
            subject_kind: ActiveValue::Set(payment.subject_kind.as_str().to_string()),
            subject_id: ActiveValue::Set(payment.subject_id.map(|id| id.to_string())),
            amount_minor: ActiveValue::Set(payment.amount_minor),
            paid_on: ActiveValue::Set(payment.paid_on),
            method: ActiveValue::Set(payment.method.as_str().to_string()),
            reference: ActiveValue::Set(payment.reference.clone()),
            status: ActiveValue::Set(payment.status.as_str().to_string()),
            kind: ActiveValue::Set(payment.kind.as_str().to_string()),
            created_at: ActiveValue::Set(payment.created_at),
        }
    }
}

impl TryFrom<Model> for Payment {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::KeyNotFound("payment not exists".to_string()))?,
            subject_kind: SubjectKind::try_from(model.subject_kind.as_str())?,
            subject_id: model.subject_id.and_then(|s| Uuid::parse_str(&s).ok()),
            amount_minor: model.amount_minor,
            paid_on: model.paid_on,
            method: PaymentMethod::try_from(model.method.as_str())?,
            reference: model.reference,
            status: PaymentStatus::try_from(model.status.as_str())?,
            kind: PaymentKind::try_from(model.kind.as_str())?,
            created_at: model.created_at,
        })
    }
}
