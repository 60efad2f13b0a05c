//! Paybook ledger core.
//!
//! The single `payments` table is the source of truth for everything
//! financial. Interns and projects carry denormalized summary columns
//! (`paid_fee_minor`/`fee_status`, `paid_amount_minor`) that are recomputed
//! in full from the ledger after every mutation, never adjusted by delta.
//! The report layer combines both sources into dashboard figures.

pub use error::LedgerError;
pub use interns::{FeeStatus, Intern};
pub use money::MoneyPaise;
pub use ops::{
    InternPatch, Ledger, LedgerBuilder, PaymentListFilter, ProjectPatch, RecordPaymentCmd,
    ResyncReport,
    reports::{DomainCount, MonthlyRevenue, RevenueFigures},
};
pub use payments::{Payment, PaymentKind, PaymentMethod, PaymentStatus, SubjectKind};
pub use projects::Project;

mod error;
pub mod interns;
mod money;
mod ops;
pub mod payments;
pub mod projects;
pub mod users;

type ResultLedger<T> = Result<T, LedgerError>;
