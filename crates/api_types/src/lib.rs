use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod payment {
    use super::*;

    /// What a payment is linked to. `unlinked` rows carry no subject id.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SubjectKind {
        Intern,
        Project,
        Unlinked,
    }

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

    /// Only `completed` payments count toward balances and revenue.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentStatus {
        Completed,
        Pending,
        Failed,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentKind {
        InternshipFee,
        ProjectMilestone,
    }

    /// Request body for recording a payment.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentNew {
        pub subject_kind: SubjectKind,
        pub subject_id: Option<Uuid>,
        /// Must be > 0, in paise.
        pub amount_minor: i64,
        /// Defaults to today when omitted.
        pub paid_on: Option<NaiveDate>,
        pub method: PaymentMethod,
        pub reference: Option<String>,
        pub status: PaymentStatus,
        pub kind: PaymentKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentCreated {
        pub id: Uuid,
    }

    /// Query parameters for listing payments.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PaymentList {
        pub kind: Option<PaymentKind>,
        pub status: Option<PaymentStatus>,
        pub subject_kind: Option<SubjectKind>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentView {
        pub id: Uuid,
        pub subject_kind: SubjectKind,
        pub subject_id: Option<Uuid>,
        /// Display name of the linked intern/project, when it still exists.
        pub subject_name: Option<String>,
        pub amount_minor: i64,
        pub paid_on: NaiveDate,
        pub method: PaymentMethod,
        pub reference: Option<String>,
        pub status: PaymentStatus,
        pub kind: PaymentKind,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentListResponse {
        pub payments: Vec<PaymentView>,
    }
}

pub mod intern {
    use super::*;

    /// Derived from the ledger, never set by clients.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum FeeStatus {
        Unpaid,
        Partial,
        Paid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InternNew {
        pub full_name: String,
        pub domain: String,
        /// Agreed fee in paise, >= 0.
        pub total_fee_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InternCreated {
        pub id: Uuid,
    }

    /// PATCH body, owned fields only. Derived fields are rejected by shape.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct InternUpdate {
        pub full_name: Option<String>,
        pub domain: Option<String>,
        pub total_fee_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InternView {
        pub id: Uuid,
        pub full_name: String,
        pub domain: String,
        pub total_fee_minor: i64,
        pub paid_fee_minor: i64,
        pub fee_status: FeeStatus,
        pub outstanding_minor: i64,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InternListResponse {
        pub interns: Vec<InternView>,
    }
}

pub mod project {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectNew {
        pub title: String,
        pub client: String,
        /// Contract value in paise, >= 0.
        pub value_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectCreated {
        pub id: Uuid,
    }

    /// PATCH body, owned fields only.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProjectUpdate {
        pub title: Option<String>,
        pub client: Option<String>,
        pub value_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectView {
        pub id: Uuid,
        pub title: String,
        pub client: String,
        pub value_minor: i64,
        pub paid_amount_minor: i64,
        pub outstanding_minor: i64,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectListResponse {
        pub projects: Vec<ProjectView>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Overview {
        /// `max` of the ledger and repository figures; the two may disagree
        /// on legacy data.
        pub total_revenue_minor: i64,
        pub ledger_revenue_minor: i64,
        pub repository_revenue_minor: i64,
        pub outstanding_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyQuery {
        /// Trailing window length, defaults to 6.
        pub months: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyBucket {
        pub year: i32,
        pub month: u32,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyResponse {
        pub months: Vec<MonthlyBucket>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DomainQuery {
        /// Number of domains before the tail collapses into "Other", defaults to 5.
        pub top: Option<usize>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DomainBucket {
        pub domain: String,
        pub count: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DomainResponse {
        pub domains: Vec<DomainBucket>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ResyncResponse {
        pub interns_synced: u64,
        pub projects_synced: u64,
        pub failures: u64,
    }
}
