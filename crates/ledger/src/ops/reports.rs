//! Aggregate reporter.
//!
//! Read-only rollups for the dashboard. Revenue combines two sources that
//! are allowed to disagree: the ledger itself and the denormalized entity
//! summaries. Legacy rows were seeded directly into the entity tables before
//! the synchronizer existed, so the repository side can carry amounts the
//! ledger never saw; taking the max of the two avoids under-reporting at the
//! cost of possibly over-reporting while the sources diverge.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{ConnectionTrait, QueryFilter, Statement, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{PaymentStatus, ResultLedger, interns, payments, projects};

use super::Ledger;

/// Company-wide revenue, both candidate sources plus the figure to display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueFigures {
    /// Sum over completed ledger rows.
    pub ledger_minor: i64,
    /// Sum over entity summary columns.
    pub repository_minor: i64,
    /// `max` of the two candidates.
    pub revenue_minor: i64,
}

/// One calendar-month bucket of completed payment volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: u32,
    pub total_minor: i64,
}

/// Intern count for one training domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCount {
    pub domain: String,
    pub count: u64,
}

/// Label for the overflow bucket in [`Ledger::domain_distribution`].
pub const OVERFLOW_DOMAIN: &str = "Other";

impl Ledger {
    /// Company-wide revenue.
    ///
    /// Computes the ledger total and the repository total independently and
    /// returns both alongside their max.
    pub async fn total_revenue(&self) -> ResultLedger<RevenueFigures> {
        let backend = self.database.get_database_backend();

        let ledger_minor: i64 = {
            let stmt = Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
                 FROM payments \
                 WHERE status = ?",
                vec![PaymentStatus::Completed.as_str().into()],
            );
            let row = self.database.query_one(stmt).await?;
            row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0)
        };

        let intern_minor: i64 = {
            let stmt = Statement::from_string(
                backend,
                "SELECT COALESCE(SUM(paid_fee_minor), 0) AS sum FROM interns",
            );
            let row = self.database.query_one(stmt).await?;
            row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0)
        };

        let project_minor: i64 = {
            let stmt = Statement::from_string(
                backend,
                "SELECT COALESCE(SUM(paid_amount_minor), 0) AS sum FROM projects",
            );
            let row = self.database.query_one(stmt).await?;
            row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0)
        };

        let repository_minor = intern_minor + project_minor;
        Ok(RevenueFigures {
            ledger_minor,
            repository_minor,
            revenue_minor: ledger_minor.max(repository_minor),
        })
    }

    /// Sum of unpaid portions across all billable entities.
    ///
    /// Overpaid entities contribute zero, never a negative term, so the
    /// aggregate cannot go negative.
    pub async fn outstanding_balance(&self) -> ResultLedger<i64> {
        let intern_models = interns::Entity::find().all(&self.database).await?;
        let project_models = projects::Entity::find().all(&self.database).await?;

        let intern_outstanding: i64 = intern_models
            .iter()
            .map(|m| (m.total_fee_minor - m.paid_fee_minor).max(0))
            .sum();
        let project_outstanding: i64 = project_models
            .iter()
            .map(|m| (m.value_minor - m.paid_amount_minor).max(0))
            .sum();

        Ok(intern_outstanding + project_outstanding)
    }

    /// Completed payment volume per calendar month, trailing `months` buckets
    /// ending at the current month, zero-filled.
    ///
    /// Fallback: when every bucket is zero (a database migrated with entity
    /// summaries but no ledger history), the series is rebuilt from entity
    /// creation dates weighted by each entity's current paid amount.
    pub async fn monthly_revenue(&self, months: u32) -> ResultLedger<Vec<MonthlyRevenue>> {
        let today = Utc::now().date_naive();
        let buckets = trailing_months(today, months);
        let mut totals: Vec<i64> = vec![0; buckets.len()];
        let index: HashMap<(i32, u32), usize> = buckets
            .iter()
            .enumerate()
            .map(|(i, &b)| (b, i))
            .collect();

        let payment_models = payments::Entity::find()
            .filter(payments::Column::Status.eq(PaymentStatus::Completed.as_str()))
            .all(&self.database)
            .await?;
        for model in &payment_models {
            let key = (model.paid_on.year(), model.paid_on.month());
            if let Some(&i) = index.get(&key) {
                totals[i] += model.amount_minor;
            }
        }

        if totals.iter().all(|&t| t == 0) {
            // Legacy path: no ledger activity in the window, seed the series
            // from entity creation dates instead.
            let intern_models = interns::Entity::find().all(&self.database).await?;
            for model in &intern_models {
                let created = model.created_at.date_naive();
                let key = (created.year(), created.month());
                if let Some(&i) = index.get(&key) {
                    totals[i] += model.paid_fee_minor;
                }
            }
            let project_models = projects::Entity::find().all(&self.database).await?;
            for model in &project_models {
                let created = model.created_at.date_naive();
                let key = (created.year(), created.month());
                if let Some(&i) = index.get(&key) {
                    totals[i] += model.paid_amount_minor;
                }
            }
        }

        Ok(buckets
            .into_iter()
            .zip(totals)
            .map(|((year, month), total_minor)| MonthlyRevenue {
                year,
                month,
                total_minor,
            })
            .collect())
    }

    /// Interns grouped by training domain, top `top` groups descending by
    /// count, the remainder collapsed into [`OVERFLOW_DOMAIN`].
    pub async fn domain_distribution(&self, top: usize) -> ResultLedger<Vec<DomainCount>> {
        let models = interns::Entity::find().all(&self.database).await?;
        Ok(fold_domains(models.into_iter().map(|m| m.domain), top))
    }
}

/// Trailing `count` `(year, month)` buckets ending at `end`'s month, oldest first.
fn trailing_months(end: NaiveDate, count: u32) -> Vec<(i32, u32)> {
    let mut year = end.year();
    let mut month = end.month();
    let mut buckets = Vec::with_capacity(count as usize);
    for _ in 0..count {
        buckets.push((year, month));
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    buckets.reverse();
    buckets
}

fn fold_domains(domains: impl Iterator<Item = String>, top: usize) -> Vec<DomainCount> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for domain in domains {
        *counts.entry(domain).or_insert(0) += 1;
    }

    let mut groups: Vec<DomainCount> = counts
        .into_iter()
        .map(|(domain, count)| DomainCount { domain, count })
        .collect();
    // Ties break alphabetically so the dashboard ordering is stable.
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.domain.cmp(&b.domain)));

    if groups.len() > top {
        let overflow: u64 = groups[top..].iter().map(|g| g.count).sum();
        groups.truncate(top);
        groups.push(DomainCount {
            domain: OVERFLOW_DOMAIN.to_string(),
            count: overflow,
        });
    }
    groups
}
