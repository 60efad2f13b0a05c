//! The module contains the representation of a client project.
//!
//! A project is the client-side billable entity: milestone payments are
//! recorded against it until `paid_amount_minor` reaches the agreed
//! `value_minor`. `paid_amount_minor` is derived and written only by the
//! synchronizer.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::LedgerError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub client: String,
    pub value_minor: i64,
    pub paid_amount_minor: i64,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(title: String, client: String, value_minor: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            client,
            value_minor,
            paid_amount_minor: 0,
            created_at: Utc::now(),
        }
    }

    /// Unpaid portion of the project value, floored at zero.
    pub fn outstanding_minor(&self) -> i64 {
        (self.value_minor - self.paid_amount_minor).max(0)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub client: String,
    pub value_minor: i64,
    pub paid_amount_minor: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Project> for ActiveModel {
    fn from(project: &Project) -> Self {
        Self {
            id: ActiveValue::Set(project.id.to_string()),
            title: ActiveValue::Set(project.title.clone()),
            client: ActiveValue::Set(project.client.clone()),
            value_minor: ActiveValue::Set(project.value_minor),
            paid_amount_minor: ActiveValue::Set(project.paid_amount_minor),
            created_at: ActiveValue::Set(project.created_at),
        }
    }
}

impl TryFrom<Model> for Project {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::KeyNotFound("project not exists".to_string()))?,
            title: model.title,
            client: model.client,
            value_minor: model.value_minor,
            paid_amount_minor: model.paid_amount_minor,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_starts_unpaid() {
        let project = Project::new("CRM revamp".to_string(), "Acme Infotech".to_string(), 50_000);
        assert_eq!(project.paid_amount_minor, 0);
        assert_eq!(project.outstanding_minor(), 50_000);
    }

    #[test]
    fn outstanding_floors_overpayment_at_zero() {
        let mut project = Project::new("Audit".to_string(), "Acme Infotech".to_string(), 10_000);
        project.paid_amount_minor = 12_000;
        assert_eq!(project.outstanding_minor(), 0);
    }
}
