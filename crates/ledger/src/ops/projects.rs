//! Project repository operations.

use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{LedgerError, Project, ResultLedger, SubjectKind, projects};

use super::{Ledger, normalize_required_name, sync, with_tx};

/// Owned-field updates for a project.
#[derive(Clone, Debug, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub client: Option<String>,
    pub value_minor: Option<i64>,
}

impl Ledger {
    /// Creates a new client project. `paid_amount_minor` starts at zero.
    pub async fn create_project(
        &self,
        title: &str,
        client: &str,
        value_minor: i64,
    ) -> ResultLedger<Uuid> {
        let title = normalize_required_name(title, "project title")?;
        let client = normalize_required_name(client, "client")?;
        if value_minor < 0 {
            return Err(LedgerError::InvalidAmount(
                "value_minor must be >= 0".to_string(),
            ));
        }

        let project = Project::new(title, client, value_minor);
        let id = project.id;
        projects::ActiveModel::from(&project)
            .insert(&self.database)
            .await?;
        Ok(id)
    }

    /// Returns a project by id.
    pub async fn project(&self, id: Uuid) -> ResultLedger<Project> {
        let model = projects::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound("project not exists".to_string()))?;
        Project::try_from(model)
    }

    /// Lists all projects.
    pub async fn list_projects(&self) -> ResultLedger<Vec<Project>> {
        let models = projects::Entity::find().all(&self.database).await?;
        let mut out = Vec::with_capacity(models.len());
        for model in models {
            out.push(Project::try_from(model)?);
        }
        Ok(out)
    }

    /// Updates owned fields.
    ///
    /// The derived paid amount does not depend on the value, but the sync is
    /// re-run on a value change so a stale summary heals on the next edit.
    pub async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> ResultLedger<()> {
        let title = patch
            .title
            .as_deref()
            .map(|v| normalize_required_name(v, "project title"))
            .transpose()?;
        let client = patch
            .client
            .as_deref()
            .map(|v| normalize_required_name(v, "client"))
            .transpose()?;
        if patch.value_minor.is_some_and(|value| value < 0) {
            return Err(LedgerError::InvalidAmount(
                "value_minor must be >= 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let model = projects::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::KeyNotFound("project not exists".to_string()))?;

            let mut active = projects::ActiveModel {
                id: ActiveValue::Set(model.id),
                ..Default::default()
            };
            if let Some(title) = title {
                active.title = ActiveValue::Set(title);
            }
            if let Some(client) = client {
                active.client = ActiveValue::Set(client);
            }
            let value_changed = patch.value_minor.is_some();
            if let Some(value) = patch.value_minor {
                active.value_minor = ActiveValue::Set(value);
            }
            active.update(&db_tx).await?;

            if value_changed {
                sync::synchronize_in(&db_tx, SubjectKind::Project, id).await?;
            }
            Ok(())
        })
    }
}
