//! SeaORM implementation of SettingsRepository

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use crate::domain::{DomainError, DomainResult, SettingsRepository};
use crate::infrastructure::database::entities::app_setting;
use crate::shared::errors::InfraError;

fn db_err(e: sea_orm::DbErr) -> DomainError {
    InfraError::Database(e).into()
}

pub struct SeaOrmSettingsRepository {
    db: DatabaseConnection,
}

impl SeaOrmSettingsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettingsRepository for SeaOrmSettingsRepository {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        let model = app_setting::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(|m| m.value))
    }

    async fn put(&self, key: &str, value: &str) -> DomainResult<()> {
        let model = app_setting::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(Utc::now()),
        };

        app_setting::Entity::insert(model)
            .on_conflict(
                OnConflict::column(app_setting::Column::Key)
                    .update_columns([app_setting::Column::Value, app_setting::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;

        info!("Setting stored: {}={}", key, value);
        Ok(())
    }
}
