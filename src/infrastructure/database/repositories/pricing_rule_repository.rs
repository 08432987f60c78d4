//! SeaORM implementation of PricingRuleRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::domain::pricing::{MultiplierTable, PricingRule, PricingRuleRepository, ServiceKind};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::pricing_rule;
use crate::shared::errors::InfraError;

// ── Conversion helpers ──────────────────────────────────────────

fn db_err(e: sea_orm::DbErr) -> DomainError {
    InfraError::Database(e).into()
}

fn service_to_domain(s: pricing_rule::Service) -> ServiceKind {
    match s {
        pricing_rule::Service::ImageEnhancement => ServiceKind::ImageEnhancement,
        pricing_rule::Service::TextToImage => ServiceKind::TextToImage,
        pricing_rule::Service::TextToVideo => ServiceKind::TextToVideo,
        pricing_rule::Service::ImageToVideo => ServiceKind::ImageToVideo,
    }
}

fn parse_table(raw: &str) -> Result<MultiplierTable, InfraError> {
    Ok(serde_json::from_str(raw)?)
}

fn entity_to_domain(m: pricing_rule::Model) -> DomainResult<PricingRule> {
    let service = service_to_domain(m.service);
    let base_cost = u32::try_from(m.base_cost).map_err(|_| {
        DomainError::Validation(format!("{}: negative base cost {}", service, m.base_cost))
    })?;

    Ok(PricingRule {
        service,
        base_cost,
        resolution_multipliers: parse_table(&m.resolution_multipliers)?,
        duration_multipliers: m.duration_multipliers.as_deref().map(parse_table).transpose()?,
        size_multipliers: m.size_multipliers.as_deref().map(parse_table).transpose()?,
    })
}

// ── SeaOrmPricingRuleRepository ─────────────────────────────────

pub struct SeaOrmPricingRuleRepository {
    db: DatabaseConnection,
}

impl SeaOrmPricingRuleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PricingRuleRepository for SeaOrmPricingRuleRepository {
    async fn find_all(&self) -> DomainResult<Vec<PricingRule>> {
        let models = pricing_rule::Entity::find()
            .order_by_asc(pricing_rule::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(entity_to_domain).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::DurationBucket;
    use crate::domain::PricingSnapshot;
    use crate::infrastructure::database::test_db;
    use crate::test_support::dec;
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, ColumnTrait, QueryFilter, Set};

    #[tokio::test]
    async fn seeded_rules_cover_every_service() {
        let repo = SeaOrmPricingRuleRepository::new(test_db().await);
        let rules = repo.find_all().await.unwrap();

        let snapshot = PricingSnapshot::from_rules(rules).unwrap();
        assert_eq!(snapshot.len(), ServiceKind::ALL.len());

        let video = snapshot.lookup(ServiceKind::TextToVideo).unwrap();
        assert_eq!(video.base_cost, 10);
        assert_eq!(video.resolution_multiplier("1080p"), Some(dec("1.5")));
        assert_eq!(video.duration_multiplier(DurationBucket::Short), Some(dec("1")));
        assert_eq!(video.duration_multiplier(DurationBucket::Medium), None);
        assert!(video.size_multipliers.is_none());

        let image = snapshot.lookup(ServiceKind::TextToImage).unwrap();
        assert_eq!(image.size_multiplier("portrait"), Some(dec("1.25")));
    }

    #[tokio::test]
    async fn malformed_multiplier_table_is_a_storage_error() {
        let db = test_db().await;
        let row = pricing_rule::Entity::find()
            .filter(pricing_rule::Column::Service.eq(pricing_rule::Service::TextToImage))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let mut active: pricing_rule::ActiveModel = row.into();
        active.resolution_multipliers = Set("not json".into());
        active.updated_at = Set(Utc::now());
        active.update(&db).await.unwrap();

        let err = SeaOrmPricingRuleRepository::new(db).find_all().await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }
}
