//! SeaORM implementation of CreditCatalogRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::catalog::{CreditCatalogRepository, CreditPack, CreditPricing};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{credit_pack, credit_pricing};
use crate::shared::errors::InfraError;

fn db_err(e: sea_orm::DbErr) -> DomainError {
    InfraError::Database(e).into()
}

fn pack_to_domain(m: credit_pack::Model) -> CreditPack {
    CreditPack {
        id: m.id,
        name: m.name,
        credits: m.credits,
        bonus_credits: m.bonus_credits,
        price_cents: m.price_cents,
        currency: m.currency,
        is_popular: m.is_popular,
        is_active: m.is_active,
        sort_order: m.sort_order,
    }
}

fn pricing_to_domain(m: credit_pricing::Model) -> CreditPricing {
    CreditPricing {
        id: m.id,
        service: m.service,
        tier: m.tier,
        credits: m.credits,
        display_name: m.display_name,
        description: m.description,
    }
}

pub struct SeaOrmCreditCatalogRepository {
    db: DatabaseConnection,
}

impl SeaOrmCreditCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CreditCatalogRepository for SeaOrmCreditCatalogRepository {
    async fn list_active_packs(&self) -> DomainResult<Vec<CreditPack>> {
        let models = credit_pack::Entity::find()
            .filter(credit_pack::Column::IsActive.eq(true))
            .order_by_asc(credit_pack::Column::SortOrder)
            .order_by_asc(credit_pack::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        debug!("Listed {} active credit packs", models.len());
        Ok(models.into_iter().map(pack_to_domain).collect())
    }

    async fn list_pricing(&self) -> DomainResult<Vec<CreditPricing>> {
        let models = credit_pricing::Entity::find()
            .order_by_asc(credit_pricing::Column::Service)
            .order_by_asc(credit_pricing::Column::Tier)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(pricing_to_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_db;

    #[tokio::test]
    async fn active_packs_are_ordered_and_filtered() {
        let repo = SeaOrmCreditCatalogRepository::new(test_db().await);
        let packs = repo.list_active_packs().await.unwrap();

        let names: Vec<_> = packs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Starter", "Creator", "Studio"]);
        assert!(packs.iter().all(|p| p.is_active));

        let creator = &packs[1];
        assert!(creator.is_popular);
        assert_eq!(creator.total_credits(), 550);
        assert_eq!(creator.format_price(), "39.99 USD");
    }

    #[tokio::test]
    async fn pricing_rows_are_sorted_by_service_then_tier() {
        let repo = SeaOrmCreditCatalogRepository::new(test_db().await);
        let rows = repo.list_pricing().await.unwrap();

        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.service.as_str(), r.tier.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("image_enhancement", "2x"),
                ("image_enhancement", "4x"),
                ("image_to_video", "1080p"),
                ("image_to_video", "720p"),
                ("text_to_image", "hd"),
                ("text_to_image", "standard"),
                ("text_to_video", "1080p"),
                ("text_to_video", "720p"),
            ]
        );
    }
}
