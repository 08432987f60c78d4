//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_pricing_rules;
mod m20250101_000002_create_credit_packs;
mod m20250101_000003_create_credit_pricing;
mod m20250101_000004_create_app_settings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_pricing_rules::Migration),
            Box::new(m20250101_000002_create_credit_packs::Migration),
            Box::new(m20250101_000003_create_credit_pricing::Migration),
            Box::new(m20250101_000004_create_app_settings::Migration),
        ]
    }
}
