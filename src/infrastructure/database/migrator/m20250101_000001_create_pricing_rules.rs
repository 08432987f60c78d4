//! Create pricing_rules table with the default rule per service

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PricingRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PricingRules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PricingRules::Service)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PricingRules::BaseCost)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PricingRules::ResolutionMultipliers)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(ColumnDef::new(PricingRules::DurationMultipliers).text())
                    .col(ColumnDef::new(PricingRules::SizeMultipliers).text())
                    .col(
                        ColumnDef::new(PricingRules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        let now = chrono::Utc::now().to_rfc3339();
        let mut insert = Query::insert()
            .into_table(PricingRules::Table)
            .columns([
                PricingRules::Service,
                PricingRules::BaseCost,
                PricingRules::ResolutionMultipliers,
                PricingRules::DurationMultipliers,
                PricingRules::SizeMultipliers,
                PricingRules::UpdatedAt,
            ])
            .to_owned();

        let defaults: [(&str, i32, &str, Option<&str>, Option<&str>); 4] = [
            ("image_enhancement", 2, r#"{"2x":"1","4x":"2"}"#, None, None),
            (
                "text_to_image",
                4,
                r#"{"standard":"1","hd":"1.5"}"#,
                None,
                Some(r#"{"square":"1","portrait":"1.25","landscape":"1.25"}"#),
            ),
            (
                "text_to_video",
                10,
                r#"{"720p":"1","1080p":"1.5"}"#,
                Some(r#"{"short":"1","long":"1.2"}"#),
                None,
            ),
            (
                "image_to_video",
                12,
                r#"{"720p":"1","1080p":"1.5"}"#,
                Some(r#"{"short":"1","long":"1.2"}"#),
                None,
            ),
        ];

        for (service, base_cost, resolutions, durations, sizes) in defaults {
            insert.values_panic([
                service.into(),
                base_cost.into(),
                resolutions.into(),
                durations.map(String::from).into(),
                sizes.map(String::from).into(),
                now.clone().into(),
            ]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PricingRules::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum PricingRules {
    Table,
    Id,
    Service,
    BaseCost,
    ResolutionMultipliers,
    DurationMultipliers,
    SizeMultipliers,
    UpdatedAt,
}
