//! Create credit_pricing table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CreditPricing::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditPricing::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CreditPricing::Service).string_len(32).not_null())
                    .col(ColumnDef::new(CreditPricing::Tier).string_len(32).not_null())
                    .col(ColumnDef::new(CreditPricing::Credits).integer().not_null())
                    .col(ColumnDef::new(CreditPricing::DisplayName).string().not_null())
                    .col(ColumnDef::new(CreditPricing::Description).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_credit_pricing_service_tier")
                    .table(CreditPricing::Table)
                    .col(CreditPricing::Service)
                    .col(CreditPricing::Tier)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let mut insert = Query::insert()
            .into_table(CreditPricing::Table)
            .columns([
                CreditPricing::Service,
                CreditPricing::Tier,
                CreditPricing::Credits,
                CreditPricing::DisplayName,
                CreditPricing::Description,
            ])
            .to_owned();

        let rows = [
            ("text_to_video", "720p", 10, "Text to Video 720p", "Per 5 seconds of video"),
            ("image_enhancement", "4x", 4, "Enhance 4x", "Upscale to four times the size"),
            ("text_to_image", "standard", 4, "Text to Image", "One standard image"),
            ("text_to_video", "1080p", 15, "Text to Video 1080p", "Per 5 seconds of video"),
            ("image_enhancement", "2x", 2, "Enhance 2x", "Upscale to twice the size"),
            ("image_to_video", "720p", 12, "Image to Video 720p", "Per 5 seconds of video"),
            ("text_to_image", "hd", 6, "Text to Image HD", "One high-definition image"),
            ("image_to_video", "1080p", 18, "Image to Video 1080p", "Per 5 seconds of video"),
        ];
        for (service, tier, credits, display_name, description) in rows {
            insert.values_panic([
                service.into(),
                tier.into(),
                credits.into(),
                display_name.into(),
                description.into(),
            ]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CreditPricing::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum CreditPricing {
    Table,
    Id,
    Service,
    Tier,
    Credits,
    DisplayName,
    Description,
}
