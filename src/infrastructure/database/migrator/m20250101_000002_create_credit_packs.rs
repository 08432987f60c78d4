//! Create credit_packs table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CreditPacks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditPacks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CreditPacks::Name).string().not_null())
                    .col(ColumnDef::new(CreditPacks::Credits).integer().not_null())
                    .col(
                        ColumnDef::new(CreditPacks::BonusCredits)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CreditPacks::PriceCents).integer().not_null())
                    .col(
                        ColumnDef::new(CreditPacks::Currency)
                            .string_len(3)
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(CreditPacks::IsPopular)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CreditPacks::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CreditPacks::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_credit_packs_sort_order")
                    .table(CreditPacks::Table)
                    .col(CreditPacks::SortOrder)
                    .to_owned(),
            )
            .await?;

        let mut insert = Query::insert()
            .into_table(CreditPacks::Table)
            .columns([
                CreditPacks::Name,
                CreditPacks::Credits,
                CreditPacks::BonusCredits,
                CreditPacks::PriceCents,
                CreditPacks::Currency,
                CreditPacks::IsPopular,
                CreditPacks::IsActive,
                CreditPacks::SortOrder,
            ])
            .to_owned();

        // name, credits, bonus, price, popular, active, sort
        let packs = [
            ("Studio", 1500, 300, 9999, false, true, 3),
            ("Starter", 100, 0, 999, false, true, 1),
            ("Trial", 25, 0, 199, false, false, 0),
            ("Creator", 500, 50, 3999, true, true, 2),
        ];
        for (name, credits, bonus, price, popular, active, sort) in packs {
            insert.values_panic([
                name.into(),
                credits.into(),
                bonus.into(),
                price.into(),
                "USD".into(),
                popular.into(),
                active.into(),
                sort.into(),
            ]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CreditPacks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum CreditPacks {
    Table,
    Id,
    Name,
    Credits,
    BonusCredits,
    PriceCents,
    Currency,
    IsPopular,
    IsActive,
    SortOrder,
}
