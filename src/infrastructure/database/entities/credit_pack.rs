//! Credit pack entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_packs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub credits: i32,

    pub bonus_credits: i32,

    /// Price in the smallest currency unit
    pub price_cents: i32,

    /// ISO 4217
    pub currency: String,

    /// Highlighted in the storefront
    pub is_popular: bool,

    pub is_active: bool,

    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
