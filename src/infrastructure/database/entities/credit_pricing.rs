//! Credit pricing entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_pricing")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub service: String,

    pub tier: String,

    pub credits: i32,

    pub display_name: String,

    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
