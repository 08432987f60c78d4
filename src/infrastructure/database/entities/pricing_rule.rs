//! Pricing rule entity
//!
//! Multiplier tables are stored as JSON objects of label → decimal string.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum Service {
    #[sea_orm(string_value = "image_enhancement")]
    ImageEnhancement,
    #[sea_orm(string_value = "text_to_image")]
    TextToImage,
    #[sea_orm(string_value = "text_to_video")]
    TextToVideo,
    #[sea_orm(string_value = "image_to_video")]
    ImageToVideo,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pricing_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub service: Service,

    pub base_cost: i32,

    pub resolution_multipliers: String,

    /// Video services only
    pub duration_multipliers: Option<String>,

    /// Image services only
    pub size_multipliers: Option<String>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
