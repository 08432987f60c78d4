//! Credit configuration and estimation DTOs

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::pricing::{
    AppliedFactor, CostEstimateRequest, CostEstimateResult, MultiplierTable, PricingRule,
};
use crate::domain::{CreditPack, CreditPricing, DomainError, DomainResult, ServiceKind};

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::MAX)
}

fn table_to_dto(table: &MultiplierTable) -> BTreeMap<String, f64> {
    table
        .iter()
        .map(|(label, multiplier)| (label.clone(), to_f64(*multiplier)))
        .collect()
}

/// Pricing rule of one service
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PricingRuleDto {
    /// `image_enhancement`, `text_to_image`, `text_to_video` or `image_to_video`
    #[schema(example = "text_to_video")]
    pub service: String,
    pub base_cost: u32,
    pub resolution_multipliers: BTreeMap<String, f64>,
    /// Keyed by `short`, `medium`, `long`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_multipliers: Option<BTreeMap<String, f64>>,
    /// Keyed by `square`, `portrait`, `landscape`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_multipliers: Option<BTreeMap<String, f64>>,
}

impl From<&PricingRule> for PricingRuleDto {
    fn from(rule: &PricingRule) -> Self {
        Self {
            service: rule.service.to_string(),
            base_cost: rule.base_cost,
            resolution_multipliers: table_to_dto(&rule.resolution_multipliers),
            duration_multipliers: rule.duration_multipliers.as_ref().map(table_to_dto),
            size_multipliers: rule.size_multipliers.as_ref().map(table_to_dto),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreditPackDto {
    pub id: i32,
    pub name: String,
    pub credits: i32,
    pub bonus_credits: i32,
    /// `credits + bonus_credits`
    pub total_credits: i64,
    pub price_cents: i32,
    #[schema(example = "9.99 USD")]
    pub price_display: String,
    pub currency: String,
    pub is_popular: bool,
    pub sort_order: i32,
}

impl From<CreditPack> for CreditPackDto {
    fn from(p: CreditPack) -> Self {
        Self {
            total_credits: p.total_credits(),
            price_display: p.format_price(),
            id: p.id,
            name: p.name,
            credits: p.credits,
            bonus_credits: p.bonus_credits,
            price_cents: p.price_cents,
            currency: p.currency,
            is_popular: p.is_popular,
            sort_order: p.sort_order,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreditPricingDto {
    pub id: i32,
    pub service: String,
    pub tier: String,
    pub credits: i32,
    pub display_name: String,
    pub description: Option<String>,
}

impl From<CreditPricing> for CreditPricingDto {
    fn from(p: CreditPricing) -> Self {
        Self {
            id: p.id,
            service: p.service,
            tier: p.tier,
            credits: p.credits,
            display_name: p.display_name,
            description: p.description,
        }
    }
}

/// Options selected for a generation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EstimateRequest {
    #[validate(length(min = 1, max = 32, message = "service is required"))]
    #[schema(example = "text_to_video")]
    pub service: String,
    #[validate(length(min = 1, max = 32))]
    #[schema(example = "1080p")]
    pub resolution: Option<String>,
    /// Video length in seconds
    #[validate(range(min = 0.0, max = 3600.0))]
    #[schema(example = 12.0)]
    pub duration: Option<f64>,
    #[validate(length(min = 1, max = 32))]
    #[schema(example = "portrait")]
    pub size: Option<String>,
}

impl EstimateRequest {
    pub fn into_domain(self) -> DomainResult<CostEstimateRequest> {
        let service: ServiceKind = self.service.parse()?;
        let duration_seconds = self
            .duration
            .map(|seconds| {
                Decimal::try_from(seconds).map_err(|_| {
                    DomainError::Validation(format!("duration {} is not a finite number", seconds))
                })
            })
            .transpose()?;

        Ok(CostEstimateRequest {
            service,
            resolution: self.resolution,
            duration_seconds,
            size: self.size,
        })
    }
}

/// One applied pricing factor
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppliedFactorDto {
    /// `resolution`, `duration`, `duration_scale` or `size`
    pub category: String,
    /// The matched label, bucket, or seconds for `duration_scale`
    pub key: String,
    pub value: f64,
}

impl From<&AppliedFactor> for AppliedFactorDto {
    fn from(f: &AppliedFactor) -> Self {
        Self {
            category: f.category().to_string(),
            key: f.key(),
            value: to_f64(f.value()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EstimateResponse {
    pub service: String,
    pub credits: u64,
    pub breakdown: Vec<AppliedFactorDto>,
}

impl EstimateResponse {
    pub fn new(service: ServiceKind, result: &CostEstimateResult) -> Self {
        Self {
            service: service.to_string(),
            credits: result.credits,
            breakdown: result.breakdown.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub rules_loaded: usize,
}
