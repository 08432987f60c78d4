//! Credit catalogue entities

use serde::{Deserialize, Serialize};

/// A purchasable bundle of credits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPack {
    pub id: i32,
    pub name: String,
    pub credits: i32,
    pub bonus_credits: i32,
    /// Price in the smallest currency unit
    pub price_cents: i32,
    /// ISO 4217
    pub currency: String,
    pub is_popular: bool,
    pub is_active: bool,
    pub sort_order: i32,
}

impl CreditPack {
    pub fn total_credits(&self) -> i64 {
        i64::from(self.credits) + i64::from(self.bonus_credits)
    }

    /// Price as `"12.99 USD"`.
    pub fn format_price(&self) -> String {
        let sign = if self.price_cents < 0 { "-" } else { "" };
        let cents = i64::from(self.price_cents).abs();
        format!("{}{}.{:02} {}", sign, cents / 100, cents % 100, self.currency)
    }
}

/// Published credit price of one service tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPricing {
    pub id: i32,
    pub service: String,
    pub tier: String,
    pub credits: i32,
    pub display_name: String,
    pub description: Option<String>,
}
