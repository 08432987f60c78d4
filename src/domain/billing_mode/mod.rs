//! Billing mode
//!
//! The product-wide switch between pay-as-you-go, subscription and hybrid
//! billing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::errors::DomainError;

/// Settings key the mode is persisted under.
pub const BILLING_MODE_SETTING_KEY: &str = "billing_mode";

/// How users pay for generations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingMode {
    /// Pay as you go with purchased credits
    #[default]
    Payg,
    /// Plan-based access; credit costs hidden from privileged users
    Subscription,
    /// Subscriptions plus credit top-ups
    Hybrid,
}

impl BillingMode {
    /// Every mode, in declaration order.
    pub const ALL: [BillingMode; 3] = [Self::Payg, Self::Subscription, Self::Hybrid];

    /// Wire and storage name, also accepted by `FromStr`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payg => "payg",
            Self::Subscription => "subscription",
            Self::Hybrid => "hybrid",
        }
    }

    /// Whether credit costs are shown to a caller.
    ///
    /// Non-privileged callers always see them. Privileged callers see them
    /// unless the product runs on subscriptions only.
    pub fn should_show_credit_info(&self, is_privileged: bool) -> bool {
        if !is_privileged {
            return true;
        }
        matches!(self, Self::Payg | Self::Hybrid)
    }
}

impl fmt::Display for BillingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown billing mode: {}", s)))
    }
}
