//! Notification events
//!
//! Defines all event types that can be broadcast to subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::BillingMode;

/// Event types for notifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    /// Billing mode switched by an administrator
    BillingModeChanged(BillingModeChangedEvent),
    /// Pricing snapshot reloaded from storage
    PricingRulesRefreshed(PricingRulesRefreshedEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::BillingModeChanged(_) => "billing_mode_changed",
            Event::PricingRulesRefreshed(_) => "pricing_rules_refreshed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingModeChangedEvent {
    pub previous: BillingMode,
    pub mode: BillingMode,
    /// Subject of the principal that made the change
    pub changed_by: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRulesRefreshedEvent {
    pub rule_count: usize,
    pub timestamp: DateTime<Utc>,
}

/// Wrapper for sending events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
