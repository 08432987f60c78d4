//! Billing mode controller
//!
//! Process-wide holder of the current [`BillingMode`]. One logical writer
//! (the admin endpoint), many readers. Every change is persisted before it
//! becomes visible and is then broadcast to the subscribers registered at
//! that moment.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use log::{info, warn};
use tokio::sync::Mutex;

use crate::domain::{BillingMode, DomainResult, SettingsRepository, BILLING_MODE_SETTING_KEY};
use crate::notifications::{
    BillingModeChangedEvent, Event, EventSubscriber, SharedEventBus,
};

pub struct BillingModeController {
    current: RwLock<BillingMode>,
    settings: Arc<dyn SettingsRepository>,
    event_bus: SharedEventBus,
    writer: Mutex<()>,
}

impl BillingModeController {
    pub fn new(
        initial: BillingMode,
        settings: Arc<dyn SettingsRepository>,
        event_bus: SharedEventBus,
    ) -> Self {
        Self {
            current: RwLock::new(initial),
            settings,
            event_bus,
            writer: Mutex::new(()),
        }
    }

    /// Restore the persisted mode.
    ///
    /// A missing value yields `default`; an unrecognised one is logged and
    /// also yields `default`.
    pub async fn load(
        settings: Arc<dyn SettingsRepository>,
        event_bus: SharedEventBus,
        default: BillingMode,
    ) -> DomainResult<Self> {
        let mode = match settings.get(BILLING_MODE_SETTING_KEY).await? {
            Some(stored) => stored.parse().unwrap_or_else(|_| {
                warn!(
                    "Unrecognised stored billing mode '{}', using {}",
                    stored, default
                );
                default
            }),
            None => default,
        };
        info!("Billing mode: {}", mode);
        Ok(Self::new(mode, settings, event_bus))
    }

    /// Current mode. Read on every call.
    pub fn mode(&self) -> BillingMode {
        *self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Persist `mode`, make it current and notify subscribers.
    ///
    /// Returns the previous mode. If persisting fails the current mode is
    /// left untouched and nobody is notified.
    pub async fn set_mode(
        &self,
        mode: BillingMode,
        changed_by: Option<&str>,
    ) -> DomainResult<BillingMode> {
        let _writer = self.writer.lock().await;

        self.settings
            .put(BILLING_MODE_SETTING_KEY, mode.as_str())
            .await?;

        let previous = {
            let mut current = self
                .current
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            std::mem::replace(&mut *current, mode)
        };

        metrics::counter!("billing_mode_changes_total", "mode" => mode.as_str()).increment(1);
        info!(
            "Billing mode changed: {} -> {} (by {})",
            previous,
            mode,
            changed_by.unwrap_or("unknown")
        );

        self.event_bus
            .publish(Event::BillingModeChanged(BillingModeChangedEvent {
                previous,
                mode,
                changed_by: changed_by.map(String::from),
                timestamp: Utc::now(),
            }));

        Ok(previous)
    }

    pub fn should_show_credit_info(&self, is_privileged: bool) -> bool {
        self.mode().should_show_credit_info(is_privileged)
    }

    /// Register an observer. Only changes made after this call are seen.
    pub fn subscribe(&self) -> BillingModeSubscriber {
        BillingModeSubscriber {
            inner: self.event_bus.subscribe(),
        }
    }
}

/// Receives billing-mode changes only
pub struct BillingModeSubscriber {
    inner: EventSubscriber,
}

impl BillingModeSubscriber {
    pub async fn recv(&mut self) -> Option<BillingModeChangedEvent> {
        while let Some(message) = self.inner.recv().await {
            if let Event::BillingModeChanged(change) = message.event {
                return Some(change);
            }
        }
        None
    }

    pub fn try_recv(&mut self) -> Option<BillingModeChangedEvent> {
        while let Some(message) = self.inner.try_recv() {
            if let Event::BillingModeChanged(change) = message.event {
                return Some(change);
            }
        }
        None
    }
}
