//! Periodic pricing refresh
//!
//! Reloads the pricing snapshot from storage on a fixed interval until
//! shutdown. A failed reload keeps the previous snapshot.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::pricing::PricingService;
use crate::shared::ShutdownSignal;

pub struct PricingRefreshTask {
    service: Arc<PricingService>,
    period: Duration,
}

impl PricingRefreshTask {
    pub fn new(service: Arc<PricingService>, period: Duration) -> Self {
        Self { service, period }
    }

    /// Spawn the refresh loop. The first reload happens one period from now.
    pub fn start(self, shutdown: ShutdownSignal) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "🔄 Pricing refresh started (interval: {}s)",
                self.period.as_secs_f64()
            );

            let mut ticker = interval_at(Instant::now() + self.period, self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.service.refresh().await {
                            warn!("Pricing refresh failed, keeping previous rules: {}", e);
                        }
                    }
                    _ = shutdown.wait() => {
                        break;
                    }
                }
            }

            info!("🔄 Pricing refresh stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PricingRule, PricingRuleStore, ServiceKind};
    use crate::notifications::EventBus;
    use crate::test_support::InMemoryRepositories;

    #[tokio::test]
    async fn reloads_until_shutdown() {
        let repos = Arc::new(InMemoryRepositories::with_rules(vec![PricingRule::new(
            ServiceKind::TextToImage,
            4,
        )]));
        let store = Arc::new(PricingRuleStore::default());
        let service = Arc::new(PricingService::new(
            repos,
            store.clone(),
            Arc::new(EventBus::new()),
        ));
        let shutdown = ShutdownSignal::new();

        let handle = PricingRefreshTask::new(service, Duration::from_millis(10))
            .start(shutdown.clone());

        tokio::time::timeout(Duration::from_secs(2), async {
            while store.snapshot().is_empty() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("snapshot was never refreshed");

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("task did not stop")
            .unwrap();
    }
}
