//! Pricing service
//!
//! Keeps the [`PricingRuleStore`] in sync with the persisted rules and runs
//! estimations against a single snapshot.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info};

use crate::domain::pricing::{self, CostEstimateRequest, CostEstimateResult};
use crate::domain::{DomainResult, PricingRuleStore, PricingSnapshot, RepositoryProvider};
use crate::notifications::{Event, PricingRulesRefreshedEvent, SharedEventBus};

pub struct PricingService {
    repos: Arc<dyn RepositoryProvider>,
    store: Arc<PricingRuleStore>,
    event_bus: SharedEventBus,
}

impl PricingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        store: Arc<PricingRuleStore>,
        event_bus: SharedEventBus,
    ) -> Self {
        Self {
            repos,
            store,
            event_bus,
        }
    }

    /// Reload every rule from storage and swap the snapshot.
    ///
    /// On any error the current snapshot stays in place.
    pub async fn refresh(&self) -> DomainResult<usize> {
        let rules = self.repos.pricing_rules().find_all().await?;
        let snapshot = PricingSnapshot::from_rules(rules)?;
        let count = snapshot.len();

        self.store.replace(snapshot);
        metrics::gauge!("pricing_rules_loaded").set(count as f64);
        info!("Pricing rules loaded: {}", count);

        self.event_bus
            .publish(Event::PricingRulesRefreshed(PricingRulesRefreshedEvent {
                rule_count: count,
                timestamp: Utc::now(),
            }));

        Ok(count)
    }

    pub fn snapshot(&self) -> Arc<PricingSnapshot> {
        self.store.snapshot()
    }

    pub fn estimate(&self, request: &CostEstimateRequest) -> DomainResult<CostEstimateResult> {
        let snapshot = self.store.snapshot();
        let rule = snapshot.lookup(request.service)?;
        let result = pricing::estimate(request, rule);

        metrics::counter!("credit_estimates_total", "service" => request.service.as_str())
            .increment(1);
        debug!(
            "Estimated {} credits for {} ({} factors)",
            result.credits,
            request.service,
            result.breakdown.len()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, PricingRule, ServiceKind};
    use crate::notifications::EventBus;
    use crate::test_support::{dec, InMemoryRepositories};

    fn video_rule() -> PricingRule {
        PricingRule::new(ServiceKind::TextToVideo, 10)
            .with_resolution("1080p", dec("1.5"))
            .with_duration(crate::domain::pricing::DurationBucket::Short, dec("1"))
    }

    fn service(repos: Arc<InMemoryRepositories>) -> (PricingService, Arc<EventBus>) {
        let bus = Arc::new(EventBus::new());
        let service = PricingService::new(repos, Arc::new(PricingRuleStore::default()), bus.clone());
        (service, bus)
    }

    #[tokio::test]
    async fn refresh_loads_rules_and_notifies() {
        let repos = Arc::new(InMemoryRepositories::with_rules(vec![
            video_rule(),
            PricingRule::new(ServiceKind::TextToImage, 4),
        ]));
        let (service, bus) = service(repos);
        let mut subscriber = bus.subscribe();

        assert_eq!(service.refresh().await.unwrap(), 2);
        assert_eq!(service.snapshot().len(), 2);

        let message = subscriber.try_recv().expect("refresh event");
        assert_eq!(message.event.event_type(), "pricing_rules_refreshed");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let repos = Arc::new(InMemoryRepositories::with_rules(vec![video_rule()]));
        let (service, _bus) = service(repos.clone());
        service.refresh().await.unwrap();

        repos.set_rules(vec![video_rule(), video_rule()]);
        let err = service.refresh().await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(service.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn estimate_uses_current_snapshot() {
        let repos = Arc::new(InMemoryRepositories::with_rules(vec![video_rule()]));
        let (service, _bus) = service(repos);
        service.refresh().await.unwrap();

        let request = CostEstimateRequest::new(ServiceKind::TextToVideo)
            .with_resolution("1080p")
            .with_duration(dec("5"));
        assert_eq!(service.estimate(&request).unwrap().credits, 15);
    }

    #[tokio::test]
    async fn estimate_for_unconfigured_service_is_not_found() {
        let repos = Arc::new(InMemoryRepositories::with_rules(vec![video_rule()]));
        let (service, _bus) = service(repos);
        service.refresh().await.unwrap();

        let request = CostEstimateRequest::new(ServiceKind::ImageEnhancement);
        assert!(matches!(
            service.estimate(&request),
            Err(DomainError::NotFound { .. })
        ));
    }
}
