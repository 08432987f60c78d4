//! In-memory repositories for unit tests

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{
    CreditCatalogRepository, CreditPack, CreditPricing, DomainError, DomainResult, PricingRule,
    PricingRuleRepository, RepositoryProvider, SettingsRepository,
};

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[derive(Default)]
pub struct InMemoryRepositories {
    rules: Mutex<Vec<PricingRule>>,
    packs: Mutex<Vec<CreditPack>>,
    pricing: Mutex<Vec<CreditPricing>>,
    settings: Mutex<HashMap<String, String>>,
    fail_settings_writes: AtomicBool,
}

impl InMemoryRepositories {
    pub fn with_rules(rules: Vec<PricingRule>) -> Self {
        let repos = Self::default();
        repos.set_rules(rules);
        repos
    }

    pub fn set_rules(&self, rules: Vec<PricingRule>) {
        *self.rules.lock().unwrap() = rules;
    }

    pub fn set_packs(&self, packs: Vec<CreditPack>) {
        *self.packs.lock().unwrap() = packs;
    }

    pub fn set_setting(&self, key: &str, value: &str) {
        self.settings
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn setting(&self, key: &str) -> Option<String> {
        self.settings.lock().unwrap().get(key).cloned()
    }

    pub fn fail_settings_writes(&self, fail: bool) {
        self.fail_settings_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PricingRuleRepository for InMemoryRepositories {
    async fn find_all(&self) -> DomainResult<Vec<PricingRule>> {
        Ok(self.rules.lock().unwrap().clone())
    }
}

#[async_trait]
impl CreditCatalogRepository for InMemoryRepositories {
    async fn list_active_packs(&self) -> DomainResult<Vec<CreditPack>> {
        let mut packs: Vec<_> = self
            .packs
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        packs.sort_by_key(|p| p.sort_order);
        Ok(packs)
    }

    async fn list_pricing(&self) -> DomainResult<Vec<CreditPricing>> {
        let mut rows = self.pricing.lock().unwrap().clone();
        rows.sort_by(|a, b| (&a.service, &a.tier).cmp(&(&b.service, &b.tier)));
        Ok(rows)
    }
}

#[async_trait]
impl SettingsRepository for InMemoryRepositories {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.setting(key))
    }

    async fn put(&self, key: &str, value: &str) -> DomainResult<()> {
        if self.fail_settings_writes.load(Ordering::SeqCst) {
            return Err(DomainError::Storage("settings store unavailable".into()));
        }
        self.set_setting(key, value);
        Ok(())
    }
}

impl RepositoryProvider for InMemoryRepositories {
    fn pricing_rules(&self) -> &dyn PricingRuleRepository {
        self
    }

    fn catalog(&self) -> &dyn CreditCatalogRepository {
        self
    }
}
