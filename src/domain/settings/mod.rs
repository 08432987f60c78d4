//! Application settings
//!
//! Durable key-value storage for process-wide switches.

use async_trait::async_trait;

use crate::domain::DomainResult;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self, key: &str) -> DomainResult<Option<String>>;
    /// Insert or overwrite.
    async fn put(&self, key: &str, value: &str) -> DomainResult<()>;
}
