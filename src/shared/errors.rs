use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// No pricing rule is configured for the given service.
    pub fn rule_not_found(service: impl std::fmt::Display) -> Self {
        DomainError::NotFound {
            entity: "PricingRule",
            field: "service",
            value: service.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<InfraError> for DomainError {
    fn from(e: InfraError) -> Self {
        DomainError::Storage(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metrics recorder error: {0}")]
    Metrics(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_not_found_names_the_service() {
        let err = DomainError::rule_not_found("text_to_video");
        assert_eq!(
            err.to_string(),
            "Not found: PricingRule with service=text_to_video"
        );
    }

    #[test]
    fn infra_error_maps_to_storage() {
        let infra = InfraError::Database(sea_orm::DbErr::Custom("boom".into()));
        let domain: DomainError = infra.into();
        assert!(matches!(domain, DomainError::Storage(msg) if msg.contains("boom")));
    }
}
