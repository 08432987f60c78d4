//! Pricing rule domain entities

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

/// Generation service a credit cost applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    ImageEnhancement,
    TextToImage,
    TextToVideo,
    ImageToVideo,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 4] = [
        ServiceKind::ImageEnhancement,
        ServiceKind::TextToImage,
        ServiceKind::TextToVideo,
        ServiceKind::ImageToVideo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImageEnhancement => "image_enhancement",
            Self::TextToImage => "text_to_image",
            Self::TextToVideo => "text_to_video",
            Self::ImageToVideo => "image_to_video",
        }
    }

    /// Video services are billed per duration; image services per size.
    pub fn is_video(&self) -> bool {
        matches!(self, Self::TextToVideo | Self::ImageToVideo)
    }

    pub fn is_image(&self) -> bool {
        !self.is_video()
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown service: {}", s)))
    }
}

/// Duration tier of a video request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationBucket {
    Short,
    Medium,
    Long,
}

impl DurationBucket {
    /// Seconds of video one unit of base cost pays for.
    pub const REFERENCE_SECONDS: i64 = 5;
    /// Upper bound (inclusive) of the medium tier.
    pub const MEDIUM_MAX_SECONDS: i64 = 15;

    pub const ALL: [DurationBucket; 3] = [Self::Short, Self::Medium, Self::Long];

    /// `d <= 5` is short, `5 < d <= 15` is medium, anything longer is long.
    pub fn classify(duration_seconds: Decimal) -> Self {
        if duration_seconds <= Decimal::from(Self::REFERENCE_SECONDS) {
            Self::Short
        } else if duration_seconds <= Decimal::from(Self::MEDIUM_MAX_SECONDS) {
            Self::Medium
        } else {
            Self::Long
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.label() == label)
    }
}

impl fmt::Display for DurationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label → multiplier lookup table
pub type MultiplierTable = BTreeMap<String, Decimal>;

/// Pricing configuration for one service.
///
/// Exactly one rule per [`ServiceKind`] is active at any time. The base cost
/// comes straight from configuration; multipliers scale it per option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    pub service: ServiceKind,
    pub base_cost: u32,
    #[serde(default)]
    pub resolution_multipliers: MultiplierTable,
    /// Keyed by [`DurationBucket`] label. Video services only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_multipliers: Option<MultiplierTable>,
    /// Keyed by size label (`square`, `portrait`, `landscape`). Image services only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_multipliers: Option<MultiplierTable>,
}

impl PricingRule {
    pub fn new(service: ServiceKind, base_cost: u32) -> Self {
        Self {
            service,
            base_cost,
            resolution_multipliers: MultiplierTable::new(),
            duration_multipliers: None,
            size_multipliers: None,
        }
    }

    pub fn with_resolution(mut self, label: impl Into<String>, multiplier: Decimal) -> Self {
        self.resolution_multipliers.insert(label.into(), multiplier);
        self
    }

    pub fn with_duration(mut self, bucket: DurationBucket, multiplier: Decimal) -> Self {
        self.duration_multipliers
            .get_or_insert_with(MultiplierTable::new)
            .insert(bucket.label().to_string(), multiplier);
        self
    }

    pub fn with_size(mut self, label: impl Into<String>, multiplier: Decimal) -> Self {
        self.size_multipliers
            .get_or_insert_with(MultiplierTable::new)
            .insert(label.into(), multiplier);
        self
    }

    pub fn resolution_multiplier(&self, label: &str) -> Option<Decimal> {
        self.resolution_multipliers.get(label).copied()
    }

    pub fn duration_multiplier(&self, bucket: DurationBucket) -> Option<Decimal> {
        self.duration_multipliers
            .as_ref()
            .and_then(|table| table.get(bucket.label()).copied())
    }

    pub fn size_multiplier(&self, label: &str) -> Option<Decimal> {
        self.size_multipliers
            .as_ref()
            .and_then(|table| table.get(label).copied())
    }

    /// Check the rule's invariants before it enters a snapshot.
    pub fn validate(&self) -> DomainResult<()> {
        check_table(self.service, "resolution", &self.resolution_multipliers)?;

        if let Some(durations) = &self.duration_multipliers {
            if self.service.is_image() {
                return Err(DomainError::Validation(format!(
                    "{}: duration multipliers are only allowed for video services",
                    self.service
                )));
            }
            check_table(self.service, "duration", durations)?;
            if let Some(label) = durations
                .keys()
                .find(|label| DurationBucket::from_label(label).is_none())
            {
                return Err(DomainError::Validation(format!(
                    "{}: unknown duration bucket '{}'",
                    self.service, label
                )));
            }
        }

        if let Some(sizes) = &self.size_multipliers {
            if self.service.is_video() {
                return Err(DomainError::Validation(format!(
                    "{}: size multipliers are only allowed for image services",
                    self.service
                )));
            }
            check_table(self.service, "size", sizes)?;
        }

        Ok(())
    }
}

fn check_table(service: ServiceKind, kind: &str, table: &MultiplierTable) -> DomainResult<()> {
    for (label, multiplier) in table {
        if label.trim().is_empty() {
            return Err(DomainError::Validation(format!(
                "{}: empty {} label",
                service, kind
            )));
        }
        if *multiplier <= Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "{}: {} multiplier for '{}' must be positive, got {}",
                service, kind, label, multiplier
            )));
        }
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn service_kind_round_trips_through_str() {
        for kind in ServiceKind::ALL {
            assert_eq!(kind.as_str().parse::<ServiceKind>().unwrap(), kind);
        }
        assert!("text_to_audio".parse::<ServiceKind>().is_err());
    }

    #[test]
    fn service_kind_serde_uses_snake_case() {
        let json = serde_json::to_string(&ServiceKind::ImageToVideo).unwrap();
        assert_eq!(json, "\"image_to_video\"");
    }

    #[test]
    fn video_and_image_services() {
        assert!(ServiceKind::TextToVideo.is_video());
        assert!(ServiceKind::ImageToVideo.is_video());
        assert!(ServiceKind::TextToImage.is_image());
        assert!(ServiceKind::ImageEnhancement.is_image());
    }

    #[test]
    fn duration_bucket_boundaries() {
        assert_eq!(DurationBucket::classify(dec("0")), DurationBucket::Short);
        assert_eq!(DurationBucket::classify(dec("5")), DurationBucket::Short);
        assert_eq!(DurationBucket::classify(dec("5.0001")), DurationBucket::Medium);
        assert_eq!(DurationBucket::classify(dec("15")), DurationBucket::Medium);
        assert_eq!(DurationBucket::classify(dec("15.0001")), DurationBucket::Long);
        assert_eq!(DurationBucket::classify(dec("60")), DurationBucket::Long);
    }

    #[test]
    fn duration_bucket_labels() {
        assert_eq!(DurationBucket::from_label("medium"), Some(DurationBucket::Medium));
        assert_eq!(DurationBucket::from_label("huge"), None);
        assert_eq!(DurationBucket::Long.to_string(), "long");
    }

    #[test]
    fn builder_fills_tables() {
        let rule = PricingRule::new(ServiceKind::TextToVideo, 10)
            .with_resolution("1080p", dec("1.5"))
            .with_duration(DurationBucket::Short, dec("1"));

        assert_eq!(rule.resolution_multiplier("1080p"), Some(dec("1.5")));
        assert_eq!(rule.resolution_multiplier("4k"), None);
        assert_eq!(rule.duration_multiplier(DurationBucket::Short), Some(dec("1")));
        assert_eq!(rule.duration_multiplier(DurationBucket::Medium), None);
        assert_eq!(rule.size_multiplier("square"), None);
    }

    #[test]
    fn validate_accepts_well_formed_rules() {
        PricingRule::new(ServiceKind::TextToVideo, 10)
            .with_resolution("720p", dec("1"))
            .with_duration(DurationBucket::Long, dec("1.2"))
            .validate()
            .unwrap();
        PricingRule::new(ServiceKind::TextToImage, 0)
            .with_size("portrait", dec("1.25"))
            .validate()
            .unwrap();
    }

    #[test]
    fn validate_rejects_non_positive_multiplier() {
        let rule = PricingRule::new(ServiceKind::TextToImage, 4).with_resolution("hd", dec("0"));
        assert!(matches!(rule.validate(), Err(DomainError::Validation(_))));

        let rule = PricingRule::new(ServiceKind::TextToImage, 4).with_size("square", dec("-1"));
        assert!(matches!(rule.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn validate_rejects_tables_on_the_wrong_service() {
        let rule = PricingRule::new(ServiceKind::ImageEnhancement, 2)
            .with_duration(DurationBucket::Short, dec("1"));
        assert!(rule.validate().is_err());

        let rule = PricingRule::new(ServiceKind::ImageToVideo, 2).with_size("square", dec("1"));
        assert!(rule.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_duration_bucket() {
        let mut rule = PricingRule::new(ServiceKind::TextToVideo, 10);
        rule.duration_multipliers = Some(MultiplierTable::from([("epic".to_string(), dec("3"))]));
        assert!(rule.validate().is_err());
    }

    #[test]
    fn rule_deserializes_numeric_multipliers() {
        let json = r#"{
            "service": "text_to_video",
            "base_cost": 10,
            "resolution_multipliers": {"1080p": 1.5},
            "duration_multipliers": {"short": 1}
        }"#;
        let rule: PricingRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.service, ServiceKind::TextToVideo);
        assert_eq!(rule.resolution_multiplier("1080p"), Some(dec("1.5")));
        assert_eq!(rule.duration_multiplier(DurationBucket::Short), Some(dec("1")));
        assert!(rule.size_multipliers.is_none());
    }
}
