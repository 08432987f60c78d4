//! Credit cost estimation
//!
//! [`estimate`] is a pure function of a request and the rule for its
//! service. Unknown option labels never fail; they act as a ×1 multiplier.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use super::model::{DurationBucket, PricingRule, ServiceKind};

/// Options a user picked for one generation
#[derive(Debug, Clone, PartialEq)]
pub struct CostEstimateRequest {
    pub service: ServiceKind,
    pub resolution: Option<String>,
    /// Video length in seconds. Ignored for image services.
    pub duration_seconds: Option<Decimal>,
    /// Output size label. Ignored for video services.
    pub size: Option<String>,
}

impl CostEstimateRequest {
    pub fn new(service: ServiceKind) -> Self {
        Self {
            service,
            resolution: None,
            duration_seconds: None,
            size: None,
        }
    }

    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    pub fn with_duration(mut self, seconds: Decimal) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }
}

/// One factor that changed the cost, in application order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum AppliedFactor {
    Resolution { label: String, multiplier: Decimal },
    Duration { bucket: DurationBucket, multiplier: Decimal },
    /// `seconds / 5`, applied to every video estimate.
    DurationScale { seconds: Decimal, factor: Decimal },
    Size { label: String, multiplier: Decimal },
}

impl AppliedFactor {
    pub fn category(&self) -> &'static str {
        match self {
            Self::Resolution { .. } => "resolution",
            Self::Duration { .. } => "duration",
            Self::DurationScale { .. } => "duration_scale",
            Self::Size { .. } => "size",
        }
    }

    /// The option key that matched (resolution/size label, bucket, or seconds).
    pub fn key(&self) -> String {
        match self {
            Self::Resolution { label, .. } | Self::Size { label, .. } => label.clone(),
            Self::Duration { bucket, .. } => bucket.label().to_string(),
            Self::DurationScale { seconds, .. } => seconds.normalize().to_string(),
        }
    }

    pub fn value(&self) -> Decimal {
        match self {
            Self::Resolution { multiplier, .. }
            | Self::Duration { multiplier, .. }
            | Self::Size { multiplier, .. } => *multiplier,
            Self::DurationScale { factor, .. } => *factor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimateResult {
    /// Always at least 1.
    pub credits: u64,
    pub breakdown: Vec<AppliedFactor>,
}

impl CostEstimateResult {
    /// Category labels of the applied factors, e.g. `["resolution", "duration_scale"]`.
    pub fn categories(&self) -> Vec<&'static str> {
        self.breakdown.iter().map(AppliedFactor::category).collect()
    }
}

/// Estimate the credit cost of `request` under `rule`.
///
/// `rule` is expected to be the rule configured for `request.service`.
/// For video services the cost is scaled by `duration / 5` and rounded up
/// right there; the final ceiling and the 1-credit floor apply afterwards.
pub fn estimate(request: &CostEstimateRequest, rule: &PricingRule) -> CostEstimateResult {
    let mut cost = Decimal::from(rule.base_cost);
    let mut breakdown = Vec::new();

    if let Some(label) = request.resolution.as_deref() {
        if let Some(multiplier) = rule.resolution_multiplier(label) {
            cost = scale(cost, multiplier);
            breakdown.push(AppliedFactor::Resolution {
                label: label.to_string(),
                multiplier,
            });
        }
    }

    if request.service.is_video() {
        let seconds = request
            .duration_seconds
            .unwrap_or_else(|| Decimal::from(DurationBucket::REFERENCE_SECONDS));
        let bucket = DurationBucket::classify(seconds);

        if let Some(multiplier) = rule.duration_multiplier(bucket) {
            cost = scale(cost, multiplier);
            breakdown.push(AppliedFactor::Duration { bucket, multiplier });
        }

        let reference = Decimal::from(DurationBucket::REFERENCE_SECONDS);
        cost = (scale(cost, seconds) / reference).ceil();
        breakdown.push(AppliedFactor::DurationScale {
            seconds,
            factor: seconds / reference,
        });
    } else if let Some(label) = request.size.as_deref() {
        if let Some(multiplier) = rule.size_multiplier(label) {
            cost = scale(cost, multiplier);
            breakdown.push(AppliedFactor::Size {
                label: label.to_string(),
                multiplier,
            });
        }
    }

    let credits = cost.ceil().max(Decimal::ONE).to_u64().unwrap_or(u64::MAX);

    CostEstimateResult { credits, breakdown }
}

/// Multiply, saturating instead of panicking on overflow.
fn scale(cost: Decimal, by: Decimal) -> Decimal {
    cost.checked_mul(by).unwrap_or_else(|| {
        if cost.is_sign_negative() != by.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn video_rule() -> PricingRule {
        PricingRule::new(ServiceKind::TextToVideo, 10)
            .with_resolution("1080p", dec("1.5"))
            .with_duration(DurationBucket::Short, dec("1"))
    }

    fn image_rule() -> PricingRule {
        PricingRule::new(ServiceKind::TextToImage, 4)
            .with_resolution("hd", dec("1.5"))
            .with_size("portrait", dec("1.25"))
    }

    #[test]
    fn short_video_at_1080p() {
        let req = CostEstimateRequest::new(ServiceKind::TextToVideo)
            .with_resolution("1080p")
            .with_duration(dec("5"));
        let result = estimate(&req, &video_rule());
        assert_eq!(result.credits, 15);
        assert_eq!(result.categories(), vec!["resolution", "duration", "duration_scale"]);
    }

    #[test]
    fn medium_video_without_bucket_multiplier() {
        // 10 × 1.5 × 12/5 = 36, no medium entry
        let req = CostEstimateRequest::new(ServiceKind::TextToVideo)
            .with_resolution("1080p")
            .with_duration(dec("12"));
        let result = estimate(&req, &video_rule());
        assert_eq!(result.credits, 36);
        assert_eq!(result.categories(), vec!["resolution", "duration_scale"]);
    }

    #[test]
    fn video_cost_is_rounded_up_after_duration_scaling() {
        // 3 × 1.1 = 3.3 → scaled by 7/5 = 4.62 → ceil 5
        let rule = PricingRule::new(ServiceKind::ImageToVideo, 3)
            .with_duration(DurationBucket::Medium, dec("1.1"));
        let req = CostEstimateRequest::new(ServiceKind::ImageToVideo).with_duration(dec("7"));
        assert_eq!(estimate(&req, &rule).credits, 5);
    }

    #[test]
    fn unmatched_keys_return_ceiling_of_base_cost() {
        let req = CostEstimateRequest::new(ServiceKind::TextToImage)
            .with_resolution("8k")
            .with_size("panorama");
        let result = estimate(&req, &image_rule());
        assert_eq!(result.credits, 4);
        assert!(result.breakdown.is_empty());

        let req = CostEstimateRequest::new(ServiceKind::TextToVideo)
            .with_resolution("480p")
            .with_duration(dec("5"));
        let rule = PricingRule::new(ServiceKind::TextToVideo, 10);
        assert_eq!(estimate(&req, &rule).credits, 10);
    }

    #[test]
    fn zero_base_cost_is_clamped_to_one_credit() {
        let rule = PricingRule::new(ServiceKind::ImageEnhancement, 0);
        let req = CostEstimateRequest::new(ServiceKind::ImageEnhancement);
        assert_eq!(estimate(&req, &rule).credits, 1);
    }

    #[test]
    fn image_size_multiplier_applies() {
        // 4 × 1.5 × 1.25 = 7.5 → 8
        let req = CostEstimateRequest::new(ServiceKind::TextToImage)
            .with_resolution("hd")
            .with_size("portrait");
        let result = estimate(&req, &image_rule());
        assert_eq!(result.credits, 8);
        assert_eq!(result.categories(), vec!["resolution", "size"]);
    }

    #[test]
    fn size_is_ignored_for_video_and_duration_for_images() {
        let mut rule = video_rule();
        rule.size_multipliers = Some([("square".to_string(), dec("3"))].into());
        let req = CostEstimateRequest::new(ServiceKind::TextToVideo)
            .with_duration(dec("5"))
            .with_size("square");
        assert_eq!(estimate(&req, &rule).credits, 10);

        let req = CostEstimateRequest::new(ServiceKind::TextToImage).with_duration(dec("60"));
        assert_eq!(estimate(&req, &image_rule()).credits, 4);
    }

    #[test]
    fn duration_scaling_happens_without_bucket_match() {
        let rule = PricingRule::new(ServiceKind::TextToVideo, 10);
        let req = CostEstimateRequest::new(ServiceKind::TextToVideo).with_duration(dec("20"));
        let result = estimate(&req, &rule);
        assert_eq!(result.credits, 40);
        assert_eq!(
            result.breakdown,
            vec![AppliedFactor::DurationScale {
                seconds: dec("20"),
                factor: dec("4"),
            }]
        );
    }

    #[test]
    fn missing_video_duration_uses_reference_unit() {
        let req = CostEstimateRequest::new(ServiceKind::TextToVideo).with_resolution("1080p");
        assert_eq!(estimate(&req, &video_rule()).credits, 15);
    }

    #[test]
    fn estimate_is_idempotent() {
        let req = CostEstimateRequest::new(ServiceKind::TextToVideo)
            .with_resolution("1080p")
            .with_duration(dec("10"));
        let rule = video_rule();
        assert_eq!(estimate(&req, &rule), estimate(&req, &rule));
    }

    #[test]
    fn raising_a_multiplier_never_lowers_the_cost() {
        let req = CostEstimateRequest::new(ServiceKind::TextToVideo)
            .with_resolution("1080p")
            .with_duration(dec("9"));
        let mut previous = 0;
        for step in 1..=20 {
            let m = Decimal::new(step, 1); // 0.1 .. 2.0
            let rule = PricingRule::new(ServiceKind::TextToVideo, 7)
                .with_resolution("1080p", m)
                .with_duration(DurationBucket::Medium, m);
            let credits = estimate(&req, &rule).credits;
            assert!(credits >= previous, "credits dropped at multiplier {}", m);
            previous = credits;
        }
    }

    #[test]
    fn bucket_boundaries_select_the_matching_multiplier() {
        let rule = PricingRule::new(ServiceKind::TextToVideo, 10)
            .with_duration(DurationBucket::Short, dec("1"))
            .with_duration(DurationBucket::Medium, dec("2"))
            .with_duration(DurationBucket::Long, dec("3"));
        let bucket_of = |secs: &str| {
            let req = CostEstimateRequest::new(ServiceKind::TextToVideo).with_duration(dec(secs));
            estimate(&req, &rule)
                .breakdown
                .iter()
                .find_map(|f| match f {
                    AppliedFactor::Duration { bucket, .. } => Some(*bucket),
                    _ => None,
                })
        };
        assert_eq!(bucket_of("5"), Some(DurationBucket::Short));
        assert_eq!(bucket_of("5.0001"), Some(DurationBucket::Medium));
        assert_eq!(bucket_of("15"), Some(DurationBucket::Medium));
        assert_eq!(bucket_of("15.0001"), Some(DurationBucket::Long));
    }

    #[test]
    fn huge_multipliers_saturate_instead_of_panicking() {
        let rule = PricingRule::new(ServiceKind::TextToImage, u32::MAX)
            .with_resolution("x", Decimal::MAX)
            .with_size("y", Decimal::MAX);
        let req = CostEstimateRequest::new(ServiceKind::TextToImage)
            .with_resolution("x")
            .with_size("y");
        assert_eq!(estimate(&req, &rule).credits, u64::MAX);
    }

    #[test]
    fn factor_accessors() {
        let factor = AppliedFactor::DurationScale {
            seconds: dec("12.50"),
            factor: dec("2.5"),
        };
        assert_eq!(factor.category(), "duration_scale");
        assert_eq!(factor.key(), "12.5");
        assert_eq!(factor.value(), dec("2.5"));
    }
}
