//! Vision domain
//!
//! Acuity tests per eye in decimal notation (1.0 = 20/20), paired with eye
//! exercise sessions. An eyeglass prescription may be supplied as context.

use super::analyzer::{
    ContextRule, DomainAnalyzer, DomainProfile, RecommendationTemplate, Rule, WeeklyMinimum,
};
use crate::trend::{Polarity, TrendConfig};
use crate::types::{Dated, Domain, Priority, RecommendationKind, Timed};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Decimal acuity below which vision is considered impaired
pub const LOW_ACUITY: f64 = 0.5;
/// Dryness level (0-10) at which dry eye is flagged
pub const DRY_EYE_LEVEL: u8 = 7;
/// Prescriptions older than this should be renewed
pub const PRESCRIPTION_MAX_AGE_DAYS: i64 = 365;
/// Sphere magnitude (diopters) treated as high myopia or hyperopia
pub const HIGH_REFRACTIVE_ERROR: f64 = 6.0;

pub const TREND: TrendConfig =
    TrendConfig::new(0.1, Polarity::HigherIsBetter).with_fluctuation_band(0.05);

/// One vision test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionTest {
    pub recorded_at: DateTime<Utc>,
    pub left_acuity: Option<f64>,
    pub right_acuity: Option<f64>,
    /// Self-reported dryness (0-10)
    #[serde(default)]
    pub dryness_level: u8,
    /// `Some(false)` when a colour plate test was failed
    #[serde(default)]
    pub color_vision_normal: Option<bool>,
}

impl Dated for VisionTest {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Eye exercise or screen break session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EyeExerciseSession {
    pub started_at: DateTime<Utc>,
    pub duration_minutes: f64,
}

impl Dated for EyeExerciseSession {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Timed for EyeExerciseSession {
    fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }
}

/// Current eyeglass or contact lens prescription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EyePrescription {
    pub issued_at: DateTime<Utc>,
    /// Spherical correction in diopters
    #[serde(default)]
    pub left_sphere: Option<f64>,
    #[serde(default)]
    pub right_sphere: Option<f64>,
}

impl EyePrescription {
    pub fn has_high_refractive_error(&self) -> bool {
        [self.left_sphere, self.right_sphere]
            .into_iter()
            .flatten()
            .any(|sphere| sphere.abs() >= HIGH_REFRACTIVE_ERROR)
    }
}

pub type VisionAnalyzer = DomainAnalyzer<VisionTest, EyeExerciseSession, EyePrescription>;

pub fn profile() -> DomainProfile<VisionTest, EyeExerciseSession, EyePrescription> {
    let mut profile = DomainProfile::new(Domain::Vision, TREND, |test: &VisionTest| {
        [test.left_acuity, test.right_acuity]
            .into_iter()
            .flatten()
            .collect()
    });

    profile.frequency = Some(WeeklyMinimum {
        minimum_per_week: 2,
        template: RecommendationTemplate {
            kind: RecommendationKind::TestingFrequency,
            priority: Priority::Medium,
            description: "Increase vision test frequency",
            action_items: &[
                "Check your vision twice a week",
                "Test at the same distance and lighting",
            ],
        },
    });

    profile.severity = vec![Rule {
        applies: |test: &VisionTest| {
            [test.left_acuity, test.right_acuity]
                .into_iter()
                .flatten()
                .any(|acuity| acuity < LOW_ACUITY)
        },
        template: RecommendationTemplate {
            kind: RecommendationKind::Remediation,
            priority: Priority::High,
            description: "Reduced visual acuity detected",
            action_items: &[
                "Schedule an eye examination",
                "Avoid driving at night until checked",
                "Follow the 20-20-20 rule during screen work",
            ],
        },
    }];

    profile.conditions = vec![
        Rule {
            applies: |test: &VisionTest| test.dryness_level >= DRY_EYE_LEVEL,
            template: RecommendationTemplate {
                kind: RecommendationKind::Condition,
                priority: Priority::High,
                description: "Signs of dry eye",
                action_items: &[
                    "Use preservative-free lubricating drops",
                    "Blink deliberately during screen work",
                    "Run a humidifier in dry rooms",
                ],
            },
        },
        Rule {
            applies: |test: &VisionTest| test.color_vision_normal == Some(false),
            template: RecommendationTemplate {
                kind: RecommendationKind::Condition,
                priority: Priority::High,
                description: "Colour vision test failed",
                action_items: &[
                    "Confirm the result with an optometrist",
                    "Retest under natural daylight",
                ],
            },
        },
    ];

    profile.engagement = Some(WeeklyMinimum {
        minimum_per_week: 3,
        template: RecommendationTemplate {
            kind: RecommendationKind::Engagement,
            priority: Priority::Medium,
            description: "Do more eye exercises",
            action_items: &[
                "Practise focus-shifting exercises 3 times a week",
                "Take a screen break every hour",
            ],
        },
    });

    profile.context_rules = vec![
        ContextRule {
            applies: |prescription: &EyePrescription, now: DateTime<Utc>| {
                now - prescription.issued_at > Duration::days(PRESCRIPTION_MAX_AGE_DAYS)
            },
            template: RecommendationTemplate {
                kind: RecommendationKind::FollowUp,
                priority: Priority::Medium,
                description: "Your prescription is more than a year old",
                action_items: &["Book a refraction test", "Bring your current glasses along"],
            },
        },
        ContextRule {
            applies: |prescription: &EyePrescription, _| prescription.has_high_refractive_error(),
            template: RecommendationTemplate {
                kind: RecommendationKind::FollowUp,
                priority: Priority::High,
                description: "High prescription strength needs a yearly retinal check",
                action_items: &[
                    "Book a dilated retinal examination",
                    "Seek care promptly for flashes, floaters or a shadow in vision",
                ],
            },
        },
    ];

    profile
}

pub fn analyzer() -> VisionAnalyzer {
    DomainAnalyzer::new(profile())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrendDirection;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
    }

    fn test_at(days_ago: i64, left: f64, right: f64) -> VisionTest {
        VisionTest {
            recorded_at: now() - Duration::days(days_ago),
            left_acuity: Some(left),
            right_acuity: Some(right),
            dryness_level: 2,
            color_vision_normal: Some(true),
        }
    }

    #[test]
    fn test_low_acuity_and_stale_prescription() {
        let tests = vec![test_at(3, 0.8, 0.7), test_at(1, 0.4, 0.7)];
        let prescription = EyePrescription {
            issued_at: now() - Duration::days(500),
            left_sphere: Some(-1.25),
            right_sphere: Some(-1.0),
        };

        let report = analyzer().analyze(&tests, &[], Some(&prescription), now());
        let kinds: Vec<_> = report.recommendations.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationKind::Remediation,
                RecommendationKind::Engagement,
                RecommendationKind::FollowUp,
            ]
        );
    }

    #[test]
    fn test_fresh_prescription_is_quiet() {
        let prescription = EyePrescription {
            issued_at: now() - Duration::days(30),
            left_sphere: None,
            right_sphere: None,
        };
        let report = analyzer().analyze(&[test_at(0, 1.0, 1.0)], &[], Some(&prescription), now());
        assert!(report
            .recommendations
            .iter()
            .all(|r| r.kind != RecommendationKind::FollowUp));
    }

    #[test]
    fn test_strong_prescription_needs_retinal_check() {
        let prescription = EyePrescription {
            issued_at: now() - Duration::days(30),
            left_sphere: Some(-2.0),
            right_sphere: Some(-6.5),
        };
        let report = analyzer().analyze(&[test_at(0, 1.0, 1.0)], &[], Some(&prescription), now());

        let follow_up: Vec<_> = report
            .recommendations
            .iter()
            .filter(|r| r.kind == RecommendationKind::FollowUp)
            .collect();
        assert_eq!(follow_up.len(), 1);
        assert_eq!(follow_up[0].priority, Priority::High);
    }

    #[test]
    fn test_improving_acuity() {
        let tests = vec![
            test_at(20, 0.5, 0.5),
            test_at(15, 0.5, 0.5),
            test_at(10, 0.9, 0.9),
            test_at(5, 0.9, 0.9),
        ];
        let summary = analyzer().summarize(&tests, &[], now());
        // older = [0.5], recent mean = 0.7
        assert_eq!(summary.trend, TrendDirection::Improving);
    }
}
