//! Tactile sensation domain
//!
//! Touch sensitivity tests (0-100) with numbness and pain flags, paired with
//! vitality sessions such as massage or sensory stimulation exercises.

use super::analyzer::{DomainAnalyzer, DomainProfile, RecommendationTemplate, Rule, WeeklyMinimum};
use crate::trend::{Polarity, TrendConfig};
use crate::types::{Dated, Domain, Priority, RecommendationKind, Timed};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const LOW_SENSITIVITY: f64 = 40.0;
/// Pain level (0-10) at which a pain recommendation is raised
pub const SEVERE_PAIN_LEVEL: u8 = 7;

pub const TREND: TrendConfig =
    TrendConfig::new(5.0, Polarity::HigherIsBetter).with_fluctuation_band(2.0);

/// One touch sensitivity test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TactileTest {
    pub recorded_at: DateTime<Utc>,
    /// Sensitivity score (0-100)
    pub sensitivity_score: Option<f64>,
    /// Body region tested (e.g. "left hand")
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub numbness: bool,
    /// Pain level (0-10)
    #[serde(default)]
    pub pain_level: u8,
}

impl Dated for TactileTest {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Vitality / stimulation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalitySession {
    pub started_at: DateTime<Utc>,
    pub duration_minutes: f64,
    #[serde(default)]
    pub activity: Option<String>,
}

impl Dated for VitalitySession {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Timed for VitalitySession {
    fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }
}

pub type TactileAnalyzer = DomainAnalyzer<TactileTest, VitalitySession>;

pub fn profile() -> DomainProfile<TactileTest, VitalitySession> {
    let mut profile = DomainProfile::new(Domain::Tactile, TREND, |test: &TactileTest| {
        test.sensitivity_score.into_iter().collect()
    });

    profile.frequency = Some(WeeklyMinimum {
        minimum_per_week: 2,
        template: RecommendationTemplate {
            kind: RecommendationKind::TestingFrequency,
            priority: Priority::Medium,
            description: "Increase touch sensitivity testing",
            action_items: &[
                "Test twice a week on the same body region",
                "Note room temperature when testing",
            ],
        },
    });

    profile.severity = vec![Rule {
        applies: |test: &TactileTest| test.sensitivity_score.is_some_and(|s| s < LOW_SENSITIVITY),
        template: RecommendationTemplate {
            kind: RecommendationKind::Remediation,
            priority: Priority::High,
            description: "Touch sensitivity is low",
            action_items: &[
                "Ask your doctor about a neuropathy check",
                "Check blood sugar and vitamin B12 levels",
                "Practise daily texture discrimination exercises",
            ],
        },
    }];

    profile.conditions = vec![
        Rule {
            applies: |test: &TactileTest| test.numbness,
            template: RecommendationTemplate {
                kind: RecommendationKind::Condition,
                priority: Priority::High,
                description: "Numbness reported",
                action_items: &[
                    "Seek medical advice if numbness persists for more than a few days",
                    "Avoid prolonged pressure on the affected area",
                ],
            },
        },
        Rule {
            applies: |test: &TactileTest| test.pain_level >= SEVERE_PAIN_LEVEL,
            template: RecommendationTemplate {
                kind: RecommendationKind::Condition,
                priority: Priority::High,
                description: "Severe pain reported",
                action_items: &[
                    "Rest the affected area",
                    "Consult a doctor about pain management",
                    "Apply cold packs for acute pain",
                ],
            },
        },
    ];

    profile.engagement = Some(WeeklyMinimum {
        minimum_per_week: 3,
        template: RecommendationTemplate {
            kind: RecommendationKind::Engagement,
            priority: Priority::Medium,
            description: "Increase vitality sessions",
            action_items: &[
                "Schedule 3 massage or stimulation sessions per week",
                "Keep sessions between 10 and 20 minutes",
            ],
        },
    });

    profile
}

pub fn analyzer() -> TactileAnalyzer {
    DomainAnalyzer::new(profile())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 12, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_numbness_and_pain_are_independent() {
        let test = TactileTest {
            recorded_at: now() - Duration::days(1),
            sensitivity_score: Some(35.0),
            region: Some("left foot".to_string()),
            numbness: true,
            pain_level: 8,
        };
        let sessions: Vec<_> = (0..3)
            .map(|i| VitalitySession {
                started_at: now() - Duration::days(i),
                duration_minutes: 15.0,
                activity: None,
            })
            .collect();

        let report = analyzer().analyze(&[test], &sessions, None, now());
        let descriptions: Vec<_> = report
            .recommendations
            .iter()
            .map(|r| r.description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            vec![
                "Increase touch sensitivity testing",
                "Touch sensitivity is low",
                "Numbness reported",
                "Severe pain reported",
            ]
        );
        assert_eq!(report.summary.session_frequency, Some(3));
        assert_eq!(report.summary.average_session_duration, Some(15.0));
    }
}
