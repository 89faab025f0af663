//! Cognitive domain
//!
//! Memory and attention scores (0-100) pooled per test, plus reaction time,
//! paired with brain training sessions.

use super::analyzer::{DomainAnalyzer, DomainProfile, RecommendationTemplate, Rule, WeeklyMinimum};
use crate::trend::{Polarity, TrendConfig};
use crate::types::{Dated, Domain, Priority, RecommendationKind, Timed};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const LOW_COGNITIVE_SCORE: f64 = 60.0;
pub const SLOW_REACTION_MS: f64 = 500.0;

pub const TREND: TrendConfig =
    TrendConfig::new(2.0, Polarity::HigherIsBetter).with_fluctuation_band(1.0);

/// One cognitive assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CognitiveTest {
    pub recorded_at: DateTime<Utc>,
    pub memory_score: Option<f64>,
    pub attention_score: Option<f64>,
    pub reaction_time_ms: Option<f64>,
}

impl Dated for CognitiveTest {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Brain training session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainTrainingSession {
    pub started_at: DateTime<Utc>,
    pub duration_minutes: f64,
}

impl Dated for BrainTrainingSession {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Timed for BrainTrainingSession {
    fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }
}

pub type CognitiveAnalyzer = DomainAnalyzer<CognitiveTest, BrainTrainingSession>;

pub fn profile() -> DomainProfile<CognitiveTest, BrainTrainingSession> {
    let mut profile = DomainProfile::new(Domain::Cognitive, TREND, |test: &CognitiveTest| {
        [test.memory_score, test.attention_score]
            .into_iter()
            .flatten()
            .collect()
    });

    profile.frequency = Some(WeeklyMinimum {
        minimum_per_week: 2,
        template: RecommendationTemplate {
            kind: RecommendationKind::TestingFrequency,
            priority: Priority::Medium,
            description: "Take cognitive assessments more regularly",
            action_items: &[
                "Complete an assessment twice a week",
                "Test at the same time of day",
            ],
        },
    });

    profile.severity = vec![Rule {
        applies: |test: &CognitiveTest| {
            [test.memory_score, test.attention_score]
                .into_iter()
                .flatten()
                .any(|score| score < LOW_COGNITIVE_SCORE)
        },
        template: RecommendationTemplate {
            kind: RecommendationKind::Remediation,
            priority: Priority::High,
            description: "Memory or attention scores are low",
            action_items: &[
                "Prioritise 7-9 hours of sleep",
                "Add 20 minutes of aerobic exercise daily",
                "Reduce multitasking during focused work",
            ],
        },
    }];

    profile.conditions = vec![Rule {
        applies: |test: &CognitiveTest| {
            test.reaction_time_ms.is_some_and(|ms| ms > SLOW_REACTION_MS)
        },
        template: RecommendationTemplate {
            kind: RecommendationKind::Condition,
            priority: Priority::High,
            description: "Reaction time is slow",
            action_items: &[
                "Check for fatigue or medication side effects",
                "Practise reaction drills",
            ],
        },
    }];

    profile.engagement = Some(WeeklyMinimum {
        minimum_per_week: 3,
        template: RecommendationTemplate {
            kind: RecommendationKind::Engagement,
            priority: Priority::Medium,
            description: "Train your brain more often",
            action_items: &[
                "Play 3 brain training sessions per week",
                "Mix memory, logic and attention games",
            ],
        },
    });

    profile
}

pub fn analyzer() -> CognitiveAnalyzer {
    DomainAnalyzer::new(profile())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrendDirection;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 3, 10, 0, 0).unwrap()
    }

    fn assessment(days_ago: i64, memory: f64, attention: f64) -> CognitiveTest {
        CognitiveTest {
            recorded_at: now() - Duration::days(days_ago),
            memory_score: Some(memory),
            attention_score: Some(attention),
            reaction_time_ms: Some(320.0),
        }
    }

    #[test]
    fn test_scores_pool_per_test() {
        let tests = vec![assessment(9, 70.0, 80.0), assessment(2, 90.0, 80.0)];
        let summary = analyzer().summarize(&tests, &[], now());
        assert_eq!(summary.average_metric, Some(80.0));
        // older = [75], recent = [75, 85] -> 80, diff 5
        assert_eq!(summary.trend, TrendDirection::Improving);
        assert_eq!(summary.tests_this_week, 1);
    }

    #[test]
    fn test_low_attention() {
        let report = analyzer().analyze(&[assessment(0, 85.0, 55.0)], &[], None, now());
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.kind == RecommendationKind::Remediation));
    }
}
