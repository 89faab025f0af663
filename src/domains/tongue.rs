//! Tongue and taste domain
//!
//! Taste scores (0-100) with coating and dryness observations from tongue
//! checks, paired with oral care sessions.

use super::analyzer::{DomainAnalyzer, DomainProfile, RecommendationTemplate, Rule, WeeklyMinimum};
use crate::trend::{Polarity, TrendConfig};
use crate::types::{Dated, Domain, Priority, RecommendationKind, Timed};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const LOW_TASTE_SCORE: f64 = 50.0;

pub const TREND: TrendConfig =
    TrendConfig::new(5.0, Polarity::HigherIsBetter).with_fluctuation_band(2.0);

/// Observed tongue coating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoatingLevel {
    #[default]
    None,
    Thin,
    Thick,
}

/// One tongue / taste check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TongueTest {
    pub recorded_at: DateTime<Utc>,
    /// Combined taste identification score (0-100)
    pub taste_score: Option<f64>,
    #[serde(default)]
    pub coating: CoatingLevel,
    #[serde(default)]
    pub dryness: bool,
}

impl Dated for TongueTest {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Oral care session (brushing, scraping, hydration routine)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OralCareSession {
    pub started_at: DateTime<Utc>,
    pub duration_minutes: f64,
}

impl Dated for OralCareSession {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Timed for OralCareSession {
    fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }
}

pub type TongueAnalyzer = DomainAnalyzer<TongueTest, OralCareSession>;

pub fn profile() -> DomainProfile<TongueTest, OralCareSession> {
    let mut profile = DomainProfile::new(Domain::Tongue, TREND, |test: &TongueTest| {
        test.taste_score.into_iter().collect()
    });

    profile.frequency = Some(WeeklyMinimum {
        minimum_per_week: 2,
        template: RecommendationTemplate {
            kind: RecommendationKind::TestingFrequency,
            priority: Priority::Medium,
            description: "Check your tongue and taste more often",
            action_items: &[
                "Do a taste check twice a week before breakfast",
                "Photograph your tongue in daylight",
            ],
        },
    });

    profile.severity = vec![Rule {
        applies: |test: &TongueTest| test.taste_score.is_some_and(|s| s < LOW_TASTE_SCORE),
        template: RecommendationTemplate {
            kind: RecommendationKind::Remediation,
            priority: Priority::High,
            description: "Taste perception is reduced",
            action_items: &[
                "Check zinc intake",
                "Review medications that may dull taste",
                "See a doctor if the loss came on suddenly",
            ],
        },
    }];

    profile.conditions = vec![
        Rule {
            applies: |test: &TongueTest| test.coating == CoatingLevel::Thick,
            template: RecommendationTemplate {
                kind: RecommendationKind::Condition,
                priority: Priority::High,
                description: "Thick tongue coating observed",
                action_items: &[
                    "Scrape your tongue every morning",
                    "Drink more water through the day",
                    "Cut back on sugar and dairy",
                ],
            },
        },
        Rule {
            applies: |test: &TongueTest| test.dryness,
            template: RecommendationTemplate {
                kind: RecommendationKind::Condition,
                priority: Priority::High,
                description: "Dry mouth reported",
                action_items: &[
                    "Sip water regularly",
                    "Use alcohol-free mouthwash",
                ],
            },
        },
    ];

    profile.engagement = Some(WeeklyMinimum {
        minimum_per_week: 3,
        template: RecommendationTemplate {
            kind: RecommendationKind::Engagement,
            priority: Priority::Medium,
            description: "Log your oral care routine",
            action_items: &["Record at least 3 oral care sessions per week"],
        },
    });

    profile
}

pub fn analyzer() -> TongueAnalyzer {
    DomainAnalyzer::new(profile())
}
