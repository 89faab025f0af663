//! Journaling domain
//!
//! Journal entries carry categorical stress and mood levels. Stress is mapped
//! to an ordinal (0 = low .. 3 = very high) and summarized by its most common
//! value. Sessions are meditation practices.

use super::analyzer::{
    Aggregation, DomainAnalyzer, DomainProfile, RecommendationTemplate, Rule, WeeklyMinimum,
};
use crate::trend::{Polarity, TrendConfig};
use crate::types::{Dated, Domain, Priority, RecommendationKind, Timed};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TREND: TrendConfig = TrendConfig::new(0.2, Polarity::LowerIsBetter);

/// Self-reported stress level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl StressLevel {
    pub fn ordinal(&self) -> f64 {
        match self {
            StressLevel::Low => 0.0,
            StressLevel::Moderate => 1.0,
            StressLevel::High => 2.0,
            StressLevel::VeryHigh => 3.0,
        }
    }

    /// High or very high
    pub fn is_elevated(&self) -> bool {
        *self >= StressLevel::High
    }
}

/// Self-reported mood
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodLevel {
    VeryLow,
    Low,
    Neutral,
    Good,
    Great,
}

/// One journal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub recorded_at: DateTime<Utc>,
    pub stress: Option<StressLevel>,
    pub mood: Option<MoodLevel>,
}

impl Dated for JournalEntry {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Meditation practice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeditationSession {
    pub started_at: DateTime<Utc>,
    pub duration_minutes: f64,
}

impl Dated for MeditationSession {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Timed for MeditationSession {
    fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }
}

pub type JournalAnalyzer = DomainAnalyzer<JournalEntry, MeditationSession>;

pub fn profile() -> DomainProfile<JournalEntry, MeditationSession> {
    let mut profile = DomainProfile::new(Domain::Journal, TREND, |entry: &JournalEntry| {
        entry.stress.map(|s| s.ordinal()).into_iter().collect()
    });
    profile.aggregation = Aggregation::Mode;

    profile.frequency = Some(WeeklyMinimum {
        minimum_per_week: 3,
        template: RecommendationTemplate {
            kind: RecommendationKind::TestingFrequency,
            priority: Priority::Medium,
            description: "Journal more regularly",
            action_items: &[
                "Write at least 3 entries per week",
                "Set an evening reminder",
            ],
        },
    });

    profile.severity = vec![Rule {
        applies: |entry: &JournalEntry| entry.stress.is_some_and(|s| s.is_elevated()),
        template: RecommendationTemplate {
            kind: RecommendationKind::Remediation,
            priority: Priority::High,
            description: "Stress levels are high",
            action_items: &[
                "Practise box breathing for 5 minutes",
                "Take a walk outdoors",
                "Talk to someone you trust",
                "Consider speaking with a counsellor",
            ],
        },
    }];

    profile.conditions = vec![Rule {
        applies: |entry: &JournalEntry| entry.mood == Some(MoodLevel::VeryLow),
        template: RecommendationTemplate {
            kind: RecommendationKind::Condition,
            priority: Priority::High,
            description: "Mood is very low",
            action_items: &[
                "Reach out to a friend or family member today",
                "Contact a mental health professional if this persists",
            ],
        },
    }];

    profile.engagement = Some(WeeklyMinimum {
        minimum_per_week: 3,
        template: RecommendationTemplate {
            kind: RecommendationKind::Engagement,
            priority: Priority::Medium,
            description: "Meditate more often",
            action_items: &["Meditate for 10 minutes at least 3 times a week"],
        },
    });

    profile
}

pub fn analyzer() -> JournalAnalyzer {
    DomainAnalyzer::new(profile())
}
