//! Sleep domain
//!
//! Nightly sleep records scored 0-100, paired with wind-down sessions
//! (sleep music, relaxation audio).

use super::analyzer::{DomainAnalyzer, DomainProfile, RecommendationTemplate, Rule, WeeklyMinimum};
use crate::trend::{Polarity, TrendConfig};
use crate::types::{Dated, Domain, Priority, RecommendationKind, Timed};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum healthy sleep duration in hours
pub const MIN_SLEEP_HOURS: f64 = 6.0;
/// Quality score below which a night counts as poor
pub const POOR_QUALITY_SCORE: f64 = 50.0;
/// Awakenings per night that count as fragmented sleep
pub const FREQUENT_AWAKENINGS: u32 = 3;

pub const TREND: TrendConfig =
    TrendConfig::new(5.0, Polarity::HigherIsBetter).with_fluctuation_band(2.0);

/// One night of sleep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepNight {
    pub recorded_at: DateTime<Utc>,
    /// Total sleep duration in hours
    pub duration_hours: Option<f64>,
    /// Quality score (0-100)
    pub quality_score: Option<f64>,
    /// Times woken during the night
    #[serde(default)]
    pub awakenings: u32,
    /// Snoring or suspected apnea events reported for the night
    #[serde(default)]
    pub breathing_disturbance: bool,
}

impl Dated for SleepNight {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Wind-down session before bed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindDownSession {
    pub started_at: DateTime<Utc>,
    pub duration_minutes: f64,
}

impl Dated for WindDownSession {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Timed for WindDownSession {
    fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }
}

pub type SleepAnalyzer = DomainAnalyzer<SleepNight, WindDownSession>;

pub fn profile() -> DomainProfile<SleepNight, WindDownSession> {
    let mut profile = DomainProfile::new(Domain::Sleep, TREND, |night: &SleepNight| {
        night.quality_score.into_iter().collect()
    });

    profile.frequency = Some(WeeklyMinimum {
        minimum_per_week: 3,
        template: RecommendationTemplate {
            kind: RecommendationKind::TestingFrequency,
            priority: Priority::Medium,
            description: "Track your sleep more consistently",
            action_items: &[
                "Log at least 3 nights per week",
                "Keep your tracker charged before bed",
            ],
        },
    });

    profile.severity = vec![
        Rule {
            applies: |night: &SleepNight| night.duration_hours.is_some_and(|h| h < MIN_SLEEP_HOURS),
            template: RecommendationTemplate {
                kind: RecommendationKind::Remediation,
                priority: Priority::High,
                description: "Sleep duration is below the healthy minimum",
                action_items: &[
                    "Move bedtime 30 minutes earlier",
                    "Keep a fixed wake-up time, including weekends",
                    "Avoid caffeine after 2 PM",
                ],
            },
        },
        Rule {
            applies: |night: &SleepNight| {
                night.quality_score.is_some_and(|q| q < POOR_QUALITY_SCORE)
            },
            template: RecommendationTemplate {
                kind: RecommendationKind::Remediation,
                priority: Priority::High,
                description: "Sleep quality is poor",
                action_items: &[
                    "Keep the bedroom dark, quiet and cool",
                    "Stop using screens an hour before bed",
                    "Limit alcohol in the evening",
                ],
            },
        },
    ];

    profile.conditions = vec![
        Rule {
            applies: |night: &SleepNight| night.breathing_disturbance,
            template: RecommendationTemplate {
                kind: RecommendationKind::Condition,
                priority: Priority::High,
                description: "Breathing disturbances detected during sleep",
                action_items: &[
                    "Discuss a sleep apnea screening with your doctor",
                    "Try sleeping on your side",
                ],
            },
        },
        Rule {
            applies: |night: &SleepNight| night.awakenings >= FREQUENT_AWAKENINGS,
            template: RecommendationTemplate {
                kind: RecommendationKind::Condition,
                priority: Priority::Medium,
                description: "Sleep is fragmented by frequent awakenings",
                action_items: &[
                    "Stop drinking fluids two hours before bed",
                    "Keep the room temperature between 16 and 19 degrees",
                ],
            },
        },
    ];

    profile.engagement = Some(WeeklyMinimum {
        minimum_per_week: 3,
        template: RecommendationTemplate {
            kind: RecommendationKind::Engagement,
            priority: Priority::Medium,
            description: "Build a wind-down routine",
            action_items: &[
                "Play a relaxation track at least 3 evenings per week",
                "Pair it with dimmed lights",
            ],
        },
    });

    profile
}

pub fn analyzer() -> SleepAnalyzer {
    DomainAnalyzer::new(profile())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrendDirection;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap()
    }

    fn night(days_ago: i64, hours: f64, quality: f64) -> SleepNight {
        SleepNight {
            recorded_at: now() - Duration::days(days_ago),
            duration_hours: Some(hours),
            quality_score: Some(quality),
            awakenings: 1,
            breathing_disturbance: false,
        }
    }

    #[test]
    fn test_short_night_triggers_remediation() {
        let nights = vec![night(3, 7.5, 80.0), night(2, 7.0, 75.0), night(1, 5.0, 70.0)];
        let report = analyzer().analyze(&nights, &[], None, now());

        assert!(report
            .recommendations
            .iter()
            .any(|r| r.description.contains("below the healthy minimum")));
        assert!(report
            .recommendations
            .iter()
            .all(|r| r.kind != RecommendationKind::TestingFrequency));
    }

    #[test]
    fn test_declining_quality() {
        let nights: Vec<_> = (0..10)
            .map(|i| night(10 - i, 7.0, if i < 5 { 85.0 } else { 60.0 }))
            .collect();
        let summary = analyzer().summarize(&nights, &[], now());
        assert_eq!(summary.trend, TrendDirection::Declining);
    }

    #[test]
    fn test_breathing_disturbance_condition() {
        let mut latest = night(0, 7.5, 85.0);
        latest.breathing_disturbance = true;
        let report = analyzer().analyze(&[latest], &[], None, now());
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.kind == RecommendationKind::Condition && r.priority == Priority::High));
    }

    #[test]
    fn test_frequent_awakenings_condition() {
        let mut latest = night(0, 7.5, 85.0);
        latest.awakenings = FREQUENT_AWAKENINGS;
        let report = analyzer().analyze(&[night(1, 7.5, 80.0), latest], &[], None, now());

        let condition = report
            .recommendations
            .iter()
            .find(|r| r.kind == RecommendationKind::Condition)
            .expect("awakenings condition");
        assert_eq!(condition.priority, Priority::Medium);
        assert!(condition.description.contains("awakenings"));
    }

    #[test]
    fn test_quality_swing_near_deadband_is_fluctuating() {
        let scores = [50.0, 65.0, 65.0, 50.0, 50.0, 50.0];
        let nights: Vec<_> = scores
            .iter()
            .enumerate()
            .map(|(i, q)| night(6 - i as i64, 7.0, *q))
            .collect();
        let summary = analyzer().summarize(&nights, &[], now());

        // recent five average 56 against 50, but the second half is lower
        assert_eq!(summary.trend, TrendDirection::Fluctuating);
        assert_eq!(summary.average_metric, Some(55.0));
    }
}
