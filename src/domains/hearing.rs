//! Hearing domain
//!
//! Pure-tone threshold tests per ear (dB HL, higher means worse hearing),
//! paired with auditory training / music listening sessions.

use super::analyzer::{DomainAnalyzer, DomainProfile, RecommendationTemplate, Rule, WeeklyMinimum};
use crate::trend::{Polarity, TrendConfig};
use crate::types::{Dated, Domain, Priority, RecommendationKind, Timed};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Threshold above which hearing loss is suspected (dB HL)
pub const HEARING_LOSS_THRESHOLD_DB: f64 = 25.0;
/// Average listening volume considered unsafe (dB SPL)
pub const SAFE_LISTENING_DB: f64 = 85.0;

pub const TREND: TrendConfig = TrendConfig::new(5.0, Polarity::LowerIsBetter);

/// Result for a single ear
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EarResult {
    /// Average hearing threshold (dB HL)
    pub threshold: Option<f64>,
    #[serde(default)]
    pub tinnitus: bool,
}

/// One hearing test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HearingTest {
    pub recorded_at: DateTime<Utc>,
    #[serde(default)]
    pub left_ear: EarResult,
    #[serde(default)]
    pub right_ear: EarResult,
}

impl HearingTest {
    fn ears(&self) -> [&EarResult; 2] {
        [&self.left_ear, &self.right_ear]
    }
}

impl Dated for HearingTest {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Listening or auditory training session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListeningSession {
    pub started_at: DateTime<Utc>,
    pub duration_minutes: f64,
    /// Average playback volume (dB SPL)
    pub average_volume_db: Option<f64>,
}

impl Dated for ListeningSession {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Timed for ListeningSession {
    fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }
}

pub type HearingAnalyzer = DomainAnalyzer<HearingTest, ListeningSession>;

pub fn profile() -> DomainProfile<HearingTest, ListeningSession> {
    let mut profile = DomainProfile::new(Domain::Hearing, TREND, |test: &HearingTest| {
        test.ears().iter().filter_map(|ear| ear.threshold).collect()
    });

    profile.frequency = Some(WeeklyMinimum {
        minimum_per_week: 2,
        template: RecommendationTemplate {
            kind: RecommendationKind::TestingFrequency,
            priority: Priority::Medium,
            description: "Increase hearing test frequency",
            action_items: &[
                "Run a hearing check at least twice a week",
                "Test in a quiet room with the same headphones",
            ],
        },
    });

    profile.severity = vec![Rule {
        applies: |test: &HearingTest| {
            test.ears()
                .iter()
                .any(|ear| ear.threshold.is_some_and(|t| t > HEARING_LOSS_THRESHOLD_DB))
        },
        template: RecommendationTemplate {
            kind: RecommendationKind::Remediation,
            priority: Priority::High,
            description: "Possible hearing loss detected",
            action_items: &[
                "Book an appointment with an audiologist",
                "Limit exposure to loud environments",
                "Wear hearing protection at concerts and on noisy commutes",
                "Keep headphone volume below 60%",
            ],
        },
    }];

    profile.conditions = vec![Rule {
        applies: |test: &HearingTest| test.ears().iter().any(|ear| ear.tinnitus),
        template: RecommendationTemplate {
            kind: RecommendationKind::Condition,
            priority: Priority::High,
            description: "Tinnitus reported",
            action_items: &[
                "Mention the ringing to your doctor",
                "Use low-level background sound at night",
                "Reduce caffeine and alcohol",
            ],
        },
    }];

    profile.engagement = Some(WeeklyMinimum {
        minimum_per_week: 3,
        template: RecommendationTemplate {
            kind: RecommendationKind::Engagement,
            priority: Priority::Medium,
            description: "Increase auditory training sessions",
            action_items: &[
                "Do 3 short listening exercises per week",
                "Alternate between speech-in-noise and tone exercises",
            ],
        },
    });

    profile.session_rules = vec![Rule {
        applies: |session: &ListeningSession| {
            session
                .average_volume_db
                .is_some_and(|v| v > SAFE_LISTENING_DB)
        },
        template: RecommendationTemplate {
            kind: RecommendationKind::Safety,
            priority: Priority::High,
            description: "Listening volume is above the safe level",
            action_items: &[
                "Lower playback volume",
                "Use noise-cancelling headphones instead of turning it up",
            ],
        },
    }];

    profile
}

pub fn analyzer() -> HearingAnalyzer {
    DomainAnalyzer::new(profile())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrendDirection;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap()
    }

    fn test_at(days_ago: i64, left: f64, right: f64) -> HearingTest {
        HearingTest {
            recorded_at: now() - Duration::days(days_ago),
            left_ear: EarResult {
                threshold: Some(left),
                tinnitus: false,
            },
            right_ear: EarResult {
                threshold: Some(right),
                tinnitus: false,
            },
        }
    }

    #[test]
    fn test_right_ear_loss_emits_high_priority() {
        let tests = vec![test_at(0, 15.0, 30.0)];
        let report = analyzer().analyze(&tests, &[], None, now());

        let loss = report
            .recommendations
            .iter()
            .find(|r| r.description.contains("hearing loss"))
            .expect("hearing loss recommendation");
        assert_eq!(loss.priority, Priority::High);
        assert!(loss.action_items.len() >= 3);
    }

    #[test]
    fn test_thresholds_are_pooled_across_ears() {
        let tests = vec![test_at(2, 10.0, 20.0), test_at(1, 20.0, 30.0)];
        let summary = analyzer().summarize(&tests, &[], now());
        assert_eq!(summary.average_metric, Some(20.0));
    }

    #[test]
    fn test_rising_threshold_is_declining() {
        let tests = vec![
            test_at(8, 10.0, 10.0),
            test_at(6, 10.0, 10.0),
            test_at(4, 20.0, 20.0),
            test_at(2, 25.0, 25.0),
            test_at(1, 25.0, 25.0),
        ];
        let summary = analyzer().summarize(&tests, &[], now());
        assert_eq!(summary.trend, TrendDirection::Declining);
    }

    #[test]
    fn test_threshold_swing_without_band_keeps_direction() {
        let thresholds = [50.0, 65.0, 65.0, 50.0, 50.0, 50.0];
        let tests: Vec<_> = thresholds
            .iter()
            .enumerate()
            .map(|(i, db)| test_at(12 - 2 * i as i64, *db, *db))
            .collect();
        let summary = analyzer().summarize(&tests, &[], now());

        // same swing that fluctuates for sleep; hearing has no band
        assert_eq!(summary.trend, TrendDirection::Declining);
    }

    #[test]
    fn test_loud_session_and_tinnitus() {
        let mut test = test_at(0, 10.0, 10.0);
        test.left_ear.tinnitus = true;
        let session = ListeningSession {
            started_at: now() - Duration::hours(3),
            duration_minutes: 45.0,
            average_volume_db: Some(92.0),
        };

        let report = analyzer().analyze(&[test], &[session], None, now());
        let kinds: Vec<_> = report.recommendations.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationKind::TestingFrequency,
                RecommendationKind::Condition,
                RecommendationKind::Engagement,
                RecommendationKind::Safety,
            ]
        );
    }
}
