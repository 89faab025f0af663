//! Medical test domain
//!
//! Blood panels and home measurements tracked by total cholesterol (lower is
//! better), with lipid, vitamin D and fasting glucose checks. Sessions are
//! follow-up visits; there is no weekly visit target.

use super::analyzer::{DomainAnalyzer, DomainProfile, RecommendationTemplate, Rule, WeeklyMinimum};
use crate::trend::{Polarity, TrendConfig};
use crate::types::{Dated, Domain, Priority, RecommendationKind, Timed};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// mg/dL
pub const HIGH_CHOLESTEROL: f64 = 200.0;
/// ng/mL
pub const LOW_VITAMIN_D: f64 = 30.0;
/// mg/dL, fasting
pub const HIGH_FASTING_GLUCOSE: f64 = 125.0;
/// mg/dL
pub const HIGH_LDL: f64 = 160.0;
/// mg/dL
pub const LOW_HDL: f64 = 40.0;

pub const TREND: TrendConfig = TrendConfig::new(5.0, Polarity::LowerIsBetter);

/// Blood test results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodTest {
    pub recorded_at: DateTime<Utc>,
    /// Total cholesterol (mg/dL)
    pub total_cholesterol: Option<f64>,
    /// LDL cholesterol (mg/dL)
    #[serde(default)]
    pub ldl: Option<f64>,
    /// HDL cholesterol (mg/dL)
    #[serde(default)]
    pub hdl: Option<f64>,
    /// 25-hydroxy vitamin D (ng/mL)
    pub vitamin_d: Option<f64>,
    /// Fasting glucose (mg/dL)
    pub fasting_glucose: Option<f64>,
}

impl BloodTest {
    pub fn has_high_cholesterol(&self) -> bool {
        self.total_cholesterol.is_some_and(|c| c > HIGH_CHOLESTEROL)
    }

    pub fn has_low_vitamin_d(&self) -> bool {
        self.vitamin_d.is_some_and(|d| d < LOW_VITAMIN_D)
    }
}

impl Dated for BloodTest {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Follow-up visit with a clinician
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUpVisit {
    pub visited_at: DateTime<Utc>,
    pub duration_minutes: f64,
}

impl Dated for FollowUpVisit {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.visited_at
    }
}

impl Timed for FollowUpVisit {
    fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }
}

pub type MedicalAnalyzer = DomainAnalyzer<BloodTest, FollowUpVisit>;

pub fn profile() -> DomainProfile<BloodTest, FollowUpVisit> {
    let mut profile = DomainProfile::new(Domain::Medical, TREND, |test: &BloodTest| {
        test.total_cholesterol.into_iter().collect()
    });

    profile.frequency = Some(WeeklyMinimum {
        minimum_per_week: 2,
        template: RecommendationTemplate {
            kind: RecommendationKind::TestingFrequency,
            priority: Priority::Medium,
            description: "Upload your latest lab results",
            action_items: &[
                "Log a home measurement or lab result at least twice a week",
                "Add new blood test results as soon as they arrive",
                "Ask your clinic for a digital copy",
            ],
        },
    });

    profile.severity = vec![
        Rule {
            applies: BloodTest::has_high_cholesterol,
            template: RecommendationTemplate {
                kind: RecommendationKind::Remediation,
                priority: Priority::High,
                description: "Total cholesterol is above 200 mg/dL",
                action_items: &[
                    "Reduce saturated fat intake",
                    "Add soluble fibre such as oats and beans",
                    "Exercise 150 minutes per week",
                    "Discuss lipid management with your doctor",
                ],
            },
        },
        Rule {
            applies: BloodTest::has_low_vitamin_d,
            template: RecommendationTemplate {
                kind: RecommendationKind::Remediation,
                priority: Priority::High,
                description: "Vitamin D is low",
                action_items: &[
                    "Get 15 minutes of midday sunlight",
                    "Ask about vitamin D3 supplementation",
                ],
            },
        },
        Rule {
            applies: |test: &BloodTest| {
                test.fasting_glucose.is_some_and(|g| g > HIGH_FASTING_GLUCOSE)
            },
            template: RecommendationTemplate {
                kind: RecommendationKind::Remediation,
                priority: Priority::High,
                description: "Fasting glucose is in the diabetic range",
                action_items: &[
                    "Book an HbA1c test",
                    "Limit refined carbohydrates and sugary drinks",
                    "Walk for 10 minutes after meals",
                ],
            },
        },
    ];

    profile.conditions = vec![
        Rule {
            applies: |test: &BloodTest| test.ldl.is_some_and(|ldl| ldl > HIGH_LDL),
            template: RecommendationTemplate {
                kind: RecommendationKind::Remediation,
                priority: Priority::Medium,
                description: "LDL cholesterol is above 160 mg/dL",
                action_items: &[
                    "Replace butter and fatty meat with olive oil and fish",
                    "Ask your doctor whether a statin is appropriate",
                ],
            },
        },
        Rule {
            applies: |test: &BloodTest| test.hdl.is_some_and(|hdl| hdl < LOW_HDL),
            template: RecommendationTemplate {
                kind: RecommendationKind::Remediation,
                priority: Priority::Medium,
                description: "HDL cholesterol is below 40 mg/dL",
                action_items: &[
                    "Add aerobic exercise on most days",
                    "Stop smoking if you smoke",
                ],
            },
        },
    ];

    profile
}

pub fn analyzer() -> MedicalAnalyzer {
    DomainAnalyzer::new(profile())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrendDirection;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap()
    }

    fn panel(days_ago: i64, cholesterol: f64) -> BloodTest {
        BloodTest {
            recorded_at: now() - Duration::days(days_ago),
            total_cholesterol: Some(cholesterol),
            ldl: None,
            hdl: None,
            vitamin_d: Some(35.0),
            fasting_glucose: Some(90.0),
        }
    }

    #[test]
    fn test_no_engagement_rule() {
        let report = analyzer().analyze(&[], &[], None, now());
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(
            report.recommendations[0].kind,
            RecommendationKind::TestingFrequency
        );
    }

    #[test]
    fn test_cholesterol_trend_and_alert() {
        let tests = vec![panel(300, 240.0), panel(200, 230.0), panel(2, 210.0)];
        let report = analyzer().analyze(&tests, &[], None, now());

        // older = [240], recent mean = 226.67
        assert_eq!(report.summary.trend, TrendDirection::Improving);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.description.contains("cholesterol")));
    }

    #[test]
    fn test_single_upload_this_week_is_below_target() {
        let report = analyzer().analyze(&[panel(3, 180.0)], &[], None, now());
        let kinds: Vec<_> = report.recommendations.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![RecommendationKind::TestingFrequency]);

        let report = analyzer().analyze(&[panel(5, 180.0), panel(1, 178.0)], &[], None, now());
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_lipid_conditions_follow_severity() {
        let mut latest = panel(1, 190.0);
        latest.ldl = Some(172.0);
        latest.hdl = Some(36.0);
        latest.vitamin_d = Some(20.0);
        let report = analyzer().analyze(&[panel(4, 195.0), latest], &[], None, now());

        let descriptions: Vec<&str> = report
            .recommendations
            .iter()
            .map(|r| r.description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            vec![
                "Vitamin D is low",
                "LDL cholesterol is above 160 mg/dL",
                "HDL cholesterol is below 40 mg/dL",
            ]
        );
    }

    #[test]
    fn test_no_band_means_no_fluctuation() {
        let readings = [50.0, 65.0, 65.0, 50.0, 50.0, 50.0];
        let tests: Vec<BloodTest> = readings
            .iter()
            .enumerate()
            .map(|(i, c)| panel(60 - 10 * i as i64, *c))
            .collect();
        let summary = analyzer().summarize(&tests, &[], now());

        // windowed diff +6 without a band: a rise in cholesterol
        assert_eq!(summary.trend, TrendDirection::Declining);
    }
}
