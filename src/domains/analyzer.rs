//! Generic domain analyzer
//!
//! One algorithm serves all eight biometric domains. Each domain supplies a
//! [`DomainProfile`]: how to pull numbers out of its test records, how to
//! classify their trend, and the rule table that turns a summary into
//! recommendations.

use crate::error::EngineError;
use crate::trend::{classify_windowed, mean, TrendConfig, DEFAULT_RECENCY_WINDOW};
use crate::types::{
    Dated, Domain, DomainReport, DomainSummary, Priority, Recommendation, RecommendationKind,
    Timed, TrendDirection,
};
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Length of the "this week" window in days
pub const WEEK_DAYS: i64 = 7;

/// How the pooled metric values collapse into `average_metric`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Mean,
    /// Most common value; ties go to the most recently seen value
    Mode,
}

/// Static recommendation text
#[derive(Debug, Clone, Copy)]
pub struct RecommendationTemplate {
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub description: &'static str,
    pub action_items: &'static [&'static str],
}

impl RecommendationTemplate {
    pub fn to_recommendation(&self) -> Recommendation {
        Recommendation {
            kind: self.kind,
            priority: self.priority,
            description: self.description.to_string(),
            action_items: self.action_items.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Rule evaluated against the latest record of a collection
pub struct Rule<R> {
    pub applies: fn(&R) -> bool,
    pub template: RecommendationTemplate,
}

/// Rule evaluated against caller-supplied context at a point in time
pub struct ContextRule<C> {
    pub applies: fn(&C, DateTime<Utc>) -> bool,
    pub template: RecommendationTemplate,
}

/// Fires when fewer than `minimum_per_week` records fall in the last 7 days
pub struct WeeklyMinimum {
    pub minimum_per_week: usize,
    pub template: RecommendationTemplate,
}

/// Per-domain configuration table
pub struct DomainProfile<T, S, C = ()> {
    pub domain: Domain,
    pub trend: TrendConfig,
    pub recency_window: usize,
    pub aggregation: Aggregation,
    /// Primary metric values of one test; multi-valued fields are flattened
    pub metric: fn(&T) -> Vec<f64>,
    pub frequency: Option<WeeklyMinimum>,
    pub severity: Vec<Rule<T>>,
    pub conditions: Vec<Rule<T>>,
    pub engagement: Option<WeeklyMinimum>,
    pub session_rules: Vec<Rule<S>>,
    pub context_rules: Vec<ContextRule<C>>,
}

impl<T, S, C> DomainProfile<T, S, C> {
    /// Profile with no rules and the default recency window
    pub fn new(domain: Domain, trend: TrendConfig, metric: fn(&T) -> Vec<f64>) -> Self {
        Self {
            domain,
            trend,
            recency_window: DEFAULT_RECENCY_WINDOW,
            aggregation: Aggregation::Mean,
            metric,
            frequency: None,
            severity: Vec::new(),
            conditions: Vec::new(),
            engagement: None,
            session_rules: Vec::new(),
            context_rules: Vec::new(),
        }
    }
}

/// JSON input accepted by [`DomainAnalyzer::analyze_json`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>, S: Deserialize<'de>, C: Deserialize<'de>"))]
pub struct DomainInput<T, S, C = ()> {
    #[serde(default)]
    pub tests: Vec<T>,
    #[serde(default)]
    pub sessions: Vec<S>,
    #[serde(default)]
    pub context: Option<C>,
}

/// Summarizer plus recommendation engine for one domain
pub struct DomainAnalyzer<T, S, C = ()> {
    profile: DomainProfile<T, S, C>,
}

impl<T, S, C> DomainAnalyzer<T, S, C>
where
    T: Dated,
    S: Timed,
{
    pub fn new(profile: DomainProfile<T, S, C>) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &DomainProfile<T, S, C> {
        &self.profile
    }

    /// Summarize a domain's tests and sessions as of `now`
    pub fn summarize(&self, tests: &[T], sessions: &[S], now: DateTime<Utc>) -> DomainSummary {
        let tests = sorted_by_date(tests);
        let sessions = sorted_by_date(sessions);

        if tests.is_empty() && sessions.is_empty() {
            return DomainSummary::empty(now);
        }

        let per_test: Vec<Vec<f64>> = tests.iter().map(|t| (self.profile.metric)(*t)).collect();

        let pooled: Vec<f64> = per_test.iter().flatten().copied().collect();
        let average_metric = if pooled.is_empty() {
            None
        } else {
            Some(match self.profile.aggregation {
                Aggregation::Mean => mean(&pooled),
                Aggregation::Mode => mode(&pooled),
            })
        };

        // Tests without any metric value are not usable samples
        let series: Vec<f64> = per_test
            .iter()
            .filter(|values| !values.is_empty())
            .map(|values| mean(values))
            .collect();
        let trend = if series.len() < 2 {
            TrendDirection::Stable
        } else {
            classify_windowed(&series, self.profile.recency_window, &self.profile.trend)
        };

        let last_record_date = tests.last().map(|t| t.recorded_at());

        let session_frequency = if sessions.is_empty() {
            None
        } else {
            Some(count_this_week(&sessions, now))
        };

        let average_session_duration = if sessions.is_empty() {
            None
        } else {
            let durations: Vec<f64> = sessions.iter().map(|s| s.duration_minutes()).collect();
            Some(mean(&durations))
        };

        let next_test_due = last_record_date
            .map(|date| date + Duration::days(1))
            .unwrap_or(now);

        let summary = DomainSummary {
            last_record_date,
            average_metric,
            trend,
            session_frequency,
            average_session_duration,
            tests_this_week: count_this_week(&tests, now),
            next_test_due,
        };

        debug!(
            domain = %self.profile.domain,
            tests = tests.len(),
            sessions = sessions.len(),
            trend = ?summary.trend,
            "domain summarized"
        );

        summary
    }

    /// Evaluate the rule table in its fixed order.
    ///
    /// Rules are independent; the output keeps evaluation order.
    pub fn recommend(
        &self,
        summary: &DomainSummary,
        latest_test: Option<&T>,
        latest_session: Option<&S>,
        context: Option<&C>,
        now: DateTime<Utc>,
    ) -> Vec<Recommendation> {
        let profile = &self.profile;
        let mut recommendations = Vec::new();

        if let Some(rule) = &profile.frequency {
            if summary.tests_this_week < rule.minimum_per_week {
                recommendations.push(rule.template.to_recommendation());
            }
        }

        if let Some(test) = latest_test {
            for rule in profile.severity.iter().chain(profile.conditions.iter()) {
                if (rule.applies)(test) {
                    recommendations.push(rule.template.to_recommendation());
                }
            }
        }

        if let Some(rule) = &profile.engagement {
            if summary.session_frequency.unwrap_or(0) < rule.minimum_per_week {
                recommendations.push(rule.template.to_recommendation());
            }
        }

        if let Some(session) = latest_session {
            for rule in &profile.session_rules {
                if (rule.applies)(session) {
                    recommendations.push(rule.template.to_recommendation());
                }
            }
        }

        if let Some(context) = context {
            for rule in &profile.context_rules {
                if (rule.applies)(context, now) {
                    recommendations.push(rule.template.to_recommendation());
                }
            }
        }

        recommendations
    }

    /// Summarize and recommend in one pass
    pub fn analyze(
        &self,
        tests: &[T],
        sessions: &[S],
        context: Option<&C>,
        now: DateTime<Utc>,
    ) -> DomainReport {
        let summary = self.summarize(tests, sessions, now);
        let latest_test = latest(tests);
        let latest_session = latest(sessions);
        let recommendations = self.recommend(&summary, latest_test, latest_session, context, now);

        DomainReport {
            domain: self.profile.domain,
            generated_at: now,
            summary,
            recommendations,
        }
    }

    /// Parse a [`DomainInput`] document and analyze it
    pub fn analyze_json(&self, json: &str, now: DateTime<Utc>) -> Result<DomainReport, EngineError>
    where
        T: DeserializeOwned,
        S: DeserializeOwned,
        C: DeserializeOwned,
    {
        let input: DomainInput<T, S, C> = serde_json::from_str(json)?;
        Ok(self.analyze(&input.tests, &input.sessions, input.context.as_ref(), now))
    }
}

/// Stable ascending sort by date; ties keep input order
fn sorted_by_date<R: Dated>(records: &[R]) -> Vec<&R> {
    let mut sorted: Vec<&R> = records.iter().collect();
    sorted.sort_by_key(|r| r.recorded_at());
    sorted
}

/// Most recent record; among equal dates the later input wins
fn latest<R: Dated>(records: &[R]) -> Option<&R> {
    sorted_by_date(records).last().copied()
}

fn count_this_week<R: Dated>(records: &[&R], now: DateTime<Utc>) -> usize {
    let week_ago = now - Duration::days(WEEK_DAYS);
    records
        .iter()
        .filter(|r| {
            let at = r.recorded_at();
            at >= week_ago && at <= now
        })
        .count()
}

fn mode(values: &[f64]) -> f64 {
    // (value, count, last index seen)
    let mut counts: Vec<(f64, usize, usize)> = Vec::new();
    for (index, &value) in values.iter().enumerate() {
        match counts.iter_mut().find(|(v, _, _)| (*v - value).abs() < f64::EPSILON) {
            Some(entry) => {
                entry.1 += 1;
                entry.2 = index;
            }
            None => counts.push((value, 1, index)),
        }
    }

    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.2.cmp(&b.2)))
        .map(|(value, _, _)| value)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::Polarity;
    use chrono::TimeZone;

    struct Reading {
        at: DateTime<Utc>,
        value: Option<f64>,
        flagged: bool,
    }

    impl Dated for Reading {
        fn recorded_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    struct Practice {
        at: DateTime<Utc>,
        minutes: f64,
    }

    impl Dated for Practice {
        fn recorded_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    impl Timed for Practice {
        fn duration_minutes(&self) -> f64 {
            self.minutes
        }
    }

    const FREQUENCY: RecommendationTemplate = RecommendationTemplate {
        kind: RecommendationKind::TestingFrequency,
        priority: Priority::Medium,
        description: "test more",
        action_items: &["a"],
    };
    const SEVERE: RecommendationTemplate = RecommendationTemplate {
        kind: RecommendationKind::Remediation,
        priority: Priority::High,
        description: "too low",
        action_items: &["b", "c"],
    };
    const FLAGGED: RecommendationTemplate = RecommendationTemplate {
        kind: RecommendationKind::Condition,
        priority: Priority::High,
        description: "flagged",
        action_items: &["d"],
    };
    const ENGAGE: RecommendationTemplate = RecommendationTemplate {
        kind: RecommendationKind::Engagement,
        priority: Priority::Medium,
        description: "practice more",
        action_items: &["e"],
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> DateTime<Utc> {
        now() - Duration::days(days)
    }

    fn analyzer() -> DomainAnalyzer<Reading, Practice> {
        let mut profile = DomainProfile::new(
            Domain::Tactile,
            TrendConfig::new(5.0, Polarity::HigherIsBetter),
            |r: &Reading| r.value.into_iter().collect(),
        );
        profile.frequency = Some(WeeklyMinimum {
            minimum_per_week: 2,
            template: FREQUENCY,
        });
        profile.severity.push(Rule {
            applies: |r: &Reading| r.value.is_some_and(|v| v < 40.0),
            template: SEVERE,
        });
        profile.conditions.push(Rule {
            applies: |r: &Reading| r.flagged,
            template: FLAGGED,
        });
        profile.engagement = Some(WeeklyMinimum {
            minimum_per_week: 3,
            template: ENGAGE,
        });
        DomainAnalyzer::new(profile)
    }

    fn reading(days: i64, value: f64) -> Reading {
        Reading {
            at: days_ago(days),
            value: Some(value),
            flagged: false,
        }
    }

    #[test]
    fn test_empty_inputs_give_default_summary() {
        let report = analyzer().analyze(&[], &[], None, now());

        assert_eq!(report.summary, DomainSummary::empty(now()));
        let kinds: Vec<_> = report.recommendations.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![RecommendationKind::TestingFrequency, RecommendationKind::Engagement]
        );
    }

    #[test]
    fn test_summary_sorts_and_averages() {
        let tests = vec![reading(1, 80.0), reading(10, 60.0), reading(3, 70.0)];
        let sessions = vec![
            Practice { at: days_ago(2), minutes: 20.0 },
            Practice { at: days_ago(30), minutes: 40.0 },
        ];

        let summary = analyzer().summarize(&tests, &sessions, now());

        assert_eq!(summary.last_record_date, Some(days_ago(1)));
        assert_eq!(summary.average_metric, Some(70.0));
        assert_eq!(summary.tests_this_week, 2);
        assert_eq!(summary.session_frequency, Some(1));
        assert_eq!(summary.average_session_duration, Some(30.0));
        assert_eq!(summary.next_test_due, days_ago(1) + Duration::days(1));
        // older = [60], recent = [60, 70, 80]
        assert_eq!(summary.trend, TrendDirection::Improving);
    }

    #[test]
    fn test_single_usable_sample_is_stable() {
        let tests = vec![
            reading(2, 10.0),
            Reading { at: days_ago(1), value: None, flagged: false },
        ];
        let summary = analyzer().summarize(&tests, &[], now());
        assert_eq!(summary.trend, TrendDirection::Stable);
        assert_eq!(summary.average_metric, Some(10.0));
    }

    #[test]
    fn test_rules_co_occur_in_fixed_order() {
        let tests = vec![Reading {
            at: days_ago(1),
            value: Some(20.0),
            flagged: true,
        }];
        let report = analyzer().analyze(&tests, &[], None, now());

        let descriptions: Vec<_> = report
            .recommendations
            .iter()
            .map(|r| r.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["test more", "too low", "flagged", "practice more"]);
    }

    #[test]
    fn test_rules_use_latest_test_only() {
        let tests = vec![reading(1, 90.0), reading(5, 10.0)];
        let report = analyzer().analyze(&tests, &[], None, now());
        assert!(report
            .recommendations
            .iter()
            .all(|r| r.kind != RecommendationKind::Remediation));
    }

    #[test]
    fn test_mode_prefers_most_recent_on_tie() {
        assert_eq!(mode(&[1.0, 2.0, 2.0, 1.0]), 1.0);
        assert_eq!(mode(&[3.0, 3.0, 1.0]), 3.0);
    }
}
