//! Core types shared by the domain analyzers
//!
//! This module defines the value objects that flow out of every analyzer:
//! trend directions, summaries, recommendations and the per-domain report.

use crate::error::EngineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Biometric domain identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Sleep,
    Hearing,
    Vision,
    Tactile,
    Tongue,
    Cognitive,
    Journal,
    Medical,
}

impl Domain {
    /// All domains in report order
    pub const ALL: [Domain; 8] = [
        Domain::Sleep,
        Domain::Hearing,
        Domain::Vision,
        Domain::Tactile,
        Domain::Tongue,
        Domain::Cognitive,
        Domain::Journal,
        Domain::Medical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Sleep => "sleep",
            Domain::Hearing => "hearing",
            Domain::Vision => "vision",
            Domain::Tactile => "tactile",
            Domain::Tongue => "tongue",
            Domain::Cognitive => "cognitive",
            Domain::Journal => "journal",
            Domain::Medical => "medical",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::UnknownDomain(s.to_string()))
    }
}

/// Direction of a metric over time, always derived from its source series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    #[default]
    Stable,
    Improving,
    Declining,
    Fluctuating,
}

/// Recommendation priority, ordered from least to most pressing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

/// What a recommendation is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Test more often
    TestingFrequency,
    /// Primary metric crossed a danger threshold
    Remediation,
    /// Secondary condition flag (tinnitus, numbness, pain, ...)
    Condition,
    /// Too few activity sessions this week
    Engagement,
    /// Unsafe activity (e.g. loud listening)
    Safety,
    /// Stale external context such as an eyeglass prescription
    FollowUp,
}

/// A prioritized, human-readable recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub description: String,
    pub action_items: Vec<String>,
}

/// Records that carry a measurement date
pub trait Dated {
    fn recorded_at(&self) -> DateTime<Utc>;
}

/// Session records that carry a duration
pub trait Timed: Dated {
    fn duration_minutes(&self) -> f64;
}

/// Summary of one domain's history, rebuilt on every analysis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSummary {
    /// Date of the most recent test
    pub last_record_date: Option<DateTime<Utc>>,
    /// Mean (or most common value, for ordinal domains) of the primary metric
    pub average_metric: Option<f64>,
    /// Recent-vs-older trend of the primary metric
    pub trend: TrendDirection,
    /// Sessions in the trailing 7 days
    pub session_frequency: Option<usize>,
    /// Mean session duration in minutes across all sessions
    pub average_session_duration: Option<f64>,
    /// Tests in the trailing 7 days
    pub tests_this_week: usize,
    /// When the next test should happen
    pub next_test_due: DateTime<Utc>,
}

impl DomainSummary {
    /// The "no data yet" summary
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            last_record_date: None,
            average_metric: None,
            trend: TrendDirection::Stable,
            session_frequency: None,
            average_session_duration: None,
            tests_this_week: 0,
            next_test_due: now,
        }
    }
}

/// Complete per-domain analysis output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainReport {
    pub domain: Domain,
    pub generated_at: DateTime<Utc>,
    pub summary: DomainSummary,
    pub recommendations: Vec<Recommendation>,
}
