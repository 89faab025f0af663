//! Biometric domain analyzers
//!
//! Each domain module defines its record types and a [`DomainProfile`]
//! describing thresholds, polarity and recommendation text. The shared
//! [`DomainAnalyzer`] runs the same summarize → classify → recommend pipeline
//! for all of them.

pub mod analyzer;
pub mod cognitive;
pub mod hearing;
pub mod journal;
pub mod medical;
pub mod sleep;
pub mod tactile;
pub mod tongue;
pub mod vision;

pub use analyzer::{
    Aggregation, ContextRule, DomainAnalyzer, DomainInput, DomainProfile, RecommendationTemplate,
    Rule, WeeklyMinimum,
};

use crate::error::EngineError;
use crate::types::{Domain, DomainReport};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

/// Analyze a [`DomainInput`] JSON document for the given domain.
///
/// # Example
/// ```ignore
/// let report = analyze_domain_json(Domain::Hearing, r#"{"tests": [], "sessions": []}"#, Utc::now())?;
/// ```
pub fn analyze_domain_json(
    domain: Domain,
    json: &str,
    now: DateTime<Utc>,
) -> Result<DomainReport, EngineError> {
    let report = match domain {
        Domain::Sleep => sleep::analyzer().analyze_json(json, now),
        Domain::Hearing => hearing::analyzer().analyze_json(json, now),
        Domain::Vision => vision::analyzer().analyze_json(json, now),
        Domain::Tactile => tactile::analyzer().analyze_json(json, now),
        Domain::Tongue => tongue::analyzer().analyze_json(json, now),
        Domain::Cognitive => cognitive::analyzer().analyze_json(json, now),
        Domain::Journal => journal::analyzer().analyze_json(json, now),
        Domain::Medical => medical::analyzer().analyze_json(json, now),
    }?;

    info!(
        domain = %domain,
        recommendations = report.recommendations.len(),
        "domain report generated"
    );

    Ok(report)
}

/// Analyze every domain present in an object keyed by domain name.
///
/// Domains missing from the document still get a report built from empty
/// input, so callers always receive all eight in [`Domain::ALL`] order.
pub fn analyze_all_json(json: &str, now: DateTime<Utc>) -> Result<Vec<DomainReport>, EngineError> {
    let document: Value = serde_json::from_str(json)?;
    let object = document
        .as_object()
        .ok_or_else(|| EngineError::ParseError("expected an object keyed by domain".to_string()))?;

    for key in object.keys() {
        key.parse::<Domain>()?;
    }

    Domain::ALL
        .iter()
        .map(|domain| {
            let section = object
                .get(domain.as_str())
                .map(|value| value.to_string())
                .unwrap_or_else(|| "{}".to_string());
            analyze_domain_json(*domain, &section, now)
        })
        .collect()
}
