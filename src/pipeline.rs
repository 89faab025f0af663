//! JSON entry points
//!
//! String-in, string-out wrappers around the domain analyzers and the planner.
//! The C ABI and the CLI both go through these so they share parsing and
//! encoding behavior.

use crate::config::PlannerConfig;
use crate::domains::analyze_domain_json;
use crate::error::EngineError;
use crate::planner::{
    BaselineDietSolver, BaselineExercisePlanner, HealthSnapshot, LongTermPlan, LongTermPlanner,
    PlanDuration, Season, UrgencyLevel,
};
use crate::types::Domain;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Analyze one domain's input document and return the report as JSON.
///
/// # Arguments
/// * `domain` - Domain name (e.g. "hearing")
/// * `input_json` - `{"tests": [...], "sessions": [...], "context": ...}`
/// * `now` - Reference time for weekly counts and due dates
///
/// # Example
/// ```ignore
/// let report = analyze_domain("sleep", r#"{"tests": []}"#, Utc::now())?;
/// ```
pub fn analyze_domain(
    domain: &str,
    input_json: &str,
    now: DateTime<Utc>,
) -> Result<String, EngineError> {
    let domain: Domain = domain.parse()?;
    let report = analyze_domain_json(domain, input_json, now)?;
    encode_json(&report)
}

/// Generate a long-term plan from a health snapshot and return it as JSON.
///
/// # Arguments
/// * `snapshot_json` - Serialized [`HealthSnapshot`]
/// * `duration` - Preset name (`six_months`, `1y`, ...) or a day count
/// * `urgency` - `low`, `moderate`, `high` or `critical`
/// * `start` - Plan start date
/// * `config_json` - Optional [`PlannerConfig`] override
pub fn generate_plan(
    snapshot_json: &str,
    duration: &str,
    urgency: &str,
    start: DateTime<Utc>,
    config_json: Option<&str>,
) -> Result<String, EngineError> {
    let health = HealthSnapshot::from_json(snapshot_json)?;
    let duration: PlanDuration = duration.parse()?;
    let urgency: UrgencyLevel = urgency.parse()?;
    let planner = LongTermPlanner::new(load_config(config_json)?)?;

    let plan = planner.generate_plan(&health, duration, urgency, start);
    encode_json(&plan)
}

/// Expand a plan into daily entries with the baseline collaborators.
pub fn generate_daily_plans(
    plan_json: &str,
    snapshot_json: &str,
    season: &str,
    config_json: Option<&str>,
) -> Result<String, EngineError> {
    let plan = LongTermPlan::from_json(plan_json)?;
    let health = HealthSnapshot::from_json(snapshot_json)?;
    let season: Season = season.parse()?;
    let planner = LongTermPlanner::new(load_config(config_json)?)?;

    let days = planner.generate_daily_plans(
        &plan,
        &health,
        season,
        &BaselineDietSolver,
        &BaselineExercisePlanner,
    );
    encode_json(&days)
}

fn load_config(config_json: Option<&str>) -> Result<PlannerConfig, EngineError> {
    match config_json {
        Some(json) => PlannerConfig::from_json(json),
        None => Ok(PlannerConfig::default()),
    }
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, EngineError> {
    serde_json::to_string(value).map_err(|e| EngineError::EncodingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Value;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn snapshot_json() -> &'static str {
        r#"{
            "profile": {
                "age_years": 52,
                "sex": "female",
                "height_cm": 165.0,
                "weight_kg": 78.0
            },
            "blood_tests": [{
                "recorded_at": "2024-04-20T08:00:00Z",
                "total_cholesterol": 220.0,
                "ldl": null,
                "hdl": null,
                "vitamin_d": 41.0,
                "fasting_glucose": null
            }],
            "mental_health": [{ "recorded_at": "2024-04-28T20:00:00Z", "stress": "high" }]
        }"#
    }

    #[test]
    fn test_analyze_domain_returns_report_json() {
        let json = analyze_domain(
            "Hearing",
            r#"{"tests": [{"recorded_at": "2024-04-30T08:00:00Z", "left_ear": {"threshold": 10.0}, "right_ear": {"threshold": 30.0}}]}"#,
            now(),
        )
        .unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["domain"], "hearing");
        assert_eq!(value["summary"]["average_metric"], 20.0);
    }

    #[test]
    fn test_unknown_domain() {
        let err = analyze_domain("smell", "{}", now()).unwrap_err();
        assert!(matches!(err, EngineError::UnknownDomain(_)));
    }

    #[test]
    fn test_plan_then_days() {
        let plan_json = generate_plan(snapshot_json(), "180", "high", now(), None).unwrap();
        let plan: Value = serde_json::from_str(&plan_json).unwrap();
        assert_eq!(plan["phases"].as_array().unwrap().len(), 3);
        assert_eq!(plan["goals"].as_array().unwrap().len(), 4);

        let days_json = generate_daily_plans(&plan_json, snapshot_json(), "summer", None).unwrap();
        let days: Value = serde_json::from_str(&days_json).unwrap();
        let days = days.as_array().unwrap();
        assert_eq!(days.len(), 180);
        assert_eq!(days[0]["supplements"][0], "Omega-3 (1000 mg daily)");
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            generate_plan(snapshot_json(), "0", "high", now(), None),
            Err(EngineError::InvalidDuration(_))
        ));
        assert!(matches!(
            generate_plan("not json", "6m", "high", now(), None),
            Err(EngineError::JsonError(_))
        ));
        assert!(matches!(
            generate_plan(snapshot_json(), "6m", "urgent", now(), None),
            Err(EngineError::ParseError(_))
        ));
        assert!(matches!(
            generate_plan(snapshot_json(), "6m", "low", now(), Some(r#"{"max_phases": 0}"#)),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}
