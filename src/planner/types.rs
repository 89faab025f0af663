//! Planner data types
//!
//! This module defines the health snapshot consumed by the planner and the
//! plan structures it produces: goals, phases, milestones and daily entries.

use super::collaborators::{DietPlan, ExercisePlan};
use crate::domains::journal::{MoodLevel, StressLevel};
use crate::domains::medical::BloodTest;
use crate::error::EngineError;
use crate::types::{Dated, Timed};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Biological sex, used for energy expenditure estimates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiologicalSex {
    Male,
    Female,
}

/// Static body measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyProfile {
    pub age_years: u32,
    pub sex: BiologicalSex,
    pub height_cm: f64,
    pub weight_kg: f64,
    /// Skeletal muscle mass, when measured
    #[serde(default)]
    pub muscle_mass_kg: Option<f64>,
    #[serde(default)]
    pub body_fat_percentage: Option<f64>,
}

impl BodyProfile {
    pub fn height_m(&self) -> f64 {
        self.height_cm / 100.0
    }

    pub fn bmi(&self) -> f64 {
        let height = self.height_m();
        self.weight_kg / (height * height)
    }
}

/// Mental health check-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentalHealthRecord {
    pub recorded_at: DateTime<Utc>,
    pub stress: StressLevel,
    #[serde(default)]
    pub mood: Option<MoodLevel>,
}

impl Dated for MentalHealthRecord {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Past workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub performed_at: DateTime<Utc>,
    pub activity: String,
    pub duration_minutes: f64,
    #[serde(default)]
    pub calories_burned: Option<f64>,
}

impl Dated for ExerciseRecord {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.performed_at
    }
}

impl Timed for ExerciseRecord {
    fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }
}

/// Everything the planner knows about the user at planning time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub profile: BodyProfile,
    #[serde(default)]
    pub blood_tests: Vec<BloodTest>,
    #[serde(default)]
    pub mental_health: Vec<MentalHealthRecord>,
    #[serde(default)]
    pub exercise_history: Vec<ExerciseRecord>,
}

impl HealthSnapshot {
    pub fn latest_blood_test(&self) -> Option<&BloodTest> {
        latest(&self.blood_tests)
    }

    pub fn latest_mental_health(&self) -> Option<&MentalHealthRecord> {
        latest(&self.mental_health)
    }

    pub fn has_exercise_history(&self) -> bool {
        !self.exercise_history.is_empty()
    }

    /// Load a snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Latest by date; among equal dates the later entry wins
fn latest<R: Dated>(records: &[R]) -> Option<&R> {
    records
        .iter()
        .enumerate()
        .max_by_key(|(index, r)| (r.recorded_at(), *index))
        .map(|(_, r)| r)
}

/// Plan length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanDuration {
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    Custom { days: u32 },
}

impl PlanDuration {
    /// Custom duration; at least one day
    pub fn custom_days(days: u32) -> Result<Self, EngineError> {
        if days == 0 {
            return Err(EngineError::InvalidDuration(
                "a plan must last at least one day".to_string(),
            ));
        }
        Ok(PlanDuration::Custom { days })
    }

    pub fn days(&self) -> u32 {
        match self {
            PlanDuration::ThreeMonths => 90,
            PlanDuration::SixMonths => 180,
            PlanDuration::OneYear => 365,
            PlanDuration::TwoYears => 730,
            PlanDuration::FiveYears => 1825,
            PlanDuration::Custom { days } => *days,
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            PlanDuration::ThreeMonths => 3,
            PlanDuration::SixMonths => 6,
            PlanDuration::OneYear => 12,
            PlanDuration::TwoYears => 24,
            PlanDuration::FiveYears => 60,
            PlanDuration::Custom { days } => days / 30,
        }
    }
}

impl FromStr for PlanDuration {
    type Err = EngineError;

    /// Accepts preset names (`six_months`, `1y`, ...) or a day count
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "three_months" | "3m" => Ok(PlanDuration::ThreeMonths),
            "six_months" | "6m" => Ok(PlanDuration::SixMonths),
            "one_year" | "1y" => Ok(PlanDuration::OneYear),
            "two_years" | "2y" => Ok(PlanDuration::TwoYears),
            "five_years" | "5y" => Ok(PlanDuration::FiveYears),
            other => other
                .parse::<u32>()
                .map_err(|_| EngineError::InvalidDuration(s.to_string()))
                .and_then(PlanDuration::custom_days),
        }
    }
}

/// How urgently the user needs to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl UrgencyLevel {
    pub fn recommended_difficulty(&self) -> DifficultyLevel {
        match self {
            UrgencyLevel::Low => DifficultyLevel::Gentle,
            UrgencyLevel::Moderate => DifficultyLevel::Moderate,
            UrgencyLevel::High => DifficultyLevel::Aggressive,
            UrgencyLevel::Critical => DifficultyLevel::Extreme,
        }
    }
}

impl FromStr for UrgencyLevel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(UrgencyLevel::Low),
            "moderate" => Ok(UrgencyLevel::Moderate),
            "high" => Ok(UrgencyLevel::High),
            "critical" => Ok(UrgencyLevel::Critical),
            _ => Err(EngineError::ParseError(format!("unknown urgency: {s}"))),
        }
    }
}

/// Plan intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Gentle,
    Moderate,
    Aggressive,
    Extreme,
}

impl DifficultyLevel {
    pub fn intensity_multiplier(&self) -> f64 {
        match self {
            DifficultyLevel::Gentle => 0.75,
            DifficultyLevel::Moderate => 1.0,
            DifficultyLevel::Aggressive => 1.5,
            DifficultyLevel::Extreme => 2.0,
        }
    }

    /// Aggressive or extreme plans get stricter phase adjustments
    pub fn is_strict(&self) -> bool {
        matches!(self, DifficultyLevel::Aggressive | DifficultyLevel::Extreme)
    }
}

/// Season passed to the diet solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Northern-hemisphere meteorological season of a date
    pub fn from_date(date: DateTime<Utc>) -> Self {
        match date.month() {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }
}

impl FromStr for Season {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            _ => Err(EngineError::ParseError(format!("unknown season: {s}"))),
        }
    }
}

/// Goal category, also the key of milestone expected metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalCategory {
    Weight,
    MuscleMass,
    Cardiovascular,
    MentalHealth,
}

impl fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GoalCategory::Weight => "weight",
            GoalCategory::MuscleMass => "muscle_mass",
            GoalCategory::Cardiovascular => "cardiovascular",
            GoalCategory::MentalHealth => "mental_health",
        };
        f.write_str(name)
    }
}

/// A weighted goal, fixed for the plan's lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationGoal {
    pub category: GoalCategory,
    pub current_value: Option<f64>,
    pub target_value: Option<f64>,
    pub target_description: String,
    /// 0-10
    pub priority: u8,
}

impl TransformationGoal {
    /// Linear interpolation toward the target; `None` unless both bounds exist
    pub fn value_at(&self, progress: f64) -> Option<f64> {
        match (self.current_value, self.target_value) {
            (Some(current), Some(target)) => {
                Some(current + (target - current) * progress.clamp(0.0, 1.0))
            }
            _ => None,
        }
    }
}

/// Contiguous day range with its own focus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPhase {
    pub name: String,
    /// 1-indexed, inclusive
    pub start_day: u32,
    /// 1-indexed, inclusive
    pub end_day: u32,
    pub focus: String,
    pub diet_adjustments: Vec<String>,
    pub exercise_adjustments: Vec<String>,
    pub supplement_recommendations: Vec<String>,
}

impl PlanPhase {
    pub fn contains_day(&self, day_number: u32) -> bool {
        (self.start_day..=self.end_day).contains(&day_number)
    }
}

/// Dated checkpoint with interpolated expected values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    pub target_date: DateTime<Utc>,
    pub description: String,
    pub expected_metrics: BTreeMap<GoalCategory, f64>,
    pub achieved: bool,
}

impl Milestone {
    /// Called by progress tracking once the checkpoint is reached
    pub fn mark_achieved(&mut self) {
        self.achieved = true;
    }
}

/// A long-term plan; read-only after creation apart from milestone flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTermPlan {
    pub id: Uuid,
    pub duration: PlanDuration,
    pub difficulty: DifficultyLevel,
    pub urgency: UrgencyLevel,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub goals: Vec<TransformationGoal>,
    pub phases: Vec<PlanPhase>,
    pub milestones: Vec<Milestone>,
}

impl LongTermPlan {
    pub fn goal(&self, category: GoalCategory) -> Option<&TransformationGoal> {
        self.goals.iter().find(|g| g.category == category)
    }

    /// Phase covering a 1-indexed day
    pub fn phase_for_day(&self, day_number: u32) -> Option<&PlanPhase> {
        self.phases.iter().find(|p| p.contains_day(day_number))
    }

    /// First milestone not yet achieved whose date is at or after `now`
    pub fn next_milestone(&self, now: DateTime<Utc>) -> Option<&Milestone> {
        self.milestones
            .iter()
            .find(|m| !m.achieved && m.target_date >= now)
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One day of an expanded plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlanEntry {
    pub date: DateTime<Utc>,
    /// 1-indexed from the plan start
    pub day_number: u32,
    pub phase_name: Option<String>,
    pub diet_plan: DietPlan,
    pub exercise_plan: ExercisePlan,
    pub supplements: Vec<String>,
    pub meditation_minutes: f64,
    pub breathing_minutes: f64,
    pub sleep_hours_target: f64,
    pub water_liters_target: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_duration_presets() {
        assert_eq!(PlanDuration::SixMonths.days(), 180);
        assert_eq!(PlanDuration::SixMonths.months(), 6);
        assert_eq!(PlanDuration::custom_days(180).unwrap().months(), 6);
        assert!(PlanDuration::custom_days(0).is_err());
    }

    #[test]
    fn test_duration_from_str() {
        assert_eq!("six-months".parse::<PlanDuration>().unwrap(), PlanDuration::SixMonths);
        assert_eq!("1y".parse::<PlanDuration>().unwrap(), PlanDuration::OneYear);
        assert_eq!(
            "45".parse::<PlanDuration>().unwrap(),
            PlanDuration::Custom { days: 45 }
        );
        assert!("0".parse::<PlanDuration>().is_err());
        assert!("forever".parse::<PlanDuration>().is_err());
    }

    #[test]
    fn test_difficulty_mapping_is_injective() {
        let levels = [
            UrgencyLevel::Low,
            UrgencyLevel::Moderate,
            UrgencyLevel::High,
            UrgencyLevel::Critical,
        ];
        let mut multipliers: Vec<f64> = levels
            .iter()
            .map(|u| u.recommended_difficulty().intensity_multiplier())
            .collect();
        multipliers.dedup();
        assert_eq!(multipliers.len(), 4);
    }

    #[test]
    fn test_goal_interpolation_clamps_progress() {
        let goal = TransformationGoal {
            category: GoalCategory::Weight,
            current_value: Some(100.0),
            target_value: Some(80.0),
            target_description: String::new(),
            priority: 7,
        };
        assert_eq!(goal.value_at(0.5), Some(90.0));
        assert_eq!(goal.value_at(2.0), Some(80.0));
    }

    #[test]
    fn test_season_from_date() {
        let date = Utc.with_ymd_and_hms(2024, 7, 4, 0, 0, 0).unwrap();
        assert_eq!(Season::from_date(date), Season::Summer);
        let date = Utc.with_ymd_and_hms(2024, 12, 24, 0, 0, 0).unwrap();
        assert_eq!(Season::from_date(date), Season::Winter);
    }

    #[test]
    fn test_latest_record_wins_ties_by_position() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let records = vec![
            MentalHealthRecord { recorded_at: at, stress: StressLevel::Low, mood: None },
            MentalHealthRecord { recorded_at: at, stress: StressLevel::High, mood: None },
        ];
        assert_eq!(latest(&records).unwrap().stress, StressLevel::High);
    }
}
