//! Planner configuration
//!
//! Tunable constants for goal targets, milestone cadence and daily targets.
//! The defaults reproduce the standard planner behavior; hosts may load an
//! override from JSON.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Planner tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Target BMI used to derive the weight goal
    pub target_bmi: f64,
    /// Growth factor for a measured muscle mass
    pub muscle_gain_factor: f64,
    /// Share of body weight assumed to be muscle when unmeasured
    pub estimated_muscle_ratio: f64,
    /// Growth factor applied to an estimated muscle mass
    pub estimated_muscle_gain_factor: f64,
    /// Total cholesterol target (mg/dL)
    pub cholesterol_target: f64,
    pub min_phases: u32,
    pub max_phases: u32,
    pub milestone_interval_months: u32,
    pub max_milestones: u32,
    /// Every n-th day carries a check-in note
    pub check_in_interval_days: u32,
    pub base_meditation_minutes: f64,
    pub base_breathing_minutes: f64,
    pub base_sleep_hours: f64,
    /// Sleep target drop per unit of intensity above 1.0
    pub sleep_reduction_per_intensity: f64,
    pub base_water_liters: f64,
    pub exercise_water_bonus_liters: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            target_bmi: 22.0,
            muscle_gain_factor: 1.2,
            estimated_muscle_ratio: 0.4,
            estimated_muscle_gain_factor: 1.3,
            cholesterol_target: 180.0,
            min_phases: 3,
            max_phases: 6,
            milestone_interval_months: 2,
            max_milestones: 6,
            check_in_interval_days: 7,
            base_meditation_minutes: 10.0,
            base_breathing_minutes: 15.0,
            base_sleep_hours: 8.0,
            sleep_reduction_per_intensity: 0.5,
            base_water_liters: 2.5,
            exercise_water_bonus_liters: 0.5,
        }
    }
}

impl PlannerConfig {
    /// Load from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::EncodingError(e.to_string()))
    }

    /// Reject values that would make plan generation meaningless
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.target_bmi.is_nan() || self.target_bmi <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "target_bmi must be positive".to_string(),
            ));
        }
        if self.min_phases == 0 || self.min_phases > self.max_phases {
            return Err(EngineError::InvalidConfig(format!(
                "phase bounds must satisfy 1 <= min ({}) <= max ({})",
                self.min_phases, self.max_phases
            )));
        }
        if self.milestone_interval_months == 0 {
            return Err(EngineError::InvalidConfig(
                "milestone_interval_months must be at least 1".to_string(),
            ));
        }
        if self.check_in_interval_days == 0 {
            return Err(EngineError::InvalidConfig(
                "check_in_interval_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
