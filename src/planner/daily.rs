//! Daily plan expansion
//!
//! Walks every day of a plan, interpolates the body profile toward the weight
//! and muscle goals, and asks the collaborators for that day's diet and
//! exercise plans.

use super::collaborators::{DietSolver, ExercisePlanner};
use super::types::{DailyPlanEntry, GoalCategory, HealthSnapshot, LongTermPlan, Season};
use crate::config::PlannerConfig;
use chrono::Duration;

pub const VITAMIN_D3: &str = "Vitamin D3 (2000 IU daily)";
pub const OMEGA_3: &str = "Omega-3 (1000 mg daily)";

/// Scalar targets shared by every day of a plan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTargets {
    pub meditation_minutes: f64,
    pub breathing_minutes: f64,
    pub sleep_hours: f64,
    pub water_liters: f64,
}

impl DailyTargets {
    pub fn for_plan(plan: &LongTermPlan, health: &HealthSnapshot, config: &PlannerConfig) -> Self {
        let m = plan.difficulty.intensity_multiplier();
        let water_bonus = if health.has_exercise_history() {
            config.exercise_water_bonus_liters
        } else {
            0.0
        };

        Self {
            meditation_minutes: config.base_meditation_minutes * m,
            breathing_minutes: config.base_breathing_minutes * m,
            sleep_hours: config.base_sleep_hours - (m - 1.0) * config.sleep_reduction_per_intensity,
            water_liters: config.base_water_liters + water_bonus,
        }
    }
}

/// Supplements gated on the latest blood test
pub fn supplements(health: &HealthSnapshot) -> Vec<String> {
    let Some(test) = health.latest_blood_test() else {
        return Vec::new();
    };

    let mut supplements = Vec::new();
    if test.has_low_vitamin_d() {
        supplements.push(VITAMIN_D3.to_string());
    }
    if test.has_high_cholesterol() {
        supplements.push(OMEGA_3.to_string());
    }
    supplements
}

/// Snapshot with weight and muscle mass moved `progress` of the way to target
pub fn adjusted_snapshot(
    health: &HealthSnapshot,
    plan: &LongTermPlan,
    progress: f64,
) -> HealthSnapshot {
    let mut adjusted = health.clone();
    if let Some(weight) = plan
        .goal(GoalCategory::Weight)
        .and_then(|g| g.value_at(progress))
    {
        adjusted.profile.weight_kg = weight;
    }
    if let Some(muscle) = plan
        .goal(GoalCategory::MuscleMass)
        .and_then(|g| g.value_at(progress))
    {
        adjusted.profile.muscle_mass_kg = Some(muscle);
    }
    adjusted
}

/// One entry per plan day, in order
pub fn expand(
    plan: &LongTermPlan,
    health: &HealthSnapshot,
    season: Season,
    diet: &dyn DietSolver,
    exercise: &dyn ExercisePlanner,
    config: &PlannerConfig,
) -> Vec<DailyPlanEntry> {
    let total_days = plan.duration.days();
    let targets = DailyTargets::for_plan(plan, health, config);
    let supplements = supplements(health);

    (0..total_days)
        .map(|day| {
            let day_number = day + 1;
            let progress = f64::from(day) / f64::from(total_days);
            let adjusted = adjusted_snapshot(health, plan, progress);

            DailyPlanEntry {
                date: plan.start_date + Duration::days(i64::from(day)),
                day_number,
                phase_name: plan.phase_for_day(day_number).map(|p| p.name.clone()),
                diet_plan: diet.solve(&adjusted, season),
                exercise_plan: exercise.generate_weekly_plan(&adjusted, &plan.goals),
                supplements: supplements.clone(),
                meditation_minutes: targets.meditation_minutes,
                breathing_minutes: targets.breathing_minutes,
                sleep_hours_target: targets.sleep_hours,
                water_liters_target: targets.water_liters,
                notes: check_in_note(day_number, config.check_in_interval_days),
            }
        })
        .collect()
}

fn check_in_note(day_number: u32, interval: u32) -> Option<String> {
    (day_number % interval == 0).then(|| {
        format!(
            "Weekly check-in (week {}): record your weight and review progress",
            day_number / interval
        )
    })
}
