//! Long-term transformation planner
//!
//! Two stateless steps:
//!
//! 1. [`LongTermPlanner::generate_plan`] derives goals, phases and milestones
//!    from a [`HealthSnapshot`].
//! 2. [`LongTermPlanner::generate_daily_plans`] expands a plan into one
//!    [`DailyPlanEntry`] per day using the diet and exercise collaborators.
//!
//! Nothing is cached between calls; identical inputs give identical output
//! apart from the plan id.

pub mod collaborators;
pub mod daily;
pub mod goals;
pub mod milestones;
pub mod phases;
pub mod types;

pub use collaborators::{
    BaselineDietSolver, BaselineExercisePlanner, DietPlan, DietSolver, ExercisePlan,
    ExercisePlanner,
};
pub use types::{
    BiologicalSex, BodyProfile, DailyPlanEntry, DifficultyLevel, ExerciseRecord, GoalCategory,
    HealthSnapshot, LongTermPlan, MentalHealthRecord, Milestone, PlanDuration, PlanPhase, Season,
    TransformationGoal, UrgencyLevel,
};

pub use crate::domains::medical::BloodTest;

use crate::config::PlannerConfig;
use crate::error::EngineError;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

/// Plan generator
#[derive(Debug, Clone, Default)]
pub struct LongTermPlanner {
    config: PlannerConfig,
}

impl LongTermPlanner {
    /// Planner with a checked configuration
    pub fn new(config: PlannerConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Build a plan starting at `start`.
    pub fn generate_plan(
        &self,
        health: &HealthSnapshot,
        duration: PlanDuration,
        urgency: UrgencyLevel,
        start: DateTime<Utc>,
    ) -> LongTermPlan {
        let difficulty = urgency.recommended_difficulty();
        let goals = goals::derive_goals(health, urgency, &self.config);
        let phases = phases::segment(duration, difficulty, &self.config);
        let milestones = milestones::schedule(&goals, duration, start, &self.config);

        let plan = LongTermPlan {
            id: Uuid::new_v4(),
            duration,
            difficulty,
            urgency,
            start_date: start,
            end_date: start + Duration::days(i64::from(duration.days())),
            goals,
            phases,
            milestones,
        };

        info!(
            plan_id = %plan.id,
            days = duration.days(),
            goals = plan.goals.len(),
            phases = plan.phases.len(),
            milestones = plan.milestones.len(),
            "plan generated"
        );

        plan
    }

    /// Expand a plan into daily entries.
    pub fn generate_daily_plans(
        &self,
        plan: &LongTermPlan,
        health: &HealthSnapshot,
        season: Season,
        diet: &dyn DietSolver,
        exercise: &dyn ExercisePlanner,
    ) -> Vec<DailyPlanEntry> {
        debug!(plan_id = %plan.id, ?season, "expanding daily plans");
        daily::expand(plan, health, season, diet, exercise, &self.config)
    }
}
