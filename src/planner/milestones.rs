//! Milestone scheduling
//!
//! One checkpoint every `milestone_interval_months`, capped at
//! `max_milestones`, with expected values linearly interpolated per goal.

use super::types::{GoalCategory, Milestone, PlanDuration, TransformationGoal};
use crate::config::PlannerConfig;
use chrono::{DateTime, Duration, Months, Utc};
use std::collections::BTreeMap;

/// Schedule milestones for a plan starting at `start`
pub fn schedule(
    goals: &[TransformationGoal],
    duration: PlanDuration,
    start: DateTime<Utc>,
    config: &PlannerConfig,
) -> Vec<Milestone> {
    let total_months = duration.months();
    let interval = config.milestone_interval_months;
    let count = config.max_milestones.min(total_months / interval);

    (1..=count)
        .map(|i| {
            let elapsed_months = i * interval;
            let fraction = f64::from(elapsed_months) / f64::from(total_months);
            let expected_metrics: BTreeMap<GoalCategory, f64> = goals
                .iter()
                .filter_map(|goal| goal.value_at(fraction).map(|v| (goal.category, v)))
                .collect();

            Milestone {
                name: format!("Month {elapsed_months} Checkpoint"),
                target_date: add_months(start, elapsed_months),
                description: describe(&expected_metrics),
                expected_metrics,
                achieved: false,
            }
        })
        .collect()
}

/// Calendar month arithmetic, falling back to 30-day months on overflow
fn add_months(start: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    start
        .checked_add_months(Months::new(months))
        .unwrap_or_else(|| start + Duration::days(i64::from(months) * 30))
}

fn describe(expected: &BTreeMap<GoalCategory, f64>) -> String {
    if expected.is_empty() {
        return "Review progress against your goals".to_string();
    }
    let parts: Vec<String> = expected
        .iter()
        .map(|(category, value)| format!("{category} {value:.1}"))
        .collect();
    format!("Expected: {}", parts.join(", "))
}
