//! Phase segmentation
//!
//! Splits a plan's days into 3-6 contiguous phases. Days are divided evenly
//! and any remainder is folded into the last phase.

use super::types::{DifficultyLevel, PlanDuration, PlanPhase};
use crate::config::PlannerConfig;

pub const PHASE_NAMES: [&str; 6] = [
    "Foundation",
    "Building",
    "Optimization",
    "Refinement",
    "Mastery",
    "Transformation",
];

const PHASE_FOCUS: [&str; 6] = [
    "Establish consistent habits and baseline measurements",
    "Increase training volume and improve meal quality",
    "Fine-tune nutrition and training from measured progress",
    "Address lagging areas and consolidate gains",
    "Sustain results with self-directed routines",
    "Lock in long-term lifestyle change",
];

const DIET_BASE: &[&str] = &[
    "Build meals around vegetables and lean protein",
    "Drink a glass of water before each meal",
];
const DIET_STRICT: &[&str] = &[
    "Eliminate sugary drinks and refined snacks",
    "Track every meal",
];
const EXERCISE_BASE: &[&str] = &[
    "Walk at least 7,000 steps daily",
    "Stretch for 10 minutes after workouts",
];
const EXERCISE_STRICT: &[&str] = &[
    "Add a fourth weekly training session",
    "Include one interval workout per week",
];
const SUPPLEMENT_BASE: &[&str] = &["Multivitamin with breakfast"];
const SUPPLEMENT_STRICT: &[&str] = &[
    "Whey protein after strength sessions",
    "Magnesium before bed",
];

/// Number of phases for a duration, never more than its day count
pub fn phase_count(duration: PlanDuration, config: &PlannerConfig) -> u32 {
    (duration.months() / 2)
        .clamp(config.min_phases, config.max_phases)
        .min(duration.days())
}

/// Build the phases for a plan
pub fn segment(
    duration: PlanDuration,
    difficulty: DifficultyLevel,
    config: &PlannerConfig,
) -> Vec<PlanPhase> {
    let total_days = duration.days();
    let count = phase_count(duration, config);
    let phase_days = total_days / count;

    (0..count)
        .map(|i| {
            let name_index = (i as usize).min(PHASE_NAMES.len() - 1);
            let end_day = if i + 1 == count {
                total_days
            } else {
                ((i + 1) * phase_days).min(total_days)
            };

            PlanPhase {
                name: PHASE_NAMES[name_index].to_string(),
                start_day: i * phase_days + 1,
                end_day,
                focus: PHASE_FOCUS[name_index].to_string(),
                diet_adjustments: adjustments(DIET_BASE, DIET_STRICT, difficulty),
                exercise_adjustments: adjustments(EXERCISE_BASE, EXERCISE_STRICT, difficulty),
                supplement_recommendations: adjustments(
                    SUPPLEMENT_BASE,
                    SUPPLEMENT_STRICT,
                    difficulty,
                ),
            }
        })
        .collect()
}

fn adjustments(base: &[&str], strict: &[&str], difficulty: DifficultyLevel) -> Vec<String> {
    let extra: &[&str] = if difficulty.is_strict() { strict } else { &[] };
    base.iter().chain(extra).map(|s| (*s).to_string()).collect()
}
