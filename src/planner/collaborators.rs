//! Diet and exercise collaborators
//!
//! The planner delegates meal and workout design through two traits so hosts
//! can plug in their own engines. The baseline implementations here are simple
//! and deterministic: Mifflin-St Jeor energy estimates for diet and a fixed
//! weekly split for exercise.

use super::types::{BiologicalSex, GoalCategory, HealthSnapshot, Season, TransformationGoal};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Meal within a daily diet plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub description: String,
    pub calories: f64,
}

/// One day of nutrition targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietPlan {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub meals: Vec<Meal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseIntensity {
    Light,
    Moderate,
    Vigorous,
}

/// Planned workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSession {
    pub day: Weekday,
    pub activity: String,
    pub duration_minutes: f64,
    pub intensity: ExerciseIntensity,
}

/// A week of workouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePlan {
    pub sessions: Vec<ExerciseSession>,
}

impl ExercisePlan {
    pub fn total_minutes(&self) -> f64 {
        self.sessions.iter().map(|s| s.duration_minutes).sum()
    }
}

/// Produces a diet plan for a snapshot and season
pub trait DietSolver {
    fn solve(&self, health: &HealthSnapshot, season: Season) -> DietPlan;
}

/// Produces a weekly exercise plan for a snapshot and goal set
pub trait ExercisePlanner {
    fn generate_weekly_plan(
        &self,
        health: &HealthSnapshot,
        goals: &[TransformationGoal],
    ) -> ExercisePlan;
}

const MIN_DAILY_CALORIES: f64 = 1000.0;
const WEIGHT_LOSS_DEFICIT: f64 = 500.0;
const OVERWEIGHT_BMI: f64 = 25.0;
const PROTEIN_G_PER_KG: f64 = 1.4;
const FAT_SHARE: f64 = 0.25;
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARB: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Energy-balance diet solver
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineDietSolver;

impl BaselineDietSolver {
    /// Basal metabolic rate (Mifflin-St Jeor, 1990), floored at 1000 kcal
    pub fn basal_metabolic_rate(health: &HealthSnapshot) -> f64 {
        let profile = &health.profile;
        let sex_constant = match profile.sex {
            BiologicalSex::Male => 5.0,
            BiologicalSex::Female => -161.0,
        };
        let bmr = 10.0 * profile.weight_kg + 6.25 * profile.height_cm
            - 5.0 * f64::from(profile.age_years)
            + sex_constant;
        bmr.max(MIN_DAILY_CALORIES)
    }

    fn activity_factor(health: &HealthSnapshot) -> f64 {
        match health.exercise_history.len() {
            0 => 1.2,
            1..=11 => 1.375,
            _ => 1.55,
        }
    }

    fn seasonal_meals(season: Season) -> [(&'static str, &'static str); 3] {
        match season {
            Season::Spring => [
                ("Breakfast", "Oats with strawberries and yogurt"),
                ("Lunch", "Asparagus and pea salad with grilled chicken"),
                ("Dinner", "Baked salmon with new potatoes"),
            ],
            Season::Summer => [
                ("Breakfast", "Greek yogurt with berries"),
                ("Lunch", "Tomato, cucumber and chickpea salad"),
                ("Dinner", "Grilled fish with zucchini"),
            ],
            Season::Autumn => [
                ("Breakfast", "Porridge with apple and cinnamon"),
                ("Lunch", "Pumpkin and lentil soup"),
                ("Dinner", "Roast chicken with root vegetables"),
            ],
            Season::Winter => [
                ("Breakfast", "Eggs with wholegrain toast"),
                ("Lunch", "Bean and barley stew"),
                ("Dinner", "Beef and cabbage stir-fry with brown rice"),
            ],
        }
    }
}

impl DietSolver for BaselineDietSolver {
    fn solve(&self, health: &HealthSnapshot, season: Season) -> DietPlan {
        let bmr = Self::basal_metabolic_rate(health);
        let mut calories = bmr * Self::activity_factor(health);
        if health.profile.bmi() > OVERWEIGHT_BMI {
            calories = (calories - WEIGHT_LOSS_DEFICIT).max(bmr);
        }

        let protein_g = health.profile.weight_kg * PROTEIN_G_PER_KG;
        let fat_g = calories * FAT_SHARE / KCAL_PER_G_FAT;
        let carbs_g = ((calories - protein_g * KCAL_PER_G_PROTEIN - fat_g * KCAL_PER_G_FAT)
            / KCAL_PER_G_CARB)
            .max(0.0);

        let shares = [0.3, 0.4, 0.3];
        let meals = Self::seasonal_meals(season)
            .iter()
            .zip(shares)
            .map(|((name, description), share)| Meal {
                name: (*name).to_string(),
                description: (*description).to_string(),
                calories: calories * share,
            })
            .collect();

        DietPlan {
            calories,
            protein_g,
            carbs_g,
            fat_g,
            meals,
        }
    }
}

const OBESE_BMI: f64 = 30.0;

/// Fixed weekly split driven by goal categories
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineExercisePlanner;

impl ExercisePlanner for BaselineExercisePlanner {
    fn generate_weekly_plan(
        &self,
        health: &HealthSnapshot,
        goals: &[TransformationGoal],
    ) -> ExercisePlan {
        let has = |category: GoalCategory| goals.iter().any(|g| g.category == category);
        let mut sessions = Vec::new();

        let (cardio, cardio_intensity) = if health.profile.bmi() >= OBESE_BMI {
            ("Brisk walking", ExerciseIntensity::Light)
        } else {
            ("Running", ExerciseIntensity::Moderate)
        };
        let cardio_minutes = if has(GoalCategory::Weight) || has(GoalCategory::Cardiovascular) {
            40.0
        } else {
            30.0
        };
        for day in [Weekday::Mon, Weekday::Wed, Weekday::Fri] {
            sessions.push(ExerciseSession {
                day,
                activity: cardio.to_string(),
                duration_minutes: cardio_minutes,
                intensity: cardio_intensity,
            });
        }

        if has(GoalCategory::MuscleMass) {
            for day in [Weekday::Tue, Weekday::Thu, Weekday::Sat] {
                sessions.push(ExerciseSession {
                    day,
                    activity: "Strength training".to_string(),
                    duration_minutes: 45.0,
                    intensity: ExerciseIntensity::Vigorous,
                });
            }
        }

        if has(GoalCategory::MentalHealth) {
            sessions.push(ExerciseSession {
                day: Weekday::Sun,
                activity: "Yoga".to_string(),
                duration_minutes: 30.0,
                intensity: ExerciseIntensity::Light,
            });
        }

        sessions.sort_by_key(|s| s.day.num_days_from_monday());
        ExercisePlan { sessions }
    }
}
