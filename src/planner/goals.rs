//! Goal derivation
//!
//! Weight and muscle goals are always present. Cardiovascular and mental
//! health goals depend on the latest blood test and mental health record.

use super::types::{GoalCategory, HealthSnapshot, TransformationGoal, UrgencyLevel};
use crate::config::PlannerConfig;
use crate::domains::medical::HIGH_CHOLESTEROL;

/// Derive the goal set for a snapshot
pub fn derive_goals(
    health: &HealthSnapshot,
    urgency: UrgencyLevel,
    config: &PlannerConfig,
) -> Vec<TransformationGoal> {
    let critical = urgency == UrgencyLevel::Critical;
    let mut goals = vec![weight_goal(health, critical, config), muscle_goal(health, config)];

    if let Some(cholesterol) = health
        .latest_blood_test()
        .and_then(|test| test.total_cholesterol)
        .filter(|c| *c > HIGH_CHOLESTEROL)
    {
        goals.push(TransformationGoal {
            category: GoalCategory::Cardiovascular,
            current_value: Some(cholesterol),
            target_value: Some(config.cholesterol_target),
            target_description: format!(
                "Lower total cholesterol from {cholesterol:.0} to {:.0} mg/dL",
                config.cholesterol_target
            ),
            priority: if critical { 10 } else { 8 },
        });
    }

    if health
        .latest_mental_health()
        .is_some_and(|record| record.stress.is_elevated())
    {
        goals.push(TransformationGoal {
            category: GoalCategory::MentalHealth,
            current_value: None,
            target_value: None,
            target_description: "Bring stress down to a manageable level".to_string(),
            priority: 9,
        });
    }

    goals
}

fn weight_goal(
    health: &HealthSnapshot,
    critical: bool,
    config: &PlannerConfig,
) -> TransformationGoal {
    let height_m = health.profile.height_m();
    let target = config.target_bmi * height_m * height_m;
    TransformationGoal {
        category: GoalCategory::Weight,
        current_value: Some(health.profile.weight_kg),
        target_value: Some(target),
        target_description: format!(
            "Reach {target:.1} kg (BMI {:.1})",
            config.target_bmi
        ),
        priority: if critical { 10 } else { 7 },
    }
}

fn muscle_goal(health: &HealthSnapshot, config: &PlannerConfig) -> TransformationGoal {
    let (current, target, priority) = match health.profile.muscle_mass_kg {
        Some(measured) => (measured, measured * config.muscle_gain_factor, 8),
        None => {
            let estimate = health.profile.weight_kg * config.estimated_muscle_ratio;
            (estimate, estimate * config.estimated_muscle_gain_factor, 6)
        }
    };
    TransformationGoal {
        category: GoalCategory::MuscleMass,
        current_value: Some(current),
        target_value: Some(target),
        target_description: format!("Build muscle mass to {target:.1} kg"),
        priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::journal::StressLevel;
    use crate::domains::medical::BloodTest;
    use crate::planner::types::{BiologicalSex, BodyProfile, MentalHealthRecord};
    use chrono::{Duration, TimeZone, Utc};

    fn snapshot() -> HealthSnapshot {
        HealthSnapshot {
            profile: BodyProfile {
                age_years: 35,
                sex: BiologicalSex::Female,
                height_cm: 170.0,
                weight_kg: 80.0,
                muscle_mass_kg: None,
                body_fat_percentage: None,
            },
            blood_tests: vec![],
            mental_health: vec![],
            exercise_history: vec![],
        }
    }

    fn blood_test(days_ago: i64, cholesterol: f64) -> BloodTest {
        BloodTest {
            recorded_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
                - Duration::days(days_ago),
            total_cholesterol: Some(cholesterol),
            ldl: None,
            hdl: None,
            vitamin_d: None,
            fasting_glucose: None,
        }
    }

    #[test]
    fn test_baseline_goals() {
        let goals = derive_goals(&snapshot(), UrgencyLevel::Moderate, &PlannerConfig::default());
        assert_eq!(goals.len(), 2);

        let weight = &goals[0];
        assert_eq!(weight.category, GoalCategory::Weight);
        assert!((weight.target_value.unwrap() - 22.0 * 1.7 * 1.7).abs() < 1e-9);
        assert_eq!(weight.priority, 7);

        let muscle = &goals[1];
        assert_eq!(muscle.current_value, Some(32.0));
        assert!((muscle.target_value.unwrap() - 41.6).abs() < 1e-9);
        assert_eq!(muscle.priority, 6);
    }

    #[test]
    fn test_measured_muscle_mass() {
        let mut health = snapshot();
        health.profile.muscle_mass_kg = Some(30.0);
        let goals = derive_goals(&health, UrgencyLevel::Low, &PlannerConfig::default());
        assert_eq!(goals[1].target_value, Some(36.0));
        assert_eq!(goals[1].priority, 8);
    }

    #[test]
    fn test_cardiovascular_uses_latest_test() {
        let mut health = snapshot();
        health.blood_tests = vec![blood_test(0, 190.0), blood_test(90, 250.0)];
        let goals = derive_goals(&health, UrgencyLevel::Critical, &PlannerConfig::default());
        assert!(goals.iter().all(|g| g.category != GoalCategory::Cardiovascular));

        health.blood_tests = vec![blood_test(0, 220.0), blood_test(90, 190.0)];
        let goals = derive_goals(&health, UrgencyLevel::Critical, &PlannerConfig::default());
        let cardio = goals
            .iter()
            .find(|g| g.category == GoalCategory::Cardiovascular)
            .unwrap();
        assert_eq!(cardio.target_value, Some(180.0));
        assert_eq!(cardio.priority, 10);
        assert_eq!(goals[0].priority, 10);
    }

    #[test]
    fn test_mental_health_goal_on_elevated_stress() {
        let mut health = snapshot();
        health.mental_health = vec![MentalHealthRecord {
            recorded_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            stress: StressLevel::VeryHigh,
            mood: None,
        }];
        let goals = derive_goals(&health, UrgencyLevel::High, &PlannerConfig::default());
        let mental = goals.last().unwrap();
        assert_eq!(mental.category, GoalCategory::MentalHealth);
        assert_eq!(mental.priority, 9);
        assert_eq!(mental.target_value, None);
    }
}
