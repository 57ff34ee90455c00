//! The fixed plan prompt and its substitution from a [`PlanRequest`].

pub mod template;

use std::collections::BTreeMap;

pub use template::TemplateError;

use crate::profile::PlanRequest;

/// Placeholders of [`PLAN_TEMPLATE`], in the order they are introduced.
///
/// Names are English throughout: the weeks slot is `weeks_to_goal`, not
/// `numero_settimane`.
pub const PLAN_FIELDS: [&str; 9] = [
    "gender",
    "age",
    "height",
    "current_weight",
    "objective",
    "target_weight",
    "weeks_to_goal",
    "training_sessions",
    "activity_level",
];

/// Prompt sent to the model. All plan content and formatting is up to it.
pub const PLAN_TEMPLATE: &str = r#"
Use chain-of-thought (CoT) reasoning to solve the following problem:

build a personalized diet plan along with a customized training table for a specific subject.
The subject is {gender}, is {age} years old, is {height} cm tall and currently weighs {current_weight} kg.
The goal they want to achieve is: {objective}.
The target weight is {target_weight} kg and must be reached in {weeks_to_goal} weeks.
The subject practices sports {training_sessions} times a week and has a physical activity level of {activity_level}.

Create a training plan of {training_sessions} sessions per week that follows these guidelines:

* the training plan must be divided into training sessions, one table row per session
* the training plan must be written in markdown table format
* the table must contain the following columns:
  - day of the week
  - type of training (e.g. strength, endurance, cardio)
  - duration (in minutes)
  - description of the training

Create a weekly diet plan that follows these guidelines:

* the diet plan must be balanced and varied
* divide each day into "food intakes", where a food intake is a consumption moment (breakfast, snack, lunch, or dinner)
* the diet plan must be written in markdown table format
* the table must contain the following columns:
  - time
  - type of food intake (breakfast, snack, lunch, or dinner)
  - foods
  - quantity
  - calories

Explore multiple options for the diet and training plan, choose the best one, and give a detailed explanation of why it was chosen.
"#;

/// The substitution table for a request.
pub fn prompt_values(request: &PlanRequest) -> BTreeMap<&'static str, String> {
    BTreeMap::from([
        ("gender", request.gender.to_string()),
        ("age", request.age.to_string()),
        ("height", request.height_cm.to_string()),
        ("current_weight", request.current_weight_kg.to_string()),
        ("objective", request.objective.to_string()),
        ("target_weight", request.target_weight_kg.to_string()),
        ("weeks_to_goal", request.weeks_to_goal.to_string()),
        (
            "training_sessions",
            request.training_sessions_per_week.to_string(),
        ),
        ("activity_level", request.activity_level.to_string()),
    ])
}

/// Fill [`PLAN_TEMPLATE`] from `request`.
pub fn build_prompt(request: &PlanRequest) -> Result<String, TemplateError> {
    template::render(PLAN_TEMPLATE, &prompt_values(request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ActivityLevel, Gender, Objective};

    fn scenario() -> PlanRequest {
        PlanRequest {
            gender: Gender::Female,
            age: 30,
            height_cm: 165,
            current_weight_kg: 70,
            objective: Objective::LoseWeight,
            target_weight_kg: 65,
            weeks_to_goal: 8,
            training_sessions_per_week: 4,
            activity_level: ActivityLevel::ModeratelyActive,
        }
    }

    #[test]
    fn template_declares_exactly_the_plan_fields() {
        let names = template::placeholders(PLAN_TEMPLATE).unwrap();
        assert_eq!(names, PLAN_FIELDS.to_vec());
    }

    #[test]
    fn values_cover_every_placeholder() {
        let values = prompt_values(&scenario());
        for name in PLAN_FIELDS {
            assert!(values.contains_key(name), "missing value for {name}");
        }
    }

    #[test]
    fn scenario_prompt_contains_every_value() {
        let prompt = build_prompt(&scenario()).unwrap();
        for needle in ["female", "30", "165", "70", "65", "8", "4", "Moderately active"] {
            assert!(prompt.contains(needle), "prompt should contain {needle:?}");
        }
        assert!(prompt.contains("Lose weight"));
        assert!(prompt.contains("is 165 cm tall and currently weighs 70 kg"));
        assert!(prompt.contains("must be reached in 8 weeks"));
        assert!(prompt.contains("markdown table format"));
        assert!(prompt.contains("choose the best one"));
    }

    #[test]
    fn prompt_has_no_leftover_placeholders() {
        let prompt = build_prompt(&scenario()).unwrap();
        for name in PLAN_FIELDS {
            let token = format!("{{{name}}}");
            assert!(!prompt.contains(&token), "unsubstituted {token}");
        }
        assert!(!prompt.contains('{'));
        assert!(!prompt.contains('}'));
    }

    #[test]
    fn build_prompt_is_deterministic() {
        let a = build_prompt(&scenario()).unwrap();
        let b = build_prompt(&scenario()).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn maintenance_prompt_says_zero_weeks() {
        let mut req = scenario();
        req.objective = Objective::Maintenance;
        req.target_weight_kg = req.current_weight_kg;
        req.weeks_to_goal = 0;
        let prompt = build_prompt(&req).unwrap();
        assert!(prompt.contains("The goal they want to achieve is: Maintenance."));
        assert!(prompt.contains("must be reached in 0 weeks"));
    }
}
