//! Profile flags shared by `fitplan prompt` and `fitplan generate`.
//!
//! Flags are applied through the same [`FormCollector`] the web page uses, so
//! clamping and derived defaults behave identically on the command line.

use anyhow::{Context, Result};
use clap::Args;

use fitplan_core::form::{Field, FormCollector};
use fitplan_core::profile::PlanRequest;

#[derive(Debug, Default, Args)]
pub struct ProfileArgs {
    /// male or female [default: male]
    #[arg(long)]
    pub gender: Option<String>,
    /// Age in years, 0-100 [default: 25]
    #[arg(long, allow_negative_numbers = true)]
    pub age: Option<i64>,
    /// Height in cm, 100-250 [default: 180]
    #[arg(long)]
    pub height: Option<i64>,
    /// Current weight in kg, 0-200 [default: 70]
    #[arg(long)]
    pub weight: Option<i64>,
    /// lose_weight, maintenance or mass_gain (labels work too) [default: lose_weight]
    #[arg(long)]
    pub objective: Option<String>,
    /// Target weight in kg, 0-200 [default: weight -5 / +5 by objective]
    #[arg(long)]
    pub target_weight: Option<i64>,
    /// Weeks to reach the goal, 1-52; ignored for maintenance [default: 4]
    #[arg(long)]
    pub weeks: Option<i64>,
    /// Training sessions per week, 0-7 [default: 3]
    #[arg(long)]
    pub sessions: Option<i64>,
    /// sedentary, slightly_active, moderately_active, very_active or extremely_active [default: slightly_active]
    #[arg(long)]
    pub activity: Option<String>,
}

impl ProfileArgs {
    /// Apply the given flags to a fresh form and snapshot it.
    pub fn to_request(&self) -> Result<PlanRequest> {
        let mut form = FormCollector::new();

        // Objective and weight before target, so an explicit target wins.
        let updates: [(Field, Option<String>); 9] = [
            (Field::Gender, self.gender.clone()),
            (Field::Age, self.age.map(|v| v.to_string())),
            (Field::HeightCm, self.height.map(|v| v.to_string())),
            (Field::CurrentWeightKg, self.weight.map(|v| v.to_string())),
            (Field::Objective, self.objective.clone()),
            (Field::TargetWeightKg, self.target_weight.map(|v| v.to_string())),
            (Field::WeeksToGoal, self.weeks.map(|v| v.to_string())),
            (
                Field::TrainingSessionsPerWeek,
                self.sessions.map(|v| v.to_string()),
            ),
            (Field::ActivityLevel, self.activity.clone()),
        ];

        for (field, value) in updates {
            if let Some(value) = value {
                form.set_field(field.name(), &value)
                    .with_context(|| format!("invalid value for --{}", flag_name(field)))?;
            }
        }
        Ok(form.snapshot())
    }
}

fn flag_name(field: Field) -> &'static str {
    match field {
        Field::Gender => "gender",
        Field::Age => "age",
        Field::HeightCm => "height",
        Field::CurrentWeightKg => "weight",
        Field::Objective => "objective",
        Field::TargetWeightKg => "target-weight",
        Field::WeeksToGoal => "weeks",
        Field::TrainingSessionsPerWeek => "sessions",
        Field::ActivityLevel => "activity",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitplan_core::profile::{ActivityLevel, Gender, Objective};

    #[test]
    fn no_flags_gives_initial_form() {
        let req = ProfileArgs::default().to_request().unwrap();
        assert_eq!(req, FormCollector::new().snapshot());
    }

    #[test]
    fn flags_override_and_derive() {
        let args = ProfileArgs {
            gender: Some("female".into()),
            age: Some(30),
            height: Some(165),
            weight: Some(70),
            objective: Some("Lose weight".into()),
            weeks: Some(8),
            sessions: Some(4),
            activity: Some("moderately_active".into()),
            ..Default::default()
        };
        let req = args.to_request().unwrap();
        assert_eq!(req.gender, Gender::Female);
        assert_eq!(req.objective, Objective::LoseWeight);
        assert_eq!(req.target_weight_kg, 65);
        assert_eq!(req.weeks_to_goal, 8);
        assert_eq!(req.activity_level, ActivityLevel::ModeratelyActive);
    }

    #[test]
    fn explicit_target_wins_over_derived() {
        let args = ProfileArgs {
            weight: Some(80),
            objective: Some("mass_gain".into()),
            target_weight: Some(90),
            ..Default::default()
        };
        assert_eq!(args.to_request().unwrap().target_weight_kg, 90);
    }

    #[test]
    fn out_of_range_flags_clamp() {
        let args = ProfileArgs {
            age: Some(150),
            sessions: Some(12),
            ..Default::default()
        };
        let req = args.to_request().unwrap();
        assert_eq!(req.age, 100);
        assert_eq!(req.training_sessions_per_week, 7);
    }

    #[test]
    fn bad_choice_names_the_flag() {
        let args = ProfileArgs {
            activity: Some("couch potato".into()),
            ..Default::default()
        };
        let err = args.to_request().unwrap_err();
        assert!(format!("{err:#}").contains("--activity"));
    }
}
