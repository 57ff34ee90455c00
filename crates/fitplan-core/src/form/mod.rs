//! Form collector: the current value of every control on the page.
//!
//! Each user interaction is one [`FormCollector::set_field`] call. Numeric
//! values clamp to the control's bounds instead of failing, and changes to the
//! objective or current weight re-derive the dependent target weight and
//! weeks-to-goal. Nothing here performs I/O.

mod field;

pub use field::{Field, FieldError};

use field::parse_number;

use serde::Serialize;

use crate::profile::{
    AGE_RANGE, ActivityLevel, Gender, HEIGHT_CM_RANGE, Objective, PlanRequest,
    TRAINING_SESSIONS_RANGE, WEEKS_RANGE, WEIGHT_KG_RANGE, clamp_to,
};

/// Weeks-to-goal shown when the control first appears.
pub const DEFAULT_WEEKS: u32 = 4;

/// Result of [`FormCollector::derive_dependents`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dependents {
    /// Default target weight for the objective.
    pub target_weight_kg: u32,
    /// Whether the weeks-to-goal control is presented.
    pub weeks_applicable: bool,
}

/// Everything the page needs to redraw the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub values: PlanRequest,
    pub show_target_weight: bool,
    pub show_weeks_to_goal: bool,
    pub target_overridden: bool,
}

/// In-memory form state for a single session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormCollector {
    gender: Gender,
    age: u32,
    height_cm: u32,
    current_weight_kg: u32,
    objective: Objective,
    target_weight_kg: u32,
    /// Last weeks value entered; kept while hidden so it comes back unchanged.
    weeks: u32,
    training_sessions_per_week: u32,
    activity_level: ActivityLevel,
    target_overridden: bool,
}

impl Default for FormCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl FormCollector {
    /// A form showing the initial page values.
    pub fn new() -> Self {
        let current_weight_kg = 70;
        let objective = Objective::LoseWeight;
        Self {
            gender: Gender::Male,
            age: 25,
            height_cm: 180,
            current_weight_kg,
            objective,
            target_weight_kg: objective.default_target_weight(current_weight_kg),
            weeks: DEFAULT_WEEKS,
            training_sessions_per_week: 3,
            activity_level: ActivityLevel::SlightlyActive,
            target_overridden: false,
        }
    }

    /// Restore the initial values.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Apply one control update.
    ///
    /// `value` is the raw control value: an integer for numeric fields, an
    /// identifier or label for choice fields.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        let field: Field = name.parse()?;
        match field {
            Field::Gender => self.gender = value.parse()?,
            Field::Age => self.age = clamp_to(&AGE_RANGE, parse_number(field, value)?),
            Field::HeightCm => {
                self.height_cm = clamp_to(&HEIGHT_CM_RANGE, parse_number(field, value)?)
            }
            Field::CurrentWeightKg => {
                self.current_weight_kg =
                    clamp_to(&WEIGHT_KG_RANGE, parse_number(field, value)?);
                // A new current weight gives the target control a new default.
                self.target_overridden = false;
                self.apply_dependents();
            }
            Field::Objective => {
                self.objective = value.parse()?;
                self.target_overridden = false;
                self.apply_dependents();
            }
            Field::TargetWeightKg => {
                self.target_weight_kg =
                    clamp_to(&WEIGHT_KG_RANGE, parse_number(field, value)?);
                self.target_overridden = true;
            }
            Field::WeeksToGoal => {
                self.weeks = clamp_to(&WEEKS_RANGE, parse_number(field, value)?);
            }
            Field::TrainingSessionsPerWeek => {
                self.training_sessions_per_week =
                    clamp_to(&TRAINING_SESSIONS_RANGE, parse_number(field, value)?);
            }
            Field::ActivityLevel => self.activity_level = value.parse()?,
        }
        tracing::debug!(field = %field, value, "form field updated");
        Ok(())
    }

    /// Compute the dependent defaults for an objective and current weight.
    pub fn derive_dependents(objective: Objective, current_weight_kg: u32) -> Dependents {
        Dependents {
            target_weight_kg: objective.default_target_weight(current_weight_kg),
            weeks_applicable: objective.has_deadline(),
        }
    }

    fn apply_dependents(&mut self) {
        let deps = Self::derive_dependents(self.objective, self.current_weight_kg);
        if !self.target_overridden {
            self.target_weight_kg = deps.target_weight_kg;
        }
    }

    /// The request the current form state describes.
    pub fn snapshot(&self) -> PlanRequest {
        let has_deadline = self.objective.has_deadline();
        PlanRequest {
            gender: self.gender,
            age: self.age,
            height_cm: self.height_cm,
            current_weight_kg: self.current_weight_kg,
            objective: self.objective,
            target_weight_kg: if has_deadline {
                self.target_weight_kg
            } else {
                self.current_weight_kg
            },
            weeks_to_goal: if has_deadline { self.weeks } else { 0 },
            training_sessions_per_week: self.training_sessions_per_week,
            activity_level: self.activity_level,
        }
    }

    pub fn view(&self) -> FormView {
        let has_deadline = self.objective.has_deadline();
        FormView {
            values: self.snapshot(),
            show_target_weight: has_deadline,
            show_weeks_to_goal: has_deadline,
            target_overridden: self.target_overridden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(form: &mut FormCollector, name: &str, value: &str) {
        form.set_field(name, value).expect("set_field should succeed");
    }

    #[test]
    fn initial_values() {
        let req = FormCollector::new().snapshot();
        assert_eq!(req.gender, Gender::Male);
        assert_eq!(req.age, 25);
        assert_eq!(req.height_cm, 180);
        assert_eq!(req.current_weight_kg, 70);
        assert_eq!(req.objective, Objective::LoseWeight);
        assert_eq!(req.target_weight_kg, 65);
        assert_eq!(req.weeks_to_goal, 4);
        assert_eq!(req.training_sessions_per_week, 3);
        assert_eq!(req.activity_level, ActivityLevel::SlightlyActive);
    }

    #[test]
    fn age_above_range_clamps_to_upper_bound() {
        let mut form = FormCollector::new();
        set(&mut form, "age", "150");
        assert_eq!(form.snapshot().age, 100);
    }

    #[test]
    fn numeric_fields_clamp_to_lower_bound() {
        let mut form = FormCollector::new();
        set(&mut form, "height_cm", "20");
        set(&mut form, "training_sessions_per_week", "-1");
        set(&mut form, "weeks_to_goal", "0");
        let req = form.snapshot();
        assert_eq!(req.height_cm, 100);
        assert_eq!(req.training_sessions_per_week, 0);
        assert_eq!(req.weeks_to_goal, 1);
    }

    #[test]
    fn lose_weight_targets_five_below_current() {
        let mut form = FormCollector::new();
        set(&mut form, "current_weight_kg", "90");
        set(&mut form, "objective", "Lose weight");
        assert_eq!(form.snapshot().target_weight_kg, 85);
    }

    #[test]
    fn mass_gain_targets_five_above_current() {
        let mut form = FormCollector::new();
        set(&mut form, "current_weight_kg", "60");
        set(&mut form, "objective", "mass_gain");
        assert_eq!(form.snapshot().target_weight_kg, 65);
    }

    #[test]
    fn maintenance_pins_target_and_hides_weeks() {
        let mut form = FormCollector::new();
        set(&mut form, "weeks_to_goal", "12");
        set(&mut form, "target_weight_kg", "50");
        set(&mut form, "objective", "Maintenance");

        let view = form.view();
        assert_eq!(view.values.target_weight_kg, 70);
        assert_eq!(view.values.weeks_to_goal, 0);
        assert!(!view.show_weeks_to_goal);
        assert!(!view.show_target_weight);
    }

    #[test]
    fn weeks_value_survives_maintenance_round_trip() {
        let mut form = FormCollector::new();
        set(&mut form, "weeks_to_goal", "12");
        set(&mut form, "objective", "Maintenance");
        set(&mut form, "objective", "Mass gain");
        assert_eq!(form.snapshot().weeks_to_goal, 12);
    }

    #[test]
    fn manual_target_override_sticks_until_inputs_change() {
        let mut form = FormCollector::new();
        set(&mut form, "target_weight_kg", "50");
        set(&mut form, "age", "33");
        assert_eq!(form.snapshot().target_weight_kg, 50);
        assert!(form.view().target_overridden);

        set(&mut form, "objective", "Mass gain");
        assert_eq!(form.snapshot().target_weight_kg, 75);
        assert!(!form.view().target_overridden);
    }

    #[test]
    fn weight_change_resets_manual_target() {
        let mut form = FormCollector::new();
        set(&mut form, "target_weight_kg", "50");
        assert!(form.view().target_overridden);

        set(&mut form, "current_weight_kg", "90");
        assert_eq!(form.snapshot().target_weight_kg, 85);
        assert!(!form.view().target_overridden);
    }

    #[test]
    fn override_may_contradict_objective() {
        let mut form = FormCollector::new();
        set(&mut form, "target_weight_kg", "90");
        let req = form.snapshot();
        assert_eq!(req.objective, Objective::LoseWeight);
        assert_eq!(req.target_weight_kg, 90);
    }

    #[test]
    fn derive_dependents_reports_applicability() {
        let deps = FormCollector::derive_dependents(Objective::Maintenance, 80);
        assert_eq!(deps.target_weight_kg, 80);
        assert!(!deps.weeks_applicable);

        let deps = FormCollector::derive_dependents(Objective::LoseWeight, 80);
        assert_eq!(deps.target_weight_kg, 75);
        assert!(deps.weeks_applicable);
    }

    #[test]
    fn bad_values_are_errors_and_leave_state_alone() {
        let mut form = FormCollector::new();
        let before = form.clone();
        assert!(form.set_field("gender", "robot").is_err());
        assert!(form.set_field("age", "old").is_err());
        assert!(form.set_field("nickname", "x").is_err());
        assert_eq!(form, before);
    }

    #[test]
    fn reset_restores_initial_values() {
        let mut form = FormCollector::new();
        set(&mut form, "gender", "female");
        set(&mut form, "objective", "Maintenance");
        form.reset();
        assert_eq!(form, FormCollector::new());
    }
}
