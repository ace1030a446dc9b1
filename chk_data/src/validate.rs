use std::fmt;

use crate::scenario::{NO_STRING, Scenario, Scope};
use crate::trigger::{MAX_ACTIONS, MAX_CONDITIONS};

/// Location slots a scenario can hold, `Anywhere` included.
pub const MAX_LOCATIONS: usize = 255;

/// Validation error for dangling references or broken limits in a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingString { scope: Scope, id: u32, context: String },
    TooMany { kind: &'static str, count: usize, max: usize, context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingString { scope, id, context } => {
                write!(f, "missing {scope} string {id} ({context})")
            },
            ValidationError::TooMany {
                kind,
                count,
                max,
                context,
            } => {
                write!(f, "{count} {kind} exceeds the limit of {max} ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate string references and record limits in a scenario. An empty result means the
/// scenario can be written out as-is.
///
/// ```
/// use chk_data::{Scenario, validate_scenario};
///
/// let scenario = Scenario::default();
/// assert!(validate_scenario(&scenario).is_empty());
/// ```
pub fn validate_scenario(scenario: &Scenario) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if scenario.locations.len() > MAX_LOCATIONS {
        errors.push(ValidationError::TooMany {
            kind: "locations",
            count: scenario.locations.len(),
            max: MAX_LOCATIONS,
            context: "location table".to_string(),
        });
    }

    check_string(scenario, Scope::Game, scenario.scenario_name, || "scenario name".to_string(), &mut errors);
    check_string(
        scenario,
        Scope::Game,
        scenario.scenario_description,
        || "scenario description".to_string(),
        &mut errors,
    );
    for (index, location) in scenario.locations.iter().enumerate() {
        check_string(
            scenario,
            Scope::Game,
            location.string_id,
            || format!("location {} name", index + 1),
            &mut errors,
        );
    }
    for (force, id) in scenario.force_names.iter().enumerate() {
        check_string(scenario, Scope::Game, *id, || format!("force {} name", force + 1), &mut errors);
    }
    for (force, id) in scenario.editor_names.force_names.iter().enumerate() {
        check_string(scenario, Scope::Editor, *id, || format!("force {} editor name", force + 1), &mut errors);
    }
    for (switch, id) in scenario.switch_names.iter().enumerate() {
        check_string(scenario, Scope::Game, *id, || format!("switch {} name", switch + 1), &mut errors);
    }
    for (unit, id) in &scenario.unit_names {
        check_string(scenario, Scope::Game, *id, || format!("unit {unit} name"), &mut errors);
    }
    for (unit, id) in &scenario.editor_names.unit_names {
        check_string(scenario, Scope::Editor, *id, || format!("unit {unit} editor name"), &mut errors);
    }

    for (index, trigger) in scenario.triggers.iter().enumerate() {
        if trigger.conditions.len() > MAX_CONDITIONS {
            errors.push(ValidationError::TooMany {
                kind: "conditions",
                count: trigger.conditions.len(),
                max: MAX_CONDITIONS,
                context: format!("trigger {index}"),
            });
        }
        if trigger.actions.len() > MAX_ACTIONS {
            errors.push(ValidationError::TooMany {
                kind: "actions",
                count: trigger.actions.len(),
                max: MAX_ACTIONS,
                context: format!("trigger {index}"),
            });
        }
        for id in Scenario::trigger_string_refs(trigger) {
            check_string(scenario, Scope::Game, id, || format!("trigger {index} action"), &mut errors);
        }
    }

    errors
}

fn check_string(
    scenario: &Scenario,
    scope: Scope,
    id: u32,
    context: impl FnOnce() -> String,
    errors: &mut Vec<ValidationError>,
) {
    if id != NO_STRING && scenario.strings.get(id, scope).is_none() {
        errors.push(ValidationError::MissingString {
            scope,
            id,
            context: context(),
        });
    }
}
