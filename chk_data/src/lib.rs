//! Shared data model for scenario documents: trigger records, argument descriptors, the
//! string store and the static game catalog.

pub mod catalog;
pub mod descriptors;
pub mod scenario;
pub mod trigger;
pub mod validate;

pub use catalog::{AI_SCRIPTS, AiScript, GameData, UNIT_DISPLAY_NAMES, UNIT_TYPE_COUNT, script_code, script_id};
pub use descriptors::{ACTIONS, ActionDescriptor, CONDITIONS, ConditionDescriptor, Form, canonical_key};
pub use scenario::{ANYWHERE, DocumentError, EditorNames, Location, NO_STRING, Scenario, Scope, StringSection, StringStore};
pub use trigger::{Action, Condition, MAX_ACTIONS, MAX_CONDITIONS, OWNER_SLOTS, Trigger};
pub use validate::{ValidationError, validate_scenario};
