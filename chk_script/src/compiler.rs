use chk_data::descriptors::{ActionArg, ConditionArg, Form};
use chk_data::{Action, Condition, GameData, Scenario, Trigger};
use log::info;

use crate::CompileError;
use crate::commit::{BuildError, MapCommitter};
use crate::config::CompilerOptions;
use crate::literals::parse_byte;
use crate::normalize::normalize;
use crate::parser::{self, ParsedTrigger, action_descriptor, condition_descriptor};
use crate::strings::StringField;
use crate::tables::CompilerContext;

/// Compiles trigger text into a scenario.
///
/// Every call rebuilds its symbol tables from the scenario it is given, so one compiler can serve
/// any number of scenarios.
#[derive(Debug, Clone, Default)]
pub struct TextTrigCompiler {
    options: CompilerOptions,
}

impl TextTrigCompiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile `text` and replace triggers `begin..end` of `scenario` with the result. Returns the
    /// number of triggers written.
    ///
    /// # Errors
    /// Syntax, argument and capacity errors leave the scenario untouched. A [`CompileError::Build`]
    /// means the commit failed and was rolled back.
    pub fn compile_triggers(
        &self,
        text: &str,
        scenario: &mut Scenario,
        game_data: &GameData,
        begin: usize,
        end: usize,
    ) -> Result<usize, CompileError> {
        let (parsed, ctx) = self.parse_with_context(text, scenario, game_data, begin, end)?;
        let triggers: Vec<Trigger> = parsed.into_iter().map(|p| p.trigger).collect();
        let mut pending = ctx.strings.into_pending();
        pending.extend(ctx.editor_strings.into_pending());

        let written = MapCommitter::new(scenario).commit(begin, end, triggers, pending)?;
        info!("compiled {written} trigger(s) into {begin}..{end}");
        Ok(written)
    }

    /// Compile text holding exactly one trigger into slot `index`. `index` equal to the trigger
    /// count appends.
    ///
    /// # Errors
    /// [`CompileError::TriggerCount`] when the text does not hold exactly one trigger, otherwise
    /// as [`TextTrigCompiler::compile_triggers`].
    pub fn compile_trigger(
        &self,
        text: &str,
        scenario: &mut Scenario,
        game_data: &GameData,
        index: usize,
    ) -> Result<(), CompileError> {
        let end = if index < scenario.triggers.len() { index + 1 } else { index };
        let (parsed, ctx) = self.parse_with_context(text, scenario, game_data, index, end)?;
        if parsed.len() != 1 {
            return Err(CompileError::TriggerCount { found: parsed.len() });
        }
        let triggers: Vec<Trigger> = parsed.into_iter().map(|p| p.trigger).collect();
        let mut pending = ctx.strings.into_pending();
        pending.extend(ctx.editor_strings.into_pending());
        MapCommitter::new(scenario).commit(index, end, triggers, pending)?;
        info!("compiled trigger {index}");
        Ok(())
    }

    /// Parse without touching the scenario. New strings keep id 0 in the returned records.
    ///
    /// # Errors
    /// Any syntax, argument or capacity error in the text.
    pub fn parse_triggers(
        &self,
        text: &str,
        scenario: &Scenario,
        game_data: &GameData,
        begin: usize,
        end: usize,
    ) -> Result<Vec<ParsedTrigger>, CompileError> {
        self.parse_with_context(text, scenario, game_data, begin, end)
            .map(|(parsed, _)| parsed)
    }

    fn parse_with_context(
        &self,
        text: &str,
        scenario: &Scenario,
        game_data: &GameData,
        begin: usize,
        end: usize,
    ) -> Result<(Vec<ParsedTrigger>, CompilerContext), CompileError> {
        let normalized = normalize(text.as_bytes())?;
        let mut ctx = CompilerContext::build(scenario, game_data, begin, end, self.options);
        let parsed = parser::parse(&normalized, &mut ctx)?;
        info!(
            "parsed {} trigger(s), {} new string(s)",
            parsed.len(),
            ctx.strings.pending().len() + ctx.editor_strings.pending().len()
        );
        Ok((parsed, ctx))
    }

    /// Stored condition type for a condition name or number. `Custom` has no single type.
    pub fn parse_condition_name(text: &str) -> Option<u8> {
        let normalized = normalize(text.as_bytes()).ok()?;
        match condition_descriptor(&normalized) {
            Some(descriptor) if descriptor.form == Form::Custom => None,
            Some(descriptor) => Some(descriptor.base_type),
            None => parse_byte(&normalized),
        }
    }

    /// Stored action type for an action name or number. `Custom` has no single type.
    pub fn parse_action_name(text: &str) -> Option<u8> {
        let normalized = normalize(text.as_bytes()).ok()?;
        match action_descriptor(&normalized) {
            Some(descriptor) if descriptor.form == Form::Custom => None,
            Some(descriptor) => Some(descriptor.base_type),
            None => parse_byte(&normalized),
        }
    }

    /// Resolve one condition argument into `record`, for editors that change a single field.
    ///
    /// # Errors
    /// [`CompileError::SingleArgument`] with the argument's expectation text.
    pub fn parse_condition_arg(
        &self,
        text: &str,
        arg: ConditionArg,
        record: &mut Condition,
        scenario: &Scenario,
        game_data: &GameData,
        trigger_index: usize,
    ) -> Result<(), CompileError> {
        let normalized = normalize(text.as_bytes())?;
        let ctx = CompilerContext::build(scenario, game_data, trigger_index, trigger_index, self.options);
        parser::parse_condition_arg(&ctx, &normalized, arg, record).map_err(|expected| {
            CompileError::SingleArgument {
                record: "condition",
                expected,
            }
        })
    }

    /// Resolve one action argument into `record`. New string content is added to the scenario
    /// straight away.
    ///
    /// # Errors
    /// [`CompileError::SingleArgument`] with the argument's expectation text, or
    /// [`CompileError::Build`] when the string section is full.
    pub fn parse_action_arg(
        &self,
        text: &str,
        arg: ActionArg,
        record: &mut Action,
        scenario: &mut Scenario,
        game_data: &GameData,
        trigger_index: usize,
    ) -> Result<(), CompileError> {
        let normalized = normalize(text.as_bytes())?;
        let mut ctx = CompilerContext::build(scenario, game_data, trigger_index, trigger_index, self.options);
        parser::parse_action_arg(&mut ctx, &normalized, arg, record, (0, 0)).map_err(|expected| {
            CompileError::SingleArgument {
                record: "action",
                expected,
            }
        })?;

        for string in ctx.strings.into_pending() {
            let id = scenario
                .strings
                .add(&string.content, string.scope)
                .ok_or_else(|| BuildError::StringCapacity {
                    scope: string.scope,
                    content: String::from_utf8_lossy(&string.content).into_owned(),
                })?;
            for slot in &string.assignees {
                match slot.field {
                    StringField::Text => record.string_id = id,
                    StringField::Sound => record.sound_string_id = id,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chk_data::Scope;
    use chk_data::descriptors::{ActionArgKind, ActionSlot, ConditionArgKind, ConditionSlot};

    #[test]
    fn names_map_to_stored_types() {
        assert_eq!(TextTrigCompiler::parse_condition_name("Command the Most At"), Some(7));
        assert_eq!(TextTrigCompiler::parse_condition_name("Memory"), Some(15));
        assert_eq!(TextTrigCompiler::parse_condition_name("13"), Some(13));
        assert_eq!(TextTrigCompiler::parse_condition_name("Custom"), None);
        assert_eq!(TextTrigCompiler::parse_action_name("Set Memory"), Some(45));
        assert_eq!(TextTrigCompiler::parse_action_name("display text message"), Some(9));
        assert_eq!(TextTrigCompiler::parse_action_name("Custom"), None);
        assert_eq!(TextTrigCompiler::parse_action_name("Explode"), None);
    }

    #[test]
    fn single_condition_argument_reports_record_kind() {
        let compiler = TextTrigCompiler::default();
        let scenario = Scenario::default();
        let mut record = Condition::default();
        let arg = ConditionArg {
            kind: ConditionArgKind::Amount,
            slot: ConditionSlot::Amount,
        };
        compiler
            .parse_condition_arg("42", arg, &mut record, &scenario, &GameData::default(), 0)
            .expect("amount");
        assert_eq!(record.amount, 42);

        let err = compiler
            .parse_condition_arg("lots", arg, &mut record, &scenario, &GameData::default(), 0)
            .expect_err("not a number");
        assert_eq!(err.to_string(), "Unable to parse condition. Expected: 4-byte amount");
    }

    #[test]
    fn single_action_argument_stores_new_strings() {
        let compiler = TextTrigCompiler::default();
        let mut scenario = Scenario::default();
        let mut record = Action::default();
        let arg = ActionArg {
            kind: ActionArgKind::String,
            slot: ActionSlot::StringId,
        };
        compiler
            .parse_action_arg("\"Hello there\"", arg, &mut record, &mut scenario, &GameData::default(), 0)
            .expect("string");
        assert_ne!(record.string_id, 0);
        assert_eq!(
            scenario.strings.get(record.string_id, Scope::Game),
            Some(&b"Hello there"[..])
        );
    }
}
