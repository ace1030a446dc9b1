use chk_data::descriptors::{ActionArg, ActionArgKind, ActionSlot};
use chk_data::{Action, ActionDescriptor, MAX_ACTIONS, canonical_key};

use super::conditions::{byte, keyword, memory_expectation, memory_offset};
use super::helpers::{argument, find_unquoted, line_end, skip_line_ends};
use super::{Parser, State};
use crate::CompileError;
use crate::config::CompilerOptions;
use crate::keywords::{
    ALLIANCE_STATUS, NUMERIC_MODIFIERS, ORDERS, RESOURCES, SCORES, STATE_MODIFIERS, SWITCH_MODIFIERS,
    apply_text_flags, special_unit_amount,
};
use crate::literals::{parse_long, parse_short};
use crate::resolve::{
    resolve_location, resolve_player, resolve_script, resolve_sound, resolve_string, resolve_switch, resolve_unit,
};
use crate::strings::{Interned, StringField, StringSlot};
use crate::tables::CompilerContext;

pub(crate) fn action_expectation(kind: ActionArgKind, options: &CompilerOptions) -> &'static str {
    match kind {
        ActionArgKind::Location => "Location name or 4-byte locationNum",
        ActionArgKind::String => "String or stringNum",
        ActionArgKind::Player => "Group name or 4-byte groupID",
        ActionArgKind::Unit => "Unit name or 2-byte unitID",
        ActionArgKind::NumUnits => "1-byte number",
        ActionArgKind::CreateUnitProperties | ActionArgKind::Percent | ActionArgKind::Amount => "4-byte number",
        ActionArgKind::ScoreType => "Score type or 1-byte scoreID",
        ActionArgKind::ResourceType => "Resource type or 2-byte number",
        ActionArgKind::StateMod => "State modifier or 1-byte number",
        ActionArgKind::Order => "Order or 1-byte number",
        ActionArgKind::Sound => "Wav name or 4-byte wavID",
        ActionArgKind::Duration => "4-byte duration",
        ActionArgKind::Script => "Script name or 4-byte script num",
        ActionArgKind::AllyState => "Alliance status or 2-byte number",
        ActionArgKind::NumericMod => "Numeric modifier or 1-byte number",
        ActionArgKind::Switch => "Switch name or 4-byte number",
        ActionArgKind::SwitchMod => "Switch modifier or 1-byte number",
        ActionArgKind::ActionType => "1-byte actionID",
        ActionArgKind::TextFlags | ActionArgKind::Flags => "Always display text flags or 1-byte flag data",
        ActionArgKind::Number => "Group, location, script, switch, or 4-byte number",
        ActionArgKind::TypeIndex => "Unit, score type, resource type, alliance status, or 2-byte typeID",
        ActionArgKind::SecondaryTypeIndex => {
            "Switch modifier, order, numeric modifier, state modifier, or 1-byte number"
        },
        ActionArgKind::Padding => "1-byte padding",
        ActionArgKind::MaskFlag => "2-byte mask flag",
        ActionArgKind::MemoryOffset => memory_expectation(options),
    }
}

fn short(text: &[u8]) -> Option<u32> {
    parse_short(text).map(u32::from)
}

/// Value of a string or sound argument. Pending strings write 0 until the commit patches the slot.
fn string_value(ctx: &mut CompilerContext, kind: ActionArgKind, text: &[u8], slot: StringSlot) -> Option<u32> {
    let interned = match kind {
        ActionArgKind::Sound => resolve_sound(&mut ctx.strings, text, slot),
        _ => resolve_string(&mut ctx.strings, text, slot),
    }?;
    Some(match interned {
        Interned::Existing(id) => id,
        Interned::Pending(_) => 0,
    })
}

fn action_value(ctx: &CompilerContext, kind: ActionArgKind, text: &[u8], flags: u8) -> Option<u32> {
    match kind {
        ActionArgKind::Location => parse_long(text).or_else(|| resolve_location(ctx, text)),
        ActionArgKind::Player => parse_long(text).or_else(|| resolve_player(ctx, text)),
        ActionArgKind::Unit => short(text).or_else(|| resolve_unit(ctx, text).map(u32::from)),
        ActionArgKind::NumUnits => special_unit_amount(text).map(u32::from).or_else(|| byte(text)),
        ActionArgKind::CreateUnitProperties
        | ActionArgKind::Percent
        | ActionArgKind::Amount
        | ActionArgKind::Duration => parse_long(text),
        ActionArgKind::ScoreType => keyword(SCORES, text).or_else(|| short(text)),
        ActionArgKind::ResourceType => keyword(RESOURCES, text).or_else(|| short(text)),
        ActionArgKind::AllyState => keyword(ALLIANCE_STATUS, text).or_else(|| short(text)),
        ActionArgKind::StateMod => keyword(STATE_MODIFIERS, text).or_else(|| byte(text)),
        ActionArgKind::Order => keyword(ORDERS, text).or_else(|| byte(text)),
        ActionArgKind::NumericMod => keyword(NUMERIC_MODIFIERS, text).or_else(|| byte(text)),
        ActionArgKind::SwitchMod => keyword(SWITCH_MODIFIERS, text).or_else(|| byte(text)),
        ActionArgKind::Script => parse_long(text).or_else(|| resolve_script(ctx, text)),
        ActionArgKind::Switch => parse_long(text).or_else(|| resolve_switch(ctx, text)),
        ActionArgKind::ActionType | ActionArgKind::Padding => byte(text),
        ActionArgKind::TextFlags | ActionArgKind::Flags => {
            apply_text_flags(text, flags).map(u32::from).or_else(|| byte(text))
        },
        ActionArgKind::Number => parse_long(text)
            .or_else(|| resolve_player(ctx, text))
            .or_else(|| resolve_location(ctx, text))
            .or_else(|| resolve_script(ctx, text))
            .or_else(|| resolve_switch(ctx, text)),
        ActionArgKind::TypeIndex => short(text)
            .or_else(|| resolve_unit(ctx, text).map(u32::from))
            .or_else(|| keyword(SCORES, text))
            .or_else(|| keyword(RESOURCES, text))
            .or_else(|| keyword(ALLIANCE_STATUS, text)),
        ActionArgKind::SecondaryTypeIndex => keyword(SWITCH_MODIFIERS, text)
            .or_else(|| keyword(ORDERS, text))
            .or_else(|| keyword(NUMERIC_MODIFIERS, text))
            .or_else(|| keyword(STATE_MODIFIERS, text))
            .or_else(|| byte(text)),
        ActionArgKind::MaskFlag => short(text),
        ActionArgKind::MemoryOffset => memory_offset(text, &ctx.options),
        ActionArgKind::String | ActionArgKind::Sound => None,
    }
}

fn write_action_slot(record: &mut Action, slot: ActionSlot, value: u32) -> Option<()> {
    match slot {
        ActionSlot::LocationId => record.location_id = value,
        ActionSlot::StringId => record.string_id = value,
        ActionSlot::SoundStringId => record.sound_string_id = value,
        ActionSlot::Time => record.time = value,
        ActionSlot::Group => record.group = value,
        ActionSlot::Number => record.number = value,
        ActionSlot::TypeIndex => record.type_index = u16::try_from(value).ok()?,
        ActionSlot::ActionType => record.action_type = u8::try_from(value).ok()?,
        ActionSlot::SecondaryType => record.secondary_type = u8::try_from(value).ok()?,
        ActionSlot::Flags => record.flags = u8::try_from(value).ok()?,
        ActionSlot::Padding => record.padding = u8::try_from(value).ok()?,
        ActionSlot::MaskFlag => record.mask_flag = u16::try_from(value).ok()?,
    }
    Some(())
}

/// Resolve one normalized action argument into `record`. `(trigger, action)` locate the record in
/// the compiled batch so new strings can be patched in at commit.
pub(crate) fn parse_action_arg(
    ctx: &mut CompilerContext,
    text: &[u8],
    arg: ActionArg,
    record: &mut Action,
    (trigger, action): (usize, usize),
) -> Result<(), &'static str> {
    let expected = action_expectation(arg.kind, &ctx.options);
    let value = match arg.kind {
        ActionArgKind::String | ActionArgKind::Sound => {
            let field = match arg.slot {
                ActionSlot::SoundStringId => StringField::Sound,
                _ => StringField::Text,
            };
            let slot = StringSlot { trigger, action, field };
            string_value(ctx, arg.kind, text, slot)
        },
        kind => action_value(ctx, kind, text, record.flags),
    };
    value
        .and_then(|value| write_action_slot(record, arg.slot, value))
        .ok_or(expected)
}

pub(crate) fn action_descriptor(name: &[u8]) -> Option<&'static ActionDescriptor> {
    let name = std::str::from_utf8(name).ok()?;
    ActionDescriptor::by_key(&canonical_key(name))
}

impl Parser<'_> {
    /// `Name(`, `;Name(`, `Flags:` or `}`.
    pub(super) fn action_entry(&mut self) -> Result<State, CompileError> {
        if self.peek() == Some(b'}') {
            self.cursor = self.cursor.advance(1);
            return Ok(State::Complete);
        }
        if let Some(colon) = self.section_keyword(b"FLAGS") {
            self.cursor = colon?;
            return Ok(State::FlagsValue);
        }

        let disabled = self.peek() == Some(b';');
        if disabled {
            self.cursor = skip_line_ends(self.text, self.cursor.advance(1));
        }
        let start = self.cursor.pos;
        let line_stop = line_end(self.text, start);
        let name_end =
            find_unquoted(self.text, start, b'(', None).map_or(line_stop, |open| open.min(line_stop));
        let descriptor = action_descriptor(&self.text[start..name_end])
            .ok_or_else(|| CompileError::syntax(self.cursor.line, "Action Name or '}'"))?;
        if self.trigger.actions.len() >= MAX_ACTIONS {
            return Err(CompileError::Capacity {
                line: self.cursor.line,
                what: "Action Max Exceeded!",
            });
        }

        let mut record = descriptor.new_action();
        if disabled {
            record.flags |= Action::FLAG_DISABLED;
        }
        self.cursor = skip_line_ends(self.text, self.cursor.at(name_end));
        self.expect_byte(b'(', "'('")?;
        Ok(State::ActionArgs {
            descriptor,
            arg: 0,
            record,
        })
    }

    pub(super) fn action_args(
        &mut self,
        descriptor: &'static ActionDescriptor,
        arg: usize,
        mut record: Action,
    ) -> Result<State, CompileError> {
        let current = descriptor.arg(arg);
        if self.peek() == Some(b')') {
            if current.is_some() {
                return Err(CompileError::syntax(self.cursor.line, "Action Argument"));
            }
            self.cursor = skip_line_ends(self.text, self.cursor.advance(1));
            self.expect_byte(b';', "';'")?;
            self.trigger.actions.push(record);
            return Ok(State::ActionEntry);
        }
        let Some(current) = current else {
            return Err(CompileError::syntax(self.cursor.line, "')'"));
        };

        let last = descriptor.arg(arg + 1).is_none();
        let (end, missing) = if last {
            (find_unquoted(self.text, self.cursor.pos, b')', None), "')'")
        } else {
            (
                find_unquoted(self.text, self.cursor.pos, b',', Some(b')')),
                "Additional Arguments",
            )
        };
        let end = end.ok_or_else(|| CompileError::syntax(self.cursor.line, missing))?;

        let text = argument(&self.text[self.cursor.pos..end]);
        let line = self.cursor.line + text.leading_lines;
        let location = (self.output.len(), self.trigger.actions.len());
        parse_action_arg(self.ctx, text.text, current, &mut record, location)
            .map_err(|expected| CompileError::Argument { line, expected })?;

        self.cursor.line = line + text.trailing_lines;
        self.cursor.pos = if last { end } else { end + 1 };
        Ok(State::ActionArgs {
            descriptor,
            arg: arg + 1,
            record,
        })
    }
}
