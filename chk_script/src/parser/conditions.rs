use chk_data::descriptors::{ConditionArg, ConditionArgKind, ConditionSlot};
use chk_data::{Condition, ConditionDescriptor, MAX_CONDITIONS, canonical_key};

use super::helpers::{argument, find_unquoted, line_end, skip_line_ends};
use super::{Parser, State};
use crate::CompileError;
use crate::config::CompilerOptions;
use crate::keywords::{Keywords, NUMERIC_COMPARISONS, RESOURCES, SCORES, SWITCH_STATES, lookup};
use crate::literals::{parse_byte, parse_long, parse_memory_address, parse_short};
use crate::resolve::{resolve_location, resolve_player, resolve_switch, resolve_unit};
use crate::tables::CompilerContext;

/// What a condition argument of `kind` accepts, as shown after "Expected: ".
pub(crate) fn condition_expectation(kind: ConditionArgKind, options: &CompilerOptions) -> &'static str {
    match kind {
        ConditionArgKind::Unit => "Unit name or 2-byte unitID",
        ConditionArgKind::Location => "Location name or 4-byte locationNum",
        ConditionArgKind::Player => "Player/group name or 4-byte id",
        ConditionArgKind::Amount => "4-byte amount",
        ConditionArgKind::NumericComparison => "Numeric comparison or 1-byte comparisonID",
        ConditionArgKind::ResourceType => "Resource type or 1-byte resourceID",
        ConditionArgKind::ScoreType => "Score type or 1-byte scoreID",
        ConditionArgKind::Switch => "Switch name or 1-byte switchID",
        ConditionArgKind::SwitchState => "Switch state or 1-byte comparisonID",
        ConditionArgKind::Comparison => "1-byte comparison",
        ConditionArgKind::ConditionType => "1-byte conditionID",
        ConditionArgKind::TypeIndex => "1-byte typeId, resource type, score type, or switch name",
        ConditionArgKind::Flags => "1-byte flags",
        ConditionArgKind::MaskFlag => "2-byte internal data",
        ConditionArgKind::MemoryOffset => memory_expectation(options),
    }
}

pub(super) fn memory_expectation(options: &CompilerOptions) -> &'static str {
    if options.use_addresses_for_memory {
        "4-byte address"
    } else {
        "4-byte death table offset"
    }
}

pub(super) fn memory_offset(text: &[u8], options: &CompilerOptions) -> Option<u32> {
    if options.use_addresses_for_memory {
        parse_memory_address(text, options.death_table_offset)
    } else {
        parse_long(text)
    }
}

pub(super) fn keyword(table: Keywords, text: &[u8]) -> Option<u32> {
    lookup(table, text).map(u32::from)
}

pub(super) fn byte(text: &[u8]) -> Option<u32> {
    parse_byte(text).map(u32::from)
}

fn condition_value(ctx: &CompilerContext, kind: ConditionArgKind, text: &[u8]) -> Option<u32> {
    match kind {
        ConditionArgKind::Unit => parse_short(text).or_else(|| resolve_unit(ctx, text)).map(u32::from),
        ConditionArgKind::Location => parse_long(text).or_else(|| resolve_location(ctx, text)),
        ConditionArgKind::Player => parse_long(text).or_else(|| resolve_player(ctx, text)),
        ConditionArgKind::Amount => parse_long(text),
        ConditionArgKind::NumericComparison => keyword(NUMERIC_COMPARISONS, text).or_else(|| byte(text)),
        ConditionArgKind::ResourceType => keyword(RESOURCES, text).or_else(|| byte(text)),
        ConditionArgKind::ScoreType => keyword(SCORES, text).or_else(|| byte(text)),
        ConditionArgKind::Switch => byte(text).or_else(|| resolve_switch(ctx, text)),
        ConditionArgKind::SwitchState => keyword(SWITCH_STATES, text).or_else(|| byte(text)),
        ConditionArgKind::Comparison => byte(text)
            .or_else(|| keyword(NUMERIC_COMPARISONS, text))
            .or_else(|| keyword(SWITCH_STATES, text)),
        ConditionArgKind::ConditionType | ConditionArgKind::Flags => byte(text),
        ConditionArgKind::TypeIndex => byte(text)
            .or_else(|| keyword(RESOURCES, text))
            .or_else(|| keyword(SCORES, text))
            .or_else(|| resolve_switch(ctx, text)),
        ConditionArgKind::MaskFlag => parse_short(text).map(u32::from),
        ConditionArgKind::MemoryOffset => memory_offset(text, &ctx.options),
    }
}

/// Store `value` in `slot`, failing when it does not fit the field.
fn write_condition_slot(record: &mut Condition, slot: ConditionSlot, value: u32) -> Option<()> {
    match slot {
        ConditionSlot::LocationId => record.location_id = value,
        ConditionSlot::Player => record.player = value,
        ConditionSlot::Amount => record.amount = value,
        ConditionSlot::UnitType => record.unit_type = u16::try_from(value).ok()?,
        ConditionSlot::Comparison => record.comparison = u8::try_from(value).ok()?,
        ConditionSlot::ConditionType => record.condition_type = u8::try_from(value).ok()?,
        ConditionSlot::TypeIndex => record.type_index = u8::try_from(value).ok()?,
        ConditionSlot::Flags => record.flags = u8::try_from(value).ok()?,
        ConditionSlot::MaskFlag => record.mask_flag = u16::try_from(value).ok()?,
    }
    Some(())
}

/// Resolve one normalized condition argument into `record`. The error is the expectation text.
pub(crate) fn parse_condition_arg(
    ctx: &CompilerContext,
    text: &[u8],
    arg: ConditionArg,
    record: &mut Condition,
) -> Result<(), &'static str> {
    let expected = condition_expectation(arg.kind, &ctx.options);
    condition_value(ctx, arg.kind, text)
        .and_then(|value| write_condition_slot(record, arg.slot, value))
        .ok_or(expected)
}

/// Condition descriptor named by normalized text.
pub(crate) fn condition_descriptor(name: &[u8]) -> Option<&'static ConditionDescriptor> {
    let name = std::str::from_utf8(name).ok()?;
    ConditionDescriptor::by_key(&canonical_key(name))
}

impl Parser<'_> {
    /// `Name(`, `;Name(`, `Actions:`, `Flags:` or `}`.
    pub(super) fn condition_entry(&mut self) -> Result<State, CompileError> {
        if self.peek() == Some(b'}') {
            self.cursor = self.cursor.advance(1);
            return Ok(State::Complete);
        }
        if let Some(colon) = self.section_keyword(b"ACTIONS") {
            self.cursor = colon?;
            return Ok(State::ActionEntry);
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
        let descriptor = condition_descriptor(&self.text[start..name_end])
            .ok_or_else(|| CompileError::syntax(self.cursor.line, "Condition Name"))?;
        if self.trigger.conditions.len() >= MAX_CONDITIONS {
            return Err(CompileError::Capacity {
                line: self.cursor.line,
                what: "Condition Max Exceeded!",
            });
        }

        let mut record = descriptor.new_condition();
        if disabled {
            record.flags |= Condition::FLAG_DISABLED;
        }
        self.cursor = skip_line_ends(self.text, self.cursor.at(name_end));
        self.expect_byte(b'(', "'('")?;
        Ok(State::ConditionArgs {
            descriptor,
            arg: 0,
            record,
        })
    }

    /// One argument, or the closing `);` once every argument has been read.
    pub(super) fn condition_args(
        &mut self,
        descriptor: &'static ConditionDescriptor,
        arg: usize,
        mut record: Condition,
    ) -> Result<State, CompileError> {
        let current = descriptor.arg(arg);
        if self.peek() == Some(b')') {
            if current.is_some() {
                return Err(CompileError::syntax(self.cursor.line, "Condition Argument"));
            }
            self.cursor = skip_line_ends(self.text, self.cursor.advance(1));
            self.expect_byte(b';', "';'")?;
            self.trigger.conditions.push(record);
            return Ok(State::ConditionEntry);
        }
        let Some(current) = current else {
            return Err(CompileError::syntax(self.cursor.line, "')'"));
        };

        let last = descriptor.arg(arg + 1).is_none();
        let (end, missing) = if last {
            (find_unquoted(self.text, self.cursor.pos, b')', None), "')'")
        } else {
            (find_unquoted(self.text, self.cursor.pos, b',', Some(b')')), "','")
        };
        let end = end.ok_or_else(|| CompileError::syntax(self.cursor.line, missing))?;

        let text = argument(&self.text[self.cursor.pos..end]);
        let line = self.cursor.line + text.leading_lines;
        parse_condition_arg(self.ctx, text.text, current, &mut record)
            .map_err(|expected| CompileError::Argument { line, expected })?;

        self.cursor.line = line + text.trailing_lines;
        self.cursor.pos = if last { end } else { end + 1 };
        Ok(State::ConditionArgs {
            descriptor,
            arg: arg + 1,
            record,
        })
    }
}
