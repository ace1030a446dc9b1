//! Line-aware state machine over normalized trigger text.
//!
//! Every state consumes one token group and names the state that follows. Errors carry the line
//! the cursor sat on and what the state would have accepted.

mod actions;
mod conditions;
mod helpers;

use std::mem;

use chk_data::trigger::OWNED;
use chk_data::{Action, ActionDescriptor, Condition, ConditionDescriptor, OWNER_SLOTS, Trigger};
use log::trace;

use crate::CompileError;
use crate::literals::{parse_binary_long, parse_byte, parse_long};
use crate::resolve::resolve_player;
use crate::tables::CompilerContext;
use helpers::{Cursor, find_unquoted, line_end, skip_line_ends};

pub(crate) use actions::{action_descriptor, parse_action_arg};
pub(crate) use conditions::{condition_descriptor, parse_condition_arg};

/// A compiled trigger and the line its `Trigger(` header started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTrigger {
    pub trigger: Trigger,
    pub src_line: usize,
}

#[derive(Debug)]
enum State {
    Header,
    PlayerList,
    OpenBrace,
    SectionKeyword,
    ConditionEntry,
    ConditionArgs {
        descriptor: &'static ConditionDescriptor,
        arg: usize,
        record: Condition,
    },
    ActionEntry,
    ActionArgs {
        descriptor: &'static ActionDescriptor,
        arg: usize,
        record: Action,
    },
    FlagsValue,
    CloseBrace,
    Complete,
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::Header => "header",
            State::PlayerList => "player list",
            State::OpenBrace => "open brace",
            State::SectionKeyword => "section keyword",
            State::ConditionEntry => "condition entry",
            State::ConditionArgs { .. } => "condition arguments",
            State::ActionEntry => "action entry",
            State::ActionArgs { .. } => "action arguments",
            State::FlagsValue => "flags value",
            State::CloseBrace => "close brace",
            State::Complete => "complete",
        }
    }

    /// What the state accepts, reported when the text ends inside it.
    fn expectation(&self) -> &'static str {
        match self {
            State::Header | State::Complete => "\"Trigger\" or End of Text",
            State::PlayerList => "',' or ')'",
            State::OpenBrace => "'{'",
            State::SectionKeyword => "\"Conditions\" or \"Actions\" or \"Flags\" or '}'",
            State::ConditionEntry => "Condition Name or \"Actions\" or \"Flags\" or '}'",
            State::ConditionArgs { .. } => "Condition Argument",
            State::ActionEntry => "Action Name or '}'",
            State::ActionArgs { .. } => "Action Argument",
            State::FlagsValue => "Binary Execution Flags (32-bit max).",
            State::CloseBrace => "'}'",
        }
    }
}

pub(crate) struct Parser<'a> {
    text: &'a [u8],
    cursor: Cursor,
    ctx: &'a mut CompilerContext,
    trigger: Trigger,
    trigger_line: usize,
    output: Vec<ParsedTrigger>,
}

/// Parse normalized text into triggers. Quoted strings are interned into `ctx` as they are met.
pub(crate) fn parse(text: &[u8], ctx: &mut CompilerContext) -> Result<Vec<ParsedTrigger>, CompileError> {
    let quoted = text.iter().filter(|byte| **byte == b'"').count() / 2;
    ctx.strings.reserve(quoted).map_err(|_| CompileError::OutOfMemory)?;
    Parser {
        text,
        cursor: Cursor::start(),
        ctx,
        trigger: Trigger::default(),
        trigger_line: 1,
        output: Vec::new(),
    }
    .run()
}

impl<'a> Parser<'a> {
    fn run(mut self) -> Result<Vec<ParsedTrigger>, CompileError> {
        let mut state = State::Header;
        loop {
            if let State::Complete = state {
                self.finish_trigger()?;
                state = State::Header;
            }
            self.cursor = skip_line_ends(self.text, self.cursor);
            if self.cursor.pos >= self.text.len() {
                return match state {
                    State::Header => Ok(self.output),
                    other => Err(CompileError::syntax(self.cursor.line, other.expectation())),
                };
            }
            trace!("line {}: {}", self.cursor.line, state.name());
            state = self.step(state)?;
        }
    }

    fn step(&mut self, state: State) -> Result<State, CompileError> {
        match state {
            State::Header => self.header(),
            State::PlayerList => self.player_list(),
            State::OpenBrace => {
                self.expect_byte(b'{', "'{'")?;
                Ok(State::SectionKeyword)
            },
            State::SectionKeyword => self.section(),
            State::ConditionEntry => self.condition_entry(),
            State::ConditionArgs { descriptor, arg, record } => self.condition_args(descriptor, arg, record),
            State::ActionEntry => self.action_entry(),
            State::ActionArgs { descriptor, arg, record } => self.action_args(descriptor, arg, record),
            State::FlagsValue => self.flags_value(),
            State::CloseBrace => {
                self.expect_byte(b'}', "'}'")?;
                Ok(State::Complete)
            },
            State::Complete => Ok(State::Header),
        }
    }

    fn finish_trigger(&mut self) -> Result<(), CompileError> {
        self.output.try_reserve(1).map_err(|_| CompileError::OutOfMemory)?;
        self.output.push(ParsedTrigger {
            trigger: mem::take(&mut self.trigger),
            src_line: self.trigger_line,
        });
        Ok(())
    }

    fn peek(&self) -> Option<u8> {
        self.text.get(self.cursor.pos).copied()
    }

    fn rest(&self) -> &'a [u8] {
        &self.text[self.cursor.pos..]
    }

    /// Consume `byte`, or fail with `expected` on the current line.
    fn expect_byte(&mut self, byte: u8, expected: &'static str) -> Result<(), CompileError> {
        if self.peek() == Some(byte) {
            self.cursor = self.cursor.advance(1);
            Ok(())
        } else {
            Err(CompileError::syntax(self.cursor.line, expected))
        }
    }

    /// If the text continues with `keyword`, consume it and the `:` after it. `None` leaves the
    /// cursor untouched.
    fn section_keyword(&mut self, keyword: &[u8]) -> Option<Result<Cursor, CompileError>> {
        if !self.rest().starts_with(keyword) {
            return None;
        }
        let after = skip_line_ends(self.text, self.cursor.advance(keyword.len()));
        Some(match self.text.get(after.pos) {
            Some(b':') => Ok(after.advance(1)),
            _ => Err(CompileError::syntax(after.line, "':'")),
        })
    }

    /// `Trigger(`.
    fn header(&mut self) -> Result<State, CompileError> {
        if !self.rest().starts_with(b"TRIGGER") {
            return Err(CompileError::syntax(self.cursor.line, "\"Trigger\" or End of Text"));
        }
        self.trigger_line = self.cursor.line;
        self.cursor = skip_line_ends(self.text, self.cursor.advance(b"TRIGGER".len()));
        self.expect_byte(b'(', "'('")?;
        Ok(State::PlayerList)
    }

    /// One owner entry, `Name` or `Name:byte`, followed by `,` or `)`.
    fn player_list(&mut self) -> Result<State, CompileError> {
        if self.peek() == Some(b')') {
            self.cursor = self.cursor.advance(1);
            return Ok(State::OpenBrace);
        }
        let start = self.cursor.pos;
        let end = find_unquoted(self.text, start, b',', Some(b'{'))
            .or_else(|| find_unquoted(self.text, start, b')', None))
            .ok_or_else(|| CompileError::syntax(self.cursor.line, "',' or ')'"))?;
        let end = end.min(line_end(self.text, start));

        let (slot, owner) = self
            .owner(&self.text[start..end])
            .ok_or_else(|| CompileError::syntax(self.cursor.line, "Player Identifier"))?;
        self.trigger.owners[slot] = owner;

        self.cursor = skip_line_ends(self.text, self.cursor.at(end));
        match self.peek() {
            Some(b')') => {
                self.cursor = self.cursor.advance(1);
                Ok(State::OpenBrace)
            },
            Some(b',') => {
                self.cursor = self.cursor.advance(1);
                Ok(State::PlayerList)
            },
            _ => Err(CompileError::syntax(self.cursor.line, "',' or ')'")),
        }
    }

    /// Owner slot and the byte stored in it. A malformed explicit byte falls back to "owned".
    fn owner(&self, entry: &[u8]) -> Option<(usize, u8)> {
        let (name, value) = match find_unquoted(entry, 0, b':', None) {
            Some(colon) => (&entry[..colon], parse_byte(&entry[colon + 1..]).unwrap_or(OWNED)),
            None => (entry, OWNED),
        };
        let player = parse_long(name).or_else(|| resolve_player(&*self.ctx, name))?;
        let slot = usize::try_from(player).ok().filter(|slot| *slot < OWNER_SLOTS)?;
        Some((slot, value))
    }

    /// `Conditions:`, `Actions:`, `Flags:` or `}`.
    fn section(&mut self) -> Result<State, CompileError> {
        if self.peek() == Some(b'}') {
            self.cursor = self.cursor.advance(1);
            return Ok(State::Complete);
        }
        for (keyword, next) in [
            (&b"CONDITIONS"[..], State::ConditionEntry),
            (&b"ACTIONS"[..], State::ActionEntry),
            (&b"FLAGS"[..], State::FlagsValue),
        ] {
            if let Some(colon) = self.section_keyword(keyword) {
                self.cursor = colon?;
                return Ok(next);
            }
        }
        Err(CompileError::syntax(
            self.cursor.line,
            "\"Conditions\" or \"Actions\" or \"Flags\" or '}'",
        ))
    }

    /// Up to 32 binary digits and `;`, or a lone `;` that leaves the flags at zero.
    fn flags_value(&mut self) -> Result<State, CompileError> {
        if self.peek() == Some(b';') {
            self.cursor = self.cursor.advance(1);
            return Ok(State::CloseBrace);
        }
        let start = self.cursor.pos;
        let semicolon = find_unquoted(self.text, start, b';', None)
            .ok_or_else(|| CompileError::syntax(self.cursor.line, "';'"))?;
        let value = helpers::argument(&self.text[start..semicolon]);
        let line = self.cursor.line + value.leading_lines;
        self.trigger.flags = parse_binary_long(value.text)
            .ok_or_else(|| CompileError::syntax(line, "Binary Execution Flags (32-bit max)."))?;
        self.cursor.line = line + value.trailing_lines;
        self.cursor.pos = semicolon + 1;
        Ok(State::CloseBrace)
    }
}
