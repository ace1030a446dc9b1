//! chk_script: compiler for plain-text scenario triggers
//!
//! Trigger text looks like:
//! - `Trigger("Player 1"){`
//! - `Conditions:`
//! - `    Bring("Player 1", "Terran Marine", "Home", At least, 1);`
//! - `Actions:`
//! - `    Display Text Message(Always Display, "Welcome!");`
//! - `Flags:`
//! - `00000000000000000000000000000100;`
//! - `}`
//!
//! Compilation normalizes the text, resolves every name against symbol tables built from the
//! scenario, interns quoted strings, and swaps the resulting triggers into the scenario in one
//! all-or-nothing commit.

mod commit;
mod compiler;
pub mod config;
pub mod generator;
mod keywords;
pub mod listing;
mod literals;
pub mod normalize;
mod parser;
mod resolve;
mod strings;
mod tables;
mod units;

pub use commit::{BuildError, MapCommitter};
pub use compiler::TextTrigCompiler;
pub use config::{CompilerOptions, ConfigError};
pub use generator::TriggerWriter;
pub use listing::triggers_to_toml;
pub use normalize::normalize;
pub use parser::ParsedTrigger;
pub use strings::{Interned, PendingString, StringField, StringInterner, StringSlot};
pub use tables::{CompilerContext, SymbolTable};

use thiserror::Error;

/// Errors reported by a compile call. `Display` is the diagnostic shown to the author.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Unexpected token while reading trigger structure.
    #[error("Line: {line}\n\nExpected: {expected}")]
    Syntax { line: usize, expected: String },
    /// An argument that neither a name nor a number could resolve.
    #[error("Line: {line}\n\nExpected: {expected}")]
    Argument { line: usize, expected: &'static str },
    /// A single argument handed to the one-argument entry points failed to resolve.
    #[error("Unable to parse {record}. Expected: {expected}")]
    SingleArgument { record: &'static str, expected: &'static str },
    /// Too many conditions or actions in one trigger.
    #[error("Line: {line}\n\n{what}")]
    Capacity { line: usize, what: &'static str },
    #[error("Expected 1 trigger but found {found} triggers.")]
    TriggerCount { found: usize },
    #[error("No text errors, but build of new TRIG/STR section failed.\n\n{0}")]
    Build(#[from] BuildError),
    #[error("Compilation aborted due to low memory.")]
    OutOfMemory,
}

impl CompileError {
    pub(crate) fn syntax(line: usize, expected: impl Into<String>) -> Self {
        CompileError::Syntax {
            line,
            expected: expected.into(),
        }
    }
}
