//! Symbol tables rebuilt from the scenario at the start of every compile.

use std::collections::BTreeMap;

use chk_data::scenario::{ANYWHERE, FORCE_COUNT, SWITCH_COUNT};
use chk_data::{GameData, Scenario, Scope, UNIT_TYPE_COUNT};
use log::debug;

use crate::config::CompilerOptions;
use crate::strings::StringInterner;

/// Uppercase ASCII letters and drop whitespace: the form every name lookup compares.
pub(crate) fn name_key(name: &[u8]) -> Vec<u8> {
    name.iter()
        .filter(|b| !b.is_ascii_whitespace())
        .map(u8::to_ascii_uppercase)
        .collect()
}

/// Name to id lookup keyed by canonical name. When two entries share a name the lowest id wins.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: BTreeMap<Vec<u8>, u32>,
}

impl SymbolTable {
    pub fn insert(&mut self, name: &[u8], id: u32) {
        let key = name_key(name);
        if key.is_empty() {
            return;
        }
        self.entries
            .entry(key)
            .and_modify(|existing| *existing = (*existing).min(id))
            .or_insert(id);
    }

    pub fn get(&self, name: &[u8]) -> Option<u32> {
        self.entries.get(&name_key(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything one compile call resolves names against. Built fresh per call.
#[derive(Debug, Clone)]
pub struct CompilerContext {
    pub locations: SymbolTable,
    pub units: SymbolTable,
    pub switches: SymbolTable,
    pub groups: SymbolTable,
    pub scripts: SymbolTable,
    pub strings: StringInterner,
    pub editor_strings: StringInterner,
    pub options: CompilerOptions,
}

impl CompilerContext {
    /// Build every table from `scenario`; triggers in `begin..end` are about to be replaced.
    pub fn build(
        scenario: &Scenario,
        game_data: &GameData,
        begin: usize,
        end: usize,
        options: CompilerOptions,
    ) -> Self {
        let context = Self {
            locations: location_table(scenario),
            units: unit_table(scenario, game_data),
            switches: switch_table(scenario),
            groups: group_table(scenario),
            scripts: script_table(game_data),
            strings: string_table(scenario, Scope::Game, begin, end),
            editor_strings: string_table(scenario, Scope::Editor, begin, end),
            options,
        };
        debug!(
            "symbol tables: {} locations, {} units, {} switches, {} groups, {} scripts, {} game strings, {} editor strings",
            context.locations.len(),
            context.units.len(),
            context.switches.len(),
            context.groups.len(),
            context.scripts.len(),
            context.strings.len(),
            context.editor_strings.len()
        );
        context
    }

    pub fn interner_mut(&mut self, scope: Scope) -> &mut StringInterner {
        match scope {
            Scope::Game => &mut self.strings,
            Scope::Editor => &mut self.editor_strings,
        }
    }
}

fn location_table(scenario: &Scenario) -> SymbolTable {
    let mut table = SymbolTable::default();
    table.insert(b"No Location", 0);
    table.insert(b"Anywhere", ANYWHERE);
    for id in (1..).take(scenario.locations.len()) {
        if id == ANYWHERE {
            continue;
        }
        if let Some(name) = scenario.location_name(id) {
            table.insert(name, id);
        }
    }
    table
}

fn unit_table(scenario: &Scenario, game_data: &GameData) -> SymbolTable {
    let mut table = SymbolTable::default();
    for unit_type in (0u16..).take(UNIT_TYPE_COUNT) {
        let name = scenario
            .unit_name(unit_type)
            .or_else(|| game_data.unit_name(unit_type).map(str::as_bytes));
        if let Some(name) = name {
            table.insert(name, u32::from(unit_type));
        }
    }
    table
}

fn switch_table(scenario: &Scenario) -> SymbolTable {
    let mut table = SymbolTable::default();
    for (switch, id) in (0..SWITCH_COUNT).zip(0u32..) {
        if let Some(name) = scenario.switch_name(switch) {
            table.insert(name, id);
        }
    }
    table
}

fn group_table(scenario: &Scenario) -> SymbolTable {
    let mut table = SymbolTable::default();
    for (force, group) in (0..FORCE_COUNT).zip(18u32..) {
        if let Some(name) = scenario.force_name(force) {
            table.insert(name, group);
        }
    }
    table
}

fn script_table(game_data: &GameData) -> SymbolTable {
    let mut table = SymbolTable::default();
    for script in game_data.ai_scripts {
        table.insert(script.name.as_bytes(), script.id);
    }
    table
}

fn string_table(scenario: &Scenario, scope: Scope, begin: usize, end: usize) -> StringInterner {
    let mut interner = StringInterner::new(scope);
    for id in scenario.non_trigger_string_refs(scope) {
        if let Some(content) = scenario.strings.get(id, scope) {
            interner.seed(id, content, false);
        }
    }
    if scope == Scope::Game {
        for (index, trigger) in scenario.triggers.iter().enumerate() {
            let replaced = (begin..end).contains(&index);
            for id in Scenario::trigger_string_refs(trigger) {
                if let Some(content) = scenario.strings.get(id, scope) {
                    interner.seed(id, content, replaced);
                }
            }
        }
    }
    interner
}
