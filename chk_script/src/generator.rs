//! Renders trigger records back into trigger text.
//!
//! Names are only written when they resolve back to the id they came from; anything else is
//! written as a number. Records that do not fit their descriptor are written as `Custom(...)`.

use std::fmt::Write as _;

use chk_data::descriptors::{ActionArgKind, ActionSlot, ConditionArgKind, ConditionSlot, Form};
use chk_data::{
    ANYWHERE, Action, ActionDescriptor, Condition, ConditionDescriptor, GameData, NO_STRING, OWNER_SLOTS, Scenario,
    Scope, Trigger, script_code,
};

use crate::config::CompilerOptions;
use crate::keywords::{
    ALL_UNITS, ALLIANCE_STATUS, ALWAYS_DISPLAY, DONT_ALWAYS_DISPLAY, Keywords, NUMERIC_COMPARISONS,
    NUMERIC_MODIFIERS, ORDERS, RESOURCES, SCORES, STATE_MODIFIERS, SWITCH_MODIFIERS, SWITCH_STATES, name_of,
};
use crate::literals::{memory_address, parse_memory_address};
use crate::normalize::normalize;
use crate::resolve::{resolve_location, resolve_player, resolve_script, resolve_switch, resolve_unit};
use crate::tables::CompilerContext;

const SEPARATOR: &str = "//-----------------------------------------------------------------//";

/// Stored condition type of `Deaths`, which `Memory` shares.
const DEATHS: u8 = 15;
/// Stored action type of `Set Deaths`, which `Set Memory` shares.
const SET_DEATHS: u8 = 45;

/// Display names for player ids; the index is the id.
const PLAYER_NAMES: [&str; 27] = [
    "Player 1",
    "Player 2",
    "Player 3",
    "Player 4",
    "Player 5",
    "Player 6",
    "Player 7",
    "Player 8",
    "Player 9",
    "Player 10",
    "Player 11",
    "Player 12",
    "None",
    "Current Player",
    "Foes",
    "Allies",
    "Neutral Players",
    "All Players",
    "Force 1",
    "Force 2",
    "Force 3",
    "Force 4",
    "Unused 1",
    "Unused 2",
    "Unused 3",
    "Unused 4",
    "Non Allied Victory Players",
];

/// Quote `bytes` so that normalizing the result gives the same bytes back.
pub fn quote(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    for byte in bytes {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\r' => out.push_str("\\r"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'<' => out.push_str("<3C>"),
            0x20..=0x7E => out.push(char::from(*byte)),
            other => {
                let _ = write!(out, "<{other:02X}>");
            },
        }
    }
    out.push('"');
    out
}

fn read_condition_slot(record: &Condition, slot: ConditionSlot) -> u32 {
    match slot {
        ConditionSlot::LocationId => record.location_id,
        ConditionSlot::Player => record.player,
        ConditionSlot::Amount => record.amount,
        ConditionSlot::UnitType => u32::from(record.unit_type),
        ConditionSlot::Comparison => u32::from(record.comparison),
        ConditionSlot::ConditionType => u32::from(record.condition_type),
        ConditionSlot::TypeIndex => u32::from(record.type_index),
        ConditionSlot::Flags => u32::from(record.flags),
        ConditionSlot::MaskFlag => u32::from(record.mask_flag),
    }
}

fn copy_condition_slot(from: &Condition, to: &mut Condition, slot: ConditionSlot) {
    match slot {
        ConditionSlot::LocationId => to.location_id = from.location_id,
        ConditionSlot::Player => to.player = from.player,
        ConditionSlot::Amount => to.amount = from.amount,
        ConditionSlot::UnitType => to.unit_type = from.unit_type,
        ConditionSlot::Comparison => to.comparison = from.comparison,
        ConditionSlot::ConditionType => to.condition_type = from.condition_type,
        ConditionSlot::TypeIndex => to.type_index = from.type_index,
        ConditionSlot::Flags => to.flags = from.flags,
        ConditionSlot::MaskFlag => to.mask_flag = from.mask_flag,
    }
}

fn read_action_slot(record: &Action, slot: ActionSlot) -> u32 {
    match slot {
        ActionSlot::LocationId => record.location_id,
        ActionSlot::StringId => record.string_id,
        ActionSlot::SoundStringId => record.sound_string_id,
        ActionSlot::Time => record.time,
        ActionSlot::Group => record.group,
        ActionSlot::Number => record.number,
        ActionSlot::TypeIndex => u32::from(record.type_index),
        ActionSlot::ActionType => u32::from(record.action_type),
        ActionSlot::SecondaryType => u32::from(record.secondary_type),
        ActionSlot::Flags => u32::from(record.flags),
        ActionSlot::Padding => u32::from(record.padding),
        ActionSlot::MaskFlag => u32::from(record.mask_flag),
    }
}

fn copy_action_slot(from: &Action, to: &mut Action, slot: ActionSlot) {
    match slot {
        ActionSlot::LocationId => to.location_id = from.location_id,
        ActionSlot::StringId => to.string_id = from.string_id,
        ActionSlot::SoundStringId => to.sound_string_id = from.sound_string_id,
        ActionSlot::Time => to.time = from.time,
        ActionSlot::Group => to.group = from.group,
        ActionSlot::Number => to.number = from.number,
        ActionSlot::TypeIndex => to.type_index = from.type_index,
        ActionSlot::ActionType => to.action_type = from.action_type,
        ActionSlot::SecondaryType => to.secondary_type = from.secondary_type,
        ActionSlot::Flags => to.flags = from.flags,
        ActionSlot::Padding => to.padding = from.padding,
        ActionSlot::MaskFlag => to.mask_flag = from.mask_flag,
    }
}

/// Whether `descriptor` reproduces every field of `record`, given the disabled marker.
fn condition_fits(descriptor: &ConditionDescriptor, record: &Condition) -> bool {
    let mut rebuilt = descriptor.new_condition();
    rebuilt.flags |= record.flags & Condition::FLAG_DISABLED;
    for arg in descriptor.args {
        copy_condition_slot(record, &mut rebuilt, arg.slot);
    }
    rebuilt == *record
}

fn action_fits(descriptor: &ActionDescriptor, record: &Action) -> bool {
    let mut rebuilt = descriptor.new_action();
    rebuilt.flags |= record.flags & Action::FLAG_DISABLED;
    for arg in descriptor.args {
        copy_action_slot(record, &mut rebuilt, arg.slot);
    }
    rebuilt == *record
}

fn keyword_or_number(table: Keywords, value: u32) -> String {
    u8::try_from(value)
        .ok()
        .and_then(|value| name_of(table, value))
        .map_or_else(|| value.to_string(), str::to_string)
}

/// Writes triggers as text that compiles back to the same records against the same scenario.
pub struct TriggerWriter<'a> {
    scenario: &'a Scenario,
    game_data: GameData,
    ctx: CompilerContext,
}

impl<'a> TriggerWriter<'a> {
    pub fn new(scenario: &'a Scenario, game_data: &GameData, options: CompilerOptions) -> Self {
        Self {
            scenario,
            game_data: *game_data,
            ctx: CompilerContext::build(scenario, game_data, 0, 0, options),
        }
    }

    /// Every trigger of the scenario.
    pub fn write_scenario(&self) -> String {
        self.write_triggers(&self.scenario.triggers)
    }

    pub fn write_triggers(&self, triggers: &[Trigger]) -> String {
        let mut out = String::new();
        for (index, trigger) in triggers.iter().enumerate() {
            if index > 0 {
                out.push_str(SEPARATOR);
                out.push_str("\n\n");
            }
            out.push_str(&self.write_trigger(trigger));
            out.push('\n');
        }
        out
    }

    pub fn write_trigger(&self, trigger: &Trigger) -> String {
        let owners: Vec<String> = (0..OWNER_SLOTS)
            .filter(|slot| trigger.owners[*slot] != 0)
            .map(|slot| {
                let name = self.player(u32::try_from(slot).unwrap_or(u32::MAX));
                match trigger.owners[slot] {
                    1 => name,
                    byte => format!("{name}:{byte}"),
                }
            })
            .collect();

        let mut out = format!("Trigger({}){{\n", owners.join(", "));
        out.push_str("Conditions:\n");
        for condition in &trigger.conditions {
            let _ = writeln!(out, "\t{}", self.write_condition(condition));
        }
        out.push_str("\nActions:\n");
        for action in &trigger.actions {
            let _ = writeln!(out, "\t{}", self.write_action(action));
        }
        if trigger.flags != 0 {
            let _ = write!(out, "\nFlags:\n{:032b};\n", trigger.flags);
        }
        out.push_str("}\n");
        out
    }

    pub fn write_condition(&self, record: &Condition) -> String {
        let mut candidates = Vec::with_capacity(3);
        if record.condition_type == DEATHS && record.player >= OWNER_SLOTS as u32 {
            candidates.extend(ConditionDescriptor::by_key("MEMORY"));
        }
        candidates.extend(ConditionDescriptor::for_type(record.condition_type));
        candidates.push(ConditionDescriptor::custom());

        for descriptor in candidates {
            if descriptor.form != Form::Custom && !condition_fits(descriptor, record) {
                continue;
            }
            let args: Option<Vec<String>> = descriptor
                .args
                .iter()
                .map(|arg| self.condition_arg(arg.kind, read_condition_slot(record, arg.slot)))
                .collect();
            if let Some(args) = args {
                let marker = if record.is_disabled() { ";" } else { "" };
                return format!("{marker}{}({});", descriptor.name, args.join(", "));
            }
        }
        let marker = if record.is_disabled() { ";" } else { "" };
        let slots = ConditionDescriptor::custom()
            .args
            .iter()
            .map(|arg| read_condition_slot(record, arg.slot).to_string())
            .collect::<Vec<_>>();
        format!("{marker}Custom({});", slots.join(", "))
    }

    pub fn write_action(&self, record: &Action) -> String {
        let mut candidates = Vec::with_capacity(3);
        if record.action_type == SET_DEATHS && record.group >= OWNER_SLOTS as u32 {
            candidates.extend(ActionDescriptor::by_key("SETMEMORY"));
        }
        candidates.extend(ActionDescriptor::for_type(record.action_type));
        candidates.push(ActionDescriptor::custom());

        let marker = if record.is_disabled() { ";" } else { "" };
        for descriptor in candidates {
            if descriptor.form != Form::Custom && !action_fits(descriptor, record) {
                continue;
            }
            let args: Option<Vec<String>> = descriptor
                .args
                .iter()
                .map(|arg| self.action_arg(descriptor, arg.kind, record, read_action_slot(record, arg.slot)))
                .collect();
            if let Some(args) = args {
                return format!("{marker}{}({});", descriptor.name, args.join(", "));
            }
        }
        let slots = ActionDescriptor::custom()
            .args
            .iter()
            .map(|arg| read_action_slot(record, arg.slot).to_string())
            .collect::<Vec<_>>();
        format!("{marker}Custom({});", slots.join(", "))
    }

    fn condition_arg(&self, kind: ConditionArgKind, value: u32) -> Option<String> {
        Some(match kind {
            ConditionArgKind::Unit => self.unit(value),
            ConditionArgKind::Location => self.location(value),
            ConditionArgKind::Player => self.player(value),
            ConditionArgKind::NumericComparison => keyword_or_number(NUMERIC_COMPARISONS, value),
            ConditionArgKind::ResourceType => keyword_or_number(RESOURCES, value),
            ConditionArgKind::ScoreType => keyword_or_number(SCORES, value),
            ConditionArgKind::Switch => self.switch(value),
            ConditionArgKind::SwitchState => keyword_or_number(SWITCH_STATES, value),
            ConditionArgKind::MemoryOffset => return self.memory(value),
            ConditionArgKind::Amount
            | ConditionArgKind::Comparison
            | ConditionArgKind::ConditionType
            | ConditionArgKind::TypeIndex
            | ConditionArgKind::Flags
            | ConditionArgKind::MaskFlag => value.to_string(),
        })
    }

    fn action_arg(
        &self,
        descriptor: &ActionDescriptor,
        kind: ActionArgKind,
        record: &Action,
        value: u32,
    ) -> Option<String> {
        Some(match kind {
            ActionArgKind::Location => self.location(value),
            ActionArgKind::String => self.string(value, "No String"),
            ActionArgKind::Sound => self.string(value, "No WAV"),
            ActionArgKind::Player => self.player(value),
            ActionArgKind::Unit => self.unit(value),
            ActionArgKind::NumUnits if value == 0 => ALL_UNITS.to_string(),
            ActionArgKind::ScoreType => keyword_or_number(SCORES, value),
            ActionArgKind::ResourceType => keyword_or_number(RESOURCES, value),
            ActionArgKind::StateMod => keyword_or_number(STATE_MODIFIERS, value),
            ActionArgKind::Order => keyword_or_number(ORDERS, value),
            ActionArgKind::AllyState => keyword_or_number(ALLIANCE_STATUS, value),
            ActionArgKind::NumericMod => keyword_or_number(NUMERIC_MODIFIERS, value),
            ActionArgKind::SwitchMod => keyword_or_number(SWITCH_MODIFIERS, value),
            ActionArgKind::Script => self.script(value),
            ActionArgKind::Switch => self.switch(value),
            ActionArgKind::TextFlags => {
                let base = descriptor.default_flags | (record.flags & Action::FLAG_DISABLED);
                if record.flags == base | Action::FLAG_ALWAYS_DISPLAY {
                    ALWAYS_DISPLAY.to_string()
                } else if record.flags == base {
                    DONT_ALWAYS_DISPLAY.to_string()
                } else {
                    value.to_string()
                }
            },
            ActionArgKind::MemoryOffset => return self.memory(value),
            ActionArgKind::NumUnits
            | ActionArgKind::CreateUnitProperties
            | ActionArgKind::Percent
            | ActionArgKind::Amount
            | ActionArgKind::Duration
            | ActionArgKind::ActionType
            | ActionArgKind::Flags
            | ActionArgKind::Number
            | ActionArgKind::TypeIndex
            | ActionArgKind::SecondaryTypeIndex
            | ActionArgKind::Padding
            | ActionArgKind::MaskFlag => value.to_string(),
        })
    }

    /// The first quoted candidate that resolves back to `id`, or `id` itself.
    fn named<'n>(
        &self,
        id: u32,
        candidates: impl IntoIterator<Item = &'n [u8]>,
        resolve: impl Fn(&CompilerContext, &[u8]) -> Option<u32>,
    ) -> String {
        candidates
            .into_iter()
            .map(quote)
            .find(|quoted| {
                normalize(quoted.as_bytes())
                    .is_ok_and(|normalized| resolve(&self.ctx, &normalized) == Some(id))
            })
            .unwrap_or_else(|| id.to_string())
    }

    fn player(&self, id: u32) -> String {
        let name = usize::try_from(id).ok().and_then(|id| PLAYER_NAMES.get(id));
        self.named(id, name.map(|name| name.as_bytes()), resolve_player)
    }

    fn location(&self, id: u32) -> String {
        let name = match id {
            0 => Some(&b"No Location"[..]),
            ANYWHERE => Some(&b"Anywhere"[..]),
            _ => self.scenario.location_name(id),
        };
        self.named(id, name, resolve_location)
    }

    fn unit(&self, id: u32) -> String {
        let Ok(unit) = u16::try_from(id) else {
            return id.to_string();
        };
        let custom = self.scenario.unit_name(unit);
        let default = self.game_data.unit_name(unit).map(str::as_bytes);
        self.named(id, custom.into_iter().chain(default), |ctx, text| {
            resolve_unit(ctx, text).map(u32::from)
        })
    }

    fn switch(&self, id: u32) -> String {
        let custom = usize::try_from(id).ok().and_then(|switch| self.scenario.switch_name(switch));
        let numbered = id.checked_add(1).map(|n| format!("Switch {n}"));
        let candidates = custom.into_iter().chain(numbered.as_deref().map(str::as_bytes));
        self.named(id, candidates, resolve_switch)
    }

    fn script(&self, id: u32) -> String {
        if id == 0 {
            return "No Script".to_string();
        }
        let name = self.game_data.script_name(id).map(str::as_bytes);
        let code = script_code(id);
        let candidates = name.into_iter().chain(code.as_deref().map(str::as_bytes));
        self.named(id, candidates, resolve_script)
    }

    /// A string argument: the sentinel for 0, the quoted content when compiling it would give the
    /// same id back, otherwise the raw id.
    fn string(&self, id: u32, empty: &str) -> String {
        if id == NO_STRING {
            return empty.to_string();
        }
        match self.scenario.strings.get(id, Scope::Game) {
            Some(content)
                if !content.eq_ignore_ascii_case(empty.as_bytes())
                    && self.ctx.strings.existing_id(content) == Some(id) =>
            {
                quote(content)
            },
            _ => id.to_string(),
        }
    }

    fn memory(&self, offset: u32) -> Option<String> {
        if !self.ctx.options.use_addresses_for_memory {
            return Some(offset.to_string());
        }
        let table = self.ctx.options.death_table_offset;
        let address = memory_address(offset, table);
        let text = address.to_string();
        (parse_memory_address(text.as_bytes(), table) == Some(offset)).then_some(text)
    }
}
