//! Argument descriptors for every condition and action kind the text format knows about.
//!
//! A descriptor fixes the order in which a kind's arguments appear in text, which record
//! field each argument lands in, and the flags a freshly created record starts with.
//! Virtual kinds (`Memory`, `Set Memory`) and `Custom` only exist in text; they are stored
//! as one of the regular types.

use crate::trigger::{Action, Condition};

/// How the argument text of a condition is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionArgKind {
    Unit,
    Location,
    Player,
    Amount,
    NumericComparison,
    ResourceType,
    ScoreType,
    Switch,
    SwitchState,
    Comparison,
    ConditionType,
    TypeIndex,
    Flags,
    MaskFlag,
    MemoryOffset,
}

/// Condition record field written by an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionSlot {
    LocationId,
    Player,
    Amount,
    UnitType,
    Comparison,
    ConditionType,
    TypeIndex,
    Flags,
    MaskFlag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionArg {
    pub kind: ConditionArgKind,
    pub slot: ConditionSlot,
}

/// How the argument text of an action is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionArgKind {
    Location,
    String,
    Player,
    Unit,
    NumUnits,
    CreateUnitProperties,
    Percent,
    Amount,
    ScoreType,
    ResourceType,
    StateMod,
    Order,
    Sound,
    Duration,
    Script,
    AllyState,
    NumericMod,
    Switch,
    SwitchMod,
    ActionType,
    TextFlags,
    Flags,
    Number,
    TypeIndex,
    SecondaryTypeIndex,
    Padding,
    MaskFlag,
    MemoryOffset,
}

/// Action record field written by an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionSlot {
    LocationId,
    StringId,
    SoundStringId,
    Time,
    Group,
    Number,
    TypeIndex,
    ActionType,
    SecondaryType,
    Flags,
    Padding,
    MaskFlag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionArg {
    pub kind: ActionArgKind,
    pub slot: ActionSlot,
}

/// Whether a descriptor maps one-to-one onto a stored type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Standard,
    /// Text-only kind stored as `base_type` with some fields pinned.
    Virtual,
    /// Every field is given explicitly, including the stored type.
    Custom,
}

#[derive(Debug)]
pub struct ConditionDescriptor {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub base_type: u8,
    pub form: Form,
    pub args: &'static [ConditionArg],
    pub default_flags: u8,
}

#[derive(Debug)]
pub struct ActionDescriptor {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub base_type: u8,
    pub form: Form,
    pub args: &'static [ActionArg],
    pub default_flags: u8,
}

/// Uppercase a name and drop whitespace, the form every name comparison works on.
pub fn canonical_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

impl ConditionDescriptor {
    /// Argument at `index`, or `None` once the list is exhausted.
    pub fn arg(&self, index: usize) -> Option<ConditionArg> {
        self.args.get(index).copied()
    }

    /// Look up a descriptor by (already canonical) text name or alias.
    pub fn by_key(key: &str) -> Option<&'static ConditionDescriptor> {
        CONDITIONS
            .iter()
            .find(|d| canonical_key(d.name) == key || d.aliases.iter().any(|a| canonical_key(a) == key))
    }

    /// The standard descriptor for a stored condition type.
    pub fn for_type(condition_type: u8) -> Option<&'static ConditionDescriptor> {
        CONDITIONS
            .iter()
            .find(|d| d.form == Form::Standard && d.base_type == condition_type)
    }

    pub fn custom() -> &'static ConditionDescriptor {
        &CONDITIONS[CONDITIONS.len() - 1]
    }

    /// A fresh record of this kind with default flags and pinned fields applied.
    pub fn new_condition(&self) -> Condition {
        Condition {
            condition_type: self.base_type,
            flags: self.default_flags,
            ..Condition::default()
        }
    }
}

impl ActionDescriptor {
    /// Argument at `index`, or `None` once the list is exhausted.
    pub fn arg(&self, index: usize) -> Option<ActionArg> {
        self.args.get(index).copied()
    }

    /// Look up a descriptor by (already canonical) text name or alias.
    pub fn by_key(key: &str) -> Option<&'static ActionDescriptor> {
        ACTIONS
            .iter()
            .find(|d| canonical_key(d.name) == key || d.aliases.iter().any(|a| canonical_key(a) == key))
    }

    /// The standard descriptor for a stored action type.
    pub fn for_type(action_type: u8) -> Option<&'static ActionDescriptor> {
        ACTIONS.iter().find(|d| d.form == Form::Standard && d.base_type == action_type)
    }

    pub fn custom() -> &'static ActionDescriptor {
        &ACTIONS[ACTIONS.len() - 1]
    }

    pub fn new_action(&self) -> Action {
        Action {
            action_type: self.base_type,
            flags: self.default_flags,
            ..Action::default()
        }
    }

    pub fn uses_string(&self) -> bool {
        self.args.iter().any(|a| a.slot == ActionSlot::StringId)
    }

    pub fn uses_sound(&self) -> bool {
        self.args.iter().any(|a| a.slot == ActionSlot::SoundStringId)
    }
}

/// Whether a stored action of this type references a string through `string_id`.
pub fn action_uses_string(action_type: u8) -> bool {
    ActionDescriptor::for_type(action_type).is_some_and(ActionDescriptor::uses_string)
}

/// Whether a stored action of this type references a sound through `sound_string_id`.
pub fn action_uses_sound(action_type: u8) -> bool {
    ActionDescriptor::for_type(action_type).is_some_and(ActionDescriptor::uses_sound)
}

const fn c(kind: ConditionArgKind, slot: ConditionSlot) -> ConditionArg {
    ConditionArg { kind, slot }
}

const fn a(kind: ActionArgKind, slot: ActionSlot) -> ActionArg {
    ActionArg { kind, slot }
}

mod cond {
    use super::ConditionArgKind as K;
    use super::ConditionSlot as S;
    use super::{ConditionArg, c};

    pub const PLAYER: ConditionArg = c(K::Player, S::Player);
    pub const UNIT: ConditionArg = c(K::Unit, S::UnitType);
    pub const LOCATION: ConditionArg = c(K::Location, S::LocationId);
    pub const COMPARISON: ConditionArg = c(K::NumericComparison, S::Comparison);
    pub const AMOUNT: ConditionArg = c(K::Amount, S::Amount);
    pub const RESOURCE: ConditionArg = c(K::ResourceType, S::TypeIndex);
    pub const SCORE: ConditionArg = c(K::ScoreType, S::TypeIndex);
}

mod act {
    use super::ActionArgKind as K;
    use super::ActionSlot as S;
    use super::{ActionArg, a};

    pub const LOCATION: ActionArg = a(K::Location, S::LocationId);
    pub const DESTINATION: ActionArg = a(K::Location, S::Number);
    pub const STRING: ActionArg = a(K::String, S::StringId);
    pub const SOUND: ActionArg = a(K::Sound, S::SoundStringId);
    pub const PLAYER: ActionArg = a(K::Player, S::Group);
    pub const UNIT: ActionArg = a(K::Unit, S::TypeIndex);
    pub const COUNT: ActionArg = a(K::NumUnits, S::SecondaryType);
    pub const AMOUNT: ActionArg = a(K::Amount, S::Number);
    pub const PERCENT: ActionArg = a(K::Percent, S::Number);
    pub const DURATION: ActionArg = a(K::Duration, S::Time);
    pub const SCORE: ActionArg = a(K::ScoreType, S::TypeIndex);
    pub const RESOURCE: ActionArg = a(K::ResourceType, S::TypeIndex);
    pub const STATE: ActionArg = a(K::StateMod, S::SecondaryType);
    pub const MODIFIER: ActionArg = a(K::NumericMod, S::SecondaryType);
    pub const SCRIPT: ActionArg = a(K::Script, S::Number);
}

const UNIT_USED: u8 = Condition::FLAG_UNIT_TYPE_USED;

macro_rules! condition {
    ($name:literal, $ty:literal, [$($arg:expr),* $(,)?], $flags:expr) => {
        ConditionDescriptor {
            name: $name,
            aliases: &[],
            base_type: $ty,
            form: Form::Standard,
            args: &[$($arg),*],
            default_flags: $flags,
        }
    };
}

macro_rules! action {
    ($name:literal, $ty:literal, [$($arg:expr),* $(,)?], $flags:expr) => {
        ActionDescriptor {
            name: $name,
            aliases: &[],
            base_type: $ty,
            form: Form::Standard,
            args: &[$($arg),*],
            default_flags: $flags,
        }
    };
}

/// Every condition kind. `Custom` stays last.
pub static CONDITIONS: &[ConditionDescriptor] = &[
    condition!("Accumulate", 4, [cond::PLAYER, cond::COMPARISON, cond::AMOUNT, cond::RESOURCE], 0),
    condition!("Always", 22, [], 0),
    condition!("Bring", 3, [cond::PLAYER, cond::UNIT, cond::LOCATION, cond::COMPARISON, cond::AMOUNT], UNIT_USED),
    condition!("Command", 2, [cond::PLAYER, cond::UNIT, cond::COMPARISON, cond::AMOUNT], UNIT_USED),
    condition!("Command the Least", 16, [cond::UNIT], UNIT_USED),
    condition!("Command the Least At", 17, [cond::UNIT, cond::LOCATION], UNIT_USED),
    condition!("Command the Most", 6, [cond::UNIT], UNIT_USED),
    ConditionDescriptor {
        name: "Command the Most At",
        aliases: &["Commands the Most At"],
        base_type: 7,
        form: Form::Standard,
        args: &[cond::UNIT, cond::LOCATION],
        default_flags: UNIT_USED,
    },
    condition!("Countdown Timer", 1, [cond::COMPARISON, cond::AMOUNT], 0),
    condition!("Deaths", 15, [cond::PLAYER, cond::UNIT, cond::COMPARISON, cond::AMOUNT], UNIT_USED),
    condition!("Elapsed Time", 12, [cond::COMPARISON, cond::AMOUNT], 0),
    condition!("Highest Score", 9, [cond::SCORE], 0),
    condition!("Kill", 5, [cond::PLAYER, cond::UNIT, cond::COMPARISON, cond::AMOUNT], UNIT_USED),
    condition!("Least Kills", 18, [cond::UNIT], UNIT_USED),
    condition!("Least Resources", 20, [cond::RESOURCE], 0),
    condition!("Lowest Score", 19, [cond::SCORE], 0),
    condition!("Most Kills", 8, [cond::UNIT], UNIT_USED),
    condition!("Most Resources", 10, [cond::RESOURCE], 0),
    condition!("Never", 23, [], 0),
    condition!("Opponents", 14, [cond::PLAYER, cond::COMPARISON, cond::AMOUNT], 0),
    condition!("Score", 21, [cond::PLAYER, cond::SCORE, cond::COMPARISON, cond::AMOUNT], 0),
    condition!(
        "Switch",
        11,
        [
            c(ConditionArgKind::Switch, ConditionSlot::TypeIndex),
            c(ConditionArgKind::SwitchState, ConditionSlot::Comparison),
        ],
        0
    ),
    ConditionDescriptor {
        name: "Memory",
        aliases: &[],
        base_type: 15,
        form: Form::Virtual,
        args: &[c(ConditionArgKind::MemoryOffset, ConditionSlot::Player), cond::COMPARISON, cond::AMOUNT],
        default_flags: UNIT_USED,
    },
    ConditionDescriptor {
        name: "Custom",
        aliases: &[],
        base_type: 0,
        form: Form::Custom,
        args: &[
            c(ConditionArgKind::Location, ConditionSlot::LocationId),
            c(ConditionArgKind::Player, ConditionSlot::Player),
            c(ConditionArgKind::Amount, ConditionSlot::Amount),
            c(ConditionArgKind::Unit, ConditionSlot::UnitType),
            c(ConditionArgKind::Comparison, ConditionSlot::Comparison),
            c(ConditionArgKind::ConditionType, ConditionSlot::ConditionType),
            c(ConditionArgKind::TypeIndex, ConditionSlot::TypeIndex),
            c(ConditionArgKind::Flags, ConditionSlot::Flags),
            c(ConditionArgKind::MaskFlag, ConditionSlot::MaskFlag),
        ],
        default_flags: 0,
    },
];

const UNIT_ACTION: u8 = Action::FLAG_UNIT_TYPE_USED;
const TEXT_FLAGS: ActionArg = a(ActionArgKind::TextFlags, ActionSlot::Flags);

/// Every action kind. `Custom` stays last.
pub static ACTIONS: &[ActionDescriptor] = &[
    action!("Center View", 10, [act::LOCATION], 0),
    action!("Comment", 47, [act::STRING], 0),
    action!("Create Unit", 44, [act::PLAYER, act::UNIT, act::COUNT, act::LOCATION], UNIT_ACTION),
    action!(
        "Create Unit with Properties",
        11,
        [
            act::PLAYER,
            act::UNIT,
            act::COUNT,
            act::LOCATION,
            a(ActionArgKind::CreateUnitProperties, ActionSlot::Number),
        ],
        UNIT_ACTION | Action::FLAG_UNIT_PROPERTIES_USED
    ),
    action!("Defeat", 2, [], 0),
    action!("Display Text Message", 9, [TEXT_FLAGS, act::STRING], 0),
    action!("Draw", 56, [], 0),
    action!(
        "Give Units to Player",
        48,
        [act::PLAYER, a(ActionArgKind::Player, ActionSlot::Number), act::UNIT, act::COUNT, act::LOCATION],
        UNIT_ACTION
    ),
    action!("Kill Unit", 22, [act::PLAYER, act::UNIT], UNIT_ACTION),
    action!("Kill Unit At Location", 23, [act::PLAYER, act::UNIT, act::COUNT, act::LOCATION], UNIT_ACTION),
    action!("Leader Board Control At Location", 18, [act::STRING, act::UNIT, act::LOCATION], UNIT_ACTION),
    action!("Leader Board Control", 17, [act::STRING, act::UNIT], UNIT_ACTION),
    action!("Leader Board Greed", 40, [act::AMOUNT], 0),
    action!("Leader Board Kills", 20, [act::STRING, act::UNIT], UNIT_ACTION),
    action!("Leader Board Points", 21, [act::STRING, act::SCORE], 0),
    action!("Leader Board Resources", 19, [act::STRING, act::RESOURCE], 0),
    action!("Leader Board Computer Players", 32, [act::STATE], 0),
    action!("Leaderboard Goal Control", 33, [act::STRING, act::UNIT, act::AMOUNT], UNIT_ACTION),
    action!(
        "Leaderboard Goal Control At Location",
        34,
        [act::STRING, act::UNIT, act::AMOUNT, act::LOCATION],
        UNIT_ACTION
    ),
    action!("Leaderboard Goal Kills", 36, [act::STRING, act::UNIT, act::AMOUNT], UNIT_ACTION),
    action!("Leaderboard Goal Points", 37, [act::STRING, act::SCORE, act::AMOUNT], 0),
    action!("Leaderboard Goal Resources", 35, [act::STRING, act::AMOUNT, act::RESOURCE], 0),
    action!("Minimap Ping", 28, [act::LOCATION], 0),
    action!(
        "Modify Unit Energy",
        50,
        [act::PLAYER, act::UNIT, act::PERCENT, act::COUNT, act::LOCATION],
        UNIT_ACTION
    ),
    action!(
        "Modify Unit Hanger Count",
        53,
        [act::PLAYER, act::UNIT, act::AMOUNT, act::COUNT, act::LOCATION],
        UNIT_ACTION
    ),
    action!(
        "Modify Unit Hit Points",
        49,
        [act::PLAYER, act::UNIT, act::PERCENT, act::COUNT, act::LOCATION],
        UNIT_ACTION
    ),
    action!("Modify Unit Resource Amount", 52, [act::PLAYER, act::AMOUNT, act::COUNT, act::LOCATION], 0),
    action!(
        "Modify Unit Shield Points",
        51,
        [act::PLAYER, act::UNIT, act::PERCENT, act::COUNT, act::LOCATION],
        UNIT_ACTION
    ),
    action!("Move Location", 38, [act::PLAYER, act::UNIT, act::LOCATION, act::DESTINATION], UNIT_ACTION),
    action!(
        "Move Unit",
        39,
        [act::PLAYER, act::UNIT, act::COUNT, act::LOCATION, act::DESTINATION],
        UNIT_ACTION
    ),
    action!("Mute Unit Speech", 30, [], 0),
    action!(
        "Order",
        46,
        [
            act::PLAYER,
            act::UNIT,
            act::LOCATION,
            act::DESTINATION,
            a(ActionArgKind::Order, ActionSlot::SecondaryType),
        ],
        UNIT_ACTION
    ),
    action!("Pause Game", 5, [], 0),
    action!("Pause Timer", 54, [], 0),
    action!("Play WAV", 8, [act::SOUND, act::DURATION], 0),
    action!("Preserve Trigger", 3, [], 0),
    action!("Remove Unit", 24, [act::PLAYER, act::UNIT], UNIT_ACTION),
    action!("Remove Unit At Location", 25, [act::PLAYER, act::UNIT, act::COUNT, act::LOCATION], UNIT_ACTION),
    action!("Run AI Script", 15, [act::SCRIPT], 0),
    action!("Run AI Script At Location", 16, [act::SCRIPT, act::LOCATION], 0),
    action!(
        "Set Alliance Status",
        57,
        [act::PLAYER, a(ActionArgKind::AllyState, ActionSlot::TypeIndex)],
        0
    ),
    action!("Set Countdown Timer", 14, [act::MODIFIER, act::DURATION], 0),
    action!("Set Deaths", 45, [act::PLAYER, act::UNIT, act::MODIFIER, act::AMOUNT], UNIT_ACTION),
    action!("Set Doodad State", 42, [act::PLAYER, act::UNIT, act::LOCATION, act::STATE], UNIT_ACTION),
    action!("Set Invincibility", 43, [act::PLAYER, act::UNIT, act::LOCATION, act::STATE], UNIT_ACTION),
    action!("Set Mission Objectives", 12, [act::STRING], 0),
    action!("Set Next Scenario", 41, [act::STRING], 0),
    action!("Set Resources", 26, [act::PLAYER, act::MODIFIER, act::AMOUNT, act::RESOURCE], 0),
    action!("Set Score", 27, [act::PLAYER, act::MODIFIER, act::AMOUNT, act::SCORE], 0),
    action!(
        "Set Switch",
        13,
        [
            a(ActionArgKind::Switch, ActionSlot::Number),
            a(ActionArgKind::SwitchMod, ActionSlot::SecondaryType),
        ],
        0
    ),
    action!("Talking Portrait", 29, [act::UNIT, act::DURATION], UNIT_ACTION),
    action!(
        "Transmission",
        7,
        [
            TEXT_FLAGS,
            act::STRING,
            act::UNIT,
            act::LOCATION,
            act::MODIFIER,
            act::AMOUNT,
            act::SOUND,
            act::DURATION,
        ],
        UNIT_ACTION
    ),
    action!("Unmute Unit Speech", 31, [], 0),
    action!("Unpause Game", 6, [], 0),
    action!("Unpause Timer", 55, [], 0),
    action!("Victory", 1, [], 0),
    action!("Wait", 4, [act::DURATION], 0),
    ActionDescriptor {
        name: "Set Memory",
        aliases: &["Memory"],
        base_type: 45,
        form: Form::Virtual,
        args: &[a(ActionArgKind::MemoryOffset, ActionSlot::Group), act::MODIFIER, act::AMOUNT],
        default_flags: UNIT_ACTION,
    },
    ActionDescriptor {
        name: "Custom",
        aliases: &[],
        base_type: 0,
        form: Form::Custom,
        args: &[
            a(ActionArgKind::Location, ActionSlot::LocationId),
            a(ActionArgKind::String, ActionSlot::StringId),
            a(ActionArgKind::Sound, ActionSlot::SoundStringId),
            a(ActionArgKind::Duration, ActionSlot::Time),
            a(ActionArgKind::Player, ActionSlot::Group),
            a(ActionArgKind::Number, ActionSlot::Number),
            a(ActionArgKind::TypeIndex, ActionSlot::TypeIndex),
            a(ActionArgKind::ActionType, ActionSlot::ActionType),
            a(ActionArgKind::SecondaryTypeIndex, ActionSlot::SecondaryType),
            a(ActionArgKind::Flags, ActionSlot::Flags),
            a(ActionArgKind::Padding, ActionSlot::Padding),
            a(ActionArgKind::MaskFlag, ActionSlot::MaskFlag),
        ],
        default_flags: 0,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_after_canonicalization() {
        let mut keys: Vec<String> = CONDITIONS.iter().map(|d| canonical_key(d.name)).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), CONDITIONS.len());

        let mut keys: Vec<String> = ACTIONS.iter().map(|d| canonical_key(d.name)).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), ACTIONS.len());
    }

    #[test]
    fn aliases_resolve_to_their_descriptor() {
        let most_at = ConditionDescriptor::by_key("COMMANDSTHEMOSTAT").expect("alias");
        assert_eq!(most_at.base_type, 7);
        let memory = ActionDescriptor::by_key("MEMORY").expect("alias");
        assert_eq!(memory.name, "Set Memory");
        assert_eq!(memory.base_type, 45);
    }

    #[test]
    fn standard_descriptor_lookup_skips_virtual_kinds() {
        assert_eq!(ConditionDescriptor::for_type(15).map(|d| d.name), Some("Deaths"));
        assert_eq!(ActionDescriptor::for_type(45).map(|d| d.name), Some("Set Deaths"));
        assert!(ConditionDescriptor::for_type(13).is_none());
        assert!(ActionDescriptor::for_type(59).is_none());
    }

    #[test]
    fn virtual_kinds_share_base_defaults() {
        let memory = ConditionDescriptor::by_key("MEMORY").expect("memory");
        let deaths = ConditionDescriptor::for_type(memory.base_type).expect("deaths");
        assert_eq!(memory.default_flags, deaths.default_flags);
    }

    #[test]
    fn string_and_sound_usage_follow_descriptor_slots() {
        assert!(action_uses_string(9));
        assert!(!action_uses_sound(9));
        assert!(action_uses_string(7));
        assert!(action_uses_sound(7));
        assert!(action_uses_sound(8));
        assert!(!action_uses_string(1));
        assert!(!action_uses_string(200));
    }

    #[test]
    fn custom_descriptors_cover_every_slot() {
        assert_eq!(ConditionDescriptor::custom().args.len(), 9);
        assert_eq!(ActionDescriptor::custom().args.len(), 12);
    }
}
