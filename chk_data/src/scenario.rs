use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::descriptors::{action_uses_sound, action_uses_string};
use crate::trigger::Trigger;

/// Id of the string that means "no string".
pub const NO_STRING: u32 = 0;
/// Location id reserved for the whole map.
pub const ANYWHERE: u32 = 64;
/// Switches a scenario can name.
pub const SWITCH_COUNT: usize = 256;
/// Forces a scenario can name.
pub const FORCE_COUNT: usize = 4;

/// Which string section a string id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Strings the game itself reads (trigger text, location names, ...).
    Game,
    /// Editor-only strings that override names shown while editing.
    Editor,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Game => f.write_str("game"),
            Scope::Editor => f.write_str("editor"),
        }
    }
}

/// A rectangular map region with an optional name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub string_id: u32,
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub elevation_flags: u16,
}

/// Numbered strings for one scope. Ids are 1-based; a freed id leaves a hole that the next
/// added string may reuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringSection {
    pub capacity: usize,
    #[serde(default)]
    pub entries: Vec<Option<Vec<u8>>>,
}

impl StringSection {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    pub fn get(&self, id: u32) -> Option<&[u8]> {
        let slot = usize::try_from(id).ok()?.checked_sub(1)?;
        self.entries.get(slot)?.as_deref()
    }

    /// Store `bytes` in the lowest free slot and return its id, or `None` when full.
    pub fn add(&mut self, bytes: &[u8]) -> Option<u32> {
        let slot = match self.entries.iter().position(Option::is_none) {
            Some(slot) => slot,
            None if self.entries.len() < self.capacity => {
                self.entries.push(None);
                self.entries.len() - 1
            },
            None => return None,
        };
        let id = u32::try_from(slot + 1).ok()?;
        self.entries[slot] = Some(bytes.to_vec());
        Some(id)
    }

    pub fn delete(&mut self, id: u32) {
        if let Some(slot) = usize::try_from(id).ok().and_then(|id| id.checked_sub(1))
            && let Some(entry) = self.entries.get_mut(slot)
        {
            *entry = None;
        }
        while self.entries.last().is_some_and(Option::is_none) {
            self.entries.pop();
        }
    }

    /// Iterate over `(id, bytes)` for every present string.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u8])> {
        self.entries
            .iter()
            .zip(1u32..)
            .filter_map(|(entry, id)| entry.as_deref().map(|bytes| (id, bytes)))
    }

    pub fn used_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
}

/// Both string sections of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringStore {
    pub game: StringSection,
    pub editor: StringSection,
}

impl Default for StringStore {
    fn default() -> Self {
        Self {
            game: StringSection::with_capacity(StringStore::DEFAULT_GAME_CAPACITY),
            editor: StringSection::with_capacity(StringStore::DEFAULT_EDITOR_CAPACITY),
        }
    }
}

impl StringStore {
    pub const DEFAULT_GAME_CAPACITY: usize = 1024;
    pub const DEFAULT_EDITOR_CAPACITY: usize = 65535;

    pub fn section(&self, scope: Scope) -> &StringSection {
        match scope {
            Scope::Game => &self.game,
            Scope::Editor => &self.editor,
        }
    }

    pub fn section_mut(&mut self, scope: Scope) -> &mut StringSection {
        match scope {
            Scope::Game => &mut self.game,
            Scope::Editor => &mut self.editor,
        }
    }

    pub fn get(&self, id: u32, scope: Scope) -> Option<&[u8]> {
        self.section(scope).get(id)
    }

    pub fn add(&mut self, bytes: &[u8], scope: Scope) -> Option<u32> {
        self.section_mut(scope).add(bytes)
    }

    pub fn used_count(&self, scope: Scope) -> usize {
        self.section(scope).used_count()
    }

    /// Snapshot both sections so a failed edit can be undone with [`StringStore::restore`].
    pub fn backup(&self) -> StringStore {
        self.clone()
    }

    pub fn restore(&mut self, snapshot: StringStore) {
        *self = snapshot;
    }
}

/// Editor-scope name overrides. When present they win over the game-scope names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorNames {
    pub force_names: [u32; FORCE_COUNT],
    pub unit_names: BTreeMap<u16, u32>,
}

/// Errors raised by document edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    TriggerRange { begin: usize, end: usize, len: usize },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::TriggerRange { begin, end, len } => {
                write!(f, "trigger range {begin}..{end} is outside the {len} triggers of the scenario")
            },
        }
    }
}

impl std::error::Error for DocumentError {}

/// The editable scenario: locations, names, strings and triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub scenario_name: u32,
    #[serde(default)]
    pub scenario_description: u32,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub strings: StringStore,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    #[serde(default)]
    pub force_names: [u32; FORCE_COUNT],
    #[serde(default = "default_switch_names")]
    pub switch_names: Vec<u32>,
    #[serde(default)]
    pub unit_names: BTreeMap<u16, u32>,
    #[serde(default)]
    pub editor_names: EditorNames,
}

fn default_switch_names() -> Vec<u32> {
    vec![NO_STRING; SWITCH_COUNT]
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            scenario_name: NO_STRING,
            scenario_description: NO_STRING,
            locations: Vec::new(),
            strings: StringStore::default(),
            triggers: Vec::new(),
            force_names: [NO_STRING; FORCE_COUNT],
            switch_names: default_switch_names(),
            unit_names: BTreeMap::new(),
            editor_names: EditorNames::default(),
        }
    }
}

impl Scenario {
    /// Location by 1-based id.
    pub fn location(&self, id: u32) -> Option<&Location> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.locations.get(index)
    }

    pub fn location_name(&self, id: u32) -> Option<&[u8]> {
        let location = self.location(id)?;
        self.strings.get(location.string_id, Scope::Game)
    }

    pub fn switch_name(&self, switch: usize) -> Option<&[u8]> {
        let id = *self.switch_names.get(switch)?;
        self.strings.get(id, Scope::Game)
    }

    /// Name of force `force` (0-based), preferring the editor override.
    pub fn force_name(&self, force: usize) -> Option<&[u8]> {
        let editor = self.editor_names.force_names.get(force).copied().unwrap_or(NO_STRING);
        self.strings
            .get(editor, Scope::Editor)
            .or_else(|| self.strings.get(*self.force_names.get(force)?, Scope::Game))
    }

    /// Custom name of a unit type, preferring the editor override. `None` means the default name applies.
    pub fn unit_name(&self, unit_type: u16) -> Option<&[u8]> {
        let editor = self.editor_names.unit_names.get(&unit_type).copied().unwrap_or(NO_STRING);
        self.strings
            .get(editor, Scope::Editor)
            .or_else(|| self.strings.get(*self.unit_names.get(&unit_type)?, Scope::Game))
    }

    pub fn trigger(&self, index: usize) -> Option<&Trigger> {
        self.triggers.get(index)
    }

    /// Replace `begin..end` with `replacement`, returning the triggers that occupied the range.
    ///
    /// # Errors
    /// Returns [`DocumentError::TriggerRange`] when the range is reversed or past the end.
    pub fn replace_range(
        &mut self,
        begin: usize,
        end: usize,
        replacement: Vec<Trigger>,
    ) -> Result<Vec<Trigger>, DocumentError> {
        if begin > end || end > self.triggers.len() {
            return Err(DocumentError::TriggerRange {
                begin,
                end,
                len: self.triggers.len(),
            });
        }
        Ok(self.triggers.splice(begin..end, replacement).collect())
    }

    /// String ids referenced by anything other than triggers.
    pub fn non_trigger_string_refs(&self, scope: Scope) -> BTreeSet<u32> {
        let mut refs = BTreeSet::new();
        match scope {
            Scope::Game => {
                refs.insert(self.scenario_name);
                refs.insert(self.scenario_description);
                refs.extend(self.locations.iter().map(|l| l.string_id));
                refs.extend(self.force_names);
                refs.extend(self.switch_names.iter().copied());
                refs.extend(self.unit_names.values().copied());
            },
            Scope::Editor => {
                refs.extend(self.editor_names.force_names);
                refs.extend(self.editor_names.unit_names.values().copied());
            },
        }
        refs.remove(&NO_STRING);
        refs
    }

    /// Game string ids referenced by the string and sound slots of one trigger.
    pub fn trigger_string_refs(trigger: &Trigger) -> impl Iterator<Item = u32> + '_ {
        trigger.actions.iter().flat_map(|action| {
            let text = action_uses_string(action.action_type).then_some(action.string_id);
            let sound = action_uses_sound(action.action_type).then_some(action.sound_string_id);
            text.into_iter().chain(sound).filter(|id| *id != NO_STRING)
        })
    }

    /// Every string id in `scope` that something in the scenario refers to.
    pub fn referenced_strings(&self, scope: Scope) -> BTreeSet<u32> {
        let mut refs = self.non_trigger_string_refs(scope);
        if scope == Scope::Game {
            for trigger in &self.triggers {
                refs.extend(Self::trigger_string_refs(trigger));
            }
        }
        refs
    }

    /// Delete strings in both scopes that nothing refers to. Returns how many were removed.
    pub fn delete_unused_strings(&mut self) -> usize {
        let mut removed = 0;
        for scope in [Scope::Game, Scope::Editor] {
            let keep = self.referenced_strings(scope);
            let unused: Vec<u32> = self
                .strings
                .section(scope)
                .iter()
                .map(|(id, _)| id)
                .filter(|id| !keep.contains(id))
                .collect();
            let section = self.strings.section_mut(scope);
            for id in unused {
                section.delete(id);
                removed += 1;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::Action;

    fn scenario_with_strings(strings: &[&str]) -> Scenario {
        let mut scenario = Scenario::default();
        for s in strings {
            scenario.strings.add(s.as_bytes(), Scope::Game).expect("capacity");
        }
        scenario
    }

    fn text_trigger(string_id: u32) -> Trigger {
        Trigger {
            actions: vec![Action {
                action_type: 9,
                string_id,
                ..Action::default()
            }],
            ..Trigger::default()
        }
    }

    #[test]
    fn add_reuses_lowest_free_slot() {
        let mut section = StringSection::with_capacity(4);
        assert_eq!(section.add(b"a"), Some(1));
        assert_eq!(section.add(b"b"), Some(2));
        assert_eq!(section.add(b"c"), Some(3));
        section.delete(2);
        assert_eq!(section.add(b"d"), Some(2));
        assert_eq!(section.get(2), Some(&b"d"[..]));
        assert_eq!(section.used_count(), 3);
    }

    #[test]
    fn add_fails_when_full() {
        let mut section = StringSection::with_capacity(1);
        assert_eq!(section.add(b"a"), Some(1));
        assert_eq!(section.add(b"b"), None);
    }

    #[test]
    fn id_zero_is_never_a_string() {
        let scenario = scenario_with_strings(&["x"]);
        assert_eq!(scenario.strings.get(0, Scope::Game), None);
        assert_eq!(scenario.strings.get(1, Scope::Game), Some(&b"x"[..]));
    }

    #[test]
    fn replace_range_returns_previous_triggers() {
        let mut scenario = Scenario::default();
        scenario.triggers = vec![text_trigger(1), text_trigger(2), text_trigger(3)];
        let old = scenario.replace_range(1, 2, vec![text_trigger(9)]).expect("in range");
        assert_eq!(old, vec![text_trigger(2)]);
        assert_eq!(scenario.triggers[1], text_trigger(9));
        assert_eq!(scenario.triggers.len(), 3);
    }

    #[test]
    fn replace_range_rejects_out_of_bounds() {
        let mut scenario = Scenario::default();
        let err = scenario.replace_range(0, 1, Vec::new()).unwrap_err();
        assert_eq!(err, DocumentError::TriggerRange { begin: 0, end: 1, len: 0 });
    }

    #[test]
    fn unused_strings_are_deleted() {
        let mut scenario = scenario_with_strings(&["loc", "msg", "stale"]);
        scenario.locations.push(Location {
            string_id: 1,
            ..Location::default()
        });
        scenario.triggers.push(text_trigger(2));
        assert_eq!(scenario.delete_unused_strings(), 1);
        assert_eq!(scenario.strings.get(3, Scope::Game), None);
        assert_eq!(scenario.strings.used_count(Scope::Game), 2);
    }

    #[test]
    fn string_slot_of_non_text_action_is_not_a_reference() {
        let mut scenario = scenario_with_strings(&["msg"]);
        scenario.triggers.push(Trigger {
            actions: vec![Action {
                action_type: 1,
                string_id: 1,
                ..Action::default()
            }],
            ..Trigger::default()
        });
        assert!(scenario.referenced_strings(Scope::Game).is_empty());
    }

    #[test]
    fn editor_names_override_game_names() {
        let mut scenario = scenario_with_strings(&["Red Team"]);
        scenario.force_names[0] = 1;
        assert_eq!(scenario.force_name(0), Some(&b"Red Team"[..]));
        let id = scenario.strings.add(b"Crimson", Scope::Editor).expect("capacity");
        scenario.editor_names.force_names[0] = id;
        assert_eq!(scenario.force_name(0), Some(&b"Crimson"[..]));
        assert!(scenario.referenced_strings(Scope::Editor).contains(&id));
    }

    #[test]
    fn backup_and_restore_roundtrip_strings() {
        let mut scenario = scenario_with_strings(&["a", "b"]);
        let snapshot = scenario.strings.backup();
        scenario.strings.add(b"c", Scope::Game);
        scenario.strings.section_mut(Scope::Game).delete(1);
        scenario.strings.restore(snapshot.clone());
        assert_eq!(scenario.strings, snapshot);
    }

    #[test]
    fn scenario_serializes_through_ron() {
        let mut scenario = scenario_with_strings(&["hello"]);
        scenario.triggers.push(text_trigger(1));
        let text = ron::to_string(&scenario).expect("serialize");
        let back: Scenario = ron::from_str(&text).expect("deserialize");
        assert_eq!(back, scenario);
    }
}
