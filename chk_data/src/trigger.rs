use serde::{Deserialize, Serialize};

/// Conditions a single trigger may hold.
pub const MAX_CONDITIONS: usize = 16;
/// Actions a single trigger may hold.
pub const MAX_ACTIONS: usize = 64;
/// Players 1-12, the special groups, forces 1-4 and the unused slots.
pub const OWNER_SLOTS: usize = 28;

pub const CONDITION_SIZE: usize = 20;
pub const ACTION_SIZE: usize = 32;
pub const TRIGGER_SIZE: usize = MAX_CONDITIONS * CONDITION_SIZE + MAX_ACTIONS * ACTION_SIZE + 4 + OWNER_SLOTS;

/// Owner slot values. Anything other than these two is an owned slot with an appended byte.
pub const NOT_OWNED: u8 = 0;
pub const OWNED: u8 = 1;

/// One unit of trigger logic: who runs it, what it checks and what it does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    /// Conditions in evaluation order; never longer than `MAX_CONDITIONS`.
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Actions in execution order; never longer than `MAX_ACTIONS`.
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Execution flags (`Trigger::PRESERVE_TRIGGER`, `Trigger::DISABLED`, ...).
    #[serde(default)]
    pub flags: u32,
    /// Per player/group ownership bytes.
    #[serde(default)]
    pub owners: [u8; OWNER_SLOTS],
}

impl Default for Trigger {
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
            actions: Vec::new(),
            flags: 0,
            owners: [NOT_OWNED; OWNER_SLOTS],
        }
    }
}

impl Trigger {
    pub const IGNORE_CONDITIONS_ONCE: u32 = 0x01;
    pub const IGNORE_DEFEAT_DRAW: u32 = 0x02;
    pub const PRESERVE_TRIGGER: u32 = 0x04;
    pub const DISABLED: u32 = 0x08;
    pub const IGNORE_MISC_ACTIONS: u32 = 0x10;
    pub const PAUSED: u32 = 0x20;
    pub const IGNORE_WAIT_SKIPPING: u32 = 0x40;

    pub fn is_owned_by(&self, group: usize) -> bool {
        self.owners.get(group).is_some_and(|owner| *owner != NOT_OWNED)
    }

    /// Serialize to the packed record stored in a scenario's trigger section.
    ///
    /// Unused condition and action slots are zero-filled, so a trigger holding more than the
    /// maximum number of entries is truncated here; the compiler never produces one.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(TRIGGER_SIZE);
        for slot in 0..MAX_CONDITIONS {
            match self.conditions.get(slot) {
                Some(condition) => condition.write_bytes(&mut out),
                None => out.extend_from_slice(&[0; CONDITION_SIZE]),
            }
        }
        for slot in 0..MAX_ACTIONS {
            match self.actions.get(slot) {
                Some(action) => action.write_bytes(&mut out),
                None => out.extend_from_slice(&[0; ACTION_SIZE]),
            }
        }
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.owners);
        out
    }

    /// Decode a packed record. Empty condition/action slots (type 0) are dropped from the end
    /// of each list; interior empty slots are kept so the record survives a round trip.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != TRIGGER_SIZE {
            return None;
        }
        let (condition_bytes, rest) = bytes.split_at(MAX_CONDITIONS * CONDITION_SIZE);
        let (action_bytes, rest) = rest.split_at(MAX_ACTIONS * ACTION_SIZE);
        let (flag_bytes, owner_bytes) = rest.split_at(4);

        let mut conditions: Vec<Condition> = condition_bytes.chunks_exact(CONDITION_SIZE).map(Condition::read_bytes).collect();
        while conditions.last().is_some_and(|c| *c == Condition::default()) {
            conditions.pop();
        }
        let mut actions: Vec<Action> = action_bytes.chunks_exact(ACTION_SIZE).map(Action::read_bytes).collect();
        while actions.last().is_some_and(|a| *a == Action::default()) {
            actions.pop();
        }

        let mut owners = [NOT_OWNED; OWNER_SLOTS];
        owners.copy_from_slice(owner_bytes);
        Some(Self {
            conditions,
            actions,
            flags: u32::from_le_bytes([flag_bytes[0], flag_bytes[1], flag_bytes[2], flag_bytes[3]]),
            owners,
        })
    }
}

/// A condition record. Which fields are meaningful depends on `condition_type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub location_id: u32,
    pub player: u32,
    pub amount: u32,
    pub unit_type: u16,
    pub comparison: u8,
    pub condition_type: u8,
    pub type_index: u8,
    pub flags: u8,
    pub mask_flag: u16,
}

impl Condition {
    pub const FLAG_DISABLED: u8 = 0x02;
    pub const FLAG_UNIT_TYPE_USED: u8 = 0x10;

    pub fn is_disabled(&self) -> bool {
        self.flags & Self::FLAG_DISABLED != 0
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.location_id.to_le_bytes());
        out.extend_from_slice(&self.player.to_le_bytes());
        out.extend_from_slice(&self.amount.to_le_bytes());
        out.extend_from_slice(&self.unit_type.to_le_bytes());
        out.extend_from_slice(&[self.comparison, self.condition_type, self.type_index, self.flags]);
        out.extend_from_slice(&self.mask_flag.to_le_bytes());
    }

    fn read_bytes(b: &[u8]) -> Self {
        Self {
            location_id: u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            player: u32::from_le_bytes([b[4], b[5], b[6], b[7]]),
            amount: u32::from_le_bytes([b[8], b[9], b[10], b[11]]),
            unit_type: u16::from_le_bytes([b[12], b[13]]),
            comparison: b[14],
            condition_type: b[15],
            type_index: b[16],
            flags: b[17],
            mask_flag: u16::from_le_bytes([b[18], b[19]]),
        }
    }
}

/// An action record. Which fields are meaningful depends on `action_type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Action {
    pub location_id: u32,
    pub string_id: u32,
    pub sound_string_id: u32,
    pub time: u32,
    pub group: u32,
    pub number: u32,
    pub type_index: u16,
    pub action_type: u8,
    pub secondary_type: u8,
    pub flags: u8,
    pub padding: u8,
    pub mask_flag: u16,
}

impl Action {
    pub const FLAG_IGNORE_WAIT_ONCE: u8 = 0x01;
    pub const FLAG_DISABLED: u8 = 0x02;
    pub const FLAG_ALWAYS_DISPLAY: u8 = 0x04;
    pub const FLAG_UNIT_PROPERTIES_USED: u8 = 0x08;
    pub const FLAG_UNIT_TYPE_USED: u8 = 0x10;

    pub fn is_disabled(&self) -> bool {
        self.flags & Self::FLAG_DISABLED != 0
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.location_id.to_le_bytes());
        out.extend_from_slice(&self.string_id.to_le_bytes());
        out.extend_from_slice(&self.sound_string_id.to_le_bytes());
        out.extend_from_slice(&self.time.to_le_bytes());
        out.extend_from_slice(&self.group.to_le_bytes());
        out.extend_from_slice(&self.number.to_le_bytes());
        out.extend_from_slice(&self.type_index.to_le_bytes());
        out.extend_from_slice(&[self.action_type, self.secondary_type, self.flags, self.padding]);
        out.extend_from_slice(&self.mask_flag.to_le_bytes());
    }

    fn read_bytes(b: &[u8]) -> Self {
        let word = |at: usize| u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]]);
        Self {
            location_id: word(0),
            string_id: word(4),
            sound_string_id: word(8),
            time: word(12),
            group: word(16),
            number: word(20),
            type_index: u16::from_le_bytes([b[24], b[25]]),
            action_type: b[26],
            secondary_type: b[27],
            flags: b[28],
            padding: b[29],
            mask_flag: u16::from_le_bytes([b[30], b[31]]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trigger {
        let mut trigger = Trigger::default();
        trigger.owners[0] = OWNED;
        trigger.owners[18] = 7;
        trigger.conditions.push(Condition {
            player: 13,
            amount: 5,
            unit_type: 37,
            comparison: 10,
            condition_type: 15,
            flags: Condition::FLAG_UNIT_TYPE_USED,
            ..Condition::default()
        });
        trigger.actions.push(Action {
            string_id: 3,
            action_type: 9,
            flags: Action::FLAG_ALWAYS_DISPLAY,
            ..Action::default()
        });
        trigger.flags = Trigger::PRESERVE_TRIGGER;
        trigger
    }

    #[test]
    fn packed_record_has_engine_size() {
        assert_eq!(TRIGGER_SIZE, 2400);
        assert_eq!(sample().to_bytes().len(), TRIGGER_SIZE);
    }

    #[test]
    fn packed_layout_places_fields_at_fixed_offsets() {
        let bytes = sample().to_bytes();
        // condition 0: player at 4, unit at 12, comparison 14, type 15
        assert_eq!(&bytes[4..8], &13u32.to_le_bytes());
        assert_eq!(&bytes[12..14], &37u16.to_le_bytes());
        assert_eq!(bytes[14], 10);
        assert_eq!(bytes[15], 15);
        // action 0 starts after the 16 condition slots
        let action = MAX_CONDITIONS * CONDITION_SIZE;
        assert_eq!(&bytes[action + 4..action + 8], &3u32.to_le_bytes());
        assert_eq!(bytes[action + 26], 9);
        let flags = action + MAX_ACTIONS * ACTION_SIZE;
        assert_eq!(&bytes[flags..flags + 4], &Trigger::PRESERVE_TRIGGER.to_le_bytes());
        assert_eq!(bytes[flags + 4], OWNED);
        assert_eq!(bytes[flags + 4 + 18], 7);
    }

    #[test]
    fn decoding_reverses_encoding() {
        let trigger = sample();
        let decoded = Trigger::from_bytes(&trigger.to_bytes()).expect("decode");
        assert_eq!(decoded, trigger);
    }

    #[test]
    fn decoding_rejects_wrong_length() {
        assert!(Trigger::from_bytes(&[0; 10]).is_none());
    }

    #[test]
    fn ownership_checks_slot_value() {
        let trigger = sample();
        assert!(trigger.is_owned_by(0));
        assert!(trigger.is_owned_by(18));
        assert!(!trigger.is_owned_by(1));
        assert!(!trigger.is_owned_by(99));
    }
}
