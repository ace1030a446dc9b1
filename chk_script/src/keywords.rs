//! Enumerated argument keywords. The first name listed for a value is the one written back out.

use chk_data::Action;

use crate::tables::name_key;

pub(crate) type Keywords = &'static [(&'static str, u8)];

pub(crate) const NUMERIC_COMPARISONS: Keywords = &[("At least", 0), ("At most", 1), ("Exactly", 10)];
pub(crate) const SWITCH_STATES: Keywords = &[("Set", 2), ("Not Set", 3), ("Cleared", 3)];
pub(crate) const SWITCH_MODIFIERS: Keywords = &[("Set", 4), ("Clear", 5), ("Toggle", 6), ("Randomize", 11)];
pub(crate) const NUMERIC_MODIFIERS: Keywords = &[("Set To", 7), ("Add", 8), ("Subtract", 9)];
pub(crate) const STATE_MODIFIERS: Keywords =
    &[("Enable", 4), ("Enabled", 4), ("Disable", 5), ("Disabled", 5), ("Toggle", 6)];
pub(crate) const ORDERS: Keywords = &[("Move", 0), ("Patrol", 1), ("Attack", 2)];
pub(crate) const ALLIANCE_STATUS: Keywords = &[("Enemy", 0), ("Ally", 1), ("Allied Victory", 2)];
pub(crate) const RESOURCES: Keywords = &[("Ore", 0), ("Gas", 1), ("Ore and Gas", 2)];
pub(crate) const SCORES: Keywords = &[
    ("Total", 0),
    ("Units", 1),
    ("Buildings", 2),
    ("Units and Buildings", 3),
    ("Kills", 4),
    ("Razings", 5),
    ("Kills and Razings", 6),
    ("Custom", 7),
];

pub(crate) const ALWAYS_DISPLAY: &str = "Always Display";
pub(crate) const DONT_ALWAYS_DISPLAY: &str = "Don't Always Display";
pub(crate) const ALL_UNITS: &str = "All";

pub(crate) fn lookup(table: Keywords, text: &[u8]) -> Option<u8> {
    let key = name_key(text);
    table
        .iter()
        .find(|(name, _)| name_key(name.as_bytes()) == key)
        .map(|(_, value)| *value)
}

pub(crate) fn name_of(table: Keywords, value: u8) -> Option<&'static str> {
    table.iter().find(|(_, v)| *v == value).map(|(name, _)| *name)
}

/// Apply an always-display keyword to existing action flags.
pub(crate) fn apply_text_flags(text: &[u8], flags: u8) -> Option<u8> {
    let key = name_key(text);
    if key == name_key(ALWAYS_DISPLAY.as_bytes()) {
        Some(flags | Action::FLAG_ALWAYS_DISPLAY)
    } else if key == name_key(DONT_ALWAYS_DISPLAY.as_bytes()) {
        Some(flags & !Action::FLAG_ALWAYS_DISPLAY)
    } else {
        None
    }
}

/// `All` as a unit count, stored as 0.
pub(crate) fn special_unit_amount(text: &[u8]) -> Option<u8> {
    (name_key(text) == name_key(ALL_UNITS.as_bytes())).then_some(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_match_normalized_text() {
        assert_eq!(lookup(NUMERIC_COMPARISONS, b"ATLEAST"), Some(0));
        assert_eq!(lookup(NUMERIC_COMPARISONS, b"Exactly"), Some(10));
        assert_eq!(lookup(SWITCH_STATES, b"CLEARED"), Some(3));
        assert_eq!(lookup(SCORES, b"KILLSANDRAZINGS"), Some(6));
        assert_eq!(lookup(ORDERS, b"RUN"), None);
    }

    #[test]
    fn first_name_is_written_back() {
        assert_eq!(name_of(SWITCH_STATES, 3), Some("Not Set"));
        assert_eq!(name_of(STATE_MODIFIERS, 5), Some("Disable"));
        assert_eq!(name_of(ORDERS, 9), None);
    }

    #[test]
    fn text_flags_toggle_always_display_only() {
        let flags = Action::FLAG_UNIT_TYPE_USED;
        assert_eq!(
            apply_text_flags(b"ALWAYSDISPLAY", flags),
            Some(flags | Action::FLAG_ALWAYS_DISPLAY)
        );
        assert_eq!(
            apply_text_flags(b"DON'TALWAYSDISPLAY", flags | Action::FLAG_ALWAYS_DISPLAY),
            Some(flags)
        );
        assert_eq!(apply_text_flags(b"SOMETIMES", flags), None);
    }

    #[test]
    fn all_means_zero_units() {
        assert_eq!(special_unit_amount(b"ALL"), Some(0));
        assert_eq!(special_unit_amount(b"ALLOF"), None);
    }
}
