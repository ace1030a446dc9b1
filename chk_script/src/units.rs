//! Static unit-name tables searched before and after the scenario's own unit names.

use chk_data::UNIT_DISPLAY_NAMES;
use lazy_static::lazy_static;

use crate::tables::name_key;

/// Older spellings, abbreviations and group names still accepted in text.
const LEGACY_UNIT_NAMES: &[(&str, u16)] = &[
    ("[Any Unit]", 229),
    ("[Buildings]", 231),
    ("[Factories]", 232),
    ("[Men]", 230),
    ("Alan Turret", 18),
    ("Bengalaas (Jungle)", 90),
    ("Cantina", 181),
    ("Cave", 179),
    ("Cave-in", 180),
    ("Cocoon", 59),
    ("Dark Templar (Hero)", 74),
    ("Disruption Field", 105),
    ("Duke Turret type 1", 24),
    ("Duke Turret type 2", 26),
    ("Edmund Duke (Siege Tank)", 23),
    ("Gerard DuGalle (Ghost)", 102),
    ("Independent Command Center", 183),
    ("Independent Starport", 184),
    ("Infested Duran", 104),
    ("Infested Kerrigan (Infested Terrain)", 51),
    ("Jump Gate", 185),
    ("Kakaru (Twilight)", 94),
    ("Kyadarin Crystal Formation", 173),
    ("Mining Platform", 182),
    ("Mineral Chunk (Type 1)", 220),
    ("Mineral Chunk (Type 2)", 221),
    ("Norad II (Crashed Battlecruiser)", 126),
    ("Protoss Dark Templar (Unit)", 61),
    ("Protoss Unused type 1", 158),
    ("Protoss Unused type 2", 161),
    ("Ragnasaur (Ash World)", 95),
    ("Ruins", 186),
    ("Rhynadon (Badlands)", 89),
    ("Raszagal (Dark Templar)", 98),
    ("Scantid (Desert)", 93),
    ("Tank Turret type 1", 6),
    ("Tank Turret type 2", 31),
    ("Unused Terran Bldg type 1", 119),
    ("Unused Terran Bldg type 2", 121),
    ("Unused type 1", 91),
    ("Unused type 2", 92),
    ("Unused Zerg Bldg", 145),
    ("Unused Zerg Bldg 5", 153),
    ("Ursadon (Ice World)", 96),
    ("Vulture Spider Mine", 13),
    ("Vespene Tank (Terran Type 1)", 226),
    ("Vespene Tank (Terran Type 2)", 227),
    ("Vespene Orb (Protoss Type 1)", 222),
    ("Vespene Orb (Protoss Type 2)", 223),
    ("Vespene Sac (Zerg Type 1)", 224),
    ("Vespene Sac (Zerg Type 2)", 225),
    ("Zerg Lurker Egg", 97),
];

type UnitIndex = Vec<(Vec<u8>, u16)>;

/// Sort by key and keep the lowest id for each key so lookups can binary search.
fn build_index<'a>(names: impl Iterator<Item = (&'a str, u16)>) -> UnitIndex {
    let mut index: UnitIndex = names.map(|(name, id)| (name_key(name.as_bytes()), id)).collect();
    index.sort();
    index.dedup_by(|later, earlier| later.0 == earlier.0);
    index
}

lazy_static! {
    static ref CANONICAL_UNITS: UnitIndex = build_index(UNIT_DISPLAY_NAMES.iter().copied().zip(0u16..));
    static ref LEGACY_UNITS: UnitIndex = build_index(LEGACY_UNIT_NAMES.iter().copied());
}

fn search(index: &UnitIndex, name: &[u8]) -> Option<u16> {
    let key = name_key(name);
    index
        .binary_search_by(|(entry, _)| entry.as_slice().cmp(key.as_slice()))
        .ok()
        .map(|found| index[found].1)
}

/// Default display names.
pub(crate) fn canonical_unit(name: &[u8]) -> Option<u16> {
    search(&CANONICAL_UNITS, name)
}

pub(crate) fn legacy_unit(name: &[u8]) -> Option<u16> {
    search(&LEGACY_UNITS, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_cover_every_unit_type() {
        assert_eq!(canonical_unit(b"TERRANMARINE"), Some(0));
        assert_eq!(canonical_unit(b"Zerg Queen's Nest"), Some(138));
        assert_eq!(canonical_unit(b"Factories"), Some(232));
        assert_eq!(canonical_unit(b"Terran Marines"), None);
    }

    #[test]
    fn legacy_names_map_to_current_types() {
        assert_eq!(legacy_unit(b"[ANYUNIT]"), Some(229));
        assert_eq!(legacy_unit(b"BENGALAAS(JUNGLE)"), Some(90));
        assert_eq!(legacy_unit(b"Vulture Spider Mine"), Some(13));
        assert_eq!(legacy_unit(b"ZERGLURKEREGG"), Some(97));
        assert_eq!(legacy_unit(b"Terran Marine"), None);
    }

    #[test]
    fn duplicate_keys_keep_the_lowest_id() {
        let index = build_index([("Same Name", 9), ("SAME NAME", 2)].into_iter());
        assert_eq!(index, vec![(b"SAMENAME".to_vec(), 2)]);
    }
}
