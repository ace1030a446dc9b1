//! Static game data: the unit-type enumeration and the AI script catalog.

/// Number of unit types, including the five group pseudo-units at the end.
pub const UNIT_TYPE_COUNT: usize = 233;
/// First id that does not name a placeable unit (`None`, then the groups).
pub const UNIT_TYPE_NONE: u16 = 228;

/// Default display names, indexed by unit type id.
pub static UNIT_DISPLAY_NAMES: [&str; UNIT_TYPE_COUNT] = [
    "Terran Marine",
    "Terran Ghost",
    "Terran Vulture",
    "Terran Goliath",
    "Goliath Turret",
    "Terran Siege Tank (Tank Mode)",
    "Siege Tank Turret (Tank Mode)",
    "Terran SCV",
    "Terran Wraith",
    "Terran Science Vessel",
    "Gui Montag (Firebat)",
    "Terran Dropship",
    "Terran Battlecruiser",
    "Spider Mine",
    "Nuclear Missile",
    "Terran Civilian",
    "Sarah Kerrigan (Ghost)",
    "Alan Schezar (Goliath)",
    "Alan Schezar Turret",
    "Jim Raynor (Vulture)",
    "Jim Raynor (Marine)",
    "Tom Kazansky (Wraith)",
    "Magellan (Science Vessel)",
    "Edmund Duke (Tank Mode)",
    "Edmund Duke Turret (Tank Mode)",
    "Edmund Duke (Siege Mode)",
    "Edmund Duke Turret (Siege Mode)",
    "Arcturus Mengsk (Battlecruiser)",
    "Hyperion (Battlecruiser)",
    "Norad II (Battlecruiser)",
    "Terran Siege Tank (Siege Mode)",
    "Siege Tank Turret (Siege Mode)",
    "Terran Firebat",
    "Scanner Sweep",
    "Terran Medic",
    "Zerg Larva",
    "Zerg Egg",
    "Zerg Zergling",
    "Zerg Hydralisk",
    "Zerg Ultralisk",
    "Zerg Broodling",
    "Zerg Drone",
    "Zerg Overlord",
    "Zerg Mutalisk",
    "Zerg Guardian",
    "Zerg Queen",
    "Zerg Defiler",
    "Zerg Scourge",
    "Torrasque (Ultralisk)",
    "Matriarch (Queen)",
    "Infested Terran",
    "Infested Kerrigan (Infested Terran)",
    "Unclean One (Defiler)",
    "Hunter Killer (Hydralisk)",
    "Devouring One (Zergling)",
    "Kukulza (Mutalisk)",
    "Kukulza (Guardian)",
    "Yggdrasill (Overlord)",
    "Terran Valkyrie",
    "Mutalisk Cocoon",
    "Protoss Corsair",
    "Protoss Dark Templar",
    "Zerg Devourer",
    "Protoss Dark Archon",
    "Protoss Probe",
    "Protoss Zealot",
    "Protoss Dragoon",
    "Protoss High Templar",
    "Protoss Archon",
    "Protoss Shuttle",
    "Protoss Scout",
    "Protoss Arbiter",
    "Protoss Carrier",
    "Protoss Interceptor",
    "Protoss Dark Templar (Hero)",
    "Zeratul (Dark Templar)",
    "Tassadar/Zeratul (Archon)",
    "Fenix (Zealot)",
    "Fenix (Dragoon)",
    "Tassadar (Templar)",
    "Mojo (Scout)",
    "Warbringer (Reaver)",
    "Gantrithor (Carrier)",
    "Protoss Reaver",
    "Protoss Observer",
    "Protoss Scarab",
    "Danimoth (Arbiter)",
    "Aldaris (Templar)",
    "Artanis (Scout)",
    "Rhynadon (Badlands Critter)",
    "Bengalaas (Jungle Critter)",
    "Cargo Ship (Unused)",
    "Mercenary Gunship (Unused)",
    "Scantid (Desert Critter)",
    "Kakaru (Twilight Critter)",
    "Ragnasaur (Ashworld Critter)",
    "Ursadon (Ice World Critter)",
    "Lurker Egg",
    "Raszagal (Corsair)",
    "Samir Duran (Ghost)",
    "Alexei Stukov (Ghost)",
    "Map Revealer",
    "Gerard DuGalle (BattleCruiser)",
    "Zerg Lurker",
    "Infested Duran (Infested Terran)",
    "Disruption Web",
    "Terran Command Center",
    "Terran Comsat Station",
    "Terran Nuclear Silo",
    "Terran Supply Depot",
    "Terran Refinery",
    "Terran Barracks",
    "Terran Academy",
    "Terran Factory",
    "Terran Starport",
    "Terran Control Tower",
    "Terran Science Facility",
    "Terran Covert Ops",
    "Terran Physics Lab",
    "Starbase (Unused)",
    "Terran Machine Shop",
    "Repair Bay (Unused)",
    "Terran Engineering Bay",
    "Terran Armory",
    "Terran Missile Turret",
    "Terran Bunker",
    "Norad II (Crashed)",
    "Ion Cannon",
    "Uraj Crystal",
    "Khalis Crystal",
    "Infested Command Center",
    "Zerg Hatchery",
    "Zerg Lair",
    "Zerg Hive",
    "Zerg Nydus Canal",
    "Zerg Hydralisk Den",
    "Zerg Defiler Mound",
    "Zerg Greater Spire",
    "Zerg Queen's Nest",
    "Zerg Evolution Chamber",
    "Zerg Ultralisk Cavern",
    "Zerg Spire",
    "Zerg Spawning Pool",
    "Zerg Creep Colony",
    "Zerg Spore Colony",
    "Unused Zerg Building 1",
    "Zerg Sunken Colony",
    "Zerg Overmind (With Shell)",
    "Zerg Overmind",
    "Zerg Extractor",
    "Mature Crysalis",
    "Zerg Cerebrate",
    "Zerg Cerebrate Daggoth",
    "Unused Zerg Building 2",
    "Protoss Nexus",
    "Protoss Robotics Facility",
    "Protoss Pylon",
    "Protoss Assimilator",
    "Unused Protoss Building 1",
    "Protoss Observatory",
    "Protoss Gateway",
    "Unused Protoss Building 2",
    "Protoss Photon Cannon",
    "Protoss Citadel of Adun",
    "Protoss Cybernetics Core",
    "Protoss Templar Archives",
    "Protoss Forge",
    "Protoss Stargate",
    "Stasis Cell/Prison",
    "Protoss Fleet Beacon",
    "Protoss Arbiter Tribunal",
    "Protoss Robotics Support Bay",
    "Protoss Shield Battery",
    "Khaydarin Crystal Formation",
    "Protoss Temple",
    "Xel'Naga Temple",
    "Mineral Field (Type 1)",
    "Mineral Field (Type 2)",
    "Mineral Field (Type 3)",
    "Cave (Unused)",
    "Cave-in (Unused)",
    "Cantina (Unused)",
    "Mining Platform (Unused)",
    "Independent Command Center (Unused)",
    "Independent Starport (Unused)",
    "Independent Jump Gate (Unused)",
    "Ruins (Unused)",
    "Khadarin Crystal Formation (Unused)",
    "Vespene Geyser",
    "Warp Gate",
    "Psi Disrupter",
    "Zerg Marker",
    "Terran Marker",
    "Protoss Marker",
    "Zerg Beacon",
    "Terran Beacon",
    "Protoss Beacon",
    "Zerg Flag Beacon",
    "Terran Flag Beacon",
    "Protoss Flag Beacon",
    "Power Generator",
    "Overmind Cocoon",
    "Dark Swarm",
    "Floor Missile Trap",
    "Floor Hatch (Unused)",
    "Left Upper Level Door",
    "Right Upper Level Door",
    "Left Pit Door",
    "Right Pit Door",
    "Floor Gun Trap",
    "Left Wall Missile Trap",
    "Left Wall Flame Trap",
    "Right Wall Missile Trap",
    "Right Wall Flame Trap",
    "Start Location",
    "Flag",
    "Young Chrysalis",
    "Psi Emitter",
    "Data Disc",
    "Khaydarin Crystal",
    "Mineral Cluster Type 1",
    "Mineral Cluster Type 2",
    "Protoss Vespene Gas Orb Type 1",
    "Protoss Vespene Gas Orb Type 2",
    "Zerg Vespene Gas Sac Type 1",
    "Zerg Vespene Gas Sac Type 2",
    "Terran Vespene Gas Tank Type 1",
    "Terran Vespene Gas Tank Type 2",
    "None",
    "Any unit",
    "Men",
    "Buildings",
    "Factories",
];

/// An entry of the AI script catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiScript {
    /// Four ASCII characters packed little-endian, as stored in a Run AI Script action.
    pub id: u32,
    pub name: &'static str,
}

/// Pack a four-character script code into the numeric id stored in actions.
pub const fn script_id(code: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*code)
}

/// Unpack a script id back into its four-character code, if every byte is printable ASCII.
pub fn script_code(id: u32) -> Option<String> {
    let bytes = id.to_le_bytes();
    bytes
        .iter()
        .all(|b| b.is_ascii_graphic())
        .then(|| bytes.iter().map(|b| char::from(*b)).collect())
}

macro_rules! scripts {
    ($($code:literal => $name:literal),* $(,)?) => {
        &[$(AiScript { id: script_id($code), name: $name }),*]
    };
}

pub static AI_SCRIPTS: &[AiScript] = scripts![
    b"TMCu" => "Terran Custom Level",
    b"ZMCu" => "Zerg Custom Level",
    b"PMCu" => "Protoss Custom Level",
    b"TMCx" => "Terran Expansion Custom Level",
    b"ZMCx" => "Zerg Expansion Custom Level",
    b"PMCx" => "Protoss Expansion Custom Level",
    b"TLOf" => "Terran Campaign Easy",
    b"TMED" => "Terran Campaign Medium",
    b"THIf" => "Terran Campaign Difficult",
    b"TSUP" => "Terran Campaign Insane",
    b"TARE" => "Terran Campaign Area Town",
    b"ZLOf" => "Zerg Campaign Easy",
    b"ZMED" => "Zerg Campaign Medium",
    b"ZHIf" => "Zerg Campaign Difficult",
    b"ZSUP" => "Zerg Campaign Insane",
    b"ZARE" => "Zerg Campaign Area Town",
    b"PLOf" => "Protoss Campaign Easy",
    b"PMED" => "Protoss Campaign Medium",
    b"PHIf" => "Protoss Campaign Difficult",
    b"PSUP" => "Protoss Campaign Insane",
    b"PARE" => "Protoss Campaign Area Town",
    b"TLOx" => "Expansion Terran Campaign Easy",
    b"TMEx" => "Expansion Terran Campaign Medium",
    b"THIx" => "Expansion Terran Campaign Difficult",
    b"TSUx" => "Expansion Terran Campaign Insane",
    b"TARx" => "Expansion Terran Campaign Area Town",
    b"ZLOx" => "Expansion Zerg Campaign Easy",
    b"ZMEx" => "Expansion Zerg Campaign Medium",
    b"ZHIx" => "Expansion Zerg Campaign Difficult",
    b"ZSUx" => "Expansion Zerg Campaign Insane",
    b"ZARx" => "Expansion Zerg Campaign Area Town",
    b"PLOx" => "Expansion Protoss Campaign Easy",
    b"PMEx" => "Expansion Protoss Campaign Medium",
    b"PHIx" => "Expansion Protoss Campaign Difficult",
    b"PSUx" => "Expansion Protoss Campaign Insane",
    b"PARx" => "Expansion Protoss Campaign Area Town",
    b"Suic" => "Send All Units on Strategic Suicide Missions",
    b"SuiR" => "Send All Units on Random Suicide Missions",
    b"Rscu" => "Switch Computer Player to Rescue Passive",
    b"+Vi0" => "Turn ON Shared Vision for Player 1",
    b"+Vi1" => "Turn ON Shared Vision for Player 2",
    b"+Vi2" => "Turn ON Shared Vision for Player 3",
    b"+Vi3" => "Turn ON Shared Vision for Player 4",
    b"+Vi4" => "Turn ON Shared Vision for Player 5",
    b"+Vi5" => "Turn ON Shared Vision for Player 6",
    b"+Vi6" => "Turn ON Shared Vision for Player 7",
    b"+Vi7" => "Turn ON Shared Vision for Player 8",
    b"-Vi0" => "Turn OFF Shared Vision for Player 1",
    b"-Vi1" => "Turn OFF Shared Vision for Player 2",
    b"-Vi2" => "Turn OFF Shared Vision for Player 3",
    b"-Vi3" => "Turn OFF Shared Vision for Player 4",
    b"-Vi4" => "Turn OFF Shared Vision for Player 5",
    b"-Vi5" => "Turn OFF Shared Vision for Player 6",
    b"-Vi6" => "Turn OFF Shared Vision for Player 7",
    b"-Vi7" => "Turn OFF Shared Vision for Player 8",
    b"MvTe" => "Move Dark Templars to Region",
    b"ClrC" => "Clear Previous Combat Data",
    b"Enmy" => "Set Player to Enemy",
    b"Ally" => "Set Player to Ally",
    b"VluA" => "Value This Area Higher",
    b"EnBk" => "Enter Closest Bunker",
    b"StTg" => "Set Generic Command Target",
    b"StPt" => "Make These Units Patrol",
    b"EnTr" => "Enter Transport",
    b"ExTr" => "Exit Transport",
    b"NuHe" => "AI Nuke Here",
    b"HaHe" => "AI Harass Here",
    b"JYDg" => "Set Unit Order To: Junk Yard Dog",
    b"DWHe" => "AI Disruption Web Here",
    b"ReHe" => "AI Recall Here",
];

/// Read-only game data consulted while compiling: unit names and AI scripts.
#[derive(Debug, Clone, Copy)]
pub struct GameData {
    pub unit_names: &'static [&'static str],
    pub ai_scripts: &'static [AiScript],
}

impl Default for GameData {
    fn default() -> Self {
        Self {
            unit_names: &UNIT_DISPLAY_NAMES,
            ai_scripts: AI_SCRIPTS,
        }
    }
}

impl GameData {
    pub fn unit_name(&self, unit_type: u16) -> Option<&'static str> {
        self.unit_names.get(usize::from(unit_type)).copied()
    }

    pub fn script_name(&self, id: u32) -> Option<&'static str> {
        self.ai_scripts.iter().find(|s| s.id == id).map(|s| s.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_table_ends_with_groups() {
        assert_eq!(UNIT_DISPLAY_NAMES[0], "Terran Marine");
        assert_eq!(UNIT_DISPLAY_NAMES[227], "Terran Vespene Gas Tank Type 2");
        assert_eq!(UNIT_DISPLAY_NAMES[usize::from(UNIT_TYPE_NONE)], "None");
        assert_eq!(UNIT_DISPLAY_NAMES[232], "Factories");
    }

    #[test]
    fn script_codes_pack_little_endian() {
        let id = script_id(b"TMCu");
        assert_eq!(id.to_le_bytes(), *b"TMCu");
        assert_eq!(script_code(id).as_deref(), Some("TMCu"));
        assert_eq!(script_code(0), None);
        assert_eq!(GameData::default().script_name(id), Some("Terran Custom Level"));
    }

    #[test]
    fn script_ids_are_distinct() {
        let mut ids: Vec<u32> = AI_SCRIPTS.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), AI_SCRIPTS.len());
    }
}
