use chk_data::{Action, Condition, GameData, Location, Scenario, Scope, Trigger};
use chk_script::{CompilerOptions, TextTrigCompiler, TriggerWriter};

const BRIEFING: &str = include_str!("fixtures/briefing.trg");

fn scenario_with_home() -> Scenario {
    let mut scenario = Scenario::default();
    let name = scenario.strings.add(b"Home", Scope::Game).expect("capacity");
    scenario.locations.push(Location {
        string_id: name,
        ..Location::default()
    });
    scenario
}

fn recompile(scenario: &Scenario) -> Scenario {
    let text = TriggerWriter::new(scenario, &GameData::default(), CompilerOptions::default()).write_scenario();
    let mut copy = scenario.clone();
    let end = copy.triggers.len();
    TextTrigCompiler::default()
        .compile_triggers(&text, &mut copy, &GameData::default(), 0, end)
        .unwrap_or_else(|err| panic!("generated text should compile: {err}\n{text}"));
    copy
}

#[test]
fn generated_text_compiles_to_the_same_scenario() {
    let mut scenario = scenario_with_home();
    TextTrigCompiler::default()
        .compile_triggers(BRIEFING, &mut scenario, &GameData::default(), 0, 0)
        .expect("compile ok");
    assert_eq!(recompile(&scenario), scenario);
}

#[test]
fn generated_text_names_what_it_can() {
    let mut scenario = scenario_with_home();
    TextTrigCompiler::default()
        .compile_triggers(BRIEFING, &mut scenario, &GameData::default(), 0, 0)
        .expect("compile ok");
    let text = TriggerWriter::new(&scenario, &GameData::default(), CompilerOptions::default()).write_scenario();
    assert!(text.starts_with("Trigger(\"Player 1\"){\nConditions:\n\tAlways();\n"));
    assert!(text.contains("\"Home\""));
    assert!(text.contains("\"Welcome, commander.\""));
    assert!(text.contains("\"sound\\\\intro.wav\""));
    assert!(text.contains("\t;Always();\n"));
    assert!(text.contains("\nFlags:\n00000000000000000000000000000100;\n}\n"));
}

#[test]
fn raw_records_survive_the_round_trip() {
    let mut scenario = scenario_with_home();
    let mut trigger = Trigger::default();
    trigger.owners[5] = 1;
    trigger.owners[17] = 3;
    trigger.conditions = vec![
        // Unknown condition type.
        Condition {
            condition_type: 200,
            amount: 9,
            ..Condition::default()
        },
        // Death counter past the player slots.
        Condition {
            condition_type: 15,
            player: 1500,
            amount: 2,
            flags: Condition::FLAG_UNIT_TYPE_USED,
            ..Condition::default()
        },
        // Location id past the location table.
        Condition {
            condition_type: 3,
            location_id: 200,
            unit_type: 7,
            flags: Condition::FLAG_UNIT_TYPE_USED | Condition::FLAG_DISABLED,
            ..Condition::default()
        },
    ];
    trigger.actions = vec![
        Action {
            action_type: 45,
            group: 4000,
            number: 12,
            secondary_type: 8,
            flags: Action::FLAG_UNIT_TYPE_USED,
            ..Action::default()
        },
        Action {
            action_type: 60,
            padding: 1,
            mask_flag: 0x4353,
            ..Action::default()
        },
        Action {
            action_type: 4,
            time: 250,
            flags: Action::FLAG_DISABLED,
            ..Action::default()
        },
    ];
    trigger.flags = 0x8000_0001;
    scenario.triggers.push(trigger);

    assert_eq!(recompile(&scenario), scenario);
}

#[test]
fn address_mode_round_trips_memory_arguments() {
    let options = CompilerOptions {
        use_addresses_for_memory: true,
        ..CompilerOptions::default()
    };
    let mut scenario = Scenario::default();
    scenario.triggers.push(Trigger {
        conditions: vec![Condition {
            condition_type: 15,
            player: 600,
            amount: 77,
            flags: Condition::FLAG_UNIT_TYPE_USED,
            ..Condition::default()
        }],
        ..Trigger::default()
    });

    let text = TriggerWriter::new(&scenario, &GameData::default(), options).write_scenario();
    assert!(text.contains("Memory("));
    let mut copy = scenario.clone();
    TextTrigCompiler::new(options)
        .compile_triggers(&text, &mut copy, &GameData::default(), 0, 1)
        .expect("compile generated text");
    assert_eq!(copy, scenario);
}

/// Location 1 named "3", unit 20 named "7", switch 9 named "2" and force 1 named "5".
fn scenario_with_digit_names() -> Scenario {
    let mut scenario = Scenario::default();
    let three = scenario.strings.add(b"3", Scope::Game).expect("capacity");
    let seven = scenario.strings.add(b"7", Scope::Game).expect("capacity");
    let two = scenario.strings.add(b"2", Scope::Game).expect("capacity");
    let five = scenario.strings.add(b"5", Scope::Game).expect("capacity");
    scenario.locations.push(Location {
        string_id: three,
        ..Location::default()
    });
    scenario.unit_names.insert(20, seven);
    scenario.switch_names[9] = two;
    scenario.force_names[0] = five;
    scenario
}

fn compile_one(text: &str, scenario: &Scenario) -> Trigger {
    let mut copy = scenario.clone();
    TextTrigCompiler::default()
        .compile_triggers(text, &mut copy, &GameData::default(), 0, 0)
        .expect("compile ok");
    copy.triggers.remove(0)
}

const DIGIT_ARGS: &str = "Trigger(5){
Conditions:
\tBring(\"Player 1\", 7, 3, At least, 1);
\tSwitch(2, Set);
Actions:
\tCreate Unit(1, 7, 1, 3);
\tSet Switch(2, Set);
}
";

#[test]
fn bare_digits_are_numbers_even_when_a_name_matches() {
    let trigger = compile_one(DIGIT_ARGS, &scenario_with_digit_names());
    assert_eq!(trigger.owners[5], 1);
    assert_eq!(trigger.owners[18], 0);
    assert_eq!(trigger.conditions[0].unit_type, 7);
    assert_eq!(trigger.conditions[0].location_id, 3);
    assert_eq!(trigger.conditions[1].type_index, 2);
    assert_eq!(trigger.actions[0].type_index, 7);
    assert_eq!(trigger.actions[0].location_id, 3);
    assert_eq!(trigger.actions[1].number, 2);
}

#[test]
fn quoted_digits_are_names() {
    let quoted = DIGIT_ARGS
        .replace("Trigger(5)", "Trigger(\"5\")")
        .replace("7, 3, At least", "\"7\", \"3\", At least")
        .replace("Switch(2, Set)", "Switch(\"2\", Set)")
        .replace("1, 7, 1, 3", "1, \"7\", 1, \"3\"");
    let trigger = compile_one(&quoted, &scenario_with_digit_names());
    assert_eq!(trigger.owners[18], 1);
    assert_eq!(trigger.owners[5], 0);
    assert_eq!(trigger.conditions[0].unit_type, 20);
    assert_eq!(trigger.conditions[0].location_id, 1);
    assert_eq!(trigger.conditions[1].type_index, 9);
    assert_eq!(trigger.actions[0].type_index, 20);
    assert_eq!(trigger.actions[0].location_id, 1);
    assert_eq!(trigger.actions[1].number, 9);
}

#[test]
fn ids_shadowed_by_digit_names_survive_the_round_trip() {
    let mut scenario = scenario_with_digit_names();
    scenario.triggers.push(Trigger {
        conditions: vec![Condition {
            condition_type: 3,
            location_id: 3,
            unit_type: 7,
            flags: Condition::FLAG_UNIT_TYPE_USED,
            ..Condition::default()
        }],
        actions: vec![Action {
            action_type: 13,
            number: 2,
            secondary_type: 4,
            ..Action::default()
        }],
        ..Trigger::default()
    });
    scenario.triggers[0].owners[5] = 1;

    assert_eq!(recompile(&scenario), scenario);
}

#[test]
fn names_and_numbers_compile_to_the_same_records() {
    let scenario = scenario_with_home();
    let named = compile_one(
        "Trigger(\"Player 2\"){
Conditions:
\tBring(\"Player 1\", \"Terran Ghost\", \"Home\", At least, 1);
\tSwitch(\"Switch 3\", Set);
Actions:
\tCreate Unit(\"Player 1\", \"Terran Ghost\", 1, \"Home\");
\tSet Switch(\"Switch 3\", Set);
}
",
        &scenario,
    );
    let numbered = compile_one(
        "Trigger(1){
Conditions:
\tBring(0, 1, 1, At least, 1);
\tSwitch(2, Set);
Actions:
\tCreate Unit(0, 1, 1, 1);
\tSet Switch(2, Set);
}
",
        &scenario,
    );
    assert_eq!(named.owners[1], 1);
    assert_eq!(named.conditions[0].unit_type, 1);
    assert_eq!(named, numbered);
}
