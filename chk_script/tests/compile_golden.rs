use chk_data::{Action, Condition, GameData, Location, Scenario, Scope, StringSection, Trigger};
use chk_script::{BuildError, CompileError, TextTrigCompiler};

const BRIEFING: &str = include_str!("fixtures/briefing.trg");
const MINIMAL: &str = include_str!("fixtures/minimal.trg");

fn scenario_with_home() -> Scenario {
    let mut scenario = Scenario::default();
    let name = scenario.strings.add(b"Home", Scope::Game).expect("capacity");
    scenario.locations.push(Location {
        string_id: name,
        right: 256,
        bottom: 256,
        ..Location::default()
    });
    scenario
}

fn compile(text: &str, scenario: &mut Scenario) -> Result<usize, CompileError> {
    let end = scenario.triggers.len();
    TextTrigCompiler::default().compile_triggers(text, scenario, &GameData::default(), 0, end)
}

#[test]
fn minimal_trigger_compiles() {
    let mut scenario = Scenario::default();
    assert_eq!(compile(MINIMAL, &mut scenario).expect("compile ok"), 1);

    let trigger = &scenario.triggers[0];
    assert_eq!(trigger.owners[0], 1);
    assert!(trigger.owners[1..].iter().all(|owner| *owner == 0));
    assert_eq!(trigger.conditions.len(), 1);
    assert_eq!(trigger.conditions[0].condition_type, 22);
    assert_eq!(trigger.actions.len(), 1);
    assert_eq!(trigger.actions[0].action_type, 1);
    assert_eq!(trigger.flags, 0);
}

#[test]
fn briefing_compiles_into_records() {
    let mut scenario = scenario_with_home();
    assert_eq!(compile(BRIEFING, &mut scenario).expect("compile ok"), 2);

    let first = &scenario.triggers[0];
    assert_eq!(first.actions.len(), 3);
    let message = first.actions[0].string_id;
    assert_eq!(scenario.strings.get(message, Scope::Game), Some(&b"Welcome, commander."[..]));
    assert_eq!(first.actions[0].flags & Action::FLAG_ALWAYS_DISPLAY, Action::FLAG_ALWAYS_DISPLAY);
    let sound = first.actions[1].sound_string_id;
    assert_eq!(scenario.strings.get(sound, Scope::Game), Some(&b"sound\\intro.wav"[..]));

    let second = &scenario.triggers[1];
    assert_eq!(second.owners[0], 1);
    assert_eq!(second.owners[19], 1);
    assert_eq!(second.flags, Trigger::PRESERVE_TRIGGER);

    let bring = &second.conditions[0];
    assert_eq!(bring.condition_type, 3);
    assert_eq!(bring.player, 0);
    assert_eq!(bring.unit_type, 0);
    assert_eq!(bring.location_id, 1);
    assert_eq!(bring.amount, 5);
    assert_eq!(second.conditions[1].amount, 120);
    assert!(second.conditions[2].is_disabled());
    assert!(!bring.is_disabled());

    assert_eq!(second.actions[0].location_id, 1);
    assert!(second.actions[2].is_disabled());
    assert_eq!(second.actions[2].time, 500);
}

#[test]
fn repeated_text_is_stored_once() {
    let mut scenario = scenario_with_home();
    compile(BRIEFING, &mut scenario).expect("compile ok");

    let first = scenario.triggers[0].actions[0].string_id;
    let second = scenario.triggers[1].actions[1].string_id;
    assert_eq!(first, second);
    // Location name, message and sound path.
    assert_eq!(scenario.strings.used_count(Scope::Game), 3);
}

#[test]
fn recompiling_the_same_text_changes_nothing() {
    let mut scenario = scenario_with_home();
    compile(BRIEFING, &mut scenario).expect("first compile");
    let before = scenario.clone();

    compile(BRIEFING, &mut scenario).expect("second compile");
    assert_eq!(scenario.strings.used_count(Scope::Game), before.strings.used_count(Scope::Game));
    assert_eq!(scenario, before);
}

#[test]
fn compile_into_a_range_keeps_neighbours() {
    let mut scenario = scenario_with_home();
    scenario.triggers = vec![Trigger::default(); 3];
    let written = TextTrigCompiler::default()
        .compile_triggers(MINIMAL, &mut scenario, &GameData::default(), 1, 2)
        .expect("compile ok");
    assert_eq!(written, 1);
    assert_eq!(scenario.triggers.len(), 3);
    assert_eq!(scenario.triggers[0], Trigger::default());
    assert_eq!(scenario.triggers[1].actions[0].action_type, 1);
    assert_eq!(scenario.triggers[2], Trigger::default());
}

#[test]
fn full_string_section_leaves_scenario_untouched() {
    let mut scenario = Scenario::default();
    scenario.strings.game = StringSection::with_capacity(2);
    let name = scenario.strings.add(b"Home", Scope::Game).expect("capacity");
    scenario.locations.push(Location {
        string_id: name,
        ..Location::default()
    });
    scenario.triggers.push(Trigger::default());
    let before = scenario.clone();

    let err = compile(BRIEFING, &mut scenario).expect_err("two new strings, one free slot");
    assert!(matches!(
        err,
        CompileError::Build(BuildError::StringCapacity { scope: Scope::Game, .. })
    ));
    assert!(err.to_string().starts_with("No text errors, but build of new TRIG/STR section failed."));
    assert_eq!(scenario, before);
}

#[test]
fn syntax_errors_leave_scenario_untouched() {
    let mut scenario = scenario_with_home();
    compile(BRIEFING, &mut scenario).expect("compile ok");
    let before = scenario.clone();

    let broken = BRIEFING.replace("Elapsed Time(At least, 120);", "Elapsed Time(At least, forever);");
    let err = compile(&broken, &mut scenario).expect_err("bad amount");
    assert_eq!(err.to_string(), "Line: 17\n\nExpected: 4-byte amount");
    assert_eq!(scenario, before);
}

fn trigger_text(conditions: usize, actions: usize) -> String {
    let mut text = String::from("Trigger(\"Player 1\"){\nConditions:\n");
    text.push_str(&"\tAlways();\n".repeat(conditions));
    text.push_str("Actions:\n");
    text.push_str(&"\tPreserve Trigger();\n".repeat(actions));
    text.push_str("}\n");
    text
}

#[test]
fn sixteen_conditions_and_sixty_four_actions_fit() {
    let mut scenario = Scenario::default();
    compile(&trigger_text(16, 64), &mut scenario).expect("at capacity");
    assert_eq!(scenario.triggers[0].conditions.len(), 16);
    assert_eq!(scenario.triggers[0].actions.len(), 64);
}

#[test]
fn seventeenth_condition_is_rejected() {
    let mut scenario = Scenario::default();
    let err = compile(&trigger_text(17, 1), &mut scenario).expect_err("too many conditions");
    assert!(matches!(err, CompileError::Capacity { line: 19, .. }));
    assert!(err.to_string().ends_with("Condition Max Exceeded!"));
    assert!(scenario.triggers.is_empty());
}

#[test]
fn sixty_fifth_action_is_rejected() {
    let mut scenario = Scenario::default();
    let err = compile(&trigger_text(1, 65), &mut scenario).expect_err("too many actions");
    assert!(matches!(err, CompileError::Capacity { .. }));
    assert!(err.to_string().ends_with("Action Max Exceeded!"));
}

#[test]
fn single_trigger_entry_point_counts_triggers() {
    let mut scenario = scenario_with_home();
    let compiler = TextTrigCompiler::default();
    let err = compiler
        .compile_trigger(BRIEFING, &mut scenario, &GameData::default(), 0)
        .expect_err("two triggers");
    assert_eq!(err.to_string(), "Expected 1 trigger but found 2 triggers.");

    compiler
        .compile_trigger(MINIMAL, &mut scenario, &GameData::default(), 0)
        .expect("append");
    compiler
        .compile_trigger(MINIMAL, &mut scenario, &GameData::default(), 0)
        .expect("replace");
    assert_eq!(scenario.triggers.len(), 1);
}

#[test]
fn default_condition_flags_follow_the_kind() {
    let mut scenario = scenario_with_home();
    compile(BRIEFING, &mut scenario).expect("compile ok");
    let bring = &scenario.triggers[1].conditions[0];
    assert_eq!(bring.flags & Condition::FLAG_UNIT_TYPE_USED, Condition::FLAG_UNIT_TYPE_USED);
    let elapsed = &scenario.triggers[1].conditions[1];
    assert_eq!(elapsed.flags, 0);
}
