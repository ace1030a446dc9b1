use std::fs;

use chk_data::{GameData, Scenario};
use chk_script::{CompilerOptions, ConfigError, TextTrigCompiler};

const MEMORY_TRIGGER: &str = include_str!("fixtures/memory.trg");
const MEMORY_CONFIG: &str = include_str!("fixtures/memory.toml");

#[test]
fn config_file_switches_memory_arguments_to_addresses() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chk_script.toml");
    fs::write(&path, MEMORY_CONFIG).expect("write config");

    let options = CompilerOptions::load(&path).expect("load config");
    assert!(options.use_addresses_for_memory);
    assert_eq!(options.death_table_offset, CompilerOptions::DEFAULT_DEATH_TABLE_OFFSET);

    let mut scenario = Scenario::default();
    TextTrigCompiler::new(options)
        .compile_triggers(MEMORY_TRIGGER, &mut scenario, &GameData::default(), 0, 0)
        .expect("compile ok");
    let trigger = &scenario.triggers[0];
    assert_eq!(trigger.conditions[0].condition_type, 15);
    assert_eq!(trigger.conditions[0].player, 2);
    assert_eq!(trigger.conditions[0].amount, 3);
    assert_eq!(trigger.actions[0].action_type, 45);
    assert_eq!(trigger.actions[0].group, 3);
    assert_eq!(trigger.actions[0].secondary_type, 7);
    assert_eq!(trigger.actions[0].number, 7);
}

#[test]
fn default_options_read_memory_arguments_as_offsets() {
    let mut scenario = Scenario::default();
    TextTrigCompiler::default()
        .compile_triggers(MEMORY_TRIGGER, &mut scenario, &GameData::default(), 0, 0)
        .expect("compile ok");
    assert_eq!(scenario.triggers[0].conditions[0].player, 0x0058_A36C);
    assert_eq!(scenario.triggers[0].actions[0].group, 0x0058_A370);
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = CompilerOptions::load(dir.path().join("absent.toml")).expect_err("no file");
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn malformed_config_is_a_toml_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "use_addresses_for_memory = \"yes\"\n").expect("write config");
    let err = CompilerOptions::load(&path).expect_err("wrong type");
    assert!(matches!(err, ConfigError::Toml(_)));
}
