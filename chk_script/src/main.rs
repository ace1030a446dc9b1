//! CLI entry point for chk_script.
//! Usage: cargo run -p chk_script -- compile triggers.txt --map scenario.ron

use std::path::Path;
use std::{env, fs, process};

use anyhow::{Context, Result, bail};
use chk_data::{GameData, Scenario, validate_scenario};
use chk_script::{CompilerOptions, TextTrigCompiler, TriggerWriter, triggers_to_toml};
use log::warn;

const USAGE: &str = "Usage:
  chk_script compile <triggers.txt> --map <scenario.ron> [--out <scenario.ron>] [--range <begin>..<end>] [--config <file>]
  chk_script list <triggers.txt> --map <scenario.ron> [--config <file>]
  chk_script decompile --map <scenario.ron> [--config <file>]";

/// Flags and positional arguments shared by every subcommand.
#[derive(Debug, Default)]
struct Args {
    input: Option<String>,
    map: Option<String>,
    out: Option<String>,
    range: Option<(usize, usize)>,
    config: Option<String>,
}

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).skip_while(|a| a == "--").collect();
    let Some((cmd, rest)) = args.split_first() else {
        eprintln!("{USAGE}");
        process::exit(2);
    };
    let parsed = parse_args(rest);

    let result = match cmd.as_str() {
        "compile" => run_compile(&parsed),
        "list" => run_list(&parsed),
        "decompile" => run_decompile(&parsed),
        other => {
            eprintln!("unknown command: {other}");
            process::exit(2);
        },
    };
    if let Err(err) = result {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn usage_error(message: &str) -> ! {
    eprintln!("{message}\n{USAGE}");
    process::exit(2);
}

fn parse_args(args: &[String]) -> Args {
    let mut parsed = Args::default();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--map" | "--out" | "--range" | "--config" => {
                let Some(operand) = args.get(i + 1) else {
                    usage_error(&format!("{flag} requires a value"));
                };
                match flag {
                    "--map" => parsed.map = Some(operand.clone()),
                    "--out" => parsed.out = Some(operand.clone()),
                    "--config" => parsed.config = Some(operand.clone()),
                    _ => match parse_range(operand) {
                        Some(range) => parsed.range = Some(range),
                        None => usage_error(&format!("--range expects <begin>..<end>, got '{operand}'")),
                    },
                }
                i += 2;
            },
            s if s.starts_with("--") => usage_error(&format!("unknown flag: {s}")),
            s => {
                if parsed.input.is_none() {
                    parsed.input = Some(s.to_string());
                }
                i += 1;
            },
        }
    }
    parsed
}

fn parse_range(text: &str) -> Option<(usize, usize)> {
    let (begin, end) = text.split_once("..")?;
    let begin = begin.trim().parse().ok()?;
    let end = end.trim().parse().ok()?;
    (begin <= end).then_some((begin, end))
}

fn load_scenario(path: &str) -> Result<Scenario> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading scenario '{path}'"))?;
    ron::from_str::<Scenario>(&raw).with_context(|| format!("parsing scenario RON from '{path}'"))
}

fn load_options(args: &Args) -> Result<CompilerOptions> {
    match &args.config {
        Some(path) => CompilerOptions::load(Path::new(path)).with_context(|| format!("loading config '{path}'")),
        None => Ok(CompilerOptions::default()),
    }
}

fn required<'a>(value: &'a Option<String>, what: &str) -> &'a str {
    match value {
        Some(v) => v,
        None => usage_error(&format!("missing {what}")),
    }
}

fn run_compile(args: &Args) -> Result<()> {
    let input = required(&args.input, "trigger text file");
    let map = required(&args.map, "--map <scenario.ron>");
    let options = load_options(args)?;
    let text = fs::read_to_string(input).with_context(|| format!("reading '{input}'"))?;
    let mut scenario = load_scenario(map)?;

    let (begin, end) = args.range.unwrap_or((0, scenario.triggers.len()));
    let written = TextTrigCompiler::new(options)
        .compile_triggers(&text, &mut scenario, &GameData::default(), begin, end)
        .with_context(|| format!("compiling '{input}'"))?;

    let problems = validate_scenario(&scenario);
    if !problems.is_empty() {
        for problem in &problems {
            warn!("{problem}");
        }
        bail!("compiled scenario failed validation with {} problem(s)", problems.len());
    }

    let ron = ron::ser::to_string_pretty(&scenario, ron::ser::PrettyConfig::default())
        .context("error converting scenario to 'ron' format")?;
    let out = args.out.as_deref().unwrap_or(map);
    fs::write(out, ron).with_context(|| format!("writing '{out}'"))?;
    println!("compiled {written} trigger(s) into '{out}'");
    Ok(())
}

fn run_list(args: &Args) -> Result<()> {
    let input = required(&args.input, "trigger text file");
    let map = required(&args.map, "--map <scenario.ron>");
    let options = load_options(args)?;
    let text = fs::read_to_string(input).with_context(|| format!("reading '{input}'"))?;
    let scenario = load_scenario(map)?;

    let len = scenario.triggers.len();
    let parsed = TextTrigCompiler::new(options)
        .parse_triggers(&text, &scenario, &GameData::default(), len, len)
        .with_context(|| format!("parsing '{input}'"))?;
    println!("{}", triggers_to_toml(&parsed));
    Ok(())
}

fn run_decompile(args: &Args) -> Result<()> {
    let map = required(&args.map, "--map <scenario.ron>");
    let options = load_options(args)?;
    let scenario = load_scenario(map)?;
    print!("{}", TriggerWriter::new(&scenario, &GameData::default(), options).write_scenario());
    Ok(())
}
