//! `es8-assign` — set a global assign default across every patch of a
//! backup.
//!
//! Usage:
//!   es8-assign <assign-number> <source> <mode> <target> [<params-json>]
//!              [--force] [--defaults <path>]
//!
//! The backup document is read from stdin; the updated document is written
//! to stdout. `<params-json>` is an object mapping per-assign field names
//! to integers. With `--defaults`, the stored global default is loaded from
//! the given file first and the new collapsed default is written back to it
//! afterwards. Refuses to replace an already-customized default slot unless
//! `--force` is given.

use std::error::Error;
use std::io::{self, Read, Write};

use es8::{resolve_global_defaults, Backup, PatchList};
use es8_core::patch::Patch;
use indexmap::IndexMap;
use serde_json::Value;

const USAGE: &str =
    "usage: es8-assign <assign-number> <source> <mode> <target> [<params-json>] [--force] [--defaults <path>]";

struct Args {
    assign_number: usize,
    source: String,
    mode: String,
    target: String,
    params: IndexMap<String, i64>,
    force: bool,
    defaults_path: Option<String>,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut positional = Vec::new();
    let mut force = false;
    let mut defaults_path = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--force" => force = true,
            "--defaults" => {
                defaults_path = Some(args.next().ok_or("--defaults requires a path")?);
            }
            _ => positional.push(arg),
        }
    }
    if positional.len() < 4 || positional.len() > 5 {
        return Err(USAGE.into());
    }

    let assign_number = positional[0]
        .parse()
        .map_err(|_| format!("assign number must be an integer: {}", positional[0]))?;
    let params = match positional.get(4) {
        Some(raw) => parse_params(raw)?,
        None => IndexMap::new(),
    };

    Ok(Args {
        assign_number,
        source: positional[1].clone(),
        mode: positional[2].clone(),
        target: positional[3].clone(),
        params,
        force,
        defaults_path,
    })
}

fn parse_params(raw: &str) -> Result<IndexMap<String, i64>, Box<dyn Error>> {
    let value: Value = serde_json::from_str(raw).map_err(|e| format!("params: {e}"))?;
    let map = value.as_object().ok_or("params must be a JSON object")?;
    let mut params = IndexMap::new();
    for (name, value) in map {
        let value = value
            .as_i64()
            .ok_or_else(|| format!("params entry {name} must be an integer"))?;
        params.insert(name.clone(), value);
    }
    Ok(params)
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args()?;

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let doc: Value = serde_json::from_str(input.trim())?;
    let mut backup = Backup::from_value(&doc)?;

    let initial_default = match &args.defaults_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            resolve_global_defaults(&serde_json::from_str(&raw)?)?
        }
        None => Patch::factory(),
    };

    let mut list = PatchList::new(backup.patches, initial_default);
    let (patches, new_default) = list.update_assign(
        args.assign_number,
        &args.source,
        &args.mode,
        &args.target,
        &args.params,
        args.force,
    )?;

    backup.patches = patches;
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &backup.to_value())?;
    stdout.write_all(b"\n")?;

    if let Some(path) = &args.defaults_path {
        std::fs::write(path, serde_json::to_string(&new_default.to_value())?)?;
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
