//! `es8-default` — promote a patch to the global default, or re-apply the
//! factory default, across a whole backup.
//!
//! Usage:
//!   es8-default <bank>:<patch> [--overwrite] [--defaults <path>]
//!   es8-default --factory [--overwrite] [--defaults <path>]
//!
//! The backup document is read from stdin; the updated document is written
//! to stdout. `--overwrite` replaces every patch outright with the default
//! instead of layering (destructive). With `--defaults`, the stored global
//! default seeds the engine and is refreshed afterwards.

use std::error::Error;
use std::io::{self, Read, Write};

use es8::{resolve_global_defaults, Backup, PatchList};
use es8_core::patch::Patch;
use serde_json::Value;

const USAGE: &str =
    "usage: es8-default (<bank>:<patch> | --factory) [--overwrite] [--defaults <path>]";

struct Args {
    coords: Option<(usize, usize)>,
    factory: bool,
    overwrite: bool,
    defaults_path: Option<String>,
}

fn parse_coords(raw: &str) -> Result<(usize, usize), Box<dyn Error>> {
    let (bank, patch) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected <bank>:<patch>, got {raw}"))?;
    let bank = bank.parse().map_err(|_| format!("bank must be an integer: {bank}"))?;
    let patch = patch.parse().map_err(|_| format!("patch must be an integer: {patch}"))?;
    Ok((bank, patch))
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut coords = None;
    let mut factory = false;
    let mut overwrite = false;
    let mut defaults_path = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--factory" => factory = true,
            "--overwrite" => overwrite = true,
            "--defaults" => {
                defaults_path = Some(args.next().ok_or("--defaults requires a path")?);
            }
            raw => {
                if coords.is_some() {
                    return Err(USAGE.into());
                }
                coords = Some(parse_coords(raw)?);
            }
        }
    }
    if factory == coords.is_some() {
        return Err(USAGE.into());
    }
    Ok(Args { coords, factory, overwrite, defaults_path })
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
    let changed = match args.coords {
        Some((bank, patch)) => list.set_as_default(bank, patch)?.is_some(),
        None => true,
    };
    if changed || args.overwrite {
        list.apply_default(args.factory, args.overwrite)?;
    }

    backup.patches = list.patches().to_vec();
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &backup.to_value())?;
    stdout.write_all(b"\n")?;

    if let Some(path) = &args.defaults_path {
        let default = list.latest_default_state();
        std::fs::write(path, serde_json::to_string(&default.to_value())?)?;
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
