use platform_probe::core::diagnostics::{Diagnostics, ProfileHealth};
use platform_probe::core::profile::Profile;
use platform_probe::storage::mmap::BakedProfile;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct ProfileExport {
    profile: Profile,
    symbols: Vec<SymbolExport>,
}

#[derive(Serialize)]
struct SymbolExport {
    name: String,
    value: i64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <profile_path>", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    let baked = BakedProfile::load(path)?;
    let header = baked.header();
    let profile = baked.profile();

    println!("Loading profile from {:?}", path);
    println!("Format version: {}", header.version);
    println!("Symbols: {}", header.symbol_count);
    println!("OS family: {:?}", profile.os);
    println!("Word width: {:?}", profile.width);
    println!("Compiler: {:?}", profile.compiler);
    println!("Flags: {}", profile.describe());

    match Diagnostics::check_baked(&baked) {
        ProfileHealth::Complete => println!("Status: complete"),
        ProfileHealth::Degraded(msg) => println!("Status: degraded ({})", msg),
        ProfileHealth::Inconsistent(msg) => println!("Status: INCONSISTENT ({})", msg),
    }

    let export = ProfileExport {
        profile,
        symbols: baked
            .symbols()
            .iter()
            .map(|record| SymbolExport {
                name: record.name().to_string(),
                value: record.value,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&export)?;
    let mut file = File::create("profile.json")?;
    file.write_all(json.as_bytes())?;

    println!("Exported profile to profile.json");
    Ok(())
}
