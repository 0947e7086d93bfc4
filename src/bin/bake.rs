use clap::Parser;
use platform_probe::core::diagnostics::{Diagnostics, ProfileHealth};
use platform_probe::core::host::{host_symbols, HostReport};
use platform_probe::core::resolve::resolve;
use platform_probe::core::symbols::SymbolSet;
use platform_probe::emit::emit_cargo_cfgs;
use platform_probe::storage::mmap::bake;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Define a symbol: NAME or NAME=VALUE. Repeatable.
    #[arg(short = 'D', long = "define")]
    defines: Vec<String>,

    /// Seed the set with the symbols of the running host.
    #[arg(long)]
    host: bool,

    #[arg(short, long, default_value = "profile.bin")]
    output: PathBuf,

    /// Print the resolved profile as JSON.
    #[arg(long)]
    json: bool,

    /// Print cargo cfg directives (for use from a build script).
    #[arg(long)]
    cfg: bool,

    /// Exit nonzero unless every output resolved.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut symbols = if args.host {
        host_symbols()
    } else {
        SymbolSet::new()
    };
    for def in &args.defines {
        symbols.parse_define(def)?;
    }

    let profile = resolve(&symbols);

    if args.cfg {
        emit_cargo_cfgs(&profile, &mut std::io::stdout())?;
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!("Resolved {} symbols:", symbols.len());
        println!("  OS family:  {:?}", profile.os);
        println!("  Word width: {:?}", profile.width);
        println!("  Compiler:   {:?}", profile.compiler);
        println!("  Flags:      {}", profile.describe());
        if args.host {
            let report = HostReport::gather();
            println!(
                "  Host:       {} {} / {} ({} cores, {} MB)",
                report.os_name,
                report.os_version,
                report.cpu_brand,
                report.logical_cores,
                report.total_mem_mb
            );
        }
    }

    match Diagnostics::check_profile(&profile) {
        ProfileHealth::Complete => {}
        ProfileHealth::Degraded(msg) | ProfileHealth::Inconsistent(msg) => {
            if args.strict {
                eprintln!("Error: {}", msg);
                std::process::exit(1);
            }
            eprintln!("Warning: {}", msg);
        }
    }

    if !args.cfg {
        println!("Saving to {:?}...", args.output);
    }
    bake(&args.output, &profile, &symbols)?;

    Ok(())
}
