use platform_probe::core::resolve::resolve;
use platform_probe::core::symbols::SymbolSet;
use platform_probe::storage::mmap::{bake, BakedProfile};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Platform Probe Demo ===");

    // 1. Describe a target toolchain
    println!("\n[1] Defining toolchain symbols...");
    let mut symbols = SymbolSet::new();
    // A typical 64-bit Linux GCC target
    symbols.define("__linux__");
    symbols.define("__x86_64__");
    symbols.define("__GNUC__");
    symbols.define("__SSE2__");
    println!("    Defined {} symbols.", symbols.len());

    // 2. Resolve
    println!("\n[2] Resolving capability profile...");
    let profile = resolve(&symbols);
    println!(
        "    OS: {:?}, Width: {:?}, Compiler: {:?}",
        profile.os, profile.width, profile.compiler
    );
    println!("    Flags: {}", profile.describe());

    // 3. Bake to Disk
    let path = Path::new("demo_profile.bin");
    println!("\n[3] Baking to disk: {:?}", path);
    bake(path, &profile, &symbols)?;

    // 4. Load from Disk (Zero-Copy)
    println!("\n[4] Loading via mmap...");
    let baked = BakedProfile::load(path)?;
    let header = baked.header();
    println!(
        "    Header Info: Symbols={}, Flags={:#06x}, Magic={:?}",
        header.symbol_count,
        header.flags,
        std::str::from_utf8(&header.magic)?
    );
    println!(
        "    FFT backend: {}",
        if baked.profile().use_embedded_fft() {
            "embedded"
        } else {
            "external (unset)"
        }
    );

    println!("\n=== Demo Complete ===");
    Ok(())
}
