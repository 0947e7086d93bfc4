/// Build-Script Emission
/// Turns a resolved profile into `cargo:rustc-cfg` directives so downstream
/// build scripts can expose the capability flags as `cfg(...)` symbols.
use crate::core::profile::{Profile, ProfileFlags};
use std::io::{self, Write};

/// The `cfg` name a flag is published under: its symbol name, lowercased
/// (`PLATFORM_LINUX` becomes `cfg(platform_linux)`).
pub fn cargo_cfg_name(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Write the directives for `profile` to `out` (normally a build script's
/// stdout). Every known flag is declared via `rustc-check-cfg` so unset flags
/// stay valid `cfg` conditions downstream; only set flags get a `rustc-cfg`.
pub fn emit_cargo_cfgs(profile: &Profile, out: &mut impl Write) -> io::Result<()> {
    for (name, _) in ProfileFlags::all().iter_names() {
        writeln!(out, "cargo::rustc-check-cfg=cfg({})", cargo_cfg_name(name))?;
    }
    for (name, _) in profile.flags.iter_names() {
        writeln!(out, "cargo:rustc-cfg={}", cargo_cfg_name(name))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolve::resolve;
    use crate::core::symbols::SymbolSet;

    fn emit_to_string(profile: &Profile) -> String {
        let mut buf = Vec::new();
        emit_cargo_cfgs(profile, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_all_flags_are_declared() {
        let profile = resolve(&SymbolSet::new());
        let out = emit_to_string(&profile);

        for (name, _) in ProfileFlags::all().iter_names() {
            let line = format!("cargo::rustc-check-cfg=cfg({})", cargo_cfg_name(name));
            assert!(out.contains(&line), "missing declaration: {line}");
        }
        // Nothing resolved, so nothing is set.
        assert!(!out.contains("cargo:rustc-cfg="));
    }

    #[test]
    fn test_set_flags_are_emitted() {
        let mut set = SymbolSet::new();
        set.define("__linux__");
        set.define("__x86_64__");
        let out = emit_to_string(&resolve(&set));

        assert!(out.contains("cargo:rustc-cfg=platform_linux\n"));
        assert!(out.contains("cargo:rustc-cfg=arch_64\n"));
        assert!(out.contains("cargo:rustc-cfg=use_embedded_fft\n"));
        assert!(!out.contains("cargo:rustc-cfg=platform_windows\n"));
    }
}
