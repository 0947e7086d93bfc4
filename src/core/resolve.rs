/// Symbol Resolution
/// The decision table mapping a [`SymbolSet`] to a [`Profile`]. Pure and
/// stateless: the same input always yields the same profile.
use crate::core::profile::{Compiler, OsFamily, Profile, ProfileFlags, WordWidth};
use crate::core::symbols::{self, SymbolSet};

// Ordered rule chains. Each entry pairs a recognition table with its outcome;
// chains are walked front to back and the first table with any defined member
// wins, so a symbol set matching several families resolves to the earliest one.
const OS_RULES: &[(&[&str], OsFamily)] = &[
    (symbols::LINUX_FAMILY, OsFamily::Linux),
    (symbols::WINDOWS_FAMILY, OsFamily::Windows),
    (symbols::DARWIN_FAMILY, OsFamily::Macos),
];

const WIDTH_RULES: &[(&[&str], WordWidth)] = &[
    (symbols::X86_32_ARCH, WordWidth::Bits32),
    (symbols::X86_64_ARCH, WordWidth::Bits64),
];

const COMPILER_RULES: &[(&[&str], Compiler)] = &[
    (symbols::CLANG_IDENT, Compiler::Clang),
    (symbols::GCC_IDENT, Compiler::Gcc),
    (symbols::MSVC_IDENT, Compiler::Msvc),
];

fn first_match<T: Copy>(set: &SymbolSet, rules: &[(&[&str], T)], fallback: T) -> T {
    rules
        .iter()
        .find(|(table, _)| set.any_defined(table))
        .map(|(_, outcome)| *outcome)
        .unwrap_or(fallback)
}

/// SSE2 is a logical OR over four independent indicators, not a precedence
/// chain: the passthrough symbol a front-end may predefine, a floating-point
/// code-generation level of at least 2, or either 64-bit x86 marker.
fn sse2_available(set: &SymbolSet) -> bool {
    set.is_defined(symbols::SSE2_PASSTHROUGH)
        || set.value(symbols::SSE2_LEVEL).unwrap_or(0) >= 2
        || set.is_truthy(symbols::AMD64_MARKER)
        || set.is_defined(symbols::X64_MARKER)
}

/// Resolve a symbol set into a capability profile.
///
/// Nothing here ever fails: a symbol set matching no table leaves the
/// corresponding output at `Unknown` and its flags unset. Callers that need a
/// hard failure on an undetected family run the profile through
/// [`Diagnostics`](crate::core::diagnostics::Diagnostics) instead.
pub fn resolve(set: &SymbolSet) -> Profile {
    let os = first_match(set, OS_RULES, OsFamily::Unknown);
    let width = first_match(set, WIDTH_RULES, WordWidth::Unknown);
    let compiler = first_match(set, COMPILER_RULES, Compiler::Unknown);

    let mut flags = os.flag() | width.flag() | compiler.flag();

    if sse2_available(set) {
        flags |= ProfileFlags::SIMD_SSE2_AVAILABLE;
    }
    if set.is_defined(symbols::NEON_IDENT) {
        flags |= ProfileFlags::ARM_NEON_INTRINSICS;
    }
    if compiler == Compiler::Msvc {
        flags |= ProfileFlags::MSVC_COMPAT_SHIMS;
    }
    if matches!(os, OsFamily::Linux | OsFamily::Macos) {
        flags |= ProfileFlags::LIBM_MATH_HEADERS;
        flags |= ProfileFlags::USE_EMBEDDED_FFT;
    }
    if os == OsFamily::Macos {
        flags |= ProfileFlags::COREAUDIO_BACKEND;
    }

    Profile {
        os,
        width,
        compiler,
        flags,
    }
}
