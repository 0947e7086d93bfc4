use crate::core::profile::{Compiler, OsFamily, Profile, ProfileFlags, WordWidth};
use crate::storage::mmap::BakedProfile;

#[derive(Debug, PartialEq, Eq)]
pub enum ProfileHealth {
    /// Family, width and compiler all resolved.
    Complete,
    /// One or more outputs stayed unresolved. Permitted (flags default to
    /// unset), but strict callers may want to reject it.
    Degraded(String),
    /// Flag combination that resolution can never produce. Only reachable via
    /// a corrupt or hand-edited baked profile.
    Inconsistent(String),
}

const PLATFORM_MASK: ProfileFlags = ProfileFlags::PLATFORM_LINUX
    .union(ProfileFlags::PLATFORM_WINDOWS)
    .union(ProfileFlags::PLATFORM_OSX);
const ARCH_MASK: ProfileFlags = ProfileFlags::ARCH_32.union(ProfileFlags::ARCH_64);
const COMPILER_MASK: ProfileFlags = ProfileFlags::COMPILER_CLANG
    .union(ProfileFlags::COMPILER_GCC)
    .union(ProfileFlags::COMPILER_VISUAL_STUDIO);
const UNIXY_MASK: ProfileFlags =
    ProfileFlags::PLATFORM_LINUX.union(ProfileFlags::PLATFORM_OSX);

pub struct Diagnostics;

impl Diagnostics {
    /// Performs a full consistency and completeness check on a profile.
    pub fn check_profile(profile: &Profile) -> ProfileHealth {
        let flags = profile.flags;

        // Check 1: at most one flag per category.
        for (mask, what) in [
            (PLATFORM_MASK, "platform"),
            (ARCH_MASK, "architecture"),
            (COMPILER_MASK, "compiler"),
        ] {
            if (flags & mask).bits().count_ones() > 1 {
                return ProfileHealth::Inconsistent(format!(
                    "Multiple {} flags set: {:?}",
                    what,
                    flags & mask
                ));
            }
        }

        // Check 2: enums and flags must tell the same story.
        if flags & PLATFORM_MASK != profile.os.flag() {
            return ProfileHealth::Inconsistent(format!(
                "Platform flags disagree with OS family {:?}",
                profile.os
            ));
        }
        if flags & ARCH_MASK != profile.width.flag() {
            return ProfileHealth::Inconsistent(format!(
                "Architecture flags disagree with word width {:?}",
                profile.width
            ));
        }
        if flags & COMPILER_MASK != profile.compiler.flag() {
            return ProfileHealth::Inconsistent(format!(
                "Compiler flags disagree with compiler {:?}",
                profile.compiler
            ));
        }

        // Check 3: derived flags imply their preconditions.
        if flags.contains(ProfileFlags::USE_EMBEDDED_FFT) && (flags & UNIXY_MASK).is_empty() {
            return ProfileHealth::Inconsistent(
                "USE_EMBEDDED_FFT without a Linux/macOS family".to_string(),
            );
        }
        if flags.contains(ProfileFlags::LIBM_MATH_HEADERS) && (flags & UNIXY_MASK).is_empty() {
            return ProfileHealth::Inconsistent(
                "LIBM_MATH_HEADERS without a Linux/macOS family".to_string(),
            );
        }
        if flags.contains(ProfileFlags::MSVC_COMPAT_SHIMS)
            && !flags.contains(ProfileFlags::COMPILER_VISUAL_STUDIO)
        {
            return ProfileHealth::Inconsistent(
                "MSVC_COMPAT_SHIMS without COMPILER_VISUAL_STUDIO".to_string(),
            );
        }
        if flags.contains(ProfileFlags::COREAUDIO_BACKEND)
            && !flags.contains(ProfileFlags::PLATFORM_OSX)
        {
            return ProfileHealth::Inconsistent(
                "COREAUDIO_BACKEND without PLATFORM_OSX".to_string(),
            );
        }

        // Check 4: completeness. Unresolved outputs are legal but worth
        // surfacing to strict callers.
        let mut missing = Vec::new();
        if profile.os == OsFamily::Unknown {
            missing.push("operating system family");
        }
        if profile.width == WordWidth::Unknown {
            missing.push("CPU word width");
        }
        if profile.compiler == Compiler::Unknown {
            missing.push("compiler identity");
        }
        if !missing.is_empty() {
            return ProfileHealth::Degraded(format!("Undetected: {}", missing.join(", ")));
        }

        ProfileHealth::Complete
    }

    /// Checks a memory-mapped baked profile. Magic, bounds and checksum were
    /// already validated on load; this looks at the decoded content.
    pub fn check_baked(baked: &BakedProfile) -> ProfileHealth {
        let header = baked.header();
        if ProfileFlags::from_bits(header.flags).is_none() {
            return ProfileHealth::Inconsistent(format!(
                "Unrecognized capability bits: {:#x}",
                header.flags
            ));
        }
        Self::check_profile(&baked.profile())
    }
}
