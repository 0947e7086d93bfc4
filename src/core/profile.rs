/// Resolved Capability Profile
/// The normalized output of symbol resolution: family/width/compiler enums plus
/// the derived feature flags downstream code gates on.
use bitflags::bitflags;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Linux,
    Windows,
    Macos,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordWidth {
    #[serde(rename = "32")]
    Bits32,
    #[serde(rename = "64")]
    Bits64,
    #[serde(rename = "unknown")]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compiler {
    Clang,
    Gcc,
    Msvc,
    Unknown,
}

bitflags! {
    /// Capability flags, one bit per exported conditional-compilation symbol.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ProfileFlags: u32 {
        const PLATFORM_LINUX          = 1 << 0;
        const PLATFORM_WINDOWS        = 1 << 1;
        const PLATFORM_OSX            = 1 << 2;
        const ARCH_32                 = 1 << 3;
        const ARCH_64                 = 1 << 4;
        const COMPILER_CLANG          = 1 << 5;
        const COMPILER_GCC            = 1 << 6;
        const COMPILER_VISUAL_STUDIO  = 1 << 7;
        const SIMD_SSE2_AVAILABLE     = 1 << 8;
        const ARM_NEON_INTRINSICS     = 1 << 9;
        const USE_EMBEDDED_FFT        = 1 << 10;
        const MSVC_COMPAT_SHIMS       = 1 << 11;
        const LIBM_MATH_HEADERS       = 1 << 12;
        const COREAUDIO_BACKEND       = 1 << 13;
    }
}

// Serialize as the list of set flag names. JSON consumers get
// ["PLATFORM_LINUX", "ARCH_64", ...] instead of raw bits.
impl Serialize for ProfileFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(None)?;
        for (name, _) in self.iter_names() {
            seq.serialize_element(name)?;
        }
        seq.end()
    }
}

impl OsFamily {
    /// Stable 1-byte tag for the baked format. 0 stays reserved for Unknown.
    pub fn to_tag(self) -> u8 {
        match self {
            OsFamily::Unknown => 0,
            OsFamily::Linux => 1,
            OsFamily::Windows => 2,
            OsFamily::Macos => 3,
        }
    }

    /// Unrecognized tags decode to Unknown rather than failing.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            1 => OsFamily::Linux,
            2 => OsFamily::Windows,
            3 => OsFamily::Macos,
            _ => OsFamily::Unknown,
        }
    }

    pub fn flag(self) -> ProfileFlags {
        match self {
            OsFamily::Linux => ProfileFlags::PLATFORM_LINUX,
            OsFamily::Windows => ProfileFlags::PLATFORM_WINDOWS,
            OsFamily::Macos => ProfileFlags::PLATFORM_OSX,
            OsFamily::Unknown => ProfileFlags::empty(),
        }
    }
}

impl WordWidth {
    pub fn to_tag(self) -> u8 {
        match self {
            WordWidth::Unknown => 0,
            WordWidth::Bits32 => 32,
            WordWidth::Bits64 => 64,
        }
    }

    pub fn from_tag(tag: u8) -> Self {
        match tag {
            32 => WordWidth::Bits32,
            64 => WordWidth::Bits64,
            _ => WordWidth::Unknown,
        }
    }

    pub fn flag(self) -> ProfileFlags {
        match self {
            WordWidth::Bits32 => ProfileFlags::ARCH_32,
            WordWidth::Bits64 => ProfileFlags::ARCH_64,
            WordWidth::Unknown => ProfileFlags::empty(),
        }
    }
}

impl Compiler {
    pub fn to_tag(self) -> u8 {
        match self {
            Compiler::Unknown => 0,
            Compiler::Clang => 1,
            Compiler::Gcc => 2,
            Compiler::Msvc => 3,
        }
    }

    pub fn from_tag(tag: u8) -> Self {
        match tag {
            1 => Compiler::Clang,
            2 => Compiler::Gcc,
            3 => Compiler::Msvc,
            _ => Compiler::Unknown,
        }
    }

    pub fn flag(self) -> ProfileFlags {
        match self {
            Compiler::Clang => ProfileFlags::COMPILER_CLANG,
            Compiler::Gcc => ProfileFlags::COMPILER_GCC,
            Compiler::Msvc => ProfileFlags::COMPILER_VISUAL_STUDIO,
            Compiler::Unknown => ProfileFlags::empty(),
        }
    }
}

/// A fully resolved capability profile. Built once per target configuration and
/// immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub os: OsFamily,
    pub width: WordWidth,
    pub compiler: Compiler,
    pub flags: ProfileFlags,
}

impl Profile {
    pub fn has_sse2(&self) -> bool {
        self.flags.contains(ProfileFlags::SIMD_SSE2_AVAILABLE)
    }

    pub fn has_neon(&self) -> bool {
        self.flags.contains(ProfileFlags::ARM_NEON_INTRINSICS)
    }

    pub fn use_embedded_fft(&self) -> bool {
        self.flags.contains(ProfileFlags::USE_EMBEDDED_FFT)
    }

    /// Human-readable flag summary, e.g. "PLATFORM_LINUX, ARCH_64".
    pub fn describe(&self) -> String {
        let names: Vec<&str> = self.flags.iter_names().map(|(name, _)| name).collect();
        if names.is_empty() {
            "none detected".to_string()
        } else {
            names.join(", ")
        }
    }
}
