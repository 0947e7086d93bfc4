/// Host Probe Module
/// Synthesizes the symbol set a C toolchain targeting the current host would
/// predefine, so the host can be resolved like any explicit target.
use crate::core::symbols::SymbolSet;
use serde::Serialize;
use sysinfo::System;

/// Build a [`SymbolSet`] describing the running host.
///
/// OS and architecture identifiers come from compile-time target facts; SIMD
/// capability is probed at runtime where the architecture allows it. The
/// compiler identifier is the toolchain conventionally paired with the target
/// environment (MSVC on `*-msvc`, Clang on macOS, GCC elsewhere on unixy
/// targets).
pub fn host_symbols() -> SymbolSet {
    let mut set = SymbolSet::new();

    if cfg!(target_os = "linux") {
        set.define("__linux__");
        set.define("__unix");
    } else if cfg!(target_os = "windows") {
        set.define("_WIN32");
        if cfg!(target_pointer_width = "64") {
            set.define("_WIN64");
        }
    } else if cfg!(target_os = "macos") {
        // Darwin toolchains do not define the unix identifiers recognized
        // here, so the family resolves through the Darwin table.
        set.define("__APPLE__");
    }

    if cfg!(target_arch = "x86_64") {
        set.define("__x86_64__");
        set.define("__amd64");
        if cfg!(target_os = "windows") {
            set.define("_M_X64");
        }
    } else if cfg!(target_arch = "x86") {
        set.define("__i386__");
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if is_x86_feature_detected!("sse2") {
            set.define("__SSE2__");
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        // NEON is baseline on aarch64.
        set.define("__ARM_NEON__");
    }

    #[cfg(target_arch = "arm")]
    {
        if cfg!(target_feature = "neon") {
            set.define("__ARM_NEON__");
        }
    }

    if cfg!(target_env = "msvc") {
        set.define("_MSC_VER");
    } else if cfg!(target_os = "macos") {
        set.define("__clang__");
    } else if cfg!(any(target_os = "linux", target_env = "gnu")) {
        set.define("__GNUC__");
    }

    set
}

/// Informational host summary for CLI and service output.
#[derive(Debug, Clone, Serialize)]
pub struct HostReport {
    pub os_name: String,
    pub os_version: String,
    pub kernel: String,
    pub cpu_brand: String,
    pub logical_cores: usize,
    pub total_mem_mb: u64,
}

impl HostReport {
    pub fn gather() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        Self {
            os_name: System::name().unwrap_or_else(|| "unknown".to_string()),
            os_version: System::long_os_version().unwrap_or_else(|| "unknown".to_string()),
            kernel: System::kernel_version().unwrap_or_else(|| "unknown".to_string()),
            cpu_brand: sys.global_cpu_info().brand().trim().to_string(),
            logical_cores: sys.cpus().len(),
            total_mem_mb: sys.total_memory() / (1024 * 1024),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::{Compiler, OsFamily, WordWidth};
    use crate::core::resolve::resolve;

    #[test]
    fn test_host_resolves_without_panicking() {
        let profile = resolve(&host_symbols());
        // Whatever the build host is, resolution itself must not fail.
        let _ = profile.describe();
    }

    #[test]
    fn test_host_probe_is_deterministic() {
        assert_eq!(resolve(&host_symbols()), resolve(&host_symbols()));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_linux_host_detected() {
        let profile = resolve(&host_symbols());
        assert_eq!(profile.os, OsFamily::Linux);
        assert!(profile.use_embedded_fft());
        assert_eq!(profile.compiler, Compiler::Gcc);
    }

    #[test]
    #[cfg(target_arch = "x86_64")]
    fn test_x86_64_host_width() {
        let profile = resolve(&host_symbols());
        assert_eq!(profile.width, WordWidth::Bits64);
        assert!(profile.has_sse2());
    }

    #[test]
    #[cfg(target_arch = "aarch64")]
    fn test_aarch64_host_has_neon() {
        assert!(resolve(&host_symbols()).has_neon());
    }

    #[test]
    fn test_host_report_gathers() {
        let report = HostReport::gather();
        assert!(report.logical_cores > 0);
    }
}
