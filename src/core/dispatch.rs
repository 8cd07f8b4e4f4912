/// Dispatch Initialization
/// Process-wide capability cache plus the one-time startup report.

use std::sync::OnceLock;

use super::features::{self, CpuFeatures};
use super::identity;

#[derive(Debug)]
struct DispatchInfo {
    features: CpuFeatures,
    cpu_name: String,
}

// OnceLock gives at-most-once init even when two threads race the first call.
static DISPATCH: OnceLock<DispatchInfo> = OnceLock::new();

fn init_once() -> &'static DispatchInfo {
    DISPATCH.get_or_init(|| {
        let info = DispatchInfo {
            features: features::detect_cpu_features(),
            cpu_name: identity::probe_cpu_name(),
        };
        tracing::debug!(features = ?info.features, cpu = %info.cpu_name, "dispatch initialized");
        report(&info);
        info
    })
}

/// Initializes the dispatcher. First call probes the CPU, caches the result and
/// prints the capability report; every later call is a no-op.
pub fn yespower_init_dispatch() {
    init_once();
}

/// Cached capability mask. Triggers initialization on first use.
pub fn cpu_features() -> CpuFeatures {
    init_once().features
}

/// Cached processor name. Triggers initialization on first use.
pub fn get_cpu_name() -> &'static str {
    &init_once().cpu_name
}

/// Capability tiers in priority order, joined for the report line.
/// AVX2 shadows AVX; a processor without SSE2 gets the slow-path warning.
pub fn optimization_summary(features: CpuFeatures) -> String {
    let mut tiers = Vec::new();
    if features.contains(CpuFeatures::XOP) {
        tiers.push("XOP");
    }
    if features.contains(CpuFeatures::AVX2) {
        tiers.push("AVX2");
    } else if features.contains(CpuFeatures::AVX) {
        tiers.push("AVX");
    }
    if features.contains(CpuFeatures::SSE41) {
        tiers.push("SSE4.1");
    }
    if features.contains(CpuFeatures::SSE2) {
        tiers.push("SSE2");
    } else {
        tiers.push("GENERIC (slow!)");
    }
    tiers.join(" + ")
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn report(info: &DispatchInfo) {
    println!("CPU: {}", info.cpu_name);
    println!("Yespower optimizations: {}", optimization_summary(info.features));
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn report(_info: &DispatchInfo) {
    println!("Yespower: Generic implementation (non-x86)");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cpuid::{FakeCpuid, Leaf};

    #[test]
    fn test_summary_priority_order() {
        assert_eq!(optimization_summary(CpuFeatures::all()), "XOP + AVX2 + SSE4.1 + SSE2");
        assert_eq!(
            optimization_summary(CpuFeatures::AVX | CpuFeatures::SSE41 | CpuFeatures::SSE2),
            "AVX + SSE4.1 + SSE2"
        );
        assert_eq!(
            optimization_summary(CpuFeatures::AVX2 | CpuFeatures::AVX | CpuFeatures::SSE2),
            "AVX2 + SSE2"
        );
        assert_eq!(optimization_summary(CpuFeatures::SSE2), "SSE2");
    }

    #[test]
    fn test_summary_generic_fallback() {
        assert_eq!(optimization_summary(CpuFeatures::empty()), "GENERIC (slow!)");
        // Missing SSE2 always appends the warning, even with faster tiers set.
        assert_eq!(
            optimization_summary(CpuFeatures::XOP),
            "XOP + GENERIC (slow!)"
        );
    }

    #[test]
    fn test_sse2_only_report_line() {
        let mut cpu = FakeCpuid::new();
        cpu.set(0, 0, Leaf { eax: 1, ..Default::default() });
        cpu.set(1, 0, Leaf { edx: 1 << 26, ..Default::default() });

        let features = features::detect_with(&cpu);
        assert_eq!(features, CpuFeatures::SSE2);
        assert_eq!(optimization_summary(features), "SSE2");
    }

    #[test]
    fn test_init_is_idempotent() {
        yespower_init_dispatch();
        yespower_init_dispatch();

        // Accessors hand out the very same cached values on every call.
        let first = get_cpu_name();
        let second = get_cpu_name();
        assert!(std::ptr::eq(first, second));
        assert!(!first.is_empty());
        assert_eq!(cpu_features(), cpu_features());
    }

    #[test]
    fn test_accessors_initialize_lazily() {
        // Safe regardless of test ordering: first accessor call must not panic
        // and must agree with the cached mask afterwards.
        let features = cpu_features();
        assert_eq!(features, cpu_features());
    }
}
