/// Capability Probe
/// Walks a fixed table of CPUID feature bits and folds them into a bitmask.

use bitflags::bitflags;
use thiserror::Error;

use super::cpuid::{CpuidReader, Leaf};

bitflags! {
    /// Instruction-set extensions the yespower kernels can exploit.
    ///
    /// Bit positions are ABI: the kernel selector hardcodes them, so they must
    /// never be renumbered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CpuFeatures: u32 {
        const SSE2  = 1 << 0;
        const SSE41 = 1 << 1;
        const AVX   = 1 << 2;
        const AVX2  = 1 << 3;
        const XOP   = 1 << 4;
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FeatureParseError {
    #[error("unknown CPU feature: {0:?}")]
    Unknown(String),
}

impl CpuFeatures {
    /// Parses a comma-separated feature list, e.g. `"sse2,avx2"`.
    /// Used by tooling to simulate restricted processors.
    pub fn parse_list(list: &str) -> Result<Self, FeatureParseError> {
        let mut features = CpuFeatures::empty();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            features |= match name.to_ascii_lowercase().as_str() {
                "sse2" => CpuFeatures::SSE2,
                "sse4.1" | "sse41" => CpuFeatures::SSE41,
                "avx" => CpuFeatures::AVX,
                "avx2" => CpuFeatures::AVX2,
                "xop" => CpuFeatures::XOP,
                _ => return Err(FeatureParseError::Unknown(name.to_string())),
            };
        }
        Ok(features)
    }
}

const EXTENDED_BASE: u32 = 0x8000_0000;

// Feature bits never live in EAX; it carries leaf counts.
#[derive(Clone, Copy)]
enum Reg {
    Ebx,
    Ecx,
    Edx,
}

struct FeatureBit {
    leaf: u32,
    subleaf: u32,
    reg: Reg,
    bit: u32,
    flag: CpuFeatures,
}

const FEATURE_TABLE: &[FeatureBit] = &[
    FeatureBit { leaf: 1, subleaf: 0, reg: Reg::Edx, bit: 26, flag: CpuFeatures::SSE2 },
    FeatureBit { leaf: 1, subleaf: 0, reg: Reg::Ecx, bit: 19, flag: CpuFeatures::SSE41 },
    FeatureBit { leaf: 1, subleaf: 0, reg: Reg::Ecx, bit: 28, flag: CpuFeatures::AVX },
    FeatureBit { leaf: 7, subleaf: 0, reg: Reg::Ebx, bit: 5, flag: CpuFeatures::AVX2 },
    // XOP is AMD-only, reported through the extended leaf range.
    FeatureBit { leaf: 0x8000_0001, subleaf: 0, reg: Reg::Ecx, bit: 11, flag: CpuFeatures::XOP },
];

fn register(regs: Leaf, reg: Reg) -> u32 {
    match reg {
        Reg::Ebx => regs.ebx,
        Reg::Ecx => regs.ecx,
        Reg::Edx => regs.edx,
    }
}

/// Probes any CPUID source. Pure: the same reader always yields the same mask.
pub fn detect_with<R: CpuidReader>(reader: &R) -> CpuFeatures {
    let max_std = reader.query(0, 0).eax;
    let max_ext = reader.query(EXTENDED_BASE, 0).eax;

    let mut features = CpuFeatures::empty();
    for entry in FEATURE_TABLE {
        let supported = if entry.leaf >= EXTENDED_BASE {
            max_ext >= entry.leaf
        } else {
            max_std >= entry.leaf
        };
        if !supported {
            continue;
        }
        let regs = reader.query(entry.leaf, entry.subleaf);
        if register(regs, entry.reg) & (1 << entry.bit) != 0 {
            features |= entry.flag;
        }
    }

    // AVX2 is only honored on top of AVX, even if the raw leaf-7 bit is set.
    if !features.contains(CpuFeatures::AVX) {
        features.remove(CpuFeatures::AVX2);
    }

    tracing::debug!(?features, max_std, max_ext, "cpuid probe complete");
    features
}

/// Fresh probe of the running processor. Stateless: bypasses the dispatch cache.
pub fn detect_cpu_features() -> CpuFeatures {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        detect_with(&super::cpuid::HardwareCpuid)
    }
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        CpuFeatures::empty()
    }
}
