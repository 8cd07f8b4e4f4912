//! Yespower Dispatch
//! Detects x86 instruction-set extensions at process start and publishes a
//! stable capability bitmask plus the processor name, so the kernel selector
//! can pick the fastest hash implementation without per-machine builds.

pub mod core;

pub use crate::core::dispatch::{
    cpu_features, get_cpu_name, optimization_summary, yespower_init_dispatch,
};
pub use crate::core::features::{detect_cpu_features, CpuFeatures, FeatureParseError};
pub use crate::core::identity::probe_cpu_name;
