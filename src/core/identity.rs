/// Identity Extractor
/// Derives the processor name: 12-byte vendor code, upgraded to the 48-byte
/// brand string when the extended leaves carry one.

use super::cpuid::CpuidReader;

/// Brand string buffer size, terminator included.
pub const IDENTITY_LEN: usize = 48;

/// Builds the processor identity from any CPUID source.
///
/// Always yields a terminated, left-trimmed string of at most
/// `IDENTITY_LEN - 1` characters. Without extended brand support the result
/// degrades to the vendor code.
pub fn identity_with<R: CpuidReader>(reader: &R) -> String {
    let mut buf = [0u8; IDENTITY_LEN];

    // Vendor code: leaf-0 EBX|EDX|ECX in that order ("GenuineIntel" layout).
    let leaf0 = reader.query(0, 0);
    buf[0..4].copy_from_slice(&leaf0.ebx.to_le_bytes());
    buf[4..8].copy_from_slice(&leaf0.edx.to_le_bytes());
    buf[8..12].copy_from_slice(&leaf0.ecx.to_le_bytes());

    // Brand string: three extended leaves, 16 bytes each, overwriting the vendor.
    let max_ext = reader.query(0x8000_0000, 0).eax;
    if max_ext >= 0x8000_0004 {
        for (i, leaf) in (0x8000_0002u32..=0x8000_0004).enumerate() {
            let regs = reader.query(leaf, 0);
            for (j, word) in [regs.eax, regs.ebx, regs.ecx, regs.edx].iter().enumerate() {
                let at = i * 16 + j * 4;
                buf[at..at + 4].copy_from_slice(&word.to_le_bytes());
            }
        }
    }

    // The brand field is not guaranteed to be terminated.
    buf[IDENTITY_LEN - 1] = 0;

    let end = buf.iter().position(|&b| b == 0).unwrap_or(IDENTITY_LEN);
    String::from_utf8_lossy(&buf[..end])
        .trim_start_matches(' ')
        .to_string()
}

/// Fresh probe of the running processor's name. Stateless: bypasses the
/// dispatch cache, never empty.
pub fn probe_cpu_name() -> String {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        let name = identity_with(&super::cpuid::HardwareCpuid);
        if name.is_empty() {
            "Unknown CPU".to_string()
        } else {
            name
        }
    }
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        "Non-x86 CPU".to_string()
    }
}
