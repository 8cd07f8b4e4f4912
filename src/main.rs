use yespower_dispatch::{
    cpu_features, detect_cpu_features, get_cpu_name, yespower_init_dispatch, CpuFeatures,
};

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== Yespower Dispatch Demo ===");

    // 1. One-time init (prints the capability report)
    println!("\n[1] Initializing dispatch...");
    yespower_init_dispatch();

    // 2. Cached lookups
    println!("\n[2] Reading the cache...");
    println!("    Name:     {}", get_cpu_name());
    println!("    Features: {:?}", cpu_features());

    // 3. Fresh probe, bypassing the cache
    println!("\n[3] Fresh probe...");
    let fresh = detect_cpu_features();
    for (label, flag) in [
        ("SSE2", CpuFeatures::SSE2),
        ("SSE4.1", CpuFeatures::SSE41),
        ("AVX", CpuFeatures::AVX),
        ("AVX2", CpuFeatures::AVX2),
        ("XOP", CpuFeatures::XOP),
    ] {
        println!("    {:<7} {}", label, fresh.contains(flag));
    }

    // 4. Second init is a no-op (no second report)
    println!("\n[4] Initializing again...");
    yespower_init_dispatch();

    println!("\n=== Demo Complete ===");
}
