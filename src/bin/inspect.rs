use clap::Parser;
use serde::Serialize;
use yespower_dispatch::{detect_cpu_features, optimization_summary, probe_cpu_name, CpuFeatures};

#[derive(Parser, Debug)]
#[command(about = "Inspect the CPU capabilities seen by the yespower dispatcher")]
struct Args {
    /// Restrict the reported features to a comma-separated list (e.g. "sse2,avx")
    /// to preview kernel selection on weaker machines.
    #[arg(long)]
    mask: Option<String>,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct CpuExport {
    cpu: String,
    bitmask: u32,
    sse2: bool,
    sse41: bool,
    avx: bool,
    avx2: bool,
    xop: bool,
    optimizations: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut features = detect_cpu_features();
    if let Some(mask) = &args.mask {
        features &= CpuFeatures::parse_list(mask)?;
    }

    let export = CpuExport {
        cpu: probe_cpu_name(),
        bitmask: features.bits(),
        sse2: features.contains(CpuFeatures::SSE2),
        sse41: features.contains(CpuFeatures::SSE41),
        avx: features.contains(CpuFeatures::AVX),
        avx2: features.contains(CpuFeatures::AVX2),
        xop: features.contains(CpuFeatures::XOP),
        optimizations: optimization_summary(features),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&export)?);
    } else {
        println!("CPU:           {}", export.cpu);
        println!("Bitmask:       0x{:02x}", export.bitmask);
        println!("SSE2:          {}", export.sse2);
        println!("SSE4.1:        {}", export.sse41);
        println!("AVX:           {}", export.avx);
        println!("AVX2:          {}", export.avx2);
        println!("XOP:           {}", export.xop);
        println!("Optimizations: {}", export.optimizations);
    }

    Ok(())
}
