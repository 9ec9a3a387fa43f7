// scripts/benchmark.rs
use chrono::NaiveDate;
use phoenix_mc::instruments::{Exercise, OptionType, Payoff, PhoenixOption};
use phoenix_mc::math_utils::Timer;
use phoenix_mc::mc::{McPhoenixEngine, PhoenixEngineConfig};
use phoenix_mc::models::BlackScholesProcess;
use phoenix_mc::rng::RandomPolicy;
use std::env;
use std::fs::File;
use std::io::Write;
use std::process::Command;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_model: String,
    rust_version: String,
    rustc_flags: String,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_model: Self::get_cpu_model(),
            rust_version: Self::get_rust_version(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
        }
    }

    fn get_cpu_model() -> String {
        #[cfg(target_os = "linux")]
        {
            std::fs::read_to_string("/proc/cpuinfo")
                .ok()
                .and_then(|content| {
                    content
                        .lines()
                        .find(|line| line.starts_with("model name"))
                        .and_then(|line| line.split(':').nth(1))
                        .map(|s| s.trim().to_string())
                })
                .unwrap_or_else(|| "Unknown CPU".to_string())
        }

        #[cfg(target_os = "macos")]
        {
            Command::new("sysctl")
                .args(["-n", "machdep.cpu.brand_string"])
                .output()
                .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
                .unwrap_or_else(|_| "Unknown CPU".to_string())
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            "Unknown CPU".to_string()
        }
    }

    fn get_rust_version() -> String {
        Command::new("rustc")
            .arg("--version")
            .output()
            .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
            .unwrap_or_else(|_| "Unknown Rust version".to_string())
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    samples: usize,
    steps: usize,
    time_ms: f64,
    throughput_samples_per_sec: f64,
    value: f64,
    error_estimate: Option<f64>,
    converged: bool,
}

struct Scenario {
    name: String,
    steps: usize,
    config: PhoenixEngineConfig,
}

fn phoenix() -> PhoenixOption {
    PhoenixOption::new(
        1_000_000.0,
        120.0,
        80.0,
        0.01,
        Payoff::plain_vanilla(OptionType::Call, 100.0),
        Exercise::European {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("Valid date"),
        },
    )
}

fn scenarios() -> Vec<Scenario> {
    let mut scenarios = Vec::new();

    for &samples in &[10_000, 100_000] {
        for &steps in &[12, 52, 252] {
            scenarios.push(Scenario {
                name: format!("Fixed ({}k samples, {} steps)", samples / 1000, steps),
                steps,
                config: PhoenixEngineConfig::builder()
                    .steps(steps)
                    .samples(samples)
                    .seed(42)
                    .build()
                    .expect("Valid configuration"),
            });
        }
    }

    scenarios.push(Scenario {
        name: "Antithetic + bridge (50k, 52 steps)".to_string(),
        steps: 52,
        config: PhoenixEngineConfig::builder()
            .steps(52)
            .samples(50_000)
            .antithetic_variate(true)
            .brownian_bridge(true)
            .seed(42)
            .build()
            .expect("Valid configuration"),
    });

    scenarios.push(Scenario {
        name: "Halton + bridge (65536, 52 steps)".to_string(),
        steps: 52,
        config: PhoenixEngineConfig::builder()
            .steps(52)
            .samples(65_536)
            .brownian_bridge(true)
            .random_policy(RandomPolicy::LowDiscrepancy)
            .build()
            .expect("Valid configuration"),
    });

    for &tolerance in &[50.0, 20.0] {
        scenarios.push(Scenario {
            name: format!("Adaptive (tol {}, 52 steps)", tolerance),
            steps: 52,
            config: PhoenixEngineConfig::builder()
                .steps(52)
                .absolute_tolerance(tolerance)
                .max_samples(1_000_000)
                .seed(42)
                .build()
                .expect("Valid configuration"),
        });
    }

    scenarios
}

fn run_phoenix_benchmarks() -> Vec<BenchmarkResult> {
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).expect("Valid date");
    let process = BlackScholesProcess::new(100.0, today, 0.05, 0.0, 0.2).expect("Valid process");
    let option = phoenix();
    let mut results = Vec::new();
    let mut timer = Timer::new();

    for scenario in scenarios() {
        println!("Benchmarking {}...", scenario.name);
        let engine = McPhoenixEngine::black_scholes(process.clone(), scenario.config);

        timer.start();
        let priced = option.price(&engine).expect("Priceable option");
        let time_ms = timer.elapsed_ms();

        results.push(BenchmarkResult {
            name: scenario.name,
            samples: priced.samples,
            steps: scenario.steps,
            time_ms,
            throughput_samples_per_sec: priced.samples as f64 / (time_ms / 1000.0),
            value: priced.value,
            error_estimate: priced.error_estimate,
            converged: priced.converged,
        });
    }

    results
}

fn write_results_to_csv(
    results: &[BenchmarkResult],
    system_info: &SystemInfo,
    filename: &str,
) -> std::io::Result<()> {
    let mut file = File::create(filename)?;

    writeln!(file, "# System Information")?;
    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU: {}", system_info.cpu_model)?;
    writeln!(file, "# Rust Version: {}", system_info.rust_version)?;
    writeln!(file, "# RUSTFLAGS: {}", system_info.rustc_flags)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(file, "#")?;

    writeln!(
        file,
        "Benchmark,Samples,Steps,Time_ms,Throughput_samples_per_sec,Value,Error_Estimate,Converged"
    )?;
    for result in results {
        writeln!(
            file,
            "{},{},{},{:.2},{:.0},{:.6},{},{}",
            result.name,
            result.samples,
            result.steps,
            result.time_ms,
            result.throughput_samples_per_sec,
            result.value,
            result
                .error_estimate
                .map(|e| format!("{:.6}", e))
                .unwrap_or_else(|| "N/A".to_string()),
            result.converged
        )?;
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("phoenix-mc Performance Benchmark");
    println!("{:=<80}", "");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU: {}", system_info.cpu_model);
    println!("  Rust: {}", system_info.rust_version);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!();

    println!("Running Phoenix option benchmarks...");
    let results = run_phoenix_benchmarks();

    println!("\n{:=<80}", "");
    println!("BENCHMARK RESULTS");
    println!("{:=<80}", "");
    println!(
        "{:<38} {:>8} {:>10} {:>12} {:>12} {:>10} {:>6}",
        "Benchmark", "Samples", "Time (ms)", "Throughput", "Value", "Std Err", "Conv"
    );
    println!("{:-<80}", "");

    for result in &results {
        println!(
            "{:<38} {:>8} {:>10.2} {:>12.0} {:>12.4} {:>10} {:>6}",
            result.name,
            result.samples,
            result.time_ms,
            result.throughput_samples_per_sec,
            result.value,
            result
                .error_estimate
                .map(|e| format!("{:.4}", e))
                .unwrap_or_else(|| "N/A".to_string()),
            result.converged
        );
    }

    println!("{:=<80}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("benchmark_results_{}.csv", timestamp);
    match write_results_to_csv(&results, &system_info, &filename) {
        Ok(()) => println!("\nResults saved to: {}", filename),
        Err(e) => eprintln!("\nCould not write {}: {}", filename, e),
    }

    println!("\nTo reproduce these results:");
    println!("1. Use Rust version: {}", system_info.rust_version);
    println!("2. Set RUSTFLAGS: {}", system_info.rustc_flags);
    println!("3. Run: cargo run --bin benchmark --release");
}
