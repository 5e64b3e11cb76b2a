//! Profiling tool to identify performance bottlenecks

use std::time::{Duration, Instant};

use clap::Parser;
use rayon::prelude::*;

use island_generator::erosion::simulate_erosion;
use island_generator::grid::initialize_lattice;
use island_generator::heightmap::{island_radius, synthesize_heights};
use island_generator::{generate_island, NoiseOffset, TerrainConfig};

#[derive(Parser, Debug)]
#[command(name = "profile_erosion")]
#[command(about = "Time each generation stage and a parallel batch of islands")]
struct Args {
    /// Lattice resolution (rows and cols)
    #[arg(short, long, default_value = "256")]
    resolution: usize,

    /// Seed of the profiled island
    #[arg(short, long, default_value = "1337")]
    seed: u64,

    /// Islands generated in the parallel batch
    #[arg(short, long, default_value = "8")]
    batch: u64,
}

fn main() -> island_generator::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = TerrainConfig::new(10.0, 10.0, args.resolution, args.resolution);
    let offset = NoiseOffset::from_seed(args.seed);

    println!("=== Performance Profiling ===");
    println!(
        "Lattice: {}x{} ({} points)",
        config.rows,
        config.cols,
        config.rows * config.cols
    );
    println!();

    let island = generate_island(&config, offset)?;
    let total = island.total_time();
    for (stage, elapsed) in &island.timings {
        println!("{:<10} {:?}", stage, elapsed);
    }

    // Split erosion into its two phases on a fresh heightfield
    let samples = initialize_lattice(config.width, config.depth, config.rows, config.cols)?;
    let radius = island_radius(config.width, config.depth, &config.noise);
    let heights = synthesize_heights(&samples, radius, offset, &config.noise);

    let mut hydraulic_only = config.erosion.clone();
    hydraulic_only.thermal_passes = 0;
    let mut field = heights.clone();
    let start = Instant::now();
    let stats = simulate_erosion(&mut field, &hydraulic_only);
    let hydraulic_time = start.elapsed();

    let mut thermal_only = config.erosion.clone();
    thermal_only.erosion_iterations = 0;
    let start = Instant::now();
    simulate_erosion(&mut field, &thermal_only);
    let thermal_time = start.elapsed();

    println!("\nErosion parameters:");
    println!("  Hydraulic passes: {}", config.erosion.erosion_iterations);
    println!("  Thermal passes: {}", config.erosion.thermal_passes);
    println!("  Weighting: {:?}", config.erosion.transfer_weighting);
    println!("  Hydraulic phase: {:?}", hydraulic_time);
    println!("  Thermal phase: {:?}", thermal_time);
    println!("  Eroded: {:.3} units", stats.total_eroded);
    println!("  Deposited: {:.3} units", stats.total_deposited);

    // Summary
    println!("\n=== Summary ===");
    for (stage, elapsed) in &island.timings {
        println!("{:<10} {:>8.2}% ({:?})", stage, percent(*elapsed, total), elapsed);
    }
    println!("{}", "-".repeat(33));
    println!("{:<10} {:>8}  {:?}", "TOTAL", "100%", total);

    // Independent islands share nothing, so a batch parallelizes cleanly
    println!("\n=== Batch of {} islands ===", args.batch);
    let start = Instant::now();
    let results: Vec<_> = (0..args.batch)
        .into_par_iter()
        .map(|i| generate_island(&config, NoiseOffset::from_seed(args.seed.wrapping_add(i))))
        .collect::<island_generator::Result<_>>()?;
    let wall = start.elapsed();
    let serial: Duration = results.iter().map(|island| island.total_time()).sum();
    println!("Wall time:       {:?}", wall);
    println!("Summed runtime:  {:?}", serial);
    if !wall.is_zero() {
        println!("Speedup:         {:.2}x", serial.as_secs_f64() / wall.as_secs_f64());
    }

    Ok(())
}

fn percent(part: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        0.0
    } else {
        100.0 * part.as_secs_f64() / total.as_secs_f64()
    }
}
