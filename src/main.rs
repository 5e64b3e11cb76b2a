use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use island_generator::export::{save_heightmap_png, save_obj, TerrainSummary};
use island_generator::{
    generate_island, generate_water_plane, ErosionParams, ErosionPreset, Result, TerrainConfig,
    TerrainSeeds, TransferWeighting,
};

#[derive(Parser, Debug)]
#[command(name = "island_generator")]
#[command(about = "Generate eroded procedural island meshes")]
struct Args {
    /// World extent along X
    #[arg(short = 'W', long, default_value = "10.0")]
    width: f32,

    /// World extent along Z
    #[arg(short = 'D', long, default_value = "10.0")]
    depth: f32,

    /// Lattice points along X
    #[arg(short, long, default_value = "256")]
    rows: usize,

    /// Lattice points along Z
    #[arg(short, long, default_value = "256")]
    cols: usize,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Load terrain configuration from a JSON file (overrides size flags)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Erosion preset: none, gentle, normal, dramatic
    #[arg(short, long, default_value = "normal")]
    preset: ErosionPreset,

    /// Override the number of hydraulic passes
    #[arg(long)]
    iterations: Option<usize>,

    /// Override the hydraulic transfer factor
    #[arg(long)]
    hydraulic_factor: Option<f32>,

    /// Override the talus angle
    #[arg(long)]
    talus: Option<f32>,

    /// Override the number of thermal passes
    #[arg(long)]
    thermal_passes: Option<usize>,

    /// Give each downhill neighbor its own share (mass-conserving)
    #[arg(long)]
    per_neighbor: bool,

    /// Subdivisions of the water plane
    #[arg(long, default_value = "1")]
    water_divisions: usize,

    /// Export a shaded preview PNG
    #[arg(long)]
    export_png: Option<PathBuf>,

    /// Export the terrain mesh as OBJ
    #[arg(long)]
    export_obj: Option<PathBuf>,

    /// Export a JSON summary of the run
    #[arg(long)]
    export_summary: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn terrain_config(&self) -> Result<TerrainConfig> {
        let mut config = match &self.config {
            Some(path) => TerrainConfig::load(path)?,
            None => TerrainConfig::new(self.width, self.depth, self.rows, self.cols)
                .with_erosion(ErosionParams::from_preset(self.preset)),
        };

        let erosion = &mut config.erosion;
        if let Some(iterations) = self.iterations {
            erosion.erosion_iterations = iterations;
        }
        if let Some(factor) = self.hydraulic_factor {
            erosion.hydraulic_factor = factor;
        }
        if let Some(talus) = self.talus {
            erosion.talus_angle = talus;
        }
        if let Some(passes) = self.thermal_passes {
            erosion.thermal_passes = passes;
        }
        if self.per_neighbor {
            erosion.transfer_weighting = TransferWeighting::PerNeighbor;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = args.terrain_config()?;

    let seeds = match args.seed {
        Some(seed) => TerrainSeeds::from_master(seed),
        None => TerrainSeeds::default(),
    };
    config.noise.noise_seed = seeds.noise;

    println!("Generating island with seed: {}", seeds.master);
    println!(
        "World {:.1}x{:.1}, lattice {}x{}, island radius {:.2}",
        config.width,
        config.depth,
        config.rows,
        config.cols,
        config.island_radius()
    );

    let island = generate_island(&config, seeds.noise_offset())?;

    println!("Noise offset: {}", island.offset);
    println!(
        "Heights: {:.3} to {:.3} (mean {:.3}, {:.1}% land)",
        island.heights.min,
        island.heights.max,
        island.heights.mean,
        island.heights.land_fraction * 100.0
    );
    println!("Erosion complete:");
    println!("  Hydraulic passes: {}", island.erosion.hydraulic_passes);
    println!("  Thermal passes: {}", island.erosion.thermal_passes);
    println!("  Total eroded: {:.3} units", island.erosion.total_eroded);
    println!("  Total deposited: {:.3} units", island.erosion.total_deposited);
    println!("  Boundary leakage: {:.3} units", island.erosion.boundary_leakage);
    println!(
        "Mesh: {} vertices, {} triangles ({} culled)",
        island.mesh.vertex_count(),
        island.mesh.triangle_count(),
        island.culled_triangles
    );

    let water = generate_water_plane(config.width, config.depth, args.water_divisions)?;
    println!(
        "Water plane: {} vertices, {} triangles",
        water.vertex_count(),
        water.triangle_count()
    );
    println!(
        "Generated in {:.1}ms",
        island.total_time().as_secs_f64() * 1000.0
    );

    if let Some(path) = &args.export_png {
        save_heightmap_png(&island.mesh, config.rows, config.cols, path)?;
        println!("Saved preview to {}", path.display());
    }
    if let Some(path) = &args.export_obj {
        save_obj(&island.mesh, path)?;
        println!("Saved mesh to {}", path.display());
    }
    if let Some(path) = &args.export_summary {
        TerrainSummary::new(&config, &island, Some(seeds.master)).save(path)?;
        println!("Saved summary to {}", path.display());
    }

    Ok(())
}
