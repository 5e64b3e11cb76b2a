//! Debug tool for comparing erosion presets visually
//! Renders the same island once per preset and tiles the previews into one PNG

use std::path::PathBuf;

use clap::Parser;
use image::{Rgb, RgbImage};

use island_generator::export::render_preview;
use island_generator::{generate_island, ErosionParams, ErosionPreset, NoiseOffset, TerrainConfig};

/// Header band colors, one per preset in `ErosionPreset::all()` order
const BAND_COLORS: [Rgb<u8>; 4] = [
    Rgb([120, 120, 120]),
    Rgb([90, 170, 90]),
    Rgb([200, 160, 60]),
    Rgb([190, 70, 60]),
];
const BAND_HEIGHT: u32 = 6;
const BACKGROUND: Rgb<u8> = Rgb([40, 40, 40]);

#[derive(Parser, Debug)]
#[command(name = "debug_erosion")]
#[command(about = "Render one island under every erosion preset")]
struct Args {
    /// Random seed for the noise offset
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Lattice resolution (rows and cols)
    #[arg(short, long, default_value = "256")]
    resolution: usize,

    /// Output image
    #[arg(short, long, default_value = "erosion_comparison.png")]
    output: PathBuf,
}

fn main() -> island_generator::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    println!("Generating erosion comparison grid...");
    let offset = NoiseOffset::from_seed(args.seed);

    let mut images = Vec::new();
    for &preset in ErosionPreset::all() {
        println!("  Processing: {} ({})", preset, preset.description());
        let config = TerrainConfig::new(10.0, 10.0, args.resolution, args.resolution)
            .with_erosion(ErosionParams::from_preset(preset));
        let island = generate_island(&config, offset)?;
        println!(
            "    height {:.3}..{:.3}, eroded {:.3}, leaked {:.3}",
            island.heights.min,
            island.heights.max,
            island.erosion.total_eroded,
            island.erosion.boundary_leakage
        );
        images.push(render_preview(&island.mesh, config.rows, config.cols)?);
    }

    let grid = create_grid(&images, 2);
    grid.save(&args.output)?;
    println!("Saved {} ({}x{})", args.output.display(), grid.width(), grid.height());
    println!("Layout (left to right, top to bottom):");
    for (i, preset) in ErosionPreset::all().iter().enumerate() {
        let Rgb([r, g, b]) = BAND_COLORS[i % BAND_COLORS.len()];
        println!("  {}. {} (band rgb {},{},{})", i + 1, preset, r, g, b);
    }

    Ok(())
}

/// Tile equally sized previews into `cols` columns, each with a colored band on top.
fn create_grid(images: &[RgbImage], cols: usize) -> RgbImage {
    let (cell_w, cell_h) = images
        .first()
        .map(|img| (img.width(), img.height()))
        .unwrap_or((0, 0));
    let rows = images.len().div_ceil(cols.max(1));
    let spacing = 4;

    let width = cols as u32 * (cell_w + spacing) + spacing;
    let height = rows as u32 * (cell_h + BAND_HEIGHT + spacing) + spacing;
    let mut grid = RgbImage::from_pixel(width, height, BACKGROUND);

    for (idx, img) in images.iter().enumerate() {
        let x0 = spacing + (idx % cols) as u32 * (cell_w + spacing);
        let y0 = spacing + (idx / cols) as u32 * (cell_h + BAND_HEIGHT + spacing);
        let band = BAND_COLORS[idx % BAND_COLORS.len()];

        for y in 0..BAND_HEIGHT {
            for x in 0..cell_w {
                grid.put_pixel(x0 + x, y0 + y, band);
            }
        }
        for (x, y, pixel) in img.enumerate_pixels() {
            grid.put_pixel(x0 + x, y0 + BAND_HEIGHT + y, *pixel);
        }
    }

    grid
}
