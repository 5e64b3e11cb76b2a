//! Export generated islands for inspection.
//!
//! - PNG: shaded top-down elevation preview lit with the mesh normals
//! - OBJ: positions, normals, UVs and faces of a terrain mesh
//! - JSON: generation summary (dimensions, offset, counts, erosion stats)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;

use crate::erosion::ErosionStats;
use crate::error::{Result, TerrainError};
use crate::heightmap::{HeightStats, SEA_LEVEL};
use crate::mesh::{Mesh, VertexLayout};
use crate::seeds::NoiseOffset;
use crate::terrain::{Island, TerrainConfig};

// =============================================================================
// PNG PREVIEW
// =============================================================================

/// Render a terrain mesh as a top-down image, one pixel per lattice point.
///
/// Image x follows the lattice column (Z), image y the row (X).
pub fn render_preview(mesh: &Mesh, rows: usize, cols: usize) -> Result<RgbImage> {
    if mesh.layout() != VertexLayout::Terrain {
        return Err(TerrainError::invalid("mesh", "preview needs a terrain mesh"));
    }
    if mesh.vertex_count() != rows * cols {
        return Err(TerrainError::invalid(
            "mesh",
            format!(
                "{} vertices do not match a {}x{} lattice",
                mesh.vertex_count(),
                rows,
                cols
            ),
        ));
    }

    let max_h = mesh
        .height_range()
        .map(|(_, hi)| hi)
        .unwrap_or(0.0)
        .max(1e-3);
    let used = mesh.referenced_vertices();

    // Light direction (from upper-left, above)
    let light = {
        let (x, y, z) = (-0.5f32, 0.8f32, -0.4f32);
        let len = (x * x + y * y + z * z).sqrt();
        [x / len, y / len, z / len]
    };

    let img = ImageBuffer::from_fn(cols as u32, rows as u32, |px, py| {
        let idx = py as usize * cols + px as usize;
        let h = mesh.position(idx)[1];

        if !used[idx] || h <= SEA_LEVEL {
            // Sea: darker toward the outer edge of the lattice
            let uv = mesh.uv(idx);
            let edge = ((uv[0] - 0.5).abs().max((uv[1] - 0.5).abs()) * 2.0).min(1.0);
            let blue = (200.0 - edge * 80.0) as u8;
            return Rgb([25, (110.0 - edge * 40.0) as u8, blue]);
        }

        let n = mesh.normal(idx);
        let diffuse = (n[0] * light[0] + n[1] * light[1] + n[2] * light[2]).max(0.0);
        let ambient = 0.35;
        let lighting = (ambient + (1.0 - ambient) * diffuse).min(1.0);

        let t = (h / max_h).clamp(0.0, 1.0);
        let base = if t < 0.08 {
            // Beach
            [210.0, 195.0, 140.0]
        } else if t < 0.45 {
            // Lowland - green
            [70.0, 140.0, 60.0]
        } else if t < 0.8 {
            // Highland - brown to gray rock
            let k = (t - 0.45) / 0.35;
            [110.0 + k * 40.0, 95.0 + k * 45.0, 70.0 + k * 60.0]
        } else {
            // Peak - snow
            [235.0, 235.0, 240.0]
        };

        Rgb([
            (base[0] * lighting) as u8,
            (base[1] * lighting) as u8,
            (base[2] * lighting) as u8,
        ])
    });

    Ok(img)
}

/// Save a shaded preview of a terrain mesh as PNG.
pub fn save_heightmap_png(mesh: &Mesh, rows: usize, cols: usize, path: &Path) -> Result<()> {
    let img = render_preview(mesh, rows, cols)?;
    img.save(path)?;
    log::info!("saved preview {}x{} to {}", cols, rows, path.display());
    Ok(())
}

// =============================================================================
// WAVEFRONT OBJ
// =============================================================================

/// Write a mesh as Wavefront OBJ. Indices are shifted to OBJ's 1-based form.
pub fn write_obj<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
    writeln!(
        writer,
        "# island mesh: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    )?;

    for v in 0..mesh.vertex_count() {
        let [x, y, z] = mesh.position(v);
        writeln!(writer, "v {} {} {}", x, y, z)?;
    }
    for v in 0..mesh.vertex_count() {
        let [x, y, z] = mesh.normal(v);
        writeln!(writer, "vn {} {} {}", x, y, z)?;
    }
    for v in 0..mesh.vertex_count() {
        let [u, t] = mesh.uv(v);
        writeln!(writer, "vt {} {}", u, t)?;
    }
    for [a, b, c] in mesh.triangles() {
        let (a, b, c) = (a + 1, b + 1, c + 1);
        writeln!(writer, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
    }

    Ok(())
}

/// Save a mesh as an OBJ file.
pub fn save_obj(mesh: &Mesh, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_obj(mesh, &mut writer)?;
    writer.flush()?;
    log::info!("saved mesh to {}", path.display());
    Ok(())
}

// =============================================================================
// JSON SUMMARY
// =============================================================================

/// Machine-readable report of one generation run.
#[derive(Clone, Debug, Serialize)]
pub struct TerrainSummary {
    pub seed: Option<u64>,
    pub offset: NoiseOffset,
    pub width: f32,
    pub depth: f32,
    pub rows: usize,
    pub cols: usize,
    pub island_radius: f32,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub culled_triangles: usize,
    pub heights: HeightStats,
    pub erosion: ErosionStats,
    pub generation_ms: f64,
}

impl TerrainSummary {
    pub fn new(config: &TerrainConfig, island: &Island, seed: Option<u64>) -> Self {
        Self {
            seed,
            offset: island.offset,
            width: config.width,
            depth: config.depth,
            rows: config.rows,
            cols: config.cols,
            island_radius: island.island_radius,
            vertex_count: island.mesh.vertex_count(),
            triangle_count: island.mesh.triangle_count(),
            culled_triangles: island.culled_triangles,
            heights: island.heights,
            erosion: island.erosion.clone(),
            generation_ms: island.total_time().as_secs_f64() * 1000.0,
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        log::info!("saved summary to {}", path.display());
        Ok(())
    }
}
