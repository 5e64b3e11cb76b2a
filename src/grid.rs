//! Row-major lattice storage and the grid initializer.
//!
//! Lattice coordinate `(i, j)` maps to flat index `i * cols + j`. Erosion
//! neighbor lookups and the topology builder both rely on this mapping.

use crate::error::{Result, TerrainError};

/// Offsets of the 8 neighbors in row-major visiting order.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A 2D grid with `rows * cols` cells. Edges do not wrap.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub rows: usize,
    pub cols: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::default(); rows * cols],
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn new_with(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Flat index of lattice coordinate `(i, j)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.cols + j
    }

    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[self.index(i, j)]
    }

    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut T {
        let idx = self.index(i, j);
        &mut self.data[idx]
    }

    pub fn set(&mut self, i: usize, j: usize, value: T) {
        let idx = self.index(i, j);
        self.data[idx] = value;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// True for points off the outermost ring.
    pub fn is_interior(&self, i: usize, j: usize) -> bool {
        i >= 1 && j >= 1 && i + 1 < self.rows && j + 1 < self.cols
    }

    /// 8-connected neighbors of `(i, j)`, clipped at the edges.
    pub fn neighbors_8(&self, i: usize, j: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(di, dj)| {
            let ni = i.checked_add_signed(di)?;
            let nj = j.checked_add_signed(dj)?;
            (ni < self.rows && nj < self.cols).then_some((ni, nj))
        })
    }

    /// Coordinates of every interior point, row-major.
    pub fn interior(&self) -> impl Iterator<Item = (usize, usize)> {
        let rows = self.rows;
        let cols = self.cols;
        (1..rows.saturating_sub(1))
            .flat_map(move |i| (1..cols.saturating_sub(1)).map(move |j| (i, j)))
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, val)| (idx / cols, idx % cols, val))
    }

    /// Transform every cell into a new grid of the same shape.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }
}

/// Two same-shaped grids used for simultaneous updates.
///
/// Each pass reads the front buffer and writes the back buffer; `swap` then
/// advances the generation so the back buffer becomes the new front.
#[derive(Clone, Debug)]
pub struct GridPair<T> {
    buffers: [Grid<T>; 2],
    generation: usize,
}

impl<T: Clone> GridPair<T> {
    pub fn new(initial: Grid<T>) -> Self {
        let back = initial.clone();
        Self {
            buffers: [initial, back],
            generation: 0,
        }
    }

    /// Number of completed swaps.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn front(&self) -> &Grid<T> {
        &self.buffers[self.generation % 2]
    }

    /// Start a pass: the back buffer is reset to a copy of the front and
    /// both are returned as `(read, write)`.
    pub fn begin_pass(&mut self) -> (&Grid<T>, &mut Grid<T>) {
        let [first, second] = &mut self.buffers;
        let (front, back) = if self.generation % 2 == 0 {
            (&*first, second)
        } else {
            (&*second, first)
        };
        back.data.clone_from_slice(&front.data);
        (front, back)
    }

    /// Publish the back buffer as the new front.
    pub fn swap(&mut self) {
        self.generation += 1;
    }

    pub fn into_front(self) -> Grid<T> {
        let [first, second] = self.buffers;
        if self.generation % 2 == 0 {
            first
        } else {
            second
        }
    }
}

/// One lattice cell: world-space position and texture coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeightSample {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl HeightSample {
    /// Distance from the origin in the X-Z plane.
    pub fn planar_distance(&self) -> f32 {
        let [x, _, z] = self.position;
        (x * x + z * z).sqrt()
    }
}

/// Check lattice dimensions before anything is allocated.
pub fn validate_lattice(width: f32, depth: f32, rows: usize, cols: usize) -> Result<()> {
    crate::error::ensure_positive("width", width)?;
    crate::error::ensure_positive("depth", depth)?;
    if rows < 2 {
        return Err(TerrainError::invalid(
            "rows",
            format!("lattice needs at least 2 rows, got {}", rows),
        ));
    }
    if cols < 2 {
        return Err(TerrainError::invalid(
            "cols",
            format!("lattice needs at least 2 columns, got {}", cols),
        ));
    }
    match rows.checked_mul(cols) {
        Some(count) if count <= u32::MAX as usize => Ok(()),
        _ => Err(TerrainError::invalid(
            "rows",
            format!("{}x{} lattice overflows 32-bit vertex indices", rows, cols),
        )),
    }
}

/// Lay out a `rows x cols` lattice of evenly spaced points centered at the
/// origin, flat at `y = 0`.
pub fn initialize_lattice(
    width: f32,
    depth: f32,
    rows: usize,
    cols: usize,
) -> Result<Grid<HeightSample>> {
    validate_lattice(width, depth, rows, cols)?;

    let dx = width / (rows - 1) as f32;
    let dz = depth / (cols - 1) as f32;
    let start_x = -width * 0.5;
    let start_z = -depth * 0.5;

    let mut samples = Grid::new(rows, cols);
    for i in 0..rows {
        for j in 0..cols {
            samples.set(
                i,
                j,
                HeightSample {
                    position: [start_x + i as f32 * dx, 0.0, start_z + j as f32 * dz],
                    uv: [i as f32 / (rows - 1) as f32, j as f32 / (cols - 1) as f32],
                },
            );
        }
    }

    Ok(samples)
}
