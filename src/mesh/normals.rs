//! Per-vertex normals from accumulated face normals.
//!
//! Face normals are added unnormalized, so larger triangles weigh more.
//! Degenerate faces contribute nothing and vertices that no triangle
//! touches keep a zero normal.

#[inline]
fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
fn length_squared(v: [f32; 3]) -> f32 {
    v[0] * v[0] + v[1] * v[1] + v[2] * v[2]
}

#[inline]
fn is_degenerate(v: [f32; 3]) -> bool {
    v.iter().any(|c| !c.is_finite()) || v == [0.0; 3]
}

/// Unit-length copy of `v`, or zero if `v` is zero or non-finite.
///
/// Any other vector normalizes, however small: `v` is rescaled by its
/// largest component first so tiny lattices do not underflow.
pub fn normalize_or_zero(v: [f32; 3]) -> [f32; 3] {
    if is_degenerate(v) {
        return [0.0; 3];
    }
    let largest = v[0].abs().max(v[1].abs()).max(v[2].abs());
    let scaled = [v[0] / largest, v[1] / largest, v[2] / largest];
    let len = length_squared(scaled).sqrt();
    [scaled[0] / len, scaled[1] / len, scaled[2] / len]
}

/// Unnormalized normal of triangle `(a, b, c)`: `(b - a) x (c - a)`.
///
/// Magnitude is twice the triangle area. Degenerate triangles yield zero.
pub fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let n = cross(sub(b, a), sub(c, a));
    if is_degenerate(n) {
        return [0.0; 3];
    }
    n
}

/// Area-weighted vertex normals for `positions` under `indices`.
pub fn estimate_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![[0.0f32; 3]; positions.len()];

    for tri in indices.chunks_exact(3) {
        let (ia, ib, ic) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face = face_normal(positions[ia], positions[ib], positions[ic]);
        for idx in [ia, ib, ic] {
            let n = &mut normals[idx];
            n[0] += face[0];
            n[1] += face[1];
            n[2] += face[2];
        }
    }

    for n in &mut normals {
        *n = normalize_or_zero(*n);
    }

    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length(v: [f32; 3]) -> f32 {
        length_squared(v).sqrt()
    }

    #[test]
    fn test_flat_winding_points_up() {
        // (a, d, b) with d one step along +z and b one step along +x
        let n = face_normal([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]);
        assert!(n[1] > 0.0);
        assert_eq!(n[0], 0.0);
        assert_eq!(n[2], 0.0);
    }

    #[test]
    fn test_degenerate_face_contributes_zero() {
        let p = [1.0, 2.0, 3.0];
        assert_eq!(face_normal(p, p, p), [0.0; 3]);
        let collinear = face_normal([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert_eq!(collinear, [0.0; 3]);
        assert_eq!(face_normal([f32::NAN, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]), [0.0; 3]);
    }

    #[test]
    fn test_normals_unit_or_zero() {
        let positions = vec![
            [0.0, 0.0, 0.0],
            [0.0, 1.0, 1.0],
            [1.0, 0.5, 0.0],
            [1.0, 0.0, 1.0],
            [5.0, 5.0, 5.0], // orphan
        ];
        let indices = vec![0, 1, 2, 1, 3, 2];
        let normals = estimate_normals(&positions, &indices);

        for n in &normals[..4] {
            assert!((length(*n) - 1.0).abs() < 1e-5);
        }
        assert_eq!(normals[4], [0.0; 3]);
    }

    #[test]
    fn test_larger_faces_weigh_more() {
        // Shared vertex 0; one small tilted face and one large flat face
        let positions = vec![
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 10.0],
            [10.0, 0.0, 0.0],
            [0.0, 0.0, -1.0],
            [-1.0, 1.0, 0.0],
        ];
        let indices = vec![0, 1, 2, 0, 4, 3];
        let normals = estimate_normals(&positions, &indices);
        let n = normals[0];
        // Dominated by the large flat face
        assert!(n[1] > 0.95);
    }

    #[test]
    fn test_normalize_or_zero() {
        assert_eq!(normalize_or_zero([0.0, 3.0, 4.0]), [0.0, 0.6, 0.8]);
        assert_eq!(normalize_or_zero([0.0; 3]), [0.0; 3]);
        assert_eq!(normalize_or_zero([f32::INFINITY, 1.0, 0.0]), [0.0; 3]);
    }

    #[test]
    fn test_sub_millimetre_face_still_points_up() {
        let positions = vec![[0.0, 0.0, 0.0], [0.0, 0.0, 1e-4], [1e-4, 0.0, 0.0]];
        let normals = estimate_normals(&positions, &[0, 1, 2]);
        for n in normals {
            assert!(n[0].abs() < 1e-6);
            assert!((n[1] - 1.0).abs() < 1e-6);
            assert!(n[2].abs() < 1e-6);
        }
    }

    #[test]
    fn test_tiny_accumulator_normalizes() {
        let n = normalize_or_zero([0.0, 1e-30, 0.0]);
        assert!((n[1] - 1.0).abs() < 1e-6);
    }
}
