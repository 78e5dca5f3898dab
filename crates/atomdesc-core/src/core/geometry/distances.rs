use nalgebra::{DMatrix, Point3};

#[inline]
pub fn distance_squared(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm_squared()
}

/// Builds the dense, symmetric matrix of Euclidean distances between all atoms.
///
/// The diagonal is exactly zero. Runs in O(N²) time and memory.
pub fn distance_matrix(positions: &[Point3<f64>]) -> DMatrix<f64> {
    let n = positions.len();
    let mut matrix = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let d = distance_squared(&positions[i], &positions[j]).sqrt();
            matrix[(i, j)] = d;
            matrix[(j, i)] = d;
        }
    }
    matrix
}
