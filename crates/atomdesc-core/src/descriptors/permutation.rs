use super::config::ConfigError;
use nalgebra::DMatrix;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use tracing::warn;

/// Eigenvalues of the symmetric matrix `matrix`, sorted by descending absolute value.
///
/// A matrix holding non-finite entries (coincident atoms) has no meaningful
/// spectrum; every eigenvalue is reported as NaN so the problem stays visible.
pub fn eigenspectrum(matrix: &DMatrix<f64>) -> Vec<f64> {
    if matrix.iter().any(|v| !v.is_finite()) {
        warn!("Interaction matrix has non-finite entries; eigenspectrum is undefined.");
        return vec![f64::NAN; matrix.nrows()];
    }

    let mut eigenvalues: Vec<f64> = matrix.symmetric_eigenvalues().iter().copied().collect();
    eigenvalues.sort_by(|a, b| b.abs().total_cmp(&a.abs()));
    eigenvalues
}

/// Euclidean norm of every row.
pub fn row_norms(matrix: &DMatrix<f64>) -> Vec<f64> {
    matrix.row_iter().map(|row| row.norm()).collect()
}

/// Indices sorted by descending score. Equal scores keep ascending index order.
fn descending_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}

/// Canonical atom order: descending row L2 norm.
pub fn sorted_l2_order(matrix: &DMatrix<f64>) -> Vec<usize> {
    descending_order(&row_norms(matrix))
}

/// Atom order by descending row L2 norm after adding N(0, sigma) noise to
/// each norm.
///
/// The generator is seeded from `seed` on every call and one sample is drawn
/// per row, in row order, so identical inputs always give identical orders.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSigma`] if `sigma` cannot parameterize a
/// normal distribution.
pub fn random_order(matrix: &DMatrix<f64>, sigma: f64, seed: u64) -> Result<Vec<usize>, ConfigError> {
    let normal = Normal::new(0.0, sigma).map_err(|_| ConfigError::InvalidSigma(sigma))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let noisy: Vec<f64> = row_norms(matrix)
        .into_iter()
        .map(|norm| norm + normal.sample(&mut rng))
        .collect();
    Ok(descending_order(&noisy))
}

/// Reorders rows and columns of `matrix` simultaneously: entry `(a, b)` of the
/// result is entry `(order[a], order[b])` of the input.
pub fn apply_order(matrix: &DMatrix<f64>, order: &[usize]) -> DMatrix<f64> {
    matrix.select_rows(order.iter()).select_columns(order.iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-10;

    fn sample_matrix() -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 3, &[
            1.0, 0.5, 0.1, //
            0.5, 9.0, 2.0, //
            0.1, 2.0, 4.0,
        ])
    }

    #[test]
    fn eigenspectrum_is_sorted_by_descending_magnitude() {
        let m = DMatrix::from_row_slice(2, 2, &[0.0, 2.0, 2.0, 0.0]);
        let values = eigenspectrum(&m);
        assert_eq!(values.len(), 2);
        assert!(values[0].abs() >= values[1].abs());
        let mut sorted = values.clone();
        sorted.sort_by(f64::total_cmp);
        assert!((sorted[0] + 2.0).abs() < TOLERANCE);
        assert!((sorted[1] - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn eigenspectrum_puts_large_negative_before_small_positive() {
        let m = DMatrix::from_row_slice(2, 2, &[-5.0, 0.0, 0.0, 1.0]);
        let values = eigenspectrum(&m);
        assert!((values[0] + 5.0).abs() < TOLERANCE);
        assert!((values[1] - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn eigenspectrum_of_non_finite_matrix_is_nan() {
        let m = DMatrix::from_row_slice(2, 2, &[0.5, f64::INFINITY, f64::INFINITY, 0.5]);
        let values = eigenspectrum(&m);
        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn sorted_l2_order_follows_descending_row_norms() {
        assert_eq!(sorted_l2_order(&sample_matrix()), vec![1, 2, 0]);
    }

    #[test]
    fn ties_keep_original_index_order() {
        let m = DMatrix::from_row_slice(3, 3, &[
            1.0, 0.0, 0.0, //
            0.0, 2.0, 0.0, //
            0.0, 0.0, 1.0,
        ]);
        assert_eq!(sorted_l2_order(&m), vec![1, 0, 2]);
    }

    #[test]
    fn apply_order_permutes_rows_and_columns_together() {
        let m = sample_matrix();
        let order = [1, 2, 0];
        let p = apply_order(&m, &order);
        for a in 0..3 {
            for b in 0..3 {
                assert_eq!(p[(a, b)], m[(order[a], order[b])]);
            }
        }
        assert_eq!(p, p.transpose());
    }

    #[test]
    fn random_order_is_reproducible_for_a_seed() {
        let m = sample_matrix();
        assert_eq!(
            random_order(&m, 5.0, 42).unwrap(),
            random_order(&m, 5.0, 42).unwrap()
        );
    }

    #[test]
    fn random_order_with_tiny_sigma_matches_sorted_l2() {
        let m = sample_matrix();
        assert_eq!(random_order(&m, 1e-12, 3).unwrap(), sorted_l2_order(&m));
    }

    #[test]
    fn random_order_varies_with_seed_under_large_noise() {
        let m = DMatrix::<f64>::identity(6, 6);
        let reference = random_order(&m, 10.0, 0).unwrap();
        let differs = (1..20).any(|seed| random_order(&m, 10.0, seed).unwrap() != reference);
        assert!(differs);
    }

    #[test]
    fn random_order_is_always_a_permutation() {
        let m = DMatrix::<f64>::identity(8, 8);
        let mut order = random_order(&m, 3.0, 17).unwrap();
        order.sort_unstable();
        assert_eq!(order, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn random_order_rejects_invalid_sigma() {
        let m = sample_matrix();
        assert_eq!(
            random_order(&m, f64::NAN, 0).map_err(|e| e.to_string()),
            Err(ConfigError::InvalidSigma(f64::NAN).to_string())
        );
    }
}
