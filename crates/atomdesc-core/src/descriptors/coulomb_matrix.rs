use super::Descriptor;
use super::config::{ConfigError, CoulombMatrixConfig, Permutation};
use super::error::DescriptorError;
use super::permutation;
use crate::core::geometry::distances::distance_matrix;
use crate::core::models::structure::Structure;
use nalgebra::DMatrix;
use tracing::{instrument, warn};

/// Exponent of the atomic number in the diagonal self-interaction term.
const SELF_INTERACTION_EXPONENT: f64 = 2.4;

/// The Coulomb matrix descriptor.
///
/// For a structure with atomic numbers `Z` and pairwise distances `D`, the
/// interaction matrix is
///
/// ```text
/// M[i][i] = 0.5 * Z[i]^2.4
/// M[i][j] = Z[i] * Z[j] / D[i][j]    (i != j)
/// ```
///
/// and the configured [`Permutation`] turns it into a feature vector whose
/// length depends only on the configuration.
#[derive(Debug, Clone)]
pub struct CoulombMatrix {
    config: CoulombMatrixConfig,
}

impl CoulombMatrix {
    pub fn new(config: CoulombMatrixConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CoulombMatrixConfig {
        &self.config
    }

    /// Builds the N×N interaction matrix of `structure`.
    ///
    /// Two atoms at the same position give an infinite off-diagonal entry.
    /// The value is kept as is and a warning is logged so that callers can
    /// detect the degenerate geometry downstream.
    pub fn interaction_matrix(structure: &Structure) -> DMatrix<f64> {
        let n = structure.len();
        let z = structure.atomic_numbers();
        let distances = distance_matrix(structure.positions());

        for i in 0..n {
            for j in (i + 1)..n {
                if distances[(i, j)] == 0.0 {
                    warn!(
                        atom_a = i,
                        atom_b = j,
                        "Coincident atoms give a non-finite Coulomb matrix entry."
                    );
                }
            }
        }

        DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                0.5 * (z[i] as f64).powf(SELF_INTERACTION_EXPONENT)
            } else {
                (z[i] as f64) * (z[j] as f64) / distances[(i, j)]
            }
        })
    }

    /// Reshapes a flattened matrix feature vector back into an
    /// `n_atoms_max × n_atoms_max` matrix.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::NotAMatrix`] for eigenspectrum output and
    /// [`DescriptorError::InvalidFeatureLength`] if `features` has the wrong length.
    pub fn unflatten(&self, features: &[f64]) -> Result<DMatrix<f64>, DescriptorError> {
        if self.config.permutation() == Permutation::Eigenspectrum {
            return Err(DescriptorError::NotAMatrix(self.config.permutation().as_str()));
        }
        let expected = self.number_of_features();
        if features.len() != expected {
            return Err(DescriptorError::InvalidFeatureLength {
                expected,
                found: features.len(),
            });
        }
        let n = self.config.n_atoms_max();
        Ok(DMatrix::from_row_slice(n, n, features))
    }

    fn check_size(&self, structure: &Structure) -> Result<(), ConfigError> {
        if structure.len() > self.config.n_atoms_max() {
            return Err(ConfigError::TooManyAtoms {
                n_atoms: structure.len(),
                n_atoms_max: self.config.n_atoms_max(),
            });
        }
        Ok(())
    }

    fn reorder(&self, matrix: DMatrix<f64>) -> Result<DMatrix<f64>, ConfigError> {
        match self.config.permutation() {
            Permutation::None | Permutation::Eigenspectrum => Ok(matrix),
            Permutation::SortedL2 => {
                let order = permutation::sorted_l2_order(&matrix);
                Ok(permutation::apply_order(&matrix, &order))
            }
            Permutation::Random => {
                let sigma = self
                    .config
                    .sigma()
                    .ok_or(ConfigError::MissingParameter("sigma"))?;
                let order = permutation::random_order(&matrix, sigma, self.config.seed())?;
                Ok(permutation::apply_order(&matrix, &order))
            }
        }
    }
}

impl Descriptor for CoulombMatrix {
    fn number_of_features(&self) -> usize {
        self.config.number_of_features()
    }

    #[instrument(level = "trace", skip_all, fields(n_atoms = structure.len(), permutation = %self.config.permutation()))]
    fn create(&self, structure: &Structure) -> Result<Vec<f64>, DescriptorError> {
        self.check_size(structure)?;

        let matrix = Self::interaction_matrix(structure);
        let mut features = vec![0.0; self.number_of_features()];

        if self.config.permutation() == Permutation::Eigenspectrum {
            let eigenvalues = permutation::eigenspectrum(&matrix);
            features[..eigenvalues.len()].copy_from_slice(&eigenvalues);
            return Ok(features);
        }

        let n = structure.len();
        let stride = self.config.n_atoms_max();
        let matrix = self.reorder(matrix)?;
        for i in 0..n {
            for j in 0..n {
                features[i * stride + j] = matrix[(i, j)];
            }
        }
        Ok(features)
    }
}
