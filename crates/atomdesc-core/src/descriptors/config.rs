use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("n_atoms_max must be a positive integer")]
    InvalidAtomLimit,

    #[error(
        "Unknown permutation '{0}'. Expected one of 'none', 'sorted_l2', 'eigenspectrum', 'random'"
    )]
    UnknownPermutation(String),

    #[error("sigma must be a finite positive number, got {0}")]
    InvalidSigma(f64),

    #[error("Structure has {n_atoms} atoms, which exceeds n_atoms_max = {n_atoms_max}")]
    TooManyAtoms { n_atoms: usize, n_atoms_max: usize },
}

/// Strategy used to make the Coulomb matrix independent of atom ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Permutation {
    /// Keep the input order and flatten the matrix row-major.
    None,
    /// Reorder rows and columns by descending row L2 norm.
    #[default]
    SortedL2,
    /// Replace the matrix by its eigenvalues, sorted by descending magnitude.
    Eigenspectrum,
    /// Like [`Permutation::SortedL2`], with Gaussian noise added to the norms
    /// before sorting.
    Random,
}

impl Permutation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permutation::None => "none",
            Permutation::SortedL2 => "sorted_l2",
            Permutation::Eigenspectrum => "eigenspectrum",
            Permutation::Random => "random",
        }
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permutation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Permutation::None),
            "sorted_l2" => Ok(Permutation::SortedL2),
            "eigenspectrum" => Ok(Permutation::Eigenspectrum),
            "random" => Ok(Permutation::Random),
            _ => Err(ConfigError::UnknownPermutation(s.to_string())),
        }
    }
}

/// Validated settings for the Coulomb matrix descriptor.
///
/// Only [`CoulombMatrixConfigBuilder::build`] creates one, so every instance
/// has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CoulombMatrixConfig {
    n_atoms_max: usize,
    permutation: Permutation,
    sigma: Option<f64>,
    seed: u64,
}

impl CoulombMatrixConfig {
    /// Largest structure the descriptor accepts; fixes the output length.
    pub fn n_atoms_max(&self) -> usize {
        self.n_atoms_max
    }

    pub fn permutation(&self) -> Permutation {
        self.permutation
    }

    /// Standard deviation of the norm noise. Always `Some` for [`Permutation::Random`].
    pub fn sigma(&self) -> Option<f64> {
        self.sigma
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Length of the feature vector, which depends on the configuration only.
    pub fn number_of_features(&self) -> usize {
        match self.permutation {
            Permutation::Eigenspectrum => self.n_atoms_max,
            _ => self.n_atoms_max * self.n_atoms_max,
        }
    }
}

#[derive(Default)]
pub struct CoulombMatrixConfigBuilder {
    n_atoms_max: Option<usize>,
    permutation: Option<Permutation>,
    sigma: Option<f64>,
    seed: Option<u64>,
}

impl CoulombMatrixConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_atoms_max(mut self, n: usize) -> Self {
        self.n_atoms_max = Some(n);
        self
    }
    pub fn permutation(mut self, permutation: Permutation) -> Self {
        self.permutation = Some(permutation);
        self
    }
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = Some(sigma);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<CoulombMatrixConfig, ConfigError> {
        let n_atoms_max = self
            .n_atoms_max
            .ok_or(ConfigError::MissingParameter("n_atoms_max"))?;
        if n_atoms_max == 0 {
            return Err(ConfigError::InvalidAtomLimit);
        }

        let permutation = self.permutation.unwrap_or_default();
        if permutation == Permutation::Random {
            let sigma = self.sigma.ok_or(ConfigError::MissingParameter("sigma"))?;
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(ConfigError::InvalidSigma(sigma));
            }
        }

        Ok(CoulombMatrixConfig {
            n_atoms_max,
            permutation,
            sigma: self.sigma,
            seed: self.seed.unwrap_or(0),
        })
    }
}
