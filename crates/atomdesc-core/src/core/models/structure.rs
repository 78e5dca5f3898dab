use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StructureError {
    #[error("Structure must contain at least one atom")]
    Empty,
    #[error("Found {positions} positions but {atomic_numbers} atomic numbers")]
    LengthMismatch {
        positions: usize,
        atomic_numbers: usize,
    },
    #[error("Atom {index} has atomic number 0; atomic numbers must be positive")]
    InvalidAtomicNumber { index: usize },
    #[error("Invalid atom ordering: {0}")]
    InvalidOrder(String),
}

/// An immutable atomic structure: N positions index-aligned with N atomic numbers.
///
/// A `Structure` always holds at least one atom, and every atomic number is
/// strictly positive. These guarantees are enforced at construction so that the
/// descriptor and neighbor-search code can rely on them without re-checking.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    positions: Vec<Point3<f64>>,
    atomic_numbers: Vec<u32>,
}

impl Structure {
    /// Creates a new structure after validating its contents.
    ///
    /// # Arguments
    ///
    /// * `positions` - Cartesian coordinates of each atom, in Angstroms.
    /// * `atomic_numbers` - Atomic number of each atom, aligned with `positions`.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError`] if the structure is empty, the two sequences
    /// differ in length, or any atomic number is zero.
    pub fn new(
        positions: Vec<Point3<f64>>,
        atomic_numbers: Vec<u32>,
    ) -> Result<Self, StructureError> {
        if positions.len() != atomic_numbers.len() {
            return Err(StructureError::LengthMismatch {
                positions: positions.len(),
                atomic_numbers: atomic_numbers.len(),
            });
        }
        if positions.is_empty() {
            return Err(StructureError::Empty);
        }
        if let Some(index) = atomic_numbers.iter().position(|&z| z == 0) {
            return Err(StructureError::InvalidAtomicNumber { index });
        }
        Ok(Self {
            positions,
            atomic_numbers,
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn atomic_numbers(&self) -> &[u32] {
        &self.atomic_numbers
    }

    /// Returns a copy of this structure with its atoms listed in `order`.
    ///
    /// Atom `k` of the result is atom `order[k]` of `self`. Positions and atomic
    /// numbers are permuted together, so the physical system is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::InvalidOrder`] if `order` is not a permutation
    /// of `0..self.len()`.
    pub fn permuted(&self, order: &[usize]) -> Result<Self, StructureError> {
        let n = self.len();
        if order.len() != n {
            return Err(StructureError::InvalidOrder(format!(
                "expected {} indices, got {}",
                n,
                order.len()
            )));
        }
        let mut seen = vec![false; n];
        for &idx in order {
            if idx >= n || seen[idx] {
                return Err(StructureError::InvalidOrder(format!(
                    "index {} is out of range or repeated",
                    idx
                )));
            }
            seen[idx] = true;
        }

        Ok(Self {
            positions: order.iter().map(|&i| self.positions[i]).collect(),
            atomic_numbers: order.iter().map(|&i| self.atomic_numbers[i]).collect(),
        })
    }
}
