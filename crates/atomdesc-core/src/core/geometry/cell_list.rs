use super::distances::distance_squared;
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, instrument};

/// Padding applied to each face of the bounding box so that atoms lying exactly
/// on a face are never binned out of range by rounding.
const BOUNDARY_PADDING: f64 = 1e-4;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum CellListError {
    #[error("Invalid cutoff {0}: a cutoff must be zero, positive, or infinite")]
    InvalidCutoff(f64),
    #[error("Cell list was built with a zero cutoff and holds no neighbor index")]
    NotIndexed,
    #[error("Atom index {index} is out of bounds for a structure of {len} atoms")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Neighbor-search radius, distinguishing the two special values from a
/// regular finite radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cutoff {
    /// No index is built. Every query fails with [`CellListError::NotIndexed`].
    Disabled,
    /// A finite, strictly positive radius in Angstroms.
    Finite(f64),
    /// Every atom is a neighbor of every other atom.
    Infinite,
}

impl Cutoff {
    pub fn radius(&self) -> f64 {
        match self {
            Cutoff::Disabled => 0.0,
            Cutoff::Finite(r) => *r,
            Cutoff::Infinite => f64::INFINITY,
        }
    }
}

impl TryFrom<f64> for Cutoff {
    type Error = CellListError;

    fn try_from(radius: f64) -> Result<Self, Self::Error> {
        if radius == 0.0 {
            Ok(Cutoff::Disabled)
        } else if radius == f64::INFINITY {
            Ok(Cutoff::Infinite)
        } else if radius.is_finite() && radius > 0.0 {
            Ok(Cutoff::Finite(radius))
        } else {
            Err(CellListError::InvalidCutoff(radius))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub distance: f64,
    pub distance_squared: f64,
}

impl Neighbor {
    #[inline]
    fn from_squared(distance_squared: f64) -> Self {
        Self {
            distance: distance_squared.sqrt(),
            distance_squared,
        }
    }
}

/// Neighbors keyed by atom index. Iteration order carries no meaning.
pub type NeighborMap = HashMap<usize, Neighbor>;

/// Upper bound on the bin count along one axis. Past it bins simply grow wider
/// than the cutoff, which keeps the 27-bin search exact.
const MAX_BINS_PER_AXIS: usize = 1 << 20;

/// Uniform grid of bins, each at least one cutoff wide on every axis.
///
/// Only occupied bins are stored, so memory is O(N) however fine the grid is.
#[derive(Debug, Clone)]
struct Grid {
    origin: Point3<f64>,
    bin_size: Vector3<f64>,
    shape: [usize; 3],
    bins: HashMap<[usize; 3], Vec<usize>>,
    cutoff_squared: f64,
}

impl Grid {
    fn build(positions: &[Point3<f64>], cutoff: f64) -> Self {
        let (mut lower, mut upper) = match positions.first() {
            Some(first) => (*first, *first),
            None => (Point3::origin(), Point3::origin()),
        };
        for p in positions {
            for axis in 0..3 {
                lower[axis] = lower[axis].min(p[axis]);
                upper[axis] = upper[axis].max(p[axis]);
            }
        }
        let padding = Vector3::repeat(BOUNDARY_PADDING);
        lower -= padding;
        upper += padding;

        let mut shape = [1usize; 3];
        let mut bin_size = Vector3::zeros();
        for axis in 0..3 {
            let extent = upper[axis] - lower[axis];
            shape[axis] = ((extent / cutoff).floor() as usize).clamp(1, MAX_BINS_PER_AXIS);
            bin_size[axis] = cutoff.max(extent / shape[axis] as f64);
        }

        let mut grid = Self {
            origin: lower,
            bin_size,
            shape,
            bins: HashMap::new(),
            cutoff_squared: cutoff * cutoff,
        };

        for (idx, p) in positions.iter().enumerate() {
            let mut bin = [0usize; 3];
            for (axis, slot) in bin.iter_mut().enumerate() {
                let coord = grid.axis_coordinate(p[axis], axis);
                *slot = coord.clamp(0, grid.shape[axis] as i64 - 1) as usize;
            }
            grid.bins.entry(bin).or_default().push(idx);
        }

        grid
    }

    #[inline]
    fn axis_coordinate(&self, value: f64, axis: usize) -> i64 {
        ((value - self.origin[axis]) / self.bin_size[axis]).floor() as i64
    }

    /// Inclusive bin range covering the 3×3×3 block around `point`, clamped to
    /// the grid. `None` when the block lies entirely outside the grid.
    fn neighborhood(&self, point: &Point3<f64>) -> Option<[(usize, usize); 3]> {
        let mut ranges = [(0usize, 0usize); 3];
        for (axis, range) in ranges.iter_mut().enumerate() {
            let center = self.axis_coordinate(point[axis], axis);
            let start = center.saturating_sub(1).max(0);
            let end = center.saturating_add(1).min(self.shape[axis] as i64 - 1);
            if start > end {
                return None;
            }
            *range = (start as usize, end as usize);
        }
        Some(ranges)
    }

    fn query(&self, positions: &[Point3<f64>], point: &Point3<f64>) -> NeighborMap {
        let mut result = NeighborMap::new();
        let Some([(i0, i1), (j0, j1), (k0, k1)]) = self.neighborhood(point) else {
            return result;
        };

        for i in i0..=i1 {
            for j in j0..=j1 {
                for k in k0..=k1 {
                    let Some(bin) = self.bins.get(&[i, j, k]) else {
                        continue;
                    };
                    for &idx in bin {
                        let d2 = distance_squared(point, &positions[idx]);
                        if d2 <= self.cutoff_squared {
                            result.insert(idx, Neighbor::from_squared(d2));
                        }
                    }
                }
            }
        }
        result
    }
}

#[derive(Debug, Clone)]
enum NeighborIndex {
    None,
    Grid(Grid),
    Dense(Vec<NeighborMap>),
}

/// A spatial index over the atoms of one structure.
///
/// Built once per structure and queried many times. With a finite cutoff the
/// atoms are binned on a uniform grid whose bins are never narrower than the
/// cutoff, so a query only has to inspect the 27 bins around the query point.
/// With an infinite cutoff all pairwise distances are computed up front.
#[derive(Debug, Clone)]
pub struct CellList<'a> {
    positions: &'a [Point3<f64>],
    cutoff: Cutoff,
    index: NeighborIndex,
}

impl<'a> CellList<'a> {
    /// Builds the index for `positions`.
    ///
    /// # Arguments
    ///
    /// * `positions` - Atom coordinates; the cell list borrows them for its lifetime.
    /// * `cutoff` - Search radius. [`Cutoff::Disabled`] builds nothing.
    ///
    /// # Return
    ///
    /// The constructed cell list. Construction is O(N) for a finite cutoff and
    /// O(N²) for an infinite one.
    #[instrument(level = "trace", skip(positions), fields(n_atoms = positions.len()))]
    pub fn new(positions: &'a [Point3<f64>], cutoff: Cutoff) -> Self {
        let index = match cutoff {
            Cutoff::Disabled => NeighborIndex::None,
            Cutoff::Finite(radius) => {
                let grid = Grid::build(positions, radius);
                debug!(
                    shape = ?grid.shape,
                    bin_size = ?grid.bin_size.as_slice(),
                    "Built cell list grid."
                );
                NeighborIndex::Grid(grid)
            }
            Cutoff::Infinite => NeighborIndex::Dense(Self::all_pairs(positions)),
        };
        Self {
            positions,
            cutoff,
            index,
        }
    }

    fn all_pairs(positions: &[Point3<f64>]) -> Vec<NeighborMap> {
        let n = positions.len();
        let mut rows = vec![NeighborMap::with_capacity(n.saturating_sub(1)); n];
        for i in 0..n {
            for j in (i + 1)..n {
                let neighbor = Neighbor::from_squared(distance_squared(&positions[i], &positions[j]));
                rows[i].insert(j, neighbor);
                rows[j].insert(i, neighbor);
            }
        }
        rows
    }

    pub fn cutoff(&self) -> Cutoff {
        self.cutoff
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Bin counts along x, y and z. Only a finite-cutoff list has a grid.
    pub fn grid_shape(&self) -> Option<[usize; 3]> {
        match &self.index {
            NeighborIndex::Grid(grid) => Some(grid.shape),
            _ => None,
        }
    }

    /// Returns every atom within the cutoff of `point`, including an atom
    /// sitting exactly at `point`.
    ///
    /// # Errors
    ///
    /// Returns [`CellListError::NotIndexed`] if the list was built with
    /// [`Cutoff::Disabled`].
    pub fn neighbours_for_position(&self, point: &Point3<f64>) -> Result<NeighborMap, CellListError> {
        match &self.index {
            NeighborIndex::None => Err(CellListError::NotIndexed),
            NeighborIndex::Grid(grid) => Ok(grid.query(self.positions, point)),
            NeighborIndex::Dense(_) => Ok(self
                .positions
                .iter()
                .enumerate()
                .map(|(idx, p)| (idx, Neighbor::from_squared(distance_squared(point, p))))
                .collect()),
        }
    }

    /// Returns every atom within the cutoff of atom `idx`, excluding `idx` itself.
    ///
    /// # Errors
    ///
    /// Returns [`CellListError::NotIndexed`] for a disabled list and
    /// [`CellListError::IndexOutOfBounds`] if `idx` does not name an atom.
    pub fn neighbours_for_index(&self, idx: usize) -> Result<NeighborMap, CellListError> {
        if idx >= self.positions.len() {
            return Err(CellListError::IndexOutOfBounds {
                index: idx,
                len: self.positions.len(),
            });
        }
        match &self.index {
            NeighborIndex::None => Err(CellListError::NotIndexed),
            NeighborIndex::Dense(rows) => Ok(rows[idx].clone()),
            NeighborIndex::Grid(grid) => {
                let mut result = grid.query(self.positions, &self.positions[idx]);
                result.remove(&idx);
                Ok(result)
            }
        }
    }
}
