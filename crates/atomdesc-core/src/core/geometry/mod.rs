//! Geometric primitives shared by the descriptors: dense pairwise distances and
//! the cell list used for cutoff-based neighbor queries.

pub mod cell_list;
pub mod distances;
