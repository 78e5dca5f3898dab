//! # Descriptors Module
//!
//! Turns a [`Structure`] into a fixed-length feature vector for machine learning.
//!
//! - [`config`] - Validated descriptor settings and the permutation strategies
//! - [`coulomb_matrix`] - The Coulomb matrix descriptor
//! - [`permutation`] - Reordering and reduction of the interaction matrix
//! - [`error`] - Errors raised while computing descriptors
//!
//! Every descriptor call is independent: no state survives between calls and
//! any random generator is created from an explicit seed inside the call. A
//! driver may therefore featurize different structures on different threads
//! without coordination.

pub mod config;
pub mod coulomb_matrix;
pub mod error;
pub mod permutation;

use crate::core::models::structure::Structure;
use error::DescriptorError;

/// A global descriptor: one feature vector per structure, whose length is
/// fixed by the descriptor's configuration.
pub trait Descriptor {
    /// Length of every vector returned by [`Descriptor::create`].
    fn number_of_features(&self) -> usize;

    /// Computes the feature vector for `structure`.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] if the structure is incompatible with the
    /// configuration. No partial output is produced on failure.
    fn create(&self, structure: &Structure) -> Result<Vec<f64>, DescriptorError>;
}
