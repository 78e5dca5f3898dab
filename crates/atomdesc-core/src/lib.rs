//! # atomdesc Core Library
//!
//! Converts atomic structures into fixed-length feature vectors for machine
//! learning, and provides the spatial neighbor index that local descriptors
//! build on.
//!
//! ## Architectural Philosophy
//!
//! The library is split into two layers:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`), geometric
//!   primitives (dense distance matrices, the `CellList` neighbor index) and
//!   structure file readers.
//!
//! - **[`descriptors`]: The Public API.** Descriptor configuration and the
//!   `CoulombMatrix` descriptor with its permutation-invariance strategies.
//!
//! All computation is synchronous and single-threaded per call. Nothing is
//! cached between calls, so independent structures may be processed in parallel
//! by the caller.

pub mod core;
pub mod descriptors;
