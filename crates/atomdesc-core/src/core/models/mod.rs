//! # Core Models Module
//!
//! Data structures describing the atomic structures that every other part of
//! the library consumes.
//!
//! ## Key Components
//!
//! - [`structure`] - An immutable set of positions tagged with atomic numbers
//! - [`element`] - Element symbol and atomic number lookups
//!
//! ## Usage
//!
//! ```ignore
//! use atomdesc::core::models::structure::Structure;
//! use nalgebra::Point3;
//!
//! let h2 = Structure::new(
//!     vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.74, 0.0, 0.0)],
//!     vec![1, 1],
//! )?;
//! ```

pub mod element;
pub mod structure;
