//! # Core Module
//!
//! The stateless building blocks of the library: the structure model, geometric
//! primitives and structure file readers.
//!
//! - **Structure Representation** ([`models`]) - Positions tagged with atomic numbers
//! - **Geometry** ([`geometry`]) - Dense distance matrices and the cell list neighbor index
//! - **File I/O** ([`io`]) - Reading structures from XYZ files
//!
//! Nothing in this module keeps state between calls. A [`geometry::cell_list::CellList`]
//! is built for one structure, queried, and dropped.

pub mod geometry;
pub mod io;
pub mod models;
