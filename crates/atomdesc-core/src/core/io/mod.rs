//! Reading atomic structures from common text formats.
//!
//! Formats implement the [`traits::StructureFile`] trait so that drivers can load
//! structures without depending on a specific file layout.

pub mod traits;
pub mod xyz;
