pub mod featurize;
pub mod neighbors;
