use super::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum DescriptorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Expected a feature vector of length {expected}, got {found}")]
    InvalidFeatureLength { expected: usize, found: usize },

    #[error("Features produced with '{0}' permutation do not form a matrix")]
    NotAMatrix(&'static str),
}
