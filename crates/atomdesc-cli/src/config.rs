pub mod defaults;

use crate::cli::FeaturizeArgs;
use crate::error::{CliError, Result};
use atomdesc::descriptors::config::{
    CoulombMatrixConfig, CoulombMatrixConfigBuilder, Permutation,
};
use atomdesc::descriptors::error::DescriptorError;
use defaults::DefaultsConfig;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialCoulombMatrixConfig {
    #[serde(rename = "n-atoms-max")]
    n_atoms_max: Option<usize>,
    permutation: Option<String>,
    sigma: Option<f64>,
    seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialFeaturizeConfig {
    #[serde(rename = "coulomb-matrix")]
    coulomb_matrix: Option<PartialCoulombMatrixConfig>,
}

impl PartialFeaturizeConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Resolves the final descriptor configuration.
    ///
    /// Precedence, highest first: `--set` values, dedicated CLI flags, the
    /// config file, built-in defaults. `largest_structure` is the atom limit
    /// used when none is given anywhere.
    pub fn merge_with_cli(
        mut self,
        args: &FeaturizeArgs,
        largest_structure: usize,
    ) -> Result<CoulombMatrixConfig> {
        let defaults = DefaultsConfig::default();
        let file = self.coulomb_matrix.take().unwrap_or_default();
        let mut overrides = PartialCoulombMatrixConfig::default();
        Self::apply_set_values(&mut overrides, &args.set_values)?;

        let permutation = match overrides
            .permutation
            .or_else(|| args.permutation.clone())
            .or(file.permutation)
        {
            Some(name) => name
                .parse::<Permutation>()
                .map_err(DescriptorError::from)?,
            None => defaults.permutation,
        };

        let n_atoms_max = overrides
            .n_atoms_max
            .or(args.n_atoms_max)
            .or(file.n_atoms_max)
            .unwrap_or(largest_structure);
        let seed = overrides
            .seed
            .or(args.seed)
            .or(file.seed)
            .unwrap_or(defaults.seed);

        let mut builder = CoulombMatrixConfigBuilder::new()
            .n_atoms_max(n_atoms_max)
            .permutation(permutation)
            .seed(seed);
        if let Some(sigma) = overrides.sigma.or(args.sigma).or(file.sigma) {
            builder = builder.sigma(sigma);
        }

        debug!(
            n_atoms_max,
            permutation = %permutation,
            seed,
            "Resolved Coulomb matrix configuration."
        );
        Ok(builder.build().map_err(DescriptorError::from)?)
    }

    fn apply_set_values(
        partial: &mut PartialCoulombMatrixConfig,
        set_values: &[String],
    ) -> Result<()> {
        for kv_pair in set_values {
            let parts: Vec<_> = kv_pair.splitn(2, '=').collect();
            if parts.len() != 2 {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            }
            let key = parts[0];
            let value_str = parts[1];

            match key {
                "coulomb-matrix.n-atoms-max" => {
                    partial.n_atoms_max = Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!(
                            "Invalid integer value for {}: {}",
                            key, value_str
                        ))
                    })?);
                }
                "coulomb-matrix.permutation" => {
                    partial.permutation = Some(value_str.to_string());
                }
                "coulomb-matrix.sigma" => {
                    partial.sigma = Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                    })?);
                }
                "coulomb-matrix.seed" => {
                    partial.seed = Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!(
                            "Invalid integer value for {}: {}",
                            key, value_str
                        ))
                    })?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
