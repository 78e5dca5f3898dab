use atomdesc::descriptors::config::Permutation;

pub struct DefaultsConfig {
    pub permutation: Permutation,
    pub seed: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            permutation: Permutation::SortedL2,
            seed: 0,
        }
    }
}
