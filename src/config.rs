//! YAML recipes for the nuclei a scene starts from.
//!
//! ```yaml
//! nuclei:
//!   - protons: 12
//!     neutrons: 12
//!     seed: 6
//!     params:
//!       nucleon_separation: 1.0
//!       particle_num_difference: 4
//!       nucleon_size_multiplier: 0.6
//!   - protons: 4
//!     neutrons: 3
//!     seed: 1
//!     shuffle: true
//! ```
//!
//! Omitted `params` fall back to [`NucleusParams::default`]; `seed` defaults
//! to 1 and `shuffle` to false.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::core::{Nucleus, NucleusParams};
use crate::error::Result;

fn default_seed() -> u64 {
    1
}

/// One nucleus to build from counts.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct NucleusRecipe {
    pub protons: usize,
    pub neutrons: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub params: NucleusParams,
}

impl NucleusRecipe {
    /// Build the nucleus this recipe describes.
    pub fn build(&self) -> Result<Nucleus> {
        Nucleus::from_counts(
            self.protons,
            self.neutrons,
            self.params,
            self.shuffle,
            self.seed,
        )
    }
}

/// Top-level scene configuration.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub nuclei: Vec<NucleusRecipe>,
}

impl SceneConfig {
    /// Parse and validate a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: SceneConfig = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let cfg: SceneConfig = serde_yaml::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every recipe's parameters.
    pub fn validate(&self) -> Result<()> {
        self.nuclei.iter().try_for_each(|r| r.params.validate())
    }

    /// Build every nucleus in order.
    pub fn build_all(&self) -> Result<Vec<Nucleus>> {
        self.nuclei.iter().map(NucleusRecipe::build).collect()
    }
}
