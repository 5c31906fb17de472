use std::path::Path;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Serialize, Deserialize};
use tracing::info;

use crate::allocation::DEFAULT_BLOCKS;
use crate::error::{AllocationError, Error, Result};

/// Run settings
///
/// Loaded from an optional TOML file; fields missing from the file keep their
/// defaults. CLI flags are applied on top with [`Settings::with_overrides`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How many of the most popular stations enter the candidate pool
    pub station_count: usize,
    /// Seats per station per block
    pub capacity: usize,
    pub blocks: u32,
    /// Fixed seed for reproducible runs; entropy when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            station_count: 8,
            capacity: 10,
            blocks: DEFAULT_BLOCKS,
            seed: None,
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub station_count: Option<usize>,
    pub capacity: Option<usize>,
    pub blocks: Option<u32>,
    pub seed: Option<u64>,
}

impl Settings {
    /// Reads settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        let settings: Settings = toml::from_str(&content)?;
        info!("Settings loaded from {}", path.display());
        Ok(settings)
    }

    /// Defaults, or the file at `path` when one is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Self {
        if let Some(station_count) = overrides.station_count {
            self.station_count = station_count;
        }
        if let Some(capacity) = overrides.capacity {
            self.capacity = capacity;
        }
        if let Some(blocks) = overrides.blocks {
            self.blocks = blocks;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        self
    }

    /// Rejects values that would make every run fail
    pub fn validate(&self) -> std::result::Result<(), AllocationError> {
        if self.station_count < 1 {
            return Err(AllocationError::InvalidStationCount(self.station_count));
        }
        if self.capacity < 1 {
            return Err(AllocationError::InvalidCapacity(self.capacity));
        }
        if self.blocks < 1 {
            return Err(AllocationError::InvalidBlockCount(self.blocks));
        }
        Ok(())
    }

    /// Random source for the per-block processing order
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
