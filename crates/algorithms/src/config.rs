//! Tunables shared by the regional statistics operations.

use gwstats_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GwsConfig {
    /// Largest kernel half-width (in cells) served by the cached sliding
    /// window; larger kernels recompute every window from the grid.
    pub fast_path_max_cell_distance: usize,

    /// A bivariate window must hold strictly more valid pairs than this.
    pub min_pairs: usize,

    /// Sentinel written to output cells that have no result.
    pub output_nodata: f64,
}

impl Default for GwsConfig {
    fn default() -> Self {
        Self {
            fast_path_max_cell_distance: 1024,
            min_pairs: 20,
            output_nodata: gwstats_core::DEFAULT_NODATA,
        }
    }
}

impl GwsConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GWS_FAST_PATH_MAX_CELL_DISTANCE")
            && let Ok(limit) = val.parse()
        {
            config.fast_path_max_cell_distance = limit;
        }

        if let Ok(val) = std::env::var("GWS_MIN_PAIRS")
            && let Ok(pairs) = val.parse()
        {
            config.min_pairs = pairs;
        }

        if let Ok(val) = std::env::var("GWS_OUTPUT_NODATA")
            && let Ok(nodata) = val.parse()
        {
            config.output_nodata = nodata;
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.output_nodata.is_finite() {
            return Err(Error::invalid(
                "output_nodata",
                self.output_nodata,
                "output sentinel must be finite",
            ));
        }
        Ok(())
    }

    /// Whether a kernel of this half-width uses the cached window
    pub fn use_fast_path(&self, cell_distance: usize) -> bool {
        cell_distance <= self.fast_path_max_cell_distance
    }
}
