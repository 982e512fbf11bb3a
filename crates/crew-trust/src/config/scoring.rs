use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ConfigError;
use crate::workflows::competency::{CompetencyConfig, CompetencyDimension};
use crate::workflows::stability::StabilityConfig;

/// Scoring document: competency settings, the sparse stability base map and fleet overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub competency: CompetencyConfig,
    pub stability: Map<String, Value>,
    pub fleet_profiles: BTreeMap<String, FleetProfile>,
}

/// Named override bundle for one operating context (tanker, offshore, river ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetProfile {
    pub dimension_weights: BTreeMap<CompetencyDimension, f64>,
    pub stability: Map<String, Value>,
}

impl ScoringConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ScoringRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::ScoringParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Case-insensitive fleet profile lookup.
    pub fn fleet_profile(&self, fleet_type: &str) -> Option<&FleetProfile> {
        let wanted = fleet_type.trim();
        if wanted.is_empty() {
            return None;
        }
        self.fleet_profiles
            .iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(wanted))
            .map(|(_, profile)| profile)
    }

    /// Resolve a stability snapshot for the given fleet (or the base configuration).
    pub fn stability_config(&self, fleet_type: Option<&str>) -> StabilityConfig {
        let overrides = fleet_type
            .and_then(|fleet| self.fleet_profile(fleet))
            .map(|profile| profile.stability.clone());
        StabilityConfig::layered(
            self.stability.clone(),
            overrides,
            fleet_type.map(|fleet| fleet.trim().to_ascii_lowercase()),
        )
    }

    /// Fleet-calibrated dimension weights, if the fleet profile defines any.
    pub fn calibrated_weights(
        &self,
        fleet_type: Option<&str>,
    ) -> Option<BTreeMap<CompetencyDimension, f64>> {
        fleet_type
            .and_then(|fleet| self.fleet_profile(fleet))
            .map(|profile| profile.dimension_weights.clone())
            .filter(|weights| !weights.is_empty())
    }
}
