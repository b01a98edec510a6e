//! Scenario files
//!
//! A scenario replaces the reference catalog with cases read from YAML:
//!
//! ```yaml
//! name: users round trip
//! target:
//!   port: 9000
//! cases:
//!   - { method: insert, bucket: users, data: { username: hatim }, ttl: 5 }
//!   - { method: get_all }
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::common::config::TargetOverride;
use crate::common::{Error, Result};

use super::{Catalog, RequestDescriptor};

/// A scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct Scenario {
    /// Name of the scenario
    pub name: String,
    /// Optional description of what the scenario exercises
    pub description: Option<String>,
    /// Optional target override
    pub target: Option<ScenarioTarget>,
    /// Requests to send, in order
    pub cases: Vec<serde_json::Value>,
}

/// Host/port a scenario wants to run against
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ScenarioTarget {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl From<&ScenarioTarget> for TargetOverride {
    fn from(target: &ScenarioTarget) -> Self {
        TargetOverride {
            host: target.host.clone(),
            port: target.port,
        }
    }
}

impl Scenario {
    /// Load and parse a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::Scenario(format!("Failed to parse scenario: {}", e)))
    }

    /// Build the catalog, rejecting cases that are not mappings
    pub fn catalog(&self) -> Result<Catalog> {
        let cases = self
            .cases
            .iter()
            .enumerate()
            .map(|(i, case)| {
                RequestDescriptor::try_from(case.clone()).map_err(|e| {
                    Error::Scenario(format!("Case {} of '{}': {}", i + 1, self.name, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Catalog::new(cases))
    }

    /// Target override, empty when the scenario does not set one
    pub fn target_override(&self) -> TargetOverride {
        self.target.as_ref().map(TargetOverride::from).unwrap_or_default()
    }
}
