//! Engine version tags.
//!
//! Each simulation is published under a short version tag (`v1`, `v2`, `v3`),
//! a display label, and a URL-style slug. Hosts may refer to an engine by any
//! of the three.

use std::fmt;
use std::str::FromStr;

use canvas_lab_core::EngineError;
use serde::{Deserialize, Serialize};

/// Which simulation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineVersion {
    /// Game of Life.
    #[serde(rename = "v1")]
    Life,
    /// Particle flow field.
    #[serde(rename = "v2")]
    Flow,
    /// Gray-Scott reaction-diffusion.
    #[serde(rename = "v3")]
    Diffusion,
}

impl EngineVersion {
    pub const ALL: [EngineVersion; 3] = [
        EngineVersion::Life,
        EngineVersion::Flow,
        EngineVersion::Diffusion,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            EngineVersion::Life => "v1",
            EngineVersion::Flow => "v2",
            EngineVersion::Diffusion => "v3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EngineVersion::Life => "Life",
            EngineVersion::Flow => "Flow",
            EngineVersion::Diffusion => "Diffusion",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            EngineVersion::Life => "game-of-life",
            EngineVersion::Flow => "flow-field",
            EngineVersion::Diffusion => "reaction-diffusion",
        }
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Accepts a tag, label or slug, ignoring ASCII case.
impl FromStr for EngineVersion {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|v| {
                [v.tag(), v.label(), v.slug()]
                    .iter()
                    .any(|spelling| spelling.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| EngineError::UnknownEngine(s.to_string()))
    }
}
