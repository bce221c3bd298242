use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{ElementId, ElementSet, Result, Sequence, SequencerError};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub stage: StageConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Loads a JSON configuration file. Missing sections fall back to their
    /// defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }
}

/// Physical layout of the installation: how many rings there are, how they
/// are grouped, and which segment names the renderer understands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub rings: u32,
    pub groups: BTreeMap<String, Vec<u32>>,
    pub segments: Vec<String>,
}

impl Default for StageConfig {
    fn default() -> Self {
        let groups = [
            ("all", (1..=12).collect::<Vec<u32>>()),
            ("odd", vec![1, 3, 5, 7, 9, 11]),
            ("even", vec![2, 4, 6, 8, 10, 12]),
            ("left", vec![1, 2, 3, 4, 5, 6]),
            ("right", vec![7, 8, 9, 10, 11, 12]),
            ("center", vec![4, 5, 6, 7, 8, 9]),
            ("outer", vec![1, 2, 3, 10, 11, 12]),
        ]
        .into_iter()
        .map(|(name, ids)| (name.to_string(), ids))
        .collect();

        let segments = ["all", "centric", "updown", "arc", "ind", "b1", "b2", "rand"]
            .into_iter()
            .map(String::from)
            .collect();

        Self {
            rings: 12,
            groups,
            segments,
        }
    }
}

impl StageConfig {
    /// Resolves a named group of rings.
    pub fn group(&self, name: &str) -> Result<ElementSet> {
        self.groups
            .get(name)
            .map(|ids| ids.iter().copied().collect())
            .ok_or_else(|| SequencerError::UnknownGroup(name.to_string()))
    }

    pub fn check_element(&self, id: ElementId) -> Result<()> {
        if (1..=self.rings).contains(&id.index()) {
            Ok(())
        } else {
            Err(SequencerError::UnknownElement(id))
        }
    }

    pub fn check_segment(&self, segment: &str) -> Result<()> {
        if self.segments.iter().any(|known| known == segment) {
            Ok(())
        } else {
            Err(SequencerError::UnknownSegment(segment.to_string()))
        }
    }

    /// Verifies that a sequence only addresses rings and segments that exist
    /// on this stage.
    pub fn validate(&self, sequence: &Sequence) -> Result<()> {
        for (id, element) in sequence.iter() {
            self.check_element(id)?;
            for effect in &element.effects {
                self.check_segment(effect.effect_config.segment.as_str())?;
            }
        }
        Ok(())
    }
}

/// Formatting options for produced sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}
