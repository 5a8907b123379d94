// Topic groups: curated categories over topic ids, and the domain filter
// that picks the emission-reduction subset out of them.

pub mod defaults;
pub mod domain;
pub mod table;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use domain::DomainFilter;
use table::GroupTable;

/// Everything the grouping and filtering stages need, loadable from JSON so
/// the curated table can be audited and edited apart from the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub table: GroupTable,
    pub domain: DomainFilter,
}

impl Default for GroupConfig {
    fn default() -> Self {
        defaults::emission_groups()
    }
}

impl GroupConfig {
    /// Load and validate a group configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read group configuration {}", path.display()))?;
        let config: GroupConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse group configuration {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid group configuration {}", path.display()))?;

        info!(
            path = %path.display(),
            groups = config.table.groups.len(),
            allow_listed = config.domain.allow_list.len(),
            "Loaded group configuration"
        );
        Ok(config)
    }

    /// Load from `path` when given, otherwise use the built-in emission table.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Write the configuration as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write group configuration {}", path.display()))
    }

    /// Check the table, and that every label the filter refers to is one the
    /// table can actually produce. A misspelled label would otherwise silently
    /// drop a whole group from the export.
    pub fn validate(&self) -> Result<()> {
        self.table.validate()?;

        for label in &self.domain.allow_list {
            if !self.table.produces(label) {
                anyhow::bail!("Allow-listed group '{label}' is not in the group table");
            }
        }
        if let Some(rule) = &self.domain.reclassify {
            if !self.table.produces(&rule.source_group) {
                anyhow::bail!(
                    "Reclassification source group '{}' is not in the group table",
                    rule.source_group
                );
            }
            if rule.keywords.is_empty() {
                anyhow::bail!("Reclassification rule for '{}' has no keywords", rule.source_group);
            }
            // A blank keyword is a substring of every text
            if rule.keywords.iter().any(|k| k.trim().is_empty()) {
                anyhow::bail!(
                    "Reclassification rule for '{}' has a blank keyword",
                    rule.source_group
                );
            }
        }

        for (topic, labels) in self.table.overlaps() {
            warn!(
                topic,
                first = labels[0],
                claimants = labels.len(),
                "Topic id claimed by several groups; first match wins"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        GroupConfig::default().validate().unwrap();
    }

    #[test]
    fn unknown_allow_list_label_is_rejected() {
        let mut config = GroupConfig::default();
        config.domain.allow_list.push("Recyclng".to_string());
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("Recyclng"), "{err}");
    }

    #[test]
    fn unknown_source_group_is_rejected() {
        let mut config = GroupConfig::default();
        if let Some(rule) = config.domain.reclassify.as_mut() {
            rule.source_group = "SBTi".to_string();
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_keyword_is_rejected() {
        let mut config = GroupConfig::default();
        if let Some(rule) = config.domain.reclassify.as_mut() {
            rule.keywords = vec!["decarbonization".to_string(), " ".to_string()];
        }
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("blank keyword"), "{err}");
    }

    #[test]
    fn empty_keyword_list_is_rejected() {
        let mut config = GroupConfig::default();
        if let Some(rule) = config.domain.reclassify.as_mut() {
            rule.keywords.clear();
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn save_then_load_gives_same_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");
        let config = GroupConfig::default();
        config.save(&path).unwrap();
        assert_eq!(GroupConfig::load(&path).unwrap(), config);
    }
}
