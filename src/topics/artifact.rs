// Persisted topic model artifact.
//
// The trained model is exported to JSON together with the assignments it
// produced: `topic_nums[i]` and `topic_scores[i]` belong to document id i.
// The export may also carry the documents themselves (in id order) and the
// top words of each topic.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{DocumentTopics, TopicModel};

/// On-disk form of an exported topic model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub topic_nums: Vec<i64>,
    pub topic_scores: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub topic_words: BTreeMap<i64, Vec<String>>,
}

/// Resolve a model given by name or path. A bare name such as
/// `ESGnie_emissions_model_V1` also finds `ESGnie_emissions_model_V1.json`.
pub fn resolve_model_path(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    let mut with_ext = OsString::from(path.as_os_str());
    with_ext.push(".json");
    let with_ext = PathBuf::from(with_ext);
    with_ext.is_file().then_some(with_ext)
}

/// Topic model backed by an exported artifact.
#[derive(Debug, Clone)]
pub struct ArtifactModel {
    artifact: ModelArtifact,
}

impl ArtifactModel {
    /// Load a model artifact by path or name.
    pub fn load(path: &Path) -> Result<Self> {
        let Some(resolved) = resolve_model_path(path) else {
            anyhow::bail!(
                "Topic model not found: {} (also tried {}.json)\n\
                 Export the trained model to JSON or set TOPIC_GROUPS_MODEL.",
                path.display(),
                path.display()
            );
        };

        let raw = fs::read_to_string(&resolved)
            .with_context(|| format!("Failed to read topic model {}", resolved.display()))?;
        let artifact: ModelArtifact = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse topic model {}", resolved.display()))?;
        let model = Self::from_artifact(artifact)
            .with_context(|| format!("Corrupt topic model {}", resolved.display()))?;

        debug!(
            path = %resolved.display(),
            name = %model.artifact.name,
            documents = model.document_count(),
            "Loaded topic model"
        );
        Ok(model)
    }

    /// Wrap an in-memory artifact, checking that its arrays line up.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        let count = artifact.topic_nums.len();
        if artifact.topic_scores.len() != count {
            anyhow::bail!(
                "Model has {} topic ids but {} topic scores",
                count,
                artifact.topic_scores.len()
            );
        }
        if let Some(documents) = &artifact.documents {
            if documents.len() != count {
                anyhow::bail!(
                    "Model has {} topic ids but stores {} documents",
                    count,
                    documents.len()
                );
            }
        }
        Ok(Self { artifact })
    }
}

impl TopicModel for ArtifactModel {
    fn name(&self) -> &str {
        &self.artifact.name
    }

    fn document_count(&self) -> usize {
        self.artifact.topic_nums.len()
    }

    fn documents(&self) -> Option<&[String]> {
        self.artifact.documents.as_deref()
    }

    fn documents_topics(&self, doc_ids: &[usize]) -> Result<DocumentTopics> {
        let count = self.document_count();
        let mut topics = DocumentTopics {
            topic_nums: Vec::with_capacity(doc_ids.len()),
            topic_scores: Vec::with_capacity(doc_ids.len()),
        };
        for &id in doc_ids {
            if id >= count {
                anyhow::bail!(
                    "Document id {id} out of range: model '{}' indexes {count} documents",
                    self.artifact.name
                );
            }
            topics.topic_nums.push(self.artifact.topic_nums[id]);
            topics.topic_scores.push(self.artifact.topic_scores[id]);
        }
        Ok(topics)
    }

    fn topic_words(&self, topic_num: i64) -> Option<&[String]> {
        self.artifact.topic_words.get(&topic_num).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> ModelArtifact {
        ModelArtifact {
            name: "test".to_string(),
            topic_nums: vec![3, 13, 3],
            topic_scores: vec![0.9, 0.4, 0.7],
            documents: None,
            topic_words: BTreeMap::new(),
        }
    }

    #[test]
    fn queries_follow_requested_order() {
        let model = ArtifactModel::from_artifact(artifact()).unwrap();
        let topics = model.documents_topics(&[2, 0]).unwrap();
        assert_eq!(topics.topic_nums, vec![3, 3]);
        assert_eq!(topics.topic_scores, vec![0.7, 0.9]);
    }

    #[test]
    fn out_of_range_id_is_an_error() {
        let model = ArtifactModel::from_artifact(artifact()).unwrap();
        let err = model.documents_topics(&[3]).unwrap_err().to_string();
        assert!(err.contains("out of range"), "{err}");
    }

    #[test]
    fn mismatched_arrays_are_rejected() {
        let mut a = artifact();
        a.topic_scores.pop();
        assert!(ArtifactModel::from_artifact(a).is_err());

        let mut a = artifact();
        a.documents = Some(vec!["only one".to_string()]);
        assert!(ArtifactModel::from_artifact(a).is_err());
    }

    #[test]
    fn topic_sizes_are_sorted_by_size() {
        let model = ArtifactModel::from_artifact(artifact()).unwrap();
        assert_eq!(model.topic_sizes().unwrap(), vec![(3, 2), (13, 1)]);
    }

    #[test]
    fn topic_words_parse_from_string_keys() {
        let json = r#"{
            "name": "m",
            "topic_nums": [0],
            "topic_scores": [0.5],
            "topic_words": {"0": ["sbti", "target"]}
        }"#;
        let a: ModelArtifact = serde_json::from_str(json).unwrap();
        let model = ArtifactModel::from_artifact(a).unwrap();
        assert_eq!(model.topic_words(0).unwrap(), &["sbti", "target"]);
        assert!(model.topic_words(1).is_none());
    }

    #[test]
    fn load_finds_model_by_bare_name() {
        let dir = tempfile::tempdir().unwrap();
        let json = serde_json::to_string(&artifact()).unwrap();
        std::fs::write(dir.path().join("emissions_v1.json"), json).unwrap();

        let model = ArtifactModel::load(&dir.path().join("emissions_v1")).unwrap();
        assert_eq!(model.name(), "test");
        assert_eq!(model.document_count(), 3);
    }

    #[test]
    fn missing_model_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArtifactModel::load(&dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("Topic model not found"));
    }
}
