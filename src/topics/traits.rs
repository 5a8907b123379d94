// Topic model trait: the query surface the pipeline needs from a trained model.
//
// Training, embedding and clustering happen outside this crate. A model is
// anything that knows how many documents it indexed and which topic each of
// them landed in. The JSON artifact is the default implementation; tests use
// in-memory fakes.

use std::collections::HashMap;

use anyhow::Result;

/// Parallel topic ids and confidence scores for a batch of document ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentTopics {
    pub topic_nums: Vec<i64>,
    pub topic_scores: Vec<f64>,
}

impl DocumentTopics {
    pub fn len(&self) -> usize {
        self.topic_nums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topic_nums.is_empty()
    }
}

/// Read-only view of a trained topic model.
pub trait TopicModel {
    /// Name the model was persisted under.
    fn name(&self) -> &str;

    /// Number of documents in the model's internal index.
    fn document_count(&self) -> usize;

    /// Documents in id order, when the model kept them.
    fn documents(&self) -> Option<&[String]> {
        None
    }

    /// Best-matching topic and its score for each id, in the order given.
    fn documents_topics(&self, doc_ids: &[usize]) -> Result<DocumentTopics>;

    /// Top words of a topic, when the model kept them.
    fn topic_words(&self, _topic_num: i64) -> Option<&[String]> {
        None
    }

    /// Documents per topic, largest first; ties go to the lower topic id.
    fn topic_sizes(&self) -> Result<Vec<(i64, usize)>> {
        let ids: Vec<usize> = (0..self.document_count()).collect();
        let topics = self.documents_topics(&ids)?;

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for &topic in &topics.topic_nums {
            *counts.entry(topic).or_default() += 1;
        }

        let mut sizes: Vec<(i64, usize)> = counts.into_iter().collect();
        sizes.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        Ok(sizes)
    }
}
