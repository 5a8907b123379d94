// Topic assignment: query the model for every document in the corpus.
//
// The corpus order is the id range handed to the model, so the number of
// loaded documents has to equal the number the model indexed. Any mismatch
// would shift assignments onto the wrong text, so it aborts the run instead.

use anyhow::Result;
use tracing::info;

use super::traits::TopicModel;
use crate::corpus::Corpus;
use crate::output::truncate_chars;

/// Topic assignment for one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub topic_num: i64,
    pub topic_score: f64,
}

/// Check that the corpus and the model describe the same document id space.
///
/// `expected_documents` is the configured corpus size, when one is set.
pub fn validate_alignment(
    corpus: &Corpus,
    model: &dyn TopicModel,
    expected_documents: Option<usize>,
) -> Result<()> {
    let loaded = corpus.len();

    if let Some(expected) = expected_documents {
        if loaded != expected {
            anyhow::bail!(
                "Loaded {loaded} distinct documents but {expected} were expected \
                 (TOPIC_GROUPS_EXPECTED_DOCS)"
            );
        }
    }

    let indexed = model.document_count();
    if loaded != indexed {
        anyhow::bail!(
            "Loaded {loaded} distinct documents but model '{}' indexes {indexed}; \
             topic ids would not line up with document text",
            model.name()
        );
    }

    if let Some(stored) = model.documents() {
        let mismatch = corpus
            .documents()
            .iter()
            .zip(stored)
            .position(|(ours, theirs)| ours != theirs);
        if let Some(id) = mismatch {
            anyhow::bail!(
                "Document {id} differs between corpus and model '{}': \"{}\" vs \"{}\"",
                model.name(),
                truncate_chars(&corpus.documents()[id], 60),
                truncate_chars(&stored[id], 60)
            );
        }
    }

    Ok(())
}

/// Validate the id space, then fetch one assignment per corpus document,
/// in corpus order.
pub fn assign_topics(
    corpus: &Corpus,
    model: &dyn TopicModel,
    expected_documents: Option<usize>,
) -> Result<Vec<Assignment>> {
    validate_alignment(corpus, model, expected_documents)?;

    let doc_ids: Vec<usize> = corpus.doc_ids().collect();
    let topics = model.documents_topics(&doc_ids)?;
    if topics.len() != doc_ids.len() || topics.topic_scores.len() != doc_ids.len() {
        anyhow::bail!(
            "Model '{}' answered {} ids / {} scores for {} documents",
            model.name(),
            topics.len(),
            topics.topic_scores.len(),
            doc_ids.len()
        );
    }

    info!(
        model = model.name(),
        documents = doc_ids.len(),
        "Assigned topics"
    );

    Ok(topics
        .topic_nums
        .into_iter()
        .zip(topics.topic_scores)
        .map(|(topic_num, topic_score)| Assignment {
            topic_num,
            topic_score,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topics::traits::DocumentTopics;

    /// Model that answers with fixed topics and optionally stored documents.
    struct FakeModel {
        topics: Vec<i64>,
        documents: Option<Vec<String>>,
        truncate_answers: bool,
    }

    impl TopicModel for FakeModel {
        fn name(&self) -> &str {
            "fake"
        }

        fn document_count(&self) -> usize {
            self.topics.len()
        }

        fn documents(&self) -> Option<&[String]> {
            self.documents.as_deref()
        }

        fn documents_topics(&self, doc_ids: &[usize]) -> Result<DocumentTopics> {
            let mut ids = doc_ids.to_vec();
            if self.truncate_answers {
                ids.pop();
            }
            Ok(DocumentTopics {
                topic_nums: ids.iter().map(|&i| self.topics[i]).collect(),
                topic_scores: ids.iter().map(|&i| i as f64 / 10.0).collect(),
            })
        }
    }

    fn fake(topics: &[i64]) -> FakeModel {
        FakeModel {
            topics: topics.to_vec(),
            documents: None,
            truncate_answers: false,
        }
    }

    #[test]
    fn assignments_follow_corpus_order() {
        let corpus = Corpus::from_texts(["a", "b", "c"]);
        let assignments = assign_topics(&corpus, &fake(&[7, 13, 99]), None).unwrap();
        let topics: Vec<i64> = assignments.iter().map(|a| a.topic_num).collect();
        assert_eq!(topics, vec![7, 13, 99]);
        assert!((assignments[2].topic_score - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn count_mismatch_with_model_is_fatal() {
        let corpus = Corpus::from_texts(["a", "b"]);
        let err = assign_topics(&corpus, &fake(&[1, 2, 3]), None)
            .unwrap_err()
            .to_string();
        assert!(err.contains("indexes 3"), "{err}");
    }

    #[test]
    fn count_mismatch_with_expected_is_fatal() {
        let corpus = Corpus::from_texts(["a", "b"]);
        let err = assign_topics(&corpus, &fake(&[1, 2]), Some(6712))
            .unwrap_err()
            .to_string();
        assert!(err.contains("6712"), "{err}");
    }

    #[test]
    fn stored_document_mismatch_is_fatal() {
        let corpus = Corpus::from_texts(["a", "b"]);
        let mut model = fake(&[1, 2]);
        model.documents = Some(vec!["a".to_string(), "z".to_string()]);
        let err = assign_topics(&corpus, &model, None).unwrap_err().to_string();
        assert!(err.starts_with("Document 1 differs"), "{err}");
    }

    #[test]
    fn short_model_answer_is_fatal() {
        let corpus = Corpus::from_texts(["a", "b"]);
        let mut model = fake(&[1, 2]);
        model.truncate_answers = true;
        assert!(assign_topics(&corpus, &model, None).is_err());
    }

    #[test]
    fn empty_corpus_against_empty_model_is_fine() {
        let corpus = Corpus::default();
        assert!(assign_topics(&corpus, &fake(&[]), None).unwrap().is_empty());
        assert!(fake(&[]).documents_topics(&[]).unwrap().is_empty());
    }
}
