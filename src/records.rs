// Record types: the rows that flow through the pipeline and into the exports.

use serde::{Deserialize, Serialize};

/// Column order of both export files.
pub const EXPORT_COLUMNS: [&str; 5] = ["doc_id", "text", "topic_num", "topic_score", "group"];

/// One distinct document with its topic assignment and group label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Position in the corpus, which is also the document's id in the topic model
    pub doc_id: usize,
    pub text: String,
    pub topic_num: i64,
    /// Confidence of the topic assignment as reported by the model
    pub topic_score: f64,
    pub group: String,
}
