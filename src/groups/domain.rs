// Domain filter: pick the emission-reduction subset out of the grouped records.
//
// Two independent selections feed the activity export:
//   A. records whose group is on the allow-list
//   B. records of one source group whose text matches a keyword rule
// The result is A followed by B. Neither selection touches its input; both
// return fresh records.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::records::DocumentRecord;

/// Method recorded for source-group documents that miss every keyword.
pub const NOT_APPLICABLE: &str = "N/A";

/// How to treat a record that lands in both selections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnionPolicy {
    /// Keep both copies (plain concatenation)
    #[default]
    KeepAll,
    /// Keep only the first copy of each document id
    Dedupe,
}

/// Keyword override that promotes part of one group into the activity set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReclassifyRule {
    /// Group whose documents are inspected
    pub source_group: String,
    /// Substrings matched case-insensitively against the document text
    pub keywords: Vec<String>,
    /// Method label for documents matching any keyword
    pub method: String,
}

impl ReclassifyRule {
    /// Method for a document's text: the rule's method when any keyword
    /// occurs in it, `N/A` otherwise.
    pub fn detect_method(&self, text: &str) -> &str {
        let lowered = text.to_lowercase();
        let hit = self
            .keywords
            .iter()
            .any(|keyword| lowered.contains(&keyword.to_lowercase()));
        if hit {
            &self.method
        } else {
            NOT_APPLICABLE
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.detect_method(text) != NOT_APPLICABLE
    }
}

/// Allow-list plus optional keyword rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainFilter {
    pub allow_list: Vec<String>,
    #[serde(default)]
    pub reclassify: Option<ReclassifyRule>,
    #[serde(default)]
    pub union: UnionPolicy,
}

impl DomainFilter {
    pub fn is_allowed(&self, group: &str) -> bool {
        self.allow_list.iter().any(|label| label == group)
    }

    /// Selection A: records whose group is on the allow-list, in input order.
    pub fn select_activities(&self, records: &[DocumentRecord]) -> Vec<DocumentRecord> {
        records
            .iter()
            .filter(|r| self.is_allowed(&r.group))
            .cloned()
            .collect()
    }

    /// Selection B: source-group records whose text matches the keyword rule.
    /// Empty when no rule is configured.
    pub fn select_reclassified(&self, records: &[DocumentRecord]) -> Vec<DocumentRecord> {
        let Some(rule) = &self.reclassify else {
            return Vec::new();
        };

        let candidates: Vec<&DocumentRecord> = records
            .iter()
            .filter(|r| r.group == rule.source_group)
            .collect();
        let selected: Vec<DocumentRecord> = candidates
            .iter()
            .filter(|r| rule.matches(&r.text))
            .map(|r| (*r).clone())
            .collect();

        debug!(
            source_group = %rule.source_group,
            inspected = candidates.len(),
            matched = selected.len(),
            method = %rule.method,
            "Applied keyword reclassification"
        );
        selected
    }

    /// Concatenate A and B according to the union policy.
    pub fn combine(
        &self,
        activities: Vec<DocumentRecord>,
        reclassified: Vec<DocumentRecord>,
    ) -> Vec<DocumentRecord> {
        let ids: HashSet<usize> = activities.iter().map(|r| r.doc_id).collect();
        let overlap = reclassified
            .iter()
            .filter(|r| ids.contains(&r.doc_id))
            .count();

        let mut combined = activities;
        match self.union {
            UnionPolicy::KeepAll => {
                if overlap > 0 {
                    warn!(
                        duplicates = overlap,
                        "Records matched both the allow-list and the keyword rule; keeping both copies"
                    );
                }
                combined.extend(reclassified);
            }
            UnionPolicy::Dedupe => {
                combined.extend(
                    reclassified
                        .into_iter()
                        .filter(|r| !ids.contains(&r.doc_id)),
                );
            }
        }
        combined
    }

    /// Selections A and B, combined.
    pub fn apply(&self, records: &[DocumentRecord]) -> Vec<DocumentRecord> {
        self.combine(
            self.select_activities(records),
            self.select_reclassified(records),
        )
    }
}
