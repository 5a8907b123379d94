// Ordered topic-id → group lookup.
//
// A table is a list of (label, topic ids) rules evaluated top to bottom.
// The first rule whose id set contains the topic wins; topics no rule
// claims get the default label.

use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Label assigned to topics that no group claims.
pub const DEFAULT_LABEL: &str = "None";

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

/// One row of the group table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRule {
    pub label: String,
    /// Topic ids in the order they were curated
    pub topics: Vec<i64>,
}

impl GroupRule {
    pub fn contains(&self, topic_num: i64) -> bool {
        self.topics.contains(&topic_num)
    }
}

/// Ordered set of group rules plus the fallback label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTable {
    #[serde(default = "default_label")]
    pub default_label: String,
    pub groups: Vec<GroupRule>,
}

impl GroupTable {
    /// Label of the first group containing `topic_num`, or the default label.
    pub fn label_for(&self, topic_num: i64) -> &str {
        self.groups
            .iter()
            .find(|rule| rule.contains(topic_num))
            .map(|rule| rule.label.as_str())
            .unwrap_or(&self.default_label)
    }

    /// Group labels in evaluation order (the default label is not included).
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|rule| rule.label.as_str())
    }

    /// Whether `label` can be produced by this table, default label included.
    pub fn produces(&self, label: &str) -> bool {
        label == self.default_label || self.labels().any(|l| l == label)
    }

    /// Topic ids claimed by more than one group, with the claiming labels in
    /// evaluation order. Only the first of those labels is ever assigned.
    pub fn overlaps(&self) -> Vec<(i64, Vec<&str>)> {
        let mut claims: BTreeMap<i64, Vec<&str>> = BTreeMap::new();
        for rule in &self.groups {
            let mut seen = HashSet::new();
            for &topic in &rule.topics {
                if seen.insert(topic) {
                    claims.entry(topic).or_default().push(rule.label.as_str());
                }
            }
        }
        claims
            .into_iter()
            .filter(|(_, labels)| labels.len() > 1)
            .collect()
    }

    /// Every topic id some group claims, ascending.
    pub fn covered_topics(&self) -> Vec<i64> {
        let mut topics: Vec<i64> = self
            .groups
            .iter()
            .flat_map(|rule| rule.topics.iter().copied())
            .collect();
        topics.sort_unstable();
        topics.dedup();
        topics
    }

    /// Reject tables that cannot be audited unambiguously: no groups,
    /// blank labels, or the same label on two rows.
    pub fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            anyhow::bail!("Group table has no groups");
        }
        if self.default_label.trim().is_empty() {
            anyhow::bail!("Group table default label is blank");
        }

        let mut seen = HashSet::new();
        for (i, rule) in self.groups.iter().enumerate() {
            if rule.label.trim().is_empty() {
                anyhow::bail!("Group #{} has a blank label", i + 1);
            }
            if rule.label == self.default_label {
                anyhow::bail!(
                    "Group #{} uses the default label '{}'",
                    i + 1,
                    self.default_label
                );
            }
            if rule.topics.is_empty() {
                anyhow::bail!("Group '{}' lists no topic ids", rule.label);
            }
            if !seen.insert(rule.label.as_str()) {
                anyhow::bail!("Group label '{}' appears more than once", rule.label);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(groups: &[(&str, &[i64])]) -> GroupTable {
        GroupTable {
            default_label: DEFAULT_LABEL.to_string(),
            groups: groups
                .iter()
                .map(|(label, topics)| GroupRule {
                    label: label.to_string(),
                    topics: topics.to_vec(),
                })
                .collect(),
        }
    }

    #[test]
    fn first_matching_group_wins() {
        let t = table(&[("a", &[1, 2]), ("b", &[2, 3])]);
        assert_eq!(t.label_for(2), "a");
        assert_eq!(t.label_for(3), "b");
    }

    #[test]
    fn unmatched_topic_gets_default_label() {
        let t = table(&[("a", &[1])]);
        assert_eq!(t.label_for(-1), DEFAULT_LABEL);
        assert_eq!(t.label_for(99), DEFAULT_LABEL);
    }

    #[test]
    fn overlaps_report_every_claimant_in_order() {
        let t = table(&[("a", &[1, 2]), ("b", &[2, 3]), ("c", &[2])]);
        let overlaps = t.overlaps();
        assert_eq!(overlaps, vec![(2, vec!["a", "b", "c"])]);
    }

    #[test]
    fn repeated_id_within_one_group_is_not_an_overlap() {
        let t = table(&[("a", &[4, 4])]);
        assert!(t.overlaps().is_empty());
    }

    #[test]
    fn covered_topics_are_sorted_and_unique() {
        let t = table(&[("a", &[5, 1]), ("b", &[1, 3])]);
        assert_eq!(t.covered_topics(), vec![1, 3, 5]);
    }

    #[test]
    fn validate_rejects_duplicate_labels() {
        let t = table(&[("a", &[1]), ("a", &[2])]);
        let err = t.validate().unwrap_err().to_string();
        assert!(err.contains("more than once"), "{err}");
    }

    #[test]
    fn validate_rejects_default_label_as_group() {
        let t = table(&[(DEFAULT_LABEL, &[1])]);
        assert!(t.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_table() {
        assert!(table(&[]).validate().is_err());
    }

    #[test]
    fn produces_includes_default_label() {
        let t = table(&[("a", &[1])]);
        assert!(t.produces("a"));
        assert!(t.produces(DEFAULT_LABEL));
        assert!(!t.produces("b"));
    }

    #[test]
    fn default_label_is_filled_in_when_missing_from_json() {
        let t: GroupTable =
            serde_json::from_str(r#"{"groups":[{"label":"a","topics":[1]}]}"#).unwrap();
        assert_eq!(t.default_label, DEFAULT_LABEL);
        assert_eq!(t.label_for(1), "a");
    }
}
