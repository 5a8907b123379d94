// Colored terminal output for run summaries and the group table.
//
// The main.rs command handlers delegate all formatting here.

use colored::Colorize;

use crate::groups::GroupConfig;
use crate::pipeline::categorize::CategorizeOutcome;
use crate::records::DocumentRecord;

/// Display per-group document counts for a finished run.
pub fn display_run_summary(outcome: &CategorizeOutcome, groups: &GroupConfig) {
    println!(
        "\n{}",
        format!(
            "=== Topic Groups ({} documents) ===",
            outcome.records.len()
        )
        .bold()
    );
    println!();

    println!(
        "  {:>6}  {:<3} {}",
        "Docs".dimmed(),
        "In".dimmed(),
        "Group".dimmed()
    );
    println!("  {}", "-".repeat(78).dimmed());

    for (label, count) in outcome.group_counts(&groups.table) {
        let marker = if groups.domain.is_allowed(&label) {
            "*".green().bold()
        } else if is_reclassify_source(groups, &label) {
            "~".yellow()
        } else {
            " ".normal()
        };
        let line = format!("  {:>6}  {:<3} {}", count, marker, label);
        if count == 0 {
            println!("{}", line.dimmed());
        } else {
            println!("{line}");
        }
    }

    println!();
    println!(
        "  {} allow-listed  {} reclassified  {} exported",
        outcome.allow_listed.to_string().green(),
        outcome.reclassified.to_string().yellow(),
        outcome.activities.len().to_string().bold(),
    );
    println!(
        "  {}",
        "* = allow-listed group, ~ = inspected by the keyword rule".dimmed()
    );
}

/// Display the group table in evaluation order, with the domain filter.
pub fn display_group_table(groups: &GroupConfig) {
    println!(
        "\n{}",
        format!("=== Group Table ({} groups) ===", groups.table.groups.len()).bold()
    );
    println!();

    for (i, rule) in groups.table.groups.iter().enumerate() {
        let label = if groups.domain.is_allowed(&rule.label) {
            rule.label.green().bold()
        } else if is_reclassify_source(groups, &rule.label) {
            rule.label.yellow()
        } else {
            rule.label.normal()
        };
        let topics: Vec<String> = rule.topics.iter().map(|t| t.to_string()).collect();
        println!("  {:>2}. {}", i + 1, label);
        println!("      Topics: {}", topics.join(", ").dimmed());
    }

    println!(
        "\n  Unmatched topics: {}",
        groups.table.default_label.dimmed()
    );

    if let Some(rule) = &groups.domain.reclassify {
        println!(
            "  Keyword rule: '{}' documents containing [{}] become {}",
            rule.source_group,
            rule.keywords.join(", "),
            rule.method.yellow()
        );
    }

    let overlaps = groups.table.overlaps();
    if !overlaps.is_empty() {
        println!("\n  {}", "Overlapping topic ids (first match wins):".yellow());
        for (topic, labels) in overlaps {
            println!("    {:>3}: {}", topic, labels.join(" > "));
        }
    }
}

/// Display topic sizes with the group each topic maps to.
pub fn display_topic_sizes(
    sizes: &[(i64, usize)],
    groups: &GroupConfig,
    words: impl Fn(i64) -> Option<Vec<String>>,
) {
    println!(
        "\n{}",
        format!("=== Topic Sizes ({} topics) ===", sizes.len()).bold()
    );
    println!();

    for (topic, size) in sizes {
        let label = groups.table.label_for(*topic);
        let label = if label == groups.table.default_label {
            label.dimmed()
        } else {
            label.normal()
        };
        println!("  {:>4}  {:>6}  {}", topic, size, label);
        if let Some(words) = words(*topic) {
            let preview: Vec<&str> = words.iter().take(8).map(String::as_str).collect();
            println!("              {}", preview.join(", ").dimmed());
        }
    }
}

/// Display a few example documents, one line each.
pub fn display_samples(title: &str, records: &[DocumentRecord], limit: usize) {
    if records.is_empty() {
        return;
    }
    println!("\n  {}", title.bold());
    for record in records.iter().take(limit) {
        let preview = super::truncate_chars(&record.text, 100);
        println!(
            "    [{:>3} {:.2}] {}",
            record.topic_num,
            record.topic_score,
            preview.dimmed()
        );
    }
}

fn is_reclassify_source(groups: &GroupConfig, label: &str) -> bool {
    groups
        .domain
        .reclassify
        .as_ref()
        .is_some_and(|rule| rule.source_group == label)
}
