// Categorization pipeline.
//
// Strictly forward: corpus → topic assignment → group mapping → domain
// subset → export. Every stage takes the previous stage's output by
// reference and returns new values; nothing is mutated in place. Both files
// are written only once every stage has succeeded.

use std::collections::HashMap;

use anyhow::Result;
use tracing::{debug, info};

use crate::config::Config;
use crate::corpus::Corpus;
use crate::groups::table::GroupTable;
use crate::groups::GroupConfig;
use crate::output::export::{self, ExportPaths};
use crate::records::DocumentRecord;
use crate::topics::artifact::ArtifactModel;
use crate::topics::assign::{assign_topics, Assignment};
use crate::topics::traits::TopicModel;

/// Everything a categorization produces.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizeOutcome {
    /// Every document, in corpus order
    pub records: Vec<DocumentRecord>,
    /// Allow-listed records followed by reclassified ones
    pub activities: Vec<DocumentRecord>,
    /// Size of the allow-list selection
    pub allow_listed: usize,
    /// Size of the keyword-rule selection
    pub reclassified: usize,
}

impl CategorizeOutcome {
    /// Document count per group, in table order, default label last.
    pub fn group_counts(&self, table: &GroupTable) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in &self.records {
            *counts.entry(record.group.as_str()).or_default() += 1;
        }

        table
            .labels()
            .chain(std::iter::once(table.default_label.as_str()))
            .map(|label| (label.to_string(), counts.get(label).copied().unwrap_or(0)))
            .collect()
    }
}

/// Result of a full run, including where the files went.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub model_name: String,
    pub groups: GroupConfig,
    pub outcome: CategorizeOutcome,
    pub paths: ExportPaths,
}

/// Pair every corpus document with its assignment and group label.
pub fn annotate(
    corpus: &Corpus,
    assignments: &[Assignment],
    table: &GroupTable,
) -> Result<Vec<DocumentRecord>> {
    if assignments.len() != corpus.len() {
        anyhow::bail!(
            "{} assignments for {} documents",
            assignments.len(),
            corpus.len()
        );
    }

    Ok(corpus
        .documents()
        .iter()
        .zip(assignments)
        .enumerate()
        .map(|(doc_id, (text, assignment))| DocumentRecord {
            doc_id,
            text: text.clone(),
            topic_num: assignment.topic_num,
            topic_score: assignment.topic_score,
            group: table.label_for(assignment.topic_num).to_string(),
        })
        .collect())
}

/// Put the corpus in the model's document order when the model stored its
/// documents and alignment is enabled. Otherwise the corpus order stands and
/// assignment validates it as is.
pub fn prepare_corpus(corpus: Corpus, model: &dyn TopicModel, align: bool) -> Result<Corpus> {
    match model.documents() {
        Some(stored) if align && corpus.documents() != stored => {
            info!(
                model = model.name(),
                documents = stored.len(),
                "Reordering corpus to the model's document order"
            );
            corpus.aligned_to(stored)
        }
        _ => Ok(corpus),
    }
}

/// Assign topics and groups, then select the domain subset.
pub fn categorize(
    corpus: &Corpus,
    model: &dyn TopicModel,
    groups: &GroupConfig,
    expected_documents: Option<usize>,
) -> Result<CategorizeOutcome> {
    let assignments = assign_topics(corpus, model, expected_documents)?;
    let records = annotate(corpus, &assignments, &groups.table)?;

    let allow_listed = groups.domain.select_activities(&records);
    let reclassified = groups.domain.select_reclassified(&records);
    let (allow_count, reclass_count) = (allow_listed.len(), reclassified.len());
    let activities = groups.domain.combine(allow_listed, reclassified);

    debug!(
        allow_listed = allow_count,
        reclassified = reclass_count,
        exported = activities.len(),
        "Selected emission-reduction records"
    );

    Ok(CategorizeOutcome {
        records,
        activities,
        allow_listed: allow_count,
        reclassified: reclass_count,
    })
}

/// Run the whole pipeline as configured: load, categorize, export.
pub fn run(config: &Config) -> Result<RunReport> {
    config.require_inputs()?;
    let groups = config.group_config()?;

    let model = ArtifactModel::load(&config.model_path)?;
    let corpus = Corpus::load_csv(&config.input_path, &config.text_column, config.delimiter)?;
    let corpus = prepare_corpus(corpus, &model, config.align_to_model)?;

    let outcome = categorize(&corpus, &model, &groups, config.expected_documents)?;
    let paths = export::export(&config.out_dir, &outcome.records, &outcome.activities)?;

    info!(
        documents = outcome.records.len(),
        activities = outcome.activities.len(),
        out_dir = %config.out_dir.display(),
        "Categorization complete"
    );

    Ok(RunReport {
        model_name: model.name().to_string(),
        groups,
        outcome,
        paths,
    })
}
