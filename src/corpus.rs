// Document corpus: the distinct text values the topic model was built from.
//
// The corpus order IS the document id space: position i here is document id
// i in the model. Record building and the model query both iterate this one
// list, so they cannot drift apart.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::output::truncate_chars;

/// Ordered list of distinct documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    documents: Vec<String>,
}

impl Corpus {
    /// Build a corpus from raw text values, keeping the first occurrence of
    /// each distinct text.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut documents = Vec::new();
        for text in texts {
            let text = text.into();
            if seen.insert(text.clone()) {
                documents.push(text);
            }
        }
        Self { documents }
    }

    /// Read the distinct values of `text_column` from a delimited file with a
    /// header row.
    pub fn load_csv(path: &Path, text_column: &str, delimiter: u8) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open document table {}", path.display()))?;
        let corpus = Self::from_reader(file, text_column, delimiter)
            .with_context(|| format!("Failed to read document table {}", path.display()))?;

        info!(
            path = %path.display(),
            column = text_column,
            documents = corpus.len(),
            "Loaded document corpus"
        );
        Ok(corpus)
    }

    /// Same as [`Corpus::load_csv`] for any reader.
    pub fn from_reader<R: Read>(reader: R, text_column: &str, delimiter: u8) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .from_reader(reader);

        let headers = rdr.headers().context("Failed to read header row")?.clone();
        let column = headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == text_column)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Text column '{}' not found (columns: {})",
                    text_column,
                    headers.iter().collect::<Vec<_>>().join(", ")
                )
            })?;

        let mut rows = 0usize;
        let mut empty = 0usize;
        let mut texts = Vec::new();
        for (i, record) in rdr.records().enumerate() {
            // +2: one for the header, one for 1-based line numbers
            let record = record.with_context(|| format!("Malformed row {}", i + 2))?;
            rows += 1;
            match record.get(column) {
                Some(text) if !text.is_empty() => texts.push(text.to_string()),
                _ => empty += 1,
            }
        }

        let corpus = Self::from_texts(texts);
        debug!(
            rows,
            empty,
            distinct = corpus.len(),
            "Deduplicated document texts"
        );
        Ok(corpus)
    }

    /// Reorder the corpus to follow `reference`, typically the document list
    /// stored inside the topic model. Both must hold exactly the same
    /// distinct texts.
    pub fn aligned_to(&self, reference: &[String]) -> Result<Self> {
        if reference.len() != self.documents.len() {
            anyhow::bail!(
                "Cannot align corpus of {} documents to a reference of {} documents",
                self.documents.len(),
                reference.len()
            );
        }

        let present: HashSet<&str> = self.documents.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        for (id, text) in reference.iter().enumerate() {
            if !present.contains(text.as_str()) {
                anyhow::bail!(
                    "Reference document {id} is not in the loaded corpus: \"{}\"",
                    truncate_chars(text, 80)
                );
            }
            if !seen.insert(text.as_str()) {
                anyhow::bail!(
                    "Reference document {id} is a duplicate: \"{}\"",
                    truncate_chars(text, 80)
                );
            }
        }

        Ok(Self {
            documents: reference.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn get(&self, doc_id: usize) -> Option<&str> {
        self.documents.get(doc_id).map(String::as_str)
    }

    /// The id range to query the topic model with.
    pub fn doc_ids(&self) -> Range<usize> {
        0..self.documents.len()
    }
}
