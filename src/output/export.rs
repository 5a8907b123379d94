// CSV export of the annotated records.
//
// Both files share one layout (see EXPORT_COLUMNS) and are overwritten on
// every run. The header is written even when there are no rows.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::records::{DocumentRecord, EXPORT_COLUMNS};

/// Every document with its topic and group.
pub const ALL_DOCUMENTS_FILE: &str = "topic_groups.csv";
/// The emission-reduction subset.
pub const ACTIVITIES_FILE: &str = "complete_activities.csv";

/// Where a run's exports ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPaths {
    pub all_documents: PathBuf,
    pub activities: PathBuf,
}

/// Write records to `path`, replacing whatever was there.
pub fn write_records(path: &Path, records: &[DocumentRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(EXPORT_COLUMNS)?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("  Writing [{bar:30}] {pos}/{len}")?);

    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("Failed to write document {}", record.doc_id))?;
        pb.inc(1);
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    pb.finish_and_clear();

    info!(path = %path.display(), rows = records.len(), "Wrote export");
    Ok(())
}

/// Write the full table and the activity subset into `out_dir`.
pub fn export(
    out_dir: &Path,
    records: &[DocumentRecord],
    activities: &[DocumentRecord],
) -> Result<ExportPaths> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let paths = ExportPaths {
        all_documents: out_dir.join(ALL_DOCUMENTS_FILE),
        activities: out_dir.join(ACTIVITIES_FILE),
    };
    write_records(&paths.all_documents, records)?;
    write_records(&paths.activities, activities)?;
    Ok(paths)
}
