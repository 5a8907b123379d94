use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::groups::GroupConfig;
use crate::topics::artifact::resolve_model_path;

/// Model the emission groups were curated against.
pub const DEFAULT_MODEL: &str = "ESGnie_emissions_model_V1";
pub const DEFAULT_INPUT: &str = "ESGnie_target_descriptions.csv";
pub const DEFAULT_TEXT_COLUMN: &str = "target_explanation_english";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// field can also be overridden from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Exported topic model, by path or bare name
    pub model_path: PathBuf,
    /// Delimited table holding the documents
    pub input_path: PathBuf,
    /// Header of the column with the document text
    pub text_column: String,
    /// Field delimiter of the input table
    pub delimiter: u8,
    /// Where the two export files are written
    pub out_dir: PathBuf,
    /// Group configuration file; the built-in emission table when unset
    pub groups_path: Option<PathBuf>,
    /// Number of distinct documents the run must load, when pinned
    pub expected_documents: Option<usize>,
    /// Reorder the corpus to the model's stored document order, if it has one
    pub align_to_model: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup. Unset keys fall back to
    /// defaults; set but unparseable keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let delimiter = match lookup("TOPIC_GROUPS_DELIMITER") {
            Some(raw) => parse_delimiter(&raw).context("Invalid TOPIC_GROUPS_DELIMITER")?,
            None => b',',
        };

        let expected_documents = match lookup("TOPIC_GROUPS_EXPECTED_DOCS") {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<usize>()
                    .with_context(|| format!("Invalid TOPIC_GROUPS_EXPECTED_DOCS: '{raw}'"))?,
            ),
            _ => None,
        };

        let align_to_model = match lookup("TOPIC_GROUPS_ALIGN").as_deref().map(str::trim) {
            None | Some("") | Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") => false,
            Some(other) => anyhow::bail!("Invalid TOPIC_GROUPS_ALIGN: '{other}' (use true/false)"),
        };

        Ok(Self {
            model_path: lookup("TOPIC_GROUPS_MODEL")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL)),
            input_path: lookup("TOPIC_GROUPS_INPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
            text_column: lookup("TOPIC_GROUPS_TEXT_COLUMN")
                .unwrap_or_else(|| DEFAULT_TEXT_COLUMN.to_string()),
            delimiter,
            out_dir: lookup("TOPIC_GROUPS_OUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            groups_path: lookup("TOPIC_GROUPS_TABLE")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            expected_documents,
            align_to_model,
        })
    }

    /// Check that the model and the input table exist before doing any work.
    pub fn require_inputs(&self) -> Result<()> {
        if resolve_model_path(&self.model_path).is_none() {
            anyhow::bail!(
                "Topic model not found: {}\n\
                 Set TOPIC_GROUPS_MODEL or pass --model.",
                self.model_path.display()
            );
        }
        if !self.input_path.is_file() {
            anyhow::bail!(
                "Document table not found: {}\n\
                 Set TOPIC_GROUPS_INPUT or pass --input.",
                self.input_path.display()
            );
        }
        Ok(())
    }

    /// The group configuration this run uses.
    pub fn group_config(&self) -> Result<GroupConfig> {
        self.group_config_with(None)
    }

    /// The group configuration with a command-line path taking precedence
    /// over TOPIC_GROUPS_TABLE.
    pub fn group_config_with(&self, override_path: Option<&Path>) -> Result<GroupConfig> {
        GroupConfig::load_or_default(override_path.or(self.groups_path.as_deref()))
    }
}

/// Parse a single-byte field delimiter. Accepts `tab` and `\t` for tabs.
pub fn parse_delimiter(raw: &str) -> Result<u8> {
    match raw {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => {
            let bytes = raw.as_bytes();
            if bytes.len() != 1 {
                anyhow::bail!("Delimiter must be a single ASCII character, got '{raw}'");
            }
            Ok(bytes[0])
        }
    }
}
