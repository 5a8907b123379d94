use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use topic_groups::config::Config;
use topic_groups::output::terminal;
use topic_groups::topics::artifact::ArtifactModel;
use topic_groups::topics::traits::TopicModel;

/// Topic groups: sort topic model output into emission-reduction categories.
///
/// Assigns every document its topic, maps topics onto curated groups and
/// exports the emission-reduction subset.
#[derive(Parser)]
#[command(name = "topic-groups", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Categorize every document and write both export files
    Run {
        /// Exported topic model (path or bare name)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Delimited table holding the documents
        #[arg(long)]
        input: Option<PathBuf>,

        /// Column with the document text
        #[arg(long)]
        text_column: Option<String>,

        /// Directory for topic_groups.csv and complete_activities.csv
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Group configuration file (defaults to the built-in emission table)
        #[arg(long)]
        groups: Option<PathBuf>,

        /// Abort unless exactly this many distinct documents are loaded
        #[arg(long)]
        expected_docs: Option<usize>,

        /// Keep the input order even if the model stored its own document order
        #[arg(long)]
        no_align: bool,

        /// Example documents to show per selection (default: 0)
        #[arg(long, default_value = "0")]
        samples: usize,
    },

    /// Show the group table and the emission-reduction filter
    Groups {
        /// Group configuration file (defaults to the built-in emission table)
        #[arg(long)]
        groups: Option<PathBuf>,
    },

    /// Show topic sizes and which group each topic maps to
    Topics {
        /// Exported topic model (path or bare name)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Group configuration file (defaults to the built-in emission table)
        #[arg(long)]
        groups: Option<PathBuf>,
    },

    /// Write the active group configuration as JSON, ready for editing
    ExportGroups {
        /// Destination file
        path: PathBuf,

        /// Start from this configuration instead of the built-in one
        #[arg(long)]
        groups: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topic_groups=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            model,
            input,
            text_column,
            out_dir,
            groups,
            expected_docs,
            no_align,
            samples,
        } => {
            let mut config = Config::load()?;
            if let Some(model) = model {
                config.model_path = model;
            }
            if let Some(input) = input {
                config.input_path = input;
            }
            if let Some(text_column) = text_column {
                config.text_column = text_column;
            }
            if let Some(out_dir) = out_dir {
                config.out_dir = out_dir;
            }
            if groups.is_some() {
                config.groups_path = groups;
            }
            if expected_docs.is_some() {
                config.expected_documents = expected_docs;
            }
            if no_align {
                config.align_to_model = false;
            }

            info!(
                model = %config.model_path.display(),
                input = %config.input_path.display(),
                "Starting categorization"
            );
            println!("Categorizing documents from {}...", config.input_path.display());

            let report = topic_groups::pipeline::categorize::run(&config)?;

            terminal::display_run_summary(&report.outcome, &report.groups);
            if samples > 0 {
                terminal::display_samples(
                    "Exported activities:",
                    &report.outcome.activities,
                    samples,
                );
            }

            println!("\n{}", "Export complete.".bold());
            println!("  Model: {}", report.model_name);
            println!("  All documents: {}", report.paths.all_documents.display());
            println!("  Activities:    {}", report.paths.activities.display());
        }

        Commands::Groups { groups } => {
            let config = Config::load()?;
            let groups = config.group_config_with(groups.as_deref())?;
            terminal::display_group_table(&groups);
        }

        Commands::Topics { model, groups } => {
            let config = Config::load()?;
            let groups = config.group_config_with(groups.as_deref())?;
            let model_path = model.unwrap_or(config.model_path);

            let model = ArtifactModel::load(&model_path)?;
            let sizes = model.topic_sizes()?;
            println!(
                "Model {} indexes {} documents",
                model.name().bold(),
                model.document_count()
            );
            terminal::display_topic_sizes(&sizes, &groups, |topic| {
                model.topic_words(topic).map(<[String]>::to_vec)
            });

            let unmapped: Vec<String> = sizes
                .iter()
                .filter(|(topic, _)| groups.table.label_for(*topic) == groups.table.default_label)
                .map(|(topic, _)| topic.to_string())
                .collect();
            if !unmapped.is_empty() {
                println!(
                    "\n  {} topics map to '{}': {}",
                    unmapped.len(),
                    groups.table.default_label,
                    unmapped.join(", ")
                );
            }
        }

        Commands::ExportGroups { path, groups } => {
            let config = Config::load()?;
            let groups = config.group_config_with(groups.as_deref())?;
            groups.save(&path)?;
            println!("Group configuration written to {}", path.display());
            println!("Use it with --groups {} or TOPIC_GROUPS_TABLE.", path.display());
        }
    }

    Ok(())
}
