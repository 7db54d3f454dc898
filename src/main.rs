use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mocktrack::config::AppConfig;
use mocktrack::models::{MistakeClassification, MockRecord, QuestionType};
use mocktrack::normalize::RawMockSubmission;
use mocktrack::report::{self, assemble_report};
use mocktrack::storage::StorageConfig;
use mocktrack::store::MockStore;

#[derive(Parser)]
#[command(name = "mocktrack")]
#[command(about = "Mock exam performance tracker with deterministic reports")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a mock from a JSON submission
    Add {
        /// Path to a JSON file, or "-" for stdin
        file: String,
    },

    /// List all mocks, most recent first
    List,

    /// Show one mock in full
    Show { id: String },

    /// Rename a mock
    Rename {
        id: String,

        #[arg(long)]
        name: String,
    },

    /// Flip the analysis flag on one or more mocks
    ToggleAnalyzed {
        ids: Vec<String>,

        /// Mark analyzed rather than toggling (idempotent)
        #[arg(long)]
        mark: bool,
    },

    /// Delete one or more mocks and their mistakes
    Delete { ids: Vec<String> },

    /// Log a mistake against a mock
    AddMistake {
        mock_id: String,

        #[arg(long)]
        image: String,

        #[arg(long)]
        section: String,

        /// "incorrect" or "unattempted"
        #[arg(long, default_value = "incorrect")]
        question_type: String,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List mistakes for a mock
    Mistakes { mock_id: String },

    /// Attach an explanation and classification to a mistake
    Analyze {
        mistake_id: String,

        #[arg(long)]
        text: String,

        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        topic: Option<String>,

        #[arg(long)]
        sub_topic: Option<String>,
    },

    /// Mistake counts grouped by subject, topic, and sub-topic
    Weaknesses,

    /// Build the full performance report
    Report {
        /// Write to a file instead of stdout; without a path, writes to
        /// the data directory's derived/ folder
        #[arg(long)]
        out: Option<Option<PathBuf>>,
    },

    /// Per-section averages over analyzed mocks
    Sectional,

    /// Overall score over time, oldest first
    Trajectory,

    /// Report score discrepancies without building a full report
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = PathBuf::from(&cli.config);
    let config = if config_path.exists() {
        AppConfig::from_file(&config_path)?
    } else {
        AppConfig::default()
    };

    let data_dir = cli
        .data_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_dir.clone());
    let storage = StorageConfig::new(data_dir);
    let store = MockStore::new(storage.clone());

    match cli.command {
        Commands::Add { file } => {
            let raw = read_submission(&file)?;
            let mock = store.create_mock(&raw)?;
            println!("Recorded {} ({}) — id {}", mock.name, mock.date_taken, mock.id);
        }
        Commands::List => {
            let mocks = store.list_mocks()?;
            if mocks.is_empty() {
                println!("No mocks recorded.");
            }
            for mock in &mocks {
                print_mock_line(mock);
            }
        }
        Commands::Show { id } => {
            let mock = store.get_mock(&id)?;
            println!("{}", serde_json::to_string_pretty(&mock)?);
        }
        Commands::Rename { id, name } => {
            let mock = store.rename_mock(&id, &name)?;
            println!("Renamed {} to \"{}\"", mock.id, mock.name);
        }
        Commands::ToggleAnalyzed { ids, mark } => {
            let report = if mark {
                store.mark_analyzed_many(&ids)
            } else {
                let mut report = mocktrack::batch::BatchReport::default();
                for id in &ids {
                    match store.toggle_analysis_status(id) {
                        Ok(mock) => {
                            report.record_ok(id.clone());
                            println!(
                                "{}: {}",
                                mock.id,
                                if mock.is_analyzed { "analyzed" } else { "unanalyzed" }
                            );
                        }
                        Err(e) => report.record_err(id.clone(), e.to_string()),
                    }
                }
                report
            };
            print_batch_summary(&report);
        }
        Commands::Delete { ids } => {
            let report = store.delete_mocks(&ids);
            print_batch_summary(&report);
        }
        Commands::AddMistake {
            mock_id,
            image,
            section,
            question_type,
            notes,
        } => {
            let qt = QuestionType::parse(&question_type)
                .with_context(|| format!("Unknown question type: {}", question_type))?;
            let mistake = store.add_mistake(&mock_id, &image, &section, qt, &notes)?;
            println!("Logged mistake {} in {}", mistake.id, mistake.section_name);
        }
        Commands::Mistakes { mock_id } => {
            let mistakes = store.list_mistakes(Some(&mock_id))?;
            if mistakes.is_empty() {
                println!("No mistakes logged for {}.", mock_id);
            }
            for m in &mistakes {
                let status = if m.is_analyzed() { "analyzed" } else { "pending" };
                println!(
                    "{}  [{}] {} — {} ({})",
                    m.id, m.section_name, m.question_type, m.image_path, status
                );
            }
        }
        Commands::Analyze {
            mistake_id,
            text,
            subject,
            topic,
            sub_topic,
        } => {
            let classification = MistakeClassification {
                subject,
                topic,
                sub_topic,
            };
            let mistake = store.record_analysis(&mistake_id, &text, &classification)?;
            println!(
                "Analyzed {} ({} / {} / {})",
                mistake.id,
                mistake.subject.as_deref().unwrap_or("-"),
                mistake.topic.as_deref().unwrap_or("-"),
                mistake.sub_topic.as_deref().unwrap_or("-")
            );
        }
        Commands::Weaknesses => {
            let mistakes = store.list_mistakes(None)?;
            let tree = report::weakness::weakness_breakdown(&mistakes);
            if tree.is_empty() {
                println!("No classified mistakes yet.");
            }
            for subject in &tree {
                println!("{}", subject.name);
                for topic in &subject.children {
                    println!("  {}", topic.name);
                    for leaf in &topic.children {
                        println!("    {:<24} {}", leaf.name, leaf.value);
                    }
                }
            }
        }
        Commands::Report { out } => {
            let mocks = store.list_mocks()?;
            let performance = assemble_report(&mocks, &config.report);
            let json = serde_json::to_string_pretty(&performance)?;
            match out {
                Some(path) => {
                    let path = path
                        .unwrap_or_else(|| storage.derived_dir().join("performance_report.json"));
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &json)?;
                    println!("Wrote report to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        Commands::Sectional => {
            let mocks = store.list_mocks()?;
            let analyzed: Vec<&MockRecord> = mocks.iter().filter(|m| m.is_analyzed).collect();
            if analyzed.is_empty() {
                println!("No analyzed mocks yet.");
                return Ok(());
            }
            let deep_dive = report::averages::sectional_deep_dive(&analyzed);
            println!("=== Sectional Averages ({} analyzed mocks) ===\n", analyzed.len());
            for (key, avg) in &deep_dive {
                println!(
                    "  {:<10} score {:>6.2}  accuracy {:>5.1}%  time {:>5.1}m",
                    key.as_str(),
                    avg.average_score,
                    avg.average_accuracy * 100.0,
                    avg.average_time_minutes
                );
            }
        }
        Commands::Trajectory => {
            let mocks = store.list_mocks()?;
            let points = report::trajectory::performance_trajectory(&mocks);
            if points.is_empty() {
                println!("No mocks recorded.");
            }
            for p in &points {
                let pct = p
                    .percentile
                    .map(|v| format!("{:.1} %ile", v))
                    .unwrap_or_else(|| "-".to_string());
                println!("{}  {:>7.2}  {}", p.date, p.overall_score, pct);
            }
        }
        Commands::Check => {
            let mocks = store.list_mocks()?;
            let performance = assemble_report(&mocks, &config.report);
            if performance.discrepancies.is_empty() {
                println!("All {} mocks are internally consistent.", mocks.len());
            } else {
                println!(
                    "{} of {} mocks have score discrepancies:",
                    performance.discrepancies.len(),
                    mocks.len()
                );
                for d in &performance.discrepancies {
                    println!(
                        "  {}  stated {:.2}, sections sum to {:.2} (delta {:+.2})",
                        d.mock_id, d.stated, d.computed, d.delta
                    );
                }
            }
        }
    }

    Ok(())
}

fn read_submission(file: &str) -> Result<RawMockSubmission> {
    let contents = if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read submission from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read submission file: {}", file))?
    };
    serde_json::from_str(&contents).context("Submission is not valid JSON")
}

fn print_mock_line(mock: &MockRecord) {
    let status = if mock.is_analyzed { "analyzed" } else { "pending" };
    let pct = mock
        .percentile_overall
        .map(|v| format!("{:.1} %ile", v))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{}  {}  {:<28} {:>7.2}/{}  {}  [{}]",
        mock.id, mock.date_taken, mock.name, mock.score_overall, mock.total_marks, pct, status
    );
}

fn print_batch_summary(report: &mocktrack::batch::BatchReport) {
    println!(
        "{} succeeded, {} failed ({} total)",
        report.succeeded,
        report.failed,
        report.total()
    );
    for item in report.items.iter().filter(|i| !i.ok) {
        if let Some(err) = &item.error {
            println!("  {}: {}", item.id, err);
        }
    }
}
