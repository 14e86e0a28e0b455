//! Command-line front end.
//!
//! Thin layer over `NoteProcessor`: reads the input, runs one submission,
//! prints warnings and notices to stderr, and writes the table to stdout or a
//! file. Output is only written once the whole run has succeeded.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::config::ExtractorConfig;
use crate::export::{write_csv, write_json, ExportError};
use crate::models::ExtractionMode;
use crate::pipeline::extraction::DocumentFormatError;
use crate::pipeline::import::{detect_format, read_input, read_text_input, FileCategory, ImportError};
use crate::pipeline::processor::{NoteProcessor, ProcessingOutcome};

#[derive(Parser, Debug)]
#[command(name = "emr-predict")]
#[command(about = "Extract prenatal fields from clinical notes, classify risk, export CSV")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Write results here instead of stdout
    #[arg(long, short, global = true)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv, global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract from a typed note
    Note {
        /// Note text (read from --file or stdin when omitted)
        text: Option<String>,
        /// Read the note from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Treat each line as a "Key: Value" paragraph with "Patient N" section markers
        #[arg(long)]
        structured: bool,
    },
    /// Extract from a .docx document
    Document {
        /// Path to the .docx file
        path: PathBuf,
    },
    /// Detect the input format from its contents, then extract
    Process {
        /// Path to a .docx or plain-text file
        path: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Could not read input: {0}")]
    Import(#[from] ImportError),

    #[error("Could not read document: {0}")]
    Document(#[from] DocumentFormatError),

    #[error("Could not write output: {0}")]
    Export(#[from] ExportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run one command to completion.
pub fn execute(cli: Cli, config: ExtractorConfig) -> Result<ProcessingOutcome, CliError> {
    let max_bytes = config.max_document_bytes;
    let processor = NoteProcessor::new(config);

    let outcome = match cli.command {
        Commands::Note {
            text,
            file,
            structured,
        } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => read_text_input(&path, max_bytes)?,
                (None, None) => std::io::read_to_string(std::io::stdin())?,
            };
            let mode = if structured {
                ExtractionMode::StructuredParagraphs
            } else {
                ExtractionMode::FreeText
            };
            processor.process_note(&text, mode)
        }
        Commands::Document { path } => {
            let bytes = read_input(&path, max_bytes)?;
            processor.process_document(&bytes)?
        }
        Commands::Process { path } => process_detected(&processor, &path, max_bytes)?,
    };

    report_diagnostics(&outcome);
    write_outcome(&outcome, cli.format, cli.output.as_deref())?;
    Ok(outcome)
}

fn process_detected(
    processor: &NoteProcessor,
    path: &Path,
    max_bytes: u64,
) -> Result<ProcessingOutcome, CliError> {
    let format = detect_format(path, max_bytes)?;
    tracing::debug!(
        path = %path.display(),
        category = format.category.as_str(),
        mime = %format.mime_type,
        size = format.file_size_bytes,
        "Input format detected"
    );

    if !format.category.is_supported() {
        return Err(ImportError::UnsupportedFormat(format.mime_type).into());
    }

    if format.category == FileCategory::WordDocument {
        let bytes = read_input(path, max_bytes)?;
        Ok(processor.process_document(&bytes)?)
    } else {
        let text = read_text_input(path, max_bytes)?;
        Ok(processor.process_note(&text, ExtractionMode::FreeText))
    }
}

fn report_diagnostics(outcome: &ProcessingOutcome) {
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    if let Some(notice) = &outcome.notice {
        eprintln!("notice: {notice}");
    }
}

fn write_outcome(
    outcome: &ProcessingOutcome,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), CliError> {
    match output {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            write_formatted(outcome, format, file)?;
            tracing::info!(path = %path.display(), rows = outcome.records.len(), "Results written");
        }
        None => {
            let stdout = std::io::stdout();
            write_formatted(outcome, format, stdout.lock())?;
        }
    }
    Ok(())
}

fn write_formatted<W: Write>(
    outcome: &ProcessingOutcome,
    format: OutputFormat,
    out: W,
) -> Result<(), ExportError> {
    match format {
        OutputFormat::Csv => {
            let table = outcome.table();
            if table.is_empty() {
                tracing::debug!(run_id = %outcome.run_id, "No rows, writing header only");
            }
            write_csv(&table, out)
        }
        OutputFormat::Json => write_json(outcome, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    use crate::models::RiskLevel;
    use crate::pipeline::extraction::docx::fixtures::make_docx;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("emr-predict").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn note_text_to_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let cli = parse(&[
            "note",
            "A 32-year-old at 30 weeks gestation with hemoglobin at 10.2 g/dL.",
            "--output",
            out.to_str().unwrap(),
        ]);

        let outcome = execute(cli, ExtractorConfig::default()).unwrap();
        assert_eq!(outcome.records[0].risk_level, RiskLevel::High);

        let csv = std::fs::read_to_string(&out).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Age,Gestational Age,Hemoglobin,RiskLevel,Recommendations")
        );
        assert!(lines.next().unwrap().starts_with("32,30,10.2,High,"));
    }

    #[test]
    fn structured_note_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("note.txt");
        std::fs::write(&input, "Patient 1\nAge: 28\nHemoglobin: 9.5\nPatient 2\nGestational Age: 34").unwrap();
        let out = dir.path().join("out.json");
        let cli = parse(&[
            "note",
            "--file",
            input.to_str().unwrap(),
            "--structured",
            "--format",
            "json",
            "-o",
            out.to_str().unwrap(),
        ]);

        let outcome = execute(cli, ExtractorConfig::default()).unwrap();
        assert_eq!(outcome.records.len(), 2);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["records"][1]["risk_level"], "PretermRisk");
    }

    #[test]
    fn document_command_reads_docx() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.docx");
        std::fs::write(&input, make_docx(&["Patient 1", "Age: 28", "Hemoglobin: 9.5"])).unwrap();
        let out = dir.path().join("out.csv");
        let cli = parse(&["document", input.to_str().unwrap(), "-o", out.to_str().unwrap()]);

        let outcome = execute(cli, ExtractorConfig::default()).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert!(std::fs::read_to_string(&out).unwrap().contains("High"));
    }

    #[test]
    fn malformed_document_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("fake.docx");
        std::fs::write(&input, "plain text pretending to be a document").unwrap();
        let out = dir.path().join("out.csv");
        let cli = parse(&["document", input.to_str().unwrap(), "-o", out.to_str().unwrap()]);

        let err = execute(cli, ExtractorConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Document(_)));
        assert!(!out.exists());
    }

    #[test]
    fn process_detects_docx_and_text() {
        let dir = tempfile::tempdir().unwrap();
        let docx = dir.path().join("upload.bin");
        std::fs::write(&docx, make_docx(&["Patient 1", "Gestational Age: 33"])).unwrap();
        let text = dir.path().join("note.dat");
        std::fs::write(&text, "A 25-year-old at 35 weeks gestation.").unwrap();
        let out = dir.path().join("out.csv");

        let from_docx = execute(
            parse(&["process", docx.to_str().unwrap(), "-o", out.to_str().unwrap()]),
            ExtractorConfig::default(),
        )
        .unwrap();
        assert_eq!(from_docx.records[0].risk_level, RiskLevel::PretermRisk);

        let from_text = execute(
            parse(&["process", text.to_str().unwrap(), "-o", out.to_str().unwrap()]),
            ExtractorConfig::default(),
        )
        .unwrap();
        assert_eq!(from_text.records[0].record.age(), Some(25));
    }

    #[test]
    fn process_rejects_binary() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("image.png");
        std::fs::write(&input, [0x89, 0x50, 0x4E, 0x47, 0x00, 0x01, 0x02, 0x03]).unwrap();
        let err = execute(parse(&["process", input.to_str().unwrap()]), ExtractorConfig::default())
            .unwrap_err();
        assert!(matches!(err, CliError::Import(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn note_text_and_file_conflict() {
        let result = Cli::try_parse_from(["emr-predict", "note", "text", "--file", "x.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn empty_result_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let cli = parse(&["note", "Routine visit.", "-o", out.to_str().unwrap()]);

        let outcome = execute(cli, ExtractorConfig::default()).unwrap();
        assert!(outcome.notice.is_some());
        assert_eq!(
            std::fs::read_to_string(&out).unwrap().trim_end(),
            "RiskLevel,Recommendations"
        );
    }
}
