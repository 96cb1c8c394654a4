//! Docsync CLI - apply proposer edit batches to Markdown documents.
//!
//! Three commands:
//! - `apply` - patch one document with one edit file
//! - `expand` - print the full section a heading stands for
//! - `batch` - run a manifest of independent document jobs in parallel
//!
//! Documents are read from local files here; the core pipeline only sees
//! text and is transport-agnostic.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docsync_patch::{
    diff_summary, document_from_bytes, expand_heading, parse_edits, patch_batch,
    patch_with_options, DocumentSource, EditRequest, PatchError, PatchJob, PatchOptions,
    PatchResult, TracingObserver,
};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(
    name = "docsync",
    version,
    about = "Apply LLM-proposed edit batches to Markdown documents"
)]
struct Cli {
    /// Log filter, e.g. "info" or "docsync_patch=debug".
    #[arg(long, env = "DOCSYNC_LOG", default_value = "info", global = true)]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply an edit file to a document.
    Apply {
        /// The document to patch.
        #[arg(long)]
        document: PathBuf,
        /// JSON edit list: {"modifications": [...]} or a bare array.
        #[arg(long)]
        edits: PathBuf,
        /// Where to write the patched document. Prints to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Where to write the JSON report.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Disable the duplicate-paragraph sweep.
        #[arg(long)]
        no_sweep: bool,
        /// Disable the collision guard.
        #[arg(long)]
        no_collision_guard: bool,
    },
    /// Expand a heading into its full section and print it.
    Expand {
        /// The document containing the heading.
        #[arg(long)]
        document: PathBuf,
        /// The heading line, e.g. "## 3.1 Vision".
        #[arg(long)]
        heading: String,
    },
    /// Apply a manifest of independent document jobs in parallel.
    Batch {
        /// JSON manifest: [{"document", "edits", "output"?}, ...].
        #[arg(long)]
        manifest: PathBuf,
    },
}

/// Local-filesystem document store.
struct FileSource;

impl DocumentSource for FileSource {
    fn fetch_document(&self, identifier: &str) -> PatchResult<String> {
        let bytes = fs::read(identifier)
            .map_err(|err| PatchError::fetch(identifier, err.to_string()))?;
        document_from_bytes(identifier, bytes)
    }
}

/// One entry of the `batch` manifest.
#[derive(Debug, Deserialize)]
struct ManifestEntry {
    /// Path to the document to patch.
    document: PathBuf,
    /// Path to its JSON edit list.
    edits: PathBuf,
    /// Where to write the result. Defaults to `<document>.patched`.
    #[serde(default)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log);

    match cli.command {
        Commands::Apply {
            document,
            edits,
            output,
            report,
            no_sweep,
            no_collision_guard,
        } => {
            let options = PatchOptions {
                sweep: !no_sweep,
                collision_guard: !no_collision_guard,
                ..Default::default()
            };
            run_apply(&document, &edits, output.as_deref(), report.as_deref(), &options)
        }
        Commands::Expand { document, heading } => run_expand(&document, &heading),
        Commands::Batch { manifest } => run_batch(&manifest),
    }
}

fn init_tracing(filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_apply(
    document_path: &Path,
    edits_path: &Path,
    output: Option<&Path>,
    report_path: Option<&Path>,
    options: &PatchOptions,
) -> Result<()> {
    let document = FileSource.fetch_document(&document_path.display().to_string())?;
    let edits = load_edits(edits_path)?;
    info!(
        document = %document_path.display(),
        edits = edits.len(),
        "applying edit batch"
    );

    let (patched, report) = patch_with_options(&document, &edits, options, &TracingObserver);

    info!(
        summary = %report.summary(),
        changes = %diff_summary(&document, &patched),
        "edit batch complete"
    );
    for failed in &report.failed {
        warn!(location = %failed.location, reason = %failed.reason, "edit failed");
    }

    match output {
        Some(path) => fs::write(path, &patched)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{patched}"),
    }

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}

fn run_expand(document_path: &Path, heading: &str) -> Result<()> {
    let document = FileSource.fetch_document(&document_path.display().to_string())?;
    let section = expand_heading(&document, heading);
    if section == heading {
        warn!(heading, "heading not found; echoing it unchanged");
    }
    println!("{section}");
    Ok(())
}

fn run_batch(manifest_path: &Path) -> Result<()> {
    let manifest = fs::read_to_string(manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    let entries: Vec<ManifestEntry> =
        serde_json::from_str(&manifest).context("malformed batch manifest")?;

    let mut jobs = Vec::with_capacity(entries.len());
    let mut outputs = Vec::with_capacity(entries.len());
    for entry in &entries {
        let identifier = entry.document.display().to_string();
        let document = FileSource.fetch_document(&identifier)?;
        let edits = load_edits(&entry.edits)?;
        outputs.push(entry.output.clone().unwrap_or_else(|| default_output(&entry.document)));
        jobs.push(PatchJob::new(identifier, document, edits));
    }

    info!(jobs = jobs.len(), "running batch");
    let results = patch_batch(jobs, &PatchOptions::default());

    for (result, output) in results.iter().zip(&outputs) {
        fs::write(output, &result.document)
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!(
            document = %result.identifier,
            output = %output.display(),
            summary = %result.report.summary(),
            "job complete"
        );
    }

    Ok(())
}

/// Decode an edit file, tolerating both envelope shapes the proposer emits.
fn load_edits(path: &Path) -> Result<Vec<EditRequest>> {
    let json =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_edits(&json).with_context(|| format!("malformed edit file {}", path.display()))
}

fn default_output(document: &Path) -> PathBuf {
    let mut name = document.as_os_str().to_os_string();
    name.push(".patched");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_edits_both_envelopes() {
        let temp = TempDir::new().unwrap();
        let wrapped = temp.path().join("wrapped.json");
        fs::write(
            &wrapped,
            r#"{"modifications": [{"location": "l", "original_text": "a", "modified_text": "b"}]}"#,
        )
        .unwrap();
        assert_eq!(load_edits(&wrapped).unwrap().len(), 1);

        let bare = temp.path().join("bare.json");
        fs::write(
            &bare,
            r#"[{"location": "l", "original_text": "a", "modified_text": "b"}]"#,
        )
        .unwrap();
        assert_eq!(load_edits(&bare).unwrap().len(), 1);
    }

    #[test]
    fn test_file_source_errors_are_opaque() {
        let err = FileSource.fetch_document("/nonexistent/doc.md").unwrap_err();
        assert!(matches!(err, PatchError::Fetch { .. }));
    }

    #[test]
    fn test_run_apply_writes_output_and_report() {
        let temp = TempDir::new().unwrap();
        let doc = temp.path().join("doc.md");
        fs::write(&doc, "the original sentence lives here\n\nuntouched paragraph").unwrap();

        let edits = temp.path().join("edits.json");
        fs::write(
            &edits,
            r#"{"modifications": [{
                "location": "body",
                "original_text": "the original sentence lives here",
                "modified_text": "the replacement sentence lives here"
            }]}"#,
        )
        .unwrap();

        let output = temp.path().join("out.md");
        let report = temp.path().join("report.json");
        run_apply(
            &doc,
            &edits,
            Some(&output),
            Some(&report),
            &PatchOptions::default(),
        )
        .unwrap();

        let patched = fs::read_to_string(&output).unwrap();
        assert_eq!(patched, "the replacement sentence lives here\n\nuntouched paragraph");

        let report_json = fs::read_to_string(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report_json).unwrap();
        assert_eq!(value["applied"][0], "body");
    }

    #[test]
    fn test_run_batch_writes_default_outputs() {
        let temp = TempDir::new().unwrap();
        let doc = temp.path().join("doc.md");
        fs::write(&doc, "batch target sentence goes here").unwrap();

        let edits = temp.path().join("edits.json");
        fs::write(
            &edits,
            r#"[{
                "location": "only",
                "original_text": "batch target sentence goes here",
                "modified_text": "batch patched sentence goes here"
            }]"#,
        )
        .unwrap();

        let manifest = temp.path().join("manifest.json");
        fs::write(
            &manifest,
            format!(
                r#"[{{"document": {:?}, "edits": {:?}}}]"#,
                doc.display().to_string(),
                edits.display().to_string()
            ),
        )
        .unwrap();

        run_batch(&manifest).unwrap();

        let patched = fs::read_to_string(default_output(&doc)).unwrap();
        assert_eq!(patched, "batch patched sentence goes here");
    }

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            default_output(Path::new("docs/chapter.md")),
            PathBuf::from("docs/chapter.md.patched")
        );
    }
}
