//! Parallel patching of independent documents.
//!
//! Within one document, edits are strictly sequential. Across documents there
//! is no shared mutable state at all, so a batch of jobs fans out across the
//! rayon thread pool and fans back in with results in job order.

use crate::applier::{apply_edits, PatchOptions, PatchReport};
use crate::edit::EditRequest;
use crate::observer::{NullObserver, PatchObserver};
use rayon::prelude::*;
use serde::Serialize;

/// One document together with the edits that target it.
#[derive(Debug, Clone)]
pub struct PatchJob {
    /// Caller-chosen identifier echoed back in the result.
    pub identifier: String,
    /// The document text.
    pub document: String,
    /// The edits to apply to it.
    pub edits: Vec<EditRequest>,
}

impl PatchJob {
    /// Create a job.
    pub fn new(
        identifier: impl Into<String>,
        document: impl Into<String>,
        edits: Vec<EditRequest>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            document: document.into(),
            edits,
        }
    }
}

/// Outcome of one job.
#[derive(Debug, Clone, Serialize)]
pub struct PatchedDocument {
    /// The job's identifier.
    pub identifier: String,
    /// The patched document text.
    pub document: String,
    /// Per-edit outcomes.
    pub report: PatchReport,
}

/// Patch every job concurrently with default options and no observer.
pub fn patch_batch(jobs: Vec<PatchJob>, options: &PatchOptions) -> Vec<PatchedDocument> {
    patch_batch_with_observer(jobs, options, &NullObserver)
}

/// Patch every job concurrently, forwarding checkpoints to `observer`.
///
/// Results come back in job order regardless of completion order.
pub fn patch_batch_with_observer(
    jobs: Vec<PatchJob>,
    options: &PatchOptions,
    observer: &dyn PatchObserver,
) -> Vec<PatchedDocument> {
    jobs.into_par_iter()
        .map(|job| {
            let (document, report) = apply_edits(&job.document, &job.edits, options, observer);
            PatchedDocument {
                identifier: job.identifier,
                document,
                report,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_batch_results_in_job_order() {
        let jobs: Vec<PatchJob> = (0..16)
            .map(|i| {
                PatchJob::new(
                    format!("doc-{i}"),
                    format!("document number {i} original body text"),
                    vec![EditRequest::new(
                        "body",
                        format!("document number {i} original body text"),
                        format!("document number {i} patched body text"),
                    )],
                )
            })
            .collect();

        let results = patch_batch(jobs, &PatchOptions::default());
        assert_eq!(results.len(), 16);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.identifier, format!("doc-{i}"));
            assert_eq!(result.document, format!("document number {i} patched body text"));
            assert_eq!(result.report.applied.len(), 1);
        }
    }

    #[test]
    fn test_jobs_are_independent() {
        let shared_doc = "identical starting text for everyone";
        let jobs = vec![
            PatchJob::new(
                "a",
                shared_doc,
                vec![EditRequest::new("e", shared_doc, "rewritten for the first document")],
            ),
            PatchJob::new("b", shared_doc, vec![]),
        ];

        let results = patch_batch(jobs, &PatchOptions::default());
        assert_eq!(results[0].document, "rewritten for the first document");
        assert_eq!(results[1].document, shared_doc);
    }
}
