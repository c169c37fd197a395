//! `kfir check`: load a graph, check its source files in parallel and
//! collect the diagnostics in a stable order.

use anyhow::{Context, Result};
use dashmap::DashMap;
use kfir_checker::{CheckerOptions, InvariantViolation, check_file, registry_for};
use kfir_common::{Diagnostic, DiagnosticCategory};
use kfir_tree::{DeclId, Graph, Session};
use rayon::prelude::*;
use std::path::Path;

use crate::args::{CheckArgs, OutputFormat};
use crate::config::resolve_options;
use crate::reporter::{Reporter, render_json};

/// Process exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERRORS_REPORTED: i32 = 1;
pub const EXIT_INTERNAL_ERROR: i32 = 2;

#[derive(Debug, Clone, Default)]
pub struct CheckOutcome {
    /// Sorted by file, offset and factory name.
    pub diagnostics: Vec<Diagnostic>,
    pub files_checked: usize,
}

impl CheckOutcome {
    pub fn error_count(&self) -> usize {
        self.count(DiagnosticCategory::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(DiagnosticCategory::Warning)
    }

    fn count(&self, category: DiagnosticCategory) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.category == category)
            .count()
    }

    pub fn exit_code(&self) -> i32 {
        // Warnings were already promoted by the collector under `warningsAsErrors`.
        if self.diagnostics.iter().any(Diagnostic::is_error) {
            EXIT_ERRORS_REPORTED
        } else {
            EXIT_SUCCESS
        }
    }
}

pub fn load_graph(path: &Path) -> Result<Graph> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read graph {}", path.display()))?;
    Graph::from_json(&text).with_context(|| format!("failed to load graph {}", path.display()))
}

/// Load the graph and options named by `args` and build the session.
pub fn prepare(args: &CheckArgs) -> Result<(Session, CheckerOptions)> {
    let options = resolve_options(args)?;
    let graph = load_graph(&args.graph)?;
    let session = Session::new(graph, options.language_settings())
        .with_context(|| format!("malformed graph {}", args.graph.display()))?;
    Ok((session, options))
}

/// Check every non-library file of `session`, each with its own collector.
pub fn check_session(
    session: &Session,
    options: &CheckerOptions,
) -> Result<CheckOutcome, InvariantViolation> {
    let registry = registry_for(options);
    let files: Vec<DeclId> = session.source_files().collect();
    let by_file: DashMap<DeclId, Vec<Diagnostic>> = DashMap::with_capacity(files.len());

    files.par_iter().try_for_each(|&file| {
        tracing::debug!(file = %session.file_path(file), "checking file");
        let found = check_file(session, file, &registry, options)?;
        by_file.insert(file, found);
        Ok::<(), InvariantViolation>(())
    })?;

    let mut diagnostics: Vec<Diagnostic> =
        by_file.into_iter().flat_map(|(_, found)| found).collect();
    diagnostics.sort_by(|left, right| {
        left.file
            .cmp(&right.file)
            .then(left.start.cmp(&right.start))
            .then_with(|| left.factory.cmp(&right.factory))
    });
    Ok(CheckOutcome {
        diagnostics,
        files_checked: files.len(),
    })
}

/// Run `check_session` on a pool of `jobs` threads, or the global pool.
pub fn check_with_jobs(
    session: &Session,
    options: &CheckerOptions,
    jobs: Option<usize>,
) -> Result<Result<CheckOutcome, InvariantViolation>> {
    let Some(jobs) = jobs else {
        return Ok(check_session(session, options));
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
        .context("failed to start checker threads")?;
    Ok(pool.install(|| check_session(session, options)))
}

/// Rendered result of a `check` run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run `kfir check`. I/O and config problems are `Err`; an internal
/// invariant violation is reported as a crash with exit code 2.
pub fn run_check(args: &CheckArgs, color: bool) -> Result<RunReport> {
    let (session, options) = prepare(args)?;
    let outcome = match check_with_jobs(&session, &options, args.jobs)? {
        Ok(outcome) => outcome,
        Err(violation) => {
            tracing::error!(
                checker = violation.checker(),
                file = violation.file(),
                "invariant violated"
            );
            return Ok(RunReport {
                stdout: String::new(),
                stderr: format!(
                    "kfir: internal error while checking {}\n  {violation}\n",
                    violation.file()
                ),
                exit_code: EXIT_INTERNAL_ERROR,
            });
        }
    };

    tracing::info!(
        files = outcome.files_checked,
        diagnostics = outcome.diagnostics.len(),
        "check finished"
    );
    let stdout = match args.format {
        OutputFormat::Json => {
            let mut json =
                render_json(&outcome.diagnostics).context("failed to serialize diagnostics")?;
            json.push('\n');
            json
        }
        OutputFormat::Text => {
            let reporter = Reporter::new(color);
            let mut text = reporter.render(&outcome.diagnostics);
            if !text.is_empty() {
                text.push_str("\n\n");
            }
            text.push_str(&reporter.summary(&outcome));
            text.push('\n');
            text
        }
    };
    Ok(RunReport {
        stdout,
        stderr: String::new(),
        exit_code: outcome.exit_code(),
    })
}
