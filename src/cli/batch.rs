//! Batch normalization over many files.
//!
//! Every file is attempted. Files are processed in parallel with rayon; a
//! skip (no usable viewBox) is reported but is not a failure, and nothing is
//! written for it.
//!
//! With an output directory, inputs whose output already exists are skipped
//! unless `force` is set, so a rerun only processes new files. In-place runs
//! always rewrite.

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::logger::ProgressLine;
use crate::pipeline::{PipelineOptions, Processed, process_svg};
use crate::utils::plural_count;

/// Final state of one input file.
#[derive(Debug)]
pub enum FileOutcome {
    /// Normalized and written to this path.
    Written(PathBuf),
    /// Left alone (reason).
    Skipped(String),
    Failed(anyhow::Error),
}

/// Counts and failures of one batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub written: usize,
    pub skipped: usize,
    /// Failed inputs with their error chain.
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.written + self.skipped + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    fn record(&mut self, input: PathBuf, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Written(_) => self.written += 1,
            FileOutcome::Skipped(_) => self.skipped += 1,
            FileOutcome::Failed(e) => self.failed.push((input, format!("{e:#}"))),
        }
    }
}

/// One planned file: its input and where the result goes.
struct Job {
    input: PathBuf,
    output: Result<PathBuf, String>,
}

/// Normalize `files`, writing into `output_dir` or in place.
///
/// Existing outputs in `output_dir` are kept unless `force` is set.
/// `stop` is polled before each file starts; once it returns true the
/// remaining files are reported as cancelled.
pub fn run_batch(
    files: &[PathBuf],
    output_dir: Option<&Path>,
    force: bool,
    options: &PipelineOptions,
    stop: &(dyn Fn() -> bool + Sync),
) -> Result<BatchSummary> {
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let jobs = plan_outputs(files, output_dir);
    crate::debug!("normalize"; "processing {}", plural_count(jobs.len(), "file"));

    let progress = ProgressLine::new("normalize", &[("svg", jobs.len())]);
    let outcomes: Vec<_> = jobs
        .into_par_iter()
        .map(|job| {
            let outcome = if stop() {
                FileOutcome::Failed(anyhow!("cancelled"))
            } else {
                match job.output {
                    Ok(output) if output_dir.is_some() && !force && output.exists() => {
                        FileOutcome::Skipped(format!(
                            "{} exists, use --force to rewrite",
                            output.display()
                        ))
                    }
                    Ok(output) => normalize_file(&job.input, &output, options),
                    Err(reason) => FileOutcome::Failed(anyhow!(reason)),
                }
            };
            report(&job.input, &outcome);
            progress.inc("svg");
            (job.input, outcome)
        })
        .collect();
    progress.finish();

    let mut summary = BatchSummary::default();
    for (input, outcome) in outcomes {
        summary.record(input, outcome);
    }
    Ok(summary)
}

/// Map inputs to outputs. A later input whose output path was already
/// claimed fails instead of overwriting the earlier result.
fn plan_outputs(files: &[PathBuf], output_dir: Option<&Path>) -> Vec<Job> {
    let mut claimed: FxHashMap<PathBuf, &Path> = FxHashMap::default();
    files
        .iter()
        .map(|input| {
            let output = match output_dir {
                None => Ok(input.clone()),
                Some(dir) => input
                    .file_name()
                    .map(|name| dir.join(name))
                    .ok_or_else(|| "input has no file name".to_string()),
            };
            let output = output.and_then(|output| match claimed.get(&output) {
                Some(first) => Err(format!(
                    "output {} already written by {}",
                    output.display(),
                    first.display()
                )),
                None => {
                    claimed.insert(output.clone(), input);
                    Ok(output)
                }
            });
            Job {
                input: input.clone(),
                output,
            }
        })
        .collect()
}

fn normalize_file(input: &Path, output: &Path, options: &PipelineOptions) -> FileOutcome {
    let result = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))
        .and_then(|content| process_svg(&content, options));

    match result {
        Ok(Processed::Normalized { svg, report }) => {
            crate::debug!(
                "normalize";
                "{}: viewBox {:?} -> {:?}, flatten {:?}",
                input.display(),
                report.viewbox.before,
                report.viewbox.after,
                report.flatten
            );
            match fs::write(output, svg) {
                Ok(()) => FileOutcome::Written(output.to_path_buf()),
                Err(e) => FileOutcome::Failed(
                    anyhow::Error::new(e).context(format!("Failed to write {}", output.display())),
                ),
            }
        }
        Ok(Processed::Skipped(reason)) => FileOutcome::Skipped(reason.to_string()),
        Err(e) => FileOutcome::Failed(e),
    }
}

fn report(input: &Path, outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Written(output) => {
            crate::debug!("normalize"; "{} -> {}", input.display(), output.display());
        }
        FileOutcome::Skipped(reason) => crate::log!("skip"; "{}: {}", input.display(), reason),
        FileOutcome::Failed(e) => crate::log!("error"; "{}: {:#}", input.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::{ViewBoxPolicy, Viewport};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn never() -> bool {
        false
    }

    fn options() -> PipelineOptions {
        let mut options = PipelineOptions::new(Viewport::new(100.0, 100.0));
        options.policy = ViewBoxPolicy::OriginReset;
        options
    }

    #[test]
    fn test_degenerate_file_skipped_others_written() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        let good = src.path().join("good.svg");
        let flat = src.path().join("flat.svg");
        let other = src.path().join("other.svg");
        fs::write(&good, r#"<svg viewBox="0 0 200 100"><path d="M200 100"/></svg>"#).unwrap();
        fs::write(&flat, r#"<svg viewBox="0 0 0 50"><path d="M0 0"/></svg>"#).unwrap();
        fs::write(&other, r#"<svg viewBox="0 0 50 50"/>"#).unwrap();

        let files = vec![good, flat, other];
        let summary = run_batch(&files, Some(out.path()), false, &options(), &never).unwrap();

        assert_eq!(summary.written, 2);
        assert_eq!(summary.skipped, 1);
        assert!(!summary.has_failures());
        assert_eq!(summary.total(), 3);

        assert_eq!(
            fs::read_to_string(out.path().join("good.svg")).unwrap(),
            r#"<svg viewBox="0 0 100 100"><path d="M100 100"/></svg>"#
        );
        assert!(!out.path().join("flat.svg").exists());
        assert!(out.path().join("other.svg").exists());
    }

    #[test]
    fn test_failures_do_not_stop_batch() {
        let src = TempDir::new().unwrap();
        let bad = src.path().join("bad.svg");
        let good = src.path().join("good.svg");
        let missing = src.path().join("missing.svg");
        fs::write(&bad, r#"<svg viewBox="0 0 1 1"><path d="M0 0 L1"/></svg>"#).unwrap();
        fs::write(&good, r#"<svg viewBox="0 0 1 1"/>"#).unwrap();

        let files = vec![bad.clone(), good.clone(), missing.clone()];
        let summary = run_batch(&files, None, false, &options(), &never).unwrap();

        assert_eq!(summary.written, 1);
        let failed: Vec<_> = summary.failed.iter().map(|(path, _)| path.clone()).collect();
        assert_eq!(failed, vec![bad.clone(), missing]);
        // In place: the good file was rewritten, the bad one left alone.
        assert_eq!(
            fs::read_to_string(&good).unwrap(),
            r#"<svg viewBox="0 0 100 100"/>"#
        );
        assert_eq!(
            fs::read_to_string(&bad).unwrap(),
            r#"<svg viewBox="0 0 1 1"><path d="M0 0 L1"/></svg>"#
        );
    }

    #[test]
    fn test_output_collision_fails_later_input() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::create_dir(src.path().join("a")).unwrap();
        fs::create_dir(src.path().join("b")).unwrap();
        let first = src.path().join("a/icon.svg");
        let second = src.path().join("b/icon.svg");
        fs::write(&first, r#"<svg viewBox="0 0 1 1"/>"#).unwrap();
        fs::write(&second, r#"<svg viewBox="0 0 2 2"/>"#).unwrap();

        let summary =
            run_batch(&[first, second.clone()], Some(out.path()), false, &options(), &never).unwrap();

        assert_eq!(summary.written, 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, second);
        assert!(summary.failed[0].1.contains("already written"));
    }

    #[test]
    fn test_stop_cancels_remaining_files() {
        let src = TempDir::new().unwrap();
        let files: Vec<_> = (0..4)
            .map(|i| {
                let path = src.path().join(format!("{i}.svg"));
                fs::write(&path, r#"<svg viewBox="0 0 1 1"/>"#).unwrap();
                path
            })
            .collect();

        let polled = AtomicUsize::new(0);
        let stop = || polled.fetch_add(1, Ordering::SeqCst) >= 1;
        let summary = run_batch(&files, None, false, &options(), &stop).unwrap();

        assert_eq!(summary.total(), 4);
        assert_eq!(summary.written, 1);
        assert_eq!(summary.failed.len(), 3);
        assert!(summary.failed.iter().all(|(_, e)| e == "cancelled"));
    }

    #[test]
    fn test_existing_output_kept_unless_forced() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let input = src.path().join("icon.svg");
        let output = out.path().join("icon.svg");
        fs::write(&input, r#"<svg viewBox="0 0 50 50"/>"#).unwrap();
        fs::write(&output, "previous run").unwrap();
        let files = vec![input];

        let summary = run_batch(&files, Some(out.path()), false, &options(), &never).unwrap();
        assert_eq!((summary.written, summary.skipped), (0, 1));
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous run");

        let summary = run_batch(&files, Some(out.path()), true, &options(), &never).unwrap();
        assert_eq!((summary.written, summary.skipped), (1, 0));
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            r#"<svg viewBox="0 0 100 100"/>"#
        );
    }

    #[test]
    fn test_plan_outputs_in_place() {
        let files = vec![PathBuf::from("x/a.svg"), PathBuf::from("x/a.svg")];
        let jobs = plan_outputs(&files, None);
        assert_eq!(jobs[0].output.as_deref().unwrap(), Path::new("x/a.svg"));
        assert!(jobs[1].output.is_err());
    }
}
