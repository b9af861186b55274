//! Command execution for the `grimmodel` binary

pub mod model;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;

use super::Cli;
use super::progress::{CUBE, LOOKING_GLASS, print_done, print_step, simple_bar};
use crate::formats::model::{BatchEntry, ReadOptions, decode_batch, find_model_files, read_model_with};

/// Per-run tally of processed files.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

impl Summary {
    /// True when no file failed; the process exits with 1 otherwise.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Decode every input and run the requested actions on each model.
///
/// Per-file failures are reported and counted, not returned. Only setup
/// problems (no inputs found, unusable output directory, thread pool)
/// abort the run.
pub fn execute(cli: &Cli) -> anyhow::Result<Summary> {
    let start = Instant::now();
    let inputs = collect_inputs(&cli.inputs);
    if inputs.is_empty() {
        anyhow::bail!("No .model files found");
    }
    let outputs = plan_outputs(&inputs, cli.output.as_deref())?;
    let files: Vec<PathBuf> = inputs.into_iter().map(|input| input.path).collect();

    let batch = files.len() > 1;
    let chatty = !cli.quiet && !cli.dump;

    if chatty && batch {
        print_step(1, 2, LOOKING_GLASS, &format!("Found {} model files", files.len()));
        print_step(2, 2, CUBE, "Decoding...");
    }

    let read_options = ReadOptions { validate: !cli.no_validate };
    let bar = (chatty && batch).then(|| simple_bar(files.len() as u64, "Decoding"));

    let entries: Vec<BatchEntry> = match cli.jobs {
        Some(jobs) if batch => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .context("Failed to create thread pool")?;
            pool.install(|| {
                decode_batch(&files, &read_options, |p| {
                    if let Some(pb) = &bar {
                        pb.set_position(p.current as u64);
                    }
                })
            })
        }
        _ => files
            .iter()
            .map(|path| {
                let file_start = Instant::now();
                let result = read_model_with(path, &read_options);
                if let Some(pb) = &bar {
                    pb.inc(1);
                }
                BatchEntry { path: path.clone(), elapsed: file_start.elapsed(), result }
            })
            .collect(),
    };

    if let Some(pb) = bar {
        pb.finish_and_clear();
    }

    let mut summary = Summary::default();
    for (entry, output) in entries.into_iter().zip(outputs) {
        let name = display_name(&entry.path);
        match model::process(entry, output.as_deref(), cli) {
            Ok(()) => summary.succeeded += 1,
            Err(e) => {
                tracing::error!("{name}: {e:#}");
                eprintln!("[{name}]: {e:#}");
                summary.failed += 1;
            }
        }
    }

    if chatty && batch {
        print_done(start.elapsed(), summary.succeeded, summary.failed);
    }

    Ok(summary)
}

/// A model file to process and where it sits below the input it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InputFile {
    pub path: PathBuf,
    /// Path below the searched directory, or the bare file name for file inputs
    pub relative: PathBuf,
}

impl InputFile {
    fn single(path: PathBuf) -> Self {
        let relative = path.file_name().map_or_else(|| path.clone(), PathBuf::from);
        Self { path, relative }
    }
}

/// Expand directories into the `.model` files below them, keeping the order
/// inputs were given in.
fn collect_inputs(inputs: &[PathBuf]) -> Vec<InputFile> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = find_model_files(input);
            if found.is_empty() {
                tracing::warn!("No .model files in {}", input.display());
            }
            files.extend(found.into_iter().map(|path| {
                let relative = path.strip_prefix(input).map_or_else(
                    |_| path.file_name().map_or_else(|| path.clone(), PathBuf::from),
                    Path::to_path_buf,
                );
                InputFile { path, relative }
            }));
        } else {
            files.push(InputFile::single(input.clone()));
        }
    }
    files
}

/// One OBJ destination per file.
///
/// A single input writes to the output path itself. Several inputs mirror
/// their paths below the output directory as `<relative>.obj`; destinations
/// that would still collide get a `-2`, `-3`, ... suffix.
fn plan_outputs(files: &[InputFile], output: Option<&Path>) -> anyhow::Result<Vec<Option<PathBuf>>> {
    let Some(output) = output else {
        return Ok(vec![None; files.len()]);
    };

    if files.len() == 1 {
        return Ok(vec![Some(output.to_path_buf())]);
    }

    let mut taken = HashSet::new();
    let mut outputs = Vec::with_capacity(files.len());
    for file in files {
        let base = output.join(&file.relative).with_extension("obj");
        let mut dest = base.clone();
        let mut suffix = 2;
        while !taken.insert(dest.clone()) {
            let stem = base.file_stem().map_or_else(|| "model".into(), |s| s.to_string_lossy());
            dest = base.with_file_name(format!("{stem}-{suffix}.obj"));
            suffix += 1;
        }
        if dest != base {
            tracing::warn!("{} would overwrite {}, writing {}", file.path.display(), base.display(), dest.display());
        }

        let dir = dest.parent().unwrap_or(output);
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        outputs.push(Some(dest));
    }

    Ok(outputs)
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
