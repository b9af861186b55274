//! Per-model CLI actions: report, dump, JSON summary and OBJ export.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use super::display_name;
use crate::cli::Cli;
use crate::cli::progress::DISK;
use crate::converter::{ObjOptions, export_obj};
use crate::formats::model::{BatchEntry, DumpOptions, ModelInfo, dump_model};

/// Run the requested actions on one decoded entry.
pub fn process(entry: BatchEntry, output: Option<&Path>, cli: &Cli) -> anyhow::Result<()> {
    let name = display_name(&entry.path);
    let model = entry.result?;

    if !cli.quiet {
        println!("[{name}] read {} nodes  ({} µs)", model.nodes.len(), entry.elapsed.as_micros());
    }

    if cli.dump {
        let options = DumpOptions {
            include_empty_nodes: cli.include_empty,
            include_bones: cli.include_bones,
            include_transforms: cli.transforms,
        };
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        dump_model(&model, &mut out, &options)?;
        out.flush()?;
    }

    if cli.json {
        let info = ModelInfo::from_model(&model, entry.path.to_string_lossy());
        println!("{}", info.to_json_pretty()?);
    }

    if let Some(dest) = output {
        let start = Instant::now();
        let stats = export_obj(&model, dest, &ObjOptions { one_based: cli.one_based })?;
        if !cli.quiet {
            println!(
                "[{name}] {DISK}wrote Wavefront OBJ: {}  ({} faces, {} µs)",
                dest.display(),
                stats.faces,
                start.elapsed().as_micros()
            );
        }
    }

    Ok(())
}
