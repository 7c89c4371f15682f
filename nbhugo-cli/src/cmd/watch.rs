use anyhow::Result;
use clap::{ArgMatches, Command};
use notify_debouncer_mini::{DebounceEventResult, new_debouncer};
use std::{
    path::{Path, PathBuf},
    sync::mpsc,
    time::Duration,
};
use nbhugo_core::HugoExporter;

use crate::config::load_watch_config;

pub fn make_subcommand() -> Command {
    crate::cmd::convert::add_convert_args(Command::new("watch"))
        .about("Convert notebooks and re-convert whenever they change")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    // Load cascading configuration
    let nbhugo_config = load_watch_config(args)?;
    let build_config = nbhugo_config.build_config();

    let source_dir = PathBuf::from(&build_config.source);
    let output_dir = PathBuf::from(&build_config.output);

    let exporter = HugoExporter::new(nbhugo_config.export_config().clone(), &output_dir);
    exporter.export_dir(&source_dir)?;

    let (tx, rx) = mpsc::channel();

    let mut debouncer = new_debouncer(
        Duration::from_millis(500), // Editors save notebooks in bursts
        move |res: DebounceEventResult| {
            if let Ok(events) = res {
                for event in events {
                    let _ = tx.send(event.path);
                }
            }
        },
    )?;

    debouncer
        .watcher()
        .watch(&source_dir, notify::RecursiveMode::Recursive)?;
    println!("Watching source directory: {}", source_dir.display());

    for path in rx {
        if !is_notebook(&path) {
            continue;
        }
        println!("Notebook changed: {}", path.display());

        match exporter.export_file(&path) {
            Ok(out_path) => println!("Re-exported to {}", out_path.display()),
            Err(e) => eprintln!("Export failed: {}", e),
        }
    }

    Ok(())
}

fn is_notebook(path: &Path) -> bool {
    path.extension().map(|ext| ext == "ipynb").unwrap_or(false)
        && !path
            .components()
            .any(|c| c.as_os_str() == ".ipynb_checkpoints")
}
