use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use std::path::Path;
use nbhugo_core::HugoExporter;

use crate::config::load_convert_config;

pub fn add_convert_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("PATH")
                .help("Notebook file or directory of notebooks to convert")
                .default_value("./notebooks"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory for generated markdown")
                .default_value("./content"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file")
                .default_value("./nbhugo.toml"),
        )
}

pub fn make_subcommand() -> Command {
    add_convert_args(Command::new("convert"))
        .about("Convert notebooks to Hugo-compatible markdown")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    // Load cascading configuration
    let nbhugo_config = load_convert_config(args)?;
    let build_config = nbhugo_config.build_config();

    let source = Path::new(&build_config.source);
    let output_dir = Path::new(&build_config.output);

    let exporter = HugoExporter::new(nbhugo_config.export_config().clone(), output_dir);

    if source.is_file() {
        let out_path = exporter.export_file(source)?;
        println!("Exported {} -> {}", source.display(), out_path.display());
    } else {
        let written = exporter.export_dir(source)?;
        println!(
            "Exported {} notebook(s) to {}",
            written.len(),
            output_dir.display()
        );
    }

    Ok(())
}
