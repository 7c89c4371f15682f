use clap::Command;

mod cmd;
mod config;

fn main() -> anyhow::Result<()> {
    let command = Command::new("nbhugo")
        .about("Export Jupyter notebooks to Hugo-compatible markdown")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(cmd::convert::make_subcommand())
        .subcommand(cmd::watch::make_subcommand());

    match command.get_matches().subcommand() {
        Some(("convert", args)) => cmd::convert::execute(args),
        Some(("watch", args)) => cmd::watch::execute(args),
        _ => unreachable!("subcommand is required"),
    }
}
