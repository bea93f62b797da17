mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use phone_catalog::{logging, merge, report};
use std::io;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Report(report_args) => {
            report::run(&report_args.into_config(), &mut out)?;
        }
        Command::Merge(merge_args) => {
            merge::run(&merge_args.into_config(), &mut out)?;
        }
    }

    Ok(())
}
