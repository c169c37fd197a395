#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use kfir_cli::args::{CliArgs, Command, OutputFormat};
use kfir_cli::driver;

fn main() -> Result<()> {
    // KFIR_LOG / KFIR_LOG_FORMAT, see tracing_config.rs.
    kfir_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    match args.command {
        Command::Check(check) => {
            let color = !check.no_color
                && check.format == OutputFormat::Text
                && std::io::stdout().is_terminal();
            let report = driver::run_check(&check, color)?;
            print!("{}", report.stdout);
            if !report.stderr.is_empty() {
                eprint!("{}", report.stderr);
            }
            std::process::exit(report.exit_code);
        }
    }
}
