use std::process;

use clap::Parser;

use moldenbridge::interfaces::cli::{configure_logging, log_error, log_heading, Cli};
use moldenbridge::interfaces::InputHandle;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = configure_logging(cli.output.as_deref(), cli.verbose) {
        eprintln!("{err:#}");
        process::exit(1);
    }
    log_heading();
    if let Err(err) = cli.handle() {
        log_error(&err);
        process::exit(1);
    }
}
