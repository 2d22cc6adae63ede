//! disaster-response CLI binary.

use std::io::Write;
use std::process;

use env_logger::Builder;
use log::LevelFilter;

use disaster_response::cli::args::*;
use disaster_response::cli::commands::*;

fn main() {
    let Some(args) = parse_or_usage(std::env::args_os()) else {
        return;
    };

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error, // Quiet mode
        1 => LevelFilter::Warn,  // Default
        2 => LevelFilter::Info,  // -v
        _ => LevelFilter::Debug,
    };

    Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
