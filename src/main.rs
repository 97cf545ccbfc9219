//! Livecfg command-line entry point.
//!
//! Binds a config file the same way an application would and prints what the
//! store sees, either once or on every change.

use std::{error::Error, process};

use clap::Parser;
use livecfg::{
    cli::{self, Cli, formatting::format_error},
    tracing_config,
};
use tracing::{Instrument, info_span};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    let guard = match args.log_dir.as_deref() {
        Some(dir) => Some(tracing_config::init_with_file(dir)?),
        None => {
            tracing_config::init()?;
            None
        }
    };

    let result = cli::run(args).instrument(info_span!("livecfg")).await;

    match result {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            drop(guard);
            process::exit(1);
        }
    }
}
