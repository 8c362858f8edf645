use anyhow::Result;
use clap::Parser;
use std::io::{IsTerminal, Write};

use xan::tracing_config;
use xan_cli::args::CliArgs;
use xan_cli::driver;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    match args.log_format {
        Some(format) => tracing_config::init_tracing_with(format),
        None => tracing_config::init_tracing(),
    }

    let color = !args.no_color && std::io::stdout().is_terminal();
    let output = driver::run(&args, color)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
