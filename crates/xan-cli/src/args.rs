use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use xan::tracing_config::LogFormat;
use xan_common::{LibraryFamily, LibraryReference, LibraryVersion};

/// CLI arguments for the xan binary.
#[derive(Parser, Debug)]
#[command(
    name = "xan",
    version,
    about = "Capability and compatibility verdicts for xUnit test analyzers"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Log format when XAN_LOG or RUST_LOG is set (overrides XAN_LOG_FORMAT).
    #[arg(long = "log-format", global = true)]
    pub log_format: Option<LogFormat>,

    /// Disable colored output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve and print the capability snapshot of a program.
    Capabilities {
        #[command(flatten)]
        program: ProgramArgs,
    },
    /// Check whether theory data of one type binds to a parameter of another.
    Convert {
        #[command(flatten)]
        program: ProgramArgs,
        /// Type of the data value, e.g. `string`.
        source: String,
        /// Type of the theory parameter, e.g. `System.Guid`.
        destination: String,
    },
    /// Classify the serializability of one or more types.
    Classify {
        #[command(flatten)]
        program: ProgramArgs,
        /// Type expressions, e.g. `int[]` or `Dictionary<string, List<string>>`.
        #[arg(required = true)]
        types: Vec<String>,
    },
}

/// How the program under analysis is described.
#[derive(Args, Debug, Default)]
pub struct ProgramArgs {
    /// Program manifest (JSON).
    #[arg(short = 'm', long)]
    pub manifest: Option<PathBuf>,

    /// Add a library reference, e.g. `xunit.core=2.4.2` or `xunit.assert`.
    #[arg(short = 'r', long = "reference", value_name = "NAME[=VERSION]", value_parser = parse_reference)]
    pub references: Vec<LibraryReference>,

    /// Override a family's version, e.g. `core-v2=2.2.0`.
    #[arg(long = "override", value_name = "FAMILY=VERSION", value_parser = parse_override)]
    pub overrides: Vec<(LibraryFamily, LibraryVersion)>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_reference(value: &str) -> Result<LibraryReference, String> {
    match value.split_once('=') {
        Some((name, version)) => {
            let version = version.parse().map_err(|err| format!("{err}"))?;
            Ok(LibraryReference::versioned(name.trim(), version))
        }
        None => Ok(LibraryReference::new(value.trim(), None)),
    }
}

fn parse_override(value: &str) -> Result<(LibraryFamily, LibraryVersion), String> {
    let (family, version) = value
        .split_once('=')
        .ok_or_else(|| format!("expected FAMILY=VERSION, got `{value}`"))?;
    let family = family.parse().map_err(|err| format!("{err}"))?;
    let version = version.parse().map_err(|err| format!("{err}"))?;
    Ok((family, version))
}

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod tests;
