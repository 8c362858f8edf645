use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use xan_solver::{
    CapabilityResolver, CapabilitySnapshot, SerializabilityClassifier, VersionOverrides,
    is_convertible,
};
use xan_universe::TypeTable;

use crate::args::{CliArgs, Command, OutputFormat, ProgramArgs};
use crate::manifest::{Manifest, TypeResolver};
use crate::report::{
    CapabilityReport, ClassificationEntry, ClassificationReport, ConversionReport, Reporter,
};

/// Runs one command and returns the rendered report.
pub fn run(args: &CliArgs, color: bool) -> Result<String> {
    let reporter = Reporter::new(color);
    match &args.command {
        Command::Capabilities { program } => {
            let (table, overrides) = load_program(program)?;
            let snapshot = resolve(&table, overrides);
            let report = CapabilityReport::from_snapshot(&snapshot);
            render(args.format, &report, |report| reporter.render_capabilities(report))
        }
        Command::Convert {
            program,
            source,
            destination,
        } => {
            let (table, overrides) = load_program(program)?;
            let snapshot = resolve(&table, overrides);
            let resolver = TypeResolver::new(&table);
            let source_id = resolver
                .resolve_str(source)
                .with_context(|| format!("failed to resolve source type `{source}`"))?;
            let destination_id = resolver
                .resolve_str(destination)
                .with_context(|| format!("failed to resolve destination type `{destination}`"))?;

            let report = ConversionReport {
                source: source.clone(),
                destination: destination.clone(),
                convertible: is_convertible(source_id, destination_id, &snapshot),
            };
            render(args.format, &report, |report| reporter.render_conversion(report))
        }
        Command::Classify { program, types } => {
            let (table, overrides) = load_program(program)?;
            let snapshot = resolve(&table, overrides);
            let classifier = SerializabilityClassifier::new(&snapshot);
            let resolver = TypeResolver::new(&table);

            let entries = types
                .iter()
                .map(|name| {
                    let ty = resolver
                        .resolve_str(name)
                        .with_context(|| format!("failed to resolve type `{name}`"))?;
                    Ok(ClassificationEntry {
                        type_name: name.clone(),
                        tier: classifier.classify(ty),
                        ignored: classifier.should_ignore(ty),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let report = ClassificationReport { entries };
            render(args.format, &report, |report| reporter.render_classification(report))
        }
    }
}

/// Builds the program's type table. References and overrides given on the
/// command line win over the manifest's. The resolver takes the first
/// matching reference of each family, so command-line references go first.
fn load_program(program: &ProgramArgs) -> Result<(TypeTable, VersionOverrides)> {
    let mut manifest = match &program.manifest {
        Some(path) => Manifest::from_path(path)
            .with_context(|| format!("failed to load manifest {}", path.display()))?,
        None => Manifest::default(),
    };
    let from_manifest = std::mem::take(&mut manifest.references);
    manifest.references = program
        .references
        .iter()
        .cloned()
        .chain(from_manifest)
        .collect();

    let mut overrides = std::mem::take(&mut manifest.overrides);
    for &(family, version) in &program.overrides {
        overrides.insert(family, version);
    }

    let table = manifest.load().context("failed to build the program's types")?;
    debug!(
        references = manifest.references.len(),
        overrides = overrides.len(),
        "loaded program"
    );
    Ok((table, overrides))
}

fn resolve(table: &TypeTable, overrides: VersionOverrides) -> CapabilitySnapshot<'_> {
    CapabilityResolver::new(table)
        .with_overrides(overrides)
        .resolve()
}

fn render<T: Serialize>(
    format: OutputFormat,
    report: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text(report)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(report).context("failed to encode report")?;
            json.push('\n');
            Ok(json)
        }
    }
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod tests;
