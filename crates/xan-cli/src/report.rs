use colored::Colorize;
use indexmap::IndexMap;
use serde::Serialize;

use xan_common::{LibraryFamily, LibraryVersion};
use xan_solver::{CapabilitySnapshot, SerializabilityTier, WellKnownType};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyEntry {
    pub family: LibraryFamily,
    pub version: Option<LibraryVersion>,
}

/// Resolved families, flags and well-known handles of one program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityReport {
    pub families: Vec<FamilyEntry>,
    pub flags: IndexMap<&'static str, bool>,
    /// Display names of resolved well-known types; `None` when unresolved.
    pub well_known: IndexMap<WellKnownType, Option<String>>,
}

impl CapabilityReport {
    pub fn from_snapshot(snapshot: &CapabilitySnapshot<'_>) -> Self {
        let universe = snapshot.universe();
        CapabilityReport {
            families: snapshot
                .families()
                .into_iter()
                .map(|(family, version)| FamilyEntry { family, version })
                .collect(),
            flags: snapshot.feature_flags().entries().into_iter().collect(),
            well_known: WellKnownType::ALL
                .into_iter()
                .map(|ty| (ty, snapshot.type_handle(ty).map(|id| universe.display_name(id))))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    pub source: String,
    pub destination: String,
    pub convertible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationEntry {
    #[serde(rename = "type")]
    pub type_name: String,
    pub tier: SerializabilityTier,
    pub ignored: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub entries: Vec<ClassificationEntry>,
}

/// Text rendering of reports.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render_capabilities(&self, report: &CapabilityReport) -> String {
        let mut out = String::new();

        out.push_str(&self.heading("Families"));
        if report.families.is_empty() {
            out.push_str("  (none)\n");
        }
        for entry in &report.families {
            let version = entry
                .version
                .map_or_else(|| "unversioned".to_string(), |version| version.to_string());
            out.push_str(&format!("  {:<24} {version}\n", entry.family.as_str()));
        }

        out.push('\n');
        out.push_str(&self.heading("Flags"));
        for (name, enabled) in &report.flags {
            out.push_str(&format!("  {name:<40} {}\n", self.verdict(*enabled)));
        }

        out.push('\n');
        out.push_str(&self.heading("Well-known types"));
        for (ty, name) in &report.well_known {
            let name = match name {
                Some(name) => name.clone(),
                None => self.dim("-"),
            };
            out.push_str(&format!("  {:<40} {name}\n", format!("{ty:?}")));
        }
        out
    }

    pub fn render_conversion(&self, report: &ConversionReport) -> String {
        format!(
            "{} -> {}: {}\n",
            report.source,
            report.destination,
            self.verdict(report.convertible)
        )
    }

    pub fn render_classification(&self, report: &ClassificationReport) -> String {
        let mut out = String::new();
        for entry in &report.entries {
            out.push_str(&format!("{}: {}", entry.type_name, self.tier(entry.tier)));
            if entry.ignored {
                out.push_str(&format!(" {}", self.dim("(ignored)")));
            }
            out.push('\n');
        }
        out
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            format!("{}\n", text.bold())
        } else {
            format!("{text}\n")
        }
    }

    fn verdict(&self, value: bool) -> String {
        let text = if value { "yes" } else { "no" };
        match (self.color, value) {
            (false, _) => text.to_string(),
            (true, true) => text.green().to_string(),
            (true, false) => text.red().to_string(),
        }
    }

    fn tier(&self, tier: SerializabilityTier) -> String {
        let text = tier.as_str();
        if !self.color {
            return text.to_string();
        }
        match tier {
            SerializabilityTier::Always => text.green().to_string(),
            SerializabilityTier::Possibly => text.yellow().to_string(),
            SerializabilityTier::Never => text.red().to_string(),
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}
