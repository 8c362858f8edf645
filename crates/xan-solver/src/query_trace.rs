//! Verdict events for the solver's public decisions.
//!
//! Every `is_convertible`, `classify` and `should_ignore` call emits one
//! `trace` event under target `xan::query_json` naming the types it was
//! asked about, the verdict, and for conversions the core library that
//! gates the string coercions. Read them with
//! `XAN_LOG=xan::query_json=trace XAN_LOG_FORMAT=json`.
//!
//! `XAN_QUERY_RUN_ID` tags every event of one process, so traces of several
//! analyzer runs can be merged.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{Level, trace};
use xan_common::{LibraryFamily, LibraryVersion};
use xan_universe::{TypeId, TypeKind, TypeUniverse};

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);
static QUERY_RUN_ID: OnceLock<String> = OnceLock::new();

fn run_id() -> &'static str {
    QUERY_RUN_ID
        .get_or_init(|| std::env::var("XAN_QUERY_RUN_ID").unwrap_or_else(|_| "default".to_string()))
        .as_str()
}

/// An open query. Built only when the target is enabled, so the display
/// names are never computed otherwise.
pub(crate) struct Query {
    id: u64,
    op: &'static str,
    subject: String,
    gate: Option<String>,
    started: Instant,
}

impl Query {
    pub(crate) fn unary(op: &'static str, universe: &dyn TypeUniverse, ty: TypeId) -> Option<Self> {
        enabled().then(|| Self::new(op, describe(universe, ty)))
    }

    pub(crate) fn relation(
        op: &'static str,
        universe: &dyn TypeUniverse,
        source: TypeId,
        destination: TypeId,
    ) -> Option<Self> {
        enabled().then(|| {
            let subject = format!(
                "{} -> {}",
                describe(universe, source),
                describe(universe, destination)
            );
            Self::new(op, subject)
        })
    }

    fn new(op: &'static str, subject: String) -> Self {
        Query {
            id: NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed),
            op,
            subject,
            gate: None,
            started: Instant::now(),
        }
    }

    /// Records the family whose version decided version-gated rules.
    pub(crate) fn gated_by(mut self, family: Option<LibraryFamily>, version: Option<LibraryVersion>) -> Self {
        self.gate = Some(match (family, version) {
            (None, _) => "none".to_string(),
            (Some(family), None) => format!("{family}@unversioned"),
            (Some(family), Some(version)) => format!("{family}@{version}"),
        });
        self
    }

    pub(crate) fn finish(self, verdict: &str) {
        trace!(
            target: "xan::query_json",
            event = "verdict",
            run_id = run_id(),
            query_id = self.id,
            op = self.op,
            subject = %self.subject,
            verdict,
            gate = self.gate.as_deref().unwrap_or("-"),
            elapsed_us = self.started.elapsed().as_micros() as u64
        );
    }
}

fn enabled() -> bool {
    tracing::enabled!(target: "xan::query_json", Level::TRACE)
}

/// Foreign handles have no display name worth printing.
fn describe(universe: &dyn TypeUniverse, ty: TypeId) -> String {
    match universe.type_kind(ty) {
        TypeKind::Unknown => format!("#{}", ty.0),
        _ => universe.display_name(ty),
    }
}

#[cfg(test)]
#[path = "../tests/query_trace_tests.rs"]
mod tests;
