use super::*;
use crate::test_support::{CountingUniverse, named, program, version};
use crate::{CapabilityResolver, VersionOverrides};
use xan_universe::TypeTable;

fn resolve(table: &TypeTable) -> CapabilitySnapshot<'_> {
    CapabilityResolver::new(table).resolve()
}

#[test]
fn snapshot_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CapabilitySnapshot<'static>>();
}

#[test]
fn empty_snapshot_answers_absent_everywhere() {
    let table = program(&[]);
    let snapshot = CapabilitySnapshot::empty(&table);

    assert_eq!(snapshot.feature_flags(), FeatureFlags::default());
    assert!(snapshot.families().is_empty());
    for ty in WellKnownType::ALL {
        assert_eq!(snapshot.type_handle(ty), None, "{ty:?}");
    }
    assert_eq!(snapshot.core().fact_attribute(), None);
    assert_eq!(snapshot.assert().assert_type(), None);
    assert_eq!(snapshot.abstractions().message_sink(), None);
    assert_eq!(snapshot.execution().xunit_test_case(), None);
    assert_eq!(snapshot.runner_utility().runner_long_lived_marshal_by_ref_object(), None);
    assert_eq!(snapshot.runner_utility().version(), None);
}

#[test]
fn second_generation_takes_precedence_per_concern() {
    let table = program(&[("xunit.core", "2.1.0"), ("xunit.v3.core", "1.0.0")]);
    let snapshot = resolve(&table);

    let flags = snapshot.feature_flags();
    assert!(flags.supports_default_parameter_values);
    assert!(flags.supports_parameter_arrays);
    assert!(flags.supports_string_to_temporal_conversion);
    assert!(flags.supports_theory_data_row);
    assert!(snapshot.core().theory_data_row().is_some());
    assert_eq!(
        snapshot.core().data_attribute(),
        Some(named(&table, "Xunit.v3.DataAttribute"))
    );

    // The first-generation context is still reachable on its own.
    let v2 = snapshot.v2_core().expect("xunit.core referenced");
    assert!(!v2.supports_parameter_arrays());
    assert_eq!(v2.data_attribute(), Some(named(&table, "Xunit.Sdk.DataAttribute")));
}

#[test]
fn concerns_compose_independently() {
    let table = program(&[("xunit.v3.assert", "1.0.0")]);
    let snapshot = resolve(&table);

    assert!(snapshot.assert().supports_fail_assertion());
    assert!(snapshot.assert().supports_inexact_type_assertions());
    assert!(!snapshot.core().supports_default_parameter_values());
    assert!(!snapshot.core().supports_theory_data_row());
    assert_eq!(snapshot.core().family(), None);
    assert_eq!(snapshot.assert().assert_type(), Some(named(&table, "Xunit.Assert")));
}

#[test]
fn mixed_generations_resolve_older_only_identifiers() {
    let table = program(&[("xunit.abstractions", "2.0.3"), ("xunit.v3.common", "1.0.0")]);
    let snapshot = resolve(&table);

    assert_eq!(snapshot.abstractions().family(), Some(LibraryFamily::CommonV3));
    // Only the first generation defines this marker.
    assert_eq!(snapshot.abstractions().xunit_serializable(), None);
    assert_eq!(
        snapshot.type_handle(WellKnownType::XunitSerializable),
        Some(named(&table, "Xunit.Abstractions.IXunitSerializable"))
    );
    assert_eq!(
        snapshot.type_handle(WellKnownType::CustomXunitSerializable),
        Some(named(&table, "Xunit.Sdk.IXunitSerializable"))
    );
    // Both define this one; the newer wins.
    assert_eq!(
        snapshot.type_handle(WellKnownType::MessageSink),
        Some(named(&table, "Xunit.Sdk.IMessageSink"))
    );
}

#[test]
fn runner_marshalling_base_differs_from_execution() {
    let table = program(&[("xunit.execution.dotnet", "2.4.2"), ("xunit.runner.utility.netcoreapp10", "2.4.2")]);
    let snapshot = resolve(&table);

    assert_eq!(
        snapshot.execution().long_lived_marshal_by_ref_object(),
        Some(named(&table, "Xunit.LongLivedMarshalByRefObject"))
    );
    assert_eq!(
        snapshot.runner_utility().runner_long_lived_marshal_by_ref_object(),
        Some(named(&table, "Xunit.Sdk.LongLivedMarshalByRefObject"))
    );
}

#[test]
fn handles_resolve_lazily_and_once() {
    let universe = CountingUniverse::new(program(&[("xunit.core", "2.4.2")]));
    let snapshot = CapabilityResolver::new(&universe).resolve();
    assert_eq!(universe.lookups(), 0);

    let fact = snapshot.core().fact_attribute();
    assert!(fact.is_some());
    assert_eq!(snapshot.core().fact_attribute(), fact);
    assert_eq!(snapshot.type_handle(WellKnownType::FactAttribute), fact);
    assert_eq!(universe.lookups(), 1);

    // Identifiers the family does not define never reach the universe.
    assert_eq!(snapshot.core().theory_data_row(), None);
    assert_eq!(universe.lookups(), 1);
}

#[test]
fn racing_first_access_resolves_each_handle_once() {
    use rayon::prelude::*;

    let universe = CountingUniverse::new(program(&[("xunit.core", "2.4.2")]));
    let snapshot = CapabilityResolver::new(&universe).resolve();

    let answers: Vec<Vec<Option<TypeId>>> = (0..32)
        .into_par_iter()
        .map(|round| {
            let mut order = WellKnownType::ALL.to_vec();
            let len = order.len();
            order.rotate_left(round % len);
            let mut handles: Vec<_> = order
                .into_iter()
                .map(|ty| (ty, snapshot.type_handle(ty)))
                .collect();
            handles.sort_by_key(|(ty, _)| *ty);
            handles.into_iter().map(|(_, handle)| handle).collect()
        })
        .collect();

    assert!(answers.windows(2).all(|pair| pair[0] == pair[1]));
    let defined = WellKnownType::ALL
        .into_iter()
        .filter(|ty| ty.qualified_name(LibraryFamily::CoreV2).is_some())
        .count();
    assert!(defined > 0);
    assert_eq!(universe.lookups(), defined);
}

#[test]
fn absent_handles_are_cached_too() {
    // Overridden but unreferenced: the surface was never declared.
    let universe = CountingUniverse::new(TypeTable::with_core_library());
    let overrides = VersionOverrides::new().with(LibraryFamily::CoreV3, version("1.0.0"));
    let snapshot = CapabilityResolver::new(&universe)
        .with_overrides(overrides)
        .resolve();

    assert_eq!(snapshot.core().theory_data_row(), None);
    assert_eq!(snapshot.core().theory_data_row(), None);
    assert_eq!(universe.lookups(), 1);
    assert!(snapshot.core().supports_theory_data_row());
}

#[test]
fn families_are_listed_in_family_order() {
    let table = program(&[
        ("xunit.v3.assert", "1.0.0"),
        ("xunit.assert", "2.9.3"),
        ("xunit.core", "2.4.2"),
    ]);
    let snapshot = resolve(&table);

    assert_eq!(
        snapshot.families(),
        vec![
            (LibraryFamily::CoreV2, Some(version("2.4.2"))),
            (LibraryFamily::AssertV2, Some(version("2.9.3"))),
            (LibraryFamily::AssertV3, Some(version("1.0.0"))),
        ]
    );
    assert!(snapshot.has_v2_references());
    assert!(snapshot.has_v3_references());
}

#[test]
fn system_types_resolve_without_framework_references() {
    let table = program(&[]);
    let snapshot = resolve(&table);
    for ty in SystemType::ALL {
        assert_eq!(
            snapshot.system_type(ty),
            Some(named(&table, ty.qualified_name())),
            "{ty:?}"
        );
    }

    let bare = TypeTable::new();
    let snapshot = CapabilitySnapshot::empty(&bare);
    assert_eq!(snapshot.system_type(SystemType::Guid), None);
}

#[test]
fn feature_flag_entries_follow_field_order() {
    let flags = FeatureFlags {
        supports_parameter_arrays: true,
        supports_inexact_type_assertions: true,
        ..FeatureFlags::default()
    };
    let names: Vec<_> = flags.entries().iter().map(|(name, _)| *name).collect();
    assert_eq!(names[0], "supports_default_parameter_values");
    assert_eq!(names[6], "supports_inexact_type_assertions");

    let enabled: Vec<_> = flags
        .entries()
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect();
    assert_eq!(enabled, ["supports_parameter_arrays", "supports_inexact_type_assertions"]);
}

#[test]
fn debug_output_lists_families() {
    let table = program(&[("xunit.core", "2.2.0")]);
    let rendered = format!("{:?}", resolve(&table));
    assert!(rendered.contains("CoreV2"), "{rendered}");
    assert!(rendered.contains("supports_parameter_arrays: true"), "{rendered}");
}
