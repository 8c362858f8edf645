use super::*;
use crate::LibraryVersion;

fn reference(name: &str) -> LibraryReference {
    LibraryReference::versioned(name, LibraryVersion::new(2, 4, 2))
}

#[test]
fn identifies_exact_and_prefixed_names() {
    let cases = [
        ("xunit.core", Some(LibraryFamily::CoreV2)),
        ("XUNIT.CORE", Some(LibraryFamily::CoreV2)),
        ("xunit.v3.core", Some(LibraryFamily::CoreV3)),
        ("xunit.v3.core.mtp-v1", Some(LibraryFamily::CoreV3)),
        ("xunit.assert", Some(LibraryFamily::AssertV2)),
        ("xunit.v3.assert", Some(LibraryFamily::AssertV3)),
        ("xunit.abstractions", Some(LibraryFamily::AbstractionsV2)),
        ("xunit.v3.common", Some(LibraryFamily::CommonV3)),
        ("xunit.execution.desktop", Some(LibraryFamily::ExecutionV2)),
        ("Xunit.Execution.DotNet", Some(LibraryFamily::ExecutionV2)),
        ("xunit.runner.utility.netcoreapp10", Some(LibraryFamily::RunnerUtilityV2)),
        ("xunit.v3.runner.utility.net472", Some(LibraryFamily::RunnerUtilityV3)),
        ("xunit.core.extensions", None),
        ("xunit.assert.source", None),
        ("xunit.execution", None),
        ("xunit", None),
        ("nunit.framework", None),
    ];
    for (name, expected) in cases {
        assert_eq!(LibraryFamily::identify(&reference(name)), expected, "{name}");
    }
}

#[test]
fn patterns_are_disjoint() {
    for family in LibraryFamily::ALL {
        let name = match family.pattern() {
            NamePattern::Exact(name) => name.to_string(),
            NamePattern::Prefix(prefix) => format!("{prefix}platform"),
        };
        let matching: Vec<_> = LibraryFamily::ALL
            .into_iter()
            .filter(|candidate| candidate.matches_name(&name))
            .collect();
        assert_eq!(matching, vec![family], "{name}");
    }
}

#[test]
fn generation_and_concern() {
    assert_eq!(LibraryFamily::CoreV2.generation(), Generation::V2);
    assert_eq!(LibraryFamily::CommonV3.generation(), Generation::V3);
    assert_eq!(LibraryFamily::CommonV3.concern(), Concern::Abstractions);
    assert_eq!(LibraryFamily::ExecutionV2.concern(), Concern::Execution);
    assert_eq!(LibraryFamily::RunnerUtilityV3.concern(), Concern::RunnerUtility);
}

#[test]
fn parses_family_names() {
    assert_eq!("core-v2".parse(), Ok(LibraryFamily::CoreV2));
    assert_eq!("Runner_Utility_V3".parse(), Ok(LibraryFamily::RunnerUtilityV3));
    assert_eq!(
        "core".parse::<LibraryFamily>(),
        Err(UnknownFamilyError {
            input: "core".to_string()
        })
    );
    for family in LibraryFamily::ALL {
        assert_eq!(family.to_string().parse(), Ok(family));
    }
}

#[test]
fn serializes_as_kebab_case() {
    let json = serde_json::to_string(&LibraryFamily::RunnerUtilityV2).expect("serialize");
    assert_eq!(json, "\"runner-utility-v2\"");
    let family: LibraryFamily = serde_json::from_str("\"assert-v3\"").expect("deserialize");
    assert_eq!(family, LibraryFamily::AssertV3);
}
