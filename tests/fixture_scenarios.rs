//! Scenario tests over the aspect header fixtures.
//! `miscaspects.h` is fully valid; `package.h` drops the terminators.

use aspect_names::domain::aspect::IssueKind;
use aspect_names::domain::error::{ScanError, StructuralErrorKind};
use aspect_names::domain::report::{SourceUnit, UnitReport};
use aspect_names::domain::scanner::AspectScanner;

const MISC_ASPECTS: &str = include_str!("fixtures/aspectnames/miscaspects.h");
const PACKAGE: &str = include_str!("fixtures/aspectnames/package.h");

fn scan(name: &str, text: &str) -> UnitReport {
    AspectScanner::default().scan(&SourceUnit::new(name, text))
}

fn names(report: &UnitReport, qualified: &str) -> Vec<String> {
    let record = report
        .records
        .iter()
        .find(|r| r.qualified_name() == qualified)
        .unwrap_or_else(|| panic!("{} not found in {:?}", qualified, report.records));
    record
        .declaration
        .enumerators
        .iter()
        .map(|e| e.name.clone())
        .collect()
}

/// Count `enum class <Name>` declarations whose name ends in `Aspect`.
fn count_aspect_enums(text: &str) -> usize {
    let words: Vec<&str> = text
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .collect();
    words
        .windows(3)
        .filter(|w| w[0] == "enum" && w[1] == "class" && w[2].ends_with("Aspect"))
        .count()
}

#[test]
fn test_module_a_aspect_with_sloppy_spacing() {
    let report = scan("miscaspects.h", MISC_ASPECTS);
    assert!(report.error.is_none(), "{:?}", report.error);
    let record = &report.records[0];
    assert_eq!(record.qualified_name(), "package::a::ModuleAAspect");
    assert_eq!(names(&report, "package::a::ModuleAAspect"), vec!["aOne", "aTwo", "_end"]);
    assert_eq!(record.terminator_index, Some(2));
    assert!(record.is_valid);
    assert_eq!(record.declaration.underlying_type.as_deref(), Some("int"));
}

#[test]
fn test_plain_aspect_name_with_explicit_value() {
    let report = scan("miscaspects.h", MISC_ASPECTS);
    let record = report
        .records
        .iter()
        .find(|r| r.qualified_name() == "package::b::Aspect")
        .unwrap();
    assert_eq!(names(&report, "package::b::Aspect"), vec!["bOne", "bTwo", "end", "_end"]);
    assert_eq!(record.declaration.enumerators[0].explicit_value.as_deref(), Some("42"));
    assert_eq!(record.terminator_index, Some(3));
    assert!(record.is_valid);
}

#[test]
fn test_missing_terminator_is_reported_not_rejected() {
    let report = scan("package.h", PACKAGE);
    assert!(report.error.is_none(), "{:?}", report.error);
    let record = report
        .records
        .iter()
        .find(|r| r.qualified_name() == "package::b::Aspect")
        .unwrap();
    assert_eq!(names(&report, "package::b::Aspect"), vec!["bOne", "bTwo", "end"]);
    assert!(!record.is_valid);
    assert_eq!(record.terminator_index, None);
    let kinds: Vec<&IssueKind> = record.violations.iter().map(|v| &v.kind).collect();
    assert_eq!(kinds, vec![&IssueKind::MissingTerminator]);
}

#[test]
fn test_decoy_terminator_in_nested_namespace() {
    let report = scan("miscaspects.h", MISC_ASPECTS);
    let record = report
        .records
        .iter()
        .find(|r| r.qualified_name() == "package::b::c::ModuleCAspect")
        .unwrap();
    assert_eq!(
        names(&report, "package::b::c::ModuleCAspect"),
        vec!["cOne", "cTwo", "_end_wrong", "_end"]
    );
    assert_eq!(record.terminator_index, Some(3));
    assert!(record.is_valid);
    assert_eq!(record.declaration.underlying_type.as_deref(), Some("unsigned int"));
    assert_eq!(record.declaration.enumerators[0].explicit_value.as_deref(), Some("16"));
    assert_eq!(record.declaration.resolved_values()[..2], [Some(16), Some(17)]);
}

#[test]
fn test_decoy_alone_does_not_terminate() {
    let report = scan("package.h", PACKAGE);
    let record = report
        .records
        .iter()
        .find(|r| r.qualified_name() == "package::b::c::ModuleCAspect")
        .unwrap();
    assert_eq!(
        names(&report, "package::b::c::ModuleCAspect"),
        vec!["cOne", "cTwo", "_end_wrong"]
    );
    assert_eq!(record.terminator_index, None);
    assert!(!record.is_valid);
}

#[test]
fn test_record_count_matches_aspect_declarations() {
    for (name, text) in [("miscaspects.h", MISC_ASPECTS), ("package.h", PACKAGE)] {
        let report = scan(name, text);
        assert_eq!(report.records.len(), count_aspect_enums(text), "{}", name);
        assert_eq!(report.records.len(), 3);
    }
}

#[test]
fn test_classes_never_show_up() {
    let report = scan("miscaspects.h", MISC_ASPECTS);
    assert!(report
        .records
        .iter()
        .all(|r| !r.qualified_name().ends_with("Foo") && !r.qualified_name().ends_with("Bar")));
    let extraction = AspectScanner::default().extract(MISC_ASPECTS).unwrap();
    assert_eq!(extraction.declarations.len(), 3);
}

#[test]
fn test_valid_fixture_has_no_issues() {
    let report = scan("miscaspects.h", MISC_ASPECTS);
    assert!(report.is_clean(), "{:?}", report.issues);
}

#[test]
fn test_invalid_fixture_issues_in_source_order() {
    let report = scan("package.h", PACKAGE);
    let subjects: Vec<&str> = report.issues.iter().map(|i| i.subject.as_str()).collect();
    assert_eq!(subjects, vec!["package::b::Aspect", "package::b::c::ModuleCAspect"]);
    assert_eq!(report.invalid_records(), 2);
}

#[test]
fn test_scanning_twice_is_identical() {
    assert_eq!(scan("miscaspects.h", MISC_ASPECTS), scan("miscaspects.h", MISC_ASPECTS));
    assert_eq!(scan("package.h", PACKAGE), scan("package.h", PACKAGE));
}

#[test]
fn test_stray_closing_brace_aborts_the_unit() {
    let text = format!("{}\n}}\n", MISC_ASPECTS);
    let report = scan("broken.h", &text);
    assert!(report.records.is_empty());
    match report.error {
        Some(ScanError::Structural { kind, position, scope }) => {
            assert_eq!(kind, StructuralErrorKind::UnmatchedClose);
            assert!(scope.is_global());
            assert_eq!(position.line, MISC_ASPECTS.lines().count() + 2);
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_truncated_fixture_is_unterminated_enum() {
    let cut = MISC_ASPECTS.find("_end_wrong").unwrap();
    let report = scan("truncated.h", &MISC_ASPECTS[..cut]);
    match report.error {
        Some(ScanError::UnterminatedEnum { name, scope, .. }) => {
            assert_eq!(name, "ModuleCAspect");
            assert_eq!(scope.to_string(), "package::b::c");
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_unterminated_comment_is_lex_error_with_scope() {
    let cut = MISC_ASPECTS.find("class Foo").unwrap();
    let text = format!("{}/* never closed", &MISC_ASPECTS[..cut]);
    let report = scan("lex.h", &text);
    match report.error {
        Some(ScanError::Lex { source, scope }) => {
            assert_eq!(scope.to_string(), "package::a");
            assert!(source.position.line > 1);
        }
        other => panic!("unexpected: {:?}", other),
    }
}
