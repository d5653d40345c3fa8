//! LOOP001 over C# sources.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use brrr_loops::{Diagnostic, LintConfig, LintEngine, LoopCounterOptions, RuleCode};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("csharp")
        .join("ForLoopCounterChanged.cs")
}

/// Expected violation count per line, from `// Noncompliant` markers.
fn expected_lines(source: &str, skip: impl Fn(&str) -> bool) -> BTreeMap<usize, usize> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| !skip(line))
        .filter_map(|(idx, line)| {
            let count = line.matches("// Noncompliant").count();
            (count > 0).then_some((idx + 1, count))
        })
        .collect()
}

fn actual_lines(diagnostics: &[Diagnostic]) -> BTreeMap<usize, usize> {
    let mut lines = BTreeMap::new();
    for diagnostic in diagnostics {
        *lines.entry(diagnostic.location.start_line).or_insert(0) += 1;
    }
    lines
}

fn loop_config() -> LintConfig {
    LintConfig::default().with_select([RuleCode::LOOP001])
}

fn check(code: &str) -> Vec<Diagnostic> {
    let engine = LintEngine::new(loop_config());
    engine
        .check_source(Path::new("Test.cs"), code)
        .expect("C# source should be analyzed")
}

fn in_method(body: &str) -> String {
    format!("class C {{\n void M(int[] xs) {{\n{}\n }}\n}}\n", body)
}

// =============================================================================
// Fixture
// =============================================================================

#[test]
fn test_fixture_matches_markers() {
    let path = fixture();
    let source = fs::read_to_string(&path).unwrap();
    let engine = LintEngine::new(loop_config());
    let diagnostics = engine.check_file(&path).unwrap();

    assert_eq!(
        actual_lines(&diagnostics),
        expected_lines(&source, |_| false),
        "diagnostics: {:#?}",
        diagnostics
    );
}

#[test]
fn test_fixture_without_incrementor_tracking() {
    let path = fixture();
    let source = fs::read_to_string(&path).unwrap();
    let config = loop_config().with_loop_counter(LoopCounterOptions {
        track_incrementor_targets: false,
    });
    let diagnostics = LintEngine::new(config).check_file(&path).unwrap();

    assert_eq!(
        actual_lines(&diagnostics),
        expected_lines(&source, |line| line.contains("update clause only")),
    );
}

#[test]
fn test_fixture_diagnostics_name_counters() {
    let diagnostics = LintEngine::new(loop_config())
        .check_file(&fixture())
        .unwrap();
    let mut counters: Vec<&str> = diagnostics
        .iter()
        .filter_map(|d| d.counter.as_deref())
        .collect();
    counters.sort_unstable();
    counters.dedup();
    assert_eq!(counters, vec!["a", "d", "e", "f", "g", "h", "i", "j", "m", "n"]);
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_single_assignment() {
    let diagnostics = check(&in_method("for (int a = 0; a < 42; a++) { a = 0; }"));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].counter.as_deref(), Some("a"));
    assert_eq!(diagnostics[0].location.start_line, 3);
}

#[test]
fn test_incrementor_only_is_compliant() {
    assert!(check(&in_method("for (int i = 0; i < 10; i++) { var x = i * 2; }")).is_empty());
}

#[test]
fn test_three_mutations() {
    let diagnostics = check(&in_method(
        "for (int i = 0; 0 < 42; i++) {\n i++;\n --i;\n i += 1;\n }",
    ));
    let lines: Vec<usize> = diagnostics.iter().map(|d| d.location.start_line).collect();
    assert_eq!(lines, vec![4, 5, 6]);
}

#[test]
fn test_nested_reuse_flags_both_counters() {
    let diagnostics = check(&in_method(
        "int g;\nfor (int f = 0; f < 42; f++) {\n for (g = 0; g < 42; g++) {\n g = 0;\n f = 0;\n }\n }",
    ));
    let counters: Vec<&str> = diagnostics
        .iter()
        .filter_map(|d| d.counter.as_deref())
        .collect();
    assert_eq!(counters, vec!["g", "f"]);
}

#[test]
fn test_write_after_loop_is_compliant() {
    assert!(check(&in_method("int i;\nfor (i = 0; i < 3; i++) { }\ni = 7;\ni++;")).is_empty());
}

#[test]
fn test_opaque_lvalues_are_compliant() {
    let code = in_method(
        "var a1 = new int[] { 0, 1 };\n\
         for (a1[0] = 0; a1[0] < 3; a1[0]++) { a1[0] = 1; }\n\
         var s = new { i = 0 };\n\
         for (int i = 0; i < 3; i++) { new { i = 0 }.i++; this.i = 2; }",
    );
    assert!(check(&code).is_empty());
}

#[test]
fn test_object_initializer_members_are_compliant() {
    let code = in_method(
        "for (int i = 0; i < 3; i++) {\n\
         var o = new P { i = 2 };\n\
         P t = new() { i = 3, Inner = { i = 4 } };\n\
         }",
    );
    assert!(check(&code).is_empty());
}

#[test]
fn test_object_initializer_values_are_scanned() {
    let diagnostics = check(&in_method(
        "for (int i = 0; i < 3; i++) {\n var o = new P(i--) { i = 2, X = i++ };\n }",
    ));
    let found: Vec<(usize, &str)> = diagnostics
        .iter()
        .map(|d| (d.location.start_line, d.counter.as_deref().unwrap_or_default()))
        .collect();
    assert_eq!(found, vec![(4, "i"), (4, "i")]);
}

#[test]
fn test_foreach_variable_is_compliant() {
    assert!(check(&in_method("foreach (int element in xs) { element = 0; }")).is_empty());
}

#[test]
fn test_multiple_declarators() {
    let diagnostics = check(&in_method(
        "for (int d = 0, e = 0; d < 42; d++) {\n d = 0;\n e = 0;\n }",
    ));
    let counters: Vec<&str> = diagnostics
        .iter()
        .filter_map(|d| d.counter.as_deref())
        .collect();
    assert_eq!(counters, vec!["d", "e"]);
}

#[test]
fn test_outer_counter_in_nested_condition() {
    let diagnostics = check(&in_method(
        "for (int j = 0; j < 42; j++) {\n for (k = 0; j++ < 42; k++) { }\n }",
    ));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].counter.as_deref(), Some("j"));
    assert_eq!(diagnostics[0].location.start_line, 4);
}

#[test]
fn test_compound_and_coalescing_assignments() {
    let diagnostics = check(&in_method(
        "for (int? i = 0; i < 3; i++) { i >>= 1; i ??= 2; i %= 3; }",
    ));
    assert_eq!(diagnostics.len(), 3);
}

#[test]
fn test_lambda_body_is_scanned() {
    let diagnostics = check(&in_method(
        "for (int i = 0; i < 3; i++) { Action a = () => { i = 0; }; }",
    ));
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_ref_argument_is_not_a_write() {
    assert!(check(&in_method("for (int i = 0; i < 3; i++) { Touch(ref i); }")).is_empty());
}

#[test]
fn test_messages_render() {
    let diagnostics = check(&in_method("for (int a = 0; a < 42; a++) { a = 0; }"));
    assert_eq!(
        diagnostics[0].to_string(),
        "Test.cs:3:32: [LOOP001] warning: loop counter 'a' is modified in the loop body"
    );
}

#[test]
fn test_syntax_errors_are_analyzed() {
    let diagnostics = check(&in_method("for (int a = 0; a < 42; a++) { a = 0; int = ; }"));
    assert_eq!(diagnostics.len(), 1);
}
