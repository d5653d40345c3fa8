//! LOOP001 over Java sources.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use brrr_loops::{LintConfig, LintEngine, RuleCode};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("java")
        .join("ForLoopCounterChanged.java")
}

fn loop_engine() -> LintEngine {
    LintEngine::new(LintConfig::default().with_select([RuleCode::LOOP001]))
}

fn counters(code: &str) -> Vec<String> {
    let body = format!("class C {{\n void m(int[] xs) {{\n{}\n }}\n}}\n", code);
    loop_engine()
        .check_source(Path::new("C.java"), &body)
        .expect("Java source should be analyzed")
        .into_iter()
        .filter_map(|d| d.counter)
        .collect()
}

#[test]
fn test_fixture_matches_markers() {
    let path = fixture();
    let source = fs::read_to_string(&path).unwrap();

    let expected: BTreeMap<usize, usize> = source
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains("// Noncompliant"))
        .map(|(idx, _)| (idx + 1, 1))
        .collect();

    let diagnostics = loop_engine().check_file(&path).unwrap();
    let mut actual = BTreeMap::new();
    for diagnostic in &diagnostics {
        *actual.entry(diagnostic.location.start_line).or_insert(0) += 1;
    }

    assert_eq!(actual, expected, "diagnostics: {:#?}", diagnostics);
}

#[test]
fn test_single_assignment() {
    assert_eq!(counters("for (int a = 0; a < 42; a++) { a = 0; }"), vec!["a"]);
}

#[test]
fn test_incrementor_only_is_compliant() {
    assert!(counters("for (int i = 0; i < 10; i++) { int x = i * 2; }").is_empty());
}

#[test]
fn test_nested_reuse_flags_both_counters() {
    assert_eq!(
        counters("int g;\nfor (int f = 0; f < 42; f++) {\n for (g = 0; g < 42; g++) {\n g = 0;\n f = 0;\n }\n }"),
        vec!["g", "f"]
    );
}

#[test]
fn test_unsigned_shift_assignment() {
    assert_eq!(
        counters("for (int i = 0; i < 8; i++) { i >>>= 1; }"),
        vec!["i"]
    );
}

#[test]
fn test_field_and_array_writes_are_compliant() {
    assert!(counters(
        "for (this.n = 0; this.n < 3; this.n++) { this.n = 1; }\n\
         for (xs[0] = 0; xs[0] < 3; xs[0]++) { xs[0] = 1; }"
    )
    .is_empty());
}

#[test]
fn test_enhanced_for_variable_is_compliant() {
    assert!(counters("for (int x : xs) { x = 0; }").is_empty());
}

#[test]
fn test_enclosing_counter_inside_enhanced_for() {
    assert_eq!(
        counters("for (int i = 0; i < 3; i++) { for (int x : xs) { i += x; } }"),
        vec!["i"]
    );
}

#[test]
fn test_braceless_body() {
    assert_eq!(counters("for (int i = 0; i < 3; i++) i--;"), vec!["i"]);
}

#[test]
fn test_while_and_if_inside_body() {
    assert_eq!(
        counters(
            "for (int i = 0; i < 3; i++) {\n if (i > 1) { i = 0; } else { while (i < 2) i++; }\n }"
        ),
        vec!["i", "i"]
    );
}
