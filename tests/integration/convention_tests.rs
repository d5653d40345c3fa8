//! BRACE001 and TAB001 over C# and Java sources.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use brrr_loops::{Diagnostic, LintConfig, LintEngine, RuleCode, Severity};

fn fixture(language: &str, name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(language)
        .join(name)
}

fn engine_for(rule: RuleCode) -> LintEngine {
    LintEngine::new(LintConfig::default().with_select([rule]))
}

fn marker_lines(source: &str) -> BTreeMap<usize, usize> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains("// Noncompliant"))
        .map(|(idx, _)| (idx + 1, 1))
        .collect()
}

fn diagnostic_lines(diagnostics: &[Diagnostic]) -> BTreeMap<usize, usize> {
    let mut lines = BTreeMap::new();
    for diagnostic in diagnostics {
        *lines.entry(diagnostic.location.start_line).or_insert(0) += 1;
    }
    lines
}

// =============================================================================
// BRACE001
// =============================================================================

#[test]
fn test_curly_braces_csharp_fixture() {
    let path = fixture("csharp", "AlwaysUseCurlyBraces.cs");
    let source = fs::read_to_string(&path).unwrap();
    let diagnostics = engine_for(RuleCode::BRACE001).check_file(&path).unwrap();

    assert_eq!(
        diagnostic_lines(&diagnostics),
        marker_lines(&source),
        "diagnostics: {:#?}",
        diagnostics
    );
    assert!(diagnostics.iter().all(|d| d.rule == RuleCode::BRACE001));
    assert!(diagnostics.iter().all(|d| d.counter.is_none()));
}

#[test]
fn test_curly_braces_java_fixture() {
    let path = fixture("java", "AlwaysUseCurlyBraces.java");
    let source = fs::read_to_string(&path).unwrap();
    let diagnostics = engine_for(RuleCode::BRACE001).check_file(&path).unwrap();

    assert_eq!(
        diagnostic_lines(&diagnostics),
        marker_lines(&source),
        "diagnostics: {:#?}",
        diagnostics
    );
}

#[test]
fn test_curly_braces_messages_name_the_keyword() {
    let diagnostics = engine_for(RuleCode::BRACE001)
        .check_source(
            Path::new("Loops.java"),
            "class C {\n void m(int[] xs) {\n  for (int x : xs) m(xs);\n  if (xs == null) return; else m(xs);\n }\n}\n",
        )
        .unwrap();
    let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Add curly braces around the nested statement(s) in this \"for\" block.",
            "Add curly braces around the nested statement(s) in this \"if\" block.",
            "Add curly braces around the nested statement(s) in this \"else\" block.",
        ]
    );
    assert!(diagnostics.iter().all(|d| d.severity == Severity::Warning));
}

// =============================================================================
// TAB001
// =============================================================================

#[test]
fn test_tab_character_reported_once() {
    let source = "class C {\n    void M() { }\n\tint x;\n\tint y;\n}\n";
    let diagnostics = engine_for(RuleCode::TAB001)
        .check_source(Path::new("Tabs.cs"), source)
        .unwrap();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].location.start_line, 3);
    assert_eq!(diagnostics[0].location.start_column, 1);
    assert_eq!(diagnostics[0].severity, Severity::Info);
    assert_eq!(
        diagnostics[0].to_string(),
        "Tabs.cs:3:1: [TAB001] info: Replace all tab characters in this file by sequences of white-spaces."
    );
}

#[test]
fn test_tab_free_file_is_clean() {
    let diagnostics = engine_for(RuleCode::TAB001)
        .check_file(&fixture("java", "AlwaysUseCurlyBraces.java"))
        .unwrap();
    assert!(diagnostics.is_empty());
}

// =============================================================================
// All rules together
// =============================================================================

#[test]
fn test_default_config_runs_every_rule() {
    let source = "class C {\n\tvoid M() {\n\t\tfor (int i = 0; i < 3; i++) i = 0;\n\t}\n}\n";
    let diagnostics = LintEngine::new(LintConfig::default())
        .check_source(Path::new("All.cs"), source)
        .unwrap();
    let rules: Vec<(usize, RuleCode)> = diagnostics
        .iter()
        .map(|d| (d.location.start_line, d.rule))
        .collect();
    assert_eq!(
        rules,
        vec![
            (2, RuleCode::TAB001),
            (3, RuleCode::BRACE001),
            (3, RuleCode::LOOP001),
        ]
    );
}
