//! Engine, configuration and reporting.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use brrr_loops::lang::LanguageRegistry;
use brrr_loops::rules::loop_counter::{analyze, Violation, ViolationSink};
use brrr_loops::{
    LintConfig, LintEngine, LintError, LintFileConfig, LoopCounterOptions, RuleCode, Severity,
    CONFIG_FILE_NAME,
};

const CSHARP: &str = "class C { void M() { for (int i = 0; i < 9; i++) { i = 0; } } }\n";
const JAVA: &str = "class C { void m() { for (int i = 0; i < 9; i++) { i = 0; } } }\n";
const UPDATE_ONLY: &str = "class C { void M(int i) { for (; i > 0; i++) { i = 1; } } }\n";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_mixed_language_tree() {
    let dir = TempDir::new().unwrap();
    write(&dir, "cs/Loop.cs", CSHARP);
    write(&dir, "java/Loop.java", JAVA);
    write(&dir, "README.md", "for (;;) {}");

    let report = LintEngine::new(LintConfig::default()).check_paths(&[dir.path().to_path_buf()]);

    assert_eq!(report.files_checked, 2);
    assert_eq!(report.diagnostics.len(), 2);
    assert!(report.failures.is_empty());
    assert!(report.diagnostics.iter().all(|d| d.rule == RuleCode::LOOP001));
}

#[test]
fn test_bad_file_does_not_abort_run() {
    let dir = TempDir::new().unwrap();
    write(&dir, "Good.cs", CSHARP);
    fs::write(dir.path().join("Bad.cs"), [0xc3, 0x28, 0xa0, 0xa1]).unwrap();

    let report = LintEngine::new(LintConfig::default()).check_paths(&[dir.path().to_path_buf()]);

    assert_eq!(report.files_checked, 1);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].file.ends_with("Bad.cs"));
}

#[test]
fn test_discovered_config_applies() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    write(
        &dir,
        CONFIG_FILE_NAME,
        "[rules.severity]\nLOOP001 = \"error\"\n\n[rules.loop-counter]\ntrack_incrementor_targets = false\n",
    );
    let update_only = write(&dir, "src/UpdateOnly.cs", UPDATE_ONLY);
    let declared = write(&dir, "src/Declared.cs", CSHARP);

    let engine = LintEngine::discover(&dir.path().join("src")).unwrap();
    assert!(engine.check_file(&update_only).unwrap().is_empty());

    let diagnostics = engine.check_file(&declared).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
}

#[test]
fn test_config_no_ignore_disables_ignore_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "src/Keep.cs", CSHARP);
    write(&dir, "gen/Generated.java", JAVA);
    write(&dir, ".brrrignore", "gen/\n");

    let respecting = LintEngine::new(LintConfig::default());
    assert_eq!(respecting.check_paths(&[dir.path().to_path_buf()]).files_checked, 1);

    let file = LintFileConfig::parse("[files]\nno_ignore = true\n").unwrap();
    let config = LintConfig::from_file_config(&file).unwrap();
    assert!(config.no_ignore);
    let report = LintEngine::new(config).check_paths(&[dir.path().to_path_buf()]);
    assert_eq!(report.files_checked, 2);
    assert_eq!(report.diagnostics.len(), 2);
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    write(&dir, CONFIG_FILE_NAME, "[rules]\nselect = [\"NOPE\"]\n");

    let err = LintEngine::discover(dir.path()).err().expect("config error");
    assert!(matches!(err, LintError::Config(_)));
}

#[test]
fn test_selecting_no_rules_reports_nothing() {
    let file = LintFileConfig::parse("[rules]\nexclude = [\"LOOP001\"]\n").unwrap();
    let engine = LintEngine::new(LintConfig::from_file_config(&file).unwrap());
    assert!(engine
        .check_source(Path::new("Loop.cs"), CSHARP)
        .unwrap()
        .is_empty());
}

#[test]
fn test_report_json_round_trip_fields() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "Loop.java", JAVA);
    let report = LintEngine::new(LintConfig::default()).check_paths(&[file]);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    let diagnostic = &json["diagnostics"][0];
    assert_eq!(diagnostic["rule"], "LOOP001");
    assert_eq!(diagnostic["severity"], "warning");
    assert_eq!(diagnostic["counter"], "i");
    assert_eq!(json["failures"].as_array().map(Vec::len), Some(0));
}

/// Sink that only keeps counter names.
#[derive(Default)]
struct NameSink(Vec<String>);

impl ViolationSink for NameSink {
    fn report(&mut self, violation: Violation) {
        self.0.push(violation.counter_name);
    }
}

#[test]
fn test_custom_sink_receives_violations_in_order() {
    let csharp = LanguageRegistry::global().get_by_name("cs").unwrap();
    let unit = csharp
        .parse(
            Path::new("Order.cs"),
            "class C { void M() { for (int a = 0, b = 0; a < 1; a++) { b++; a--; } } }",
        )
        .unwrap();

    let mut sink = NameSink::default();
    analyze(&unit, LoopCounterOptions::default(), &mut sink);
    assert_eq!(sink.0, vec!["b", "a"]);
}

#[test]
fn test_violation_carries_loop_location() {
    let java = LanguageRegistry::global().get_by_name("java").unwrap();
    let unit = java
        .parse(
            Path::new("Loops.java"),
            "class C {\n void m() {\n  for (int i = 0; i < 1; i++) {\n   for (int j = 0; j < 1; j++) {\n    i = 2;\n   }\n  }\n }\n}\n",
        )
        .unwrap();

    let mut violations: Vec<Violation> = Vec::new();
    analyze(&unit, LoopCounterOptions::default(), &mut violations);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].location.start_line, 5);
    assert_eq!(violations[0].loop_location.start_line, 3);
}
