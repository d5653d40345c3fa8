//! Language registry for extension-to-language mapping.
//!
//! Provides a singleton registry that maps file extensions and language
//! names (including aliases such as "c#" or "cs") to their [`Language`]
//! front ends.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::lang::traits::{BoxedLanguage, Language};
use crate::lang::{csharp, java};

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

/// Registry mapping file extensions to language implementations.
///
/// The registry maintains three mappings:
/// - `by_name`: Language name to implementation (e.g., "csharp" -> CSharp)
/// - `by_ext`: File extension to language name (e.g., ".cs" -> "csharp")
/// - `aliases`: Alternative names to canonical names (e.g., "c#" -> "csharp")
pub struct LanguageRegistry {
    by_name: HashMap<&'static str, BoxedLanguage>,
    by_ext: HashMap<&'static str, &'static str>,
    aliases: HashMap<&'static str, &'static str>,
}

impl LanguageRegistry {
    /// Get the global language registry singleton.
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(Self::new)
    }

    fn new() -> Self {
        let mut registry = Self {
            by_name: HashMap::new(),
            by_ext: HashMap::new(),
            aliases: HashMap::new(),
        };

        registry.register(Box::new(csharp::CSharp));
        registry.register(Box::new(java::Java));

        registry.register_alias("c#", "csharp");
        registry.register_alias("cs", "csharp");
        registry.register_alias("c_sharp", "csharp");

        registry
    }

    fn register_alias(&mut self, alias: &'static str, target: &'static str) {
        self.aliases.insert(alias, target);
    }

    fn register(&mut self, lang: BoxedLanguage) {
        let name = lang.name();
        for ext in lang.extensions() {
            self.by_ext.insert(*ext, name);
        }
        self.by_name.insert(name, lang);
    }

    /// Get a language by name or alias, case-insensitively.
    pub fn get_by_name(&self, name: &str) -> Option<&dyn Language> {
        let lowered = name.to_ascii_lowercase();
        let canonical_name = self
            .aliases
            .get(lowered.as_str())
            .copied()
            .unwrap_or(lowered.as_str());
        self.by_name.get(canonical_name).map(|b| b.as_ref())
    }

    /// Get a language by file extension (e.g., ".cs").
    pub fn get_by_extension(&self, ext: &str) -> Option<&dyn Language> {
        self.by_ext.get(ext).and_then(|name| self.get_by_name(name))
    }

    /// Auto-detect language from file path extension.
    pub fn detect_language(&self, path: &Path) -> Option<&dyn Language> {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .and_then(|ext| self.get_by_extension(&ext))
    }

    /// Whether any front end claims this path.
    pub fn is_supported_path(&self, path: &Path) -> bool {
        self.detect_language(path).is_some()
    }

    /// Canonical language names, sorted.
    pub fn supported_languages(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.by_name.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
