//! Filesystem-backed library of bundled example rules

use crate::{CoreError, CoreResult, SentinelRule};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default directory holding bundled example rules
pub const DEFAULT_RULES_DIR: &str = "rules";

/// Library of bundled Sentinel example rules and reference YARA-L rules.
///
/// Example Sentinel rules are `*.yaml` files; reference YARA-L rules are
/// `rule*.yaral` files in the same directory. One unreadable or malformed
/// entry never takes down the library: it is skipped with a warning.
#[derive(Debug, Clone, Default)]
pub struct RuleLibrary {
    dir: PathBuf,
    rules: BTreeMap<String, SentinelRule>,
    yaral_examples: BTreeMap<String, String>,
}

impl RuleLibrary {
    /// Load the library from a rules directory.
    ///
    /// A missing directory yields an empty library; the tool stays usable
    /// for file-based conversion without bundled examples.
    pub fn load<P: AsRef<Path>>(dir: P) -> CoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();

        let mut library = Self {
            dir: dir.clone(),
            rules: BTreeMap::new(),
            yaral_examples: BTreeMap::new(),
        };

        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), "Rules directory not readable: {}", e);
                return Ok(library);
            }
        };

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(String::from)
            else {
                continue;
            };

            if name.ends_with(".yaml") {
                match SentinelRule::from_yaml_file(&path) {
                    Ok(rule) => {
                        library.rules.insert(name, rule);
                    }
                    Err(e) => {
                        warn!(file = %name, "Skipping example rule: {}", e);
                    }
                }
            } else if name.starts_with("rule") && name.ends_with(".yaral") {
                match std::fs::read_to_string(&path) {
                    Ok(content) => {
                        library.yaral_examples.insert(name, content);
                    }
                    Err(e) => {
                        warn!(file = %name, "Skipping YARA-L example: {}", e);
                    }
                }
            }
        }

        Ok(library)
    }

    /// Directory the library was loaded from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of the bundled example Sentinel rules
    pub fn rule_names(&self) -> Vec<String> {
        self.rules.keys().cloned().collect()
    }

    /// Look up a bundled example rule by file name
    pub fn get(&self, name: &str) -> Option<&SentinelRule> {
        self.rules.get(name)
    }

    /// Look up a bundled example rule, erroring on unknown names
    pub fn get_required(&self, name: &str) -> CoreResult<&SentinelRule> {
        self.rules
            .get(name)
            .ok_or_else(|| CoreError::UnknownExample(name.to_string()))
    }

    /// Reference YARA-L rule bodies, capped at `limit`, in library order
    pub fn reference_rules(&self, limit: usize) -> Vec<&str> {
        self.yaral_examples
            .values()
            .take(limit)
            .map(String::as_str)
            .collect()
    }

    /// Number of bundled example Sentinel rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no example rules were loaded
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Persist a converted YARA-L rule next to its source example.
    ///
    /// `converted_rule.yaml` becomes `converted_rule.yaral` in the rules
    /// directory. Returns the written path.
    pub fn save_converted(&self, source_name: &str, yaral: &str) -> CoreResult<PathBuf> {
        let stem = source_name
            .strip_suffix(".yaml")
            .unwrap_or(source_name);
        let output_path = self.dir.join(format!("{}.yaral", stem));
        std::fs::write(&output_path, yaral)?;
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_rules_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("failed_logins.yaml"),
            "displayName: Failed logins\nquery: SigninLogs | where ResultType != 0\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("broken.yaml"),
            "displayName: [unclosed",
        )
        .unwrap();
        fs::write(
            dir.path().join("rule_reference.yaral"),
            "rule reference {\n  meta:\n  condition:\n    $e\n}\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        dir
    }

    #[test]
    fn test_load_skips_malformed_entries() {
        let dir = write_rules_dir();
        let library = RuleLibrary::load(dir.path()).unwrap();

        assert_eq!(library.rule_names(), vec!["failed_logins.yaml"]);
        assert_eq!(library.reference_rules(3).len(), 1);
    }

    #[test]
    fn test_load_missing_dir_is_empty() {
        let library = RuleLibrary::load("/nonexistent/rules/dir").unwrap();
        assert!(library.is_empty());
        assert!(library.reference_rules(3).is_empty());
    }

    #[test]
    fn test_get_required_unknown_example() {
        let dir = write_rules_dir();
        let library = RuleLibrary::load(dir.path()).unwrap();
        let err = library.get_required("missing.yaml").unwrap_err();
        assert!(matches!(err, CoreError::UnknownExample(_)));
    }

    #[test]
    fn test_reference_rules_cap() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            fs::write(
                dir.path().join(format!("rule_{}.yaral", i)),
                format!("rule r{} {{}}", i),
            )
            .unwrap();
        }
        let library = RuleLibrary::load(dir.path()).unwrap();
        assert_eq!(library.reference_rules(3).len(), 3);
    }

    #[test]
    fn test_save_converted() {
        let dir = write_rules_dir();
        let library = RuleLibrary::load(dir.path()).unwrap();

        let path = library
            .save_converted("failed_logins.yaml", "rule converted {}")
            .unwrap();

        assert_eq!(path, dir.path().join("failed_logins.yaral"));
        assert_eq!(fs::read_to_string(path).unwrap(), "rule converted {}");
    }
}
