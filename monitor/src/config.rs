//! Configuration for a monitored directory.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extension list applied when none is configured.
pub const DEFAULT_EXTENSIONS: &str = "php";

/// Sentinel file name watched for modification, resolved against the root.
pub const DEFAULT_SENTINEL_NAME: &str = ".htaccess";

/// Configuration for a monitored directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Root directory to scan.
    pub root: PathBuf,

    /// Whether to descend into subdirectories.
    pub recursive: bool,

    /// Extensions that select files for monitoring (lowercase, no dot).
    /// An empty set matches no files.
    pub extensions: BTreeSet<String>,

    /// Whether the sentinel file is watched for modification.
    pub watch_sentinel: bool,

    /// Name of the sentinel file.
    pub sentinel_name: String,

    /// Address alerts are delivered to.
    pub recipient: String,
}

impl MonitorConfig {
    /// Create a config for `root` with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: false,
            extensions: parse_extensions(DEFAULT_EXTENSIONS),
            watch_sentinel: false,
            sentinel_name: DEFAULT_SENTINEL_NAME.to_string(),
            recipient: String::new(),
        }
    }

    /// Replace the extension list from a raw comma-separated string.
    pub fn with_extensions(mut self, raw: &str) -> Self {
        self.extensions = parse_extensions(raw);
        self
    }

    /// Enable recursive scanning.
    pub fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    /// Enable sentinel watching.
    pub fn watch_sentinel(mut self) -> Self {
        self.watch_sentinel = true;
        self
    }

    /// Set the alert recipient.
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = normalize_recipient(&recipient.into());
        self
    }

    /// Override the sentinel file name.
    pub fn with_sentinel_name(mut self, name: impl Into<String>) -> Self {
        self.sentinel_name = name.into();
        self
    }

    /// Full path of the sentinel file.
    pub fn sentinel_path(&self) -> PathBuf {
        self.root.join(&self.sentinel_name)
    }

    /// Check whether a path's extension is in the monitored set.
    pub fn matches(&self, path: &Path) -> bool {
        matches_extension(path, &self.extensions)
    }
}

/// Strip characters outside the directory allow-list.
///
/// Syntactic sanitization only: alphanumerics, `/`, `-` and `_` survive.
/// The result is not checked for existence.
pub fn normalize_directory(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_'))
        .collect()
}

/// Strip characters outside the recipient allow-list
/// (alphanumerics, `.`, `@`, `+`, `-`, `_`).
pub fn normalize_recipient(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '@' | '+' | '-' | '_'))
        .collect()
}

/// Parse a comma-separated extension list.
///
/// Entries are trimmed, lowercased and stored without a leading dot. An empty
/// input yields an empty set, which matches no files.
pub fn parse_extensions(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Check whether `path` has an extension in `exts` (case-insensitive).
pub fn matches_extension(path: &Path, exts: &BTreeSet<String>) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| exts.contains(&e.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_extensions() {
        let exts = parse_extensions("php, HTML ,.js");
        let expected = BTreeSet::from(["html".to_string(), "js".to_string(), "php".to_string()]);
        assert_eq!(exts, expected);
    }

    #[test]
    fn test_parse_extensions_empty_input() {
        assert!(parse_extensions("").is_empty());
        assert!(parse_extensions(" , ,").is_empty());
    }

    #[test]
    fn test_matches_extension_case_insensitive() {
        let exts = parse_extensions("php");
        assert!(matches_extension(Path::new("/site/a.PHP"), &exts));
        assert!(!matches_extension(Path::new("/site/a.txt"), &exts));
        assert!(!matches_extension(Path::new("/site/no_extension"), &exts));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let exts = parse_extensions("");
        assert!(!matches_extension(Path::new("/site/a.php"), &exts));
    }

    #[test]
    fn test_normalize_directory() {
        assert_eq!(normalize_directory("/var/www/html"), "/var/www/html");
        assert_eq!(normalize_directory("/var/www/../etc"), "/var/www//etc");
        assert_eq!(normalize_directory("/srv/site; rm -rf"), "/srv/siterm-rf");
    }

    #[test]
    fn test_normalize_recipient() {
        assert_eq!(
            normalize_recipient("ops admin@example.com"),
            "opsadmin@example.com"
        );
        assert_eq!(normalize_recipient("a+b@ex-ample.com"), "a+b@ex-ample.com");
    }

    #[test]
    fn test_config_builder() {
        let config = MonitorConfig::new("/srv/site")
            .recursive()
            .watch_sentinel()
            .with_extensions("php,js")
            .with_recipient("ops@example.com");

        assert!(config.recursive);
        assert!(config.watch_sentinel);
        assert_eq!(config.extensions.len(), 2);
        assert_eq!(config.sentinel_path(), PathBuf::from("/srv/site/.htaccess"));
        assert_eq!(config.recipient, "ops@example.com");
    }

    #[test]
    fn test_default_extensions() {
        let config = MonitorConfig::new("/srv/site");
        assert!(config.matches(Path::new("/srv/site/index.php")));
        assert!(!config.matches(Path::new("/srv/site/readme.txt")));
    }
}
