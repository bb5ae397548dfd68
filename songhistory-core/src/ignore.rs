//! The ignore-prefix list.
//!
//! One prefix per line in a plain text file. Matching is a case-insensitive
//! prefix match. The same list serves two gates: song titles during conversion
//! (Bible readings and liturgy are projected like songs but carry no author)
//! and local file names before upload.

use std::io;
use std::path::Path;

use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    prefixes: Vec<String>,
}

impl IgnoreList {
    pub fn from_prefixes(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    /// Load the list from a file, one prefix per line. Blank lines are skipped.
    pub fn load(path: &Path) -> io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let prefixes: Vec<String> = content
            .lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .filter(|line| !line.is_empty())
            .collect();
        info!(path = %path.display(), prefixes = prefixes.len(), "Loaded ignore prefixes");
        Ok(Self { prefixes })
    }

    /// Returns the first prefix that `name` starts with (case-insensitive), if any.
    pub fn matches(&self, name: &str) -> Option<&str> {
        let lowered = name.to_lowercase();
        self.prefixes
            .iter()
            .find(|prefix| lowered.starts_with(&prefix.to_lowercase()))
            .map(|prefix| prefix.as_str())
    }
}
