use wildmatch::WildMatchPattern;

type PathPattern = WildMatchPattern<'*', '?'>;

/// Glob patterns over `<group>.<key>` property paths that count as noise
///
/// `Group.*` matches every key in a group (and the bare group path);
/// `*.Key` matches the key in any group (and the bare key path).
pub struct IgnorePatterns {
    raw: Vec<String>,
    compiled: Vec<PathPattern>,
}

impl IgnorePatterns {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let raw: Vec<String> = patterns
            .iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        let compiled = raw.iter().map(|p| PathPattern::new(p)).collect();
        Self { raw, compiled }
    }

    /// No filtering: every property path is meaningful
    pub fn none() -> Self {
        Self::new::<&str>(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn patterns(&self) -> &[String] {
        &self.raw
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.raw
            .iter()
            .zip(self.compiled.iter())
            .any(|(raw, pattern)| pattern.matches(path) || matches_bare(raw, path))
    }
}

// `Group.*` vs "Group" and `*.Key` vs "Key"
fn matches_bare(raw: &str, path: &str) -> bool {
    if path.contains('.') {
        return false;
    }
    raw.strip_suffix(".*") == Some(path) || raw.strip_prefix("*.") == Some(path)
}

impl std::fmt::Debug for IgnorePatterns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("IgnorePatterns").field(&self.raw).finish()
    }
}
