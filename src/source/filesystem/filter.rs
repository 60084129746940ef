//! Include/exclude path filtering.

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::{Error, Result};

/// Decides which walked paths are scanned.
///
/// A path passes when it matches at least one include pattern (or there are
/// none) and matches no exclude pattern. Patterns are unanchored regular
/// expressions matched against the lossy UTF-8 form of the path.
///
/// ```
/// use std::path::Path;
/// use chunkfeed::Filter;
///
/// let filter = Filter::new(["\\.env$", "\\.ya?ml$"], ["/vendor/"])?;
/// assert!(filter.pass(Path::new("app/.env")));
/// assert!(!filter.pass(Path::new("app/vendor/x.yml")));
/// assert!(!filter.pass(Path::new("app/main.rs")));
/// # Ok::<(), chunkfeed::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Filter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl Filter {
    /// Compiles include and exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFilter`] for the first pattern that does not
    /// compile.
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Loads patterns from files holding one pattern per line.
    ///
    /// Blank lines and lines starting with `#` are ignored. Either file may
    /// be omitted.
    pub fn from_files(include: Option<&Path>, exclude: Option<&Path>) -> Result<Self> {
        Ok(Self {
            include: compile(read_patterns(include)?)?,
            exclude: compile(read_patterns(exclude)?)?,
        })
    }

    /// Reports whether `path` should be scanned.
    pub fn pass(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        let included = self.include.is_empty() || self.include.iter().any(|r| r.is_match(&path));
        included && !self.exclude.iter().any(|r| r.is_match(&path))
    }

    /// True when no patterns are configured and every path passes.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

fn compile<I, S>(patterns: I) -> Result<Vec<Regex>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            Regex::new(pattern).map_err(|source| Error::InvalidFilter {
                pattern: pattern.to_string(),
                source,
            })
        })
        .collect()
}

fn read_patterns(file: Option<&Path>) -> Result<Vec<String>> {
    let Some(file) = file else {
        return Ok(Vec::new());
    };
    let contents = fs::read_to_string(file)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_filter_passes_everything() {
        let filter = Filter::default();
        assert!(filter.is_empty());
        assert!(filter.pass(Path::new("anything/at/all")));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let filter = Filter::new([r"\.txt$"], ["secret"]).unwrap();
        assert!(filter.pass(Path::new("a/notes.txt")));
        assert!(!filter.pass(Path::new("a/secret.txt")));
    }

    #[test]
    fn test_exclude_only() {
        let filter = Filter::new(Vec::<String>::new(), [r"node_modules"]).unwrap();
        assert!(filter.pass(Path::new("src/lib.rs")));
        assert!(!filter.pass(Path::new("web/node_modules/x.js")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Filter::new(["("], Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidFilter { ref pattern, .. } if pattern == "("));
    }

    #[test]
    fn test_from_files() {
        let mut include = tempfile::NamedTempFile::new().unwrap();
        writeln!(include, "# config files\n\n\\.toml$\n").unwrap();
        let mut exclude = tempfile::NamedTempFile::new().unwrap();
        writeln!(exclude, "target/").unwrap();

        let filter = Filter::from_files(Some(include.path()), Some(exclude.path())).unwrap();
        assert!(filter.pass(Path::new("crate/Cargo.toml")));
        assert!(!filter.pass(Path::new("crate/target/x.toml")));
        assert!(!filter.pass(Path::new("crate/README.md")));
    }

    #[test]
    fn test_from_missing_file() {
        let err = Filter::from_files(Some(Path::new("/definitely/not/here")), None).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
