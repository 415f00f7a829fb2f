//! Ignore rules: caller-supplied glob patterns plus a per-source ignore file.
use std::fs;
use std::io;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::ValidationError;

/// Name of the ignore file read from the root of each source.
pub const IGNORE_FILE: &str = ".dploystowignore";

/// Compiled ignore patterns for one source root.
///
/// A pattern matches an entry when it matches either the entry's file name
/// or its path relative to the source root.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    set: GlobSet,
    patterns: Vec<String>,
}

impl IgnoreRules {
    /// Compile `patterns`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPattern`] for the first pattern that
    /// is not a valid glob.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ValidationError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|source| ValidationError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|source| ValidationError::InvalidPattern {
                pattern: patterns
                    .iter()
                    .map(AsRef::as_ref)
                    .collect::<Vec<&str>>()
                    .join(", "),
                source,
            })?;
        Ok(Self {
            set,
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
        })
    }

    /// Compile `patterns` together with the patterns of the ignore file at
    /// the root of `source`, if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the ignore file exists but cannot be read, or if
    /// any pattern is invalid.
    pub fn for_source(patterns: &[String], source: &Path) -> Result<Self, ValidationError> {
        let path = source.join(IGNORE_FILE);
        let mut all = patterns.to_vec();
        match fs::read_to_string(&path) {
            Ok(contents) => all.extend(parse_ignore_file(&contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(ValidationError::IgnoreFile { path, source }),
        }
        Self::new(&all)
    }

    /// Whether the entry at `relative` (relative to the source root) is
    /// ignored.
    #[must_use]
    pub fn is_ignored(&self, relative: &Path) -> bool {
        if relative == Path::new(IGNORE_FILE) {
            return true;
        }
        self.set.is_match(relative)
            || relative
                .file_name()
                .is_some_and(|name| self.set.is_match(Path::new(name)))
    }

    /// The patterns these rules were compiled from.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// One pattern per line; blank lines and `#` comments are skipped.
fn parse_ignore_file(contents: &str) -> impl Iterator<Item = String> + '_ {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
}
