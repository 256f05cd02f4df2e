//! Wildcard filtering for the file region of the list.

use regex::{Regex, RegexBuilder};

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::FileEntry;

/// A compiled set of case-insensitive wildcard patterns.
///
/// `*` matches any run of characters and `?` exactly one. Several
/// patterns are separated by `;`; surrounding whitespace is trimmed, inner
/// spaces are literal. A name matching any of them passes. An empty
/// pattern list matches everything.
#[derive(Debug, Clone)]
pub struct FilterPattern {
    source: String,
    matchers: Vec<Regex>,
}

impl FilterPattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPattern`] if the translated expression is rejected,
    /// which in practice only happens for absurdly long patterns.
    pub fn new(pattern: &str) -> CoreResult<Self> {
        let matchers = pattern
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(compile_glob)
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self {
            source: pattern.to_owned(),
            matchers,
        })
    }

    /// A pattern that lets every name through.
    pub fn match_all() -> Self {
        Self {
            source: String::new(),
            matchers: Vec::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// `true` when no pattern was given.
    pub fn is_match_all(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.matchers.is_empty() || self.matchers.iter().any(|re| re.is_match(name))
    }
}

impl Default for FilterPattern {
    fn default() -> Self {
        Self::match_all()
    }
}

fn compile_glob(glob: &str) -> CoreResult<Regex> {
    let mut expr = String::with_capacity(glob.len() + 8);
    expr.push('^');
    for c in glob.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    expr.push('$');

    RegexBuilder::new(&expr)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| CoreError::InvalidPattern(format!("{glob}: {e}")))
}

/// Keeps folders unconditionally and files whose name matches `pattern`.
pub fn filter_files(entries: Vec<FileEntry>, pattern: &FilterPattern) -> Vec<FileEntry> {
    if pattern.is_match_all() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|e| e.is_dir() || pattern.matches(e.name()))
        .collect()
}

/// Drops hidden entries unless `show_hidden` is set.
pub fn filter_hidden(entries: Vec<FileEntry>, show_hidden: bool) -> Vec<FileEntry> {
    if show_hidden {
        return entries;
    }
    entries.into_iter().filter(|e| !e.is_hidden()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(FileEntry::name).collect()
    }

    #[test]
    fn star_matches_any_run() {
        let p = FilterPattern::new("*.log").unwrap();
        assert!(p.matches("a.log"));
        assert!(p.matches(".log"));
        assert!(!p.matches("a.log.bak"));
    }

    #[test]
    fn question_mark_matches_one_char() {
        let p = FilterPattern::new("file?.txt").unwrap();
        assert!(p.matches("file1.txt"));
        assert!(!p.matches("file.txt"));
        assert!(!p.matches("file12.txt"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let p = FilterPattern::new("*.LOG").unwrap();
        assert!(p.matches("system.log"));
        assert!(p.matches("A.Log"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let p = FilterPattern::new("a+b(1).txt").unwrap();
        assert!(p.matches("a+b(1).txt"));
        assert!(!p.matches("aab1.txt"));
    }

    #[test]
    fn multiple_patterns() {
        let p = FilterPattern::new("*.c;*.h ; *.rs").unwrap();
        assert!(p.matches("main.c"));
        assert!(p.matches("util.h"));
        assert!(p.matches("lib.rs"));
        assert!(!p.matches("notes.md"));
    }

    #[test]
    fn spaces_inside_a_pattern_are_literal() {
        let p = FilterPattern::new("my file*.txt").unwrap();
        assert!(p.matches("my file 2.txt"));
        assert!(p.matches("My File.txt"));
        assert!(!p.matches("file.txt"));
        assert!(!p.matches("my"));
    }

    #[test]
    fn empty_pattern_matches_everything() {
        let p = FilterPattern::new("  ").unwrap();
        assert!(p.is_match_all());
        assert!(p.matches("anything"));
        assert!(FilterPattern::default().matches(""));
    }

    #[test]
    fn folders_are_never_filtered() {
        let entries = vec![
            FileEntry::folder("/d/apps"),
            FileEntry::folder("/d/Docs"),
            FileEntry::file("/d/A.log", 1),
            FileEntry::file("/d/b.log", 1),
            FileEntry::file("/d/c.txt", 1),
        ];
        let kept = filter_files(entries, &FilterPattern::new("*.log").unwrap());
        assert_eq!(names(&kept), vec!["apps", "Docs", "A.log", "b.log"]);
    }

    #[test]
    fn hidden_entries_dropped_unless_shown() {
        let entries = vec![
            FileEntry::folder("/d/.git"),
            FileEntry::file("/d/.env", 1),
            FileEntry::file("/d/main.rs", 1),
        ];
        assert_eq!(names(&filter_hidden(entries.clone(), false)), vec!["main.rs"]);
        assert_eq!(filter_hidden(entries, true).len(), 3);
    }
}
