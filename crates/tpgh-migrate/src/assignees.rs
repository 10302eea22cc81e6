//! TargetProcess email to GitHub username mapping.
//!
//! The mapping file holds one `email=username` pair per line:
//!
//! ```text
//! # team leads
//! alice@example.com = alice-gh
//! Bob@Example.com=bob
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::MigrateError;

/// Read-only `email (lowercased) -> username` table, loaded once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssigneeMapping {
    entries: HashMap<String, String>,
}

impl AssigneeMapping {
    /// Load a mapping file. No path, or a path that does not exist, yields an
    /// empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::MappingFile`] if the file exists but cannot be
    /// read.
    pub fn from_file(path: Option<&Path>) -> Result<Self, MigrateError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "assignee mapping file not found");
                Ok(Self::default())
            }
            Err(source) => Err(MigrateError::MappingFile {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse mapping text. Blank lines, `#` comments, lines without `=` and
    /// lines with an empty side are skipped; later lines win.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(email, user)| (email.trim().to_lowercase(), user.trim().to_string()))
            .filter(|(email, user)| !email.is_empty() && !user.is_empty())
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn get(&self, email: &str) -> Option<&str> {
        self.entries
            .get(&email.trim().to_lowercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Map source emails to GitHub usernames.
    ///
    /// Unmapped emails are dropped with one warning each. The result holds
    /// each username once, in first-seen order.
    #[must_use]
    pub fn resolve(&self, emails: &[String]) -> Vec<String> {
        let (usernames, unmapped) = self.partition(emails);
        for email in unmapped {
            tracing::warn!("No GitHub assignee mapping found for TP user: {email}");
        }
        usernames
    }

    /// Mapped usernames and unmapped emails, both deduplicated in first-seen
    /// order. Emails compare case-insensitively.
    fn partition<'e>(&self, emails: &'e [String]) -> (Vec<String>, Vec<&'e str>) {
        let mut usernames: Vec<String> = Vec::with_capacity(emails.len());
        let mut unmapped: Vec<&str> = Vec::new();
        let mut seen_unmapped: HashSet<String> = HashSet::new();
        for email in emails {
            match self.get(email) {
                Some(user) => {
                    if !usernames.iter().any(|known| known == user) {
                        usernames.push(user.to_string());
                    }
                }
                None => {
                    if seen_unmapped.insert(email.trim().to_lowercase()) {
                        unmapped.push(email.trim());
                    }
                }
            }
        }
        (usernames, unmapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn emails(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_lines_skipping_comments_and_blanks() {
        let mapping = AssigneeMapping::parse(
            "# test map\nuser1@foo.com=ghuser1\nuser2@foo.com = ghuser2\n   \n# blank above\nUSER3@Foo.com=ghuser3\n",
        );
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.get("user1@foo.com"), Some("ghuser1"));
        assert_eq!(mapping.get("user2@foo.com"), Some("ghuser2"));
        assert_eq!(mapping.get("user3@foo.com"), Some("ghuser3"));
    }

    #[test]
    fn skips_lines_without_both_sides() {
        let mapping = AssigneeMapping::parse("user@foo.com=\ninvalidrow\n=ghuser\n");
        assert!(mapping.is_empty());
    }

    #[test]
    fn first_equals_sign_separates() {
        let mapping = AssigneeMapping::parse("a@b.com=user=odd");
        assert_eq!(mapping.get("a@b.com"), Some("user=odd"));
    }

    #[test]
    fn missing_or_unset_file_is_empty() {
        assert!(AssigneeMapping::from_file(None).unwrap().is_empty());
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("assignees.txt");
        assert!(AssigneeMapping::from_file(Some(&missing)).unwrap().is_empty());
    }

    #[test]
    fn loads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "foo@bar.com=guser1").unwrap();
        writeln!(file, "x@y.com=gh2").unwrap();

        let mapping = AssigneeMapping::from_file(Some(file.path())).unwrap();
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn resolve_is_case_insensitive_and_dedups() {
        let mapping = AssigneeMapping::parse("foo@bar.com=gh1");
        assert_eq!(
            mapping.resolve(&emails(&["foo@bar.com", "Foo@Bar.com"])),
            vec!["gh1".to_string()]
        );
    }

    #[test]
    fn resolve_drops_unmapped_and_keeps_order() {
        let mapping = AssigneeMapping::parse("foo@bar.com=guser1\nx@y.com=gh2");
        let resolved = mapping.resolve(&emails(&[
            "x@y.com",
            "foo@bar.com",
            "missing@xx.com",
            "Foo@Bar.com",
            "x@y.com",
        ]));
        assert_eq!(resolved, vec!["gh2".to_string(), "guser1".to_string()]);
    }

    #[test]
    fn resolve_with_nothing_mapped_is_empty() {
        let mapping = AssigneeMapping::default();
        assert!(mapping.resolve(&emails(&["bad@no.com"])).is_empty());
    }

    #[test]
    fn unmapped_email_is_reported_once_regardless_of_case() {
        let mapping = AssigneeMapping::parse("foo@bar.com=gh1");
        let input = emails(&["Missing@x.com", "foo@bar.com", "missing@x.com", "other@x.com"]);
        let (usernames, unmapped) = mapping.partition(&input);
        assert_eq!(usernames, vec!["gh1".to_string()]);
        assert_eq!(unmapped, vec!["Missing@x.com", "other@x.com"]);
    }
}
