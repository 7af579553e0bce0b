//! Verification report types and formatting.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;

use super::{FailureReason, VerifyFailure};
use crate::registry::EntryRef;
use crate::utils::plural_s;

/// Result of checking a set of registry paths.
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    /// Path slots checked (duplicates across entries counted).
    pub checked: usize,
    pub failures: Vec<VerifyFailure>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures with the given reason.
    pub fn count(&self, reason: FailureReason) -> usize {
        self.failures.iter().filter(|f| f.reason == reason).count()
    }

    /// Failures grouped by owning entry, in entry order.
    pub fn by_entry(&self) -> BTreeMap<&EntryRef, Vec<&VerifyFailure>> {
        let mut grouped: BTreeMap<&EntryRef, Vec<&VerifyFailure>> = BTreeMap::new();
        for failure in &self.failures {
            grouped.entry(&failure.entry).or_default().push(failure);
        }
        grouped
    }

    /// Print every failure to stderr, grouped by entry.
    pub fn print(&self) {
        if self.failures.is_empty() {
            return;
        }
        eprintln!();

        let grouped = self.by_entry();
        let entry_count = grouped.len();
        let error_count = self.failures.len();

        eprintln!(
            "{} {}",
            "images".red().bold(),
            format!(
                "({entry_count} entr{}, {error_count} error{})",
                if entry_count == 1 { "y" } else { "ies" },
                plural_s(error_count)
            )
            .dimmed()
        );

        for (entry, failures) in grouped {
            eprintln!("{}{}{}", "[".dimmed(), entry.to_string().cyan(), "]".dimmed());
            for f in failures {
                eprintln!("{} {} {}", "→".red(), f.path, f.reason.as_str().dimmed());
            }
        }
        eprintln!();
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(
                f,
                "{} ({} path{} checked)",
                "all images present and valid".green(),
                self.checked,
                plural_s(self.checked)
            );
        }

        let missing = self.count(FailureReason::Missing);
        let invalid = self.count(FailureReason::InvalidImage);
        write!(
            f,
            "{} {} {} ({} missing, {} invalid)",
            "found".dimmed(),
            self.failures.len().to_string().red().bold(),
            format!("error{}", plural_s(self.failures.len())).dimmed(),
            missing,
            invalid
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(entry: EntryRef, path: &str, reason: FailureReason) -> VerifyFailure {
        VerifyFailure {
            entry,
            path: path.to_string(),
            reason,
        }
    }

    #[test]
    fn test_group_by_entry() {
        let report = VerifyReport {
            checked: 5,
            failures: vec![
                failure(EntryRef::Project("B".into()), "/images/1.jpg", FailureReason::Missing),
                failure(
                    EntryRef::Group("hero".into()),
                    "/images/2.jpg",
                    FailureReason::InvalidImage,
                ),
                failure(EntryRef::Project("B".into()), "/images/3.jpg", FailureReason::Missing),
            ],
        };

        let grouped = report.by_entry();
        assert_eq!(grouped.len(), 2);
        // Groups sort before projects
        let first = grouped.keys().next().unwrap();
        assert_eq!(**first, EntryRef::Group("hero".into()));
        assert_eq!(grouped[&EntryRef::Project("B".into())].len(), 2);
    }

    #[test]
    fn test_summary_counts() {
        let report = VerifyReport {
            checked: 3,
            failures: vec![
                failure(EntryRef::Group("g".into()), "/images/a.jpg", FailureReason::Missing),
                failure(EntryRef::Group("g".into()), "/images/b.jpg", FailureReason::InvalidImage),
            ],
        };
        let summary = report.to_string();
        assert!(summary.contains("1 missing, 1 invalid"));
    }

    #[test]
    fn test_clean_summary() {
        let report = VerifyReport {
            checked: 2,
            failures: Vec::new(),
        };
        assert!(report.is_clean());
        assert!(report.to_string().contains("2 paths checked"));
    }
}
