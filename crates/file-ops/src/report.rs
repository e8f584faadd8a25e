use serde::Serialize;

use cfgdeploy_protocol::{Category, CategorySet, LogLine};

/// A file that could not be copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyFailure {
    pub category: Category,
    /// Relative path (archive mode) or file name (file-list mode).
    pub item: String,
    pub reason: String,
}

/// Outcome of one install call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallReport {
    pub global_copied: usize,
    pub user_copied: usize,
    /// Files that matched no enabled category.
    pub skipped: usize,
    pub failures: Vec<CopyFailure>,
}

impl InstallReport {
    /// Files copied into `category`.
    pub fn copied(&self, category: Category) -> usize {
        match category {
            Category::Global => self.global_copied,
            Category::PerUser => self.user_copied,
        }
    }

    pub fn total_copied(&self) -> usize {
        self.global_copied + self.user_copied
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when no copy failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record_copy(&mut self, category: Category) {
        match category {
            Category::Global => self.global_copied += 1,
            Category::PerUser => self.user_copied += 1,
        }
    }

    pub(crate) fn record_failure(
        &mut self,
        category: Category,
        item: impl Into<String>,
        reason: impl Into<String>,
    ) {
        self.failures.push(CopyFailure {
            category,
            item: item.into(),
            reason: reason.into(),
        });
    }

    pub(crate) fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Renders the user-facing summary.
    ///
    /// The final totals line is always present, even when nothing was copied.
    pub fn summary_lines(&self, categories: CategorySet) -> Vec<LogLine> {
        let mut lines = Vec::new();

        for category in categories.iter() {
            let copied = self.copied(category);
            if copied > 0 {
                lines.push(LogLine::ok(format!(
                    "Copied {copied} .{} file(s) to {}",
                    category.extension(),
                    category.label()
                )));
            } else {
                lines.push(LogLine::warn(format!(
                    "No {} files copied",
                    category.label()
                )));
            }
        }

        if self.skipped > 0 {
            lines.push(LogLine::info(format!(
                "Skipped {} file(s) not matching an enabled category",
                self.skipped
            )));
        }

        for failure in &self.failures {
            lines.push(LogLine::warn(format!(
                "Copy failed: {}: {} ({})",
                failure.category.label(),
                failure.item,
                failure.reason
            )));
        }

        let totals = format!(
            "Install finished: {} copied, {} failed, {} skipped",
            self.total_copied(),
            self.failed(),
            self.skipped
        );
        lines.push(if self.is_clean() {
            LogLine::ok(totals)
        } else {
            LogLine::warn(totals)
        });

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfgdeploy_protocol::LogLevel;

    #[test]
    fn counters() {
        let mut report = InstallReport::default();
        report.record_copy(Category::Global);
        report.record_copy(Category::Global);
        report.record_copy(Category::PerUser);
        report.record_skip();
        report.record_failure(Category::PerUser, "video.txt", "denied");

        assert_eq!(report.copied(Category::Global), 2);
        assert_eq!(report.copied(Category::PerUser), 1);
        assert_eq!(report.total_copied(), 3);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn summary_always_states_totals() {
        let mut report = InstallReport::default();
        report.record_failure(Category::Global, "a.cfg", "locked");
        report.record_failure(Category::Global, "b.cfg", "locked");

        let lines = report.summary_lines(CategorySet::new(true, false));
        let last = lines.last().unwrap();
        assert_eq!(last.level, LogLevel::Warn);
        assert_eq!(last.message, "Install finished: 0 copied, 2 failed, 0 skipped");
        assert_eq!(
            lines
                .iter()
                .filter(|l| l.message.starts_with("Copy failed"))
                .count(),
            2
        );
    }

    #[test]
    fn summary_for_clean_run() {
        let mut report = InstallReport::default();
        report.record_copy(Category::PerUser);
        report.record_skip();

        let lines = report.summary_lines(CategorySet::new(false, true));
        assert_eq!(lines[0], LogLine::ok("Copied 1 .txt file(s) to user cfg (video preset)"));
        assert_eq!(lines[1].level, LogLevel::Info);
        assert_eq!(
            lines.last().unwrap(),
            &LogLine::ok("Install finished: 1 copied, 0 failed, 1 skipped")
        );
    }

    #[test]
    fn report_json_field_names() {
        let json = serde_json::to_string(&InstallReport::default()).unwrap();
        assert!(json.contains("\"globalCopied\""));
        assert!(json.contains("\"userCopied\""));
    }
}
