/// Task status vocabulary and canonicalization
///
/// Clients and legacy imports send status strings in many spellings
/// ("IN_PROGRESS", "doing", "  Completed "). Everything funnels through
/// [`TaskStatus::canonicalize`] before it is persisted or scored, so the
/// rest of the system only ever deals with the four canonical labels.
///
/// Canonicalization is total: any string maps to some status, with
/// `To Do` as the fallback. It never fails and never allocates beyond
/// the normalization pass.
///
/// # Example
///
/// ```
/// use skilltrack_shared::assignment::status::TaskStatus;
///
/// assert_eq!(TaskStatus::canonicalize("IN_PROGRESS"), TaskStatus::InProgress);
/// assert_eq!(TaskStatus::canonicalize("doing"), TaskStatus::InProgress);
/// assert_eq!(TaskStatus::canonicalize("  In Progress "), TaskStatus::InProgress);
/// assert_eq!(TaskStatus::canonicalize("anything else"), TaskStatus::ToDo);
/// ```

use serde::{Deserialize, Serialize};

/// Canonical assignment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Assigned but not started (the default for new assignments)
    #[serde(rename = "To Do")]
    ToDo,

    /// Work has started
    #[serde(rename = "In Progress")]
    InProgress,

    /// Work is finished, pending validation
    #[serde(rename = "Completed")]
    Completed,

    /// Finished and signed off by HR
    #[serde(rename = "Validated")]
    Validated,
}

impl TaskStatus {
    /// Converts status to its canonical label for storage and display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Validated => "Validated",
        }
    }

    /// Compact label used by the dashboard UI
    ///
    /// Not injective: `Completed` and `Validated` both render as
    /// "finished".
    pub fn ui_label(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "to do",
            TaskStatus::InProgress => "doing",
            TaskStatus::Completed | TaskStatus::Validated => "finished",
        }
    }

    /// Maps any raw status string onto a canonical status
    ///
    /// Lowercases, trims, and collapses runs of `_`, `-`, and whitespace
    /// into single spaces before matching. Unrecognized input falls back
    /// to `To Do`.
    pub fn canonicalize(raw: &str) -> TaskStatus {
        let normalized = raw
            .to_lowercase()
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        match normalized.as_str() {
            "in progress" | "doing" | "progress" => TaskStatus::InProgress,
            "done" | "completed" => TaskStatus::Completed,
            "validated" | "approved" => TaskStatus::Validated,
            _ => TaskStatus::ToDo,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_equivalent_spellings() {
        assert_eq!(TaskStatus::canonicalize("IN_PROGRESS"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::canonicalize("doing"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::canonicalize("  In Progress "), TaskStatus::InProgress);
        assert_eq!(
            TaskStatus::canonicalize("IN_PROGRESS"),
            TaskStatus::canonicalize("doing")
        );
    }

    #[test]
    fn canonicalize_collapses_separator_runs() {
        assert_eq!(TaskStatus::canonicalize("in__progress"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::canonicalize("in-_-progress"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::canonicalize("in \t progress"), TaskStatus::InProgress);
    }

    #[test]
    fn canonicalize_completed_and_validated_synonyms() {
        assert_eq!(TaskStatus::canonicalize("done"), TaskStatus::Completed);
        assert_eq!(TaskStatus::canonicalize("Completed"), TaskStatus::Completed);
        assert_eq!(TaskStatus::canonicalize("VALIDATED"), TaskStatus::Validated);
        assert_eq!(TaskStatus::canonicalize("approved"), TaskStatus::Validated);
    }

    #[test]
    fn canonicalize_falls_back_to_todo() {
        assert_eq!(TaskStatus::canonicalize(""), TaskStatus::ToDo);
        assert_eq!(TaskStatus::canonicalize("to do"), TaskStatus::ToDo);
        assert_eq!(TaskStatus::canonicalize("assigned"), TaskStatus::ToDo);
        assert_eq!(TaskStatus::canonicalize("garbage value"), TaskStatus::ToDo);
    }

    #[test]
    fn canonical_labels_are_stable() {
        for status in [
            TaskStatus::ToDo,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Validated,
        ] {
            assert_eq!(TaskStatus::canonicalize(status.as_str()), status);
        }
    }

    #[test]
    fn ui_label_collapses_finished_states() {
        assert_eq!(TaskStatus::ToDo.ui_label(), "to do");
        assert_eq!(TaskStatus::InProgress.ui_label(), "doing");
        assert_eq!(TaskStatus::Completed.ui_label(), "finished");
        assert_eq!(TaskStatus::Validated.ui_label(), "finished");
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(TaskStatus::InProgress.to_string(), "In Progress");
    }
}
