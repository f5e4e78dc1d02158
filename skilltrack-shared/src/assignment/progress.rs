/// Progress scoring over assignment statuses
///
/// Two independent scales live here and must not be conflated:
///
/// - The competence scale scores each member 0 / 0.5 / 1 and reports the
///   mean as a percentage. Used wherever a competence or team rolls up
///   the statuses of its members.
/// - The employee review scale maps a member's own workflow status to
///   0 / 25 / 50 / 100. Used only by the self-review screens.
///
/// All functions are pure and total. An empty population scores 0, never
/// NaN, and every percentage stays within [0, 100].

use super::status::TaskStatus;

/// Weight of a single status on the competence scale
///
/// `To Do` counts 0, `In Progress` half, `Completed` and `Validated`
/// full. Unrecognized raw strings canonicalize to `To Do` and therefore
/// count 0.
pub fn status_value(raw: &str) -> f64 {
    match TaskStatus::canonicalize(raw) {
        TaskStatus::ToDo => 0.0,
        TaskStatus::InProgress => 0.5,
        TaskStatus::Completed | TaskStatus::Validated => 1.0,
    }
}

/// Competence completion as a whole percent
///
/// Population mean of [`status_value`] over every assigned member,
/// rounded to the nearest integer. Members without a recorded status
/// belong in the input as `To Do`.
pub fn competence_progress<'a, I>(statuses: I) -> u8
where
    I: IntoIterator<Item = &'a str>,
{
    match mean_value(statuses) {
        Some(mean) => (mean * 100.0).round() as u8,
        None => 0,
    }
}

/// Competence completion rounded to one decimal of percent
///
/// The detailed progress endpoint reports this figure and derives its
/// integer from it, so 1/3 completed shows as 33.3 there while the
/// roster roll-up shows 33.
pub fn competence_progress_tenths<'a, I>(statuses: I) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    match mean_value(statuses) {
        Some(mean) => (mean * 1000.0).round() / 10.0,
        None => 0.0,
    }
}

/// Employee self-review progress on its own 0/25/50/100 scale
///
/// Recognizes `blocked` in addition to the canonical vocabulary.
/// Unrecognized input scores 0.
pub fn employee_review_progress(raw: &str) -> u8 {
    let normalized = raw
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    match normalized.as_str() {
        "blocked" => 25,
        "in progress" | "doing" | "progress" => 50,
        "completed" | "done" => 100,
        _ => 0,
    }
}

fn mean_value<'a, I>(statuses: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sum = 0.0;
    let mut count = 0u32;
    for status in statuses {
        sum += status_value(status);
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / f64::from(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_values() {
        assert_eq!(status_value("To Do"), 0.0);
        assert_eq!(status_value("In Progress"), 0.5);
        assert_eq!(status_value("Completed"), 1.0);
        assert_eq!(status_value("Validated"), 1.0);
        assert_eq!(status_value("no such status"), 0.0);
    }

    #[test]
    fn half_done_pair_scores_fifty() {
        let progress = competence_progress(["Completed", "To Do"]);
        assert_eq!(progress, 50);
    }

    #[test]
    fn empty_population_scores_zero() {
        assert_eq!(competence_progress(std::iter::empty::<&str>()), 0);
        assert_eq!(competence_progress_tenths(std::iter::empty::<&str>()), 0.0);
    }

    #[test]
    fn progress_stays_in_bounds() {
        assert_eq!(competence_progress(["To Do", "To Do", "To Do"]), 0);
        assert_eq!(competence_progress(["Validated", "Completed"]), 100);
        let mixed = competence_progress(["In Progress", "Completed", "To Do", "Validated"]);
        assert!(mixed <= 100);
    }

    #[test]
    fn tenths_keep_one_decimal() {
        let tenths = competence_progress_tenths(["Completed", "To Do", "To Do"]);
        assert_eq!(tenths, 33.3);
        assert_eq!(tenths.round() as u8, 33);
    }

    #[test]
    fn integer_and_tenths_agree_on_exact_values() {
        let statuses = ["Completed", "In Progress"];
        assert_eq!(competence_progress(statuses), 75);
        assert_eq!(competence_progress_tenths(statuses), 75.0);
    }

    #[test]
    fn employee_scale_is_independent() {
        assert_eq!(employee_review_progress("to do"), 0);
        assert_eq!(employee_review_progress("Blocked"), 25);
        assert_eq!(employee_review_progress("IN_PROGRESS"), 50);
        assert_eq!(employee_review_progress("completed"), 100);
        assert_eq!(employee_review_progress("validated"), 0);
        assert_eq!(employee_review_progress(""), 0);
    }
}
