/// Desired-versus-current reconciliation
///
/// Given the resolved member set for a competence and what is currently
/// persisted, [`reconcile`] produces the minimal add/remove plan for
/// per-employee task rows and team assignment rows. The plan is what a
/// write path applies inside its transaction and what the notifier is
/// fed from.
///
/// The function is pure set arithmetic. Applying a plan and reconciling
/// again yields an empty plan, and within each category the add and
/// remove lists never overlap.

use std::collections::BTreeSet;

use super::resolver::ResolvedMembers;

/// Minimal change set to move persisted state to the desired state
///
/// Lists are sorted. New user tasks are created with status `To Do`;
/// removal deletes the row along with any reviews it carried.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub to_add_user_tasks: Vec<String>,
    pub to_remove_user_tasks: Vec<String>,
    pub to_add_team_assignments: Vec<String>,
    pub to_remove_team_assignments: Vec<String>,
}

impl ReconcilePlan {
    /// True when applying the plan would touch nothing
    pub fn is_empty(&self) -> bool {
        self.to_add_user_tasks.is_empty()
            && self.to_remove_user_tasks.is_empty()
            && self.to_add_team_assignments.is_empty()
            && self.to_remove_team_assignments.is_empty()
    }
}

/// Diffs the desired member set against persisted assignment rows
pub fn reconcile(
    desired: &ResolvedMembers,
    current_user_tasks: &BTreeSet<String>,
    current_team_assignments: &BTreeSet<String>,
) -> ReconcilePlan {
    ReconcilePlan {
        to_add_user_tasks: difference(&desired.employee_ids, current_user_tasks),
        to_remove_user_tasks: difference(current_user_tasks, &desired.employee_ids),
        to_add_team_assignments: difference(&desired.team_ids, current_team_assignments),
        to_remove_team_assignments: difference(current_team_assignments, &desired.team_ids),
    }
}

fn difference(left: &BTreeSet<String>, right: &BTreeSet<String>) -> Vec<String> {
    left.difference(right).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desired(employees: &[&str], teams: &[&str]) -> ResolvedMembers {
        ResolvedMembers {
            employee_ids: employees.iter().map(|s| s.to_string()).collect(),
            team_ids: teams.iter().map(|s| s.to_string()).collect(),
            issues: Vec::new(),
        }
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fresh_competence_adds_everything() {
        let plan = reconcile(&desired(&["e1", "e2"], &["t1"]), &set(&[]), &set(&[]));

        assert_eq!(plan.to_add_user_tasks, ["e1", "e2"]);
        assert_eq!(plan.to_add_team_assignments, ["t1"]);
        assert!(plan.to_remove_user_tasks.is_empty());
        assert!(plan.to_remove_team_assignments.is_empty());
    }

    #[test]
    fn membership_change_swaps_only_the_difference() {
        // e1 was In Progress, e2 Completed; the new desired set is e2 + e3.
        let plan = reconcile(&desired(&["e2", "e3"], &[]), &set(&["e1", "e2"]), &set(&[]));

        assert_eq!(plan.to_add_user_tasks, ["e3"]);
        assert_eq!(plan.to_remove_user_tasks, ["e1"]);
    }

    #[test]
    fn dropped_team_is_unassigned() {
        let plan = reconcile(
            &desired(&["e1"], &["t2"]),
            &set(&["e1"]),
            &set(&["t1", "t2"]),
        );

        assert_eq!(plan.to_add_team_assignments, Vec::<String>::new());
        assert_eq!(plan.to_remove_team_assignments, ["t1"]);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let desired = desired(&["e2", "e3"], &["t1"]);
        let mut user_tasks = set(&["e1", "e2"]);
        let mut team_assignments = set(&[]);

        let plan = reconcile(&desired, &user_tasks, &team_assignments);
        for id in &plan.to_add_user_tasks {
            user_tasks.insert(id.clone());
        }
        for id in &plan.to_remove_user_tasks {
            user_tasks.remove(id);
        }
        for id in &plan.to_add_team_assignments {
            team_assignments.insert(id.clone());
        }
        for id in &plan.to_remove_team_assignments {
            team_assignments.remove(id);
        }

        let settled = reconcile(&desired, &user_tasks, &team_assignments);
        assert!(settled.is_empty());
    }

    #[test]
    fn add_and_remove_sets_are_disjoint() {
        let plan = reconcile(
            &desired(&["e1", "e3", "e5"], &["t1", "t3"]),
            &set(&["e2", "e3", "e4"]),
            &set(&["t2", "t3"]),
        );

        for added in &plan.to_add_user_tasks {
            assert!(!plan.to_remove_user_tasks.contains(added));
        }
        for added in &plan.to_add_team_assignments {
            assert!(!plan.to_remove_team_assignments.contains(added));
        }
    }

    #[test]
    fn plan_lists_are_sorted() {
        let plan = reconcile(&desired(&["e9", "e1", "e5"], &[]), &set(&[]), &set(&[]));
        assert_eq!(plan.to_add_user_tasks, ["e1", "e5", "e9"]);
    }

    #[test]
    fn no_change_yields_empty_plan() {
        let plan = reconcile(
            &desired(&["e1", "e2"], &["t1"]),
            &set(&["e1", "e2"]),
            &set(&["t1"]),
        );
        assert!(plan.is_empty());
    }
}
