/// Target resolution against the current directory state
///
/// Resolution turns a batch of [`AssignTarget`]s into the concrete set
/// of employees and teams the competence should cover. Team targets
/// expand to the team's roster as it stands at the moment of the call;
/// later membership churn does not rewrite past resolutions.
///
/// The function is pure. Callers load a [`ResolveContext`] (rosters and
/// the set of employee ids that actually exist) from the database,
/// inside the same transaction that will apply the resulting plan.

use std::collections::{BTreeMap, BTreeSet};

use super::target::{AssignTarget, TargetIssue, TargetKind};

/// Directory snapshot the resolver works against
///
/// Both maps are company-scoped by the caller: a team or employee from
/// another company simply does not appear here and resolves to
/// `ReferenceNotFound`.
#[derive(Debug, Default, Clone)]
pub struct ResolveContext {
    /// team id to current member employee ids
    pub team_rosters: BTreeMap<String, Vec<String>>,
    /// employee ids that exist
    pub known_employees: BTreeSet<String>,
}

impl ResolveContext {
    /// Builds a context from directory query rows
    ///
    /// `roster_rows` carry one row per (team, member) pair; a team with
    /// no members contributes a single row with `None` so it still
    /// registers as existing.
    pub fn from_directory(
        roster_rows: Vec<(String, Option<String>)>,
        known_employees: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut team_rosters: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (team_id, member) in roster_rows {
            let roster = team_rosters.entry(team_id).or_default();
            if let Some(employee_id) = member {
                roster.push(employee_id);
            }
        }
        ResolveContext {
            team_rosters,
            known_employees: known_employees.into_iter().collect(),
        }
    }
}

/// Outcome of resolving a target batch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolvedMembers {
    /// every employee covered, individually targeted or via a team
    pub employee_ids: BTreeSet<String>,
    /// every team targeted as a unit
    pub team_ids: BTreeSet<String>,
    /// per-entry failures, in input order
    pub issues: Vec<TargetIssue>,
}

/// Expands targets to employees and teams
///
/// Unknown references are reported and skipped; the batch always
/// resolves. Ordered sets make the expansion deterministic for a given
/// context.
pub fn resolve(targets: &[AssignTarget], context: &ResolveContext) -> ResolvedMembers {
    let mut resolved = ResolvedMembers::default();

    for target in targets {
        match target {
            AssignTarget::Employee { id } => {
                if context.known_employees.contains(id.as_str()) {
                    resolved.employee_ids.insert(id.clone());
                } else {
                    resolved.issues.push(TargetIssue::ReferenceNotFound {
                        kind: TargetKind::Employee,
                        id: id.clone(),
                    });
                }
            }
            AssignTarget::Team { id } => match context.team_rosters.get(id.as_str()) {
                Some(roster) => {
                    resolved.team_ids.insert(id.clone());
                    resolved
                        .employee_ids
                        .extend(roster.iter().cloned());
                }
                None => {
                    resolved.issues.push(TargetIssue::ReferenceNotFound {
                        kind: TargetKind::Team,
                        id: id.clone(),
                    });
                }
            },
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ResolveContext {
        let mut team_rosters = BTreeMap::new();
        team_rosters.insert("t1".to_string(), vec!["e1".to_string(), "e2".to_string()]);
        team_rosters.insert("t2".to_string(), vec![]);
        let known_employees = ["e1", "e2", "e3"]
            .into_iter()
            .map(String::from)
            .collect();
        ResolveContext {
            team_rosters,
            known_employees,
        }
    }

    #[test]
    fn team_target_expands_to_current_roster() {
        let targets = vec![AssignTarget::Team { id: "t1".into() }];
        let resolved = resolve(&targets, &context());

        assert_eq!(resolved.team_ids.iter().collect::<Vec<_>>(), ["t1"]);
        assert_eq!(
            resolved.employee_ids.iter().collect::<Vec<_>>(),
            ["e1", "e2"]
        );
        assert!(resolved.issues.is_empty());
    }

    #[test]
    fn individual_and_team_targets_merge() {
        let targets = vec![
            AssignTarget::Employee { id: "e3".into() },
            AssignTarget::Team { id: "t1".into() },
            AssignTarget::Employee { id: "e1".into() },
        ];
        let resolved = resolve(&targets, &context());

        assert_eq!(
            resolved.employee_ids.iter().collect::<Vec<_>>(),
            ["e1", "e2", "e3"]
        );
        assert_eq!(resolved.team_ids.iter().collect::<Vec<_>>(), ["t1"]);
    }

    #[test]
    fn unknown_references_are_reported_not_fatal() {
        let targets = vec![
            AssignTarget::Employee { id: "e99".into() },
            AssignTarget::Team { id: "t99".into() },
            AssignTarget::Employee { id: "e1".into() },
        ];
        let resolved = resolve(&targets, &context());

        assert_eq!(resolved.employee_ids.iter().collect::<Vec<_>>(), ["e1"]);
        assert!(resolved.team_ids.is_empty());
        assert_eq!(
            resolved.issues,
            vec![
                TargetIssue::ReferenceNotFound {
                    kind: TargetKind::Employee,
                    id: "e99".into()
                },
                TargetIssue::ReferenceNotFound {
                    kind: TargetKind::Team,
                    id: "t99".into()
                },
            ]
        );
    }

    #[test]
    fn empty_team_still_records_the_assignment() {
        let targets = vec![AssignTarget::Team { id: "t2".into() }];
        let resolved = resolve(&targets, &context());

        assert_eq!(resolved.team_ids.iter().collect::<Vec<_>>(), ["t2"]);
        assert!(resolved.employee_ids.is_empty());
    }

    #[test]
    fn from_directory_keeps_memberless_teams() {
        let context = ResolveContext::from_directory(
            vec![
                ("t1".to_string(), Some("e1".to_string())),
                ("t1".to_string(), Some("e2".to_string())),
                ("t2".to_string(), None),
            ],
            vec!["e1".to_string(), "e2".to_string()],
        );

        assert_eq!(context.team_rosters["t1"], ["e1", "e2"]);
        assert!(context.team_rosters["t2"].is_empty());
    }

    #[test]
    fn expansion_is_deterministic() {
        let targets = vec![
            AssignTarget::Team { id: "t1".into() },
            AssignTarget::Employee { id: "e3".into() },
        ];
        let first = resolve(&targets, &context());
        let second = resolve(&targets, &context());
        assert_eq!(first, second);
        assert_eq!(
            first.employee_ids.into_iter().collect::<Vec<_>>(),
            vec!["e1", "e2", "e3"]
        );
    }
}
