/// Assignment targets and per-entry issue reporting
///
/// A competence is assigned to a mix of individual employees and whole
/// teams. The wire shape is an explicit tagged object, `{"kind":
/// "employee", "id": "e4"}` or `{"kind": "team", "id": "t1"}`. The tag
/// decides how the id is interpreted; ids are never classified by
/// prefix.
///
/// Bad entries never fail a request as a whole. Each one is reported as
/// a [`TargetIssue`] and the rest of the batch proceeds.

use serde::{Deserialize, Serialize};

/// What a target points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Employee,
    Team,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Employee => "employee",
            TargetKind::Team => "team",
        }
    }
}

/// One assignment target as sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AssignTarget {
    Employee { id: String },
    Team { id: String },
}

impl AssignTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            AssignTarget::Employee { .. } => TargetKind::Employee,
            AssignTarget::Team { .. } => TargetKind::Team,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            AssignTarget::Employee { id } | AssignTarget::Team { id } => id,
        }
    }

    /// Parses a batch of raw JSON entries into targets
    ///
    /// Entries that do not match the tagged shape become
    /// [`TargetIssue::InvalidTarget`] instead of failing the batch.
    pub fn parse_all(raw: &[serde_json::Value]) -> (Vec<AssignTarget>, Vec<TargetIssue>) {
        let mut targets = Vec::with_capacity(raw.len());
        let mut issues = Vec::new();
        for value in raw {
            match serde_json::from_value::<AssignTarget>(value.clone()) {
                Ok(target) => targets.push(target),
                Err(_) => issues.push(TargetIssue::InvalidTarget {
                    raw: value.to_string(),
                }),
            }
        }
        (targets, issues)
    }
}

/// Per-entry problem discovered while parsing or resolving targets
///
/// Issues ride back to the caller in the response's `unresolved` array.
/// They are never turned into a request-level error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TargetIssue {
    /// Well-formed target whose entity does not exist in this company
    ReferenceNotFound { kind: TargetKind, id: String },

    /// Entry that does not match the `{kind, id}` shape
    InvalidTarget { raw: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_shape_round_trips() {
        let target: AssignTarget =
            serde_json::from_value(json!({"kind": "employee", "id": "e4"})).unwrap();
        assert_eq!(target, AssignTarget::Employee { id: "e4".into() });

        let target: AssignTarget =
            serde_json::from_value(json!({"kind": "team", "id": "t1"})).unwrap();
        assert_eq!(target, AssignTarget::Team { id: "t1".into() });
    }

    #[test]
    fn tag_decides_not_the_id_prefix() {
        // An employee-shaped id under a team tag stays a team target.
        let target: AssignTarget =
            serde_json::from_value(json!({"kind": "team", "id": "e9"})).unwrap();
        assert_eq!(target.kind(), TargetKind::Team);
        assert_eq!(target.id(), "e9");
    }

    #[test]
    fn parse_all_reports_bad_entries_and_keeps_going() {
        let raw = vec![
            json!({"kind": "employee", "id": "e1"}),
            json!({"kind": "squad", "id": "t1"}),
            json!("e2"),
            json!({"kind": "team", "id": "t1"}),
        ];
        let (targets, issues) = AssignTarget::parse_all(&raw);
        assert_eq!(
            targets,
            vec![
                AssignTarget::Employee { id: "e1".into() },
                AssignTarget::Team { id: "t1".into() },
            ]
        );
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], TargetIssue::InvalidTarget { .. }));
        assert!(matches!(issues[1], TargetIssue::InvalidTarget { .. }));
    }
}
