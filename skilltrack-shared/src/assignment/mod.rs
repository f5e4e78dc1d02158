/// Competence assignment engine
///
/// The pipeline every competence write goes through:
///
/// # Modules
///
/// - [`target`]: tagged assignment targets and per-entry issues
/// - [`resolver`]: expands team targets to rosters
/// - [`reconciler`]: diffs desired members against persisted rows
/// - [`status`]: canonical status vocabulary
/// - [`progress`]: the two progress scales
///
/// # Pipeline
///
/// ```text
/// targets → resolve (roster snapshot) → reconcile (diff) → plan
///                                                            │
///                          apply in one transaction  ◄───────┘
/// ```
///
/// Resolution and reconciliation are pure; the HTTP layer loads the
/// directory snapshot and applies the plan inside a single database
/// transaction.

pub mod progress;
pub mod reconciler;
pub mod resolver;
pub mod status;
pub mod target;

pub use reconciler::{reconcile, ReconcilePlan};
pub use resolver::{resolve, ResolveContext, ResolvedMembers};
pub use status::TaskStatus;
pub use target::{AssignTarget, TargetIssue, TargetKind};
