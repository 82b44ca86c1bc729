//! The path result container: [`PathTask`], [`PlannerData`], [`PlanFailure`].

use std::fmt;

use glam::Vec3;

// ---------------------------------------------------------------------------
// PlannerData
// ---------------------------------------------------------------------------

/// Opaque handle a planner may attach to a task for reuse on later requests,
/// e.g. a flow-field cache key. Never interpreted by the request manager.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerData(pub u64);

// ---------------------------------------------------------------------------
// PlanFailure
// ---------------------------------------------------------------------------

/// Why an unsuccessful task failed.
///
/// Ordinary planning failure is a value on the task, never a panic; this enum
/// exists for diagnostics and logging.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlanFailure {
    /// No planner was registered and the external navigation fallback also
    /// failed to produce a corridor.
    NoPlannerAvailable,
    /// The planner exhausted its search space without reaching the goal.
    PlanningFailed,
    /// Start or goal could not be resolved to a navigable position.
    InvalidQuery,
}

impl fmt::Display for PlanFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPlannerAvailable => {
                write!(f, "no planner available and navigation fallback failed")
            }
            Self::PlanningFailed => write!(f, "search space exhausted without reaching goal"),
            Self::InvalidQuery => write!(f, "start or goal is off the navigable surface"),
        }
    }
}

impl std::error::Error for PlanFailure {}

// ---------------------------------------------------------------------------
// PathTask
// ---------------------------------------------------------------------------

/// The result of a path request, owned by the caller once claimed.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathTask {
    /// False while an incremental planner or the budgeted queue still owes
    /// work on this request.
    pub completed: bool,
    /// True iff a usable corridor or direction was produced.
    pub succeeded: bool,
    /// Ordered route polyline. Empty on failure. A flow-field result is a
    /// two-point corridor stub along the field direction.
    pub corners: Vec<Vec3>,
    /// Opaque per-planner handle, if the planner attached one.
    pub planner_data: Option<PlannerData>,
    /// Failure diagnostic for unsuccessful tasks.
    pub failure: Option<PlanFailure>,
}

impl PathTask {
    /// A task that has not been executed yet.
    pub fn pending() -> Self {
        Self::default()
    }

    /// A completed, successful task carrying `corners`.
    pub fn success(corners: Vec<Vec3>) -> Self {
        Self {
            completed: true,
            succeeded: true,
            corners,
            planner_data: None,
            failure: None,
        }
    }

    /// A completed, unsuccessful task with a failure diagnostic.
    pub fn failed(failure: PlanFailure) -> Self {
        Self {
            completed: true,
            succeeded: false,
            corners: Vec::new(),
            planner_data: None,
            failure: Some(failure),
        }
    }

    /// Total polyline length of the corridor.
    pub fn path_length(&self) -> f32 {
        self.corners
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_neither_completed_nor_succeeded() {
        let t = PathTask::pending();
        assert!(!t.completed);
        assert!(!t.succeeded);
        assert!(t.corners.is_empty());
    }

    #[test]
    fn failed_carries_diagnostic() {
        let t = PathTask::failed(PlanFailure::InvalidQuery);
        assert!(t.completed);
        assert!(!t.succeeded);
        assert!(t.corners.is_empty());
        assert_eq!(t.failure, Some(PlanFailure::InvalidQuery));
    }

    #[test]
    fn path_length_sums_segments() {
        let t = PathTask::success(vec![
            Vec3::ZERO,
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(3.0, 4.0, 0.0),
        ]);
        assert!((t.path_length() - 7.0).abs() < 1e-6);
        assert_eq!(PathTask::pending().path_length(), 0.0);
    }

    #[test]
    fn failure_displays() {
        let e: Box<dyn std::error::Error> = Box::new(PlanFailure::PlanningFailed);
        assert!(e.to_string().contains("exhausted"));
    }
}
