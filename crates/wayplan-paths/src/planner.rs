//! The planner strategy seam: [`PathPlanner`], [`PlannerKind`], and the
//! search scratch shared by the graph-search planners.

use glam::Vec3;
use wayplan_core::{NavGraph, NavNode, PathQuery, PathTask};

// ---------------------------------------------------------------------------
// PlannerKind
// ---------------------------------------------------------------------------

/// Capability tag identifying a planner strategy.
///
/// Selection is a switch over this tag; planners report it through
/// [`PathPlanner::kind`] so the service never inspects concrete types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlannerKind {
    /// Heuristic single source-to-goal search.
    GraphSearch,
    /// Dijkstra-style search without a heuristic.
    UniformCost,
    /// Precomputed per-goal direction fields.
    FlowField,
}

// ---------------------------------------------------------------------------
// PathPlanner
// ---------------------------------------------------------------------------

/// A planning strategy registered with the request manager.
pub trait PathPlanner {
    /// The strategy tag used during selection.
    fn kind(&self) -> PlannerKind;

    /// Execute or advance a path request.
    ///
    /// Synchronous planners always return a completed task. Incremental
    /// planners may return `completed = false`; the manager re-polls such
    /// requests on later ticks.
    fn request_path(&mut self, graph: &dyn NavGraph, query: &PathQuery) -> PathTask;

    /// Per-frame tick for staged work. Planners with nothing to stage keep
    /// the default.
    fn update(&mut self, _graph: &dyn NavGraph, _dt: f32) {}

    /// Runtime tuning hook for density-aware planners. Others ignore it.
    fn set_density_multiplier(&mut self, _multiplier: f32) {}
}

// ---------------------------------------------------------------------------
// Search scratch
// ---------------------------------------------------------------------------

/// Sentinel parent meaning "search root".
pub(crate) const NO_PARENT: u32 = u32::MAX;

/// Per-node search record. Stale records from earlier searches are ignored
/// via the generation stamp rather than cleared.
#[derive(Clone)]
pub(crate) struct SearchNode {
    pub(crate) g: f32,
    pub(crate) parent: u32,
    pub(crate) generation: u32,
    pub(crate) open: bool,
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            g: 0.0,
            parent: NO_PARENT,
            generation: 0,
            open: false,
        }
    }
}

/// Reusable per-planner search state: node records, the generation counter
/// that lazily invalidates them, and a scratch buffer for neighbor queries.
pub(crate) struct SearchScratch {
    pub(crate) nodes: Vec<SearchNode>,
    pub(crate) generation: u32,
    pub(crate) nbuf: Vec<NavNode>,
}

impl SearchScratch {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generation: 0,
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Grow the node table to `node_count` if needed and start a fresh
    /// search generation.
    pub(crate) fn begin(&mut self, node_count: usize) -> u32 {
        if node_count > self.nodes.len() {
            self.nodes.resize(node_count, SearchNode::default());
        }
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Walk parent links back from `goal_idx` and build the corner polyline:
    /// the caller's exact endpoints with interior node positions between.
    pub(crate) fn reconstruct(
        &self,
        graph: &dyn NavGraph,
        query: &PathQuery,
        goal_idx: usize,
    ) -> Vec<Vec3> {
        let mut chain = Vec::new();
        let mut ci = goal_idx as u32;
        while ci != NO_PARENT {
            chain.push(ci);
            ci = self.nodes[ci as usize].parent;
        }
        chain.reverse();

        let mut corners = Vec::with_capacity(chain.len() + 1);
        corners.push(query.start);
        for &idx in chain.iter().skip(1).take(chain.len().saturating_sub(2)) {
            corners.push(graph.position(NavNode(idx)));
        }
        corners.push(query.goal);
        corners
    }
}
