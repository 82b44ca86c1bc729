//! Traits through which planners reach the external navigation service.
//!
//! The underlying navigation-mesh geometry is not part of this crate: point
//! sampling, node adjacency and density sampling are provided by the host
//! through [`NavGraph`], and the direct corridor fallback through
//! [`NavProvider`].

use glam::Vec3;

use crate::query::AreaMask;

// ---------------------------------------------------------------------------
// NavNode
// ---------------------------------------------------------------------------

/// Opaque id of a node in the external navigation graph.
///
/// Ids must be dense indices in `0..NavGraph::node_count()`; planners size
/// their reusable scratch arrays from the count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavNode(pub u32);

impl NavNode {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

// ---------------------------------------------------------------------------
// NavGraph
// ---------------------------------------------------------------------------

/// Graph view over the navigation mesh used by the search planners.
pub trait NavGraph {
    /// Number of nodes in the graph. Node ids are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// Snap a world-space point to the nearest navigable node within
    /// `radius`, honoring `mask`. `None` if nothing navigable is in range.
    fn nearest_node(&self, point: Vec3, radius: f32, mask: AreaMask) -> Option<NavNode>;

    /// World-space position of a node.
    fn position(&self, node: NavNode) -> Vec3;

    /// Append the traversable neighbors of `node` into `buf`, honoring
    /// `mask`. The caller clears `buf` before calling.
    fn neighbors(&self, node: NavNode, mask: AreaMask, buf: &mut Vec<NavNode>);

    /// Local crowd density at a node, used as an extra traversal cost by
    /// density-aware planners. Hosts without a crowd subsystem keep the
    /// default.
    fn density(&self, _node: NavNode) -> f32 {
        0.0
    }
}

// ---------------------------------------------------------------------------
// NavProvider
// ---------------------------------------------------------------------------

/// Outcome of a direct corridor query against the navigation service.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavPathStatus {
    /// The corridor reaches the goal.
    Complete,
    /// The corridor ends short of the goal but is usable.
    Partial,
    /// No usable corridor.
    Invalid,
}

/// Direct query surface of the external navigation service, used by the
/// request manager as its ultimate fallback when no planner is registered.
pub trait NavProvider {
    /// Snap `point` to the navigable surface within `max_distance`.
    fn sample_position(&self, point: Vec3, max_distance: f32, mask: AreaMask) -> Option<Vec3>;

    /// Compute a direct corridor from `start` to `goal`.
    fn calculate_path(&self, start: Vec3, goal: Vec3, mask: AreaMask) -> (Vec<Vec3>, NavPathStatus);
}
