//! The per-frame world snapshot consulted during planner selection.

/// Process-wide signals refreshed by the simulation loop before each frame.
///
/// Selection is a pure function of the query and this snapshot: the value is
/// replaced wholesale between frames and read-only within one.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldState {
    /// Biases selection toward heuristic search.
    pub map_is_very_large: bool,
    /// The navigation topology mutates often between frames.
    pub frequent_topology_changes: bool,
    /// Crowd density signal, 0.0 when calm.
    pub density_spike_level: f32,
}
