//! **wayplan-paths** — planner strategies for the *wayplan* path-planning
//! service.
//!
//! Three strategies implement the [`PathPlanner`] seam:
//!
//! - [`GraphSearchPlanner`] — heuristic (A\*-style) search with an optional
//!   crowd-density cost term; synchronous.
//! - [`UniformCostPlanner`] — Dijkstra-style search without a heuristic, for
//!   graphs where no good estimate exists or topology changes often.
//! - [`FlowFieldPlanner`] — per-goal direction fields shared by many agents,
//!   built incrementally across frames.
//!
//! All open sets run on [`MinHeap`], an array-backed binary min-heap keyed by
//! `f32` priority. Planner instances are created once and reused: their heaps
//! and node scratch are cleared between searches, not reallocated.

mod flow_field;
mod graph_search;
mod heap;
mod planner;
mod uniform;

#[cfg(test)]
pub(crate) mod testgrid;

pub use flow_field::{FlowFieldConfig, FlowFieldPlanner};
pub use graph_search::GraphSearchPlanner;
pub use heap::MinHeap;
pub use planner::{PathPlanner, PlannerKind};
pub use uniform::UniformCostPlanner;
