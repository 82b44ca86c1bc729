//! **wayplan-core** — request contracts and navigation traits for the
//! *wayplan* path-planning service.
//!
//! This crate provides the types exchanged between callers and the service:
//! the [`PathQuery`] request, the [`PathTask`] result container, the
//! [`WorldState`] snapshot consulted during planner selection, and the
//! [`NavGraph`] / [`NavProvider`] traits through which planners reach the
//! external navigation mesh.

pub mod nav;
pub mod query;
pub mod task;
pub mod world;

pub use glam::Vec3;
pub use nav::{NavGraph, NavNode, NavPathStatus, NavProvider};
pub use query::{AreaMask, GroupId, PathQuery, PlannerHints};
pub use task::{PathTask, PlanFailure, PlannerData};
pub use world::WorldState;
