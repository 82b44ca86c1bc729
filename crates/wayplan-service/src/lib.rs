//! **wayplan-service** — planner selection and the path request façade.
//!
//! [`PathRequestManager`] is the single integration point consumers talk to:
//! it owns the registered planners, resolves each query to one strategy via
//! [`choose_planner`], executes immediately or under a per-frame budget, and
//! hands results back through a ticket-and-poll surface. The manager is
//! constructed once by the application's composition root and passed by
//! reference to consumers; there is no ambient singleton.

pub mod manager;
pub mod selector;

pub use manager::{ExecutionMode, ManagerConfig, PathRequestManager, PathTicket};
pub use selector::choose_planner;
