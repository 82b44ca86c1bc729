//! The path request façade: planner registry, per-frame budgets, and the
//! ticket-and-poll result surface.

use std::collections::{HashMap, VecDeque};

use wayplan_core::{
    NavGraph, NavPathStatus, NavProvider, PathQuery, PathTask, PlanFailure, WorldState,
};
use wayplan_paths::{PathPlanner, PlannerKind};

use crate::selector::choose_planner;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// How `enqueue` executes requests.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionMode {
    /// Resolve and run the planner inside `enqueue`; the calling frame pays
    /// for one planner invocation.
    Immediate,
    /// Queue the request; `tick` drains up to the per-frame budgets.
    Budgeted,
}

/// Manager construction parameters.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManagerConfig {
    pub mode: ExecutionMode,
    /// Soft cap on first-time plans executed per tick (budgeted mode).
    pub max_plans_per_frame: usize,
    /// Soft cap on invalidation-triggered re-plans per tick (budgeted mode).
    pub max_replans_per_frame: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Immediate,
            max_plans_per_frame: 8,
            max_replans_per_frame: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// PathTicket
// ---------------------------------------------------------------------------

/// Handle to a submitted request. Poll with
/// [`task`](PathRequestManager::task), claim with
/// [`take`](PathRequestManager::take).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathTicket(u64);

struct Slot {
    query: PathQuery,
    task: PathTask,
}

// ---------------------------------------------------------------------------
// PathRequestManager
// ---------------------------------------------------------------------------

/// The single integration point for path planning.
///
/// Owns the registered planners, the live [`WorldState`] snapshot and the
/// request table. Constructed once by the composition root; consumers
/// receive a reference. Call [`tick`](Self::tick) exactly once per frame,
/// after the frame's requests have been submitted.
pub struct PathRequestManager {
    config: ManagerConfig,
    world: WorldState,
    planners: Vec<Box<dyn PathPlanner>>,
    kinds: Vec<PlannerKind>,
    slots: HashMap<u64, Slot>,
    pending: VecDeque<u64>,
    replans: VecDeque<u64>,
    /// Executed requests whose planner has not finished them yet; re-polled
    /// after planner updates each tick.
    incomplete: Vec<u64>,
    next_ticket: u64,
}

impl PathRequestManager {
    pub fn new(config: ManagerConfig) -> Self {
        if config.mode == ExecutionMode::Budgeted {
            debug_assert!(
                config.max_plans_per_frame > 0 && config.max_replans_per_frame > 0,
                "budgeted mode with a zero budget never completes requests"
            );
        }
        Self {
            config,
            world: WorldState::default(),
            planners: Vec::new(),
            kinds: Vec::new(),
            slots: HashMap::new(),
            pending: VecDeque::new(),
            replans: VecDeque::new(),
            incomplete: Vec::new(),
            next_ticket: 0,
        }
    }

    /// Register a planner strategy. Registering a second planner of the same
    /// kind replaces the first.
    pub fn register_planner(&mut self, planner: Box<dyn PathPlanner>) {
        let kind = planner.kind();
        if let Some(ix) = self.kinds.iter().position(|&k| k == kind) {
            log::warn!("replacing already-registered {kind:?} planner");
            self.planners[ix] = planner;
        } else {
            self.planners.push(planner);
            self.kinds.push(kind);
        }
    }

    /// The strategy tags currently registered.
    pub fn registered_kinds(&self) -> &[PlannerKind] {
        &self.kinds
    }

    /// Replace the world snapshot wholesale. Call before `tick`.
    pub fn set_world_state(&mut self, world: WorldState) {
        self.world = world;
    }

    pub fn world_state(&self) -> &WorldState {
        &self.world
    }

    /// Runtime tuning hook: forward density multipliers to the registered
    /// graph-search and flow-field planners.
    pub fn set_density_multipliers(&mut self, graph_search: f32, flow_field: f32) {
        for planner in &mut self.planners {
            match planner.kind() {
                PlannerKind::GraphSearch => planner.set_density_multiplier(graph_search),
                PlannerKind::FlowField => planner.set_density_multiplier(flow_field),
                PlannerKind::UniformCost => {}
            }
        }
    }

    /// Submit a path request.
    ///
    /// Immediate mode plans in-call; budgeted mode queues and the request
    /// stays `completed = false` for at least one frame.
    pub fn enqueue<N: NavGraph + NavProvider>(&mut self, nav: &N, query: PathQuery) -> PathTicket {
        let id = self.next_ticket;
        self.next_ticket += 1;
        self.slots.insert(
            id,
            Slot {
                query,
                task: PathTask::pending(),
            },
        );
        match self.config.mode {
            ExecutionMode::Immediate => self.execute(nav, id),
            ExecutionMode::Budgeted => self.pending.push_back(id),
        }
        PathTicket(id)
    }

    /// Advance the service by one frame: drain the queues up to their
    /// budgets, tick the planners, then re-poll incremental requests.
    pub fn tick<N: NavGraph + NavProvider>(&mut self, nav: &N, dt: f32) {
        if self.config.mode == ExecutionMode::Budgeted {
            let mut budget = self.config.max_plans_per_frame;
            while budget > 0 {
                let Some(id) = self.pending.pop_front() else {
                    break;
                };
                if !self.slots.contains_key(&id) {
                    continue;
                }
                self.execute(nav, id);
                budget -= 1;
            }
            let mut budget = self.config.max_replans_per_frame;
            while budget > 0 {
                let Some(id) = self.replans.pop_front() else {
                    break;
                };
                if !self.slots.contains_key(&id) {
                    continue;
                }
                self.execute(nav, id);
                budget -= 1;
            }
        }

        for planner in &mut self.planners {
            planner.update(nav, dt);
        }

        let ids = std::mem::take(&mut self.incomplete);
        for id in ids {
            if self.slots.contains_key(&id) {
                self.execute(nav, id);
            }
        }
    }

    /// Re-plan an existing request after invalidation (e.g. a topology
    /// change). Returns false for unknown tickets.
    pub fn replan<N: NavGraph + NavProvider>(&mut self, nav: &N, ticket: PathTicket) -> bool {
        let id = ticket.0;
        if !self.slots.contains_key(&id) {
            return false;
        }
        match self.config.mode {
            ExecutionMode::Immediate => self.execute(nav, id),
            ExecutionMode::Budgeted => {
                if !self.replans.contains(&id) {
                    // Stale corners stay readable while the re-plan waits.
                    if let Some(slot) = self.slots.get_mut(&id) {
                        slot.task.completed = false;
                    }
                    self.replans.push_back(id);
                }
            }
        }
        true
    }

    /// Drop a request by identity, queued or completed. Returns whether the
    /// ticket was known.
    pub fn cancel(&mut self, ticket: PathTicket) -> bool {
        self.slots.remove(&ticket.0).is_some()
    }

    /// Current state of a request, if the ticket is live.
    pub fn task(&self, ticket: PathTicket) -> Option<&PathTask> {
        self.slots.get(&ticket.0).map(|slot| &slot.task)
    }

    /// Claim a completed task, transferring ownership to the caller.
    /// Returns `None` while the request is still owed work.
    pub fn take(&mut self, ticket: PathTicket) -> Option<PathTask> {
        if self.slots.get(&ticket.0)?.task.completed {
            self.slots.remove(&ticket.0).map(|slot| slot.task)
        } else {
            None
        }
    }

    /// Requests waiting in the first-time queue.
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    fn execute<N: NavGraph + NavProvider>(&mut self, nav: &N, id: u64) {
        let Some(slot) = self.slots.get(&id) else {
            return;
        };
        let query = slot.query;

        let task = match choose_planner(&query, &self.world, &self.kinds)
            .and_then(|kind| self.kinds.iter().position(|&k| k == kind))
        {
            Some(ix) => self.planners[ix].request_path(nav, &query),
            None => fallback(nav, &query),
        };

        let completed = task.completed;
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.task = task;
        }
        if !completed {
            self.incomplete.push(id);
        }
    }
}

/// Direct corridor query against the external navigation service, used when
/// no planner is registered. The provider's corridor is returned verbatim.
fn fallback<N: NavProvider>(nav: &N, query: &PathQuery) -> PathTask {
    let start = nav.sample_position(query.start, query.agent_radius, query.area_mask);
    let goal = nav.sample_position(query.goal, query.agent_radius, query.area_mask);
    let (Some(start), Some(goal)) = (start, goal) else {
        log::debug!("fallback: query endpoints are off the navigable surface");
        return PathTask::failed(PlanFailure::InvalidQuery);
    };

    let (corners, status) = nav.calculate_path(start, goal, query.area_mask);
    match status {
        NavPathStatus::Complete | NavPathStatus::Partial if !corners.is_empty() => {
            if status == NavPathStatus::Partial {
                log::debug!("fallback: corridor is partial");
            }
            PathTask::success(corners)
        }
        _ => {
            log::debug!("fallback: navigation service produced no corridor");
            PathTask::failed(PlanFailure::NoPlannerAvailable)
        }
    }
}
