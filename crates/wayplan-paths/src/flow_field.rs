//! Flow-field planning: per-goal direction fields shared by many agents.
//!
//! When a crowd of agents heads to one destination, per-agent graph search
//! repeats the same work. This planner instead runs Dijkstra outward from
//! the goal once, records a next-hop per node, and derives a normalized
//! direction field the whole crowd samples in O(1). Construction is staged:
//! a bounded slice of expansions runs inside the request itself and the rest
//! proceeds under a per-tick budget, so one expensive field never stalls a
//! frame.

use std::collections::{HashMap, VecDeque};

use glam::Vec3;
use wayplan_core::{
    AreaMask, NavGraph, NavNode, PathQuery, PathTask, PlanFailure, PlannerData,
};

use crate::heap::MinHeap;
use crate::planner::{PathPlanner, PlannerKind};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Tuning knobs for [`FlowFieldPlanner`].
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowFieldConfig {
    /// Goal positions are quantized to cells of this size; queries landing in
    /// the same cell share one field.
    pub cell_size: f32,
    /// Expansions performed in-call when a request starts or joins a build.
    /// Small graphs finish immediately; large ones go incremental.
    pub work_per_request: usize,
    /// Expansions performed per `update` tick on the in-flight build.
    pub work_per_tick: usize,
    /// Fields with no lookup for this many frames are discarded.
    pub evict_after_frames: u64,
}

impl Default for FlowFieldConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            work_per_request: 512,
            work_per_tick: 2048,
            evict_after_frames: 600,
        }
    }
}

// ---------------------------------------------------------------------------
// Field key
// ---------------------------------------------------------------------------

/// A goal position quantized to the configured cell size.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct FieldKey {
    x: i32,
    y: i32,
    z: i32,
}

impl FieldKey {
    fn quantize(p: Vec3, cell: f32) -> Self {
        Self {
            x: (p.x / cell).floor() as i32,
            y: (p.y / cell).floor() as i32,
            z: (p.z / cell).floor() as i32,
        }
    }

    /// 21 bits per axis, offset-binary, for the opaque task handle.
    fn packed(self) -> u64 {
        const MASK: u64 = (1 << 21) - 1;
        let enc = |v: i32| (v as i64 + (1 << 20)) as u64 & MASK;
        enc(self.x) << 42 | enc(self.y) << 21 | enc(self.z)
    }
}

// ---------------------------------------------------------------------------
// Field storage
// ---------------------------------------------------------------------------

/// A completed per-goal direction field.
struct FlowSheet {
    /// Normalized direction toward the goal per node. `Vec3::ZERO` at the
    /// goal itself and on unreachable nodes.
    dir: Vec<Vec3>,
    /// Whether the node was reached by the outward pass at all.
    reached: Vec<bool>,
    goal: NavNode,
    /// Frame of the most recent lookup, for eviction.
    last_used: u64,
}

/// Dijkstra-from-goal state for the field under construction.
struct FieldBuild {
    key: FieldKey,
    mask: AreaMask,
    goal: NavNode,
    cost: Vec<f32>,
    next: Vec<u32>,
    settled: Vec<bool>,
}

const NO_HOP: u32 = u32::MAX;

// ---------------------------------------------------------------------------
// FlowFieldPlanner
// ---------------------------------------------------------------------------

/// Planner for the many-agents-to-one-goal case.
///
/// Fields are keyed by quantized goal cell only; the first requesting
/// query's area mask seeds the build, and later queries to the same cell
/// share the result regardless of their own mask. Callers needing
/// mask-disjoint fields should use distinct goal cells.
pub struct FlowFieldPlanner {
    config: FlowFieldConfig,
    density_multiplier: f32,
    /// Frame counter advanced by `update`, for the eviction sweep.
    frame: u64,
    fields: HashMap<FieldKey, FlowSheet>,
    build: Option<FieldBuild>,
    queue: VecDeque<(FieldKey, NavNode, AreaMask)>,
    open: MinHeap<u32>,
    nbuf: Vec<NavNode>,
}

impl FlowFieldPlanner {
    pub fn new() -> Self {
        Self::with_config(FlowFieldConfig::default())
    }

    pub fn with_config(config: FlowFieldConfig) -> Self {
        Self {
            config,
            density_multiplier: 0.0,
            frame: 0,
            fields: HashMap::new(),
            build: None,
            queue: VecDeque::new(),
            open: MinHeap::new(),
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Number of completed fields currently cached.
    pub fn cached_fields(&self) -> usize {
        self.fields.len()
    }

    fn request(&mut self, graph: &dyn NavGraph, query: &PathQuery) -> PathTask {
        let Some(start) = graph.nearest_node(query.start, query.agent_radius, query.area_mask)
        else {
            log::debug!("flow field: start {:?} is off the navigable surface", query.start);
            return PathTask::failed(PlanFailure::InvalidQuery);
        };

        let key = FieldKey::quantize(query.goal, self.config.cell_size);
        let frame = self.frame;
        let cell_size = self.config.cell_size;
        if let Some(sheet) = self.fields.get_mut(&key) {
            sheet.last_used = frame;
            return lookup(sheet, query, start, key, cell_size);
        }

        // No field yet; the goal must resolve before a build is attempted,
        // and on failure no field is retained for this goal.
        let Some(goal) = graph.nearest_node(query.goal, query.agent_radius, query.area_mask)
        else {
            log::debug!("flow field: goal {:?} is off the navigable surface", query.goal);
            return PathTask::failed(PlanFailure::InvalidQuery);
        };

        let in_flight = self.build.as_ref().is_some_and(|b| b.key == key)
            || self.queue.iter().any(|(k, _, _)| *k == key);
        if !in_flight {
            self.queue.push_back((key, goal, query.area_mask));
        }

        // Initial in-call slice; a small graph completes right here.
        self.advance(graph, self.config.work_per_request);
        if let Some(sheet) = self.fields.get_mut(&key) {
            sheet.last_used = frame;
            return lookup(sheet, query, start, key, cell_size);
        }
        PathTask::pending()
    }

    /// Run up to `budget` expansions, starting queued builds as the current
    /// one finishes. One build is in flight at a time.
    fn advance(&mut self, graph: &dyn NavGraph, budget: usize) {
        let mut remaining = budget;
        while remaining > 0 {
            if self.build.is_none() {
                let Some((key, goal, mask)) = self.queue.pop_front() else {
                    return;
                };
                self.begin_build(graph, key, goal, mask);
            }
            if self.expand(graph, &mut remaining) {
                self.finalize(graph);
            }
        }
    }

    fn begin_build(&mut self, graph: &dyn NavGraph, key: FieldKey, goal: NavNode, mask: AreaMask) {
        let n = graph.node_count();
        let mut cost = vec![f32::INFINITY; n];
        if let Some(slot) = cost.get_mut(goal.index()) {
            *slot = 0.0;
        }
        self.open.clear();
        self.open.push(0.0, goal.0);
        self.build = Some(FieldBuild {
            key,
            mask,
            goal,
            cost,
            next: vec![NO_HOP; n],
            settled: vec![false; n],
        });
    }

    /// Pop-and-relax until the slice budget runs out or the open set drains.
    /// Returns true when the build is complete.
    fn expand(&mut self, graph: &dyn NavGraph, remaining: &mut usize) -> bool {
        let Some(build) = self.build.as_mut() else {
            return false;
        };
        while *remaining > 0 {
            let Some((current, _)) = self.open.pop() else {
                return true;
            };
            let ci = current as usize;
            if ci >= build.settled.len() || build.settled[ci] {
                continue;
            }
            build.settled[ci] = true;
            *remaining -= 1;

            let current_cost = build.cost[ci];
            let current_pos = graph.position(NavNode(current));

            self.nbuf.clear();
            graph.neighbors(NavNode(current), build.mask, &mut self.nbuf);

            for &np in self.nbuf.iter() {
                let ni = np.index();
                if ni >= build.cost.len() {
                    continue;
                }
                let step = current_pos.distance(graph.position(np))
                    + self.density_multiplier * graph.density(np);
                let tentative = current_cost + step;
                if tentative < build.cost[ni] {
                    build.cost[ni] = tentative;
                    build.next[ni] = current;
                    self.open.push(tentative, np.0);
                }
            }
        }
        self.open.is_empty()
    }

    /// Derive the normalized direction field from the finished next-hop map.
    fn finalize(&mut self, graph: &dyn NavGraph) {
        let Some(build) = self.build.take() else {
            return;
        };
        let n = build.cost.len();
        let mut dir = vec![Vec3::ZERO; n];
        let mut reached = vec![false; n];
        for i in 0..n {
            if !build.cost[i].is_finite() {
                continue;
            }
            reached[i] = true;
            let hop = build.next[i];
            if hop == NO_HOP {
                continue;
            }
            let delta = graph.position(NavNode(hop)) - graph.position(NavNode(i as u32));
            if delta.length_squared() > 0.0 {
                dir[i] = delta.normalize();
            }
        }
        log::debug!("flow field: built field for goal cell {:?}", build.key);
        self.fields.insert(
            build.key,
            FlowSheet {
                dir,
                reached,
                goal: build.goal,
                last_used: self.frame,
            },
        );
    }
}

/// Sample a completed field into a two-point corridor stub.
fn lookup(
    sheet: &FlowSheet,
    query: &PathQuery,
    start: NavNode,
    key: FieldKey,
    cell_size: f32,
) -> PathTask {
    let data = Some(PlannerData(key.packed()));
    if start == sheet.goal {
        let mut task = PathTask::success(vec![query.start, query.goal]);
        task.planner_data = data;
        return task;
    }
    let si = start.index();
    if si >= sheet.dir.len() || !sheet.reached[si] {
        log::debug!("flow field: start {:?} cannot reach goal cell {:?}", query.start, key);
        return PathTask::failed(PlanFailure::PlanningFailed);
    }
    let mut task = PathTask::success(vec![query.start, query.start + sheet.dir[si] * cell_size]);
    task.planner_data = data;
    task
}

impl Default for FlowFieldPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl PathPlanner for FlowFieldPlanner {
    fn kind(&self) -> PlannerKind {
        PlannerKind::FlowField
    }

    fn request_path(&mut self, graph: &dyn NavGraph, query: &PathQuery) -> PathTask {
        self.request(graph, query)
    }

    fn update(&mut self, graph: &dyn NavGraph, _dt: f32) {
        self.frame += 1;
        self.advance(graph, self.config.work_per_tick);

        let frame = self.frame;
        let horizon = self.config.evict_after_frames;
        let before = self.fields.len();
        self.fields
            .retain(|_, sheet| frame.saturating_sub(sheet.last_used) <= horizon);
        let dropped = before - self.fields.len();
        if dropped > 0 {
            log::debug!("flow field: evicted {dropped} idle field(s)");
        }
    }

    fn set_density_multiplier(&mut self, multiplier: f32) {
        self.density_multiplier = multiplier;
    }
}
